use crate::conf::types::ConfigSpec;
use crate::decision::{PolicyProfile, SignalSource};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub listen: Option<String>,
    pub max_concurrent_streams: Option<u32>,
    pub profile: Option<PolicyProfile>,
    pub signal_source: Option<SignalSource>,
}

impl ConfigOverrides {
    pub fn apply(&self, spec: &mut ConfigSpec) {
        if let Some(listen) = &self.listen {
            spec.server.listen = listen.clone();
        }
        if let Some(max) = self.max_concurrent_streams {
            spec.server.max_concurrent_streams = max;
        }
        if let Some(profile) = self.profile {
            spec.policy.profile = profile;
        }
        if let Some(source) = self.signal_source {
            spec.policy.signal_source = source;
        }
    }
}
