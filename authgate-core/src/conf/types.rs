use crate::decision::{
    DEFAULT_ALLOW_HEADER_NAME, DEFAULT_ALLOW_HEADER_VALUE, DEFAULT_CHALLENGE,
    DEFAULT_SIGNAL_HEADER, DecisionPolicy, PolicyProfile, SignalSource,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:4000";
pub const DEFAULT_MAX_CONCURRENT_STREAMS: u32 = 10;

//-----------------------------------------------------------------------------
// File representation
//-----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSpec {
    #[serde(default)]
    pub server: ServerSpec,

    #[serde(default)]
    pub policy: PolicySpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerSpec {
    /// `host:port` the gRPC listener binds to.
    pub listen: String,

    /// HTTP/2 concurrent stream ceiling per connection.
    pub max_concurrent_streams: u32,
}

impl Default for ServerSpec {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            max_concurrent_streams: DEFAULT_MAX_CONCURRENT_STREAMS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct PolicySpec {
    pub profile: PolicyProfile,
    pub signal_header: String,
    pub signal_source: SignalSource,
    pub challenge: String,
    pub allow_header: AllowHeaderSpec,
}

impl Default for PolicySpec {
    fn default() -> Self {
        Self {
            profile: PolicyProfile::default(),
            signal_header: DEFAULT_SIGNAL_HEADER.to_string(),
            signal_source: SignalSource::default(),
            challenge: DEFAULT_CHALLENGE.to_string(),
            allow_header: AllowHeaderSpec::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AllowHeaderSpec {
    pub name: String,
    pub value: String,
}

impl Default for AllowHeaderSpec {
    fn default() -> Self {
        Self {
            name: DEFAULT_ALLOW_HEADER_NAME.to_string(),
            value: DEFAULT_ALLOW_HEADER_VALUE.to_string(),
        }
    }
}

//-----------------------------------------------------------------------------
// Validated runtime representation
//-----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeConfig {
    pub server: ServerConfig,
    pub policy: DecisionPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub max_concurrent_streams: u32,
}
