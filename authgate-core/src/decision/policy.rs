use crate::decision::metadata::RequestMetadata;
use crate::decision::signal::AccessSignal;
use crate::decision::verdict::{AuthzDecision, CoarseStatus, HeaderList};
use http::StatusCode;
use http::header::PROXY_AUTHENTICATE;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SIGNAL_HEADER: &str = "x-access-status";
pub const DEFAULT_ALLOW_HEADER_NAME: &str = "x-custom-header-from-authz";
pub const DEFAULT_ALLOW_HEADER_VALUE: &str = "some value";
pub const DEFAULT_CHALLENGE: &str = "Basic realm=\"proxy\"";

pub const UNAUTHENTICATED_BODY: &str = "Authorization Header malformed or not provided";
pub const PERMISSION_DENIED_BODY: &str = "PERMISSION_DENIED";
pub const UNKNOWN_ERROR_BODY: &str = "UNKNOWN_ERROR";

/// Which deny table is active for the 401 and 403 signals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum PolicyProfile {
    /// 401 → Unauthorized, 403 → Forbidden, no challenge header.
    #[default]
    Direct,
    /// 401 and 403 → Proxy Authentication Required with a `Proxy-Authenticate` challenge.
    ProxyChallenge,
}

impl PolicyProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::ProxyChallenge => "proxy_challenge",
        }
    }
}

/// Where the signal header is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum SignalSource {
    /// Metadata of the gRPC check call itself.
    #[default]
    GrpcMetadata,
    /// HTTP headers Envoy forwards inside the check request attributes.
    HttpRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerHeader {
    pub name: String,
    pub value: String,
}

impl Default for MarkerHeader {
    fn default() -> Self {
        Self {
            name: DEFAULT_ALLOW_HEADER_NAME.to_string(),
            value: DEFAULT_ALLOW_HEADER_VALUE.to_string(),
        }
    }
}

/// The signal → verdict mapping.
///
/// A policy is immutable once built; the server shares one instance across all
/// calls, and [`DecisionPolicy::decide`] is a pure function of its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionPolicy {
    pub profile: PolicyProfile,
    pub signal_header: String,
    pub signal_source: SignalSource,
    pub allow_header: MarkerHeader,
    pub challenge: String,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            profile: PolicyProfile::default(),
            signal_header: DEFAULT_SIGNAL_HEADER.to_string(),
            signal_source: SignalSource::default(),
            allow_header: MarkerHeader::default(),
            challenge: DEFAULT_CHALLENGE.to_string(),
        }
    }
}

impl DecisionPolicy {
    pub fn with_profile(profile: PolicyProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Read the signal from `metadata` and map it to a decision.
    pub fn decide(&self, metadata: &RequestMetadata) -> AuthzDecision {
        self.decide_signal(self.signal(metadata))
    }

    pub fn signal(&self, metadata: &RequestMetadata) -> AccessSignal {
        AccessSignal::parse(metadata.first(&self.signal_header))
    }

    pub fn decide_signal(&self, signal: AccessSignal) -> AuthzDecision {
        match signal {
            AccessSignal::Granted => AuthzDecision::allow(vec![(
                self.allow_header.name.clone(),
                self.allow_header.value.clone(),
            )]),
            AccessSignal::Unauthenticated => self.deny_credentials(
                CoarseStatus::Unauthenticated,
                StatusCode::UNAUTHORIZED,
                UNAUTHENTICATED_BODY,
            ),
            AccessSignal::Forbidden => self.deny_credentials(
                CoarseStatus::PermissionDenied,
                StatusCode::FORBIDDEN,
                PERMISSION_DENIED_BODY,
            ),
            AccessSignal::Unrecognized => AuthzDecision::deny(
                CoarseStatus::Unknown,
                StatusCode::BAD_REQUEST,
                UNKNOWN_ERROR_BODY,
                HeaderList::new(),
            ),
        }
    }

    /// 401 and 403 share one shape; only the profile decides status and headers.
    fn deny_credentials(
        &self,
        coarse: CoarseStatus,
        direct_status: StatusCode,
        body: &str,
    ) -> AuthzDecision {
        match self.profile {
            PolicyProfile::Direct => {
                AuthzDecision::deny(coarse, direct_status, body, HeaderList::new())
            }
            PolicyProfile::ProxyChallenge => AuthzDecision::deny(
                coarse,
                StatusCode::PROXY_AUTHENTICATION_REQUIRED,
                body,
                vec![(PROXY_AUTHENTICATE.as_str().to_string(), self.challenge.clone())],
            ),
        }
    }
}
