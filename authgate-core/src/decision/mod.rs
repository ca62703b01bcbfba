//! Signal → verdict mapping.
//!
//! Nothing in here touches the network or shared mutable state; the server
//! layer lowers the check request into [`RequestMetadata`] and renders the
//! returned [`AuthzDecision`] into an Envoy response.

mod metadata;
mod policy;
mod signal;
mod verdict;


pub use metadata::RequestMetadata;
pub use policy::{
    DEFAULT_ALLOW_HEADER_NAME, DEFAULT_ALLOW_HEADER_VALUE, DEFAULT_CHALLENGE,
    DEFAULT_SIGNAL_HEADER, DecisionPolicy, MarkerHeader, PERMISSION_DENIED_BODY, PolicyProfile,
    SignalSource, UNAUTHENTICATED_BODY, UNKNOWN_ERROR_BODY,
};
pub use signal::AccessSignal;
pub use verdict::{AuthzDecision, CoarseStatus, HeaderList, Verdict};
