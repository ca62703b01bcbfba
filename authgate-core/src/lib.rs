//! Envoy external authorization service.
//!
//! The proxy asks for a verdict on every request; this crate reads one signal
//! header, maps it through a [`decision::DecisionPolicy`] and answers with an
//! allow (plus injected headers) or a deny (status, body, headers).

pub mod cli;
pub mod conf;
pub mod decision;
pub mod logging;
pub mod server;
