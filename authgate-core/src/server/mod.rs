mod authz;
mod error;
mod health;
mod response;
mod setup;

pub use authz::AuthzService;
pub use error::ServerError;
pub use health::LivenessService;
pub use response::check_response;
pub use setup::{run, serve_with_shutdown};
