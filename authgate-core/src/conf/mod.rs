mod error;
mod loader;
mod overrides;
pub mod types;
mod validation;


pub use error::ConfigError;
pub use loader::{load_config, load_spec};
pub use overrides::ConfigOverrides;
pub use types::{ConfigSpec, RuntimeConfig, ServerConfig};
pub use validation::{resolve_listen, validate_config};
