use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    // IO
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parsing
    #[error("failed to parse HCL in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },

    // Listener
    #[error("missing listen address (expected host:port, e.g. 0.0.0.0:4000)")]
    MissingListenAddress,

    #[error("invalid listen address '{value}': {reason}")]
    InvalidListenAddress { value: String, reason: String },

    #[error("max_concurrent_streams must be greater than zero")]
    ZeroConcurrentStreams,

    // Policy
    #[error("invalid header name '{value}' for {field}")]
    InvalidHeaderName { field: &'static str, value: String },

    #[error("invalid header value '{value}' for {field}")]
    InvalidHeaderValue { field: &'static str, value: String },

    #[error("the proxy_challenge profile requires a non-empty challenge")]
    MissingChallenge,

    // Top-level
    #[error("invalid configuration: {}", summarize(.errors))]
    Invalid { errors: Vec<ConfigError> },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: hcl::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Collapse collected validation errors; a single error is returned as is.
    pub fn from_errors(mut errors: Vec<ConfigError>) -> Self {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            Self::Invalid { errors }
        }
    }

    /// The individual problems behind this error.
    pub fn problems(&self) -> Vec<&ConfigError> {
        match self {
            Self::Invalid { errors } => errors.iter().collect(),
            other => vec![other],
        }
    }
}

fn summarize(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
