use crate::conf::error::ConfigError;
use crate::conf::types::{ConfigSpec, PolicySpec, RuntimeConfig, ServerConfig, ServerSpec};
use crate::decision::{DecisionPolicy, MarkerHeader, PolicyProfile};
use http::{HeaderName, HeaderValue};
use std::net::{SocketAddr, ToSocketAddrs};

/// Check every field and lower the spec into its runtime form.
///
/// All problems are collected before returning so `config check` can report
/// them in one pass.
pub fn validate_config(spec: ConfigSpec) -> Result<RuntimeConfig, ConfigError> {
    let mut errors = Vec::new();

    let server = validate_server(&spec.server, &mut errors);
    let policy = validate_policy(&spec.policy, &mut errors);

    match (server, policy) {
        (Some(server), Some(policy)) if errors.is_empty() => Ok(RuntimeConfig { server, policy }),
        _ => Err(ConfigError::from_errors(errors)),
    }
}

fn validate_server(spec: &ServerSpec, errors: &mut Vec<ConfigError>) -> Option<ServerConfig> {
    if spec.max_concurrent_streams == 0 {
        errors.push(ConfigError::ZeroConcurrentStreams);
    }

    let listen = match resolve_listen(&spec.listen) {
        Ok(addr) => addr,
        Err(e) => {
            errors.push(e);
            return None;
        }
    };

    Some(ServerConfig {
        listen,
        max_concurrent_streams: spec.max_concurrent_streams,
    })
}

/// Resolve `host:port` to the first socket address it names.
pub fn resolve_listen(value: &str) -> Result<SocketAddr, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingListenAddress);
    }

    let invalid = |reason: String| ConfigError::InvalidListenAddress {
        value: value.to_string(),
        reason,
    };

    trimmed
        .to_socket_addrs()
        .map_err(|e| invalid(e.to_string()))?
        .next()
        .ok_or_else(|| invalid("address did not resolve".to_string()))
}

fn validate_policy(spec: &PolicySpec, errors: &mut Vec<ConfigError>) -> Option<DecisionPolicy> {
    let before = errors.len();

    let signal_header = header_name("policy.signal_header", &spec.signal_header, errors);
    let allow_name = header_name("policy.allow_header.name", &spec.allow_header.name, errors);
    header_value("policy.allow_header.value", &spec.allow_header.value, errors);

    if spec.profile == PolicyProfile::ProxyChallenge {
        if spec.challenge.trim().is_empty() {
            errors.push(ConfigError::MissingChallenge);
        } else {
            header_value("policy.challenge", &spec.challenge, errors);
        }
    }

    if errors.len() != before {
        return None;
    }

    Some(DecisionPolicy {
        profile: spec.profile,
        signal_header: signal_header?,
        signal_source: spec.signal_source,
        allow_header: MarkerHeader {
            name: allow_name?,
            value: spec.allow_header.value.clone(),
        },
        challenge: spec.challenge.clone(),
    })
}

/// Validated, lowercased header name.
fn header_name(
    field: &'static str,
    value: &str,
    errors: &mut Vec<ConfigError>,
) -> Option<String> {
    match HeaderName::from_bytes(value.as_bytes()) {
        Ok(name) => Some(name.as_str().to_string()),
        Err(_) => {
            errors.push(ConfigError::InvalidHeaderName {
                field,
                value: value.to_string(),
            });
            None
        }
    }
}

fn header_value(field: &'static str, value: &str, errors: &mut Vec<ConfigError>) {
    if HeaderValue::from_str(value).is_err() {
        errors.push(ConfigError::InvalidHeaderValue {
            field,
            value: value.to_string(),
        });
    }
}
