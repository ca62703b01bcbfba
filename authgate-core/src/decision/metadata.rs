use envoy_types::pb::envoy::config::core::v3::HeaderMap;
use std::collections::HashMap;
use tonic::metadata::{KeyAndValueRef, MetadataMap};

/// Header name → ordered values, as seen by the decision function.
///
/// Names are stored lowercase so lookups behave like HTTP header lookups.
/// The order of values for one name is the order they arrived in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMetadata {
    entries: HashMap<String, Vec<String>>,
}

impl RequestMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value for `name`, keeping earlier values in front.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.entries
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// Builder form of [`RequestMetadata::append`].
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// All values recorded for `name`; empty when the name is absent.
    pub fn values(&self, name: &str) -> &[String] {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First value recorded for `name`.
    ///
    /// Later values are ignored on purpose: the first one wins. A name that is
    /// present with no values is indistinguishable from an absent name.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values(name).first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Lower gRPC call metadata.
    ///
    /// Binary (`-bin`) entries are skipped. ASCII values that are not valid
    /// visible text are kept in position (lossily decoded) so they still shadow
    /// any later value for the same name.
    pub fn from_grpc(metadata: &MetadataMap) -> Self {
        let mut out = Self::new();

        for entry in metadata.iter() {
            if let KeyAndValueRef::Ascii(key, value) = entry {
                let value = match value.to_str() {
                    Ok(s) => s.to_string(),
                    Err(_) => String::from_utf8_lossy(value.as_encoded_bytes()).into_owned(),
                };
                out.append(key.as_str(), value);
            }
        }

        out
    }

    /// Lower the HTTP headers Envoy forwards inside the check request.
    ///
    /// Envoy folds repeated headers into one comma-joined value, so every name
    /// carries exactly one value here. Keys that differ only by case are
    /// merged in a fixed order: the exact lowercase key first, then the others
    /// sorted bytewise.
    pub fn from_http_headers(headers: &HashMap<String, String>) -> Self {
        let mut pairs: Vec<(&str, &str)> = headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        pairs.sort_by_cached_key(|&(k, _)| {
            let lower = k.to_ascii_lowercase();
            let exact = k == lower;
            (lower, !exact, k)
        });

        pairs.into_iter().collect()
    }

    /// Lower the raw header list Envoy sends with `encode_raw_headers`.
    ///
    /// Entries keep their wire order, so repeated headers stay separate values.
    /// `raw_value` wins over `value` when set.
    pub fn from_header_map(map: &HeaderMap) -> Self {
        let mut out = Self::new();

        for header in &map.headers {
            let value = if header.raw_value.is_empty() {
                header.value.clone()
            } else {
                String::from_utf8_lossy(&header.raw_value).into_owned()
            };
            out.append(&header.key, value);
        }

        out
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for RequestMetadata {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (name, value) in iter {
            out.append(name, value);
        }
        out
    }
}
