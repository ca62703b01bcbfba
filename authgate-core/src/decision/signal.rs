use std::fmt::{Display, Formatter};

/// The typed form of the inbound authorization signal.
///
/// Raw header values are matched exactly (no trimming, no case folding).
/// Anything that is not one of the three known codes, including a missing
/// value, is `Unrecognized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessSignal {
    /// `"200"`
    Granted,
    /// `"401"`
    Unauthenticated,
    /// `"403"`
    Forbidden,
    /// absent or any other value
    Unrecognized,
}

impl AccessSignal {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("200") => Self::Granted,
            Some("401") => Self::Unauthenticated,
            Some("403") => Self::Forbidden,
            _ => Self::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "200",
            Self::Unauthenticated => "401",
            Self::Forbidden => "403",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl Display for AccessSignal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
