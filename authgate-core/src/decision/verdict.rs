use http::StatusCode;
use serde::Serialize;

/// Ordered `(name, value)` pairs handed back to the proxy.
pub type HeaderList = Vec<(String, String)>;

/// Protocol-level outcome code that accompanies every verdict.
///
/// This is the `google.rpc.Status` code Envoy records for the check, and is
/// separate from the HTTP status the end user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoarseStatus {
    Ok,
    Unauthenticated,
    PermissionDenied,
    Unknown,
}

impl CoarseStatus {
    pub fn code(self) -> tonic::Code {
        match self {
            Self::Ok => tonic::Code::Ok,
            Self::Unauthenticated => tonic::Code::Unauthenticated,
            Self::PermissionDenied => tonic::Code::PermissionDenied,
            Self::Unknown => tonic::Code::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Forward the request upstream with `headers` appended.
    Allow { headers: HeaderList },

    /// Short-circuit the request with this status, body and headers.
    Deny {
        status: StatusCode,
        body: String,
        headers: HeaderList,
    },
}

/// A verdict together with its coarse status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthzDecision {
    pub coarse: CoarseStatus,
    pub verdict: Verdict,
}

impl AuthzDecision {
    pub fn allow(headers: HeaderList) -> Self {
        Self {
            coarse: CoarseStatus::Ok,
            verdict: Verdict::Allow { headers },
        }
    }

    pub fn deny(
        coarse: CoarseStatus,
        status: StatusCode,
        body: impl Into<String>,
        headers: HeaderList,
    ) -> Self {
        Self {
            coarse,
            verdict: Verdict::Deny {
                status,
                body: body.into(),
                headers,
            },
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self.verdict, Verdict::Allow { .. })
    }

    /// HTTP status for logging; `None` for an allow.
    pub fn http_status(&self) -> Option<StatusCode> {
        match &self.verdict {
            Verdict::Allow { .. } => None,
            Verdict::Deny { status, .. } => Some(*status),
        }
    }

    pub fn headers(&self) -> &HeaderList {
        match &self.verdict {
            Verdict::Allow { headers } => headers,
            Verdict::Deny { headers, .. } => headers,
        }
    }
}
