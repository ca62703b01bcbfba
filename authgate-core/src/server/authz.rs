//! Envoy ext_authz gRPC service.

use std::sync::Arc;

use envoy_types::pb::envoy::service::auth::v3::authorization_server::{
    Authorization, AuthorizationServer,
};
use envoy_types::pb::envoy::service::auth::v3::{CheckRequest, CheckResponse};
use tonic::{Request, Response, Status};
use tracing::debug;

use crate::decision::{DecisionPolicy, RequestMetadata, SignalSource};
use crate::server::response::check_response;

/// `envoy.service.auth.v3.Authorization` backed by a [`DecisionPolicy`].
#[derive(Debug, Clone)]
pub struct AuthzService {
    policy: Arc<DecisionPolicy>,
}

impl AuthzService {
    pub fn new(policy: Arc<DecisionPolicy>) -> Self {
        Self { policy }
    }

    pub fn into_server(self) -> AuthorizationServer<Self> {
        AuthorizationServer::new(self)
    }

    /// Lower the call into the shape the decision function reads.
    fn metadata_for(&self, request: &Request<CheckRequest>) -> RequestMetadata {
        match self.policy.signal_source {
            SignalSource::GrpcMetadata => RequestMetadata::from_grpc(request.metadata()),
            SignalSource::HttpRequest => request
                .get_ref()
                .attributes
                .as_ref()
                .and_then(|a| a.request.as_ref())
                .and_then(|r| r.http.as_ref())
                .map(|h| match &h.header_map {
                    Some(raw) => RequestMetadata::from_header_map(raw),
                    None => RequestMetadata::from_http_headers(&h.headers),
                })
                .unwrap_or_default(),
        }
    }
}

#[tonic::async_trait]
impl Authorization for AuthzService {
    async fn check(
        &self,
        request: Request<CheckRequest>,
    ) -> Result<Response<CheckResponse>, Status> {
        let metadata = self.metadata_for(&request);
        let signal = self.policy.signal(&metadata);
        let decision = self.policy.decide_signal(signal);

        debug!(
            %signal,
            decision = if decision.is_allowed() { "allow" } else { "deny" },
            http_status = decision.http_status().map(|s| s.as_u16()),
            coarse_status = ?decision.coarse,
            "Authorization decision"
        );

        // Every signal maps to a verdict; this RPC never fails.
        Ok(Response::new(check_response(decision)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::PolicyProfile;
    use envoy_types::pb::envoy::service::auth::v3::AttributeContext;
    use envoy_types::pb::envoy::service::auth::v3::attribute_context::{
        HttpRequest, Request as AttrRequest,
    };
    use envoy_types::pb::envoy::service::auth::v3::check_response::HttpResponse;
    use envoy_types::pb::envoy::config::core::v3::{HeaderMap, HeaderValue};
    use std::collections::HashMap;
    use tonic::metadata::MetadataValue;

    fn service(policy: DecisionPolicy) -> AuthzService {
        AuthzService::new(Arc::new(policy))
    }

    fn grpc_request(values: &[&'static str]) -> Request<CheckRequest> {
        let mut request = Request::new(CheckRequest::default());
        for &v in values {
            request
                .metadata_mut()
                .append("x-access-status", MetadataValue::from_static(v));
        }
        request
    }

    fn http_request(status: &str) -> Request<CheckRequest> {
        Request::new(CheckRequest {
            attributes: Some(AttributeContext {
                request: Some(AttrRequest {
                    http: Some(HttpRequest {
                        headers: HashMap::from([(
                            "x-access-status".to_string(),
                            status.to_string(),
                        )]),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn raw_http_request(headers: &[(&str, &str)]) -> Request<CheckRequest> {
        Request::new(CheckRequest {
            attributes: Some(AttributeContext {
                request: Some(AttrRequest {
                    http: Some(HttpRequest {
                        header_map: Some(HeaderMap {
                            headers: headers
                                .iter()
                                .map(|&(key, value)| HeaderValue {
                                    key: key.to_string(),
                                    raw_value: value.as_bytes().to_vec(),
                                    ..Default::default()
                                })
                                .collect(),
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn denied_status(response: &CheckResponse) -> Option<i32> {
        match &response.http_response {
            Some(HttpResponse::DeniedResponse(d)) => d.status.as_ref().map(|s| s.code),
            _ => None,
        }
    }

    #[tokio::test]
    async fn check_allows_on_granted_metadata() {
        let svc = service(DecisionPolicy::default());

        let response = svc.check(grpc_request(&["200"])).await.unwrap().into_inner();

        assert_eq!(response.status.unwrap().code, 0);
        assert!(matches!(
            response.http_response,
            Some(HttpResponse::OkResponse(_))
        ));
    }

    #[tokio::test]
    async fn check_without_signal_is_bad_request() {
        let svc = service(DecisionPolicy::default());

        let response = svc.check(grpc_request(&[])).await.unwrap().into_inner();

        assert_eq!(denied_status(&response), Some(400));
    }

    #[tokio::test]
    async fn check_consults_first_metadata_value_only() {
        let svc = service(DecisionPolicy::default());

        let response = svc
            .check(grpc_request(&["401", "200"]))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(denied_status(&response), Some(401));
    }

    #[tokio::test]
    async fn grpc_source_ignores_forwarded_http_headers() {
        let svc = service(DecisionPolicy::default());

        let response = svc.check(http_request("200")).await.unwrap().into_inner();

        assert_eq!(denied_status(&response), Some(400));
    }

    #[tokio::test]
    async fn http_source_reads_forwarded_headers() {
        let svc = service(DecisionPolicy {
            signal_source: SignalSource::HttpRequest,
            profile: PolicyProfile::ProxyChallenge,
            ..DecisionPolicy::default()
        });

        let allowed = svc.check(http_request("200")).await.unwrap().into_inner();
        let denied = svc.check(http_request("401")).await.unwrap().into_inner();

        assert!(matches!(
            allowed.http_response,
            Some(HttpResponse::OkResponse(_))
        ));
        assert_eq!(denied_status(&denied), Some(407));
    }

    #[tokio::test]
    async fn http_source_without_attributes_is_bad_request() {
        let svc = service(DecisionPolicy {
            signal_source: SignalSource::HttpRequest,
            ..DecisionPolicy::default()
        });

        let response = svc.check(grpc_request(&["200"])).await.unwrap().into_inner();

        assert_eq!(denied_status(&response), Some(400));
    }

    #[tokio::test]
    async fn http_source_reads_raw_header_map() {
        let svc = service(DecisionPolicy {
            signal_source: SignalSource::HttpRequest,
            ..DecisionPolicy::default()
        });

        let allowed = svc
            .check(raw_http_request(&[("x-access-status", "200")]))
            .await
            .unwrap()
            .into_inner();
        let first_wins = svc
            .check(raw_http_request(&[
                ("x-access-status", "403"),
                ("x-access-status", "200"),
            ]))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(allowed.status.unwrap().code, 0);
        assert!(matches!(
            allowed.http_response,
            Some(HttpResponse::OkResponse(_))
        ));
        assert_eq!(denied_status(&first_wins), Some(403));
    }
}
