//! Rendering of decisions into Envoy `CheckResponse` messages.

use crate::decision::{AuthzDecision, HeaderList, Verdict};
use envoy_types::pb::envoy::config::core::v3::{HeaderValue, HeaderValueOption};
use envoy_types::pb::envoy::r#type::v3::HttpStatus;
use envoy_types::pb::envoy::service::auth::v3::check_response::HttpResponse;
use envoy_types::pb::envoy::service::auth::v3::{
    CheckResponse, DeniedHttpResponse, OkHttpResponse,
};
use envoy_types::pb::google::rpc::Status as RpcStatus;

pub fn check_response(decision: AuthzDecision) -> CheckResponse {
    let status = RpcStatus {
        code: decision.coarse.code() as i32,
        ..Default::default()
    };

    let http_response = match decision.verdict {
        Verdict::Allow { headers } => HttpResponse::OkResponse(OkHttpResponse {
            headers: header_options(headers),
            ..Default::default()
        }),
        Verdict::Deny {
            status,
            body,
            headers,
        } => HttpResponse::DeniedResponse(DeniedHttpResponse {
            status: Some(HttpStatus {
                code: i32::from(status.as_u16()),
            }),
            headers: header_options(headers),
            body,
            ..Default::default()
        }),
    };

    CheckResponse {
        status: Some(status),
        http_response: Some(http_response),
        ..Default::default()
    }
}

fn header_options(headers: HeaderList) -> Vec<HeaderValueOption> {
    headers
        .into_iter()
        .map(|(key, value)| HeaderValueOption {
            header: Some(HeaderValue {
                key,
                value,
                ..Default::default()
            }),
            ..Default::default()
        })
        .collect()
}
