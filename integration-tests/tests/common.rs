#![allow(dead_code)]

use envoy_types::pb::envoy::service::auth::v3::check_response::HttpResponse;
use envoy_types::pb::envoy::service::auth::v3::{CheckRequest, CheckResponse};
use tonic::Request;
use tonic::metadata::MetadataValue;

/// A check call carrying `values` under `x-access-status`, in order.
pub fn check_request(values: &[&'static str]) -> Request<CheckRequest> {
    let mut request = Request::new(CheckRequest::default());
    for &v in values {
        request
            .metadata_mut()
            .append("x-access-status", MetadataValue::from_static(v));
    }
    request
}

/// `(key, value)` pairs of the headers attached to either response variant.
pub fn response_headers(response: &CheckResponse) -> Vec<(String, String)> {
    let options = match &response.http_response {
        Some(HttpResponse::OkResponse(ok)) => &ok.headers,
        Some(HttpResponse::DeniedResponse(denied)) => &denied.headers,
        None => return Vec::new(),
    };

    options
        .iter()
        .filter_map(|o| o.header.as_ref())
        .map(|h| (h.key.clone(), h.value.clone()))
        .collect()
}

/// HTTP status and body of a denied response.
pub fn denied(response: &CheckResponse) -> Option<(i32, String)> {
    match &response.http_response {
        Some(HttpResponse::DeniedResponse(d)) => {
            Some((d.status.as_ref().map(|s| s.code)?, d.body.clone()))
        }
        _ => None,
    }
}

pub fn rpc_code(response: &CheckResponse) -> i32 {
    response.status.as_ref().map(|s| s.code).unwrap_or(-1)
}
