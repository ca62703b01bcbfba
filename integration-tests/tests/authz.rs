mod common;

use authgate_core::decision::PolicyProfile;
use common::{check_request, denied, response_headers, rpc_code};
use envoy_types::pb::envoy::service::auth::v3::check_response::HttpResponse;
use integration_tests::harness::TestServer;
use pretty_assertions::assert_eq;

fn header(name: &str, value: &str) -> (String, String) {
    (name.to_string(), value.to_string())
}

#[test]
fn granted_signal_is_allowed_with_marker_header() {
    let srv = TestServer::start();

    srv.block_on(async {
        let mut client = srv.authz_client().await;

        let res = client
            .check(check_request(&["200"]))
            .await
            .expect("check call failed")
            .into_inner();

        assert_eq!(rpc_code(&res), tonic::Code::Ok as i32);
        assert!(matches!(res.http_response, Some(HttpResponse::OkResponse(_))));
        assert_eq!(
            response_headers(&res),
            vec![header("x-custom-header-from-authz", "some value")]
        );
    });
}

#[test]
fn missing_signal_is_bad_request() {
    let srv = TestServer::start();

    srv.block_on(async {
        let mut client = srv.authz_client().await;

        let res = client
            .check(check_request(&[]))
            .await
            .expect("check call failed")
            .into_inner();

        assert_eq!(rpc_code(&res), tonic::Code::Unknown as i32);
        assert_eq!(denied(&res), Some((400, "UNKNOWN_ERROR".to_string())));
        assert!(response_headers(&res).is_empty());
    });
}

#[test]
fn direct_profile_denies_with_plain_statuses() {
    let srv = TestServer::start_with_profile(PolicyProfile::Direct);

    srv.block_on(async {
        let mut client = srv.authz_client().await;

        let unauthenticated = client.check(check_request(&["401"])).await.unwrap().into_inner();
        let forbidden = client.check(check_request(&["403"])).await.unwrap().into_inner();

        assert_eq!(rpc_code(&unauthenticated), tonic::Code::Unauthenticated as i32);
        assert_eq!(
            denied(&unauthenticated),
            Some((401, "Authorization Header malformed or not provided".to_string()))
        );
        assert!(response_headers(&unauthenticated).is_empty());

        assert_eq!(rpc_code(&forbidden), tonic::Code::PermissionDenied as i32);
        assert_eq!(denied(&forbidden), Some((403, "PERMISSION_DENIED".to_string())));
        assert!(response_headers(&forbidden).is_empty());
    });
}

#[test]
fn proxy_challenge_profile_denies_with_challenge() {
    let srv = TestServer::start_with_profile(PolicyProfile::ProxyChallenge);

    srv.block_on(async {
        let mut client = srv.authz_client().await;

        for (signal, code) in [
            ("401", tonic::Code::Unauthenticated),
            ("403", tonic::Code::PermissionDenied),
        ] {
            let res = client
                .check(check_request(&[signal]))
                .await
                .unwrap()
                .into_inner();

            assert_eq!(rpc_code(&res), code as i32, "{signal}");
            assert_eq!(denied(&res).map(|(status, _)| status), Some(407), "{signal}");
            assert_eq!(
                response_headers(&res),
                vec![header("proxy-authenticate", "Basic realm=\"proxy\"")],
                "{signal}"
            );
        }
    });
}

#[test]
fn only_first_signal_value_counts() {
    let srv = TestServer::start();

    srv.block_on(async {
        let mut client = srv.authz_client().await;

        let res = client
            .check(check_request(&["401", "200"]))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(rpc_code(&res), tonic::Code::Unauthenticated as i32);
        assert_eq!(denied(&res).map(|(status, _)| status), Some(401));
    });
}

#[test]
fn concurrent_checks_are_independent() {
    let srv = TestServer::start();

    srv.block_on(async {
        let client = srv.authz_client().await;

        let calls = ["200", "401", "403", "nope"].map(|signal| {
            let mut client = client.clone();
            tokio::spawn(async move {
                client
                    .check(check_request(&[signal]))
                    .await
                    .unwrap()
                    .into_inner()
            })
        });

        let mut codes = Vec::new();
        for call in calls {
            codes.push(rpc_code(&call.await.unwrap()));
        }

        assert_eq!(
            codes,
            vec![
                tonic::Code::Ok as i32,
                tonic::Code::Unauthenticated as i32,
                tonic::Code::PermissionDenied as i32,
                tonic::Code::Unknown as i32,
            ]
        );
    });
}
