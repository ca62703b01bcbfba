mod common;

use common::check_request;
use integration_tests::harness::TestServer;
use integration_tests::harness::server::events;

#[test]
fn decisions_are_logged_with_structured_fields() {
    let srv = TestServer::start();

    srv.block_on(async {
        let mut client = srv.authz_client().await;
        client.check(check_request(&["403"])).await.unwrap();
    });

    let events = events();
    let events = events.lock().unwrap();
    let decision = events
        .iter()
        .find(|e| e.field("message") == Some("Authorization decision"))
        .expect("no decision event captured");

    assert_eq!(decision.field("signal"), Some("403"));
    assert_eq!(decision.field("decision"), Some("deny"));
    assert_eq!(decision.field("http_status"), Some("403"));
    assert_eq!(decision.field("coarse_status"), Some("PermissionDenied"));
}
