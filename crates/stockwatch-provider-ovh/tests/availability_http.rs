//! OVH availability source against a scripted local HTTP server
//!
//! Constraints verified:
//! - One GET per plan, in plan order, with the plan code as `planCode`
//! - Status strings other than "unavailable" count as available
//! - Requested datacenters missing from the response are unavailable
//! - Malformed responses and HTTP errors abort the fetch

use stockwatch_core::traits::InventorySource;
use stockwatch_core::{Error, PlanSet};
use stockwatch_provider_ovh::OvhInventorySource;
use stockwatch_test_utils::{FakeHttpServer, ScriptedResponse, unreachable_url};

const AVAILABILITY_PATH: &str = "/v1/dedicated/server/datacenter/availabilities";

fn availability_body(entries: &[(&str, &str)]) -> String {
    let datacenters: Vec<_> = entries
        .iter()
        .map(|(dc, status)| serde_json::json!({"datacenter": dc, "availability": status}))
        .collect();
    serde_json::json!([{ "planCode": "ignored", "datacenters": datacenters }]).to_string()
}

#[tokio::test]
async fn one_request_per_plan_in_order() {
    let server = FakeHttpServer::start(vec![
        ScriptedResponse::json(200, availability_body(&[("bhs", "unavailable")])),
        ScriptedResponse::json(200, availability_body(&[("bhs", "1H-high")])),
    ])
    .await;

    let plans = PlanSet::new().with("KS-A", "24ska01").with("KS-B", "24skb01");
    let source = OvhInventorySource::new(server.base_url());
    let index = source.fetch(&plans, None).await.expect("fetch succeeds");

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.method == "GET"));
    assert_eq!(requests[0].target, format!("{}?planCode=24ska01", AVAILABILITY_PATH));
    assert_eq!(requests[1].target, format!("{}?planCode=24skb01", AVAILABILITY_PATH));

    let bhs = index.get("bhs").unwrap();
    assert_eq!(bhs.len(), 2);
    assert_eq!(bhs[0].plan_name, "KS-A");
    assert!(!bhs[0].is_available);
    assert_eq!(bhs[1].plan_name, "KS-B");
    assert!(bhs[1].is_available);
}

#[tokio::test]
async fn any_status_but_the_sentinel_is_available() {
    let server = FakeHttpServer::start(vec![ScriptedResponse::json(
        200,
        availability_body(&[
            ("bhs", "unavailable"),
            ("gra", "72H"),
            ("rbx", "comingSoon"),
            ("sbg", "some-future-status"),
        ]),
    )])
    .await;

    let plans = PlanSet::new().with("KS-A", "24ska01");
    let index = OvhInventorySource::new(server.base_url())
        .fetch(&plans, None)
        .await
        .unwrap();

    let observed: Vec<_> = index
        .iter()
        .map(|(dc, records)| (dc.to_string(), records[0].is_available))
        .collect();
    assert_eq!(
        observed,
        vec![
            ("bhs".to_string(), false),
            ("gra".to_string(), true),
            ("rbx".to_string(), true),
            ("sbg".to_string(), true),
        ]
    );
}

#[tokio::test]
async fn requested_datacenters_are_used_exactly() {
    let server = FakeHttpServer::start(vec![ScriptedResponse::json(
        200,
        availability_body(&[("gra", "1H-low"), ("bhs", "1H-low")]),
    )])
    .await;

    let plans = PlanSet::new().with("KS-A", "24ska01");
    let wanted = vec!["bhs".to_string(), "syd".to_string()];
    let index = OvhInventorySource::new(server.base_url())
        .fetch(&plans, Some(wanted.as_slice()))
        .await
        .unwrap();

    let dcs: Vec<_> = index.datacenters().collect();
    assert_eq!(dcs, vec!["bhs", "syd"]);
    assert!(index.get("bhs").unwrap()[0].is_available);
    assert!(!index.get("syd").unwrap()[0].is_available, "unreported means unavailable");
}

#[tokio::test]
async fn object_form_is_accepted() {
    let server = FakeHttpServer::start(vec![ScriptedResponse::json(
        200,
        r#"[{"datacenters": {"bhs": {"availability": "unavailable"}}}]"#,
    )])
    .await;

    let plans = PlanSet::new().with("KS-A", "24ska01");
    let index = OvhInventorySource::new(server.base_url())
        .fetch(&plans, None)
        .await
        .unwrap();

    assert!(!index.get("bhs").unwrap()[0].is_available);
}

#[tokio::test]
async fn object_form_keeps_provider_order() {
    let server = FakeHttpServer::start(vec![ScriptedResponse::json(
        200,
        r#"[{"datacenters": {
            "sbg": {"availability": "1H-low"},
            "bhs": {"availability": "unavailable"},
            "gra": {"availability": "72H"}
        }}]"#,
    )])
    .await;

    let plans = PlanSet::new().with("KS-A", "24ska01");
    let index = OvhInventorySource::new(server.base_url())
        .fetch(&plans, None)
        .await
        .unwrap();

    let dcs: Vec<_> = index.datacenters().collect();
    assert_eq!(dcs, vec!["sbg", "bhs", "gra"]);
}

#[tokio::test]
async fn malformed_response_aborts_remaining_plans() {
    let server = FakeHttpServer::start(vec![
        ScriptedResponse::json(200, r#"[]"#),
        ScriptedResponse::json(200, availability_body(&[("bhs", "1H-low")])),
    ])
    .await;

    let plans = PlanSet::new().with("KS-A", "24ska01").with("KS-B", "24skb01");
    let err = OvhInventorySource::new(server.base_url())
        .fetch(&plans, None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MalformedResponse(_)), "got {err}");
    assert!(err.to_string().contains("24ska01"));
    assert_eq!(server.requests().len(), 1, "no partial salvage, no further requests");
}

#[tokio::test]
async fn missing_datacenters_field_is_malformed() {
    let server = FakeHttpServer::start(vec![ScriptedResponse::json(
        200,
        r#"[{"planCode": "24ska01"}]"#,
    )])
    .await;

    let plans = PlanSet::new().with("KS-A", "24ska01");
    let err = OvhInventorySource::new(server.base_url())
        .fetch(&plans, None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[tokio::test]
async fn http_error_is_fatal() {
    let server = FakeHttpServer::start(vec![ScriptedResponse::json(
        404,
        r#"{"message": "Got an invalid (or empty) URL"}"#,
    )])
    .await;

    let plans = PlanSet::new().with("KS-A", "nope");
    let err = OvhInventorySource::new(server.base_url())
        .fetch(&plans, None)
        .await
        .unwrap_err();

    match err {
        Error::Provider { provider, message } => {
            assert_eq!(provider, "ovh");
            assert!(message.contains("404"));
        }
        other => panic!("expected provider error, got {other}"),
    }
}

#[tokio::test]
async fn connection_failure_is_fatal() {
    let plans = PlanSet::new().with("KS-A", "24ska01");
    let err = OvhInventorySource::new(unreachable_url(""))
        .fetch(&plans, None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Provider { .. }));
}
