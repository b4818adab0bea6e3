mod helpers;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use helpers::service_stub::{spawn_service_stub, StubMode, STUB_TOKEN};
use storeintel_contract::categories::CategoryTable;
use storeintel_contract::cli::RequestMethod;
use storeintel_contract::client::ApiClient;
use storeintel_contract::config::ServiceConfig;
use storeintel_contract::request::RequestBuilder;
use storeintel_contract::results::{CaseResult, CLASSIFICATION_FAILED, CLASSIFICATION_KNOWN_ANOMALY};
use storeintel_contract::suites::{plan_run_cases, run_planned_cases};

fn manifest_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../contract/manifests/store-intel.yaml")
}

fn harness(base_url: &str, token: &str, method: RequestMethod) -> (ApiClient, RequestBuilder) {
    let config = ServiceConfig::new(base_url, token, method, Duration::from_secs(5)).expect("config");
    let client = ApiClient::new(&config).expect("client");
    let categories = CategoryTable::bundled().expect("bundled categories");
    (client, RequestBuilder::new(config, Arc::new(categories)))
}

async fn run_all(base_url: &str, token: &str, method: RequestMethod) -> Vec<CaseResult> {
    let (client, builder) = harness(base_url, token, method);
    let planned = plan_run_cases("all", None, &manifest_path()).expect("plan");
    run_planned_cases(&client, &builder, &planned, &BTreeMap::new())
        .await
        .expect("run should not hard-fail")
}

fn find<'a>(cases: &'a [CaseResult], id: &str) -> &'a CaseResult {
    cases
        .iter()
        .find(|case| case.case == id)
        .unwrap_or_else(|| panic!("case {id} missing from results"))
}

#[tokio::test]
async fn conforming_service_passes_every_case() {
    let stub = spawn_service_stub(StubMode::Conforming);
    let cases = run_all(stub.base_url(), STUB_TOKEN, RequestMethod::Post).await;

    assert_eq!(cases.len(), 14);
    for case in &cases {
        assert!(case.success, "{} failed: {:?}", case.case, case.failure);
    }
    assert_eq!(find(&cases, "invalid_category_ios").status, Some(422));
    assert_eq!(find(&cases, "rank_absolute_downloads_ios").row_count, Some(5));
}

#[tokio::test]
async fn reference_leak_is_reported_as_known_anomaly() {
    let stub = spawn_service_stub(StubMode::LeaksReference);
    let cases = run_all(stub.base_url(), STUB_TOKEN, RequestMethod::Post).await;

    let case = find(&cases, "filter_by_category_ios");
    assert!(!case.success, "leaked Reference rows must not be tolerated");
    assert_eq!(case.classification, CLASSIFICATION_KNOWN_ANOMALY);
    let failure = case.failure.as_ref().expect("failure recorded");
    assert_eq!(failure.expected.as_deref(), Some("Books"));
    assert_eq!(failure.actual.as_deref(), Some("Reference"));
    assert!(failure.message.contains("index 4"), "{}", failure.message);
    assert!(case.notes.iter().any(|note| note.contains("Reference")));

    let others_failed = cases
        .iter()
        .filter(|c| c.case != "filter_by_category_ios" && !c.success)
        .count();
    assert_eq!(others_failed, 0);
}

#[tokio::test]
async fn known_anomaly_does_not_cover_a_rejected_request() {
    let stub = spawn_service_stub(StubMode::LeaksReference);
    let (client, builder) = harness(stub.base_url(), "not-the-token", RequestMethod::Post);
    let planned = plan_run_cases("category", None, &manifest_path()).expect("plan");
    let cases = run_planned_cases(&client, &builder, &planned, &BTreeMap::new())
        .await
        .expect("run should not hard-fail");

    let case = find(&cases, "filter_by_category_ios");
    assert!(!case.success);
    assert_eq!(case.status, Some(401));
    assert_eq!(case.classification, CLASSIFICATION_FAILED);
    assert!(case.notes.is_empty(), "{:?}", case.notes);
    let failure = case.failure.as_ref().expect("status failure");
    assert_eq!(failure.assertion.as_deref(), Some("status"));
}

#[tokio::test]
async fn unsorted_rows_fail_every_ranking_case_at_the_swapped_index() {
    let stub = spawn_service_stub(StubMode::Unsorted);
    let cases = run_all(stub.base_url(), STUB_TOKEN, RequestMethod::Post).await;

    let ranking = cases
        .iter()
        .filter(|case| case.target == "ranking")
        .collect::<Vec<_>>();
    assert_eq!(ranking.len(), 7);
    for case in ranking {
        let failure = case.failure.as_ref().expect("ordering failure");
        assert!(
            failure.message.contains("ordering violation") && failure.message.contains("index 2"),
            "{}: {}",
            case.case,
            failure.message
        );
    }
    assert!(find(&cases, "filter_by_category_ios").success);
}

#[tokio::test]
async fn empty_result_lists_pass_ordering_vacuously() {
    let stub = spawn_service_stub(StubMode::Empty);
    let cases = run_all(stub.base_url(), STUB_TOKEN, RequestMethod::Post).await;
    let case = find(&cases, "rank_growth_pct_revenue_ios");
    assert!(case.success, "{:?}", case.failure);
    assert_eq!(case.row_count, Some(0));
}

#[tokio::test]
async fn requests_carry_token_in_url_and_filters_in_form() {
    let stub = spawn_service_stub(StubMode::Conforming);
    let _ = run_all(stub.base_url(), STUB_TOKEN, RequestMethod::Post).await;
    let requests = stub.requests();
    assert_eq!(requests.len(), 14);

    let invalid_attr = requests
        .iter()
        .find(|r| r.param("comparison_attribute") == Some("incorrect!"))
        .expect("invalid comparison attribute request");
    assert_eq!(invalid_attr.method, "POST");
    assert_eq!(invalid_attr.platform, "ios");
    assert_eq!(invalid_attr.param("device_type"), Some("ipad"));
    assert_eq!(invalid_attr.param("category"), Some("6018"));
    assert_eq!(invalid_attr.param("time_range"), Some("week"));
    assert_eq!(invalid_attr.param("date"), Some("2021-01-01"));
    assert_eq!(
        invalid_attr.query,
        vec![("auth_token".to_string(), STUB_TOKEN.to_string())]
    );

    let missing_category = requests
        .iter()
        .filter(|r| r.param("category").is_none())
        .collect::<Vec<_>>();
    assert_eq!(missing_category.len(), 1);
    assert_eq!(missing_category[0].param("comparison_attribute"), Some("delta"));

    let android = requests
        .iter()
        .filter(|r| r.platform == "android")
        .collect::<Vec<_>>();
    assert_eq!(android.len(), 2);
    assert!(android.iter().all(|r| r.param("device_type") == Some("")));
}

#[tokio::test]
async fn get_mode_sends_filters_in_query_string() {
    let stub = spawn_service_stub(StubMode::Conforming);
    let cases = run_all(stub.base_url(), STUB_TOKEN, RequestMethod::Get).await;
    assert!(cases.iter().all(|case| case.success));

    let requests = stub.requests();
    assert!(requests.iter().all(|r| r.method == "GET" && r.form.is_empty()));
    assert!(requests
        .iter()
        .any(|r| r.query.iter().any(|(k, v)| k == "measure" && v == "revenue")));
}

#[tokio::test]
async fn wrong_token_fails_on_status_with_literal_values() {
    let stub = spawn_service_stub(StubMode::Conforming);
    let cases = run_all(stub.base_url(), "not-the-token", RequestMethod::Post).await;

    let case = find(&cases, "status_ok_ios");
    assert_eq!(case.status, Some(401));
    let failure = case.failure.as_ref().expect("status failure");
    assert_eq!(failure.expected.as_deref(), Some("200"));
    assert_eq!(failure.actual.as_deref(), Some("401"));

    let request = case.request.as_ref().expect("request summary");
    assert!(!request.url.contains("not-the-token"));
}

#[tokio::test]
async fn unreachable_service_becomes_case_failures() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let cases = run_all(&format!("http://{addr}/v1"), STUB_TOKEN, RequestMethod::Post).await;
    assert_eq!(cases.len(), 14);
    for case in &cases {
        assert!(!case.success);
        assert_eq!(case.status, None);
        let failure = case.failure.as_ref().expect("transport failure");
        assert!(failure.message.starts_with("request failed"), "{}", failure.message);
    }
}

#[tokio::test]
async fn cli_overrides_replace_scenario_filters() {
    let stub = spawn_service_stub(StubMode::Conforming);
    let (client, builder) = harness(stub.base_url(), STUB_TOKEN, RequestMethod::Post);
    let planned = plan_run_cases("validation", Some("status_ok_ios"), &manifest_path()).expect("plan");
    let overrides = BTreeMap::from([("time_range".to_string(), "month".to_string())]);

    let cases = run_planned_cases(&client, &builder, &planned, &overrides)
        .await
        .expect("run");
    assert_eq!(cases.len(), 1);
    assert!(cases[0].success);

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].param("time_range"), Some("month"));
}

#[tokio::test]
async fn scenario_overrides_merge_under_cli_overrides() {
    use storeintel_contract::expectations::ExpectedOutcome;
    use storeintel_contract::filters::{ComparisonAttribute, DeviceType, FilterSet, MeasureType, Platform};
    use storeintel_contract::runner::run_scenario;
    use storeintel_contract::suites::Scenario;

    let stub = spawn_service_stub(StubMode::Conforming);
    let (client, builder) = harness(stub.base_url(), STUB_TOKEN, RequestMethod::Post);
    let scenario = Scenario::new(
        "books_ipad_daily",
        "ranking",
        Platform::Ios,
        FilterSet::new()
            .comparison_attribute(ComparisonAttribute::Absolute)
            .category("6018")
            .device_type(DeviceType::Ipad)
            .measure(MeasureType::Units),
        ExpectedOutcome::ok(),
    )
    .with_override("time_range", "day")
    .with_override("limit", "3");
    let cli_overrides = BTreeMap::from([("limit".to_string(), "7".to_string())]);

    let case = run_scenario(&client, &builder, &scenario, &[], &cli_overrides, None).await;
    assert!(case.success, "{:?}", case.failure);

    let requests = stub.requests();
    assert_eq!(requests[0].param("time_range"), Some("day"));
    assert_eq!(requests[0].param("limit"), Some("7"));
}
