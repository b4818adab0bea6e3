use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::assertions::{apply_case_assertions, CaseAssertion, PRIMARY_CATEGORY_CHECK};
use crate::client::ApiClient;
use crate::request::{merge_overrides, RequestBuilder, TopAppsRequest};
use crate::results::{CaseFailure, CaseResult, RequestSummary, CLASSIFICATION_KNOWN_ANOMALY};
use crate::suites::Scenario;

#[derive(Clone, Debug)]
#[must_use]
pub enum CaseExecutionResult {
    Success(CaseResult),
    Failure(CaseResult),
}

impl CaseExecutionResult {
    pub fn into_case_result(self) -> CaseResult {
        match self {
            Self::Success(case) | Self::Failure(case) => case,
        }
    }
}

/// Issues the scenario's single request and checks the response against its
/// expected outcome followed by `extra` assertions.
pub async fn run_case(
    client: &ApiClient,
    builder: &RequestBuilder,
    scenario: &Scenario,
    extra: &[CaseAssertion],
    overrides: &BTreeMap<String, String>,
) -> CaseExecutionResult {
    let mut case = CaseResult::new(&scenario.id, scenario.target, scenario.platform);
    info!(case = %scenario.id, platform = %scenario.platform, "running case");

    let merged = merge_overrides(
        scenario.overrides.clone().into_iter().collect(),
        overrides,
    )
    .into_iter()
    .collect::<BTreeMap<_, _>>();

    let request = match builder.build(scenario.platform, &scenario.filters, &merged) {
        Ok(request) => request,
        Err(error) => {
            case.fail(CaseFailure::new(format!("request build failed: {error}")));
            return CaseExecutionResult::Failure(case);
        }
    };
    case.request = Some(summarize(&request));

    let response = match client.send(&request).await {
        Ok(response) => response,
        Err(error) => {
            case.fail(CaseFailure::new(format!("request failed: {error}")));
            return CaseExecutionResult::Failure(case);
        }
    };

    let mut assertions = scenario.expected.assertions();
    assertions.extend_from_slice(extra);
    apply_case_assertions(&mut case, &response, &assertions);

    if case.success {
        CaseExecutionResult::Success(case)
    } else {
        CaseExecutionResult::Failure(case)
    }
}

pub async fn run_scenario(
    client: &ApiClient,
    builder: &RequestBuilder,
    scenario: &Scenario,
    extra: &[CaseAssertion],
    overrides: &BTreeMap<String, String>,
    known_anomaly: Option<&str>,
) -> CaseResult {
    let mut case = run_case(client, builder, scenario, extra, overrides)
        .await
        .into_case_result();

    match (&case.failure, known_anomaly) {
        (None, _) => info!(case = %case.case, status = ?case.status, "case passed"),
        // Only a category mismatch is the documented leak; any other failure
        // is reported as an ordinary failure.
        (Some(failure), Some(note))
            if failure.assertion.as_deref() == Some(PRIMARY_CATEGORY_CHECK) =>
        {
            warn!(
                case = %case.case,
                failure = %failure.message,
                anomaly = note,
                "case reproduced a known service anomaly"
            );
            case.classification = CLASSIFICATION_KNOWN_ANOMALY.to_string();
            case.notes.push(format!("known anomaly: {}", note.trim()));
        }
        (Some(failure), _) => warn!(
            case = %case.case,
            failure = %failure.message,
            expected = ?failure.expected,
            actual = ?failure.actual,
            "case failed"
        ),
    }
    case
}

fn summarize(request: &TopAppsRequest) -> RequestSummary {
    RequestSummary {
        method: request.method.as_str().to_string(),
        url: request.redacted_url(),
        form: request.form.clone(),
    }
}
