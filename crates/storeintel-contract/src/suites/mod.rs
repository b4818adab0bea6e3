use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use crate::assertions::CaseAssertion;
use crate::categories::CategoryTable;
use crate::client::ApiClient;
use crate::error::{ContractError, ContractResult};
use crate::expectations::ExpectedOutcome;
use crate::filters::{FilterSet, Platform};
use crate::manifests::{load_manifest, resolve_manifest_path};
use crate::request::RequestBuilder;
use crate::results::CaseResult;
use crate::runner::run_scenario;

pub mod category;
pub mod ranking;
pub mod validation;

/// Sent wherever a scenario needs a value the service must reject.
pub const INCORRECT_VALUE: &str = "incorrect!";

#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub id: String,
    pub target: &'static str,
    pub platform: Platform,
    pub filters: FilterSet,
    pub overrides: BTreeMap<String, String>,
    pub expected: ExpectedOutcome,
}

impl Scenario {
    pub fn new(
        id: &str,
        target: &'static str,
        platform: Platform,
        filters: FilterSet,
        expected: ExpectedOutcome,
    ) -> Self {
        Self {
            id: id.to_string(),
            target,
            platform,
            filters,
            overrides: BTreeMap::new(),
            expected,
        }
    }

    pub fn with_override(mut self, key: &str, value: &str) -> Self {
        self.overrides.insert(key.to_string(), value.to_string());
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlannedCase {
    pub id: String,
    pub target: String,
    pub assertions: Vec<CaseAssertion>,
    pub known_anomaly: Option<String>,
}

pub fn list_targets() -> &'static [&'static str] {
    &[validation::TARGET, ranking::TARGET, category::TARGET, "all"]
}

pub fn list_cases_for_target(target: &str) -> ContractResult<Vec<String>> {
    match target {
        validation::TARGET => Ok(validation::case_names()),
        ranking::TARGET => Ok(ranking::case_names()),
        category::TARGET => Ok(category::case_names()),
        "all" => {
            let mut names = Vec::new();
            names.extend(validation::case_names());
            names.extend(ranking::case_names());
            names.extend(category::case_names());
            Ok(names)
        }
        other => Err(ContractError::InvalidArgument(format!(
            "unknown suite target: {other}"
        ))),
    }
}

pub fn scenarios_for_target(
    target: &str,
    categories: &CategoryTable,
) -> ContractResult<Vec<Scenario>> {
    match target {
        validation::TARGET => validation::scenarios(categories),
        ranking::TARGET => ranking::scenarios(categories),
        category::TARGET => category::scenarios(categories),
        "all" => {
            let mut out = validation::scenarios(categories)?;
            out.extend(ranking::scenarios(categories)?);
            out.extend(category::scenarios(categories)?);
            Ok(out)
        }
        other => Err(ContractError::InvalidArgument(format!(
            "unknown suite target: {other}"
        ))),
    }
}

pub fn plan_run_cases(
    target: &str,
    case_filter: Option<&str>,
    manifest_path: &Path,
) -> ContractResult<Vec<PlannedCase>> {
    list_cases_for_target(target)?;
    let mut planned = plan_cases_from_manifest(target, manifest_path)?;

    if let Some(filter) = case_filter.map(str::trim).filter(|value| !value.is_empty()) {
        planned.retain(|case| case.id.contains(filter));
    }
    if planned.is_empty() {
        return Err(ContractError::InvalidArgument(format!(
            "case filter matched no cases for target='{target}'"
        )));
    }
    reject_duplicate_planned_case_ids(&planned)?;
    Ok(planned)
}

fn plan_cases_from_manifest(target: &str, manifest_path: &Path) -> ContractResult<Vec<PlannedCase>> {
    let resolved_path = resolve_manifest_path(manifest_path);
    let display_path = resolved_path.display().to_string();
    let manifest = load_manifest(&resolved_path).map_err(|error| {
        ContractError::InvalidArgument(format!(
            "failed to load required manifest '{display_path}': {error}"
        ))
    })?;

    let mut out = Vec::new();
    for case in manifest.cases {
        if !case.enabled {
            continue;
        }
        if target != "all" && case.target != target {
            continue;
        }
        let known = list_cases_for_target(&case.target).map_err(|_| {
            ContractError::InvalidArgument(format!(
                "manifest case '{}' names unknown target '{}'",
                case.id, case.target
            ))
        })?;
        if !known.contains(&case.id) {
            return Err(ContractError::InvalidArgument(format!(
                "manifest case '{}' is not defined by target '{}'",
                case.id, case.target
            )));
        }
        out.push(PlannedCase {
            assertions: case
                .assertions
                .iter()
                .map(|assertion| assertion.to_case_assertion())
                .collect(),
            id: case.id,
            target: case.target,
            known_anomaly: case.known_anomaly,
        });
    }
    Ok(out)
}

fn reject_duplicate_planned_case_ids(planned: &[PlannedCase]) -> ContractResult<()> {
    let mut seen = HashSet::new();
    for case in planned {
        if !seen.insert(case.id.as_str()) {
            return Err(ContractError::InvalidArgument(format!(
                "planned case list contains duplicate case id '{}'",
                case.id
            )));
        }
    }
    Ok(())
}

/// Runs every planned case in plan order, one request at a time. Case
/// failures land in the results; only catalog problems abort the run.
pub async fn run_planned_cases(
    client: &ApiClient,
    builder: &RequestBuilder,
    planned: &[PlannedCase],
    overrides: &BTreeMap<String, String>,
) -> ContractResult<Vec<CaseResult>> {
    let catalog = scenarios_for_target("all", builder.categories())?
        .into_iter()
        .map(|scenario| (scenario.id.clone(), scenario))
        .collect::<HashMap<_, _>>();

    let mut results = Vec::with_capacity(planned.len());
    for plan in planned {
        let scenario = catalog.get(&plan.id).ok_or_else(|| {
            ContractError::InvalidArgument(format!(
                "planned case '{}' for target '{}' has no scenario",
                plan.id, plan.target
            ))
        })?;
        let case = run_scenario(
            client,
            builder,
            scenario,
            &plan.assertions,
            overrides,
            plan.known_anomaly.as_deref(),
        )
        .await;
        results.push(case);
    }
    Ok(results)
}
