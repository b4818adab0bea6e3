use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filters::Platform;
use crate::stats::LatencyStats;

pub const CLASSIFICATION_PASSED: &str = "passed";
pub const CLASSIFICATION_FAILED: &str = "failed";
pub const CLASSIFICATION_KNOWN_ANOMALY: &str = "known_anomaly";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunContext {
    pub schema_version: u32,
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub base_url: String,
    pub target: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_filter: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub method: String,
    pub url: String,
    pub form: Vec<(String, String)>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseFailure {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// Kind of the assertion that failed; `None` for build or transport errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertion: Option<String>,
}

impl CaseFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expected: None,
            actual: None,
            assertion: None,
        }
    }

    pub fn mismatch(
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            expected: Some(expected.into()),
            actual: Some(actual.into()),
            assertion: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub case: String,
    pub target: String,
    pub platform: Platform,
    pub success: bool,
    pub classification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestSummary>,
    pub failure: Option<CaseFailure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl CaseResult {
    pub fn new(case: &str, target: &str, platform: Platform) -> Self {
        Self {
            case: case.to_string(),
            target: target.to_string(),
            platform,
            success: true,
            classification: CLASSIFICATION_PASSED.to_string(),
            status: None,
            elapsed_ms: None,
            row_count: None,
            request: None,
            failure: None,
            notes: Vec::new(),
        }
    }

    pub fn fail(&mut self, failure: CaseFailure) {
        self.success = false;
        self.classification = CLASSIFICATION_FAILED.to_string();
        self.failure = Some(failure);
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub schema_version: u32,
    pub context: RunContext,
    pub cases: Vec<CaseResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<LatencyStats>,
}

impl RunReport {
    pub fn failed_count(&self) -> usize {
        self.cases.iter().filter(|case| !case.success).count()
    }
}
