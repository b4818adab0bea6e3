use std::cmp::Ordering;

use serde::Serialize;

use crate::response::{compare_measures, ApiResponse, MeasureField, ResponseBody, ResultRow};
use crate::results::{CaseFailure, CaseResult};

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CaseAssertion {
    Status(u16),
    FlatError(String),
    ErrorTitle(String),
    StrictlyDescending(MeasureField),
    PrimaryCategory(String),
}

pub const PRIMARY_CATEGORY_CHECK: &str = "primary_category";

impl CaseAssertion {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::FlatError(_) => "flat_error",
            Self::ErrorTitle(_) => "error_title",
            Self::StrictlyDescending(_) => "strictly_descending",
            Self::PrimaryCategory(_) => PRIMARY_CATEGORY_CHECK,
        }
    }
}

/// Runs `assertions` in order and records the first failure on `case`.
/// A status mismatch ends the case; nothing after it is checked.
pub fn apply_case_assertions(
    case: &mut CaseResult,
    response: &ApiResponse,
    assertions: &[CaseAssertion],
) {
    case.status = Some(response.status);
    case.elapsed_ms = Some(response.elapsed_ms);

    let mut rows: Option<Vec<ResultRow>> = None;
    for assertion in assertions {
        let outcome = match assertion {
            CaseAssertion::Status(expected) => assert_status(response, *expected),
            CaseAssertion::FlatError(expected) => assert_flat_error(&response.body, expected),
            CaseAssertion::ErrorTitle(expected) => assert_error_title(&response.body, expected),
            CaseAssertion::StrictlyDescending(field) => match load_rows(&mut rows, response) {
                Ok(rows) => assert_strictly_descending(rows, *field),
                Err(failure) => Err(failure),
            },
            CaseAssertion::PrimaryCategory(expected) => match load_rows(&mut rows, response) {
                Ok(rows) => assert_primary_category(rows, expected),
                Err(failure) => Err(failure),
            },
        };
        if let Err(mut failure) = outcome {
            failure.assertion = Some(assertion.kind().to_string());
            case.fail(failure);
            break;
        }
    }
    if let Some(rows) = rows {
        case.row_count = Some(rows.len());
    }
}

fn load_rows<'a>(
    cache: &'a mut Option<Vec<ResultRow>>,
    response: &ApiResponse,
) -> Result<&'a [ResultRow], CaseFailure> {
    if cache.is_none() {
        let rows = response.body.rows().map_err(CaseFailure::new)?;
        *cache = Some(rows);
    }
    Ok(cache.as_deref().unwrap_or_default())
}

pub fn assert_status(response: &ApiResponse, expected: u16) -> Result<(), CaseFailure> {
    if response.status == expected {
        return Ok(());
    }
    Err(CaseFailure::mismatch(
        format!(
            "unexpected status {}; body: {}",
            response.status,
            response.body.describe()
        ),
        expected.to_string(),
        response.status.to_string(),
    ))
}

/// The body itself must be the message, as the service does for comparison
/// attribute errors.
pub fn assert_flat_error(body: &ResponseBody, expected: &str) -> Result<(), CaseFailure> {
    match body.flat_message() {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(CaseFailure::mismatch(
            "flat error message mismatch",
            expected,
            actual,
        )),
        None => Err(CaseFailure::mismatch(
            "expected the body to be a bare error message",
            expected,
            body.describe(),
        )),
    }
}

/// `errors[0].title` must equal `expected`, as the service does for category
/// errors.
pub fn assert_error_title(body: &ResponseBody, expected: &str) -> Result<(), CaseFailure> {
    match body.first_error_title() {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(CaseFailure::mismatch(
            "errors[0].title mismatch",
            expected,
            actual,
        )),
        None => Err(CaseFailure::mismatch(
            "expected a structured body with errors[0].title",
            expected,
            body.describe(),
        )),
    }
}

pub fn assert_strictly_descending(rows: &[ResultRow], field: MeasureField) -> Result<(), CaseFailure> {
    for idx in 1..rows.len() {
        let previous = row_measure(rows, idx - 1, field)?;
        let current = row_measure(rows, idx, field)?;
        if compare_measures(current, previous) != Some(Ordering::Less) {
            return Err(CaseFailure::mismatch(
                format!("ordering violation on '{field}' at index {idx}"),
                format!("{field}[{idx}] < {previous}"),
                format!("{field}[{idx}] = {current}"),
            ));
        }
    }
    Ok(())
}

fn row_measure(
    rows: &[ResultRow],
    idx: usize,
    field: MeasureField,
) -> Result<&serde_json::Number, CaseFailure> {
    rows[idx].measure(field).ok_or_else(|| {
        CaseFailure::new(format!(
            "row at index {idx} has no numeric '{field}' field"
        ))
    })
}

pub fn assert_primary_category(rows: &[ResultRow], expected: &str) -> Result<(), CaseFailure> {
    for (idx, row) in rows.iter().enumerate() {
        let actual = row.primary_category();
        if actual != Some(expected) {
            return Err(CaseFailure::mismatch(
                format!("row at index {idx} has a different primary category"),
                expected,
                actual.unwrap_or("<missing>"),
            ));
        }
    }
    Ok(())
}
