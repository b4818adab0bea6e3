use crate::assertions::CaseAssertion;
use crate::response::MeasureField;

pub const STATUS_OK: u16 = 200;
pub const STATUS_UNPROCESSABLE: u16 = 422;

pub const COMPARISON_ATTRIBUTE_NOT_INCLUDED: &str =
    "Comparison attribute is not included in the list";
pub const INVALID_CATEGORY: &str = "Invalid category";
pub const MISSING_CATEGORY: &str = "Required parameter: category is missing";

/// How the service formats a validation failure. Which one applies depends on
/// the parameter that failed, and each scenario pins the exact shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorShape {
    /// The body is the message itself.
    Flat(String),
    /// `{"errors": [{"title": ...}]}`; only the first title is compared.
    Titled(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum RowCheck {
    StrictlyDescending(MeasureField),
    PrimaryCategory(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExpectedOutcome {
    Success { status: u16, checks: Vec<RowCheck> },
    Failure { status: u16, error: ErrorShape },
}

impl ExpectedOutcome {
    pub fn ok() -> Self {
        Self::Success {
            status: STATUS_OK,
            checks: Vec::new(),
        }
    }

    pub fn ranked_by(field: MeasureField) -> Self {
        Self::Success {
            status: STATUS_OK,
            checks: vec![RowCheck::StrictlyDescending(field)],
        }
    }

    pub fn filtered_to(label: impl Into<String>) -> Self {
        Self::Success {
            status: STATUS_OK,
            checks: vec![RowCheck::PrimaryCategory(label.into())],
        }
    }

    pub fn rejected_flat(message: impl Into<String>) -> Self {
        Self::Failure {
            status: STATUS_UNPROCESSABLE,
            error: ErrorShape::Flat(message.into()),
        }
    }

    pub fn rejected_titled(message: impl Into<String>) -> Self {
        Self::Failure {
            status: STATUS_UNPROCESSABLE,
            error: ErrorShape::Titled(message.into()),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Success { status, .. } | Self::Failure { status, .. } => *status,
        }
    }

    /// Status first, so a wrong status short-circuits the body checks.
    pub fn assertions(&self) -> Vec<CaseAssertion> {
        let mut out = vec![CaseAssertion::Status(self.status())];
        match self {
            Self::Success { checks, .. } => {
                out.extend(checks.iter().map(|check| match check {
                    RowCheck::StrictlyDescending(field) => CaseAssertion::StrictlyDescending(*field),
                    RowCheck::PrimaryCategory(label) => CaseAssertion::PrimaryCategory(label.clone()),
                }));
            }
            Self::Failure { error, .. } => out.push(match error {
                ErrorShape::Flat(message) => CaseAssertion::FlatError(message.clone()),
                ErrorShape::Titled(message) => CaseAssertion::ErrorTitle(message.clone()),
            }),
        }
        out
    }
}
