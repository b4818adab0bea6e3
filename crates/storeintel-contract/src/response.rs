use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::filters::{ComparisonAttribute, MeasureType};

pub const PRIMARY_CATEGORY_TAG: &str = "Primary Category";

#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Empty,
}

impl ResponseBody {
    pub fn parse(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::Empty;
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// The body as a bare message: either a JSON string or a plain text body.
    pub fn flat_message(&self) -> Option<&str> {
        match self {
            Self::Json(Value::String(message)) => Some(message.as_str()),
            Self::Text(message) => Some(message.trim()),
            _ => None,
        }
    }

    /// `errors[0].title` from a structured error body.
    pub fn first_error_title(&self) -> Option<&str> {
        match self {
            Self::Json(value) => value
                .get("errors")
                .and_then(Value::as_array)
                .and_then(|errors| errors.first())
                .and_then(|error| error.get("title"))
                .and_then(Value::as_str),
            _ => None,
        }
    }

    pub fn rows(&self) -> Result<Vec<ResultRow>, String> {
        match self {
            Self::Json(value @ Value::Array(_)) => serde_json::from_value(value.clone())
                .map_err(|error| format!("response rows are malformed: {error}")),
            other => Err(format!("expected a JSON list of rows, got {}", other.describe())),
        }
    }

    pub fn describe(&self) -> String {
        const LIMIT: usize = 200;
        let rendered = match self {
            Self::Json(value) => value.to_string(),
            Self::Text(text) => format!("text {text:?}"),
            Self::Empty => return "empty body".to_string(),
        };
        if rendered.len() > LIMIT {
            let mut cut = LIMIT;
            while !rendered.is_char_boundary(cut) {
                cut -= 1;
            }
            format!("{}...", &rendered[..cut])
        } else {
            rendered
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
    pub elapsed_ms: f64,
}

/// One ranked app from the top-apps list. Measure columns vary with the
/// requested measure and comparison attribute, so they stay untyped.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ResultRow {
    #[serde(default)]
    pub app_id: Option<Value>,
    #[serde(default)]
    pub custom_tags: Map<String, Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ResultRow {
    pub fn primary_category(&self) -> Option<&str> {
        self.custom_tags
            .get(PRIMARY_CATEGORY_TAG)
            .and_then(Value::as_str)
    }

    pub fn measure(&self, field: MeasureField) -> Option<&Number> {
        match self.fields.get(field.as_str()) {
            Some(Value::Number(number)) => Some(number),
            _ => None,
        }
    }
}

/// Integers compare exactly; only mixed or fractional pairs go through f64.
pub fn compare_measures(left: &Number, right: &Number) -> Option<Ordering> {
    match (as_integer(left), as_integer(right)) {
        (Some(left), Some(right)) => Some(left.cmp(&right)),
        _ => left.as_f64()?.partial_cmp(&right.as_f64()?),
    }
}

fn as_integer(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureField {
    Absolute,
    Delta,
    TransformedDelta,
    RevenueAbsolute,
    RevenueDelta,
    RevenueTransformedDelta,
}

impl MeasureField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Delta => "delta",
            Self::TransformedDelta => "transformed_delta",
            Self::RevenueAbsolute => "revenue_absolute",
            Self::RevenueDelta => "revenue_delta",
            Self::RevenueTransformedDelta => "revenue_transformed_delta",
        }
    }

    /// Column the service ranks by for a measure/comparison pair.
    pub const fn for_request(measure: MeasureType, comparison: ComparisonAttribute) -> Self {
        match (measure, comparison) {
            (MeasureType::Units, ComparisonAttribute::Absolute) => Self::Absolute,
            (MeasureType::Units, ComparisonAttribute::Delta) => Self::Delta,
            (MeasureType::Units, ComparisonAttribute::TransformedDelta) => Self::TransformedDelta,
            (MeasureType::Revenue, ComparisonAttribute::Absolute)
            | (_, ComparisonAttribute::RevenueAbsolute) => Self::RevenueAbsolute,
            (MeasureType::Revenue, ComparisonAttribute::Delta) => Self::RevenueDelta,
            (MeasureType::Revenue, ComparisonAttribute::TransformedDelta) => {
                Self::RevenueTransformedDelta
            }
        }
    }
}

impl fmt::Display for MeasureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
