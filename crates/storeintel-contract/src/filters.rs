use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIME_RANGE: &str = "week";

pub const REFERENCE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2021, 1, 1) {
    Some(date) => date,
    None => panic!("reference date is not a calendar date"),
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Ios, Platform::Android];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MeasureType {
    Units,
    Revenue,
}

impl MeasureType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Units => "units",
            Self::Revenue => "revenue",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ComparisonAttribute {
    Absolute,
    Delta,
    TransformedDelta,
    RevenueAbsolute,
}

impl ComparisonAttribute {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Delta => "delta",
            Self::TransformedDelta => "transformed_delta",
            Self::RevenueAbsolute => "revenue_absolute",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeviceType {
    Iphone,
    Ipad,
    Total,
    /// Android requests send an empty device type to mean "all devices".
    Unspecified,
}

impl DeviceType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Iphone => "iphone",
            Self::Ipad => "ipad",
            Self::Total => "total",
            Self::Unspecified => "",
        }
    }

    pub const fn for_platform(platform: Platform) -> &'static [DeviceType] {
        match platform {
            Platform::Ios => &[Self::Iphone, Self::Ipad, Self::Total],
            Platform::Android => &[Self::Unspecified, Self::Total],
        }
    }
}

/// Anything that can be sent as a filter form value, typed or raw.
pub trait FilterParam {
    fn into_param(self) -> String;
}

impl FilterParam for MeasureType {
    fn into_param(self) -> String {
        self.as_str().to_string()
    }
}

impl FilterParam for ComparisonAttribute {
    fn into_param(self) -> String {
        self.as_str().to_string()
    }
}

impl FilterParam for DeviceType {
    fn into_param(self) -> String {
        self.as_str().to_string()
    }
}

impl FilterParam for &str {
    fn into_param(self) -> String {
        self.to_string()
    }
}

impl FilterParam for String {
    fn into_param(self) -> String {
        self
    }
}

/// Filter dimensions for one top-apps query. A `None` dimension is left out
/// of the request entirely, which is how "missing" scenarios are expressed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilterSet {
    pub category: Option<String>,
    pub measure: Option<String>,
    pub comparison_attribute: Option<String>,
    pub device_type: Option<String>,
    pub time_range: String,
    pub date: NaiveDate,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            category: None,
            measure: None,
            comparison_attribute: None,
            device_type: None,
            time_range: DEFAULT_TIME_RANGE.to_string(),
            date: REFERENCE_DATE,
        }
    }
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        comparison_attribute: Option<String>,
        category: Option<String>,
        device_type: Option<String>,
        measure: Option<String>,
    ) -> Self {
        Self {
            category,
            measure,
            comparison_attribute,
            device_type,
            ..Self::default()
        }
    }

    pub fn category(mut self, value: impl FilterParam) -> Self {
        self.category = Some(value.into_param());
        self
    }

    pub fn measure(mut self, value: impl FilterParam) -> Self {
        self.measure = Some(value.into_param());
        self
    }

    pub fn comparison_attribute(mut self, value: impl FilterParam) -> Self {
        self.comparison_attribute = Some(value.into_param());
        self
    }

    pub fn device_type(mut self, value: impl FilterParam) -> Self {
        self.device_type = Some(value.into_param());
        self
    }

    pub fn time_range(mut self, value: impl FilterParam) -> Self {
        self.time_range = value.into_param();
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn without_category(mut self) -> Self {
        self.category = None;
        self
    }

    pub fn without_comparison_attribute(mut self) -> Self {
        self.comparison_attribute = None;
        self
    }

    /// Form pairs in the order the service documents them.
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(6);
        let optional = [
            ("category", &self.category),
            ("measure", &self.measure),
            ("comparison_attribute", &self.comparison_attribute),
            ("device_type", &self.device_type),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                pairs.push((key.to_string(), value.clone()));
            }
        }
        pairs.push(("time_range".to_string(), self.time_range.clone()));
        pairs.push((
            "date".to_string(),
            self.date.format("%Y-%m-%d").to_string(),
        ));
        pairs
    }
}
