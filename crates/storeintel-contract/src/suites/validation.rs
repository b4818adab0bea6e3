use crate::categories::CategoryTable;
use crate::error::ContractResult;
use crate::expectations::{
    ExpectedOutcome, COMPARISON_ATTRIBUTE_NOT_INCLUDED, INVALID_CATEGORY, MISSING_CATEGORY,
};
use crate::filters::{ComparisonAttribute, DeviceType, FilterSet, MeasureType, Platform};
use crate::suites::{Scenario, INCORRECT_VALUE};

pub const TARGET: &str = "validation";

pub fn case_names() -> Vec<String> {
    vec![
        "status_ok_ios".to_string(),
        "status_ok_android".to_string(),
        "invalid_comparison_attribute_ios".to_string(),
        "invalid_category_ios".to_string(),
        "missing_comparison_attribute_ios".to_string(),
        "missing_category_ios".to_string(),
    ]
}

pub fn scenarios(categories: &CategoryTable) -> ContractResult<Vec<Scenario>> {
    let ios_books = categories.resolve(Platform::Ios, "Books")?;
    let android_books = categories.resolve(Platform::Android, "Books")?;

    let ios_books_downloads = FilterSet::new()
        .comparison_attribute(ComparisonAttribute::Absolute)
        .category(ios_books)
        .device_type(DeviceType::Iphone)
        .measure(MeasureType::Units);

    Ok(vec![
        Scenario::new(
            "status_ok_ios",
            TARGET,
            Platform::Ios,
            ios_books_downloads.clone(),
            ExpectedOutcome::ok(),
        ),
        Scenario::new(
            "status_ok_android",
            TARGET,
            Platform::Android,
            FilterSet::new()
                .comparison_attribute(ComparisonAttribute::Absolute)
                .category(android_books)
                .device_type(DeviceType::Unspecified)
                .measure(MeasureType::Units),
            ExpectedOutcome::ok(),
        ),
        Scenario::new(
            "invalid_comparison_attribute_ios",
            TARGET,
            Platform::Ios,
            ios_books_downloads
                .clone()
                .comparison_attribute(INCORRECT_VALUE)
                .device_type(DeviceType::Ipad),
            ExpectedOutcome::rejected_flat(COMPARISON_ATTRIBUTE_NOT_INCLUDED),
        ),
        Scenario::new(
            "invalid_category_ios",
            TARGET,
            Platform::Ios,
            ios_books_downloads.clone().category(INCORRECT_VALUE),
            ExpectedOutcome::rejected_titled(INVALID_CATEGORY),
        ),
        Scenario::new(
            "missing_comparison_attribute_ios",
            TARGET,
            Platform::Ios,
            ios_books_downloads.clone().without_comparison_attribute(),
            ExpectedOutcome::rejected_flat(COMPARISON_ATTRIBUTE_NOT_INCLUDED),
        ),
        Scenario::new(
            "missing_category_ios",
            TARGET,
            Platform::Ios,
            ios_books_downloads
                .comparison_attribute(ComparisonAttribute::Delta)
                .without_category(),
            ExpectedOutcome::rejected_titled(MISSING_CATEGORY),
        ),
    ])
}
