use crate::categories::CategoryTable;
use crate::error::ContractResult;
use crate::expectations::ExpectedOutcome;
use crate::filters::{ComparisonAttribute, DeviceType, FilterSet, MeasureType, Platform};
use crate::suites::Scenario;

pub const TARGET: &str = "category";

pub fn case_names() -> Vec<String> {
    vec!["filter_by_category_ios".to_string()]
}

// The live service has been seen returning "Reference" apps for a Books
// filter. The check stays strict so that shows up as a finding.
pub fn scenarios(categories: &CategoryTable) -> ContractResult<Vec<Scenario>> {
    let books = categories.resolve(Platform::Ios, "Books")?;
    Ok(vec![Scenario::new(
        "filter_by_category_ios",
        TARGET,
        Platform::Ios,
        FilterSet::new()
            .comparison_attribute(ComparisonAttribute::Absolute)
            .category(books)
            .device_type(DeviceType::Iphone)
            .measure(MeasureType::Units),
        ExpectedOutcome::filtered_to("Books"),
    )])
}
