use crate::categories::CategoryTable;
use crate::error::ContractResult;
use crate::expectations::ExpectedOutcome;
use crate::filters::{ComparisonAttribute, DeviceType, FilterSet, MeasureType, Platform};
use crate::response::MeasureField;
use crate::suites::Scenario;

pub const TARGET: &str = "ranking";

const IOS_CASES: [(&str, MeasureType, ComparisonAttribute); 6] = [
    (
        "rank_absolute_downloads_ios",
        MeasureType::Units,
        ComparisonAttribute::Absolute,
    ),
    (
        "rank_growth_downloads_ios",
        MeasureType::Units,
        ComparisonAttribute::Delta,
    ),
    (
        "rank_growth_pct_downloads_ios",
        MeasureType::Units,
        ComparisonAttribute::TransformedDelta,
    ),
    (
        "rank_absolute_revenue_ios",
        MeasureType::Revenue,
        ComparisonAttribute::Absolute,
    ),
    (
        "rank_growth_revenue_ios",
        MeasureType::Revenue,
        ComparisonAttribute::Delta,
    ),
    (
        "rank_growth_pct_revenue_ios",
        MeasureType::Revenue,
        ComparisonAttribute::TransformedDelta,
    ),
];

const ANDROID_ABSOLUTE_DOWNLOADS: &str = "rank_absolute_downloads_android";

pub fn case_names() -> Vec<String> {
    IOS_CASES
        .iter()
        .map(|(id, _, _)| id.to_string())
        .chain(std::iter::once(ANDROID_ABSOLUTE_DOWNLOADS.to_string()))
        .collect()
}

pub fn scenarios(categories: &CategoryTable) -> ContractResult<Vec<Scenario>> {
    let ios_books = categories.resolve(Platform::Ios, "Books")?;
    let android_books = categories.resolve(Platform::Android, "Books")?;

    let mut out = IOS_CASES
        .iter()
        .map(|&(id, measure, comparison)| {
            Scenario::new(
                id,
                TARGET,
                Platform::Ios,
                ranked_filters(ios_books, DeviceType::Iphone, measure, comparison),
                ExpectedOutcome::ranked_by(MeasureField::for_request(measure, comparison)),
            )
        })
        .collect::<Vec<_>>();

    out.push(Scenario::new(
        ANDROID_ABSOLUTE_DOWNLOADS,
        TARGET,
        Platform::Android,
        ranked_filters(
            android_books,
            DeviceType::Unspecified,
            MeasureType::Units,
            ComparisonAttribute::Absolute,
        ),
        ExpectedOutcome::ranked_by(MeasureField::Absolute),
    ));
    Ok(out)
}

fn ranked_filters(
    category: &str,
    device_type: DeviceType,
    measure: MeasureType,
    comparison: ComparisonAttribute,
) -> FilterSet {
    FilterSet::new()
        .comparison_attribute(comparison)
        .category(category)
        .device_type(device_type)
        .measure(measure)
}
