use crate::aggregate::BucketTree;
use chrono::NaiveDate;
use serde::Serialize;

/// Body of an average response, memoized per utility and breakdown.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AverageBody {
    pub breakdown: &'static str,
    pub data: BucketTree,
}

/// One intensity sample of a historic series, stamped with its Tokyo wall
/// clock time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoricPoint {
    pub datetime: String,
    pub carbon_intensity: f64,
}

/// Body of a historic response, memoized per utility and date range.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoricBody {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub data: Vec<HistoricPoint>,
}

/// Full average response as it goes over the wire.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AverageReport {
    pub carbon_intensity_average: AverageBody,
    #[serde(rename = "fromCache")]
    pub from_cache: bool,
}

/// Full historic response as it goes over the wire.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoricReport {
    pub carbon_intensity_historic: HistoricBody,
    #[serde(rename = "fromCache")]
    pub from_cache: bool,
}
