use crate::errors::ApiError;
use crate::TimeStamp;
use chrono::{Datelike, Timelike};
use chrono_tz::Asia::Tokyo;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// One axis an interval can be bucketed on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dimension {
    Year,
    Month,
    Weekday,
    Hour,
}

/// Named time groupings served by the API.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Breakdown {
    Hour,
    Year,
    Month,
    MonthAndYear,
    MonthAndWeekday,
    YearMonthAndWeekday,
}

impl Breakdown {
    pub fn name(&self) -> &'static str {
        match self {
            Breakdown::Hour => "hour",
            Breakdown::Year => "year",
            Breakdown::Month => "month",
            Breakdown::MonthAndYear => "month_and_year",
            Breakdown::MonthAndWeekday => "month_and_weekday",
            Breakdown::YearMonthAndWeekday => "year_month_and_weekday",
        }
    }

    /// Grouping levels, outermost first. Hour is always the innermost level.
    pub fn dimensions(&self) -> &'static [Dimension] {
        match self {
            Breakdown::Hour => &[Dimension::Hour],
            Breakdown::Year => &[Dimension::Year, Dimension::Hour],
            Breakdown::Month => &[Dimension::Month, Dimension::Hour],
            Breakdown::MonthAndYear => {
                &[Dimension::Year, Dimension::Month, Dimension::Hour]
            }
            Breakdown::MonthAndWeekday => {
                &[Dimension::Month, Dimension::Weekday, Dimension::Hour]
            }
            Breakdown::YearMonthAndWeekday => &[
                Dimension::Year,
                Dimension::Month,
                Dimension::Weekday,
                Dimension::Hour,
            ],
        }
    }

    /// Resolves a route path segment to a bucketed breakdown. The plain
    /// hourly average is served by its own route, not by name.
    pub fn from_name(name: &str) -> Result<Breakdown, ApiError> {
        match name {
            "year" => Ok(Breakdown::Year),
            "month" => Ok(Breakdown::Month),
            "month_and_year" => Ok(Breakdown::MonthAndYear),
            "month_and_weekday" => Ok(Breakdown::MonthAndWeekday),
            "year_month_and_weekday" => Ok(Breakdown::YearMonthAndWeekday),
            _ => Err(ApiError::UnsupportedBreakdown(name.to_string())),
        }
    }
}

/// Bucket coordinates of one interval on the Tokyo wall clock.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TemporalKey {
    year: i32,
    month: u32,
    weekday: u32,
    hour: u32,
}

impl TemporalKey {
    /// Weekday numbering runs 1 = Sunday through 7 = Saturday.
    pub fn from_timestamp(timestamp: &TimeStamp) -> Self {
        let local = timestamp.with_timezone(&Tokyo);
        TemporalKey {
            year: local.year(),
            month: local.month(),
            weekday: local.weekday().number_from_sunday(),
            hour: local.hour(),
        }
    }

    pub fn new(year: i32, month: u32, weekday: u32, hour: u32) -> Self {
        TemporalKey {
            year,
            month,
            weekday,
            hour,
        }
    }

    fn component(&self, dimension: Dimension) -> i64 {
        match dimension {
            Dimension::Year => i64::from(self.year),
            Dimension::Month => i64::from(self.month),
            Dimension::Weekday => i64::from(self.weekday),
            Dimension::Hour => i64::from(self.hour),
        }
    }
}

/// Mean intensity of one hour bucket.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HourlyIntensity {
    pub hour: i64,
    pub carbon_intensity: f64,
}

/// Nested breakdown result. Group keys serialize in ascending numeric order
/// and every branch bottoms out in hourly means.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BucketTree {
    Groups(IndexMap<String, BucketTree>),
    Leaves(Vec<HourlyIntensity>),
    Values(Vec<f64>),
}

/// Buckets per-interval intensities along the given dimensions, outermost
/// first, averaging whatever falls together at the innermost level. Input
/// order does not matter; levels come out ascending.
pub fn aggregate(rows: &[(TemporalKey, f64)], dimensions: &[Dimension]) -> BucketTree {
    match dimensions {
        [] => {
            if rows.is_empty() {
                BucketTree::Values(Vec::new())
            } else {
                BucketTree::Values(vec![mean(rows.iter().map(|(_, intensity)| *intensity))])
            }
        }
        [Dimension::Hour] => BucketTree::Leaves(hourly_means(rows)),
        [first, rest @ ..] => {
            let mut groups: BTreeMap<i64, Vec<(TemporalKey, f64)>> = BTreeMap::new();
            for (key, intensity) in rows {
                groups
                    .entry(key.component(*first))
                    .or_default()
                    .push((*key, *intensity));
            }
            let mut tree = IndexMap::new();
            for (component, bucket) in groups {
                tree.insert(component.to_string(), aggregate(&bucket, rest));
            }
            BucketTree::Groups(tree)
        }
    }
}

fn hourly_means(rows: &[(TemporalKey, f64)]) -> Vec<HourlyIntensity> {
    let mut groups: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for (key, intensity) in rows {
        groups
            .entry(key.component(Dimension::Hour))
            .or_default()
            .push(*intensity);
    }
    groups
        .into_iter()
        .map(|(hour, values)| HourlyIntensity {
            hour,
            carbon_intensity: mean(values.iter().copied()),
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0_usize;
    for value in values {
        sum += value;
        count += 1;
    }
    sum / count as f64
}
