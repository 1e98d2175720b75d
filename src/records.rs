use crate::errors::ApiResult;
use crate::sources::GenerationSource;
use crate::utilities::Utility;
use crate::TimeStamp;
use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Asia::Tokyo;
use indexmap::IndexMap;
use std::collections::HashMap;

pub mod csv_file;

/// One harvested row: a timestamp and the reported volume per source.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationInterval {
    timestamp: TimeStamp,
    volumes: IndexMap<GenerationSource, f64>,
}

impl GenerationInterval {
    pub fn new(timestamp: TimeStamp, volumes: IndexMap<GenerationSource, f64>) -> Self {
        GenerationInterval { timestamp, volumes }
    }

    pub fn timestamp(&self) -> &TimeStamp {
        &self.timestamp
    }

    /// Reported volume for a source; unreported sources count zero.
    pub fn volume(&self, source: GenerationSource) -> f64 {
        self.volumes.get(&source).copied().unwrap_or(0.0)
    }

    /// The interval's JST calendar date.
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.with_timezone(&Tokyo).date_naive()
    }
}

/// Supplier of harvested generation rows. The engine only needs the interval
/// shape, not whatever warehouse or file sits behind it.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Every interval harvested for the utility, oldest first.
    async fn intervals(&self, utility: Utility) -> ApiResult<Vec<GenerationInterval>>;

    /// Intervals whose JST calendar date falls within [from, to].
    async fn intervals_in_range(
        &self,
        utility: Utility,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ApiResult<Vec<GenerationInterval>>;
}

/// Record supplier over rows held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryRecordSource {
    rows: HashMap<Utility, Vec<GenerationInterval>>,
}

impl MemoryRecordSource {
    pub fn new() -> Self {
        MemoryRecordSource {
            rows: HashMap::new(),
        }
    }

    pub fn insert(&mut self, utility: Utility, intervals: Vec<GenerationInterval>) {
        self.rows.entry(utility).or_default().extend(intervals);
    }
}

#[async_trait]
impl RecordSource for MemoryRecordSource {
    async fn intervals(&self, utility: Utility) -> ApiResult<Vec<GenerationInterval>> {
        let mut rows = self.rows.get(&utility).cloned().unwrap_or_default();
        rows.sort_by_key(|interval| *interval.timestamp());
        Ok(rows)
    }

    async fn intervals_in_range(
        &self,
        utility: Utility,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ApiResult<Vec<GenerationInterval>> {
        let mut rows = self.intervals(utility).await?;
        rows.retain(|interval| {
            let date = interval.local_date();
            from <= date && date <= to
        });
        Ok(rows)
    }
}
