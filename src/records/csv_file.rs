use super::{GenerationInterval, RecordSource};
use crate::errors::{ApiError, ApiResult};
use crate::utilities::{Utility, UtilityRegistry, UtilitySourceConfig};
use crate::TimeStamp;
use async_trait::async_trait;
use chrono::{LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Asia::Tokyo;
use csv::{ReaderBuilder, StringRecord};
use indexmap::IndexMap;
use log::debug;
use std::fs;
use std::path::PathBuf;

/// Record supplier over the `{utility}_historical_data.csv` files written by
/// the harvesting jobs: a `datetime` column in JST wall time followed by one
/// `{prefix}_{source}` volume column per reported source.
pub struct CsvRecordSource {
    data_dir: PathBuf,
    registry: UtilityRegistry,
}

impl CsvRecordSource {
    pub fn new(data_dir: impl Into<PathBuf>, registry: UtilityRegistry) -> Self {
        CsvRecordSource {
            data_dir: data_dir.into(),
            registry,
        }
    }

    fn file_path(&self, utility: Utility) -> PathBuf {
        self.data_dir
            .join(format!("{}_historical_data.csv", utility.name()))
    }

    fn read_file(&self, utility: Utility) -> ApiResult<Vec<GenerationInterval>> {
        let path = self.file_path(utility);
        debug!("reading harvested rows from {}", path.display());
        let content = fs::read_to_string(&path).map_err(|error| {
            ApiError::RecordSource(format!("failed to read {}: {}", path.display(), error))
        })?;
        parse_intervals(&content, self.registry.config_for(utility))
            .map_err(ApiError::RecordSource)
    }
}

#[async_trait]
impl RecordSource for CsvRecordSource {
    async fn intervals(&self, utility: Utility) -> ApiResult<Vec<GenerationInterval>> {
        self.read_file(utility)
    }

    async fn intervals_in_range(
        &self,
        utility: Utility,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ApiResult<Vec<GenerationInterval>> {
        let mut rows = self.read_file(utility)?;
        rows.retain(|interval| {
            let date = interval.local_date();
            from <= date && date <= to
        });
        Ok(rows)
    }
}

fn parse_intervals(
    content: &str,
    config: &UtilitySourceConfig,
) -> Result<Vec<GenerationInterval>, String> {
    let mut reader = ReaderBuilder::new().from_reader(content.as_bytes());
    let headers = reader
        .headers()
        .map_err(|error| format!("failed to read header row: {}", error))?
        .clone();
    let datetime_index = column_index(&headers, "datetime")?;
    let mut source_indices = Vec::with_capacity(config.sources().len());
    for source in config.sources().iter().copied() {
        source_indices.push((source, column_index(&headers, &config.column_name(source))?));
    }
    let mut intervals = Vec::new();
    for (row, record) in reader.records().enumerate() {
        // Header is line 1, so the first record sits on line 2.
        let line = row + 2;
        let record =
            record.map_err(|error| format!("failed to read line {}: {}", line, error))?;
        let timestamp = parse_jst_timestamp(field(&record, datetime_index, line)?)?;
        let mut volumes = IndexMap::new();
        for (source, index) in &source_indices {
            let raw = field(&record, *index, line)?;
            let volume: f64 = raw.trim().parse().map_err(|_| {
                format!("line {}: failed to parse '{}' as a volume", line, raw)
            })?;
            volumes.insert(*source, volume);
        }
        intervals.push(GenerationInterval::new(timestamp, volumes));
    }
    intervals.sort_by_key(|interval| *interval.timestamp());
    Ok(intervals)
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, String> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .ok_or(format!("column '{}' missing from header row", name))
}

fn field<'a>(record: &'a StringRecord, index: usize, line: usize) -> Result<&'a str, String> {
    record
        .get(index)
        .ok_or(format!("line {} is short of columns", line))
}

fn parse_jst_timestamp(text: &str) -> Result<TimeStamp, String> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%d %H:%M:%S")
        .map_err(|error| format!("failed to parse '{}' as a timestamp: {}", text, error))?;
    match Tokyo.from_local_datetime(&naive) {
        LocalResult::Single(stamp) => Ok(stamp.with_timezone(&Utc)),
        _ => Err(format!("'{}' is not a valid JST wall time", text)),
    }
}
