use crate::aggregate::{aggregate, Breakdown, TemporalKey};
use crate::cache::ResultCache;
use crate::errors::{ApiError, ApiResult};
use crate::factors::{fetch_baseline_factors, resolve, IntensityFactors};
use crate::intensity::intensity_for_interval;
use crate::records::RecordSource;
use crate::report::{AverageBody, AverageReport, HistoricBody, HistoricPoint, HistoricReport};
use crate::utilities::{Utility, UtilityRegistry, UtilitySourceConfig};
use chrono::NaiveDate;
use chrono_tz::Asia::Tokyo;
use std::sync::Arc;

/// Cache key for the plain hourly average.
const DAILY_INTENSITY_KEY: &str = "daily_intensity";

/// Ties the operator registry, the factor feed, the record supplier and the
/// result caches together into the request pipeline.
pub struct IntensityEngine {
    registry: UtilityRegistry,
    records: Arc<dyn RecordSource>,
    feed_url: String,
    averages: ResultCache<String, AverageBody>,
    historics: ResultCache<(NaiveDate, NaiveDate), HistoricBody>,
}

impl IntensityEngine {
    pub fn new(
        registry: UtilityRegistry,
        records: Arc<dyn RecordSource>,
        feed_url: String,
    ) -> Self {
        IntensityEngine {
            registry,
            records,
            feed_url,
            averages: ResultCache::new(),
            historics: ResultCache::new(),
        }
    }

    /// Hourly averages over the operator's full harvested history.
    pub async fn daily_intensity(&self, utility: Utility) -> ApiResult<AverageReport> {
        let (body, from_cache) = self
            .averages
            .get_or_compute(utility, DAILY_INTENSITY_KEY.to_string(), || {
                self.compute_average(utility, Breakdown::Hour)
            })
            .await?;
        Ok(AverageReport {
            carbon_intensity_average: body,
            from_cache,
        })
    }

    /// Hourly averages bucketed along the breakdown's dimensions.
    pub async fn daily_intensity_with_breakdown(
        &self,
        utility: Utility,
        breakdown: Breakdown,
    ) -> ApiResult<AverageReport> {
        let (body, from_cache) = self
            .averages
            .get_or_compute(utility, breakdown.name().to_string(), || {
                self.compute_average(utility, breakdown)
            })
            .await?;
        Ok(AverageReport {
            carbon_intensity_average: body,
            from_cache,
        })
    }

    /// Per-interval intensities for the JST date range [from, to].
    pub async fn historic_intensity(
        &self,
        utility: Utility,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ApiResult<HistoricReport> {
        if to < from {
            return Err(ApiError::InvalidDateRange(format!(
                "end date {} precedes start date {}",
                to, from
            )));
        }
        let (body, from_cache) = self
            .historics
            .get_or_compute(utility, (from, to), || {
                self.compute_historic(utility, from, to)
            })
            .await?;
        Ok(HistoricReport {
            carbon_intensity_historic: body,
            from_cache,
        })
    }

    /// Drops every cached result for the utility so the next request
    /// recomputes against freshly harvested records.
    pub async fn invalidate(&self, utility: Utility) {
        self.averages.invalidate(utility).await;
        self.historics.invalidate(utility).await;
    }

    async fn factors_for(&self, config: &UtilitySourceConfig) -> ApiResult<IntensityFactors> {
        let baseline = match config.local_baseline() {
            Some(local) => local.clone(),
            None => fetch_baseline_factors(&self.feed_url).await?,
        };
        resolve(config, &baseline)
    }

    async fn compute_average(
        &self,
        utility: Utility,
        breakdown: Breakdown,
    ) -> ApiResult<AverageBody> {
        let config = self.registry.config_for(utility);
        let factors = self.factors_for(config).await?;
        let intervals = self.records.intervals(utility).await?;
        let rows: Vec<(TemporalKey, f64)> = intervals
            .iter()
            .map(|interval| {
                (
                    TemporalKey::from_timestamp(interval.timestamp()),
                    intensity_for_interval(interval, &factors, config),
                )
            })
            .collect();
        Ok(AverageBody {
            breakdown: breakdown.name(),
            data: aggregate(&rows, breakdown.dimensions()),
        })
    }

    async fn compute_historic(
        &self,
        utility: Utility,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ApiResult<HistoricBody> {
        let config = self.registry.config_for(utility);
        let factors = self.factors_for(config).await?;
        let intervals = self.records.intervals_in_range(utility, from, to).await?;
        let data = intervals
            .iter()
            .map(|interval| HistoricPoint {
                datetime: interval.timestamp().with_timezone(&Tokyo).to_rfc3339(),
                carbon_intensity: intensity_for_interval(interval, &factors, config),
            })
            .collect();
        Ok(HistoricBody { from, to, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{BucketTree, HourlyIntensity};
    use crate::factors::parse_factor_feed_response;
    use crate::records::{GenerationInterval, MemoryRecordSource};
    use crate::sources::GenerationSource;
    use chrono::{TimeZone, Utc};
    use indexmap::IndexMap;

    // Every fuel the parser wants, with values that are easy to check.
    const ENGINE_FEED: &str = r#"
{
    "data": [{
        "Biomass": 120,
        "Coal": 900,
        "Gas (Combined Cycle)": 394,
        "Gas (Open Cycle)": 300,
        "Hydro": 0,
        "Nuclear": 0,
        "Oil": 600,
        "Other": 300,
        "Pumped Storage": 0,
        "Solar": 0,
        "Wind": 0
    }]
}
"#;

    fn interval(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        volumes: &[(GenerationSource, f64)],
    ) -> GenerationInterval {
        // Tests speak JST wall time; storage is UTC.
        let timestamp = Tokyo
            .with_ymd_and_hms(year, month, day, hour, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let mut map = IndexMap::new();
        for (source, volume) in volumes {
            map.insert(*source, *volume);
        }
        GenerationInterval::new(timestamp, map)
    }

    fn engine_for(records: MemoryRecordSource, feed_url: String) -> IntensityEngine {
        let registry = UtilityRegistry::try_new().expect("registry should build");
        IntensityEngine::new(registry, Arc::new(records), feed_url)
    }

    fn kyuden_fossil_factor() -> f64 {
        let registry = UtilityRegistry::try_new().expect("registry should build");
        let baseline = parse_factor_feed_response(ENGINE_FEED).expect("feed should parse");
        let factors = resolve(registry.config_for(Utility::Kyuden), &baseline)
            .expect("resolution should succeed");
        factors.factor_for(GenerationSource::Fossil)
    }

    #[tokio::test]
    async fn averages_compute_once_and_replay_from_cache() {
        let mock = mockito::mock("GET", "/feed/engine/roundtrip")
            .with_status(200)
            .with_body(ENGINE_FEED)
            .expect(1)
            .create();
        let mut records = MemoryRecordSource::new();
        records.insert(
            Utility::Kyuden,
            vec![interval(2020, 1, 1, 13, &[(GenerationSource::Hydro, 100.0)])],
        );
        let engine = engine_for(
            records,
            format!("{}/feed/engine/roundtrip", mockito::server_url()),
        );
        let first = engine
            .daily_intensity(Utility::Kyuden)
            .await
            .expect("compute should succeed");
        let second = engine
            .daily_intensity(Utility::Kyuden)
            .await
            .expect("replay should succeed");
        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.carbon_intensity_average.breakdown, "hour");
        assert_eq!(
            first.carbon_intensity_average.data,
            BucketTree::Leaves(vec![HourlyIntensity {
                hour: 13,
                carbon_intensity: 0.0,
            }])
        );
        assert_eq!(
            first.carbon_intensity_average,
            second.carbon_intensity_average
        );
        mock.assert();
    }

    #[tokio::test]
    async fn breakdowns_bucket_on_the_japanese_calendar() {
        let _mock = mockito::mock("GET", "/feed/engine/months")
            .with_status(200)
            .with_body(ENGINE_FEED)
            .create();
        let fossil = kyuden_fossil_factor();
        let mut records = MemoryRecordSource::new();
        // Power-of-two volumes keep the expected values exact.
        records.insert(
            Utility::Kyuden,
            vec![
                interval(2020, 2, 10, 13, &[
                    (GenerationSource::Fossil, 64.0),
                    (GenerationSource::Hydro, 64.0),
                ]),
                interval(2020, 1, 6, 13, &[(GenerationSource::Fossil, 128.0)]),
                interval(2020, 1, 6, 14, &[(GenerationSource::Fossil, 128.0)]),
            ],
        );
        let engine = engine_for(
            records,
            format!("{}/feed/engine/months", mockito::server_url()),
        );
        let report = engine
            .daily_intensity_with_breakdown(Utility::Kyuden, Breakdown::Month)
            .await
            .expect("compute should succeed");
        assert_eq!(report.carbon_intensity_average.breakdown, "month");
        let mut expected = IndexMap::new();
        expected.insert(
            "1".to_string(),
            BucketTree::Leaves(vec![
                HourlyIntensity {
                    hour: 13,
                    carbon_intensity: fossil,
                },
                HourlyIntensity {
                    hour: 14,
                    carbon_intensity: fossil,
                },
            ]),
        );
        expected.insert(
            "2".to_string(),
            BucketTree::Leaves(vec![HourlyIntensity {
                hour: 13,
                carbon_intensity: fossil / 2.0,
            }]),
        );
        assert_eq!(
            report.carbon_intensity_average.data,
            BucketTree::Groups(expected)
        );
    }

    #[tokio::test]
    async fn invalidation_forces_a_fresh_compute() {
        let mock = mockito::mock("GET", "/feed/engine/invalidate")
            .with_status(200)
            .with_body(ENGINE_FEED)
            .expect(2)
            .create();
        let mut records = MemoryRecordSource::new();
        records.insert(
            Utility::Tohokuden,
            vec![interval(2020, 3, 1, 8, &[(GenerationSource::Fossil, 75.0)])],
        );
        let engine = engine_for(
            records,
            format!("{}/feed/engine/invalidate", mockito::server_url()),
        );
        let first = engine
            .daily_intensity(Utility::Tohokuden)
            .await
            .expect("compute should succeed");
        engine.invalidate(Utility::Tohokuden).await;
        let second = engine
            .daily_intensity(Utility::Tohokuden)
            .await
            .expect("recompute should succeed");
        assert!(!first.from_cache);
        assert!(!second.from_cache);
        mock.assert();
    }

    #[tokio::test]
    async fn okinawa_resolves_without_the_feed() {
        let mut records = MemoryRecordSource::new();
        let row = interval(2020, 1, 1, 13, &[
            (GenerationSource::Fossil, 80.0),
            (GenerationSource::SolarOutput, 20.0),
        ]);
        records.insert(Utility::Okiden, vec![row.clone()]);
        // An unroutable feed proves no fetch happens for the island grid.
        let engine = engine_for(records, "http://127.0.0.1:9/unreachable".to_string());
        let report = engine
            .daily_intensity(Utility::Okiden)
            .await
            .expect("local factors should resolve offline");
        let registry = UtilityRegistry::try_new().expect("registry should build");
        let config = registry.config_for(Utility::Okiden);
        let local = config
            .local_baseline()
            .expect("the island grid should carry its own baseline");
        let factors = resolve(config, local).expect("resolution should succeed");
        assert_eq!(
            report.carbon_intensity_average.data,
            BucketTree::Leaves(vec![HourlyIntensity {
                hour: 13,
                carbon_intensity: intensity_for_interval(&row, &factors, config),
            }])
        );
    }

    #[tokio::test]
    async fn historic_series_walks_the_range_in_order() {
        let _mock = mockito::mock("GET", "/feed/engine/historic")
            .with_status(200)
            .with_body(ENGINE_FEED)
            .create();
        let fossil = kyuden_fossil_factor();
        let mut records = MemoryRecordSource::new();
        records.insert(
            Utility::Kyuden,
            vec![
                interval(2020, 1, 3, 13, &[(GenerationSource::Fossil, 32.0)]),
                interval(2020, 1, 1, 13, &[(GenerationSource::Fossil, 32.0)]),
                interval(2020, 1, 2, 13, &[(GenerationSource::Fossil, 32.0)]),
            ],
        );
        let engine = engine_for(
            records,
            format!("{}/feed/engine/historic", mockito::server_url()),
        );
        let from = NaiveDate::from_ymd_opt(2020, 1, 1).expect("date should be valid");
        let to = NaiveDate::from_ymd_opt(2020, 1, 2).expect("date should be valid");
        let report = engine
            .historic_intensity(Utility::Kyuden, from, to)
            .await
            .expect("compute should succeed");
        let body = &report.carbon_intensity_historic;
        assert_eq!((body.from, body.to), (from, to));
        assert_eq!(
            body.data,
            vec![
                HistoricPoint {
                    datetime: "2020-01-01T13:00:00+09:00".to_string(),
                    carbon_intensity: fossil,
                },
                HistoricPoint {
                    datetime: "2020-01-02T13:00:00+09:00".to_string(),
                    carbon_intensity: fossil,
                },
            ]
        );
        assert!(!report.from_cache);
        let replay = engine
            .historic_intensity(Utility::Kyuden, from, to)
            .await
            .expect("replay should succeed");
        assert!(replay.from_cache);
    }

    #[tokio::test]
    async fn rejects_an_inverted_date_range() {
        let engine = engine_for(MemoryRecordSource::new(), "http://127.0.0.1:9/unused".to_string());
        let from = NaiveDate::from_ymd_opt(2020, 1, 5).expect("date should be valid");
        let to = NaiveDate::from_ymd_opt(2020, 1, 1).expect("date should be valid");
        match engine.historic_intensity(Utility::Tepco, from, to).await {
            Err(ApiError::InvalidDateRange(message)) => {
                assert_eq!(message, "end date 2020-01-01 precedes start date 2020-01-05");
            }
            other => panic!("inverted range should have failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn a_single_day_range_is_allowed() {
        let _mock = mockito::mock("GET", "/feed/engine/single-day")
            .with_status(200)
            .with_body(ENGINE_FEED)
            .create();
        let mut records = MemoryRecordSource::new();
        records.insert(
            Utility::Kyuden,
            vec![
                interval(2020, 1, 1, 13, &[(GenerationSource::Fossil, 10.0)]),
                interval(2020, 1, 2, 13, &[(GenerationSource::Fossil, 10.0)]),
            ],
        );
        let engine = engine_for(
            records,
            format!("{}/feed/engine/single-day", mockito::server_url()),
        );
        let day = NaiveDate::from_ymd_opt(2020, 1, 2).expect("date should be valid");
        let report = engine
            .historic_intensity(Utility::Kyuden, day, day)
            .await
            .expect("compute should succeed");
        assert_eq!(report.carbon_intensity_historic.data.len(), 1);
    }
}
