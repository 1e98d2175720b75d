use crate::errors::{ApiError, ApiResult};
use crate::sources::{FlowPolicy, FuelWeights, GenerationSource};
use crate::utilities::UtilitySourceConfig;
use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

/// Public per-fuel baseline published by the UK grid operator.
pub const DEFAULT_FACTOR_FEED_URL: &str = "https://api.carbonintensity.org.uk/intensity/factors";

/// Stand-in intensity for imported power pending a rolling average of the
/// neighbouring grids.
pub const INTERCONNECTOR_PLACEHOLDER: f64 = 500.0;

/// Baseline emissions factors per fuel type, g CO2 per kWh.
#[derive(Clone, Debug, PartialEq)]
pub struct BaselineFactors {
    pub nuclear: f64,
    pub coal: f64,
    pub oil: f64,
    pub gas: f64,
    pub hydro: f64,
    pub biomass: f64,
    pub solar: f64,
    pub wind: f64,
    pub pumped_storage: f64,
    pub geothermal: f64,
}

/// Resolved per-source coefficients for one operator, g CO2 per kWh.
#[derive(Clone, Debug, PartialEq)]
pub struct IntensityFactors {
    factors: IndexMap<GenerationSource, f64>,
}

impl IntensityFactors {
    /// Coefficient for a source; sources outside the resolved set rate zero.
    pub fn factor_for(&self, source: GenerationSource) -> f64 {
        self.factors.get(&source).copied().unwrap_or(0.0)
    }
}

/// Fetches the baseline factor table from the feed.
pub async fn fetch_baseline_factors(feed_url: &str) -> ApiResult<BaselineFactors> {
    debug!("grabbing baseline intensities from {}", feed_url);
    let client = reqwest::Client::new();
    let response = client
        .get(feed_url)
        .header("accept", "application/json")
        .send()
        .await
        .map_err(|error| ApiError::FactorFeedUnavailable(error.to_string()))?;
    let response_text = response
        .text()
        .await
        .map_err(|error| ApiError::FactorFeedUnavailable(error.to_string()))?;
    parse_factor_feed_response(&response_text).map_err(ApiError::FactorFeedUnavailable)
}

/// Parses the feed envelope `{"data": [{<fuel>: <factor>, ...}]}`.
///
/// The feed has no geothermal entry; geothermal rates as zero.
pub fn parse_factor_feed_response(response_text: &str) -> Result<BaselineFactors, String> {
    let response = serde_json::from_str(response_text)
        .or_else(|error| Err(format!("failed to parse response: {}", error)))?;
    let response_object = match response {
        Value::Object(object) => object,
        _ => return Err("unexpected response content".to_string()),
    };
    let data = match response_object
        .get("data")
        .ok_or("'data' field missing in response".to_string())?
    {
        Value::Array(data) => data,
        _ => return Err("unexpected type for 'data' in response".to_string()),
    };
    let entry = match data
        .first()
        .ok_or("empty 'data' array in response".to_string())?
    {
        Value::Object(entry) => entry,
        _ => return Err("unexpected type for factor entry in response".to_string()),
    };
    Ok(BaselineFactors {
        nuclear: fuel_factor(entry, "Nuclear")?,
        coal: fuel_factor(entry, "Coal")?,
        oil: fuel_factor(entry, "Oil")?,
        gas: fuel_factor(entry, "Gas (Open Cycle)")?,
        hydro: fuel_factor(entry, "Hydro")?,
        biomass: fuel_factor(entry, "Biomass")?,
        solar: fuel_factor(entry, "Solar")?,
        wind: fuel_factor(entry, "Wind")?,
        pumped_storage: fuel_factor(entry, "Pumped Storage")?,
        geothermal: 0.0,
    })
}

fn fuel_factor(entry: &serde_json::Map<String, Value>, fuel: &str) -> Result<f64, String> {
    match entry
        .get(fuel)
        .ok_or(format!("'{}' factor missing in response", fuel))?
    {
        Value::Number(factor) => factor
            .as_f64()
            .ok_or(format!("failed to parse '{}' factor as float", fuel)),
        _ => Err(format!("unexpected type for '{}' factor", fuel)),
    }
}

/// Derives one coefficient per reported source from the baseline table.
///
/// Pure; fetching the baseline is the caller's concern, so the arithmetic
/// stays testable without a network.
pub fn resolve(
    config: &UtilitySourceConfig,
    baseline: &BaselineFactors,
) -> ApiResult<IntensityFactors> {
    let mut factors = IndexMap::new();
    for source in config.sources().iter().copied() {
        let factor = match source {
            GenerationSource::Nuclear => baseline.nuclear,
            GenerationSource::Fossil => fossil_composite(config.fuel_weights(), baseline)
                .map_err(|reason| ApiError::InvalidFuelWeights {
                    utility: config.utility().name().to_string(),
                    reason,
                })?,
            GenerationSource::Hydro => baseline.hydro,
            GenerationSource::Geothermal => baseline.geothermal,
            GenerationSource::Biomass => baseline.biomass,
            GenerationSource::SolarOutput => baseline.solar,
            GenerationSource::WindOutput => baseline.wind,
            GenerationSource::PumpedStorage => match config.policy_for(source) {
                FlowPolicy::FixedFactor(fixed) => fixed,
                FlowPolicy::Always | FlowPolicy::PositiveOnly => baseline.pumped_storage,
            },
            GenerationSource::Interconnectors => match config.policy_for(source) {
                FlowPolicy::FixedFactor(fixed) => fixed,
                // No baseline fuel maps to imports.
                FlowPolicy::Always | FlowPolicy::PositiveOnly => INTERCONNECTOR_PLACEHOLDER,
            },
        };
        factors.insert(source, factor);
    }
    Ok(IntensityFactors { factors })
}

/// Capacity-weighted mean of the three thermal sub-fuel baselines.
pub fn fossil_composite(
    fuel_weights: &FuelWeights,
    baseline: &BaselineFactors,
) -> Result<f64, String> {
    let total = fuel_weights.total();
    if total == 0.0 {
        return Err("thermal fuel weights should not sum to zero".to_string());
    }
    Ok((baseline.coal * fuel_weights.coal()
        + baseline.oil * fuel_weights.oil()
        + baseline.gas * fuel_weights.lng())
        / total)
}
