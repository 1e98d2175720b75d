use super::{Utility, UtilitySourceConfig};
use crate::factors::BaselineFactors;
use crate::sources::{FlowPolicy, FuelWeights, GenerationSource};

/// Okinawa Electric Power Company. The island grid runs without nuclear,
/// geothermal, pumped storage or interconnection, and rates its fuels from a
/// locally published table instead of the feed.
pub fn config() -> Result<UtilitySourceConfig, String> {
    // Thermal energy percentages:
    // https://www.okiden.co.jp/shared/pdf/ir/ar/ar2017/180516_02.pdf
    let fuel_weights = FuelWeights::try_new(21.0, 13.0, 61.0)?;
    let config = UtilitySourceConfig::try_new(
        Utility::Okiden,
        "MWh",
        vec![
            GenerationSource::Fossil,
            GenerationSource::Hydro,
            GenerationSource::Biomass,
            GenerationSource::SolarOutput,
            GenerationSource::WindOutput,
        ],
        fuel_weights,
        FlowPolicy::Always,
        FlowPolicy::Always,
    )?;
    // "For Japan" factors from the Energia CSR report, page 9; biomass from
    // the UK baseline since the report omits it.
    Ok(config.with_local_baseline(BaselineFactors {
        nuclear: 19.0,
        coal: 943.0,
        oil: 738.0,
        gas: 599.0,
        hydro: 11.0,
        biomass: 120.0,
        solar: 38.0,
        wind: 26.0,
        pumped_storage: 0.0,
        geothermal: 13.0,
    }))
}
