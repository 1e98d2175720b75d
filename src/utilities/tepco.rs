use super::{Utility, UtilitySourceConfig};
use crate::sources::{FlowPolicy, FuelWeights, GenerationSource};

/// Tokyo Electric Power Company.
pub fn config() -> Result<UtilitySourceConfig, String> {
    // Station capacities in GW: https://www7.tepco.co.jp/fp/thermal-power/list-e.html
    let fuel_weights = FuelWeights::try_new(
        4.38 + 3.6 + 3.6 + 5.16 + 3.42 + 3.541 + 1.15 + 2.0 + 1.14,
        5.66 + 1.05 + 4.4,
        2.0,
    )?;
    UtilitySourceConfig::try_new(
        Utility::Tepco,
        "daMWh",
        GenerationSource::ALL.to_vec(),
        fuel_weights,
        // Not always charged when renewables are available; average of observed use.
        FlowPolicy::FixedFactor(80.07),
        // Import mix is not observable; placeholder pending a rolling average
        // of the neighbouring grids.
        FlowPolicy::FixedFactor(500.0),
    )
}
