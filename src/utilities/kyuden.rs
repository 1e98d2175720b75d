use super::{Utility, UtilitySourceConfig};
use crate::sources::{FlowPolicy, FuelWeights, GenerationSource};

/// Kyushu Electric Power Company.
pub fn config() -> Result<UtilitySourceConfig, String> {
    // Thermal capacities in GW from the published plant list.
    let fuel_weights = FuelWeights::try_new(4.1, 1.5, 3.1)?;
    UtilitySourceConfig::try_new(
        Utility::Kyuden,
        "MWh",
        GenerationSource::ALL.to_vec(),
        fuel_weights,
        FlowPolicy::Always,
        FlowPolicy::FixedFactor(500.0),
    )
}
