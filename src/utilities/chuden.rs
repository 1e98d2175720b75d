use super::{Utility, UtilitySourceConfig};
use crate::sources::{FlowPolicy, FuelWeights, GenerationSource};

/// Chubu Electric Power Company.
pub fn config() -> Result<UtilitySourceConfig, String> {
    // Thermal capacities in GW from the published plant list; the fleet is
    // dominated by the Kawagoe, Chita and Joetsu LNG stations.
    let fuel_weights = FuelWeights::try_new(17.2, 1.1, 4.1)?;
    UtilitySourceConfig::try_new(
        Utility::Chuden,
        "MWh",
        GenerationSource::ALL.to_vec(),
        fuel_weights,
        FlowPolicy::Always,
        FlowPolicy::FixedFactor(500.0),
    )
}
