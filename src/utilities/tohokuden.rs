use super::{Utility, UtilitySourceConfig};
use crate::sources::{FlowPolicy, FuelWeights, GenerationSource};

/// Tohoku Electric Power Company.
pub fn config() -> Result<UtilitySourceConfig, String> {
    // Thermal energy percentages:
    // https://www.tohoku-epco.co.jp/ir/report/factbook/pdf/fact01.pdf
    let fuel_weights = FuelWeights::try_new(24.0, 2.0, 23.0)?;
    UtilitySourceConfig::try_new(
        Utility::Tohokuden,
        "MWh",
        GenerationSource::ALL.to_vec(),
        fuel_weights,
        // Appears to always get charged when renewables are available.
        FlowPolicy::FixedFactor(0.0),
        FlowPolicy::FixedFactor(500.0),
    )
}
