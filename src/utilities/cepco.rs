use super::{Utility, UtilitySourceConfig};
use crate::sources::{FlowPolicy, FuelWeights, GenerationSource};

/// Chugoku Electric Power Company.
pub fn config() -> Result<UtilitySourceConfig, String> {
    // Thermal energy percentages:
    // https://www.energia.co.jp/corp/active/csr/kankyou/pdf/2019/csr-2019.pdf
    let fuel_weights = FuelWeights::try_new(
        0.285 + 1.4,
        0.35 + 0.35 + 0.5 + 0.35 + 0.5 + 0.7 + 0.4,
        1.0 + 0.156 + 0.259 + 0.5 + 0.5 + 0.175,
    )?;
    UtilitySourceConfig::try_new(
        Utility::Cepco,
        "MWh",
        GenerationSource::ALL.to_vec(),
        fuel_weights,
        FlowPolicy::FixedFactor(19.75),
        FlowPolicy::FixedFactor(500.0),
    )
}
