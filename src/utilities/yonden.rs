use super::{Utility, UtilitySourceConfig};
use crate::sources::{FlowPolicy, FuelWeights, GenerationSource};

/// Shikoku Electric Power Company.
pub fn config() -> Result<UtilitySourceConfig, String> {
    // Station capacities in GW:
    // https://www.yonden.co.jp/english/assets/pdf/ir/tools/ann_r/annual_e_2019.pdf
    let fuel_weights = FuelWeights::try_new(
        0.296 + 0.289 + 0.35,
        0.45 + 0.45 + 0.45,
        0.156 + 0.25 + 0.7,
    )?;
    UtilitySourceConfig::try_new(
        Utility::Yonden,
        "daMWh",
        GenerationSource::ALL.to_vec(),
        fuel_weights,
        // Not always charged when renewables are available; average of observed use.
        FlowPolicy::FixedFactor(8.57),
        FlowPolicy::FixedFactor(500.0),
    )
}
