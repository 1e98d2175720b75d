use super::{Utility, UtilitySourceConfig};
use crate::sources::{FlowPolicy, FuelWeights, GenerationSource};

/// Hokuriku Electric Power Company.
pub fn config() -> Result<UtilitySourceConfig, String> {
    // Thermal energy percentages:
    // http://www.rikuden.co.jp/eng_ir/attach/integratedreport2019-1.pdf
    let fuel_weights = FuelWeights::try_new(
        0.4247,
        0.25 + 0.5 + 0.5,
        0.5 + 0.7 + 0.25 + 0.5 + 0.7 + 0.25 + 0.25,
    )?;
    UtilitySourceConfig::try_new(
        Utility::Rikuden,
        "MWh",
        GenerationSource::ALL.to_vec(),
        fuel_weights,
        FlowPolicy::FixedFactor(80.07),
        FlowPolicy::FixedFactor(500.0),
    )
}
