use super::{Utility, UtilitySourceConfig};
use crate::sources::{FlowPolicy, FuelWeights, GenerationSource};

/// Kansai Electric Power Company.
pub fn config() -> Result<UtilitySourceConfig, String> {
    // Thermal energy percentages:
    // https://www.kepco.co.jp/english/corporate/list/report/pdf/e2019.pdf
    let fuel_weights = FuelWeights::try_new(37.0, 9.0, 18.0)?;
    UtilitySourceConfig::try_new(
        Utility::Kepco,
        "MWh",
        GenerationSource::ALL.to_vec(),
        fuel_weights,
        // Pumped storage keeps its signed volume and the baseline factor here.
        FlowPolicy::Always,
        // Kansai imports heavily; the neighbouring mix runs fossil-rich.
        FlowPolicy::FixedFactor(850.0),
    )
}
