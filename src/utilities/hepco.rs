use super::{Utility, UtilitySourceConfig};
use crate::sources::{FlowPolicy, FuelWeights, GenerationSource};

/// Hokkaido Electric Power Company.
pub fn config() -> Result<UtilitySourceConfig, String> {
    // Thermal energy percentages:
    // https://wwwc.hepco.co.jp/hepcowwwsite/english/ir/pdf/hepco_group_report_2019.pdf
    let fuel_weights = FuelWeights::try_new(6.5, 23.8, 25.9)?;
    UtilitySourceConfig::try_new(
        Utility::Hepco,
        "MWh",
        GenerationSource::ALL.to_vec(),
        fuel_weights,
        FlowPolicy::FixedFactor(0.06),
        // Import mix is not observable; placeholder pending a rolling average
        // of the neighbouring grids.
        FlowPolicy::FixedFactor(500.0),
    )
}
