use crate::factors::IntensityFactors;
use crate::records::GenerationInterval;
use crate::utilities::UtilitySourceConfig;

/// Weighted-average carbon intensity of one interval, g CO2 per kWh.
///
/// Every reported source contributes its post-policy volume times its
/// coefficient, and the denominator sums the same post-policy volumes, so a
/// transient negative flow never inflates the total.
pub fn intensity_for_interval(
    interval: &GenerationInterval,
    factors: &IntensityFactors,
    config: &UtilitySourceConfig,
) -> f64 {
    let mut weighted = 0.0;
    let mut total = 0.0;
    for source in config.sources().iter().copied() {
        let contribution = config
            .policy_for(source)
            .contribution(interval.volume(source));
        weighted += contribution * factors.factor_for(source);
        total += contribution;
    }
    // Hokkaido's 2018-09-06 blackout is recorded as an all-zero hour; such an
    // interval rates zero rather than dividing by zero.
    if total == 0.0 {
        return 0.0;
    }
    weighted / total
}
