/// Generation and flow categories reported by every regional operator.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GenerationSource {
    Nuclear,
    Fossil,
    Hydro,
    Geothermal,
    Biomass,
    SolarOutput,
    WindOutput,
    PumpedStorage,
    Interconnectors,
}

impl GenerationSource {
    pub const ALL: [GenerationSource; 9] = [
        GenerationSource::Nuclear,
        GenerationSource::Fossil,
        GenerationSource::Hydro,
        GenerationSource::Geothermal,
        GenerationSource::Biomass,
        GenerationSource::SolarOutput,
        GenerationSource::WindOutput,
        GenerationSource::PumpedStorage,
        GenerationSource::Interconnectors,
    ];

    /// Column key used in the harvested generation files, without the unit prefix.
    pub fn column_key(&self) -> &'static str {
        match self {
            GenerationSource::Nuclear => "nuclear",
            GenerationSource::Fossil => "fossil",
            GenerationSource::Hydro => "hydro",
            GenerationSource::Geothermal => "geothermal",
            GenerationSource::Biomass => "biomass",
            GenerationSource::SolarOutput => "solar_output",
            GenerationSource::WindOutput => "wind_output",
            GenerationSource::PumpedStorage => "pumped_storage",
            GenerationSource::Interconnectors => "interconnectors",
        }
    }

    /// True for sources whose reported volume is a net flow and may go negative.
    pub fn is_net_flow(&self) -> bool {
        matches!(
            self,
            GenerationSource::PumpedStorage | GenerationSource::Interconnectors
        )
    }
}

/// How a source's reported volume and emission factor enter the weighted average.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlowPolicy {
    /// Signed volume as reported, factor from the resolved factor set.
    Always,
    /// Negative volumes contribute nothing, factor from the resolved factor set.
    PositiveOnly,
    /// Negative volumes contribute nothing, factor pinned to a constant.
    FixedFactor(f64),
}

impl FlowPolicy {
    /// Volume that enters both the numerator and the denominator of the average.
    pub fn contribution(&self, volume: f64) -> f64 {
        match self {
            FlowPolicy::Always => volume,
            FlowPolicy::PositiveOnly | FlowPolicy::FixedFactor(..) => volume.max(0.0),
        }
    }
}

/// Share of each thermal fuel in a utility's fossil fleet.
///
/// The shares are relative weights, not percentages. Capacity figures in MW
/// work just as well as unit counts since only the ratios matter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuelWeights {
    lng: f64,
    oil: f64,
    coal: f64,
}

impl FuelWeights {
    pub fn try_new(lng: f64, oil: f64, coal: f64) -> Result<Self, String> {
        FuelWeights::check_weight("LNG", lng)?;
        FuelWeights::check_weight("oil", oil)?;
        FuelWeights::check_weight("coal", coal)?;
        Ok(FuelWeights { lng, oil, coal })
    }

    fn check_weight(fuel: &str, weight: f64) -> Result<(), String> {
        if !weight.is_finite() {
            return Err(format!("{} weight should be finite", fuel));
        }
        if weight < 0.0 {
            return Err(format!("{} weight should be non-negative", fuel));
        }
        Ok(())
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub fn oil(&self) -> f64 {
        self.oil
    }

    pub fn coal(&self) -> f64 {
        self.coal
    }

    pub fn total(&self) -> f64 {
        self.lng + self.oil + self.coal
    }
}
