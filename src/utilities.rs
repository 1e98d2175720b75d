use crate::errors::ApiError;
use crate::factors::BaselineFactors;
use crate::sources::{FlowPolicy, FuelWeights, GenerationSource};
use indexmap::IndexMap;

pub mod cepco;
pub mod chuden;
pub mod hepco;
pub mod kepco;
pub mod kyuden;
pub mod okiden;
pub mod rikuden;
pub mod tepco;
pub mod tohokuden;
pub mod yonden;

/// The ten regional grid operators.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Utility {
    Hepco,
    Tohokuden,
    Tepco,
    Chuden,
    Rikuden,
    Kepco,
    Cepco,
    Yonden,
    Kyuden,
    Okiden,
}

impl Utility {
    pub const ALL: [Utility; 10] = [
        Utility::Hepco,
        Utility::Tohokuden,
        Utility::Tepco,
        Utility::Chuden,
        Utility::Rikuden,
        Utility::Kepco,
        Utility::Cepco,
        Utility::Yonden,
        Utility::Kyuden,
        Utility::Okiden,
    ];

    /// Identifier used in request paths and data file names.
    pub fn name(&self) -> &'static str {
        match self {
            Utility::Hepco => "hepco",
            Utility::Tohokuden => "tohokuden",
            Utility::Tepco => "tepco",
            Utility::Chuden => "chuden",
            Utility::Rikuden => "rikuden",
            Utility::Kepco => "kepco",
            Utility::Cepco => "cepco",
            Utility::Yonden => "yonden",
            Utility::Kyuden => "kyuden",
            Utility::Okiden => "okiden",
        }
    }

    pub fn from_name(name: &str) -> Result<Utility, ApiError> {
        Utility::ALL
            .iter()
            .copied()
            .find(|utility| utility.name() == name)
            .ok_or_else(|| ApiError::UnknownUtility(name.to_string()))
    }
}

/// Static description of one operator's reported sources and conventions.
#[derive(Clone, Debug)]
pub struct UtilitySourceConfig {
    utility: Utility,
    column_prefix: &'static str,
    sources: Vec<GenerationSource>,
    fuel_weights: FuelWeights,
    pumped_storage: FlowPolicy,
    interconnectors: FlowPolicy,
    local_baseline: Option<BaselineFactors>,
}

impl UtilitySourceConfig {
    pub fn try_new(
        utility: Utility,
        column_prefix: &'static str,
        sources: Vec<GenerationSource>,
        fuel_weights: FuelWeights,
        pumped_storage: FlowPolicy,
        interconnectors: FlowPolicy,
    ) -> Result<Self, String> {
        UtilitySourceConfig::check_fuel_weights(&sources, &fuel_weights)?;
        UtilitySourceConfig::check_policy(GenerationSource::PumpedStorage, pumped_storage, &sources)?;
        UtilitySourceConfig::check_policy(
            GenerationSource::Interconnectors,
            interconnectors,
            &sources,
        )?;
        Ok(UtilitySourceConfig {
            utility,
            column_prefix,
            sources,
            fuel_weights,
            pumped_storage,
            interconnectors,
            local_baseline: None,
        })
    }

    /// Pins the operator to a locally published baseline table instead of the feed.
    pub fn with_local_baseline(mut self, baseline: BaselineFactors) -> Self {
        self.local_baseline = Some(baseline);
        self
    }

    fn check_fuel_weights(
        sources: &[GenerationSource],
        fuel_weights: &FuelWeights,
    ) -> Result<(), String> {
        if sources.contains(&GenerationSource::Fossil) && fuel_weights.total() == 0.0 {
            return Err("thermal fuel weights should not sum to zero".to_string());
        }
        Ok(())
    }

    fn check_policy(
        source: GenerationSource,
        policy: FlowPolicy,
        sources: &[GenerationSource],
    ) -> Result<(), String> {
        if policy != FlowPolicy::Always && !sources.contains(&source) {
            return Err(format!(
                "{} policy configured but the source is not reported",
                source.column_key()
            ));
        }
        Ok(())
    }

    pub fn utility(&self) -> Utility {
        self.utility
    }

    pub fn column_prefix(&self) -> &'static str {
        self.column_prefix
    }

    pub fn sources(&self) -> &[GenerationSource] {
        &self.sources
    }

    pub fn fuel_weights(&self) -> &FuelWeights {
        &self.fuel_weights
    }

    pub fn local_baseline(&self) -> Option<&BaselineFactors> {
        self.local_baseline.as_ref()
    }

    /// Contribution policy for a source. Plain generation always counts as reported;
    /// only the net-flow sources carry configured policies.
    pub fn policy_for(&self, source: GenerationSource) -> FlowPolicy {
        match source {
            GenerationSource::PumpedStorage => self.pumped_storage,
            GenerationSource::Interconnectors => self.interconnectors,
            _ => FlowPolicy::Always,
        }
    }

    /// Full column name for a source in this operator's harvested files.
    pub fn column_name(&self, source: GenerationSource) -> String {
        format!("{}_{}", self.column_prefix, source.column_key())
    }
}

/// Immutable registry of every operator's configuration, built once at startup.
#[derive(Clone, Debug)]
pub struct UtilityRegistry {
    configs: IndexMap<Utility, UtilitySourceConfig>,
}

impl UtilityRegistry {
    /// Builds and validates all ten configurations. A failure here is a
    /// configuration bug and should abort startup.
    pub fn try_new() -> Result<Self, ApiError> {
        let mut configs = IndexMap::new();
        for utility in Utility::ALL {
            let config = match utility {
                Utility::Hepco => hepco::config(),
                Utility::Tohokuden => tohokuden::config(),
                Utility::Tepco => tepco::config(),
                Utility::Chuden => chuden::config(),
                Utility::Rikuden => rikuden::config(),
                Utility::Kepco => kepco::config(),
                Utility::Cepco => cepco::config(),
                Utility::Yonden => yonden::config(),
                Utility::Kyuden => kyuden::config(),
                Utility::Okiden => okiden::config(),
            }
            .map_err(|reason| ApiError::InvalidFuelWeights {
                utility: utility.name().to_string(),
                reason,
            })?;
            configs.insert(utility, config);
        }
        Ok(UtilityRegistry { configs })
    }

    pub fn config_for(&self, utility: Utility) -> &UtilitySourceConfig {
        // try_new inserts every variant, so the lookup cannot miss.
        &self.configs[&utility]
    }
}
