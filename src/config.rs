use crate::error::AssignError;
use crate::logic::PipelineOptions;
use crate::model::{WeightTable, DEFAULT_WEIGHTS};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub solver: SolverConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// One of `equal`, `lower`, `upper`; validated when building options
    pub bounds: String,
    pub no_custom_counts: bool,
    /// Costs of ranks 1 to 4
    pub weights: Vec<u64>,
    pub precheck_totals: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            bounds: "equal".to_string(),
            no_custom_counts: false,
            weights: DEFAULT_WEIGHTS.to_vec(),
            precheck_totals: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Environment variables, e.g. `PREF_ASSIGN_SOLVER__BOUNDS=lower` or
/// `PREF_ASSIGN_SOLVER__WEIGHTS=1,4,100,10000`
fn environment() -> config::Environment {
    config::Environment::with_prefix("PREF_ASSIGN")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("solver.weights")
}

impl AppConfig {
    /// Load configuration from defaults, `pref-assign.toml` and environment
    /// variables. When given, `path` (which must exist) replaces the default
    /// config file.
    pub fn load_from(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_layers(path, environment())
    }

    fn load_layers(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Add default configuration
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        config = match path {
            Some(path) => config.add_source(config::File::from(path).required(true)),
            None => config.add_source(config::File::with_name("pref-assign").required(false)),
        };

        config = config.add_source(environment);

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    pub fn weight_table(&self) -> Result<WeightTable, AssignError> {
        let costs: [u64; 4] = self.solver.weights.as_slice().try_into().map_err(|_| {
            AssignError::InvalidWeights(format!(
                "expected 4 costs, got {}",
                self.solver.weights.len()
            ))
        })?;
        WeightTable::new(costs)
    }

    /// Validated pipeline options; an unknown bound mode is rejected here
    pub fn pipeline_options(&self) -> Result<PipelineOptions, AssignError> {
        Ok(PipelineOptions {
            bounds: self.solver.bounds.parse()?,
            no_custom_counts: self.solver.no_custom_counts,
            weights: self.weight_table()?,
            precheck_totals: self.solver.precheck_totals,
        })
    }
}
