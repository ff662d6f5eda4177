//! Dataset loading
//!
//! The six source tables are read once into an immutable [`DataStore`]
//! which is then passed by reference to every analysis.

pub mod error;
pub mod loader;

pub use error::DataError;
pub use loader::{load_table, read_table, TableFormat};

use crate::config::DataConfig;
use crate::models::{Cohort, CohortTables, Dataset, SeriesTable};

/// All loaded tables, read-only for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    incidence: CohortTables,
    mortality: CohortTables,
    risk_factors: CohortTables,
}

impl DataStore {
    /// Assemble a store from already loaded tables
    #[must_use]
    pub fn new(incidence: CohortTables, mortality: CohortTables, risk_factors: CohortTables) -> Self {
        Self {
            incidence,
            mortality,
            risk_factors,
        }
    }

    /// Load every table named in the configuration
    ///
    /// Any missing or malformed file aborts the load.
    pub fn load(config: &DataConfig) -> Result<Self, DataError> {
        let load = |dataset: Dataset| -> Result<CohortTables, DataError> {
            let format = match dataset {
                Dataset::Incidence | Dataset::Mortality => TableFormat::CANCER,
                Dataset::RiskFactors => TableFormat::RISK_FACTORS,
            };
            Ok(CohortTables {
                female: load_table(&config.path(dataset, Cohort::Female), format)?,
                male: load_table(&config.path(dataset, Cohort::Male), format)?,
            })
        };

        let store = Self {
            incidence: load(Dataset::Incidence)?,
            mortality: load(Dataset::Mortality)?,
            risk_factors: load(Dataset::RiskFactors)?,
        };

        tracing::info!(
            data_dir = %config.data_dir.display(),
            incidence = store.incidence.variables().len(),
            mortality = store.mortality.variables().len(),
            risk_factors = store.risk_factors.variables().len(),
            "Datasets loaded"
        );

        Ok(store)
    }

    /// Both cohort tables of a dataset
    #[must_use]
    pub fn tables(&self, dataset: Dataset) -> &CohortTables {
        match dataset {
            Dataset::Incidence => &self.incidence,
            Dataset::Mortality => &self.mortality,
            Dataset::RiskFactors => &self.risk_factors,
        }
    }

    /// One table of a dataset
    #[must_use]
    pub fn table(&self, dataset: Dataset, cohort: Cohort) -> &SeriesTable {
        self.tables(dataset).get(cohort)
    }
}
