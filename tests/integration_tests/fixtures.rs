//! Fixtures for integration tests

use std::path::{Path, PathBuf};

use oncotrend::analytics::{AnalysisResult, CurveSmoother};
use oncotrend::config::Config;
use oncotrend::data::DataStore;
use tempfile::TempDir;

use crate::common;

/// Testis cancer with a single reported year (men only)
pub const SPARSE_INCIDENCE_M: &str = ";Krebs gesamt (C00-C97 ohne C44);Hoden (C62);\n\
2000;560,0;;\n\
2001;552,0;;\n\
2002;545,5;;\n\
2003;540,0;;\n\
2004;531,0;4,1;\n";

/// Risk-factor table with a non-numeric cell
pub const MALFORMED_RISK_FACTORS: &str = "Jahr,Rauchen\n2000,24.0\n2001,k.A.\n";

/// Smoother returning its input unchanged
pub struct IdentitySmoother;

impl CurveSmoother for IdentitySmoother {
    fn smooth(&self, points: &[(f64, f64)], _fraction: f64) -> AnalysisResult<Vec<(f64, f64)>> {
        Ok(points.to_vec())
    }
}

/// Temporary data directory with the complete fixture dataset
pub struct DataDir {
    pub dir: TempDir,
}

impl DataDir {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        common::write_data_dir(dir.path());
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.data.data_dir = self.path().to_path_buf();
        config
    }

    pub fn load(&self) -> DataStore {
        DataStore::load(&self.config().data).expect("fixture dataset must load")
    }
}
