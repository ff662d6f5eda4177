//! Analytics engine for trend analysis and interpretation
//!
//! - [`trend`] - OLS trend fitting and direction classification
//! - [`comparison`] - Cohort comparison and German narrative
//! - [`correlation`] - Percent-change correlation matrices
//! - [`lowess`] - Scatter data and LOWESS curve summaries

pub mod comparison;
pub mod correlation;
pub mod error;
pub mod lowess;
pub mod trend;

pub use comparison::{CohortComparator, CohortComparison, CohortTrend, JointPattern};
pub use correlation::{CorrelationEngine, CorrelationMatrix, PercentChangeFrame};
pub use error::{AnalysisError, AnalysisResult};
pub use self::lowess::{CurveSmoother, LowessSmoother, LowessSummary, ScatterPoint};
pub use trend::{TrendDirection, TrendFitter, TrendResult};
