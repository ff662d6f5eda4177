//! Unified error handling for the oncotrend crate
//!
//! This module provides a unified error type that consolidates all domain-specific
//! errors into a single `Error` enum, while maintaining the ability to use
//! domain-specific errors when needed.
//!
//! # Architecture
//!
//! - [`OncoErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for reporting
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use oncotrend::error::{Error, OncoErrorTrait};
//!
//! fn report(err: Error) {
//!     eprintln!("{}: {}", err.category().localized_desc(), err.localized_desc());
//! }
//! ```

use std::io;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::analytics::AnalysisError;
pub use crate::data::DataError;
pub use crate::risk::ModelError;

/// Common trait for all oncotrend error types
pub trait OncoErrorTrait: std::error::Error {
    /// Get localized description for user-facing messages
    fn localized_desc(&self) -> String;

    /// Get the error category
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Trend fitting, comparison and smoothing errors
    Analysis,
    /// Loading and parsing of source tables
    Data,
    /// Risk model and input encoding errors
    Model,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Get localized description for the category
    pub fn localized_desc(&self) -> String {
        match self {
            Self::Analysis => crate::i18n::t!("errors.category.analysis").to_string(),
            Self::Data => crate::i18n::t!("errors.category.data").to_string(),
            Self::Model => crate::i18n::t!("errors.category.model").to_string(),
            Self::Config => crate::i18n::t!("errors.category.config").to_string(),
            Self::Other => crate::i18n::t!("errors.category.other").to_string(),
        }
    }
}

/// Unified error type for the oncotrend crate
#[derive(Error, Debug)]
pub enum Error {
    /// Trend analysis errors
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Dataset loading errors
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Risk model errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl OncoErrorTrait for Error {
    fn localized_desc(&self) -> String {
        match self {
            Self::Analysis(e) => e.localized_desc(),
            Self::Data(e) => e.localized_desc(),
            Self::Model(e) => e.localized_desc(),
            Self::Io(e) => format!("{}: {e}", crate::i18n::t!("errors.io.error")),
            Self::Json(e) => format!("{}: {e}", crate::i18n::t!("errors.json.error")),
            Self::Config(msg) => format!("{}: {msg}", crate::i18n::t!("errors.config.error")),
            Self::Other { context, .. } => context.clone(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Analysis(_) => ErrorCategory::Analysis,
            Self::Data(_) | Self::Io(_) => ErrorCategory::Data,
            Self::Model(e) => match e {
                ModelError::InvalidInput { .. } => ErrorCategory::Config,
                _ => ErrorCategory::Model,
            },
            Self::Json(_) => ErrorCategory::Data,
            Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Check whether the error means a series was too short to analyze
    #[must_use]
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::Analysis(e) if e.is_insufficient_data())
    }
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            context: err.to_string(),
            source: None,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
