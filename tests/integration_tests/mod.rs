//! Integration tests module
//!
//! End-to-end tests over a complete on-disk dataset:
//! - CSV tables → data store → dashboard → text and JSON reports
//! - Error handling for missing files, short series and bad parameters

pub mod error_scenarios;
pub mod fixtures;
pub mod pipeline_test;
