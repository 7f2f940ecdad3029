//! Configuration module.
//!
//! Provides the build parameter record and the scanning strategy enumeration.

mod build_config;

pub use build_config::{BuildConfig, ScanStrategy, MAX_LAYERS};
