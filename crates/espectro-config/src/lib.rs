//! Configuration management for espectro.
//!
//! This crate provides:
//! - [`AnalysisConfig`]: a TOML analysis profile mapping onto
//!   [`AnalyzerSettings`](espectro_analysis::AnalyzerSettings)
//! - Validation that reports every problem in a profile at once
//! - Cross-platform config paths and `espectro.toml` discovery
//! - Built-in factory profiles
//!
//! # Example
//!
//! ```rust
//! use espectro_config::{AnalysisConfig, get_factory_profile};
//!
//! let speech = get_factory_profile("speech").unwrap();
//! let settings = speech.to_settings().unwrap();
//! assert_eq!(settings.hop_size(), 256);
//!
//! let custom = AnalysisConfig::from_toml("frame_size = 2048\nscale = \"erb\"").unwrap();
//! assert_eq!(custom.to_settings().unwrap().filter_count(), 1024);
//! ```

mod error;
pub mod factory_profiles;
pub mod paths;
mod profile;
pub mod validation;

pub use error::ConfigError;
pub use factory_profiles::{
    factory_profile_names, factory_profiles, get_factory_profile, is_factory_profile,
};
pub use paths::{find_config, find_profile, user_config_dir, user_profiles_dir};
pub use profile::{AnalysisConfig, NormalRangeConfig};
pub use validation::{ValidationError, ValidationResult, validate_config};
