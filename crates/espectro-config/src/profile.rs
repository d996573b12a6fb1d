//! Analysis profile schema and file I/O.
//!
//! A profile is a TOML file naming every analyzer setting. Missing fields
//! fall back to the analyzer defaults, so a profile only needs the values it
//! changes:
//!
//! ```toml
//! name = "Speech"
//! frame_size = 512
//! overlap = 256
//! scale = "mel"
//! window = "hamming"
//!
//! [normal_range]
//! min_hz = 300.0
//! max_hz = 3400.0
//! min_db = -120.0
//! max_db = -6.0
//! ```

use std::fs;
use std::path::Path;

use espectro_analysis::{
    AnalyzerSettings, NormalRange, ScaleType, StreamingAnalyzer, TailPolicy, WindowFunction,
};
use espectro_core::{AudioFormat, PaddingPolicy};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths;
use crate::validation::{ValidationResult, is_one_of, validate_config};

/// Serializable analyzer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Profile name
    #[serde(default = "default_name")]
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// FFT frame size in samples, a power of two
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,

    /// Samples shared between consecutive frames
    #[serde(default)]
    pub overlap: usize,

    /// Average all channels into one before analysis
    #[serde(default = "default_true")]
    pub merge_channels: bool,

    /// Frequency scale: linear, logarithmic, mel, bark or erb
    #[serde(default = "default_scale")]
    pub scale: String,

    /// Number of scale filters, `frame_size / 2` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_filters: Option<usize>,

    /// Window function name
    #[serde(default = "default_window")]
    pub window: String,

    /// Alpha for the blackman and gauss windows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_alpha: Option<f64>,

    /// Offset added to every level (dB)
    #[serde(default)]
    pub gain_db: f64,

    /// Dynamic range below full scale shown by consumers (dB)
    #[serde(default = "default_range_db")]
    pub range_db: f64,

    /// Final partial hop handling: "drop" or "pad"
    #[serde(default = "default_tail")]
    pub tail: String,

    /// Keep the time-domain frame samples alongside the spectra
    #[serde(default = "default_true")]
    pub retain_samples: bool,

    /// Where padding bytes sit in wide integer containers
    #[serde(default = "default_padding")]
    pub padding: String,

    /// Band and level bounds for alarm scans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_range: Option<NormalRangeConfig>,
}

/// Serializable [`NormalRange`] bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalRangeConfig {
    /// Lowest frequency checked (Hz)
    pub min_hz: f64,
    /// Highest frequency checked (Hz)
    pub max_hz: f64,
    /// Quietest acceptable level (dB)
    pub min_db: f64,
    /// Loudest acceptable level (dB)
    pub max_db: f64,
}

fn default_name() -> String {
    "Default".to_string()
}

fn default_frame_size() -> usize {
    512
}

fn default_true() -> bool {
    true
}

fn default_scale() -> String {
    "mel".to_string()
}

fn default_window() -> String {
    "hann".to_string()
}

fn default_range_db() -> f64 {
    140.0
}

fn default_tail() -> String {
    "drop".to_string()
}

fn default_padding() -> String {
    "least-significant".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: None,
            frame_size: default_frame_size(),
            overlap: 0,
            merge_channels: true,
            scale: default_scale(),
            num_filters: None,
            window: default_window(),
            window_alpha: None,
            gain_db: 0.0,
            range_db: default_range_db(),
            tail: default_tail(),
            retain_samples: true,
            padding: default_padding(),
            normal_range: None,
        }
    }
}

impl AnalysisConfig {
    /// Create a default profile with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Load a profile from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&contents)?;
        tracing::debug!(path = %path.display(), name = %config.name, "loaded analysis profile");
        Ok(config)
    }

    /// Parse a profile from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Save the profile to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let contents = self.to_toml()?;
        fs::write(path, contents).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), name = %self.name, "saved analysis profile");
        Ok(())
    }

    /// Serialize the profile to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load the first profile found by [`paths::find_config`], or the defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        match paths::find_config() {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!("no espectro.toml found, using default profile");
                Ok(Self::default())
            }
        }
    }

    /// Resolve a profile by name: a factory profile, then a file in the user
    /// profiles directory, then a literal path.
    pub fn load_named(name: &str) -> Result<Self, ConfigError> {
        if let Some(config) = crate::factory_profiles::get_factory_profile(name) {
            return Ok(config);
        }
        match paths::find_profile(name) {
            Some(path) => Self::load(path),
            None => Err(ConfigError::ProfileNotFound(name.to_string())),
        }
    }

    /// Check every field, collecting all problems.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_config(self)
    }

    /// Convert to analyzer settings, validating first.
    pub fn to_settings(&self) -> Result<AnalyzerSettings, ConfigError> {
        self.validate()?;

        let settings = AnalyzerSettings {
            frame_size: self.frame_size,
            overlap: self.overlap,
            merge_channels: self.merge_channels,
            scale: self.scale.parse::<ScaleType>()?,
            num_filters: self.num_filters,
            window: WindowFunction::from_name(&self.window, self.window_alpha)?,
            gain_db: self.gain_db,
            range_db: self.range_db,
            tail: if is_one_of(&self.tail, &["pad"]) {
                TailPolicy::Pad
            } else {
                TailPolicy::Drop
            },
            retain_samples: self.retain_samples,
            padding: if is_one_of(&self.padding, &["most-significant"]) {
                PaddingPolicy::MostSignificant
            } else {
                PaddingPolicy::LeastSignificant
            },
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Alarm bounds, when the profile defines them.
    pub fn normal_range(&self) -> Result<Option<NormalRange>, ConfigError> {
        self.normal_range
            .map(|r| NormalRange::new(r.min_hz, r.max_hz, r.min_db, r.max_db))
            .transpose()
            .map_err(ConfigError::from)
    }

    /// Build a streaming analyzer for `format` from this profile.
    pub fn analyzer(&self, format: AudioFormat) -> Result<StreamingAnalyzer, ConfigError> {
        Ok(StreamingAnalyzer::new(format, self.to_settings()?)?)
    }
}
