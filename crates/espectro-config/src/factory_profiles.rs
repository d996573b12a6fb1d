//! Built-in analysis profiles.
//!
//! Each profile is embedded as TOML and parsed on demand, so the same text
//! doubles as an example of the file format.

use crate::profile::AnalysisConfig;

/// Names of all factory profiles.
pub static FACTORY_PROFILE_NAMES: &[&str] = &["default", "speech", "music", "detail"];

const DEFAULT_TOML: &str = r#"
name = "Default"
description = "512-point Hann frames on 256 mel filters"
frame_size = 512
overlap = 0
scale = "mel"
window = "hann"
"#;

const SPEECH_TOML: &str = r#"
name = "Speech"
description = "Short overlapping frames with the telephone band as the normal range"
frame_size = 512
overlap = 256
scale = "mel"
num_filters = 80
window = "hamming"
range_db = 100.0

[normal_range]
min_hz = 300.0
max_hz = 3400.0
min_db = -120.0
max_db = -6.0
"#;

const MUSIC_TOML: &str = r#"
name = "Music"
description = "Long frames on a logarithmic scale with per-channel analysis"
frame_size = 4096
overlap = 3072
merge_channels = false
scale = "logarithmic"
num_filters = 512
window = "blackman"
window_alpha = 0.16
tail = "pad"
"#;

const DETAIL_TOML: &str = r#"
name = "Detail"
description = "Linear full-resolution view for inspecting individual bins"
frame_size = 8192
overlap = 4096
scale = "linear"
num_filters = 4096
window = "gauss"
window_alpha = 0.25
range_db = 180.0
retain_samples = false
"#;

const FACTORY_PROFILES_TOML: &[(&str, &str)] = &[
    ("default", DEFAULT_TOML),
    ("speech", SPEECH_TOML),
    ("music", MUSIC_TOML),
    ("detail", DETAIL_TOML),
];

/// Parse every factory profile. Entries that fail to parse are skipped.
pub fn factory_profiles() -> Vec<AnalysisConfig> {
    FACTORY_PROFILES_TOML
        .iter()
        .filter_map(|(name, toml)| parse_profile(name, toml))
        .collect()
}

/// Look up a factory profile by name, ignoring case.
pub fn get_factory_profile(name: &str) -> Option<AnalysisConfig> {
    FACTORY_PROFILES_TOML
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .and_then(|(n, toml)| parse_profile(n, toml))
}

/// Names of all factory profiles.
pub fn factory_profile_names() -> &'static [&'static str] {
    FACTORY_PROFILE_NAMES
}

/// Whether `name` refers to a factory profile.
pub fn is_factory_profile(name: &str) -> bool {
    FACTORY_PROFILE_NAMES
        .iter()
        .any(|n| n.eq_ignore_ascii_case(name))
}

fn parse_profile(name: &str, toml: &str) -> Option<AnalysisConfig> {
    match AnalysisConfig::from_toml(toml) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(profile = name, error = %e, "factory profile failed to parse");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use espectro_analysis::{ScaleType, TailPolicy, WindowFunction};

    #[test]
    fn all_factory_profiles_parse_and_validate() {
        let profiles = factory_profiles();
        assert_eq!(profiles.len(), FACTORY_PROFILE_NAMES.len());
        for profile in &profiles {
            assert!(
                profile.to_settings().is_ok(),
                "factory profile '{}' is invalid",
                profile.name
            );
        }
    }

    #[test]
    fn names_table_matches_toml_table() {
        let table: Vec<&str> = FACTORY_PROFILES_TOML.iter().map(|(n, _)| *n).collect();
        assert_eq!(table, FACTORY_PROFILE_NAMES);
    }

    #[test]
    fn default_profile_matches_defaults() {
        let profile = get_factory_profile("default").unwrap();
        assert_eq!(
            profile.to_settings().unwrap(),
            AnalysisConfig::default().to_settings().unwrap()
        );
    }

    #[test]
    fn lookup_ignores_case() {
        let profile = get_factory_profile("SPEECH").unwrap();
        assert_eq!(profile.name, "Speech");
        assert!(profile.normal_range.is_some());
        assert!(is_factory_profile("Music"));
        assert!(!is_factory_profile("podcast"));
        assert!(get_factory_profile("podcast").is_none());
    }

    #[test]
    fn music_profile_settings() {
        let settings = get_factory_profile("music").unwrap().to_settings().unwrap();
        assert_eq!(settings.frame_size, 4096);
        assert_eq!(settings.hop_size(), 1024);
        assert!(!settings.merge_channels);
        assert_eq!(settings.scale, ScaleType::Logarithmic);
        assert_eq!(settings.window, WindowFunction::Blackman { alpha: 0.16 });
        assert_eq!(settings.tail, TailPolicy::Pad);
    }

    #[test]
    fn detail_profile_drops_samples() {
        let settings = get_factory_profile("detail").unwrap().to_settings().unwrap();
        assert!(!settings.retain_samples);
        assert_eq!(settings.filter_count(), 4096);
    }
}
