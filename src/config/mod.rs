//! Configuration management.
//!
//! The host (or the CLI) owns where configuration lives; the pipeline only
//! ever sees an explicit [`PromptScopeConfig`] value passed in at
//! construction time.

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration for promptscope.
#[derive(Debug, Clone)]
pub struct PromptScopeConfig {
    /// Gate for all capture activity.
    pub enabled: bool,
    /// Export immediately after each successful capture.
    pub auto_export: bool,
    /// Verbose structural diagnostics. No core-logic effect.
    pub debug_mode: bool,
    /// Pretty-print exported JSON (2-space indent) instead of compact.
    pub pretty_print: bool,
    /// Attach the `_rawChat` projection to captured records.
    pub include_raw_data: bool,
    /// Directory the file sink writes artifacts into.
    pub output_dir: PathBuf,
}

impl Default for PromptScopeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_export: false,
            debug_mode: false,
            pretty_print: true,
            include_raw_data: true,
            output_dir: PathBuf::from("prompt_exports"),
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Gate for all capture activity.
    pub enabled: Option<bool>,
    /// Export immediately after each capture.
    pub auto_export: Option<bool>,
    /// Verbose structural diagnostics.
    pub debug_mode: Option<bool>,
    /// Pretty-print exported JSON.
    pub pretty_print: Option<bool>,
    /// Attach the raw-chat projection.
    pub include_raw_data: Option<bool>,
    /// Artifact output directory.
    pub output_dir: Option<String>,
}

impl PromptScopeConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &std::path::Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: e.to_string(),
            })?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/promptscope/` on macOS)
    /// 2. XDG config dir (`~/.config/promptscope/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let platform_config = base_dirs
            .config_dir()
            .join("promptscope")
            .join("config.toml");
        if platform_config.exists() {
            if let Ok(config) = Self::load_from_file(&platform_config) {
                return config;
            }
        }

        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("promptscope")
            .join("config.toml");
        if xdg_config.exists() {
            if let Ok(config) = Self::load_from_file(&xdg_config) {
                return config;
            }
        }

        Self::default()
    }

    /// Applies a parsed config file over the defaults.
    #[must_use]
    pub fn from_config_file(file: ConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            enabled: file.enabled.unwrap_or(defaults.enabled),
            auto_export: file.auto_export.unwrap_or(defaults.auto_export),
            debug_mode: file.debug_mode.unwrap_or(defaults.debug_mode),
            pretty_print: file.pretty_print.unwrap_or(defaults.pretty_print),
            include_raw_data: file.include_raw_data.unwrap_or(defaults.include_raw_data),
            output_dir: file.output_dir.map_or(defaults.output_dir, PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_behavior() {
        let config = PromptScopeConfig::default();
        assert!(config.enabled);
        assert!(!config.auto_export);
        assert!(!config.debug_mode);
        assert!(config.pretty_print);
        assert!(config.include_raw_data);
    }

    #[test]
    fn test_config_file_overlays_defaults() {
        let file: ConfigFile = toml::from_str(
            r#"
            auto_export = true
            pretty_print = false
            output_dir = "/tmp/captures"
            "#,
        )
        .unwrap();

        let config = PromptScopeConfig::from_config_file(file);
        assert!(config.enabled);
        assert!(config.auto_export);
        assert!(!config.pretty_print);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/captures"));
    }

    #[test]
    fn test_load_from_missing_file_errors() {
        let result =
            PromptScopeConfig::load_from_file(std::path::Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "enabled = false\ndebug_mode = true\n").unwrap();

        let config = PromptScopeConfig::load_from_file(&path).unwrap();
        assert!(!config.enabled);
        assert!(config.debug_mode);
    }
}
