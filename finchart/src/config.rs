//! Configuration file discovery.

use std::fmt;
use std::path::{Path, PathBuf};

use finchart_common::{AppConfig, Result, load_config};

/// Configuration file name under the platform config directory.
pub const CONFIG_FILE: &str = "config.json5";

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from a file.
    File(PathBuf),
    /// No file found; built-in defaults.
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => f.write_str("defaults"),
        }
    }
}

/// `<config dir>/finchart/config.json5`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("finchart").join(CONFIG_FILE))
}

/// Load the configuration.
///
/// An explicit path must exist. Otherwise the default path is used when
/// present, and built-in defaults when not.
pub fn load_app_config(explicit: Option<&Path>) -> Result<(AppConfig, ConfigSource)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => path,
            None => return Ok((AppConfig::default(), ConfigSource::Defaults)),
        },
    };

    let config = load_config(&path)?;
    Ok((config, ConfigSource::File(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use finchart_common::{Error, ThemeMode};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_explicit_path_must_exist() {
        let result = load_app_config(Some(Path::new("/nonexistent/finchart.json5")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ theme: "light", locale: "de" }}"#).unwrap();

        let (config, source) = load_app_config(Some(file.path())).unwrap();
        assert_eq!(config.theme, ThemeMode::Light);
        assert_eq!(config.locale, "de");
        assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_config_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ timezone: "local" }"#).unwrap();

        let (config, _) = load_app_config(Some(&path)).unwrap();
        assert_eq!(config.timezone, finchart_common::TimeZoneMode::Local);
    }

    #[test]
    fn test_default_path_layout() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("finchart/config.json5"));
        }
    }
}
