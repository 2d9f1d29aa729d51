//! Configuration file discovery, loading and validation.

use crate::error::ConfigError;
use crate::types::KilnConfig;
use std::path::{Path, PathBuf};

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "kiln.toml";

/// Walks up from `start` looking for the nearest `kiln.toml`.
///
/// Returns the path of the file, or `None` if no ancestor has one.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

/// Loads `<dir>/kiln.toml`, falling back to defaults when it doesn't exist.
pub fn load_config(dir: &Path) -> Result<KilnConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(KilnConfig::default());
    }
    load_config_file(&config_path)
}

/// Loads and validates the configuration file at `path`.
pub fn load_config_file(path: &Path) -> Result<KilnConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `kiln.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<KilnConfig, ConfigError> {
    let config: KilnConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configured values are usable.
fn validate_config(config: &KilnConfig) -> Result<(), ConfigError> {
    if config.cache.root.trim().is_empty() {
        return Err(ConfigError::MissingField("cache.root".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LogLevel, DEFAULT_CACHE_ROOT};

    #[test]
    fn parse_empty_config() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.cache.root, DEFAULT_CACHE_ROOT);
        assert!(config.cache.trace);
        assert_eq!(config.log.level, LogLevel::Warn);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[cache]
root = "/var/cache/kiln"
trace = false

[log]
level = "debug"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.cache.root, "/var/cache/kiln");
        assert!(!config.cache.trace);
        assert_eq!(config.log.level, LogLevel::Debug);
    }

    #[test]
    fn empty_root_errors() {
        let toml = r#"
[cache]
root = "  "
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let toml = "this is not valid toml {{{}}}";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_log_level_errors() {
        let toml = r#"
[log]
level = "loud"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.cache.root, DEFAULT_CACHE_ROOT);
    }

    #[test]
    fn io_error_from_nonexistent_file() {
        let err = load_config_file(Path::new("/nonexistent/dir/kiln.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "").unwrap();

        let found = find_config(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE));
    }
}
