//! Settings management for CLI set/unset commands.
//!
//! Each `config.toml` key has a [`SettingHandler`] in the [`SettingRegistry`].
//! Handlers only touch an in-memory [`Config`]; [`set_setting`] and
//! [`unset_setting`] load and save the file around them.

pub mod error;
pub mod handlers;
pub mod registry;

use std::path::Path;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::data::Config;

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Validate `args` and store them. Returns the message to display.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Clear the value so the default applies again.
    fn unset(&self, config: &mut Config) -> String;
}

pub fn set_setting(path: &Path, key: &str, args: &[String]) -> Result<String, SettingError> {
    let registry = SettingRegistry::new();
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    update_config(path, |config| handler.set(args, config))
}

pub fn unset_setting(path: &Path, key: &str) -> Result<String, SettingError> {
    let registry = SettingRegistry::new();
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    update_config(path, |config| Ok(handler.unset(config)))
}

/// Load, mutate and save the config file; nothing is written if `f` fails.
fn update_config<F>(path: &Path, f: F) -> Result<String, SettingError>
where
    F: FnOnce(&mut Config) -> Result<String, SettingError>,
{
    let mut config =
        Config::load_from_path(path).map_err(|e| SettingError::ConfigError(e.to_string()))?;
    let message = f(&mut config)?;
    config
        .save_to_path(path)
        .map_err(|e| SettingError::ConfigError(e.to_string()))?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::data::BackendKind;
    use tempfile::tempdir;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn set_and_unset_round_trip_through_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let message = set_setting(&path, "system-prompt", &args(&["Be", "brief."])).unwrap();
        assert_eq!(message, "✅ Set system-prompt to: Be brief.");
        set_setting(&path, "backend", &args(&["Ollama"])).unwrap();
        set_setting(&path, "temperature", &args(&["0.7"])).unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.system_prompt.as_deref(), Some("Be brief."));
        assert_eq!(config.backend, Some(BackendKind::Ollama));
        assert_eq!(config.temperature, Some(0.7));

        unset_setting(&path, "temperature").unwrap();
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.temperature, None);
        assert_eq!(config.backend, Some(BackendKind::Ollama));
    }

    #[test]
    fn invalid_values_leave_the_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert!(matches!(
            set_setting(&path, "temperature", &args(&["1.5"])),
            Err(SettingError::InvalidTemperature(_))
        ));
        assert!(matches!(
            set_setting(&path, "temperature", &args(&["warm"])),
            Err(SettingError::InvalidTemperature(_))
        ));
        assert!(matches!(
            set_setting(&path, "backend", &args(&["anthropic"])),
            Err(SettingError::InvalidBackend(_))
        ));
        assert!(matches!(
            set_setting(&path, "host", &args(&[])),
            Err(SettingError::MissingArgs { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let error = set_setting(&path, "theme", &args(&["dark"])).unwrap_err();
        assert!(matches!(error, SettingError::UnknownKey(ref key) if key == "theme"));
        assert!(matches!(
            unset_setting(&path, "theme"),
            Err(SettingError::UnknownKey(_))
        ));
    }

    #[test]
    fn every_config_field_has_a_handler() {
        let registry = SettingRegistry::new();
        for key in [
            "backend",
            "host",
            "openai-model",
            "ollama-model",
            "system-prompt",
            "temperature",
            "api-key-env",
        ] {
            assert_eq!(registry.get(key).map(|h| h.key()), Some(key));
        }
    }
}
