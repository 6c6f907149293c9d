//! Handlers for every `config.toml` key.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::SettingHandler;
use crate::core::config::data::{BackendKind, Config};
use crate::core::config::defaults::TEMPERATURE_RANGE;

/// Data-driven handler for free-text settings.
pub struct StringHandler {
    key: &'static str,
    hint: &'static str,
    example: &'static str,
    field: fn(&mut Config) -> &mut Option<String>,
}

impl SettingHandler for StringHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let value = args.join(" ").trim().to_string();
        if value.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        }
        let message = format!("✅ Set {} to: {value}", self.key);
        *(self.field)(config) = Some(value);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> String {
        *(self.field)(config) = None;
        format!("✅ Unset {} (will use default)", self.key)
    }
}

pub fn host_handler() -> StringHandler {
    StringHandler {
        key: "host",
        hint: "To set the startup host, specify a host, host:port or URL:",
        example: "causerie set host localhost:11434",
        field: |c| &mut c.host,
    }
}

pub fn openai_model_handler() -> StringHandler {
    StringHandler {
        key: "openai-model",
        hint: "To set the OpenAI-compatible model, specify its name:",
        example: "causerie set openai-model gpt-4o-mini",
        field: |c| &mut c.openai_model,
    }
}

pub fn ollama_model_handler() -> StringHandler {
    StringHandler {
        key: "ollama-model",
        hint: "To set the Ollama model, specify its name:",
        example: "causerie set ollama-model llama3.2",
        field: |c| &mut c.ollama_model,
    }
}

pub fn system_prompt_handler() -> StringHandler {
    StringHandler {
        key: "system-prompt",
        hint: "To set the system prompt, provide the prompt text:",
        example: "causerie set system-prompt You are a concise assistant.",
        field: |c| &mut c.system_prompt,
    }
}

pub fn api_key_env_handler() -> StringHandler {
    StringHandler {
        key: "api-key-env",
        hint: "To set the API key variable, specify its name:",
        example: "causerie set api-key-env OPENROUTER_API_KEY",
        field: |c| &mut c.api_key_env,
    }
}

/// Handler for the `backend` setting.
pub struct BackendHandler;

impl SettingHandler for BackendHandler {
    fn key(&self) -> &'static str {
        "backend"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set the startup backend, specify openai or ollama:",
                example: "causerie set backend ollama",
            });
        };
        let kind = input
            .parse::<BackendKind>()
            .map_err(|_| SettingError::InvalidBackend(input.clone()))?;
        config.backend = Some(kind);
        Ok(format!("✅ Set backend to: {kind}"))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.backend = None;
        format!(
            "✅ Unset backend (will use default: {})",
            BackendKind::default()
        )
    }
}

/// Handler for the `temperature` setting.
pub struct TemperatureHandler;

impl SettingHandler for TemperatureHandler {
    fn key(&self) -> &'static str {
        "temperature"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set the sampling temperature, specify a number between 0 and 1:",
                example: "causerie set temperature 0.7",
            });
        };
        let value = input
            .parse::<f64>()
            .ok()
            .filter(|value| TEMPERATURE_RANGE.contains(value))
            .ok_or_else(|| SettingError::InvalidTemperature(input.clone()))?;
        config.temperature = Some(value);
        Ok(format!("✅ Set temperature to: {value}"))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.temperature = None;
        "✅ Unset temperature (will use default)".to_string()
    }
}
