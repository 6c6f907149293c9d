//! Built-in values used when the config file leaves a field unset.

pub const APP_TITLE: &str = "Causerie";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Base URL used for the OpenAI-compatible backend until `/c` changes it.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Port assumed when a bare host is given for a self-hosted OpenAI-compatible server.
pub const DEFAULT_OPENAI_PORT: u16 = 8000;
pub const DEFAULT_OLLAMA_PORT: u16 = 11434;

pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=1.0;
