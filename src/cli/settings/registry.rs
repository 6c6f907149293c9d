//! Registry of setting handlers.

use std::collections::HashMap;

use super::handlers::{
    api_key_env_handler, host_handler, ollama_model_handler, openai_model_handler,
    system_prompt_handler, BackendHandler, TemperatureHandler,
};
use super::SettingHandler;

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
}

impl SettingRegistry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
        };

        registry.register(Box::new(BackendHandler));
        registry.register(Box::new(host_handler()));
        registry.register(Box::new(openai_model_handler()));
        registry.register(Box::new(ollama_model_handler()));
        registry.register(Box::new(system_prompt_handler()));
        registry.register(Box::new(TemperatureHandler));
        registry.register(Box::new(api_key_env_handler()));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        self.handlers.insert(handler.key(), handler);
    }

    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
