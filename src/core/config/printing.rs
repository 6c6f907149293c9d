use crate::core::config::data::Config;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        print_entry("backend", self.backend.map(|kind| kind.as_str().to_string()));
        print_entry("host", self.host.clone());
        print_entry("openai-model", self.openai_model.clone());
        print_entry("ollama-model", self.ollama_model.clone());
        print_entry("system-prompt", self.system_prompt.clone());
        print_entry("temperature", self.temperature.map(|value| value.to_string()));
        print_entry("api-key-env", self.api_key_env.clone());
    }
}

fn print_entry(key: &str, value: Option<String>) {
    match value {
        Some(value) => println!("  {key}: {value}"),
        None => println!("  {key}: (unset)"),
    }
}
