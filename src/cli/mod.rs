//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat;
pub mod model_list;
pub mod settings;

use std::error::Error;

use clap::{Parser, Subcommand};

use crate::cli::chat::run_chat;
use crate::cli::model_list::list_models;
use crate::cli::settings::{set_setting, unset_setting};
use crate::core::chatbot::ChatBotSettings;
use crate::core::config::defaults::TEMPERATURE_RANGE;
use crate::core::config::{BackendKind, Config};
use crate::utils::logging::init_tracing;

#[derive(Parser)]
#[command(name = "causerie")]
#[command(about = "A terminal chat client for OpenAI-compatible and Ollama servers")]
#[command(
    long_about = "Causerie relays a conversation to an OpenAI-compatible server or a local \
Ollama server and streams the replies back into the terminal.\n\n\
Environment Variables:\n\
  OPENAI_API_KEY        API key for OpenAI servers (name set by api-key-env)\n\
  CAUSERIE_LOG          Log filter directives, e.g. 'causerie=debug'\n\
  CAUSERIE_CONFIG_DIR   Directory holding config.toml\n\n\
Commands (inside a chat):\n\
  /h                Show help\n\
  /c <host>         Connect to a server host\n\
  /s <prompt>       Set the system prompt\n\
  /t <temperature>  Set the sampling temperature\n\
  /b                Switch backend\n\
  /r                Reset the chat"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend to talk to (openai or ollama)
    #[arg(short = 'b', long, global = true, value_name = "BACKEND")]
    pub backend: Option<String>,

    /// Server host, host:port or full URL
    #[arg(long, global = true, value_name = "HOST")]
    pub host: Option<String>,

    /// Model to use for the selected backend
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature between 0 and 1
    #[arg(short = 't', long, global = true, value_name = "TEMPERATURE")]
    pub temperature: Option<f64>,

    /// Show debug logs on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// List the models advertised by the backend
    Models,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key (can be multiple words for system-prompt)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Option<Vec<String>>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    match &args.command {
        None | Some(Commands::Chat) => {
            let config = Config::load()?;
            run_chat(chat_settings(&args, &config)?).await
        }
        Some(Commands::Models) => {
            let config = Config::load()?;
            list_models(chat_settings(&args, &config)?).await
        }
        Some(Commands::Set { key, value }) => {
            let Some(key) = key else {
                Config::load()?.print_all();
                return Ok(());
            };
            let path = Config::config_path()?;
            let value = value.as_deref().unwrap_or_default();
            match set_setting(&path, key, value) {
                Ok(message) => println!("{message}"),
                Err(e) => {
                    e.print();
                    std::process::exit(e.exit_code());
                }
            }
            Ok(())
        }
        Some(Commands::Unset { key }) => {
            let path = Config::config_path()?;
            match unset_setting(&path, key) {
                Ok(message) => println!("{message}"),
                Err(e) => {
                    e.print();
                    std::process::exit(e.exit_code());
                }
            }
            Ok(())
        }
    }
}

/// Merge command-line overrides into the configured startup values.
pub fn chat_settings(args: &Args, config: &Config) -> Result<ChatBotSettings, Box<dyn Error>> {
    let mut settings = ChatBotSettings::from_config(config);

    if let Some(backend) = &args.backend {
        settings.kind = backend.parse::<BackendKind>()?;
    }
    if let Some(host) = &args.host {
        settings.host = Some(host.clone());
    }
    if let Some(model) = &args.model {
        match settings.kind {
            BackendKind::OpenAi => settings.openai_model = model.clone(),
            BackendKind::Ollama => settings.ollama_model = model.clone(),
        }
    }
    if let Some(temperature) = args.temperature {
        if !TEMPERATURE_RANGE.contains(&temperature) {
            return Err(format!(
                "temperature must be a float in the range 0-1, got {temperature}"
            )
            .into());
        }
        settings.temperature = temperature;
    }

    Ok(settings)
}
