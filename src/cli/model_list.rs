//! Model listing functionality

use std::error::Error;

use crate::core::chatbot::{ChatBot, ChatBotSettings};

pub async fn list_models(settings: ChatBotSettings) -> Result<(), Box<dyn Error>> {
    let bot = ChatBot::new(settings);
    let backend = bot.kind().display_name();
    let Some(host) = bot.host().map(str::to_string) else {
        return Err(format!(
            "No {backend} host configured. Pass --host or run 'causerie set host <host>'."
        )
        .into());
    };

    let Some(models) = bot.list_models().await? else {
        return Err(format!(
            "❌ {backend} client not connected. Check that the API key variable is set."
        )
        .into());
    };

    println!("🤖 Available Models for {backend} at {host}");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("🎯 Configured model: {}", bot.model());
    println!();

    if models.is_empty() {
        println!("No models found for this backend.");
    } else {
        println!("Found {} models:", models.len());
        println!();
        for model in models {
            println!("  • {model}");
        }
    }

    Ok(())
}
