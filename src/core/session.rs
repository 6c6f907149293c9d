//! One interactive session: the display transcript plus the backend adapter.
//!
//! The shell creates a [`Session`] at startup, feeds each input line to
//! [`Session::submit`] and, when a reply is streaming, drains it through
//! [`Session::consume`]. Every failure path leaves exactly one visible
//! message in the transcript.

use std::fmt;
use std::sync::Arc;

use futures_util::StreamExt;
use tracing::{debug, error, info};

use crate::commands;
use crate::core::backend::ConnectedModel;
use crate::core::chat_stream::FragmentStream;
use crate::core::chatbot::ChatBot;
use crate::core::config::defaults::APP_TITLE;
use crate::core::config::BackendKind;
use crate::core::conversation::Chat;
use crate::core::error::ChatError;
use crate::core::message::Message;

/// Outcome of a single input line.
pub enum Submission {
    /// Blank input; nothing changed.
    Ignored,
    /// A slash command ran and appended its exchange.
    Handled,
    /// No backend client is configured; the warning banner was appended.
    NotConnected(Arc<Message>),
    /// The user turn was recorded and the reply is ready to be pulled.
    Streaming(FragmentStream),
}

/// Connection summary shown alongside the transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected {
        host: String,
        model: ConnectedModel,
    },
    NotConfigured,
    Unreachable {
        host: String,
        error: String,
    },
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected { host, model } => {
                write!(f, "✅ Connected to LLM at {host} (model: {model})")
            }
            ConnectionStatus::NotConfigured => {
                write!(f, "⚠️ Please configure a valid LLM server host")
            }
            ConnectionStatus::Unreachable { host, error } => {
                write!(f, "⚠️ Cannot fetch LLM details from {host}: {error}")
            }
        }
    }
}

pub struct Session {
    pub chat: Chat,
    pub bot: ChatBot,
}

impl Session {
    pub fn new(bot: ChatBot) -> Self {
        let mut chat = Chat::new();
        chat.append(Message::from_app_notice(format!("Welcome to {APP_TITLE}")));
        Self { chat, bot }
    }

    /// Route one input line to the command interpreter or the backend.
    pub async fn submit(&mut self, input: &str) -> Submission {
        let input = input.trim();
        if input.is_empty() {
            return Submission::Ignored;
        }
        if commands::dispatch(self, input).await {
            return Submission::Handled;
        }

        self.chat.append(Message::from_user(input));
        match self.bot.send_user_request(input) {
            Some(stream) => Submission::Streaming(stream),
            None => {
                let banner = Message::from_app_notice(connection_alert(self.bot.kind()))
                    .with_warning_severity();
                Submission::NotConnected(self.chat.append(banner))
            }
        }
    }

    /// Drain a reply stream, handing each fragment to `on_fragment`.
    ///
    /// Returns the message recorded in both histories: the assembled reply, or
    /// an error-severity record if the stream failed. Text received before a
    /// failure is discarded.
    pub async fn consume<F>(
        &mut self,
        mut stream: FragmentStream,
        mut on_fragment: F,
    ) -> Arc<Message>
    where
        F: FnMut(&str),
    {
        let mut reply = String::new();
        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => {
                    on_fragment(&fragment);
                    reply.push_str(&fragment);
                }
                Err(e) => return self.record_failure(&e),
            }
        }
        self.finish_reply(reply)
    }

    /// Record a completed reply in both histories.
    pub fn finish_reply(&mut self, reply: String) -> Arc<Message> {
        info!(chars = reply.len(), "Reply completed");
        self.bot.append_assistant_reply(reply.clone());
        self.chat.append(Message::from_assistant(reply))
    }

    pub fn record_failure(&mut self, e: &ChatError) -> Arc<Message> {
        error!("An error occurred while interacting with LLM: {e}");
        let message = Message::from_failure("Cannot interact with LLM", e);
        self.bot.append_message(message.clone());
        self.chat.append(message)
    }

    pub async fn connection_status(&self) -> ConnectionStatus {
        let Some(host) = self.bot.host().map(str::to_string) else {
            return ConnectionStatus::NotConfigured;
        };
        match self.bot.connected_model().await {
            Ok(Some(model)) => ConnectionStatus::Connected { host, model },
            Ok(None) => ConnectionStatus::NotConfigured,
            Err(e) => {
                debug!("Connection check failed: {e}");
                ConnectionStatus::Unreachable {
                    host,
                    error: e.to_string(),
                }
            }
        }
    }
}

fn connection_alert(kind: BackendKind) -> String {
    let client = match kind {
        BackendKind::OpenAi => "OpenAI",
        BackendKind::Ollama => "Ollama",
    };
    format!("{client} client not connected! Use `/c <host>` to configure a server host.")
}
