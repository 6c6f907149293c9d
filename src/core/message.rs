use std::fmt;

use crate::api::ChatMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    System,
    User,
    Assistant,
    /// Authored by the application itself; never sent to the backend.
    App,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::App => "app",
        }
    }

    pub fn is_chat(self) -> bool {
        matches!(self, Role::System | Role::User | Role::Assistant)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering hint attached to a message, independent of its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn icon(self) -> Option<&'static str> {
        match self {
            Severity::Info => None,
            Severity::Warning => Some("⚠️"),
            Severity::Error => Some("❌"),
        }
    }
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    role: Role,
    content: String,
    severity: Severity,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            severity: Severity::Info,
        }
    }

    pub fn from_user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn from_assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn from_system_prompt(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn from_app_notice(content: impl Into<String>) -> Self {
        Self::new(Role::App, content)
    }

    /// An assistant-role record of a failed exchange, kept in both histories.
    pub fn from_failure(summary: &str, error: &dyn fmt::Display) -> Self {
        Self::from_assistant(format!("{summary}: {error}")).with_error_severity()
    }

    /// The echo/response pair every slash command leaves in the transcript.
    pub fn from_command(command: &str, response: impl Into<String>) -> [Message; 2] {
        [Self::command_echo(command), Self::from_app_notice(response)]
    }

    pub fn from_command_error(
        command: &str,
        summary: &str,
        error: &dyn fmt::Display,
    ) -> [Message; 2] {
        [
            Self::command_echo(command),
            Self::from_app_notice(format!("{summary}: {error}")).with_error_severity(),
        ]
    }

    fn command_echo(command: &str) -> Self {
        Self::from_app_notice(format!(">> {}", command.trim()))
    }

    pub fn with_warning_severity(self) -> Self {
        Self {
            severity: Severity::Warning,
            ..self
        }
    }

    pub fn with_error_severity(self) -> Self {
        Self {
            severity: Severity::Error,
            ..self
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_system_role(&self) -> bool {
        self.role == Role::System
    }

    pub fn is_user_role(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_chat_role(&self) -> bool {
        self.role.is_chat()
    }

    pub fn to_display_text(&self) -> String {
        let trimmed = self.content.trim();
        match self.severity.icon() {
            Some(icon) => format!("{icon} {trimmed}"),
            None => trimmed.to_string(),
        }
    }

    pub fn to_wire_record(&self) -> ChatMessage {
        ChatMessage {
            role: self.role.as_str().to_string(),
            content: self.content.clone(),
        }
    }
}
