use tracing::{info, warn};

use super::{reply, reply_error};
use crate::commands::registry::CommandInvocation;
use crate::core::backend::ConnectedModel;
use crate::core::config::defaults::TEMPERATURE_RANGE;
use crate::core::session::Session;

pub(crate) async fn handle_connect(session: &mut Session, invocation: CommandInvocation<'_>) {
    if let Some(host) = invocation.arg(0) {
        if let Err(e) = session.bot.set_backend_host(host) {
            warn!("Cannot configure server host: {e}");
            reply_error(session, invocation, "Cannot configure server host", &e);
            return;
        }
    }

    let Some(host) = session.bot.host().map(str::to_string) else {
        reply(
            session,
            invocation,
            "No server host defined yet! Define one by using `/c <host>`".to_string(),
        );
        return;
    };

    match session.bot.connected_model().await {
        Ok(model) => {
            let response = format!(
                "Server host is: {host}\n\nConnected model is: {}",
                describe_model(model)
            );
            reply(session, invocation, response);
        }
        Err(e) => {
            warn!("Cannot fetch server details from {host}: {e}");
            reply_error(session, invocation, "Cannot fetch server details", &e);
        }
    }
}

fn describe_model(model: Option<ConnectedModel>) -> String {
    match model {
        Some(model) => model.to_string(),
        None => "none (client not configured)".to_string(),
    }
}

pub(crate) fn handle_system_prompt(session: &mut Session, invocation: CommandInvocation<'_>) {
    if invocation.has_args() {
        session.bot.set_system_prompt(invocation.joined_args());
        info!("System prompt updated");
    }
    let response = format!("**System prompt** is: '{}'", session.bot.system_prompt());
    reply(session, invocation, response);
}

pub(crate) fn handle_temperature(session: &mut Session, invocation: CommandInvocation<'_>) {
    if let Some(raw) = invocation.arg(0) {
        match raw.parse::<f64>() {
            // abs() folds "-0" into 0.
            Ok(value) if TEMPERATURE_RANGE.contains(&value) => {
                session.bot.set_temperature(value.abs());
            }
            _ => {
                reply_error(
                    session,
                    invocation,
                    "**Value error**",
                    &format!("sampling temperature must be a float in the range 0-1, got '{raw}'"),
                );
                return;
            }
        }
    }
    let response = format!(
        "**LLM sampling temperature** is: '{}'",
        session.bot.temperature()
    );
    reply(session, invocation, response);
}

pub(crate) fn handle_backend(session: &mut Session, invocation: CommandInvocation<'_>) {
    session.bot.toggle_backend_kind();
    let host = session
        .bot
        .host()
        .map(str::to_string)
        .unwrap_or_else(|| "not set, define one by using `/c <host>`".to_string());
    let response = format!(
        "Backend is now: {}\n\nServer host is: {host}\n\nModel is: {}",
        session.bot.kind().display_name(),
        session.bot.model()
    );
    reply(session, invocation, response);
}
