pub(super) mod config;
pub(super) mod core;

use crate::commands::registry::CommandInvocation;
use crate::core::message::Message;
use crate::core::session::Session;

pub(super) fn reply(session: &mut Session, invocation: CommandInvocation<'_>, response: String) {
    session
        .chat
        .append_all(Message::from_command(invocation.input, response));
}

pub(super) fn reply_error(
    session: &mut Session,
    invocation: CommandInvocation<'_>,
    summary: &str,
    error: &dyn std::fmt::Display,
) {
    session
        .chat
        .append_all(Message::from_command_error(invocation.input, summary, error));
}
