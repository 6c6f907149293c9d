use super::reply;
use crate::commands::help_text;
use crate::commands::registry::CommandInvocation;
use crate::core::config::defaults::APP_TITLE;
use crate::core::session::Session;

pub(crate) fn handle_help(session: &mut Session, invocation: CommandInvocation<'_>) {
    reply(session, invocation, help_text());
}

pub(crate) fn handle_reset(session: &mut Session, invocation: CommandInvocation<'_>) {
    session.bot.clear();
    session.chat.clear();
    reply(
        session,
        invocation,
        format!("Welcome to {APP_TITLE} (new session)"),
    );
}
