//! Causerie is a terminal chat client for OpenAI-compatible and Ollama servers.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the message model, the display transcript, the backend
//!   adapter with its streaming strategies, and the [`core::session::Session`]
//!   tying them together.
//! - [`commands`] implements the slash-command interpreter that mutates a
//!   session.
//! - [`api`] defines the chat and model-listing payloads of both wire formats.
//! - [`cli`] parses arguments, edits the config file and runs the chat loop.
//!
//! The binary (`src/main.rs`) routes straight through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod utils;
