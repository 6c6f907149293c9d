pub mod backend;
pub mod chat_stream;
pub mod chatbot;
pub mod config;
pub mod conversation;
pub mod error;
pub mod message;
pub mod session;
