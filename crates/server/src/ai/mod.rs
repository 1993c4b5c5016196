//! Completion gateway for the OpenAI chat-completions API

pub mod client;

pub use client::OpenAiClient;
