//! Optional AI-backed analysis over an OpenAI-compatible API

pub mod client;
pub mod prompts;
pub mod types;

pub use client::{extract_json, AiBackend, AiClient};
pub use prompts::Prompts;
