//! `DeepSeek` chat proxy
//!
//! A thin front-end over an `OpenAI`-compatible chat completions API: a web
//! UI with a JSON proxy endpoint, and a terminal loop using the same provider.

pub mod agent;
pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod llm;
pub mod proxy;
