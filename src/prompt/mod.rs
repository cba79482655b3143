// src/prompt/mod.rs
// Prompt composition for upstream requests

pub mod builder;

pub use builder::{QUESTION_SEPARATOR, compose_prompt};
