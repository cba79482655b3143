// src/lib.rs

pub mod admission;
pub mod config;
pub mod error;
pub mod gemini;
pub mod persona;
pub mod prompt;
pub mod relay;
pub mod server;

pub use error::{RelayError, Result};
