//! Gemini `generateContent` client with retry, model fallback, and error classification.

pub(crate) mod client;
pub(crate) mod text;
pub(crate) mod types;

pub use client::{GeminiClient, GeminiError, TextGenerator};
