//! # gemini-prompt
//!
//! Send a single prompt to Google's Gemini API and get the generated text back.
//!
//! The `gemini` binary joins its arguments into a [`Prompt`], reads the API key
//! from `GEMINI_API_KEY` into a [`Config`] and runs them through a [`PromptRunner`]
//! backed by [`GeminiGenerator`].

pub mod client;
pub mod config;
pub mod generation;
pub mod models;
pub mod prompt;
pub mod runner;


pub use client::{Error as ClientError, Gemini, Model};
pub use config::{Config, Error as ConfigError};
pub use generation::{ContentBuilder, GenerationResponse, ResponseError};
pub use models::{Content, Message, Part, Role};
pub use prompt::{Prompt, DEFAULT_PROMPT};
pub use runner::{BoxError, GeminiGenerator, PromptRunner, RunError, TextGenerator};
