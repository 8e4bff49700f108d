//! One-shot prompt execution.
//!
//! [`PromptRunner`] checks the credential, hands the prompt to a [`TextGenerator`]
//! exactly once and writes the returned text. [`GeminiGenerator`] is the
//! production generator backed by [`Gemini`].

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use snafu::{ResultExt, Snafu};
use std::io::Write;
use tracing::{debug, error, instrument};
use url::Url;

use crate::{
    client::{Gemini, Model},
    prompt::Prompt,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Snafu)]
pub enum RunError {
    #[snafu(display("GEMINI_API_KEY is not set"))]
    MissingCredential,

    #[snafu(display("remote generation with {model} failed"))]
    RemoteGeneration { source: BoxError, model: Model },

    #[snafu(display("failed to write generated text"))]
    WriteOutput { source: std::io::Error },
}

/// Capability to turn a prompt into text with a remote model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        model: &Model,
        prompt: &str,
        credential: &SecretString,
    ) -> Result<String, BoxError>;
}

/// [`TextGenerator`] calling the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    base_url: Url,
}

impl GeminiGenerator {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(
        &self,
        model: &Model,
        prompt: &str,
        credential: &SecretString,
    ) -> Result<String, BoxError> {
        let client = Gemini::with_model_and_base_url(
            credential.expose_secret().to_owned(),
            model.clone(),
            self.base_url.clone(),
        )?;

        let response = client
            .generate_content()
            .with_user_message(prompt)
            .execute()
            .await?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                total_tokens = usage.total_token_count,
                "generation finished"
            );
        }

        Ok(response.try_text()?)
    }
}

pub struct PromptRunner<G> {
    generator: G,
    model: Model,
}

impl<G: TextGenerator> PromptRunner<G> {
    pub fn new(generator: G, model: Model) -> Self {
        Self { generator, model }
    }

    /// Generates text for `prompt` and writes it, newline-terminated, to `out`.
    ///
    /// An absent or empty credential fails before the generator is touched.
    /// Nothing is written to `out` unless generation succeeded.
    #[instrument(skip_all, fields(model = %self.model, prompt.len = prompt.as_str().len()))]
    pub async fn run(
        &self,
        credential: Option<&SecretString>,
        prompt: &Prompt,
        out: &mut impl Write,
    ) -> Result<(), RunError> {
        let credential = credential
            .filter(|key| !key.expose_secret().is_empty())
            .ok_or(RunError::MissingCredential)?;

        let text = self
            .generator
            .generate(&self.model, prompt.as_str(), credential)
            .await
            .inspect_err(|err| error!(error = %err, "generation failed"))
            .context(RemoteGenerationSnafu {
                model: self.model.clone(),
            })?;

        writeln!(out, "{text}").context(WriteOutputSnafu)?;
        out.flush().context(WriteOutputSnafu)
    }
}
