//! # Gemini API Data Models for Content Generation
//!
//! Request and response bodies of the `generateContent` endpoint.

use serde::{Deserialize, Serialize};
use snafu::Snafu;

use crate::models::Content;

/// Reason why generation stopped
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Default value. This value is unused.
    FinishReasonUnspecified,
    /// Natural stop point of the model or provided stop sequence.
    Stop,
    /// The maximum number of tokens as specified in the request was reached.
    MaxTokens,
    /// The response candidate content was flagged for safety reasons.
    Safety,
    /// The response candidate content was flagged for recitation reasons.
    Recitation,
    /// The response candidate content was flagged for using an unsupported language.
    Language,
    /// Unknown reason.
    Other,
    /// Token generation stopped because the content contains forbidden terms.
    Blocklist,
    /// Token generation stopped for potentially containing prohibited content.
    ProhibitedContent,
    /// Token generation stopped because the content potentially contains
    /// Sensitive Personally Identifiable Information.
    Spii,
    /// The function call generated by the model is invalid.
    MalformedFunctionCall,
    /// Any reason this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl FinishReason {
    /// Whether the candidate was cut off by a content filter rather than finishing.
    pub fn is_blocked(&self) -> bool {
        matches!(
            self,
            FinishReason::Safety
                | FinishReason::Recitation
                | FinishReason::Language
                | FinishReason::Blocklist
                | FinishReason::ProhibitedContent
                | FinishReason::Spii
        )
    }
}

/// Reason why a prompt was blocked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockReason {
    BlockReasonUnspecified,
    Safety,
    Other,
    Blocklist,
    ProhibitedContent,
    ImageSafety,
    #[serde(other)]
    Unknown,
}

/// Feedback about the prompt itself
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked and no candidates were returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<BlockReason>,
}

/// A candidate response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content of the candidate
    #[serde(default)]
    pub content: Content,
    /// The finish reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    /// The index of the candidate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,
}

/// Token accounting for a request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// The number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_token_count: Option<i32>,
    /// The number of response tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates_token_count: Option<i32>,
    /// The total number of tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_token_count: Option<i32>,
    /// The number of thinking tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thoughts_token_count: Option<i32>,
}

/// Response from the Gemini API for content generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    /// The candidates generated
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,
    /// The prompt feedback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
    /// Usage metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
    /// Model version used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    /// Response ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
}

/// A response that carries no usable text
#[derive(Debug, Snafu)]
pub enum ResponseError {
    #[snafu(display("candidate was blocked with finish reason {reason:?}"))]
    CandidateBlocked { reason: FinishReason },

    #[snafu(display("prompt was blocked with reason {reason:?}"))]
    PromptBlocked { reason: BlockReason },
}

impl GenerationResponse {
    /// Get the text of the first candidate, skipping thought summaries
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.as_ref())
            .map(|parts| parts.iter().filter_map(|p| p.answer_text()).collect())
            .unwrap_or_default()
    }

    /// Like [`text`](Self::text), but fails when the prompt or the first candidate was blocked.
    ///
    /// A response with neither candidates nor a block reason yields an empty string.
    pub fn try_text(&self) -> Result<String, ResponseError> {
        match self.candidates.first() {
            Some(candidate) => match &candidate.finish_reason {
                Some(reason) if reason.is_blocked() => CandidateBlockedSnafu {
                    reason: reason.clone(),
                }
                .fail(),
                _ => Ok(self.text()),
            },
            None => match self
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
            {
                Some(reason) => PromptBlockedSnafu { reason }.fail(),
                None => Ok(String::new()),
            },
        }
    }
}

/// Request to generate content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The contents to generate content from
    pub contents: Vec<Content>,
}
