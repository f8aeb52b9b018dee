//! Personalizer: rewrites a batch of texts for one target account.
//!
//! Flow: validate → build one composite prompt → single model call → parse reply.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::ChatModel;
use crate::personalization::parser::parse_personalized_reply;
use crate::personalization::prompts::{PERSONALIZE_PROMPT_TEMPLATE, PERSONALIZE_SYSTEM};

pub const MAX_CLIENT_CHARS: usize = 255;
pub const MAX_TEXT_CHARS: usize = 5000;

const INVALID_INPUT: &str = "Invalid input";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for personalization. Every field is optional on the wire so
/// that missing fields become a 400 rather than an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonalizeRequest {
    pub client: Option<String>,
    pub texts: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizeResponse {
    pub client: String,
    pub original_texts: Vec<String>,
    pub personalized_content: Vec<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub client: String,
    pub texts: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

impl PersonalizeRequest {
    pub fn validate(self) -> Result<ValidatedRequest, AppError> {
        let client = self.client.filter(|c| !c.is_empty());
        let texts = self.texts.filter(|t| !t.is_empty());

        let (Some(client), Some(texts)) = (client, texts) else {
            return Err(AppError::Validation(INVALID_INPUT.to_string()));
        };

        if client.chars().count() > MAX_CLIENT_CHARS {
            return Err(AppError::Validation(format!(
                "client must be at most {MAX_CLIENT_CHARS} characters"
            )));
        }

        if let Some(position) = texts
            .iter()
            .position(|t| t.chars().count() > MAX_TEXT_CHARS)
        {
            return Err(AppError::Validation(format!(
                "Text {} exceeds {MAX_TEXT_CHARS} characters",
                position + 1
            )));
        }

        Ok(ValidatedRequest { client, texts })
    }
}

/// Runs one personalization round trip against the model.
pub async fn personalize(
    llm: &dyn ChatModel,
    request: ValidatedRequest,
) -> Result<PersonalizeResponse, AppError> {
    info!(
        "Personalizing {} texts for client {}",
        request.texts.len(),
        request.client
    );

    let prompt = build_personalization_prompt(&request.client, &request.texts);
    let reply = llm.complete(&prompt, PERSONALIZE_SYSTEM).await?;
    debug!("Full model reply: {reply}");

    let personalized_content = parse_personalized_reply(&reply, request.texts.len());

    let missing = personalized_content.iter().filter(|t| t.is_empty()).count();
    if missing > 0 {
        info!(
            "{missing} of {} texts came back empty for client {}",
            request.texts.len(),
            request.client
        );
    }

    Ok(PersonalizeResponse {
        client: request.client,
        original_texts: request.texts,
        personalized_content,
    })
}

/// Fills the template with the client name and `Text N:`-prefixed inputs.
///
/// Placeholders are only expanded in the template itself, never inside the
/// substituted client name or texts.
pub fn build_personalization_prompt(client: &str, texts: &[String]) -> String {
    let numbered_texts = texts
        .iter()
        .enumerate()
        .map(|(i, text)| format!("Text {}: {}", i + 1, text))
        .collect::<Vec<_>>()
        .join("\n\n");

    match PERSONALIZE_PROMPT_TEMPLATE.split_once("{numbered_texts}") {
        Some((head, tail)) => format!(
            "{}{}{}",
            head.replace("{client}", client),
            numbered_texts,
            tail.replace("{client}", client)
        ),
        None => PERSONALIZE_PROMPT_TEMPLATE.replace("{client}", client),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
