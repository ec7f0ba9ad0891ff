//! Word pair provider.
//!
//! Asks a generative model for difficulty-appropriate English/Chinese pairs
//! and substitutes the deterministic built-in list on any failure, so the
//! game can always proceed without connectivity. Failures are logged, never
//! surfaced to the player.

use std::collections::HashSet;

use gloo_net::http::Request;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use super::session::{Difficulty, WordPair};
use crate::FALLBACK_WORDS;

const GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent";

/// Name of the `<meta>` tag carrying the API key for the word provider.
const API_KEY_META: &str = "wm-api-key";

#[derive(Debug, Error)]
enum ProviderError {
    #[error("no api key configured")]
    MissingKey,
    #[error("request failed: {0}")]
    Http(#[from] gloo_net::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("empty completion")]
    EmptyCompletion,
    #[error("malformed word list: {0}")]
    Json(#[from] serde_json::Error),
    #[error("word list failed shape validation")]
    Shape,
}

// Minimal slice of the generateContent response: the word list arrives as
// JSON text inside the first candidate's first part.
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Fetches `count` pairs for `difficulty`. Infallible: any provider failure
/// falls back to the built-in vocabulary.
pub async fn fetch_word_pairs(difficulty: Difficulty, count: usize) -> Vec<WordPair> {
    match request_pairs(difficulty, count).await {
        Ok(pairs) => pairs,
        Err(err) => {
            log::warn!("word provider failed ({err}); using fallback list");
            fallback_pairs(count)
        }
    }
}

async fn request_pairs(
    difficulty: Difficulty,
    count: usize,
) -> Result<Vec<WordPair>, ProviderError> {
    let key = api_key().ok_or(ProviderError::MissingKey)?;
    let url = format!("{GENERATE_URL}?key={key}");
    let response = Request::post(&url)
        .json(&request_body(difficulty, count))?
        .send()
        .await?;
    if !response.ok() {
        return Err(ProviderError::Status(response.status()));
    }
    let body: GenerateResponse = response.json().await?;
    let text = body
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.trim().to_owned())
        .filter(|t| !t.is_empty())
        .ok_or(ProviderError::EmptyCompletion)?;
    let pairs: Vec<WordPair> = serde_json::from_str(&text)?;
    validate_pairs(pairs, count).ok_or(ProviderError::Shape)
}

fn request_body(difficulty: Difficulty, count: usize) -> serde_json::Value {
    let prompt = format!(
        "Generate {count} English-Chinese word pairs for a matching game. \
         Difficulty level: {}. Provide commonly used words. Ensure the \
         translations are accurate and concise. Include a short sentence or \
         additional explanation for each word.",
        difficulty.label()
    );
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "en": { "type": "STRING" },
                        "zh": { "type": "STRING" },
                        "explanation": { "type": "STRING" }
                    },
                    "required": ["id", "en", "zh", "explanation"]
                }
            }
        }
    })
}

/// Shape check on a parsed word list: at least `count` usable entries
/// (surplus is truncated), unique ids, non-empty word faces.
pub fn validate_pairs(mut pairs: Vec<WordPair>, count: usize) -> Option<Vec<WordPair>> {
    if pairs.len() < count {
        return None;
    }
    pairs.truncate(count);
    let mut seen = HashSet::new();
    for pair in &pairs {
        if pair.id.is_empty() || pair.en.trim().is_empty() || pair.zh.trim().is_empty() {
            return None;
        }
        if !seen.insert(pair.id.as_str()) {
            return None;
        }
    }
    Some(pairs)
}

/// Deterministic fallback deck: cycles the built-in table when `count`
/// exceeds its length. Ids are `fallback-{i}` and therefore always unique.
pub fn fallback_pairs(count: usize) -> Vec<WordPair> {
    (0..count)
        .map(|i| {
            let (en, zh, explanation) = FALLBACK_WORDS[i % FALLBACK_WORDS.len()];
            WordPair {
                id: format!("fallback-{i}"),
                en: en.to_owned(),
                zh: zh.to_owned(),
                explanation: explanation.to_owned(),
            }
        })
        .collect()
}

fn api_key() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let meta = document
        .query_selector(&format!("meta[name='{API_KEY_META}']"))
        .ok()
        .flatten()?;
    meta.get_attribute("content").filter(|key| !key.is_empty())
}
