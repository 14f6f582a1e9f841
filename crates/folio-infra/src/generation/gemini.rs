//! Google Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use folio_core::ports::{ContentGenerator, GenerationError};

use super::prompt::portfolio_prompt;

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const API_KEY_HEADER: &str = "x-goog-api-key";
const DOCTYPE: &str = "<!doctype html>";

/// Longest error body kept from a failed response.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Gemini client configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("GEMINI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map_or(defaults.timeout, Duration::from_secs),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Generates portfolio pages with a Gemini model.
pub struct GeminiContentGenerator {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiContentGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        if config.api_key.trim().is_empty() {
            tracing::warn!("GEMINI_API_KEY is not set; portfolio generation will fail");
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, GenerationError> {
        Self::new(GeminiConfig::from_env())
    }
}

#[async_trait]
impl ContentGenerator for GeminiContentGenerator {
    async fn generate_portfolio_html(&self, resume_text: &str) -> Result<String, GenerationError> {
        if self.config.api_key.trim().is_empty() {
            return Err(GenerationError::NotConfigured(
                "GEMINI_API_KEY is empty".to_string(),
            ));
        }

        let prompt = portfolio_prompt(resume_text);
        let request = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text: &prompt }],
            }],
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_chars = prompt.chars().count(),
            "Sending generation request"
        );

        let response = self
            .client
            .post(self.config.endpoint())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Gemini request failed");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Transport(e.without_url().to_string()))?;

        let html = validate_html(&response_text(body)?)?;

        tracing::debug!(
            bytes = html.len(),
            preview = %html.chars().take(200).collect::<String>(),
            "Received portfolio HTML"
        );

        Ok(html)
    }
}

/// Concatenated text parts of the first candidate that has any.
fn response_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
    response
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .find(|text| !text.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

/// Strip a surrounding Markdown fence and require a doctype.
fn validate_html(text: &str) -> Result<String, GenerationError> {
    let html = strip_code_fence(text);

    let starts_with_doctype = html
        .get(..DOCTYPE.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(DOCTYPE));
    if !starts_with_doctype {
        tracing::error!(
            preview = %html.chars().take(200).collect::<String>(),
            "Gemini did not return an HTML document"
        );
        return Err(GenerationError::InvalidHtml);
    }

    Ok(html.to_string())
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (`html`) on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"<!DOCTYPE html>"},{"text":"<html></html>"}]},"finishReason":"STOP"}]}"#,
        );

        assert_eq!(
            response_text(response).unwrap(),
            "<!DOCTYPE html><html></html>"
        );
    }

    #[test]
    fn test_response_without_candidates() {
        assert!(matches!(
            response_text(parse(r#"{"candidates":[]}"#)),
            Err(GenerationError::EmptyResponse)
        ));
        assert!(matches!(
            response_text(parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)),
            Err(GenerationError::EmptyResponse)
        ));
        assert!(matches!(
            response_text(parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)),
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[test]
    fn test_validate_accepts_doctype_any_case() {
        assert_eq!(
            validate_html("  <!doctype HTML><html></html>\n").unwrap(),
            "<!doctype HTML><html></html>"
        );
    }

    #[test]
    fn test_validate_strips_code_fence() {
        let text = "```html\n<!DOCTYPE html>\n<html><body>Hi</body></html>\n```\n";

        assert_eq!(
            validate_html(text).unwrap(),
            "<!DOCTYPE html>\n<html><body>Hi</body></html>"
        );
    }

    #[test]
    fn test_validate_rejects_prose() {
        assert!(matches!(
            validate_html("Sure! Here is your portfolio: <!DOCTYPE html>"),
            Err(GenerationError::InvalidHtml)
        ));
        assert!(matches!(validate_html(""), Err(GenerationError::InvalidHtml)));
        assert!(matches!(validate_html("```"), Err(GenerationError::InvalidHtml)));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = GeminiConfig {
            base_url: "http://localhost:9000/v1beta/".to_string(),
            ..GeminiConfig::default()
        };

        assert_eq!(
            config.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GeminiConfig {
            api_key: "super-secret".to_string(),
            ..GeminiConfig::default()
        };

        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let generator = GeminiContentGenerator::new(GeminiConfig::default()).unwrap();

        let result = generator.generate_portfolio_html("resume").await;

        assert!(matches!(result, Err(GenerationError::NotConfigured(_))));
    }
}
