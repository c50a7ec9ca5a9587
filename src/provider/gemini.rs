//! Gemini-backed advice provider
//!
//! Sends the prompt with a JSON response schema so the model replies with
//! the advice object directly. Uses a long-lived reqwest::Client for
//! connection pooling.

use crate::config::AdvisorConfig;
use crate::error::AdvisorError;
use crate::provider::AdviceProvider;
use crate::schema::AdviceSchema;
use crate::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

const API_KEY_HEADER: &str = "x-goog-api-key";

const SYSTEM_PROMPT: &str = "You are a professional personal finance advisor. \
Answer only with a JSON object that matches the response schema.";

/// Reusable Gemini client (connection-pooled)
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiProvider {
    pub fn new(config: &AdvisorConfig) -> Result<Self> {
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or_else(|| AdvisorError::Config("GEMINI_API_KEY not configured".to_string()))?;

        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.gemini_base_url, config.gemini_model
            ),
        })
    }
}

#[async_trait]
impl AdviceProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn submit(&self, prompt: &str, schema: &AdviceSchema) -> Result<String> {
        let request = build_request(prompt, schema);

        info!(endpoint = %self.endpoint, "Calling Gemini API");

        // Key travels in a header so it never shows up in a request URL.
        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!("Gemini API request failed: {}", e);
                AdvisorError::Provider(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Gemini API error response");
            return Err(status_error(status, &body));
        }

        let envelope: GeminiResponse = response.json().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to read Gemini response envelope: {}", e);
            AdvisorError::Provider(format!("Unreadable Gemini response: {}", e))
        })?;

        extract_text(envelope)
    }
}

fn build_request(prompt: &str, schema: &AdviceSchema) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: SYSTEM_PROMPT.to_string(),
            }],
        },
        generation_config: GenerationConfig {
            temperature: 0.3,
            response_mime_type: "application/json".to_string(),
            response_schema: schema.to_json(),
        },
    }
}

fn status_error(status: StatusCode, body: &str) -> AdvisorError {
    let reason = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "authentication rejected",
        StatusCode::TOO_MANY_REQUESTS => "quota exceeded",
        s if s.is_server_error() => "provider unavailable",
        _ => "request rejected",
    };
    AdvisorError::Provider(format!("Gemini {} ({}): {}", reason, status, body))
}

/// Pull the reply text out of the first candidate.
fn extract_text(response: GeminiResponse) -> Result<String> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(AdvisorError::Provider(format!(
            "Gemini blocked the prompt: {}",
            reason
        )));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AdvisorError::Provider("No response from Gemini API".to_string()))?;

    if candidate.finish_reason.as_deref() == Some("SAFETY") {
        return Err(AdvisorError::Provider(
            "Gemini stopped the reply for safety reasons".to_string(),
        ));
    }

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AdvisorError::Provider("Empty response from Gemini".to_string()));
    }

    Ok(text)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{request_schema, SchemaVariant};
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let schema = request_schema(SchemaVariant::Basic);
        let request = build_request("Monthly Income: ₹50,000", &schema);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Monthly Income: ₹50,000");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["responseSchema"], schema.to_json());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_empty_candidates_is_provider_error() {
        let response: GeminiResponse = serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(matches!(extract_text(response), Err(AdvisorError::Provider(_))));

        let blocked: GeminiResponse =
            serde_json::from_value(json!({ "promptFeedback": { "blockReason": "OTHER" } }))
                .unwrap();
        assert!(matches!(extract_text(blocked), Err(AdvisorError::Provider(_))));
    }

    #[test]
    fn test_status_errors_name_the_cause() {
        let quota = status_error(StatusCode::TOO_MANY_REQUESTS, "RESOURCE_EXHAUSTED");
        assert!(quota.to_string().contains("quota exceeded"));

        let auth = status_error(StatusCode::FORBIDDEN, "");
        assert!(auth.to_string().contains("authentication rejected"));
        assert!(auth.is_analysis_failure());
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = GeminiProvider::new(&AdvisorConfig::default()).err().unwrap();
        assert!(matches!(err, AdvisorError::Config(_)));

        let config = AdvisorConfig {
            gemini_api_key: Some("key".to_string()),
            gemini_model: "gemini-test".to_string(),
            ..Default::default()
        };
        let provider = GeminiProvider::new(&config).unwrap();
        assert!(provider.endpoint.ends_with("/models/gemini-test:generateContent"));
        assert!(!provider.endpoint.contains("key"));
    }

    #[tokio::test]
    async fn test_transport_failure_does_not_expose_api_key() {
        let config = AdvisorConfig {
            gemini_api_key: Some("SECRET_KEY_123".to_string()),
            gemini_base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: 2,
            ..Default::default()
        };
        let provider = GeminiProvider::new(&config).unwrap();
        let schema = request_schema(SchemaVariant::Basic);

        let err = provider.submit("prompt", &schema).await.unwrap_err();

        assert!(matches!(err, AdvisorError::Provider(_)));
        assert!(!err.to_string().contains("SECRET_KEY_123"));
        assert!(!err.user_message().contains("SECRET_KEY_123"));
    }
}
