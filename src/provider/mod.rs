//! Advice provider boundary
//!
//! A provider takes the rendered prompt and response schema and returns
//! the raw reply text. It is injected into the analyzer, never global.

use crate::error::AdvisorError;
use crate::schema::AdviceSchema;
use crate::Result;
use async_trait::async_trait;
use std::sync::Mutex;

pub mod gemini;
pub use gemini::GeminiProvider;

/// Opaque remote analysis call
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fails with [`AdvisorError::Provider`] on transport, auth or quota errors.
    async fn submit(&self, prompt: &str, schema: &AdviceSchema) -> Result<String>;
}

/// Canned reply used by `MockProvider::new`.
pub const SAMPLE_ADVICE: &str = r#"{
  "riskLevel": "Medium",
  "healthScore": 62,
  "healthStatus": "Average",
  "explanation": "Your income covers expenses and EMIs, but **savings are thin** for your number of dependents.",
  "advicePoints": [
    "Keep at least six months of expenses in liquid savings.",
    "Keep total EMIs under 30% of income."
  ],
  "smartActions": [
    "Start an automatic monthly transfer into a liquid fund.",
    "Get a term insurance quote sized to 10x annual income.",
    "Review discretionary spending for one month."
  ],
  "warnings": [
    "You do not have term insurance, which is risky for a family with dependents."
  ],
  "savingsHealthScore": 48,
  "protectionScore": 35
}"#;

enum MockReply {
    Raw(String),
    Fail(String),
}

/// Mock provider for development & testing
/// Keeps the pipeline usable without an API key
pub struct MockProvider {
    reply: MockReply,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::responding(SAMPLE_ADVICE)
    }

    pub fn responding(raw: impl Into<String>) -> Self {
        Self {
            reply: MockReply::Raw(raw.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: MockReply::Fail(message.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdviceProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn submit(&self, prompt: &str, _schema: &AdviceSchema) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.reply {
            MockReply::Raw(raw) => Ok(raw.clone()),
            MockReply::Fail(message) => Err(AdvisorError::Provider(message.clone())),
        }
    }
}
