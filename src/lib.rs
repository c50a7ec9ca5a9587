//! WealthWisdom finance advisor
//!
//! Turns a user's monthly finances into advice:
//! - Holds the financial profile and computes derived metrics locally
//! - Renders the profile into a prompt plus a fixed response schema
//! - Delegates the assessment to an external generative-AI provider
//! - Validates the reply into a strongly typed advice result
//!
//! SINGLE SHOT:
//! PROFILE → METRICS → PROMPT → PROVIDER → PARSE → ANALYSIS

pub mod analyzer;
pub mod api;
pub mod config;
pub mod currency;
pub mod error;
pub mod metrics;
pub mod models;
pub mod parser;
pub mod prompt;
pub mod provider;
pub mod schema;

pub use error::Result;

// Re-export common types
pub use analyzer::{Analysis, FinanceAnalyzer};
pub use currency::{format_amount, CurrencyCode, SUPPORTED_CURRENCIES};
pub use metrics::{BudgetCategory, BudgetSlice, DerivedMetrics};
pub use models::*;
pub use parser::parse_response;
pub use prompt::build_prompt;
pub use provider::{AdviceProvider, GeminiProvider, MockProvider};
pub use schema::{request_schema, AdviceSchema, SchemaVariant};
