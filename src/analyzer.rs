//! Single-shot analysis pipeline
//!
//! PROFILE → METRICS → PROMPT → PROVIDER → PARSE → ANALYSIS
//!
//! Nothing is stored. Logs identify a submission by a digest of the
//! profile rather than its amounts.

use crate::metrics::DerivedMetrics;
use crate::models::{AdviceResult, FinancialProfile};
use crate::parser::parse_with_schema;
use crate::prompt::build_prompt;
use crate::provider::AdviceProvider;
use crate::schema::{request_schema, SchemaVariant};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub analysis_id: Uuid,
    pub profile_digest: String,
    pub provider: String,
    pub metrics: DerivedMetrics,
    pub advice: AdviceResult,
    pub generated_at: DateTime<Utc>,
}

pub struct FinanceAnalyzer {
    provider: Arc<dyn AdviceProvider>,
}

impl FinanceAnalyzer {
    pub fn new(provider: Arc<dyn AdviceProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Run one analysis. Provider and parse failures are returned as-is;
    /// callers decide how to present them.
    pub async fn analyze(&self, profile: &FinancialProfile) -> Result<Analysis> {
        let start = Instant::now();
        let analysis_id = Uuid::new_v4();
        let digest = profile_digest(profile);

        let variant = if profile.goals.is_empty() {
            SchemaVariant::Basic
        } else {
            SchemaVariant::WithGoals
        };
        let schema = request_schema(variant);

        let metrics = profile.metrics();
        let prompt = build_prompt(profile);

        info!(
            analysis_id = %analysis_id,
            profile_digest = %digest,
            provider = self.provider.name(),
            schema = ?variant,
            "Starting analysis"
        );
        debug!(prompt_chars = prompt.len(), "Prompt rendered");

        let outcome = match self.provider.submit(&prompt, &schema).await {
            Ok(raw) => parse_with_schema(&raw, &schema),
            Err(e) => Err(e),
        };

        let advice = outcome.map_err(|e| {
            error!(
                analysis_id = %analysis_id,
                kind = e.kind(),
                error = %e,
                "Analysis failed"
            );
            e
        })?;

        info!(
            analysis_id = %analysis_id,
            risk_level = %advice.risk_level,
            health_score = advice.health_score,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Analysis completed"
        );

        Ok(Analysis {
            analysis_id,
            profile_digest: digest,
            provider: self.provider.name().to_string(),
            metrics,
            advice,
            generated_at: Utc::now(),
        })
    }
}

/// Short SHA-256 fingerprint of the profile's JSON form.
pub fn profile_digest(profile: &FinancialProfile) -> String {
    let bytes = serde_json::to_vec(profile).unwrap_or_default();
    let hash = Sha256::digest(&bytes);
    hex::encode(&hash[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use crate::models::{FinancialGoal, RiskLevel, SavingsBreakdown};
    use crate::provider::MockProvider;

    fn sample_profile() -> FinancialProfile {
        FinancialProfile {
            monthly_income: 50_000.0,
            monthly_expenses: 20_000.0,
            monthly_emi: 10_000.0,
            dependents: 2.0,
            savings: SavingsBreakdown {
                general_savings: 5_000.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_analysis_combines_metrics_and_advice() {
        let provider = Arc::new(MockProvider::new());
        let analyzer = FinanceAnalyzer::new(provider.clone());

        let analysis = analyzer.analyze(&sample_profile()).await.unwrap();

        assert_eq!(analysis.metrics.total_savings, 5_000.0);
        assert_eq!(analysis.metrics.total_outflow, 35_000.0);
        assert_eq!(analysis.metrics.surplus, 15_000.0);
        assert_eq!(analysis.advice.risk_level, RiskLevel::Medium);
        assert_eq!(analysis.provider, "mock");
        assert_eq!(analysis.profile_digest.len(), 16);

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- Dependents: 2"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_analysis_failure() {
        let analyzer = FinanceAnalyzer::new(Arc::new(MockProvider::failing("401 unauthorized")));
        let err = analyzer.analyze(&sample_profile()).await.unwrap_err();

        assert!(matches!(err, AdvisorError::Provider(_)));
        assert!(err.is_analysis_failure());
    }

    #[tokio::test]
    async fn test_malformed_reply_is_analysis_failure() {
        let analyzer = FinanceAnalyzer::new(Arc::new(MockProvider::responding(
            r#"{"healthScore": 50}"#,
        )));
        let err = analyzer.analyze(&sample_profile()).await.unwrap_err();

        assert!(matches!(err, AdvisorError::MalformedAdvice(_)));
        assert!(err.is_analysis_failure());
    }

    #[tokio::test]
    async fn test_goals_switch_prompt_variant() {
        let provider = Arc::new(MockProvider::new());
        let analyzer = FinanceAnalyzer::new(provider.clone());

        let profile = FinancialProfile {
            goals: vec![FinancialGoal {
                name: "Car".to_string(),
                target_amount: 800_000.0,
                years: 3,
            }],
            ..sample_profile()
        };

        // goalFeasibility is optional, so the canned reply still parses
        let analysis = analyzer.analyze(&profile).await.unwrap();
        assert!(analysis.advice.goal_feasibility.is_none());
        assert!(provider.prompts()[0].contains("goalFeasibility"));
    }

    #[test]
    fn test_digest_is_stable_and_hides_amounts() {
        let profile = sample_profile();
        let digest = profile_digest(&profile);

        assert_eq!(digest, profile_digest(&profile.clone()));
        assert!(!digest.contains("50000"));

        let other = FinancialProfile {
            monthly_income: 50_001.0,
            ..sample_profile()
        };
        assert_ne!(digest, profile_digest(&other));
    }
}
