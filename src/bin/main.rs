use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wealth_wisdom_advisor::{
    config::AdvisorConfig,
    provider::{AdviceProvider, GeminiProvider, MockProvider},
    FinanceAnalyzer, FinancialProfile, InsurancePolicy, PolicyFrequency, SavingsBreakdown,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    info!("WealthWisdom Advisor starting");

    let config = AdvisorConfig::from_env()?;
    let provider: Arc<dyn AdviceProvider> = match &config.gemini_api_key {
        Some(_) => Arc::new(GeminiProvider::new(&config)?),
        None => {
            warn!("GEMINI_API_KEY not set, using mock provider");
            Arc::new(MockProvider::new())
        }
    };

    let analyzer = FinanceAnalyzer::new(provider);

    // Sample household
    let profile = FinancialProfile {
        monthly_income: 50_000.0,
        monthly_expenses: 20_000.0,
        monthly_emi: 10_000.0,
        health_expenses: 2_000.0,
        dependents: 2.0,
        savings: SavingsBreakdown {
            mutual_funds: 2_000.0,
            general_savings: 3_000.0,
            ..Default::default()
        },
        life_insurance: InsurancePolicy::held(12_000.0, PolicyFrequency::Yearly),
        ..Default::default()
    };

    let metrics = profile.metrics();
    println!("\n=== DERIVED METRICS ===");
    println!("Total Savings: {}", profile.format(metrics.total_savings));
    println!("Total Outflow: {}", profile.format(metrics.total_outflow));
    println!("Surplus:       {}", profile.format(metrics.surplus));
    println!("Savings Ratio: {:.1}%", metrics.savings_ratio * 100.0);
    for slice in &metrics.budget_split {
        println!("  {:<9} {}", slice.category.label(), profile.format(slice.amount));
    }

    match analyzer.analyze(&profile).await {
        Ok(analysis) => {
            let advice = &analysis.advice;
            println!("\n=== ANALYSIS ({}) ===", analysis.provider);
            println!("Risk Level:   {}", advice.risk_level);
            println!("Health Score: {} ({})", advice.health_score, advice.health_status);
            println!("\n{}", advice.explanation);
            println!("\nSmart Actions:");
            for (i, action) in advice.smart_actions.iter().enumerate() {
                println!("  {}: {}", i + 1, action);
            }
            if !advice.warnings.is_empty() {
                println!("\nWarnings:");
                for warning in &advice.warnings {
                    println!("  - {}", warning);
                }
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}
