use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wealth_wisdom_advisor::{
    api::start_server,
    config::AdvisorConfig,
    provider::{AdviceProvider, GeminiProvider, MockProvider},
    FinanceAnalyzer,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AdvisorConfig::from_env()?;

    info!("🚀 WealthWisdom Advisor - API Server");
    info!("📍 Port: {}", config.api_port);

    let provider: Arc<dyn AdviceProvider> = if config.gemini_api_key.is_some() {
        info!(model = %config.gemini_model, "Using Gemini provider");
        Arc::new(GeminiProvider::new(&config)?)
    } else {
        warn!("⚠️  GEMINI_API_KEY not set; serving canned advice from the mock provider");
        Arc::new(MockProvider::new())
    };

    let analyzer = Arc::new(FinanceAnalyzer::new(provider));

    info!("✅ Analyzer initialized");
    info!("📡 Starting API server...");

    start_server(analyzer, config.api_port).await?;

    Ok(())
}
