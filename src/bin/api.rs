use agentlend::api::start_server;
use agentlend::coordinator::Coordinator;
use agentlend::llm::AnthropicClient;
use agentlend::search::ExaSearch;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let anthropic_api_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_else(|_| {
        eprintln!("⚠️  ANTHROPIC_API_KEY not set in .env");
        String::new()
    });
    let exa_api_key = std::env::var("EXA_API_KEY").unwrap_or_else(|_| {
        eprintln!("⚠️  EXA_API_KEY not set in .env");
        String::new()
    });

    let api_port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()?;

    info!("🚀 AgentLend Underwriting Orchestrator - API Server");
    info!("📍 Port: {}", api_port);

    // Create collaborators and coordinator
    let model = Arc::new(AnthropicClient::new(anthropic_api_key));
    let search = Arc::new(ExaSearch::new(exa_api_key));
    let coordinator = Arc::new(Coordinator::new(model, search));

    info!("✅ Underwriting team ready: Business Verifier, Financial Analyst, Risk Assessor");
    info!("📡 Starting API server...");

    start_server(coordinator, api_port).await?;

    Ok(())
}
