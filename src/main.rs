//! ATLAS dialogue server binary.
//!
//! Loads configuration from the environment, wires the dialogue engine to its
//! adapters and serves the HTTP and WebSocket API until Ctrl+C.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use atlas_dialogue::adapters::ai::{
    CannedResponseSynthesizer, ChatCompletionsConfig, ChatCompletionsProvider,
    LlmResponseSynthesizer,
};
use atlas_dialogue::adapters::http::{app_router, DialogueHandlers};
use atlas_dialogue::adapters::storage::{InMemorySessionStore, JsonlSessionArchive};
use atlas_dialogue::application::handlers::DialogueManager;
use atlas_dialogue::config::AppConfig;
use atlas_dialogue::ports::{AIProvider, ResponseSynthesizer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let synthesizer = build_synthesizer(&config)?;
    let manager = DialogueManager::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(JsonlSessionArchive::new(&config.storage.archive_path)),
        synthesizer,
    )
    .with_params(config.dialogue.params());

    let handlers = DialogueHandlers::new(Arc::new(manager))
        .with_verbose_errors(config.features.verbose_errors);
    let app = app_router(handlers, &config.server, &config.features);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        %addr,
        environment = ?config.server.environment,
        archive = %config.storage.archive_path.display(),
        "ATLAS dialogue server listening"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_synthesizer(
    config: &AppConfig,
) -> Result<Arc<dyn ResponseSynthesizer>, Box<dyn std::error::Error>> {
    let api_key = match config.ai.api_key() {
        Some(key) if !config.features.offline_synthesis => key,
        _ => {
            warn!("offline synthesis enabled, agent replies use canned text");
            return Ok(Arc::new(CannedResponseSynthesizer::new()));
        }
    };

    let provider = ChatCompletionsProvider::new(
        ChatCompletionsConfig::new(api_key)
            .with_base_url(&config.ai.base_url)
            .with_model(&config.ai.model)
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    )?;
    let info = provider.provider_info();
    info!(provider = %info.name, model = %info.model, "hosted model configured");

    let provider: Arc<dyn AIProvider> = Arc::new(provider);
    Ok(Arc::new(
        LlmResponseSynthesizer::new(provider)
            .with_temperature(config.ai.temperature)
            .with_max_tokens(config.ai.max_tokens),
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
