mod advisor;
mod config;
mod db;
mod errors;
mod llm_client;
mod matching;
mod models;
mod repository;
mod resumes;
mod routes;
mod search;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::advisor::Advisor;
use crate::config::{Config, S3Config};
use crate::db::build_repository;
use crate::llm_client::{ChatModel, LlmClient};
use crate::resumes::storage::{FileStore, LocalFileStore, S3FileStore};
use crate::routes::build_router;
use crate::search::embedding::build_embedder;
use crate::search::memory::MemoryVectorBackend;
use crate::search::vector_store::{VectorBackend, VectorStore};
use crate::search::weaviate::WeaviateBackend;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed or incomplete env)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobAssist API v{}", env!("CARGO_PKG_VERSION"));

    // Persistence
    let repo = build_repository(config.database_url.as_deref()).await?;
    info!("Repository initialized ({})", repo.name());

    // File storage
    let files: Arc<dyn FileStore> = match &config.s3 {
        Some(s3) => Arc::new(S3FileStore::new(
            build_s3_client(s3).await,
            s3.bucket.clone(),
        )),
        None => {
            warn!(
                "S3_BUCKET not set; storing uploads under {}",
                config.upload_dir.display()
            );
            Arc::new(LocalFileStore::new(config.upload_dir.clone()))
        }
    };
    info!("File storage initialized ({})", files.name());

    // Vector search
    let embedder = build_embedder(
        &config.embedding_api_url,
        config.huggingface_api_key.as_deref(),
    )?;
    let backend: Arc<dyn VectorBackend> = match &config.vector_db_url {
        Some(url) => Arc::new(WeaviateBackend::new(url)?),
        None => {
            warn!("VECTOR_DB_URL not set; using in-memory vector index");
            Arc::new(MemoryVectorBackend::new())
        }
    };
    let vector_store = VectorStore::initialize(backend, embedder, &config.retry_policy()).await;

    // Text generation
    let model: Option<Arc<dyn ChatModel>> = match &config.openai_api_key {
        Some(key) => {
            let client = LlmClient::new(config.openai_api_url.clone(), key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(client))
        }
        None => None,
    };
    let advisor = Advisor::new(model);

    let state = AppState {
        repo,
        files,
        vector_store: vector_store.clone(),
        advisor,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down JobAssist API...");
    vector_store.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(s3: &S3Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &s3.access_key_id,
        &s3.secret_access_key,
        None,
        None,
        "jobassist-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&s3.endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
