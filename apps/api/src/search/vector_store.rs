//! Vector store: resume embeddings behind a hosted similarity-search service.
//!
//! The store is built once at startup and lives in `AppState`. It is either
//! `Ready` (backend reachable, schema ensured) or `Degraded`. Every public
//! operation degrades instead of failing: search returns nothing, store hands
//! back a placeholder id tagged as such, delete does nothing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::search::embedding::Embedder;
use crate::search::keywords::extract_keywords;
use crate::search::rerank::rerank;

/// Nearest-neighbour candidates fetched per requested result, for re-ranking.
const CANDIDATE_MULTIPLIER: usize = 2;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vector database error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Vector database is not ready")]
    NotReady,

    #[error("Query error: {0}")]
    Query(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Owner and file metadata stored alongside a resume vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeMetadata {
    pub owner_id: String,
    pub file_name: String,
    pub file_path: String,
}

/// A resume as persisted in the vector database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeVector {
    pub content: String,
    pub metadata: ResumeMetadata,
    pub keywords: Vec<String>,
}

/// A raw nearest-neighbour hit as returned by a backend.
#[derive(Debug, Clone)]
pub struct VectorHit {
    pub id: Uuid,
    pub record: ResumeVector,
    pub distance: f64,
}

/// A ranked search result. `score` is the combined hybrid score after re-ranking.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub id: Uuid,
    pub owner_id: String,
    pub content: String,
    pub file_name: String,
    pub file_path: String,
    pub keywords: Vec<String>,
    pub keyword_matches: Vec<String>,
    pub distance: f64,
    pub score: f64,
}

impl From<VectorHit> for SearchResult {
    fn from(hit: VectorHit) -> Self {
        SearchResult {
            id: hit.id,
            owner_id: hit.record.metadata.owner_id,
            content: hit.record.content,
            file_name: hit.record.metadata.file_name,
            file_path: hit.record.metadata.file_path,
            keywords: hit.record.keywords,
            keyword_matches: vec![],
            distance: hit.distance,
            score: 1.0 - hit.distance,
        }
    }
}

/// Result of `VectorStore::store`.
///
/// `Degraded` still carries a fresh, syntactically valid id so callers that
/// only want availability can proceed, but it was never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOutcome {
    Stored(Uuid),
    Degraded { placeholder: Uuid, reason: String },
}

impl StoreOutcome {
    pub fn id(&self) -> Uuid {
        match self {
            StoreOutcome::Stored(id) => *id,
            StoreOutcome::Degraded { placeholder, .. } => *placeholder,
        }
    }

    /// The id, only when the vector was actually persisted.
    pub fn stored_id(&self) -> Option<Uuid> {
        match self {
            StoreOutcome::Stored(id) => Some(*id),
            StoreOutcome::Degraded { .. } => None,
        }
    }

    fn degraded(reason: impl Into<String>) -> Self {
        StoreOutcome::Degraded {
            placeholder: Uuid::new_v4(),
            reason: reason.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Backend trait
// ────────────────────────────────────────────────────────────────────────────

/// A similarity-search service holding (vector, metadata) pairs.
#[async_trait]
pub trait VectorBackend: Send + Sync {
    /// Fails unless the service accepts requests.
    async fn ready(&self) -> Result<(), VectorStoreError>;

    /// Creates the resume schema if it does not exist yet.
    async fn ensure_schema(&self) -> Result<(), VectorStoreError>;

    async fn insert(
        &self,
        id: Uuid,
        record: &ResumeVector,
        vector: &[f32],
    ) -> Result<(), VectorStoreError>;

    /// Up to `limit` nearest neighbours whose owner equals `owner_id`, nearest first.
    async fn near_vector(
        &self,
        vector: &[f32],
        owner_id: &str,
        limit: usize,
    ) -> Result<Vec<VectorHit>, VectorStoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), VectorStoreError>;

    fn name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// Initialization backoff
// ────────────────────────────────────────────────────────────────────────────

/// Bounded exponential backoff for store initialization.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): base, 2×base, 4×base and so on, capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Vector store service
// ────────────────────────────────────────────────────────────────────────────

enum StoreState {
    Ready {
        backend: Arc<dyn VectorBackend>,
        embedder: Arc<dyn Embedder>,
    },
    Degraded {
        reason: String,
    },
}

/// Resume vector store. Cheap to clone.
#[derive(Clone)]
pub struct VectorStore {
    state: Arc<StoreState>,
}

impl VectorStore {
    /// Connects to the backend and ensures the schema, retrying with backoff.
    ///
    /// Never fails: when every attempt fails the store comes up degraded.
    pub async fn initialize(
        backend: Arc<dyn VectorBackend>,
        embedder: Arc<dyn Embedder>,
        policy: &RetryPolicy,
    ) -> Self {
        let attempts = policy.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match Self::try_connect(backend.as_ref()).await {
                Ok(()) => {
                    info!(
                        "Vector store ready (backend: {}, embeddings: {}, {} dims)",
                        backend.name(),
                        embedder.name(),
                        embedder.dimension()
                    );
                    return Self {
                        state: Arc::new(StoreState::Ready { backend, embedder }),
                    };
                }
                Err(e) => {
                    error!("Vector store initialization attempt {attempt}/{attempts} failed: {e}");
                    last_error = e.to_string();
                    if attempt < attempts {
                        let delay = policy.delay_for(attempt);
                        info!("Retrying vector store initialization in {}ms", delay.as_millis());
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        error!("Vector store unavailable after {attempts} attempts; search is degraded");
        Self::degraded(last_error)
    }

    /// A store that is permanently degraded.
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            state: Arc::new(StoreState::Degraded {
                reason: reason.into(),
            }),
        }
    }

    async fn try_connect(backend: &dyn VectorBackend) -> Result<(), VectorStoreError> {
        backend.ready().await?;
        backend.ensure_schema().await
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state, StoreState::Ready { .. })
    }

    /// Embeds and persists resume content under a new id.
    pub async fn store(&self, content: &str, metadata: ResumeMetadata) -> StoreOutcome {
        let (backend, embedder) = match &*self.state {
            StoreState::Ready { backend, embedder } => (backend, embedder),
            StoreState::Degraded { reason } => {
                warn!("Vector store degraded, skipping vector storage: {reason}");
                return StoreOutcome::degraded(format!("vector store degraded: {reason}"));
            }
        };

        let record = ResumeVector {
            content: content.to_string(),
            keywords: extract_keywords(content),
            metadata,
        };

        let vector = match embedder.embed(content).await {
            Ok(v) => v,
            Err(e) => {
                error!("Embedding failed while storing resume: {e}");
                return StoreOutcome::degraded(e.to_string());
            }
        };

        let id = Uuid::new_v4();
        match backend.insert(id, &record, &vector).await {
            Ok(()) => {
                info!(
                    "Stored resume vector {id} for owner {}",
                    record.metadata.owner_id
                );
                StoreOutcome::Stored(id)
            }
            Err(e) => {
                error!("Error storing resume vector: {e}");
                StoreOutcome::degraded(e.to_string())
            }
        }
    }

    /// Hybrid search over one owner's resumes. Empty on any failure.
    pub async fn search(&self, query: &str, owner_id: &str, limit: usize) -> Vec<SearchResult> {
        if limit == 0 {
            return vec![];
        }

        let (backend, embedder) = match &*self.state {
            StoreState::Ready { backend, embedder } => (backend, embedder),
            StoreState::Degraded { .. } => {
                warn!("Vector store degraded, returning empty results");
                return vec![];
            }
        };

        let vector = match embedder.embed(query).await {
            Ok(v) => v,
            Err(e) => {
                error!("Embedding failed while searching: {e}");
                return vec![];
            }
        };

        let hits = match backend
            .near_vector(&vector, owner_id, limit * CANDIDATE_MULTIPLIER)
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                error!("Vector search error: {e}");
                return vec![];
            }
        };

        let results = hits.into_iter().map(SearchResult::from).collect();
        rerank(results, query, limit)
    }

    pub async fn delete(&self, id: Uuid) {
        let backend = match &*self.state {
            StoreState::Ready { backend, .. } => backend,
            StoreState::Degraded { .. } => {
                warn!("Vector store degraded, skipping deletion of {id}");
                return;
            }
        };

        match backend.delete(id).await {
            Ok(()) => info!("Deleted resume vector {id}"),
            Err(e) => error!("Error deleting resume vector {id}: {e}"),
        }
    }

    pub async fn close(&self) {
        info!("Vector store closed");
    }
}
