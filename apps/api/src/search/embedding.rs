//! Embedding clients. Text in, fixed-length vector out.
//!
//! `HostedEmbedder` calls the HuggingFace feature-extraction pipeline for
//! all-MiniLM-L6-v2. `HashingEmbedder` is a local stand-in with the same
//! dimensionality, used when no embedding credentials are configured.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Output dimensionality of all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

pub const DEFAULT_EMBEDDING_URL: &str = "https://api-inference.huggingface.co/pipeline/feature-extraction/sentence-transformers/all-MiniLM-L6-v2";

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding has {actual} dimensions, expected {expected}")]
    Dimension { expected: usize, actual: usize },

    #[error("Embedding API returned no vector")]
    Empty,
}

/// Converts text to a fixed-length vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// Hosted embedder
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a str,
    options: FeatureExtractionOptions,
}

#[derive(Debug, Serialize)]
struct FeatureExtractionOptions {
    wait_for_model: bool,
}

/// The pipeline returns a pooled vector for a single input, but some
/// deployments wrap it in a batch of one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureExtractionResponse {
    Flat(Vec<f32>),
    Batched(Vec<Vec<f32>>),
}

impl FeatureExtractionResponse {
    fn into_vector(self) -> Option<Vec<f32>> {
        match self {
            FeatureExtractionResponse::Flat(v) => Some(v),
            FeatureExtractionResponse::Batched(batch) => batch.into_iter().next(),
        }
    }
}

#[derive(Clone)]
pub struct HostedEmbedder {
    client: Client,
    url: String,
    api_key: String,
}

impl HostedEmbedder {
    pub fn new(url: String, api_key: String) -> Result<Self, EmbeddingError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            url,
            api_key,
        })
    }
}

#[async_trait]
impl Embedder for HostedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&FeatureExtractionRequest {
                inputs: text,
                options: FeatureExtractionOptions {
                    wait_for_model: true,
                },
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: FeatureExtractionResponse = response.json().await?;
        let vector = body.into_vector().ok_or(EmbeddingError::Empty)?;
        check_dimension(vector, EMBEDDING_DIM)
    }

    fn name(&self) -> &'static str {
        "hosted"
    }
}

fn check_dimension(vector: Vec<f32>, expected: usize) -> Result<Vec<f32>, EmbeddingError> {
    if vector.len() != expected {
        return Err(EmbeddingError::Dimension {
            expected,
            actual: vector.len(),
        });
    }
    Ok(vector)
}

// ────────────────────────────────────────────────────────────────────────────
// Hashing embedder
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic bag-of-words embedder using signed feature hashing.
///
/// Texts that share tokens land close under cosine distance, which is all
/// the demo mode and tests need. Output is L2-normalized.
#[derive(Debug, Clone, Default)]
pub struct HashingEmbedder;

impl HashingEmbedder {
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; EMBEDDING_DIM];

        for token in text
            .split(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
            .filter(|t| !t.is_empty())
        {
            let hash = fnv1a(token.to_lowercase().as_bytes());
            let bucket = (hash % EMBEDDING_DIM as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_sync(text))
    }

    fn name(&self) -> &'static str {
        "hashing"
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in bytes {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

/// Picks the hosted embedder when an API key is configured, else the hashing one.
pub fn build_embedder(
    url: &str,
    api_key: Option<&str>,
) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    match api_key {
        Some(key) => {
            info!("Using hosted embeddings at {url}");
            Ok(Arc::new(HostedEmbedder::new(url.to_string(), key.to_string())?))
        }
        None => {
            info!("Using local hashing embeddings ({EMBEDDING_DIM} dims)");
            Ok(Arc::new(HashingEmbedder))
        }
    }
}

/// Cosine distance (`1 - cosine similarity`). Zero vectors are at distance 1.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let na: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let nb: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 1.0;
    }
    1.0 - dot / (na * nb)
}
