//! In-process vector backend. Brute-force cosine distance over a map.
//!
//! Used when no vector database is configured, and by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::search::embedding::cosine_distance;
use crate::search::vector_store::{ResumeVector, VectorBackend, VectorHit, VectorStoreError};

#[derive(Default)]
pub struct MemoryVectorBackend {
    entries: RwLock<HashMap<Uuid, (ResumeVector, Vec<f32>)>>,
}

impl MemoryVectorBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl VectorBackend for MemoryVectorBackend {
    async fn ready(&self) -> Result<(), VectorStoreError> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), VectorStoreError> {
        Ok(())
    }

    async fn insert(
        &self,
        id: Uuid,
        record: &ResumeVector,
        vector: &[f32],
    ) -> Result<(), VectorStoreError> {
        self.entries
            .write()
            .await
            .insert(id, (record.clone(), vector.to_vec()));
        Ok(())
    }

    async fn near_vector(
        &self,
        vector: &[f32],
        owner_id: &str,
        limit: usize,
    ) -> Result<Vec<VectorHit>, VectorStoreError> {
        let entries = self.entries.read().await;
        let mut hits: Vec<VectorHit> = entries
            .iter()
            .filter(|(_, (record, _))| record.metadata.owner_id == owner_id)
            .map(|(id, (record, stored))| VectorHit {
                id: *id,
                record: record.clone(),
                distance: cosine_distance(vector, stored),
            })
            .collect();

        // id as secondary key keeps results stable across HashMap iteration orders
        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(limit);
        Ok(hits)
    }

    async fn delete(&self, id: Uuid) -> Result<(), VectorStoreError> {
        self.entries.write().await.remove(&id);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
