// Resume search: keyword extraction, embeddings, vector storage and hybrid re-ranking.
// Every call into the embedding model or vector database goes through VectorStore.

pub mod embedding;
pub mod keywords;
pub mod memory;
pub mod rerank;
pub mod vector_store;
pub mod weaviate;
