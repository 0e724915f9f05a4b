//! Weaviate backend over its REST and GraphQL APIs.
//!
//! Vectors are computed client-side (`vectorizer: none`); the class uses an
//! HNSW index with cosine distance.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::search::vector_store::{
    ResumeMetadata, ResumeVector, VectorBackend, VectorHit, VectorStoreError,
};

pub const CLASS_NAME: &str = "Resume";

#[derive(Clone)]
pub struct WeaviateBackend {
    client: Client,
    base_url: String,
}

impl WeaviateBackend {
    pub fn new(base_url: &str) -> Result<Self, VectorStoreError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Class definition for resume documents.
fn resume_class_schema() -> Value {
    json!({
        "class": CLASS_NAME,
        "description": "Resume documents with semantic embeddings",
        "vectorizer": "none",
        "vectorIndexType": "hnsw",
        "vectorIndexConfig": {
            "distance": "cosine",
            "efConstruction": 128,
            "maxConnections": 64
        },
        "properties": [
            {"name": "content", "dataType": ["text"], "description": "Full resume text content", "indexSearchable": true},
            {"name": "ownerId", "dataType": ["text"], "description": "Owner of this resume", "tokenization": "field"},
            {"name": "fileName", "dataType": ["text"], "description": "Original filename"},
            {"name": "filePath", "dataType": ["text"], "description": "File storage location"},
            {"name": "keywords", "dataType": ["text[]"], "description": "Extracted keywords and skills"},
            {"name": "createdAt", "dataType": ["date"], "description": "Creation timestamp"}
        ]
    })
}

fn object_body(id: Uuid, record: &ResumeVector, vector: &[f32]) -> Value {
    json!({
        "class": CLASS_NAME,
        "id": id,
        "properties": {
            "content": record.content,
            "ownerId": record.metadata.owner_id,
            "fileName": record.metadata.file_name,
            "filePath": record.metadata.file_path,
            "keywords": record.keywords,
            "createdAt": chrono::Utc::now().to_rfc3339(),
        },
        "vector": vector,
    })
}

/// GraphQL `Get` query: nearest vectors restricted to one owner.
fn near_vector_query(vector: &[f32], owner_id: &str, limit: usize) -> String {
    let vector = vector
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");
    // a JSON string literal is a valid GraphQL string literal
    let owner = serde_json::Value::String(owner_id.to_string()).to_string();

    format!(
        "{{ Get {{ {CLASS_NAME}(nearVector: {{vector: [{vector}]}}, \
         where: {{path: [\"ownerId\"], operator: Equal, valueText: {owner}}}, \
         limit: {limit}) {{ content ownerId fileName filePath keywords _additional {{ id distance }} }} }} }}"
    )
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<GraphQlData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlData {
    #[serde(rename = "Get")]
    get: HashMap<String, Option<Vec<ResumeObject>>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResumeObject {
    content: String,
    owner_id: String,
    file_name: String,
    file_path: String,
    keywords: Option<Vec<String>>,
    #[serde(rename = "_additional")]
    additional: Additional,
}

#[derive(Debug, Deserialize)]
struct Additional {
    id: Uuid,
    distance: f64,
}

fn parse_hits(body: GraphQlResponse) -> Result<Vec<VectorHit>, VectorStoreError> {
    if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
        let message = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(VectorStoreError::Query(message));
    }

    let objects = body
        .data
        .and_then(|mut d| d.get.remove(CLASS_NAME))
        .flatten()
        .unwrap_or_default();

    Ok(objects
        .into_iter()
        .map(|o| VectorHit {
            id: o.additional.id,
            distance: o.additional.distance,
            record: ResumeVector {
                content: o.content,
                metadata: ResumeMetadata {
                    owner_id: o.owner_id,
                    file_name: o.file_name,
                    file_path: o.file_path,
                },
                keywords: o.keywords.unwrap_or_default(),
            },
        })
        .collect())
}

async fn api_error(response: reqwest::Response) -> VectorStoreError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    VectorStoreError::Api { status, message }
}

#[async_trait]
impl VectorBackend for WeaviateBackend {
    async fn ready(&self) -> Result<(), VectorStoreError> {
        let response = self
            .client
            .get(self.url("/v1/.well-known/ready"))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(VectorStoreError::NotReady);
        }
        info!("Weaviate connection established at {}", self.base_url);
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), VectorStoreError> {
        let response = self
            .client
            .get(self.url(&format!("/v1/schema/{CLASS_NAME}")))
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => {
                info!("Schema for class {CLASS_NAME} already exists");
                Ok(())
            }
            StatusCode::NOT_FOUND => {
                let response = self
                    .client
                    .post(self.url("/v1/schema"))
                    .json(&resume_class_schema())
                    .send()
                    .await?;
                if !response.status().is_success() {
                    return Err(api_error(response).await);
                }
                info!("Created Weaviate schema for class {CLASS_NAME}");
                Ok(())
            }
            _ => Err(api_error(response).await),
        }
    }

    async fn insert(
        &self,
        id: Uuid,
        record: &ResumeVector,
        vector: &[f32],
    ) -> Result<(), VectorStoreError> {
        let response = self
            .client
            .post(self.url("/v1/objects"))
            .json(&object_body(id, record, vector))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }

    async fn near_vector(
        &self,
        vector: &[f32],
        owner_id: &str,
        limit: usize,
    ) -> Result<Vec<VectorHit>, VectorStoreError> {
        let response = self
            .client
            .post(self.url("/v1/graphql"))
            .json(&json!({ "query": near_vector_query(vector, owner_id, limit) }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let body: GraphQlResponse = response.json().await?;
        parse_hits(body)
    }

    async fn delete(&self, id: Uuid) -> Result<(), VectorStoreError> {
        let response = self
            .client
            .delete(self.url(&format!("/v1/objects/{CLASS_NAME}/{id}")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "weaviate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_uses_cosine_hnsw_without_vectorizer() {
        let schema = resume_class_schema();
        assert_eq!(schema["class"], "Resume");
        assert_eq!(schema["vectorizer"], "none");
        assert_eq!(schema["vectorIndexConfig"]["distance"], "cosine");
        assert_eq!(schema["vectorIndexConfig"]["efConstruction"], 128);
        assert_eq!(schema["vectorIndexConfig"]["maxConnections"], 64);
        let names: Vec<_> = schema["properties"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["content", "ownerId", "fileName", "filePath", "keywords", "createdAt"]
        );
    }

    #[test]
    fn test_object_body_carries_metadata_and_vector() {
        let id = Uuid::new_v4();
        let record = ResumeVector {
            content: "Rust engineer".to_string(),
            metadata: ResumeMetadata {
                owner_id: "u1".to_string(),
                file_name: "cv.pdf".to_string(),
                file_path: "resumes/u1/cv.pdf".to_string(),
            },
            keywords: vec!["rust".to_string()],
        };
        let body = object_body(id, &record, &[0.5, 0.25]);
        assert_eq!(body["id"], id.to_string());
        assert_eq!(body["properties"]["ownerId"], "u1");
        assert_eq!(body["properties"]["keywords"][0], "rust");
        assert_eq!(body["vector"][1], 0.25);
    }

    #[test]
    fn test_query_filters_on_owner_and_limit() {
        let query = near_vector_query(&[0.5, -1.0], "u1", 10);
        assert!(query.contains("Resume(nearVector: {vector: [0.5,-1]}"));
        assert!(query.contains(r#"path: ["ownerId"], operator: Equal, valueText: "u1""#));
        assert!(query.contains("limit: 10"));
        assert!(query.contains("_additional { id distance }"));
    }

    #[test]
    fn test_query_escapes_owner() {
        let query = near_vector_query(&[1.0], "evil\" } }", 1);
        assert!(query.contains(r#"valueText: "evil\" } }""#));
    }

    #[test]
    fn test_parse_hits_reads_additional_fields() {
        let id = Uuid::new_v4();
        let body: GraphQlResponse = serde_json::from_value(json!({
            "data": {"Get": {"Resume": [{
                "content": "Python developer",
                "ownerId": "u1",
                "fileName": "cv.pdf",
                "filePath": "resumes/u1/cv.pdf",
                "keywords": ["python"],
                "_additional": {"id": id, "distance": 0.2}
            }]}}
        }))
        .unwrap();

        let hits = parse_hits(body).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, id);
        assert!((hits[0].distance - 0.2).abs() < 1e-12);
        assert_eq!(hits[0].record.metadata.owner_id, "u1");
        assert_eq!(hits[0].record.keywords, vec!["python"]);
    }

    #[test]
    fn test_parse_hits_null_class_is_empty() {
        let body: GraphQlResponse =
            serde_json::from_value(json!({"data": {"Get": {"Resume": null}}})).unwrap();
        assert!(parse_hits(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_hits_surfaces_graphql_errors() {
        let body: GraphQlResponse = serde_json::from_value(json!({
            "data": null,
            "errors": [{"message": "no such class"}]
        }))
        .unwrap();
        let err = parse_hits(body).unwrap_err();
        assert!(err.to_string().contains("no such class"));
    }

    mod over_http {
        use super::*;
        use std::sync::{Arc, Mutex};

        use axum::http::StatusCode;
        use axum::{routing, Json, Router};

        /// Serves `router` on an ephemeral local port and returns its base URL.
        async fn serve(router: Router) -> String {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, router).await.unwrap();
            });
            format!("http://{addr}")
        }

        fn record() -> ResumeVector {
            ResumeVector {
                content: "Rust engineer".to_string(),
                metadata: ResumeMetadata {
                    owner_id: "u1".to_string(),
                    file_name: "cv.pdf".to_string(),
                    file_path: "resumes/u1/cv.pdf".to_string(),
                },
                keywords: vec!["rust".to_string()],
            }
        }

        #[tokio::test]
        async fn test_missing_class_is_created() {
            let posted = Arc::new(Mutex::new(Vec::<Value>::new()));
            let recorder = posted.clone();
            let router = Router::new()
                .route("/v1/.well-known/ready", routing::get(|| async { StatusCode::OK }))
                .route("/v1/schema/Resume", routing::get(|| async { StatusCode::NOT_FOUND }))
                .route(
                    "/v1/schema",
                    routing::post(move |Json(body): Json<Value>| {
                        let recorder = recorder.clone();
                        async move {
                            recorder.lock().unwrap().push(body);
                            StatusCode::OK
                        }
                    }),
                );
            let backend = WeaviateBackend::new(&serve(router).await).unwrap();

            backend.ready().await.unwrap();
            backend.ensure_schema().await.unwrap();

            let posted = posted.lock().unwrap();
            assert_eq!(posted.len(), 1);
            assert_eq!(posted[0]["class"], "Resume");
            assert_eq!(posted[0]["vectorizer"], "none");
        }

        #[tokio::test]
        async fn test_existing_class_is_left_alone() {
            let router = Router::new()
                .route("/v1/schema/Resume", routing::get(|| async { StatusCode::OK }))
                .route(
                    "/v1/schema",
                    routing::post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, "class exists") }),
                );
            let backend = WeaviateBackend::new(&serve(router).await).unwrap();

            backend.ensure_schema().await.unwrap();
        }

        #[tokio::test]
        async fn test_error_statuses_map_to_api_errors() {
            let router = Router::new()
                .route(
                    "/v1/.well-known/ready",
                    routing::get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
                )
                .route(
                    "/v1/schema/Resume",
                    routing::get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "schema down") }),
                )
                .route(
                    "/v1/objects",
                    routing::post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
                )
                .route(
                    "/v1/objects/Resume/:id",
                    routing::delete(|| async { (StatusCode::NOT_FOUND, "no such object") }),
                );
            let backend = WeaviateBackend::new(&serve(router).await).unwrap();

            assert!(matches!(backend.ready().await, Err(VectorStoreError::NotReady)));

            match backend.ensure_schema().await {
                Err(VectorStoreError::Api { status, message }) => {
                    assert_eq!(status, 500);
                    assert_eq!(message, "schema down");
                }
                other => panic!("unexpected result: {other:?}"),
            }

            match backend.insert(Uuid::new_v4(), &record(), &[0.1, 0.2]).await {
                Err(VectorStoreError::Api { status, message }) => {
                    assert_eq!(status, 500);
                    assert_eq!(message, "boom");
                }
                other => panic!("unexpected result: {other:?}"),
            }

            match backend.delete(Uuid::new_v4()).await {
                Err(VectorStoreError::Api { status, .. }) => assert_eq!(status, 404),
                other => panic!("unexpected result: {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_near_vector_posts_graphql_and_parses_hits() {
            let id = Uuid::new_v4();
            let queries = Arc::new(Mutex::new(Vec::<String>::new()));
            let recorder = queries.clone();
            let router = Router::new().route(
                "/v1/graphql",
                routing::post(move |Json(body): Json<Value>| {
                    let recorder = recorder.clone();
                    async move {
                        recorder
                            .lock()
                            .unwrap()
                            .push(body["query"].as_str().unwrap_or_default().to_string());
                        Json(json!({
                            "data": {"Get": {"Resume": [{
                                "content": "Rust engineer",
                                "ownerId": "u1",
                                "fileName": "cv.pdf",
                                "filePath": "resumes/u1/cv.pdf",
                                "keywords": ["rust"],
                                "_additional": {"id": id, "distance": 0.1}
                            }]}}
                        }))
                    }
                }),
            );
            let backend = WeaviateBackend::new(&serve(router).await).unwrap();

            let hits = backend.near_vector(&[1.0, 0.0], "u1", 4).await.unwrap();

            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].id, id);
            assert_eq!(hits[0].record.metadata.file_name, "cv.pdf");
            let queries = queries.lock().unwrap();
            assert!(queries[0].contains(r#"valueText: "u1""#));
            assert!(queries[0].contains("limit: 4"));
        }
    }
}
