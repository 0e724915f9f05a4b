use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_API_URL;
use crate::search::embedding::DEFAULT_EMBEDDING_URL;
use crate::search::vector_store::RetryPolicy;

/// S3/MinIO settings, present only when `S3_BUCKET` is set.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Application configuration loaded from environment variables.
///
/// Every external service is optional. A missing one selects its local
/// stand-in (in-memory repository, local files, in-memory vectors, hashing
/// embeddings, template-only advice).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub s3: Option<S3Config>,
    pub upload_dir: PathBuf,
    pub vector_db_url: Option<String>,
    pub huggingface_api_key: Option<String>,
    pub embedding_api_url: String,
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub vector_init_max_attempts: u32,
    pub vector_init_base_delay_ms: u64,
    pub vector_init_max_delay_ms: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3 = match optional_env("S3_BUCKET") {
            Some(bucket) => Some(S3Config {
                bucket,
                endpoint: require_env("S3_ENDPOINT")?,
                access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            }),
            None => None,
        };

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            s3,
            upload_dir: optional_env("UPLOAD_DIR")
                .unwrap_or_else(|| "uploads".to_string())
                .into(),
            vector_db_url: optional_env("VECTOR_DB_URL"),
            huggingface_api_key: optional_env("HUGGINGFACE_API_KEY"),
            embedding_api_url: optional_env("EMBEDDING_API_URL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_URL.to_string()),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_api_url: optional_env("OPENAI_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            vector_init_max_attempts: parse_env("VECTOR_INIT_MAX_ATTEMPTS", 3)?,
            vector_init_base_delay_ms: parse_env("VECTOR_INIT_BASE_DELAY_MS", 1000)?,
            vector_init_max_delay_ms: parse_env("VECTOR_INIT_MAX_DELAY_MS", 8000)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.vector_init_max_attempts,
            base_delay: Duration::from_millis(self.vector_init_base_delay_ms),
            max_delay: Duration::from_millis(self.vector_init_max_delay_ms),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values both count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_when_unset() {
        let value: u32 = parse_env("JOBASSIST_TEST_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = Config {
            database_url: None,
            s3: None,
            upload_dir: "uploads".into(),
            vector_db_url: None,
            huggingface_api_key: None,
            embedding_api_url: DEFAULT_EMBEDDING_URL.to_string(),
            openai_api_key: None,
            openai_api_url: DEFAULT_API_URL.to_string(),
            vector_init_max_attempts: 5,
            vector_init_base_delay_ms: 250,
            vector_init_max_delay_ms: 2000,
            port: 8080,
            rust_log: "info".to_string(),
        };

        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
        assert_eq!(policy.max_delay, Duration::from_millis(2000));
    }
}
