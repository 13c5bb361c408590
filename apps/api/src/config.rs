use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every value has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory accepted uploads are persisted under.
    pub upload_dir: PathBuf,
    /// Number of resumes returned by the ranker.
    pub top_n: usize,
    /// Skill terms the ATS scorer looks for in resume text.
    pub skill_vocabulary: Vec<String>,
    /// Per-file upload size cap in bytes.
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Redis connection string.
    pub redis_url: String,
    /// Anthropic API key for the LLM client.
    pub anthropic_api_key: String,
    /// S3 / MinIO access key id.
    pub aws_access_key_id: String,
    /// S3 / MinIO secret access key.
    pub aws_secret_access_key: String,
    /// S3 / MinIO endpoint URL.
    pub s3_endpoint: String,
}

const DEFAULT_SKILL_VOCABULARY: &str = "python,java,sql,machine learning,data science";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            upload_dir: PathBuf::from(
                std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            ),
            top_n: std::env::var("TOP_N")
                .unwrap_or_else(|_| "3".to_string())
                .parse::<usize>()
                .context("TOP_N must be a positive integer")?,
            skill_vocabulary: parse_skill_vocabulary(
                &std::env::var("SKILL_VOCABULARY")
                    .unwrap_or_else(|_| DEFAULT_SKILL_VOCABULARY.to_string()),
            ),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/templar".to_string()),
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            aws_access_key_id: std::env::var("AWS_ACCESS_KEY_ID")
                .unwrap_or_else(|_| "minioadmin".to_string()),
            aws_secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY")
                .unwrap_or_else(|_| "minioadmin".to_string()),
            s3_endpoint: std::env::var("S3_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
        })
    }
}

/// Comma-separated, lowercased, empty entries dropped.
fn parse_skill_vocabulary(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skill_vocabulary_defaults() {
        let vocab = parse_skill_vocabulary(DEFAULT_SKILL_VOCABULARY);
        assert_eq!(
            vocab,
            vec!["python", "java", "sql", "machine learning", "data science"]
        );
    }

    #[test]
    fn test_parse_skill_vocabulary_trims_and_lowercases() {
        let vocab = parse_skill_vocabulary(" Rust , Kubernetes ,, SQL ");
        assert_eq!(vocab, vec!["rust", "kubernetes", "sql"]);
    }

    #[test]
    fn test_parse_skill_vocabulary_empty_input() {
        assert!(parse_skill_vocabulary("").is_empty());
    }
}
