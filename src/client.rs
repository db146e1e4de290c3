//! Ledger Query Service client.
//!
//! Issues read-only GET queries against the daemon and hands back either the
//! raw payload (for lookups whose shape is only known after classification)
//! or a typed value. No retries: every failure goes straight to the caller.

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::config::DaemonConfig;
use crate::error::{ExplorerError, Result};
use crate::types::{BlockSummary, ExplorerStatus, Hash};

/// The queries the resolver needs from the daemon. Implementations must be
/// safe to share between concurrent requests.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// `/explorer/gethash?hash=<hex>`; the shape depends on what the hash names.
    async fn fetch_by_hash(&self, hash: &Hash) -> Result<Vec<u8>>;

    /// `/explorer/blockdata?start=<n>&finish=<m>`, summaries for `[start, finish)`.
    async fn fetch_block_range(&self, start: u64, finish: u64) -> Result<Vec<BlockSummary>>;

    /// `/hostdb/hosts/active`, raw.
    async fn fetch_active_hosts(&self) -> Result<Vec<u8>>;

    /// `/explorer/status`
    async fn fetch_status(&self) -> Result<ExplorerStatus>;

    /// `/daemon/version`
    async fn fetch_version(&self) -> Result<String>;
}

/// HTTP implementation of [`LedgerQuery`]. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct LedgerClient {
    base_url: String,
    http: reqwest::Client,
}

impl LedgerClient {
    pub fn new(config: &DaemonConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| ExplorerError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETs `path` and returns the body. Anything but 200 is an upstream
    /// error carrying the body as diagnostic text.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        let body = response.bytes().await?;

        if status != StatusCode::OK {
            return Err(ExplorerError::Upstream(format!(
                "daemon returned {} for {}: {}",
                status,
                path,
                String::from_utf8_lossy(&body).trim()
            )));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl LedgerQuery for LedgerClient {
    async fn fetch_by_hash(&self, hash: &Hash) -> Result<Vec<u8>> {
        self.get("/explorer/gethash", &[("hash", hash.to_hex())])
            .await
    }

    async fn fetch_block_range(&self, start: u64, finish: u64) -> Result<Vec<BlockSummary>> {
        let body = self
            .get(
                "/explorer/blockdata",
                &[("start", start.to_string()), ("finish", finish.to_string())],
            )
            .await?;
        // a Go nil slice arrives as `null`
        let summaries: Option<Vec<BlockSummary>> = serde_json::from_slice(&body)?;
        Ok(summaries.unwrap_or_default())
    }

    async fn fetch_active_hosts(&self) -> Result<Vec<u8>> {
        self.get("/hostdb/hosts/active", &[]).await
    }

    async fn fetch_status(&self) -> Result<ExplorerStatus> {
        let body = self.get("/explorer/status", &[]).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_version(&self) -> Result<String> {
        let body = self.get("/daemon/version", &[]).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
