//! Shared HTTP context
//!
//! One `reqwest::Client` serves every catalog client and every concurrent
//! lookup. It is built lazily on first use, dropped by `shutdown()`, and
//! rebuilt transparently by the next `client()` call after a shutdown.

use crate::clients::CatalogError;
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Default User-Agent sent with every request (Discogs rejects requests without one)
pub fn default_user_agent() -> String {
    format!("mika-album/{}", env!("CARGO_PKG_VERSION"))
}

/// Owner of the process-wide HTTP client
pub struct HttpContext {
    user_agent: String,
    client: RwLock<Option<Client>>,
}

impl HttpContext {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            client: RwLock::new(None),
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Current client, building one if none is active
    ///
    /// `reqwest::Client` is reference counted internally, so the returned
    /// handle shares the connection pool with every other caller.
    pub async fn client(&self) -> Result<Client, CatalogError> {
        if let Some(client) = self.client.read().await.as_ref() {
            return Ok(client.clone());
        }

        let mut slot = self.client.write().await;
        // Another task may have built it while we waited for the write lock
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let client = Client::builder()
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| CatalogError::Network(format!("Failed to build HTTP client: {}", e)))?;
        debug!(user_agent = %self.user_agent, "HTTP client created");

        *slot = Some(client.clone());
        Ok(client)
    }

    /// Drop the active client; the next `client()` call builds a new one
    pub async fn shutdown(&self) {
        if self.client.write().await.take().is_some() {
            info!("HTTP client closed");
        }
    }

    pub async fn is_active(&self) -> bool {
        self.client.read().await.is_some()
    }
}

impl Default for HttpContext {
    fn default() -> Self {
        Self::new(default_user_agent())
    }
}
