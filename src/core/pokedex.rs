//! Client for the third-party Pokédex lookup API

use crate::core::config::PokedexConfig;
use crate::core::error::{DexError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Upstream response envelope; only `results` is forwarded
#[derive(Debug, Deserialize)]
struct PokedexPage {
    #[serde(default)]
    results: Vec<Value>,
}

/// Thin wrapper over a shared reqwest client
pub struct PokedexClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl PokedexClient {
    pub fn new(config: &PokedexConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| DexError::ConfigError(format!("Invalid pokedex base_url: {}", e)))?;

        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DexError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Build the upstream search URL. The term is query-encoded.
    pub fn search_url(&self, term: Option<&str>) -> Result<Url> {
        let mut url = self
            .base_url
            .join("api/pokedex/")
            .map_err(|e| DexError::ConfigError(format!("Invalid pokedex base_url: {}", e)))?;

        if let Some(term) = term {
            url.query_pairs_mut().append_pair("pokemon", term);
        }

        Ok(url)
    }

    /// Search the Pokédex and return the upstream `results` array
    pub async fn search(&self, term: Option<&str>) -> Result<Vec<Value>> {
        let url = self.search_url(term)?;

        tracing::debug!(url = %url, "Querying pokedex");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| DexError::UpstreamError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DexError::UpstreamError(format!(
                "Pokedex responded with {}",
                status
            )));
        }

        let page: PokedexPage = response
            .json()
            .await
            .map_err(|e| DexError::UpstreamError(format!("Unreadable pokedex response: {}", e)))?;

        Ok(page.results)
    }
}
