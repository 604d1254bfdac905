//! Pinecone REST client.

use super::{RetrievedRecord, VectorIndex};
use crate::config::PineconeSettings;
use crate::error::{Result, SwornError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Vector index backed by a Pinecone serverless or pod index.
pub struct PineconeIndex {
    client: reqwest::Client,
    query_url: String,
}

impl PineconeIndex {
    /// Connect to the configured index, resolving its data plane host if needed.
    pub async fn connect(settings: &PineconeSettings, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = build_client(api_key, &settings.api_version, timeout)?;

        let host = match settings.index_host.as_deref().map(str::trim) {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => describe_index_host(&client, &settings.control_plane_url, &settings.index_name).await?,
        };

        let base = normalize_host(&host)?;
        info!("Using Pinecone index '{}' at {}", settings.index_name, base);

        Ok(Self {
            client,
            query_url: query_url(&base),
        })
    }

    /// Use an already known data plane host.
    pub fn with_host(host: &str, api_key: &str, api_version: &str, timeout: Duration) -> Result<Self> {
        let client = build_client(api_key, api_version, timeout)?;
        let base = normalize_host(host)?;
        Ok(Self {
            client,
            query_url: query_url(&base),
        })
    }

    /// Full URL of the query endpoint.
    pub fn query_url(&self) -> &str {
        &self.query_url
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    #[instrument(skip_all, fields(namespace = %namespace, top_k = top_k))]
    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievedRecord>> {
        let request = QueryRequest {
            namespace,
            vector,
            top_k,
            include_metadata,
            include_values: false,
        };

        let response = self
            .client
            .post(&self.query_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SwornError::VectorIndex(format!("Query request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(SwornError::VectorIndex(format!("Query failed ({}): {}", status, body)));
        }

        let payload: QueryResponse = response
            .json()
            .await
            .map_err(|e| SwornError::VectorIndex(format!("Malformed query response: {}", e)))?;

        debug!("Pinecone returned {} matches", payload.matches.len());
        Ok(payload.matches)
    }
}

fn build_client(api_key: &str, api_version: &str, timeout: Duration) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        "Api-Key",
        HeaderValue::from_str(api_key.trim())
            .map_err(|_| SwornError::Config("Invalid Pinecone API key".to_string()))?,
    );
    headers.insert(
        "X-Pinecone-API-Version",
        HeaderValue::from_str(api_version)
            .map_err(|_| SwornError::Config(format!("Invalid Pinecone API version: {}", api_version)))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
        .map_err(|e| SwornError::Config(format!("Failed to create HTTP client: {}", e)))
}

async fn describe_index_host(client: &reqwest::Client, control_plane_url: &str, index_name: &str) -> Result<String> {
    let url = format!("{}/indexes/{}", control_plane_url.trim_end_matches('/'), index_name);
    debug!("Resolving Pinecone index host via {}", url);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| SwornError::VectorIndex(format!("Describe index request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_string());
        return Err(SwornError::VectorIndex(format!(
            "Describe index '{}' failed ({}): {}",
            index_name, status, body
        )));
    }

    let description: IndexDescription = response
        .json()
        .await
        .map_err(|e| SwornError::VectorIndex(format!("Malformed index description: {}", e)))?;
    Ok(description.host)
}

/// Accepts bare hosts as returned by the control plane, adding `https://`.
fn normalize_host(host: &str) -> Result<Url> {
    let trimmed = host.trim().trim_end_matches('/');
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| SwornError::Config(format!("Invalid Pinecone host '{}': {}", host, e)))?;
    if url.host_str().is_none() {
        return Err(SwornError::Config(format!("Invalid Pinecone host '{}'", host)));
    }
    Ok(url)
}

fn query_url(base: &Url) -> String {
    format!("{}/query", base.as_str().trim_end_matches('/'))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    namespace: &'a str,
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<RetrievedRecord>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    host: String,
}
