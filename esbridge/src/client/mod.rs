//! HTTP client for the engine's REST API
//!
//! A [`ClientBuilder`] collects settings; [`ClientBuilder::build`] is the
//! single transition into a connected [`EsClient`]. The client wraps one
//! `reqwest::Client` that is shared by every operation and clones cheaply.

mod request;

pub use request::SearchRequest;

use crate::config::{ConnectionConfig, EsConfig};
use crate::decode::{decode_count, decode_index_mapping, decode_search};
use crate::error::{Error, Result};
use crate::response::{CountResponse, MappingsResponse, SearchResponse};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Status reported for a fully assembled mappings response
const MAPPINGS_STATUS_OK: u16 = 200;

/// Index scope used when neither the call nor the client names one
const ALL_INDICES: &str = "_all";

/// Stored in [`Error::Status`] when an error response body cannot be read
const UNREADABLE_BODY: &str = "<unreadable body>";

/// Operations a search backend exposes to callers
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Field mappings of each index, in the order given
    async fn get_mappings(&self, indices: &[String]) -> Result<MappingsResponse>;

    /// Number of documents in the given scope
    async fn count(&self, indices: &[String], types: &[String]) -> Result<CountResponse>;

    /// Compile, execute and decode a search
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;

    /// Human-readable backend name
    fn backend_name(&self) -> &str;
}

/// Settings for an [`EsClient`]
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: ConnectionConfig,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from file configuration
    pub fn from_config(config: &EsConfig) -> Self {
        Self {
            config: config.connection.clone(),
        }
    }

    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.config.server_url = Some(url.into());
        self
    }

    pub fn cluster_name(mut self, name: impl Into<String>) -> Self {
        self.config.cluster_name = Some(name.into());
        self
    }

    pub fn index(mut self, indices: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.config.index = indices.into_iter().map(Into::into).collect();
        self
    }

    /// Set the default type scope. Fails when no index scope is set yet.
    pub fn types(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        if self.config.index.is_empty() {
            return Err(Error::Usage(
                "The type scope cannot be set before the index scope".to_string(),
            ));
        }
        self.config.types = types.into_iter().map(Into::into).collect();
        Ok(self)
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    /// Validate the settings and create the HTTP client
    pub fn build(self) -> Result<EsClient> {
        let config = self.config;

        let server_url = required(config.server_url, "serverURL")?;
        let cluster_name = required(config.cluster_name, "clusterName")?;
        if !config.types.is_empty() && config.index.is_empty() {
            return Err(Error::Usage(
                "A type scope requires an index scope".to_string(),
            ));
        }

        let url = url::Url::parse(&server_url)?;
        let timeout = Duration::from_millis(config.timeout_ms);
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        info!(
            "Elasticsearch client ready for {} (cluster '{}', timeout {}ms)",
            url, cluster_name, config.timeout_ms
        );

        Ok(EsClient {
            http,
            base_url: url.as_str().trim_end_matches('/').to_string(),
            cluster_name,
            index: config.index,
            types: config.types,
            timeout,
        })
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::Usage(format!("Parameter {} is missing.", name))),
    }
}

/// Connected client
#[derive(Debug, Clone)]
pub struct EsClient {
    http: reqwest::Client,
    base_url: String,
    cluster_name: String,
    index: Vec<String>,
    types: Vec<String>,
    timeout: Duration,
}

impl EsClient {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn default_index(&self) -> &[String] {
        &self.index
    }

    pub fn default_types(&self) -> &[String] {
        &self.types
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch mappings one index at a time; the first failure aborts the call.
    ///
    /// An empty `indices` uses the default index scope. Unlike `count` and
    /// `search` there is no `_all` fallback: with no scope at all the call
    /// fails with [`Error::Usage`] before any request is sent.
    pub async fn get_mappings(&self, indices: &[String]) -> Result<MappingsResponse> {
        let indices = if indices.is_empty() {
            &self.index[..]
        } else {
            indices
        };
        if indices.is_empty() {
            return Err(Error::Usage(
                "No index given and no default index scope configured".to_string(),
            ));
        }

        let mut result = Vec::with_capacity(indices.len());
        for index in indices {
            let mapping = self
                .fetch_index_mapping(index)
                .await
                .map_err(|e| Error::client("Cannot obtain mappings.", e))?;
            result.push(mapping);
        }

        Ok(MappingsResponse {
            status: MAPPINGS_STATUS_OK,
            indices: result,
        })
    }

    async fn fetch_index_mapping(
        &self,
        index: &str,
    ) -> Result<crate::response::IndexMappingResponse> {
        let document = self
            .execute(Method::GET, &format!("{}/_mapping", index), None)
            .await?;
        decode_index_mapping(index, &document)
    }

    pub async fn count(&self, indices: &[String], types: &[String]) -> Result<CountResponse> {
        let path = format!("{}/_count", self.scope_path(indices, types));
        let result = async {
            let document = self.execute(Method::GET, &path, None).await?;
            decode_count(&document)
        }
        .await;
        result.map_err(|e| Error::client("Cannot count.", e))
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let path = format!(
            "{}/_search",
            self.scope_path(&request.indices, &request.types)
        );
        let body = request.body();
        debug!("Compiled search body: {}", body);

        let result = async {
            let document = self.execute(Method::POST, &path, Some(&body)).await?;
            decode_search(&document)
        }
        .await;
        result.map_err(|e| Error::client("Cannot search.", e))
    }

    /// `{indices}[/{types}]`, falling back to the default scope and then `_all`.
    /// Default types only apply together with the default indices.
    fn scope_path(&self, indices: &[String], types: &[String]) -> String {
        let (indices, types) = if indices.is_empty() {
            let types = if types.is_empty() { &self.types[..] } else { types };
            (&self.index[..], types)
        } else {
            (indices, types)
        };

        let mut path = if indices.is_empty() {
            ALL_INDICES.to_string()
        } else {
            indices.join(",")
        };
        if !types.is_empty() {
            path.push('/');
            path.push_str(&types.join(","));
        }
        path
    }

    /// One round trip. Non-2xx statuses become [`Error::Status`].
    async fn execute(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = error_body(response.text().await);
            warn!("Request to {} failed ({})", url, status);
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

fn error_body<E: std::fmt::Display>(text: std::result::Result<String, E>) -> String {
    match text {
        Ok(body) => body,
        Err(e) => {
            warn!("Cannot read error response body: {}", e);
            UNREADABLE_BODY.to_string()
        }
    }
}

#[async_trait]
impl SearchBackend for EsClient {
    async fn get_mappings(&self, indices: &[String]) -> Result<MappingsResponse> {
        EsClient::get_mappings(self, indices).await
    }

    async fn count(&self, indices: &[String], types: &[String]) -> Result<CountResponse> {
        EsClient::count(self, indices, types).await
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        EsClient::search(self, request).await
    }

    fn backend_name(&self) -> &str {
        "elasticsearch"
    }
}
