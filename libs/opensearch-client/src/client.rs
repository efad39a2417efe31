//! OpenSearch engine client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use opensearch_compiler::{FieldCatalog, NativeQuery, NativeSearchResult};
use reqwest::{Client, Method, RequestBuilder, Response};

use crate::connection::ConnectionSettings;
use crate::error::{Error, Result};
use crate::options::OpenSearchOptions;

/// Executes compiled queries against a search engine.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    async fn search(&self, query: &NativeQuery) -> Result<NativeSearchResult>;

    /// Succeeds when the engine answers within `timeout`.
    async fn ping(&self, timeout: Duration) -> Result<()>;
}

#[async_trait]
impl<T: SearchEngine + ?Sized> SearchEngine for Arc<T> {
    async fn search(&self, query: &NativeQuery) -> Result<NativeSearchResult> {
        (**self).search(query).await
    }

    async fn ping(&self, timeout: Duration) -> Result<()> {
        (**self).ping(timeout).await
    }
}

/// [`SearchEngine`] over the OpenSearch REST API.
#[derive(Debug, Clone)]
pub struct OpenSearchClient {
    http: Client,
    settings: ConnectionSettings,
}

impl OpenSearchClient {
    pub fn new(settings: ConnectionSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .gzip(settings.enable_http_compression)
            .build()?;
        Ok(Self { http, settings })
    }

    pub fn from_options(options: &OpenSearchOptions) -> Result<Self> {
        Self::new(ConnectionSettings::from_options(options)?)
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// Read the index mapping and build a field catalog from it.
    pub async fn get_field_catalog(&self, index: &str) -> Result<FieldCatalog> {
        let response = self
            .request(Method::GET, &format!("{index}/_mapping"))
            .send()
            .await?;
        let mapping: serde_json::Value = check_status(response).await?.json().await?;

        let catalog = FieldCatalog::from_mapping(&mapping)?;
        tracing::debug!(index, fields = catalog.len(), "loaded field catalog");
        Ok(catalog)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.settings.endpoint(path));
        match &self.settings.credentials {
            Some(auth) => builder.basic_auth(&auth.user, Some(&auth.password)),
            None => builder,
        }
    }
}

#[async_trait]
impl SearchEngine for OpenSearchClient {
    async fn search(&self, query: &NativeQuery) -> Result<NativeSearchResult> {
        let response = self
            .request(Method::POST, &format!("{}/_search", query.index))
            .json(query)
            .send()
            .await?;

        let bytes = check_status(response).await?.bytes().await?;
        Ok(NativeSearchResult::from_slice(&bytes)?)
    }

    async fn ping(&self, timeout: Duration) -> Result<()> {
        let response = self
            .request(Method::HEAD, "")
            .timeout(timeout)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(%url, status = status.as_u16(), "OpenSearch request failed");

    Err(Error::Status {
        status: status.as_u16(),
        body,
    })
}
