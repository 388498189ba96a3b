//! Remote access to the reference-data backend
//!
//! [`RemoteStore`] is the seam between the entity manager and the backend.
//! [`PortalClient`] speaks HTTP through reqwest; tests use the in-process
//! [`MemoryStore`](crate::core::memory::MemoryStore) instead.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::core::entity::{Draft, Entity};
use crate::core::error::{PortalError, Result};
use crate::core::pagination::{PageRequest, PagedResult};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A listing as returned by the backend
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<E> {
    /// Whole collection (bare array)
    Full(Vec<E>),
    /// One page plus pagination metadata
    Paged(PagedResult<E>),
}

impl<E> Fetched<E> {
    pub fn len(&self) -> usize {
        match self {
            Fetched::Full(items) => items.len(),
            Fetched::Paged(page) => page.items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// CRUD operations for one entity type
#[async_trait]
pub trait RemoteStore<E: Entity>: Send + Sync {
    /// List the collection; `page` is only honored by paged routes
    async fn list(&self, page: Option<PageRequest>) -> Result<Fetched<E>>;

    async fn get(&self, id: i64) -> Result<E>;

    /// Create a record; the backend assigns the id when the draft has none
    async fn create(&self, draft: &E::Draft) -> Result<E>;

    async fn update(&self, id: i64, draft: &E::Draft) -> Result<E>;

    async fn delete(&self, id: i64) -> Result<()>;
}

/// HTTP client for the portal backend
#[derive(Clone)]
pub struct PortalClient {
    base_url: String,
    http: reqwest::Client,
}

impl PortalClient {
    pub fn builder() -> PortalClientBuilder {
        PortalClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a route onto the base URL
    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Send a request and hand back the body of a successful response
    ///
    /// Non-success statuses are classified once here via
    /// [`PortalError::from_status`].
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        method: &str,
        url: &str,
        resource: &'static str,
        id: Option<i64>,
    ) -> Result<String> {
        let start = Instant::now();
        debug!("[PORTAL_HTTP] {} {}", method, url);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("[PORTAL_HTTP] {} {} failed: {}", method, url, e);
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = response.text().await?;
        let elapsed_ms = start.elapsed().as_millis();

        if status.is_success() {
            debug!(
                "[PORTAL_HTTP] {} {} -> {} ({} bytes, {} ms)",
                method,
                url,
                status.as_u16(),
                body.len(),
                elapsed_ms
            );
            Ok(body)
        } else {
            warn!(
                "[PORTAL_HTTP] {} {} -> {} in {} ms: {}",
                method,
                url,
                status.as_u16(),
                elapsed_ms,
                body.trim()
            );
            Err(PortalError::from_status(status.as_u16(), &body, resource, id))
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| PortalError::Decode(e.to_string()))
}

/// Decode the record echoed by an update
///
/// Some backends answer PUT with `204 No Content`; the record is then
/// rebuilt from the submitted draft.
fn decode_updated<E: Entity>(body: &str, id: i64, draft: &E::Draft) -> Result<E> {
    if !body.trim().is_empty() {
        return decode(body);
    }

    let mut json = draft.to_json();
    if let Some(id_field) = <E::Draft as Draft>::FIELDS.first() {
        json.insert(id_field.key.to_string(), JsonValue::from(id));
    }
    serde_json::from_value(JsonValue::Object(json)).map_err(|e| PortalError::Decode(e.to_string()))
}

#[async_trait]
impl<E: Entity> RemoteStore<E> for PortalClient {
    async fn list(&self, page: Option<PageRequest>) -> Result<Fetched<E>> {
        let kind = E::KIND;
        let route = kind.list_route();
        let url = self.url(route.path());

        if route.is_paged() {
            let page = page.unwrap_or_else(|| PageRequest::new(1, crate::core::config::DEFAULT_PAGE_SIZE));
            let request = self.http.get(&url).query(&[
                ("page", page.page.to_string()),
                ("pageSize", page.page_size.to_string()),
            ]);
            let body = self.send(request, "GET", &url, kind.resource(), None).await?;
            Ok(Fetched::Paged(decode(&body)?))
        } else {
            let request = self.http.get(&url);
            let body = self.send(request, "GET", &url, kind.resource(), None).await?;
            Ok(Fetched::Full(decode(&body)?))
        }
    }

    async fn get(&self, id: i64) -> Result<E> {
        let url = self.url(&E::KIND.item_path(id));
        let request = self.http.get(&url);
        let body = self
            .send(request, "GET", &url, E::KIND.resource(), Some(id))
            .await?;
        decode(&body)
    }

    async fn create(&self, draft: &E::Draft) -> Result<E> {
        let url = self.url(E::KIND.resource());
        let request = self.http.post(&url).json(draft);
        let body = self
            .send(request, "POST", &url, E::KIND.resource(), None)
            .await?;
        decode(&body)
    }

    async fn update(&self, id: i64, draft: &E::Draft) -> Result<E> {
        let url = self.url(&E::KIND.item_path(id));
        let request = self.http.put(&url).json(draft);
        let body = self
            .send(request, "PUT", &url, E::KIND.resource(), Some(id))
            .await?;
        decode_updated::<E>(&body, id, draft)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let url = self.url(&E::KIND.item_path(id));
        let request = self.http.delete(&url);
        self.send(request, "DELETE", &url, E::KIND.resource(), Some(id))
            .await?;
        Ok(())
    }
}

/// Builder for [`PortalClient`]
pub struct PortalClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
}

impl PortalClientBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Root URL of the backend API (e.g. `http://localhost:5000/api`)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<PortalClient> {
        let base_url = self
            .base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| PortalError::Config("base_url is required".into()))?;

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(PortalError::Config(format!(
                "base_url must start with http:// or https:// (got '{}')",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| PortalError::Config(e.to_string()))?;

        debug!(
            "[PORTAL_CLIENT] base_url={} timeout_ms={}",
            base_url,
            self.timeout.as_millis()
        );

        Ok(PortalClient { base_url, http })
    }
}
