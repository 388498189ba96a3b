//! In-process backend with the same routes and status semantics as the
//! HTTP service
//!
//! Used by tests and demos. Every call is appended to a request log in
//! `METHOD /path` form so callers can assert on the traffic a workflow
//! produced.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::core::client::{Fetched, RemoteStore};
use crate::core::config::DEFAULT_PAGE_SIZE;
use crate::core::entity::{Draft, Entity};
use crate::core::error::{PortalError, Result};
use crate::core::pagination::{PageRequest, PagedResult};

struct Backend<E> {
    records: Vec<E>,
    log: Vec<String>,
    latency: Option<Duration>,
    failure: Option<u16>,
    unique_field: Option<&'static str>,
}

/// Shared in-memory store for one entity type
///
/// Clones share the same records and request log.
#[derive(Clone)]
pub struct MemoryStore<E> {
    inner: Arc<Mutex<Backend<E>>>,
}

impl<E: Entity> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<E: Entity> MemoryStore<E> {
    pub fn new(records: Vec<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Backend {
                records,
                log: Vec::new(),
                latency: None,
                failure: None,
                unique_field: None,
            })),
        }
    }

    /// Reject creates/updates that repeat an existing value of `field`
    /// (compared case-insensitively) with a duplicate conflict
    pub fn with_unique_field(self, field: &'static str) -> Self {
        self.lock().unique_field = Some(field);
        self
    }

    /// Delay every subsequent call by `latency`
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.lock().latency = latency;
    }

    /// Answer every subsequent call with the given HTTP status
    pub fn set_failure(&self, status: Option<u16>) {
        self.lock().failure = status;
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<String> {
        self.lock().log.clone()
    }

    pub fn clear_requests(&self) {
        self.lock().log.clear();
    }

    /// Snapshot of the stored records
    pub fn records(&self) -> Vec<E> {
        self.lock().records.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Backend<E>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Log the request and return the configured latency and failure
    fn begin(&self, request: String) -> (Option<Duration>, Option<u16>) {
        let mut backend = self.lock();
        tracing::debug!("[MEMORY_STORE] {}", request);
        backend.log.push(request);
        (backend.latency, backend.failure)
    }

    async fn enter(&self, request: String, id: Option<i64>) -> Result<()> {
        let (latency, failure) = self.begin(request);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match failure {
            Some(status) => Err(PortalError::from_status(status, "", E::KIND.resource(), id)),
            None => Ok(()),
        }
    }

    fn not_found(id: i64) -> PortalError {
        PortalError::from_status(404, "", E::KIND.resource(), Some(id))
    }

    /// Build a record from a draft with the given id
    fn materialize(draft: &E::Draft, id: i64) -> Result<E> {
        let mut json = draft.to_json();
        json.insert(id_key::<E>().to_string(), JsonValue::from(id));
        serde_json::from_value(JsonValue::Object(json))
            .map_err(|e| PortalError::from_status(400, &e.to_string(), E::KIND.resource(), None))
    }

    fn check_unique(backend: &Backend<E>, candidate: &E, skip_id: Option<i64>) -> Result<()> {
        let Some(field) = backend.unique_field else {
            return Ok(());
        };
        let value_of = |record: &E| {
            serde_json::to_value(record)
                .ok()
                .and_then(|json| json.get(field).and_then(JsonValue::as_str).map(str::to_lowercase))
        };
        let wanted = value_of(candidate);
        let clash = backend
            .records
            .iter()
            .filter(|r| Some(r.id()) != skip_id)
            .any(|r| wanted.is_some() && value_of(r) == wanted);
        if clash {
            Err(PortalError::from_status(
                409,
                &format!("Duplicate {} value", field),
                E::KIND.resource(),
                None,
            ))
        } else {
            Ok(())
        }
    }
}

fn id_key<E: Entity>() -> &'static str {
    <E::Draft as Draft>::FIELDS
        .first()
        .map(|f| f.key)
        .unwrap_or("id")
}

#[async_trait]
impl<E: Entity> RemoteStore<E> for MemoryStore<E> {
    async fn list(&self, page: Option<PageRequest>) -> Result<Fetched<E>> {
        let route = E::KIND.list_route();
        if !route.is_paged() {
            self.enter(format!("GET /{}", route.path()), None).await?;
            return Ok(Fetched::Full(self.records()));
        }

        let page = page.unwrap_or_else(|| PageRequest::new(1, DEFAULT_PAGE_SIZE));
        self.enter(
            format!(
                "GET /{}?page={}&pageSize={}",
                route.path(),
                page.page,
                page.page_size
            ),
            None,
        )
        .await?;

        let records = self.records();
        let total_count = records.len() as u64;
        let start = (page.page.saturating_sub(1) as usize).saturating_mul(page.page_size as usize);
        let items: Vec<E> = records
            .into_iter()
            .skip(start)
            .take(page.page_size as usize)
            .collect();
        Ok(Fetched::Paged(PagedResult {
            items,
            total_count,
            page: page.page,
            page_size: page.page_size,
            total_pages: Some(total_count.div_ceil(page.page_size as u64) as u32),
        }))
    }

    async fn get(&self, id: i64) -> Result<E> {
        self.enter(format!("GET /{}", E::KIND.item_path(id)), Some(id))
            .await?;
        self.lock()
            .records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, draft: &E::Draft) -> Result<E> {
        self.enter(format!("POST /{}", E::KIND.resource()), None)
            .await?;

        let mut backend = self.lock();
        let id = match draft.id() {
            Some(id) if backend.records.iter().any(|r| r.id() == id) => {
                return Err(PortalError::from_status(
                    409,
                    &format!("Duplicate id {}", id),
                    E::KIND.resource(),
                    Some(id),
                ));
            }
            Some(id) => id,
            None => backend.records.iter().map(Entity::id).max().unwrap_or(0) + 1,
        };

        let record = Self::materialize(draft, id)?;
        Self::check_unique(&backend, &record, None)?;
        backend.records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, draft: &E::Draft) -> Result<E> {
        self.enter(format!("PUT /{}", E::KIND.item_path(id)), Some(id))
            .await?;

        let mut backend = self.lock();
        let index = backend
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))?;

        let record = Self::materialize(draft, id)?;
        Self::check_unique(&backend, &record, Some(id))?;
        backend.records[index] = record.clone();
        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.enter(format!("DELETE /{}", E::KIND.item_path(id)), Some(id))
            .await?;

        let mut backend = self.lock();
        let before = backend.records.len();
        backend.records.retain(|r| r.id() != id);
        if backend.records.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::entities::{Grade, GradeDraft, Technology, TechnologyDraft};

    fn grades() -> MemoryStore<Grade> {
        MemoryStore::new(vec![
            Grade {
                grade_id: 1,
                grade_level: "Junior".into(),
                grade_description: "Entry level".into(),
            },
            Grade {
                grade_id: 4,
                grade_level: "Manager".into(),
                grade_description: "People lead".into(),
            },
        ])
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let store = grades();
        let draft = GradeDraft {
            grade_id: None,
            grade_level: Some("Lead".into()),
            grade_description: Some("Leads a team".into()),
        };
        let created = store.create(&draft).await.unwrap();
        assert_eq!(created.grade_id, 5);
        assert_eq!(store.requests(), vec!["POST /Grade"]);
    }

    #[tokio::test]
    async fn test_create_with_taken_id_is_duplicate() {
        let store = grades();
        let draft = GradeDraft {
            grade_id: Some(4),
            grade_level: Some("Lead".into()),
            grade_description: Some("Leads a team".into()),
        };
        let err = store.create(&draft).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Duplicate);
    }

    #[tokio::test]
    async fn test_unique_field() {
        let store = grades().with_unique_field("gradeLevel");
        let draft = GradeDraft {
            grade_id: None,
            grade_level: Some("junior".into()),
            grade_description: Some("Again".into()),
        };
        let err = store.create(&draft).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Duplicate);

        // updating a record to its own value is fine
        let draft = GradeDraft {
            grade_id: None,
            grade_level: Some("Junior".into()),
            grade_description: Some("Renamed".into()),
        };
        assert!(store.update(1, &draft).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let store = grades();
        assert_eq!(store.get(99).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(store.delete(99).await.unwrap_err().kind(), ErrorKind::NotFound);
        let draft = GradeDraft::default();
        assert_eq!(store.update(99, &draft).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(
            store.requests(),
            vec!["GET /Grade/99", "DELETE /Grade/99", "PUT /Grade/99"]
        );
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store: MemoryStore<Technology> = MemoryStore::default();
        store.set_failure(Some(500));
        let err = store.list(None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Server);

        store.set_failure(None);
        let created = store
            .create(&TechnologyDraft {
                id: None,
                technology_stack: Some("Rust, Tokio".into()),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(store.requests(), vec!["GET /Technologies", "POST /Technologies"]);
    }
}
