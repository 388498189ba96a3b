//! Entity manager - the list/search/edit/delete workflow for one entity type
//!
//! A manager owns the collection view currently shown, its pagination, the
//! add/edit form and the notification banner. Every outcome of an
//! operation is reported through the [`Notifier`]; nothing is fatal.
//!
//! Methods take `&self`. State lives behind a mutex that is never held
//! across an await, and each load/search carries a request generation so a
//! response that resolves after a newer request started is dropped.

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::core::client::{Fetched, RemoteStore};
use crate::core::entity::{Draft, Entity};
use crate::core::error::{ErrorKind, PortalError};
use crate::core::notification::{Notification, Notifier};
use crate::core::pagination::{PageRequest, PageState};
use crate::core::validation::{validate, validate_search_id};

pub const DUPLICATE_MESSAGE: &str = "Duplicate entry detected. Please use a unique value.";
pub const FIXED_ID_MESSAGE: &str = "The ID of an existing record cannot be changed.";

/// State of the add/edit form
#[derive(Debug, Clone, PartialEq)]
pub enum Editor<D> {
    Closed,
    Adding(D),
    Editing { id: i64, draft: D },
}

impl<D> Editor<D> {
    pub fn is_open(&self) -> bool {
        !matches!(self, Editor::Closed)
    }

    pub fn draft(&self) -> Option<&D> {
        match self {
            Editor::Closed => None,
            Editor::Adding(draft) | Editor::Editing { draft, .. } => Some(draft),
        }
    }

    fn draft_mut(&mut self) -> Option<&mut D> {
        match self {
            Editor::Closed => None,
            Editor::Adding(draft) | Editor::Editing { draft, .. } => Some(draft),
        }
    }
}

/// Gate consulted before a destructive operation
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// How an operation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The view or the backend changed as requested
    Applied,
    /// An error notification was shown
    Failed,
    /// Nothing to do: declined confirmation or no open form
    Cancelled,
    /// The response arrived after a newer request and was dropped
    Stale,
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed)
    }
}

/// Verb used in failure messages
#[derive(Debug, Clone, Copy)]
enum Action {
    Add,
    Update,
    Delete,
    Search,
}

impl Action {
    fn verb(&self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Search => "search",
        }
    }

    fn past(&self) -> &'static str {
        match self {
            Action::Add => "added",
            Action::Update => "updated",
            Action::Delete => "deleted",
            Action::Search => "found",
        }
    }
}

struct State<E: Entity> {
    items: Vec<E>,
    page: PageState,
    editor: Editor<E::Draft>,
    search_id: Option<i64>,
    loading: bool,
    generation: u64,
}

pub struct EntityManager<E: Entity> {
    store: Arc<dyn RemoteStore<E>>,
    notifier: Notifier,
    page_size: u32,
    state: Mutex<State<E>>,
}

impl<E: Entity> EntityManager<E> {
    pub fn new(store: Arc<dyn RemoteStore<E>>, notifier: Notifier, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        Self {
            store,
            notifier,
            page_size,
            state: Mutex::new(State {
                items: Vec::new(),
                page: PageState::empty(page_size),
                editor: Editor::Closed,
                search_id: None,
                loading: false,
                generation: 0,
            }),
        }
    }

    // =========================================================================
    // Read-only accessors
    // =========================================================================

    /// Records currently shown
    pub fn items(&self) -> Vec<E> {
        self.lock().items.clone()
    }

    pub fn page(&self) -> PageState {
        self.lock().page
    }

    pub fn editor(&self) -> Editor<E::Draft> {
        self.lock().editor.clone()
    }

    /// Id of the record the view is filtered to, if a search is active
    pub fn search_id(&self) -> Option<i64> {
        self.lock().search_id
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn notification(&self) -> Option<Notification> {
        self.notifier.current()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    // =========================================================================
    // Collection view
    // =========================================================================

    /// Fetch a page of the collection (first page when `page` is `None`)
    ///
    /// Full listings are paged locally. A successful load is silent; a
    /// failed one clears the view.
    pub async fn load(&self, page: Option<u32>) -> Outcome {
        let requested = page.unwrap_or(1).max(1);
        let generation = self.begin_request();
        debug!(entity = E::KIND.name(), page = requested, generation, "loading");

        let mut result = self
            .store
            .list(Some(PageRequest::new(requested, self.page_size)))
            .await;

        // A page past the end (e.g. after deleting the last record on it)
        // is refetched once at the last valid page.
        let last_page = match &result {
            Ok(Fetched::Paged(envelope)) if envelope.items.is_empty() => {
                let total_pages = PageState::from_envelope(envelope, self.page_size).total_pages;
                (total_pages > 0 && requested > total_pages).then_some(total_pages)
            }
            _ => None,
        };
        if let Some(last_page) = last_page {
            if !self.is_current(generation) {
                return Outcome::Stale;
            }
            debug!(entity = E::KIND.name(), page = last_page, "page out of range, refetching");
            result = self
                .store
                .list(Some(PageRequest::new(last_page, self.page_size)))
                .await;
        }

        let mut state = self.lock();
        if state.generation != generation {
            debug!(entity = E::KIND.name(), generation, "dropping stale load response");
            return Outcome::Stale;
        }
        state.loading = false;
        state.search_id = None;

        match result {
            Ok(Fetched::Paged(envelope)) => {
                state.page = PageState::from_envelope(&envelope, self.page_size);
                state.items = envelope.items;
                Outcome::Applied
            }
            Ok(Fetched::Full(all)) => {
                state.page = PageState::local(all.len() as u64, self.page_size, requested);
                let bounds = state.page.slice_bounds();
                state.items = all.into_iter().skip(bounds.start).take(bounds.len()).collect();
                Outcome::Applied
            }
            Err(e) => {
                warn!(entity = E::KIND.name(), "load failed: {}", e);
                state.items.clear();
                state.page = PageState::empty(self.page_size);
                drop(state);
                self.notifier.error(format!(
                    "Failed to load {}. Please try again.",
                    E::KIND.plural()
                ));
                Outcome::Failed
            }
        }
    }

    /// Reload the page currently shown
    pub async fn reload(&self) -> Outcome {
        let current = self.page().current_page;
        self.load(Some(current)).await
    }

    /// Jump to a page, clamped to the valid range
    pub async fn go_to_page(&self, page: u32) -> Outcome {
        let target = self.page().clamp(page);
        self.load(Some(target)).await
    }

    pub async fn next_page(&self) -> Outcome {
        let page = self.page();
        if !page.has_next() {
            return Outcome::Cancelled;
        }
        self.load(Some(page.current_page + 1)).await
    }

    pub async fn previous_page(&self) -> Outcome {
        let page = self.page();
        if !page.has_previous() {
            return Outcome::Cancelled;
        }
        self.load(Some(page.current_page - 1)).await
    }

    /// Narrow the view to the record with `id`
    ///
    /// An id that is not positive is rejected without a request. When the
    /// lookup fails the error is shown and the unfiltered first page is
    /// loaded in place of the previous view.
    pub async fn search(&self, id: i64) -> Outcome {
        if let Err(e) = validate_search_id(id) {
            self.notifier.error(e.to_string());
            return Outcome::Failed;
        }

        let generation = self.begin_request();
        debug!(entity = E::KIND.name(), id, generation, "searching");
        let result = self.store.get(id).await;

        let error = {
            let mut state = self.lock();
            if state.generation != generation {
                debug!(entity = E::KIND.name(), generation, "dropping stale search response");
                return Outcome::Stale;
            }
            state.loading = false;

            match result {
                Ok(item) => {
                    state.items = vec![item];
                    state.page = PageState::single(self.page_size);
                    state.search_id = Some(id);
                    return Outcome::Applied;
                }
                Err(e) => e,
            }
        };

        warn!(entity = E::KIND.name(), id, "search failed: {}", error);
        self.notifier
            .error(failure_message(&error, Action::Search, E::KIND.name()));
        if self.load(None).await == Outcome::Stale {
            return Outcome::Stale;
        }
        Outcome::Failed
    }

    /// Drop the search filter and show the first page again
    pub async fn clear_search(&self) -> Outcome {
        self.lock().search_id = None;
        self.load(None).await
    }

    // =========================================================================
    // Add/edit form
    // =========================================================================

    pub fn open_add(&self) {
        self.lock().editor = Editor::Adding(E::Draft::default());
    }

    pub fn open_edit(&self, record: &E) {
        self.lock().editor = Editor::Editing {
            id: record.id(),
            draft: record.to_draft(),
        };
    }

    /// Apply `f` to the open draft; no-op when the form is closed
    pub fn update_draft(&self, f: impl FnOnce(&mut E::Draft)) {
        if let Some(draft) = self.lock().editor.draft_mut() {
            f(draft);
        }
    }

    /// Set one draft field from raw input
    ///
    /// The identifier field is refused while an existing record is open.
    pub fn set_field(&self, key: &str, raw: &str) -> Result<(), PortalError> {
        let mut state = self.lock();
        if matches!(state.editor, Editor::Editing { .. }) && key == id_key::<E>() {
            return Err(PortalError::Validation(FIXED_ID_MESSAGE.to_string()));
        }
        let draft = state
            .editor
            .draft_mut()
            .ok_or_else(|| PortalError::Validation("No form is open".to_string()))?;
        draft.set(key, raw).map_err(PortalError::Validation)
    }

    /// Discard the open draft
    pub fn close_modal(&self) {
        self.lock().editor = Editor::Closed;
    }

    /// Validate and submit the open draft
    ///
    /// On success the form closes and the current page is reloaded. On
    /// failure the form stays open with the draft untouched.
    pub async fn save(&self) -> Outcome {
        let editor = self.editor();
        let (action, draft) = match &editor {
            Editor::Closed => return Outcome::Cancelled,
            Editor::Adding(draft) => (Action::Add, draft),
            Editor::Editing { id, draft } => {
                if draft.id().is_some_and(|draft_id| draft_id != *id) {
                    warn!(entity = E::KIND.name(), id = *id, "draft tried to change the record id");
                    self.notifier.error(FIXED_ID_MESSAGE);
                    return Outcome::Failed;
                }
                (Action::Update, draft)
            }
        };

        if let Err(e) = validate(draft, <E::Draft as Draft>::RULES) {
            self.notifier.error(e.to_string());
            return Outcome::Failed;
        }

        let result = match &editor {
            Editor::Editing { id, draft } => self.store.update(*id, draft).await.map(|_| ()),
            _ => self.store.create(draft).await.map(|_| ()),
        };

        match result {
            Ok(()) => {
                debug!(entity = E::KIND.name(), action = action.verb(), "saved");
                self.close_modal();
                self.finish_mutation(action).await
            }
            Err(e) => {
                warn!(entity = E::KIND.name(), action = action.verb(), "save failed: {}", e);
                self.notifier.error(failure_message(&e, action, E::KIND.name()));
                Outcome::Failed
            }
        }
    }

    /// Delete a record after the confirmation gate agrees
    pub async fn remove(&self, id: i64, confirm: &dyn Confirm) -> Outcome {
        let prompt = format!("Are you sure you want to delete this {}?", E::KIND.name());
        if !confirm.confirm(&prompt) {
            debug!(entity = E::KIND.name(), id, "delete declined");
            return Outcome::Cancelled;
        }

        match self.store.delete(id).await {
            Ok(()) => self.finish_mutation(Action::Delete).await,
            Err(e) => {
                warn!(entity = E::KIND.name(), id, "delete failed: {}", e);
                self.notifier
                    .error(failure_message(&e, Action::Delete, E::KIND.name()));
                Outcome::Failed
            }
        }
    }

    /// Reload after a successful mutation and announce it
    ///
    /// A failed reload leaves its own error visible instead.
    async fn finish_mutation(&self, action: Action) -> Outcome {
        if self.reload().await != Outcome::Failed {
            self.notifier.success(format!(
                "{} {} successfully.",
                E::KIND.title(),
                action.past()
            ));
        }
        Outcome::Applied
    }

    fn begin_request(&self) -> u64 {
        let mut state = self.lock();
        state.generation += 1;
        state.loading = true;
        state.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    fn lock(&self) -> MutexGuard<'_, State<E>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Wire key of the identifier field, always listed first
fn id_key<E: Entity>() -> &'static str {
    <E::Draft as Draft>::FIELDS
        .first()
        .map(|field| field.key)
        .unwrap_or_default()
}

/// User-facing message for a failed operation; raw details stay in the log
fn failure_message(err: &PortalError, action: Action, entity: &str) -> String {
    match err.kind() {
        ErrorKind::Duplicate => DUPLICATE_MESSAGE.to_string(),
        _ => format!("Failed to {} {}. Please try again.", action.verb(), entity),
    }
}
