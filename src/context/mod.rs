//! Client-side state for each CashWise resource.
//!
//! A context owns one cached list view plus the UI-facing state around it
//! (loading flag, modal, edit target) and mediates every network mutation.
//! The external API stays authoritative: successful creates and updates
//! invalidate the view and re-fetch it, they never merge optimistic deltas.
//! Each list fetch is tagged with a generation so that a slow response for an
//! older query cannot overwrite the result of a newer one.

mod settings;
mod transaction;

pub use settings::SettingsContext;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::Session;
use crate::client::{ApiClient, ClientError, Pagination};
use crate::models::{capitalize, Budget, Category, Goal, ListQuery, Resource, Transaction};
use crate::notify::{Notification, Notifier};

pub type TransactionContext = ResourceContext<Transaction>;
pub type BudgetContext = ResourceContext<Budget>;
pub type CategoryContext = ResourceContext<Category>;
pub type GoalContext = ResourceContext<Goal>;

/// The signed-in user as seen by a context. Fetches only run for verified users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: String,
    pub email_verified: bool,
}

impl Viewer {
    pub fn verified(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), email_verified: true }
    }

    fn can_fetch(&self) -> bool {
        !self.user_id.is_empty() && self.email_verified
    }
}

impl From<&Session> for Viewer {
    fn from(session: &Session) -> Self {
        Self {
            user_id: session.user_id.clone(),
            email_verified: session.email_verified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No verified viewer; nothing was requested.
    Skipped,
    /// The view was already fresh for the current query.
    Cached,
    Applied,
    /// A newer fetch was issued while this one was in flight.
    Discarded,
    Failed,
}

/// List cache keyed by the query it was fetched with.
#[derive(Debug, Clone)]
pub struct ListView<R: Resource> {
    pub items: Vec<R>,
    pub pagination: Pagination,
    key: Option<R::Query>,
    valid: bool,
}

impl<R: Resource> Default for ListView<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
            key: None,
            valid: false,
        }
    }
}

impl<R: Resource> ListView<R> {
    fn is_fresh_for(&self, query: &R::Query) -> bool {
        self.valid && self.key.as_ref() == Some(query)
    }
}

/// Point-in-time copy of a context's state, for rendering.
#[derive(Debug, Clone)]
pub struct ContextSnapshot<R: Resource> {
    pub items: Vec<R>,
    pub pagination: Pagination,
    pub query: R::Query,
    pub loading: bool,
    pub modal_open: bool,
    pub edit_target: Option<R>,
    pub fresh: bool,
}

struct State<R: Resource> {
    view: ListView<R>,
    query: R::Query,
    loading: bool,
    modal_open: bool,
    edit_target: Option<R>,
    viewer: Option<Viewer>,
}

pub struct ResourceContext<R: Resource> {
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    state: RwLock<State<R>>,
    generation: AtomicU64,
}

impl<R: Resource> ResourceContext<R> {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            state: RwLock::new(State {
                view: ListView::default(),
                query: R::Query::default(),
                loading: false,
                modal_open: false,
                edit_target: None,
                viewer: None,
            }),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_viewer(mut self, viewer: Viewer) -> Self {
        self.state.get_mut().viewer = Some(viewer);
        self
    }

    pub async fn set_viewer(&self, viewer: Option<Viewer>) {
        let mut state = self.state.write().await;
        if state.viewer != viewer {
            state.view.valid = false;
        }
        state.viewer = viewer;
    }

    // Query

    pub async fn query(&self) -> R::Query {
        self.state.read().await.query.clone()
    }

    /// Replace the active query. The cached view goes stale if the query changed.
    pub async fn set_query(&self, query: R::Query) {
        self.state.write().await.query = query;
    }

    pub async fn update_query(&self, f: impl FnOnce(&mut R::Query)) {
        let mut state = self.state.write().await;
        f(&mut state.query);
    }

    // Reads

    pub async fn items(&self) -> Vec<R> {
        self.state.read().await.view.items.clone()
    }

    pub async fn pagination(&self) -> Pagination {
        self.state.read().await.view.pagination
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn is_modal_open(&self) -> bool {
        self.state.read().await.modal_open
    }

    pub async fn edit_target(&self) -> Option<R> {
        self.state.read().await.edit_target.clone()
    }

    pub async fn is_fresh(&self) -> bool {
        let state = self.state.read().await;
        state.view.is_fresh_for(&state.query)
    }

    pub async fn snapshot(&self) -> ContextSnapshot<R> {
        let state = self.state.read().await;
        ContextSnapshot {
            items: state.view.items.clone(),
            pagination: state.view.pagination,
            query: state.query.clone(),
            loading: state.loading,
            modal_open: state.modal_open,
            edit_target: state.edit_target.clone(),
            fresh: state.view.is_fresh_for(&state.query),
        }
    }

    // Modal and edit target

    pub async fn open_create(&self) {
        let mut state = self.state.write().await;
        state.edit_target = None;
        state.modal_open = true;
    }

    pub async fn open_edit(&self, item: R) {
        let mut state = self.state.write().await;
        state.edit_target = Some(item);
        state.modal_open = true;
    }

    pub async fn close_modal(&self) {
        let mut state = self.state.write().await;
        state.modal_open = false;
        state.edit_target = None;
    }

    // Network

    /// Mark the cached view stale so the next `ensure_fresh` re-fetches.
    pub async fn invalidate(&self) {
        self.state.write().await.view.valid = false;
    }

    /// Fetch only when the view is stale or was fetched for another query.
    pub async fn ensure_fresh(&self) -> FetchOutcome {
        if self.is_fresh().await {
            return FetchOutcome::Cached;
        }
        self.fetch_list().await
    }

    pub async fn fetch_list(&self) -> FetchOutcome {
        let (query, generation) = {
            let mut state = self.state.write().await;
            if !state.viewer.as_ref().is_some_and(Viewer::can_fetch) {
                return FetchOutcome::Skipped;
            }
            state.loading = true;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            (state.query.clone(), generation)
        };

        let result = self.client.list::<R>(R::PATH, &query.to_pairs()).await;

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "discarding stale {} response", R::LABEL);
            return FetchOutcome::Discarded;
        }

        let outcome = match result {
            Ok(page) => {
                // The server may clamp the requested page; follow it unless the query moved on.
                let mut key = query.clone();
                key.sync_position(&page.pagination);
                if state.query == query {
                    state.query = key.clone();
                }
                state.view = ListView {
                    items: page.items,
                    pagination: page.pagination,
                    key: Some(key),
                    valid: true,
                };
                FetchOutcome::Applied
            }
            Err(e) => {
                tracing::error!("failed to load {}: {}", R::PLURAL, e);
                self.notifier
                    .notify(Notification::error(format!("Failed to load {}", R::PLURAL)));
                FetchOutcome::Failed
            }
        };
        state.loading = false;
        outcome
    }

    /// POST a new record. Returns the persisted record, or `None` after notifying on failure.
    pub async fn create(&self, input: &R::Input) -> Option<R> {
        let result = self.client.post::<_, R>(&[R::PATH], input).await;
        self.after_write(result, "saved").await
    }

    /// PATCH an existing record. Returns the persisted record, or `None` after notifying on failure.
    pub async fn update(&self, id: &str, input: &R::Input) -> Option<R> {
        let result = self.client.patch::<_, R>(&[R::PATH, id], input).await;
        self.after_write(result, "updated").await
    }

    /// Create when `id` is absent, update otherwise.
    pub async fn save(&self, id: Option<&str>, input: &R::Input) -> Option<R> {
        match id {
            Some(id) => self.update(id, input).await,
            None => self.create(input).await,
        }
    }

    /// DELETE a record and drop it from the local list without re-fetching.
    pub async fn remove(&self, item: &R) -> bool {
        self.remove_by_id(item.id()).await
    }

    pub async fn remove_by_id(&self, id: &str) -> bool {
        match self.client.delete(&[R::PATH, id]).await {
            Ok(()) => {
                self.state.write().await.view.items.retain(|i| i.id() != id);
                self.notifier.notify(Notification::success(format!(
                    "{} deleted successfully!",
                    capitalize(R::LABEL)
                )));
                true
            }
            Err(e) => {
                tracing::error!("failed to delete {} {}: {}", R::LABEL, id, e);
                self.notifier
                    .notify(Notification::error(format!("Failed to delete {}", R::LABEL)));
                false
            }
        }
    }

    async fn after_write(&self, result: Result<R, ClientError>, verb: &str) -> Option<R> {
        match result {
            Ok(saved) => {
                self.invalidate().await;
                self.fetch_list().await;
                self.close_modal().await;
                self.notifier.notify(Notification::success(format!(
                    "{} {} successfully!",
                    capitalize(R::LABEL),
                    verb
                )));
                Some(saved)
            }
            Err(e) => {
                if matches!(e, ClientError::Decode(_)) {
                    // The write may have landed even though the echo was unreadable.
                    self.invalidate().await;
                }
                tracing::error!("failed to save {}: {}", R::LABEL, e);
                self.notifier
                    .notify(Notification::error(format!("Failed to save {}", R::LABEL)));
                None
            }
        }
    }
}
