//! Table controller.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use tokio::sync::watch;
use url::Url;

use super::TableSnapshot;
use super::TableStatus;
use crate::TableConfig;
use crate::error::Error;
use crate::fetch::DataFetcher;
use crate::fetch::Fetched;
use crate::fetch::ListSource;
use crate::fetch::RequestId;
use crate::model::Record;
use crate::model::RecordId;
use crate::query::Change;
use crate::query::Direction;
use crate::query::FilterValue;
use crate::query::QueryState;

/// Drives one table instance: owns its query state, issues fetches when the
/// query changes and applies only the latest result.
///
/// The controller is cheap to clone; clones share the same table. Fetches
/// run as Tokio tasks, so query-changing operations must be called from
/// within a Tokio runtime.
///
/// Results are sequence-gated: each fetch is tagged with a [`RequestId`] and
/// only the result of the most recently issued request is applied. Older
/// in-flight requests are never aborted; their results are dropped on
/// arrival.
///
/// # Example
///
/// ```ignore
/// let controller = TableController::new(client, TableConfig::new("part/category/"));
///
/// controller.load();
/// controller.set_filter("cascade", true);
///
/// let snapshot = controller.settled().await;
/// assert!(snapshot.status.is_ready());
/// ```
pub struct TableController<S> {
    inner: Arc<ControllerInner<S>>,
}

struct ControllerInner<S> {
    fetcher: DataFetcher<S>,
    state: Mutex<TableSnapshot>,
    updates: watch::Sender<TableSnapshot>,
}

/// A request that has been issued but not yet spawned.
struct Pending {
    id: RequestId,
    query: QueryState,
}

impl<S> Clone for TableController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ListSource> TableController<S> {
    /// Creates an idle controller. No request is made until [`load`] or a
    /// query change.
    ///
    /// [`load`]: TableController::load
    pub fn new(source: S, config: TableConfig) -> Self {
        let query = QueryState::new(config.page_size);
        Self::with_query(source, config, query)
    }

    /// Creates an idle controller starting from `query`, e.g. one restored
    /// from a link or command line. [`reset`] still returns to the defaults.
    ///
    /// [`reset`]: TableController::reset
    pub fn with_query(source: S, config: TableConfig, query: QueryState) -> Self {
        let snapshot = TableSnapshot::new(query);
        let (updates, _) = watch::channel(snapshot.clone());
        Self {
            inner: Arc::new(ControllerInner {
                fetcher: DataFetcher::new(source, config),
                state: Mutex::new(snapshot),
                updates,
            }),
        }
    }

    /// Returns the table configuration.
    pub fn config(&self) -> &TableConfig {
        self.inner.fetcher.config()
    }

    /// Returns the list source.
    pub fn source(&self) -> &S {
        self.inner.fetcher.source()
    }

    // =========================================================================
    // State access
    // =========================================================================

    /// Returns the current state.
    pub fn snapshot(&self) -> TableSnapshot {
        self.lock().clone()
    }

    /// Returns the current status.
    pub fn status(&self) -> TableStatus {
        self.lock().status
    }

    /// Subscribes to state changes. The receiver sees every published
    /// snapshot; views re-render on change.
    pub fn subscribe(&self) -> watch::Receiver<TableSnapshot> {
        self.inner.updates.subscribe()
    }

    /// Waits until no request is in flight and returns that state.
    pub async fn settled(&self) -> TableSnapshot {
        let mut updates = self.subscribe();
        let settled = updates
            .wait_for(|snapshot| !snapshot.status.is_loading())
            .await
            .map(|snapshot| snapshot.clone());
        settled.unwrap_or_else(|_| self.snapshot())
    }

    /// Returns the export URL for the current query without pagination,
    /// with `format=<format>` appended.
    pub fn download_url(&self, format: &str) -> Result<Url, Error> {
        let query = self.lock().query.clone();
        self.inner.fetcher.export_url(&query, format)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Issues the initial request. Does nothing unless the table is idle.
    pub fn load(&self) -> Option<RequestId> {
        let pending = self.update(|state| state.status.is_idle().then(|| self.begin(state)));
        pending.map(|pending| self.spawn(pending))
    }

    /// Re-issues the current query, even if nothing changed.
    ///
    /// Call this after an external create, edit or delete.
    pub fn refresh(&self) -> RequestId {
        let pending = self.update(|state| self.begin(state));
        self.spawn(pending)
    }

    /// Restores the initial query state and clears the selection.
    pub fn reset(&self) -> Option<RequestId> {
        self.transition(QueryState::reset)
    }

    // =========================================================================
    // Query intents
    // =========================================================================

    /// Sets a filter value.
    pub fn set_filter(&self, name: impl Into<String>, value: impl Into<FilterValue>) -> Option<RequestId> {
        let name = name.into();
        let value = value.into();
        self.transition(|query| query.set_filter(name, value))
    }

    /// Removes a filter.
    pub fn clear_filter(&self, name: &str) -> Option<RequestId> {
        self.transition(|query| query.clear_filter(name))
    }

    /// Removes all filters.
    pub fn clear_filters(&self) -> Option<RequestId> {
        self.transition(QueryState::clear_filters)
    }

    /// Sorts by a key.
    pub fn set_sort(&self, key: impl Into<String>, direction: Direction) -> Option<RequestId> {
        let key = key.into();
        self.transition(|query| query.set_sort(key, direction))
    }

    /// Sorts ascending by a new key or reverses the current one.
    pub fn toggle_sort(&self, key: impl Into<String>) -> Option<RequestId> {
        let key = key.into();
        self.transition(|query| query.toggle_sort(key))
    }

    /// Removes the sort.
    pub fn clear_sort(&self) -> Option<RequestId> {
        self.transition(QueryState::clear_sort)
    }

    /// Sets the search term.
    pub fn set_search(&self, term: impl Into<String>) -> Option<RequestId> {
        let term = term.into();
        self.transition(|query| query.set_search(term))
    }

    /// Moves to a page.
    pub fn set_page(&self, page: u32) -> Option<RequestId> {
        self.transition(|query| query.set_page(page))
    }

    /// Moves to the next page, if the current page reports one.
    pub fn next_page(&self) -> Option<RequestId> {
        self.transition_with_page(|query, total| match total {
            Some(total) if query.page() < query.last_page(total) => {
                query.set_page(query.page() + 1)
            }
            _ => Change::Cosmetic,
        })
    }

    /// Moves to the previous page.
    pub fn previous_page(&self) -> Option<RequestId> {
        self.transition(|query| match query.page() {
            1 => Change::Cosmetic,
            page => query.set_page(page - 1),
        })
    }

    /// Sets the page size.
    pub fn set_page_size(&self, page_size: u32) -> Option<RequestId> {
        self.transition(|query| query.set_page_size(page_size))
    }

    // =========================================================================
    // Cosmetic intents
    // =========================================================================

    /// Replaces the row selection.
    pub fn select_rows(&self, ids: impl IntoIterator<Item = RecordId>) {
        self.transition(|query| query.select(ids));
    }

    /// Toggles selection of one row.
    pub fn toggle_row(&self, id: RecordId) {
        self.transition(|query| query.toggle_selected(id));
    }

    /// Clears the row selection.
    pub fn clear_selection(&self) {
        self.transition(QueryState::clear_selection);
    }

    /// Removes a record from the current page without waiting for the
    /// server, and drops it from the selection.
    ///
    /// The total count is unchanged; the next refresh replaces the page with
    /// the authoritative list.
    pub fn remove_record_optimistically(&self, id: &RecordId) -> Option<Record> {
        self.update(|state| {
            let removed = state
                .page
                .as_mut()
                .and_then(|page| Arc::make_mut(page).remove(id));
            if removed.is_some() {
                state.query.deselect(id);
            }
            removed
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, TableSnapshot> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutates the state under the lock and publishes the result.
    fn update<R>(&self, f: impl FnOnce(&mut TableSnapshot) -> R) -> R {
        let mut state = self.lock();
        let result = f(&mut state);
        self.inner.updates.send_replace(state.clone());
        result
    }

    fn transition(&self, f: impl FnOnce(&mut QueryState) -> Change) -> Option<RequestId> {
        self.transition_with_page(|query, _| f(query))
    }

    /// Like `transition`, also passing the total count of the current page.
    fn transition_with_page(
        &self,
        f: impl FnOnce(&mut QueryState, Option<u64>) -> Change,
    ) -> Option<RequestId> {
        let pending = self.update(|state| {
            let total = state.total_count();
            match f(&mut state.query, total) {
                Change::Dirty => Some(self.begin(state)),
                Change::Cosmetic => None,
            }
        });
        pending.map(|pending| self.spawn(pending))
    }

    /// Issues a request id and enters `Loading`. Must run under the lock so
    /// issue order matches state order.
    fn begin(&self, state: &mut TableSnapshot) -> Pending {
        let id = self.inner.fetcher.issue();
        state.status = TableStatus::Loading;
        state.request = Some(id);
        log::debug!(
            "Table {} issued request {} for page {}",
            self.config().endpoint,
            id,
            state.query.page()
        );
        Pending {
            id,
            query: state.query.clone(),
        }
    }

    fn spawn(&self, pending: Pending) -> RequestId {
        let Pending { id, query } = pending;
        let controller = self.clone();
        tokio::spawn(async move {
            let fetched = controller.inner.fetcher.fetch(id, query).await;
            controller.apply(fetched);
        });
        id
    }

    /// Applies a fetch result if it belongs to the latest request.
    fn apply(&self, fetched: Fetched) {
        let Fetched { id, result } = fetched;
        let mut state = self.lock();

        if !self.inner.fetcher.is_current(id) {
            log::debug!(
                "Table {} discarded stale result for request {}",
                self.config().endpoint,
                id
            );
            return;
        }

        let mut follow_up = None;
        match result {
            Ok(page) => {
                let total = page.total_count();
                let last_page = state.query.last_page(total);
                if page.is_empty() && total > 0 && state.query.page() > last_page {
                    log::debug!(
                        "Table {} page {} is past the end, clamping to {}",
                        self.config().endpoint,
                        state.query.page(),
                        last_page
                    );
                    state.query.set_page(last_page);
                    follow_up = Some(self.begin(&mut state));
                } else {
                    if total == 0 {
                        state.query.set_page(1);
                    }
                    state.page = Some(Arc::new(page));
                    state.error = None;
                    state.status = TableStatus::Ready;
                }
            }
            Err(error) => {
                log::warn!(
                    "Table {} request {} failed: {}",
                    self.config().endpoint,
                    id,
                    error
                );
                state.error = Some(error);
                state.status = TableStatus::Failed;
            }
        }

        self.inner.updates.send_replace(state.clone());
        drop(state);

        if let Some(pending) = follow_up {
            self.spawn(pending);
        }
    }
}

impl<S> std::fmt::Debug for TableController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableController")
            .field("endpoint", &self.inner.fetcher.config().endpoint)
            .finish()
    }
}
