use std::sync::Arc;

use super::TableStatus;
use crate::error::FetchError;
use crate::fetch::RequestId;
use crate::model::Record;
use crate::query::Page;
use crate::query::QueryState;

/// Point-in-time view of a table controller.
///
/// This is everything a view needs to render: status, current query, the
/// last successfully fetched page and the last error.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    /// Load status.
    pub status: TableStatus,
    /// Current query state, including selection.
    pub query: QueryState,
    /// Last successfully fetched page, kept while reloading or failed.
    pub page: Option<Arc<Page>>,
    /// Error of the latest request; cleared by the next success.
    pub error: Option<FetchError>,
    /// The most recently issued request.
    pub request: Option<RequestId>,
}

impl TableSnapshot {
    pub(crate) fn new(query: QueryState) -> Self {
        Self {
            status: TableStatus::Idle,
            query,
            page: None,
            error: None,
            request: None,
        }
    }

    /// Returns `true` while the first page is loading.
    pub fn is_first_load(&self) -> bool {
        self.status.is_loading() && self.page.is_none()
    }

    /// Returns the records of the current page.
    pub fn records(&self) -> &[Record] {
        self.page.as_deref().map(Page::records).unwrap_or_default()
    }

    /// Returns the total record count of the current page, if any.
    pub fn total_count(&self) -> Option<u64> {
        self.page.as_ref().map(|page| page.total_count())
    }
}
