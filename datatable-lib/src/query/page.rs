//! Page type for paginated list results.

use chrono::DateTime;
use chrono::Utc;

use super::QueryState;
use crate::model::Record;
use crate::model::RecordId;

/// A page of list results.
///
/// Each page carries the query state that produced it, so a view can tell
/// which request the rows belong to while a newer request is loading.
///
/// # Example
///
/// ```ignore
/// let snapshot = controller.settled().await;
///
/// if let Some(page) = &snapshot.page {
///     for record in page.records() {
///         println!("{:?}", record.get_str("name"));
///     }
///     println!("{} of {}", page.len(), page.total_count());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Page {
    records: Vec<Record>,
    total_count: u64,
    /// Query state echoed from the request.
    request: QueryState,
    fetched_at: DateTime<Utc>,
}

impl Page {
    /// Creates a page for the given request.
    pub fn new(records: Vec<Record>, total_count: u64, request: QueryState) -> Self {
        Self {
            records,
            total_count,
            request,
            fetched_at: Utc::now(),
        }
    }

    /// Returns a reference to the records in this page.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the page and returns the records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Returns the total number of records matching the query.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Returns the query state the page was fetched with.
    pub fn request(&self) -> &QueryState {
        &self.request
    }

    /// Returns when the page was received.
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Finds a record by id.
    pub fn find(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Returns the number of pages for the requested page size.
    pub fn page_count(&self) -> u32 {
        self.request.last_page(self.total_count)
    }

    /// Returns `true` if pages after this one exist.
    pub fn has_more(&self) -> bool {
        self.request.page() < self.page_count()
    }

    /// Removes the first record with the given id.
    ///
    /// The total count is left untouched.
    pub(crate) fn remove(&mut self, id: &RecordId) -> Option<Record> {
        let index = self.records.iter().position(|record| record.id() == id)?;
        Some(self.records.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(ids: &[i64], total: u64) -> Page {
        let records = ids.iter().map(|&id| Record::new(id)).collect();
        Page::new(records, total, QueryState::new(3))
    }

    #[test]
    fn test_remove_only_first_match() {
        let mut page = page_of(&[1, 2, 2, 3], 10);
        let removed = page.remove(&RecordId::from(2)).unwrap();
        assert_eq!(removed.id(), &RecordId::from(2));
        assert_eq!(page.len(), 3);
        assert_eq!(page.total_count(), 10);
        assert!(page.find(&RecordId::from(2)).is_some());

        assert!(page.remove(&RecordId::from(9)).is_none());
    }

    #[test]
    fn test_page_count() {
        let page = page_of(&[1, 2, 3], 7);
        assert_eq!(page.page_count(), 3);
        assert!(page.has_more());

        let empty = page_of(&[], 0);
        assert_eq!(empty.page_count(), 1);
        assert!(!empty.has_more());
    }
}
