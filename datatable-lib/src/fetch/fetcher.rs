//! Sequenced page fetching.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use url::Url;

use super::ListRequest;
use super::ListSource;
use crate::TableConfig;
use crate::error::Error;
use crate::error::FetchError;
use crate::query::Page;
use crate::query::QueryState;

/// Monotonic identifier of an issued list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Returns the sequence number.
    pub fn sequence(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of one fetch, tagged with the request that produced it.
#[derive(Debug, Clone)]
pub struct Fetched {
    /// The request this result belongs to.
    pub id: RequestId,
    /// The fetched page or the failure.
    pub result: Result<Page, FetchError>,
}

/// Fetches pages for one table instance.
///
/// Every request is tagged with a [`RequestId`] from a monotonic sequence.
/// Only the latest issued id is current; results for older ids are stale and
/// must not be applied. Nothing is cached between requests.
///
/// # Example
///
/// ```ignore
/// let fetcher = DataFetcher::new(client, TableConfig::new("part/category/"));
///
/// let first = fetcher.issue();
/// let second = fetcher.issue();
///
/// let fetched = fetcher.fetch(first, QueryState::default()).await;
/// assert!(!fetcher.is_current(fetched.id));
/// ```
#[derive(Debug)]
pub struct DataFetcher<S> {
    source: S,
    config: TableConfig,
    sequence: AtomicU64,
}

impl<S> DataFetcher<S> {
    /// Creates a fetcher for an endpoint.
    pub fn new(source: S, config: TableConfig) -> Self {
        Self {
            source,
            config,
            sequence: AtomicU64::new(0),
        }
    }

    /// Returns the list source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the table configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Issues a new request id, superseding all earlier ones.
    pub fn issue(&self) -> RequestId {
        RequestId(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns the most recently issued id.
    pub fn latest(&self) -> Option<RequestId> {
        match self.sequence.load(Ordering::SeqCst) {
            0 => None,
            n => Some(RequestId(n)),
        }
    }

    /// Returns `true` if `id` is the most recently issued request.
    pub fn is_current(&self, id: RequestId) -> bool {
        self.sequence.load(Ordering::SeqCst) == id.0
    }

    /// Resolves the request for a query state.
    pub fn request(&self, query: &QueryState) -> ListRequest {
        ListRequest {
            endpoint: self.config.endpoint.clone(),
            params: self.config.encoding.pairs(query, &self.config.params),
            id_field: self.config.id_field.clone(),
            query: query.clone(),
        }
    }
}

impl<S: ListSource> DataFetcher<S> {
    /// Fetches the page for `query` under request `id`.
    ///
    /// The returned page echoes `query`. Failures are returned, not retried.
    pub async fn fetch(&self, id: RequestId, query: QueryState) -> Fetched {
        let request = self.request(&query);
        log::debug!(
            "Fetching {} request {} ({} params)",
            request.endpoint,
            id,
            request.params.len()
        );
        let result = self
            .source
            .fetch_list(&request)
            .await
            .map(|response| Page::new(response.results, response.count, query));
        Fetched { id, result }
    }

    /// Returns the URL of the full result set for `query` in an export
    /// format, without pagination.
    pub fn export_url(&self, query: &QueryState, format: &str) -> Result<Url, Error> {
        let mut params = self.config.encoding.unpaged_pairs(query, &self.config.params);
        params.push(("format".to_string(), format.to_string()));
        self.source.list_url(&self.config.endpoint, &params)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::fetch::ListResponse;
    use crate::model::Record;

    struct Fixed;

    #[async_trait]
    impl ListSource for Fixed {
        async fn fetch_list(&self, request: &ListRequest) -> Result<ListResponse, FetchError> {
            let records = (0..request.query.page_size())
                .map(|i| Record::new(i64::from(i)))
                .collect();
            Ok(ListResponse::new(records, 100))
        }
    }

    fn fetcher() -> DataFetcher<Fixed> {
        DataFetcher::new(Fixed, TableConfig::new("part/category/").with_page_size(5))
    }

    #[test]
    fn test_sequence_supersedes() {
        let fetcher = fetcher();
        assert_eq!(fetcher.latest(), None);

        let first = fetcher.issue();
        let second = fetcher.issue();
        assert!(second > first);
        assert!(!fetcher.is_current(first));
        assert!(fetcher.is_current(second));
        assert_eq!(fetcher.latest(), Some(second));
    }

    #[test]
    fn test_request_uses_config() {
        let fetcher = DataFetcher::new(
            Fixed,
            TableConfig::new("part/category/")
                .with_id_field("pk")
                .with_param("parent", "null"),
        );
        let request = fetcher.request(&QueryState::new(10));

        assert_eq!(request.endpoint, "part/category/");
        assert_eq!(request.id_field, "pk");
        assert_eq!(request.params[0], ("parent".to_string(), "null".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_echoes_query() {
        let fetcher = fetcher();
        let mut query = QueryState::new(5);
        query.set_page(3);

        let id = fetcher.issue();
        let fetched = fetcher.fetch(id, query.clone()).await;
        assert_eq!(fetched.id, id);

        let page = fetched.result.unwrap();
        assert_eq!(page.len(), 5);
        assert_eq!(page.total_count(), 100);
        assert_eq!(page.request(), &query);
    }

    #[test]
    fn test_export_url_unsupported_without_url() {
        let err = fetcher()
            .export_url(&QueryState::default(), "csv")
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }
}
