//! Fetching pages from list endpoints.
//!
//! [`ListSource`] is the transport seam; [`DataFetcher`] adds request
//! sequencing on top of it so callers can discard superseded results.

mod fetcher;
mod source;

pub use fetcher::DataFetcher;
pub use fetcher::Fetched;
pub use fetcher::RequestId;
pub use source::ListRequest;
pub use source::ListResponse;
pub use source::ListSource;
