//! Query state for one table instance.
//!
//! # Types
//!
//! - [`QueryState`] - pagination, sort, filter, search and selection state
//! - [`Change`] - whether a mutation requires a refetch
//! - [`Sort`] / [`Direction`] - ordering of the list
//! - [`FilterValue`] - value of a named filter
//! - [`QueryEncoding`] - how a state is encoded into list endpoint parameters
//! - [`Page`] - one fetched batch of records

mod encoding;
mod filter;
mod order;
mod page;
mod state;

pub use encoding::Pagination;
pub use encoding::QueryEncoding;
pub use encoding::SortStyle;
pub use filter::FilterValue;
pub use order::Direction;
pub use order::Sort;
pub use page::Page;
pub use state::Change;
pub use state::DEFAULT_PAGE_SIZE;
pub use state::QueryState;
