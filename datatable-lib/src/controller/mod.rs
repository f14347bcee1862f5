//! Table controller: drives fetching from query state changes.

mod snapshot;
mod status;
mod table;

pub use snapshot::TableSnapshot;
pub use status::TableStatus;
pub use table::TableController;
