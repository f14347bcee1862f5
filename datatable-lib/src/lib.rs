//! Generic table data library
//!
//! Table state and sequence-gated fetching for paginated REST list
//! endpoints, with a render-agnostic view contract on top.
//!
//! - [`query`] - pagination, sort, filter, search and selection state
//! - [`fetch`] - the [`ListSource`](fetch::ListSource) seam and request sequencing
//! - [`controller`] - [`TableController`], the per-table state machine
//! - [`view`] - layouts, capabilities, view models and intents
//!
//! [`ListClient`] is the bundled HTTP list source.

pub mod controller;
pub mod error;
pub mod fetch;
pub mod model;
pub mod query;
pub mod view;

mod client;
mod config;

pub use client::*;
pub use config::TableConfig;
pub use controller::TableController;
pub use controller::TableSnapshot;
pub use controller::TableStatus;
