//! Render-agnostic table view contract.
//!
//! A [`Table`] combines a controller with its column and filter layout,
//! explicit [`Capabilities`] and caller-owned [`TableHandlers`]. Views build a
//! [`ViewModel`] from it and send [`TableIntent`]s back through
//! [`Table::dispatch`].

mod intent;
mod layout;
mod model;
mod table;

pub use intent::RowActionKind;
pub use intent::TableActionKind;
pub use intent::TableIntent;
pub use layout::CellRenderer;
pub use layout::Column;
pub use layout::FilterDef;
pub use layout::FilterKind;
pub use layout::TableLayout;
pub use layout::display_value;
pub use model::ErrorPanel;
pub use model::FilterControl;
pub use model::HeaderCell;
pub use model::LoadingIndicator;
pub use model::PaginationControls;
pub use model::RowView;
pub use model::ViewModel;
pub use table::Capabilities;
pub use table::Table;
pub use table::TableHandlers;
pub use table::TableView;
