//! User intents emitted by views.

use crate::model::RecordId;
use crate::query::FilterValue;

/// Per-row action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowActionKind {
    /// Open the edit form for the row. Requires `can_edit`.
    Edit,
    /// Delete the row. Requires `can_delete`.
    Delete,
    /// Caller-defined action, always available once registered.
    Custom(String),
}

impl RowActionKind {
    /// Returns the display label.
    pub fn label(&self) -> &str {
        match self {
            Self::Edit => "Edit",
            Self::Delete => "Delete",
            Self::Custom(name) => name,
        }
    }
}

/// Table-level action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableActionKind {
    /// Open the create form. Requires `can_add`.
    Add,
    /// Delete all selected rows. Requires `can_delete` and a selection.
    DeleteSelected,
}

/// An intent emitted by a view.
#[derive(Debug, Clone, PartialEq)]
pub enum TableIntent {
    /// Header click: sort by the column, reversing if already sorted by it.
    Sort(String),
    /// Set a filter value.
    SetFilter(String, FilterValue),
    /// Remove a filter.
    ClearFilter(String),
    /// Remove all filters.
    ClearFilters,
    /// Change the search term.
    Search(String),
    /// Jump to a page.
    Page(u32),
    /// Next page.
    NextPage,
    /// Previous page.
    PreviousPage,
    /// Change the page size.
    PageSize(u32),
    /// Toggle selection of a row.
    ToggleRow(RecordId),
    /// Replace the selection.
    SelectRows(Vec<RecordId>),
    /// Clear the selection.
    ClearSelection,
    /// Row click.
    RowClick(RecordId),
    /// Row action.
    RowAction(RowActionKind, RecordId),
    /// Table action.
    TableAction(TableActionKind),
    /// Show or hide a switchable column.
    ToggleColumn(String),
    /// Reload the current query.
    Refresh,
    /// Restore the initial query.
    Reset,
}
