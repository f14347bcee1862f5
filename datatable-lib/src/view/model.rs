//! View model built from a controller snapshot.

use super::Capabilities;
use super::FilterKind;
use super::RowActionKind;
use super::TableActionKind;
use super::TableIntent;
use super::TableLayout;
use crate::controller::TableSnapshot;
use crate::error::FetchErrorKind;
use crate::model::RecordId;
use crate::query::Direction;
use crate::query::FilterValue;

/// Which loading indicator to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingIndicator {
    /// Nothing is loading.
    None,
    /// First load: nothing to show yet, block the table area.
    Blocking,
    /// Reloading a populated page: keep rows visible, show a light overlay.
    Overlay,
}

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    /// Column accessor, also the sort key.
    pub accessor: String,
    /// Header title.
    pub title: String,
    /// Whether clicking sorts.
    pub sortable: bool,
    /// Active sort direction on this column.
    pub sort: Option<Direction>,
}

/// One filter control.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterControl {
    /// Filter name.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Longer description.
    pub description: Option<String>,
    /// Control kind.
    pub kind: FilterKind,
    /// Active value.
    pub value: Option<FilterValue>,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Record id.
    pub id: RecordId,
    /// Cell text for each visible column.
    pub cells: Vec<String>,
    /// Whether the row is selected.
    pub selected: bool,
    /// Permitted row actions.
    pub actions: Vec<RowActionKind>,
}

/// Pagination footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationControls {
    /// Current 1-based page.
    pub page: u32,
    /// Records per page.
    pub page_size: u32,
    /// Number of pages.
    pub page_count: u32,
    /// Total matching records.
    pub total: u64,
    /// 1-based index of the first shown record, 0 when empty.
    pub first: u64,
    /// 1-based index of the last shown record, 0 when empty.
    pub last: u64,
    /// Whether a previous page exists.
    pub has_previous: bool,
    /// Whether a next page exists.
    pub has_next: bool,
}

/// Error state with a retry affordance.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPanel {
    /// Error category.
    pub kind: FetchErrorKind,
    /// Message to show.
    pub message: String,
    /// Intent that retries the request.
    pub retry: TableIntent,
}

/// Everything a view renders, derived from a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    /// Loading indicator.
    pub indicator: LoadingIndicator,
    /// Header cells of visible columns.
    pub header: Vec<HeaderCell>,
    /// Filter controls.
    pub filters: Vec<FilterControl>,
    /// Active search term.
    pub search: Option<String>,
    /// Permitted table actions.
    pub actions: Vec<TableActionKind>,
    /// Rows of the current page.
    pub rows: Vec<RowView>,
    /// Number of selected records, on or off the page.
    pub selected_count: usize,
    /// Pagination footer, once a page is available.
    pub pagination: Option<PaginationControls>,
    /// Error panel.
    pub error: Option<ErrorPanel>,
}

impl ViewModel {
    /// Builds the view model.
    ///
    /// Row and table actions are gated by `capabilities`; the core never
    /// evaluates authorization itself.
    pub fn build(snapshot: &TableSnapshot, layout: &TableLayout, capabilities: &Capabilities) -> Self {
        let query = &snapshot.query;

        let indicator = match (snapshot.status.is_loading(), snapshot.page.is_some()) {
            (false, _) => LoadingIndicator::None,
            (true, false) => LoadingIndicator::Blocking,
            (true, true) => LoadingIndicator::Overlay,
        };

        let header = layout
            .visible_columns()
            .map(|column| HeaderCell {
                accessor: column.accessor.clone(),
                title: column.title.clone(),
                sortable: column.sortable,
                sort: query
                    .sort()
                    .filter(|sort| sort.key == column.accessor)
                    .map(|sort| sort.direction),
            })
            .collect();

        let filters = layout
            .filters()
            .iter()
            .map(|filter| FilterControl {
                name: filter.name.clone(),
                label: filter.label.clone(),
                description: filter.description.clone(),
                kind: filter.kind.clone(),
                value: query.filter(&filter.name).cloned(),
            })
            .collect();

        let mut row_actions = Vec::new();
        if capabilities.can_edit {
            row_actions.push(RowActionKind::Edit);
        }
        if capabilities.can_delete {
            row_actions.push(RowActionKind::Delete);
        }

        let rows = snapshot
            .records()
            .iter()
            .map(|record| RowView {
                id: record.id().clone(),
                cells: layout.visible_columns().map(|column| column.cell(record)).collect(),
                selected: query.is_selected(record.id()),
                actions: row_actions.clone(),
            })
            .collect();

        let mut actions = Vec::new();
        if capabilities.can_add {
            actions.push(TableActionKind::Add);
        }
        if capabilities.can_delete && !query.selected().is_empty() {
            actions.push(TableActionKind::DeleteSelected);
        }

        let pagination = snapshot.page.as_ref().map(|page| {
            let total = page.total_count();
            let page_count = query.last_page(total);
            let shown = page.len() as u64;
            let (first, last) = if shown == 0 {
                (0, 0)
            } else {
                (query.offset() + 1, query.offset() + shown)
            };
            PaginationControls {
                page: query.page(),
                page_size: query.page_size(),
                page_count,
                total,
                first,
                last,
                has_previous: query.page() > 1,
                has_next: query.page() < page_count,
            }
        });

        let error = snapshot.error.as_ref().map(|error| ErrorPanel {
            kind: error.kind(),
            message: error.to_string(),
            retry: TableIntent::Refresh,
        });

        Self {
            indicator,
            header,
            filters,
            search: query.search().map(str::to_string),
            actions,
            rows,
            selected_count: query.selected().len(),
            pagination,
            error,
        }
    }

    /// Appends a caller-defined action to every row.
    pub(crate) fn push_row_action(&mut self, action: RowActionKind) {
        for row in &mut self.rows {
            row.actions.push(action.clone());
        }
    }
}
