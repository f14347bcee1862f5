//! Table: controller plus layout, capabilities and caller callbacks.

use super::RowActionKind;
use super::TableActionKind;
use super::TableIntent;
use super::TableLayout;
use super::ViewModel;
use crate::controller::TableController;
use crate::fetch::ListSource;
use crate::fetch::RequestId;
use crate::model::Record;
use crate::model::RecordId;

/// Permissions granted to the current user, supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// May create records.
    pub can_add: bool,
    /// May edit records.
    pub can_edit: bool,
    /// May delete records.
    pub can_delete: bool,
}

impl Capabilities {
    /// Grants everything.
    pub fn all() -> Self {
        Self {
            can_add: true,
            can_edit: true,
            can_delete: true,
        }
    }

    /// Sets `can_add`.
    pub fn with_add(mut self, allowed: bool) -> Self {
        self.can_add = allowed;
        self
    }

    /// Sets `can_edit`.
    pub fn with_edit(mut self, allowed: bool) -> Self {
        self.can_edit = allowed;
        self
    }

    /// Sets `can_delete`.
    pub fn with_delete(mut self, allowed: bool) -> Self {
        self.can_delete = allowed;
        self
    }

    /// Returns `true` if the row action is permitted.
    pub fn allows_row_action(&self, action: &RowActionKind) -> bool {
        match action {
            RowActionKind::Edit => self.can_edit,
            RowActionKind::Delete => self.can_delete,
            RowActionKind::Custom(_) => true,
        }
    }

    /// Returns `true` if the table action is permitted.
    pub fn allows_table_action(&self, action: TableActionKind) -> bool {
        match action {
            TableActionKind::Add => self.can_add,
            TableActionKind::DeleteSelected => self.can_delete,
        }
    }
}

type RowCallback = Box<dyn Fn(&Record) + Send + Sync>;
type ActionCallback = Box<dyn Fn() + Send + Sync>;
type SelectionCallback = Box<dyn Fn(&[RecordId]) + Send + Sync>;

/// Caller-owned callbacks for row clicks and actions.
///
/// The table never interprets these; navigation, form modals and deletion
/// requests all live behind them. After a successful create, edit or delete
/// the caller calls [`TableController::refresh`].
#[derive(Default)]
pub struct TableHandlers {
    row_click: Option<RowCallback>,
    row_actions: Vec<(RowActionKind, RowCallback)>,
    add: Option<ActionCallback>,
    delete_selected: Option<SelectionCallback>,
}

impl TableHandlers {
    /// Creates empty handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the clicked record.
    pub fn on_row_click(mut self, f: impl Fn(&Record) + Send + Sync + 'static) -> Self {
        self.row_click = Some(Box::new(f));
        self
    }

    /// Called for the edit row action.
    pub fn on_edit(self, f: impl Fn(&Record) + Send + Sync + 'static) -> Self {
        self.on_row_action(RowActionKind::Edit, f)
    }

    /// Called for the delete row action.
    pub fn on_delete(self, f: impl Fn(&Record) + Send + Sync + 'static) -> Self {
        self.on_row_action(RowActionKind::Delete, f)
    }

    /// Registers a handler for a row action, replacing any previous one.
    pub fn on_row_action(mut self, action: RowActionKind, f: impl Fn(&Record) + Send + Sync + 'static) -> Self {
        self.row_actions.retain(|(kind, _)| *kind != action);
        self.row_actions.push((action, Box::new(f)));
        self
    }

    /// Called for the add table action.
    pub fn on_add(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.add = Some(Box::new(f));
        self
    }

    /// Called with the selected ids for the bulk delete action.
    pub fn on_delete_selected(mut self, f: impl Fn(&[RecordId]) + Send + Sync + 'static) -> Self {
        self.delete_selected = Some(Box::new(f));
        self
    }

    fn row_action(&self, action: &RowActionKind) -> Option<&RowCallback> {
        self.row_actions
            .iter()
            .find(|(kind, _)| kind == action)
            .map(|(_, f)| f)
    }

    fn custom_actions(&self) -> impl Iterator<Item = &RowActionKind> {
        self.row_actions
            .iter()
            .map(|(kind, _)| kind)
            .filter(|kind| matches!(kind, RowActionKind::Custom(_)))
    }
}

impl std::fmt::Debug for TableHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let actions: Vec<_> = self.row_actions.iter().map(|(kind, _)| kind).collect();
        f.debug_struct("TableHandlers")
            .field("row_click", &self.row_click.is_some())
            .field("row_actions", &actions)
            .field("add", &self.add.is_some())
            .field("delete_selected", &self.delete_selected.is_some())
            .finish()
    }
}

/// A renderer for table view models.
pub trait TableView {
    /// Renders the model.
    fn render(&mut self, model: &ViewModel);
}

/// A complete table instance.
///
/// Routes view intents: query intents go to the controller, row and table
/// actions to the caller's handlers (only when the capability allows it),
/// column toggles to the layout.
#[derive(Debug)]
pub struct Table<S> {
    controller: TableController<S>,
    layout: TableLayout,
    capabilities: Capabilities,
    handlers: TableHandlers,
}

impl<S: ListSource> Table<S> {
    /// Creates a read-only table with no handlers.
    pub fn new(controller: TableController<S>, layout: TableLayout) -> Self {
        Self {
            controller,
            layout,
            capabilities: Capabilities::default(),
            handlers: TableHandlers::default(),
        }
    }

    /// Sets the capabilities.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Sets the handlers.
    pub fn with_handlers(mut self, handlers: TableHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    /// Returns the controller.
    pub fn controller(&self) -> &TableController<S> {
        &self.controller
    }

    /// Returns the layout.
    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    /// Returns the capabilities.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Builds the view model for the current controller state.
    pub fn view_model(&self) -> ViewModel {
        let snapshot = self.controller.snapshot();
        let mut model = ViewModel::build(&snapshot, &self.layout, &self.capabilities);
        for action in self.handlers.custom_actions() {
            model.push_row_action(action.clone());
        }
        model
    }

    /// Builds the view model and hands it to `view`.
    pub fn render_into(&self, view: &mut impl TableView) {
        view.render(&self.view_model());
    }

    /// Applies a view intent. Returns the request id if a fetch was issued.
    pub fn dispatch(&mut self, intent: TableIntent) -> Option<RequestId> {
        let controller = &self.controller;
        match intent {
            TableIntent::Sort(key) => {
                let sortable = self
                    .layout
                    .find_column(&key)
                    .is_some_and(|column| column.sortable);
                if !sortable {
                    log::warn!("Ignoring sort on non-sortable column {}", key);
                    return None;
                }
                controller.toggle_sort(key)
            }
            TableIntent::SetFilter(name, value) => controller.set_filter(name, value),
            TableIntent::ClearFilter(name) => controller.clear_filter(&name),
            TableIntent::ClearFilters => controller.clear_filters(),
            TableIntent::Search(term) => controller.set_search(term),
            TableIntent::Page(page) => controller.set_page(page),
            TableIntent::NextPage => controller.next_page(),
            TableIntent::PreviousPage => controller.previous_page(),
            TableIntent::PageSize(size) => controller.set_page_size(size),
            TableIntent::ToggleRow(id) => {
                controller.toggle_row(id);
                None
            }
            TableIntent::SelectRows(ids) => {
                controller.select_rows(ids);
                None
            }
            TableIntent::ClearSelection => {
                controller.clear_selection();
                None
            }
            TableIntent::RowClick(id) => {
                if let Some(f) = &self.handlers.row_click {
                    self.with_record(&id, |record| f(record));
                }
                None
            }
            TableIntent::RowAction(action, id) => {
                self.run_row_action(&action, &id);
                None
            }
            TableIntent::TableAction(action) => {
                self.run_table_action(action);
                None
            }
            TableIntent::ToggleColumn(accessor) => {
                if !self.layout.toggle_column(&accessor) {
                    log::warn!("Column {} cannot be toggled", accessor);
                }
                None
            }
            TableIntent::Refresh => Some(controller.refresh()),
            TableIntent::Reset => controller.reset(),
        }
    }

    fn run_row_action(&self, action: &RowActionKind, id: &RecordId) {
        if !self.capabilities.allows_row_action(action) {
            log::warn!("Row action {} not permitted", action.label());
            return;
        }
        match self.handlers.row_action(action) {
            Some(f) => self.with_record(id, |record| f(record)),
            None => log::warn!("No handler for row action {}", action.label()),
        }
    }

    fn run_table_action(&self, action: TableActionKind) {
        if !self.capabilities.allows_table_action(action) {
            log::warn!("Table action {:?} not permitted", action);
            return;
        }
        match action {
            TableActionKind::Add => match &self.handlers.add {
                Some(f) => f(),
                None => log::warn!("No handler for add action"),
            },
            TableActionKind::DeleteSelected => {
                let mut selected: Vec<RecordId> = self
                    .controller
                    .snapshot()
                    .query
                    .selected()
                    .iter()
                    .cloned()
                    .collect();
                if selected.is_empty() {
                    return;
                }
                selected.sort_by(RecordId::cmp_natural);
                match &self.handlers.delete_selected {
                    Some(f) => f(&selected),
                    None => log::warn!("No handler for bulk delete"),
                }
            }
        }
    }

    /// Runs `f` with the record if it is on the current page.
    fn with_record(&self, id: &RecordId, f: impl FnOnce(&Record)) {
        let snapshot = self.controller.snapshot();
        match snapshot.page.as_ref().and_then(|page| page.find(id)) {
            Some(record) => f(record),
            None => log::warn!("Record {} is not on the current page", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_gate_actions() {
        let caps = Capabilities::default().with_edit(true);
        assert!(caps.allows_row_action(&RowActionKind::Edit));
        assert!(!caps.allows_row_action(&RowActionKind::Delete));
        assert!(caps.allows_row_action(&RowActionKind::Custom("Duplicate".into())));
        assert!(!caps.allows_table_action(TableActionKind::Add));
        assert!(Capabilities::all().allows_table_action(TableActionKind::DeleteSelected));
    }

    #[test]
    fn test_handlers_replace_duplicate_actions() {
        let handlers = TableHandlers::new()
            .on_edit(|_| {})
            .on_edit(|_| {})
            .on_row_action(RowActionKind::Custom("Duplicate".into()), |_| {});

        assert_eq!(handlers.row_actions.len(), 2);
        assert_eq!(handlers.custom_actions().count(), 1);
    }
}
