//! Column and filter definitions.

use std::sync::Arc;

use serde_json::Value;

use crate::model::Record;

/// Custom cell renderer.
pub type CellRenderer = Arc<dyn Fn(&Record) -> String + Send + Sync>;

/// A table column.
///
/// # Example
///
/// ```
/// use datatable_lib::view::Column;
///
/// let name = Column::new("name").sortable(true).switchable(false);
/// let structural = Column::new("structural").sortable(true).yes_no();
///
/// assert_eq!(structural.title, "Structural");
/// ```
#[derive(Clone)]
pub struct Column {
    /// Field path read from each record (dotted paths allowed).
    pub accessor: String,
    /// Header title.
    pub title: String,
    /// Whether the header offers sorting.
    pub sortable: bool,
    /// Whether the user may hide the column.
    pub switchable: bool,
    /// Whether the column is currently hidden.
    pub hidden: bool,
    render: Option<CellRenderer>,
}

impl Column {
    /// Creates a visible, switchable, unsortable column titled after the
    /// accessor (`part_count` becomes `Part Count`).
    pub fn new(accessor: impl Into<String>) -> Self {
        let accessor = accessor.into();
        Self {
            title: title_case(&accessor),
            accessor,
            sortable: false,
            switchable: true,
            hidden: false,
            render: None,
        }
    }

    /// Sets the header title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets whether the column is sortable.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets whether the column can be hidden.
    pub fn switchable(mut self, switchable: bool) -> Self {
        self.switchable = switchable;
        self
    }

    /// Sets whether the column starts hidden.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Sets a custom cell renderer.
    pub fn render(mut self, render: impl Fn(&Record) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    /// Renders booleans as `Yes` / `No`.
    pub fn yes_no(self) -> Self {
        let accessor = self.accessor.clone();
        self.render(move |record| match record.lookup(&accessor) {
            Some(Value::Bool(true)) => "Yes".to_string(),
            Some(Value::Bool(false)) => "No".to_string(),
            other => other.map(display_value).unwrap_or_default(),
        })
    }

    /// Renders the cell text for a record.
    pub fn cell(&self, record: &Record) -> String {
        match &self.render {
            Some(render) => render(record),
            None => record
                .lookup(&self.accessor)
                .map(display_value)
                .unwrap_or_default(),
        }
    }
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("accessor", &self.accessor)
            .field("title", &self.title)
            .field("sortable", &self.sortable)
            .field("switchable", &self.switchable)
            .field("hidden", &self.hidden)
            .field("custom_render", &self.render.is_some())
            .finish()
    }
}

/// Default textual rendering of a JSON value.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn title_case(accessor: &str) -> String {
    let field = accessor.rsplit('.').next().unwrap_or(accessor);
    field
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Kind of filter control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterKind {
    /// Yes / no flag.
    Boolean,
    /// One of a fixed set of values.
    Choice(Vec<String>),
    /// Free text.
    Text,
}

/// A filter offered in the table header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDef {
    /// Query parameter name.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Longer description.
    pub description: Option<String>,
    /// Control kind.
    pub kind: FilterKind,
}

impl FilterDef {
    /// Creates a boolean filter.
    pub fn boolean(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FilterKind::Boolean)
    }

    /// Creates a choice filter.
    pub fn choice<I, V>(name: impl Into<String>, label: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(name, label, FilterKind::Choice(values))
    }

    /// Creates a free-text filter.
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FilterKind::Text)
    }

    fn new(name: impl Into<String>, label: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            description: None,
            kind,
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Columns and filters of one table.
#[derive(Debug, Clone, Default)]
pub struct TableLayout {
    columns: Vec<Column>,
    filters: Vec<FilterDef>,
}

impl TableLayout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column.
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Appends a filter.
    pub fn filter(mut self, filter: FilterDef) -> Self {
        self.filters.push(filter);
        self
    }

    /// Returns all columns, hidden ones included.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the visible columns.
    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|column| !column.hidden)
    }

    /// Returns the filters.
    pub fn filters(&self) -> &[FilterDef] {
        &self.filters
    }

    /// Finds a column by accessor.
    pub fn find_column(&self, accessor: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.accessor == accessor)
    }

    /// Finds a filter by name.
    pub fn find_filter(&self, name: &str) -> Option<&FilterDef> {
        self.filters.iter().find(|filter| filter.name == name)
    }

    /// Shows or hides a switchable column. Returns `true` if it changed.
    pub fn toggle_column(&mut self, accessor: &str) -> bool {
        match self
            .columns
            .iter_mut()
            .find(|column| column.accessor == accessor && column.switchable)
        {
            Some(column) => {
                column.hidden = !column.hidden;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn category() -> Record {
        Record::new(3)
            .set("name", "Capacitors")
            .set("structural", true)
            .set("part_count", 14)
            .set("parent", json!({"name": "Electronics"}))
            .set("tags", json!(["smd", "ceramic"]))
            .set("description", json!(null))
    }

    #[test]
    fn test_title_case() {
        assert_eq!(Column::new("part_count").title, "Part Count");
        assert_eq!(Column::new("parent.name").title, "Name");
        assert_eq!(Column::new("pathstring").title, "Pathstring");
    }

    #[test]
    fn test_cells() {
        let record = category();
        assert_eq!(Column::new("name").cell(&record), "Capacitors");
        assert_eq!(Column::new("part_count").cell(&record), "14");
        assert_eq!(Column::new("parent.name").cell(&record), "Electronics");
        assert_eq!(Column::new("tags").cell(&record), "smd, ceramic");
        assert_eq!(Column::new("description").cell(&record), "");
        assert_eq!(Column::new("missing").cell(&record), "");
        assert_eq!(Column::new("structural").cell(&record), "true");
        assert_eq!(Column::new("structural").yes_no().cell(&record), "Yes");
    }

    #[test]
    fn test_custom_render() {
        let column = Column::new("name").render(|r| format!("[{}]", r.id()));
        assert_eq!(column.cell(&category()), "[3]");
    }

    #[test]
    fn test_toggle_column_only_switchable() {
        let mut layout = TableLayout::new()
            .column(Column::new("name").switchable(false))
            .column(Column::new("description"));

        assert!(!layout.toggle_column("name"));
        assert!(layout.toggle_column("description"));
        assert!(!layout.toggle_column("missing"));

        let visible: Vec<_> = layout.visible_columns().map(|c| c.accessor.as_str()).collect();
        assert_eq!(visible, vec!["name"]);
    }
}
