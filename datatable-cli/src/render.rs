//! Plain-text table rendering.

use datatable_lib::query::Direction;
use datatable_lib::view::LoadingIndicator;
use datatable_lib::view::RowView;
use datatable_lib::view::TableView;
use datatable_lib::view::ViewModel;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

const MAX_CELL_WIDTH: usize = 40;
const SEPARATOR: &str = " | ";

/// Renders view models into a text buffer.
#[derive(Debug, Default)]
pub struct TextView {
    output: String,
}

impl TextView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rendered text and clears the buffer.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    fn line(&mut self, text: impl AsRef<str>) {
        self.output.push_str(text.as_ref().trim_end());
        self.output.push('\n');
    }
}

impl TableView for TextView {
    fn render(&mut self, model: &ViewModel) {
        if model.indicator == LoadingIndicator::Blocking {
            self.line("Loading...");
            return;
        }

        if let Some(search) = &model.search {
            self.line(format!("Search: {}", search));
        }
        let active: Vec<String> = model
            .filters
            .iter()
            .filter_map(|f| f.value.as_ref().map(|value| format!("{}={}", f.name, value)))
            .collect();
        if !active.is_empty() {
            self.line(format!("Filters: {}", active.join(" ")));
        }

        let titles: Vec<String> = model
            .header
            .iter()
            .map(|cell| match cell.sort {
                Some(Direction::Asc) => format!("{} ^", cell.title),
                Some(Direction::Desc) => format!("{} v", cell.title),
                None => cell.title.clone(),
            })
            .collect();
        let ids: Vec<String> = model.rows.iter().map(row_label).collect();
        let id_width = ids.iter().map(|id| id.width()).max().unwrap_or(0);
        let widths = column_widths(&titles, &model.rows);

        let header = join_cells(&titles, &widths);
        self.line(format!("{}{}{}", pad("", id_width), SEPARATOR, header));
        let rule_width = id_width + SEPARATOR.len() + header.width();
        self.line("-".repeat(rule_width));

        if model.rows.is_empty() && model.error.is_none() {
            self.line("No records");
        }
        for (row, id) in model.rows.iter().zip(&ids) {
            let mut text = format!("{}{}{}", pad(id, id_width), SEPARATOR, join_cells(&row.cells, &widths));
            if !row.actions.is_empty() {
                let actions: Vec<&str> = row.actions.iter().map(|action| action.label()).collect();
                text.push_str(&format!("  [{}]", actions.join(", ")));
            }
            self.line(text);
        }

        if let Some(pagination) = &model.pagination {
            let mut footer = format!(
                "Page {} of {} ({}-{} of {})",
                pagination.page, pagination.page_count, pagination.first, pagination.last, pagination.total
            );
            if model.selected_count > 0 {
                footer.push_str(&format!(", {} selected", model.selected_count));
            }
            if model.indicator == LoadingIndicator::Overlay {
                footer.push_str(", refreshing");
            }
            self.line(footer);
        }

        if !model.actions.is_empty() {
            let actions: Vec<String> = model.actions.iter().map(|action| format!("{:?}", action)).collect();
            self.line(format!("Actions: {}", actions.join(", ")));
        }

        if let Some(error) = &model.error {
            self.line(format!("Error ({}): {}. Type `refresh` to retry.", error.kind, error.message));
        }
    }
}

fn row_label(row: &RowView) -> String {
    let mark = if row.selected { "*" } else { " " };
    format!("{}{}", mark, row.id)
}

fn column_widths(titles: &[String], rows: &[RowView]) -> Vec<usize> {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            rows.iter()
                .filter_map(|row| row.cells.get(i))
                .map(|cell| cell.width())
                .chain(std::iter::once(title.width()))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect()
}

fn join_cells(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(&truncate(cell, *width), *width))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Pads to a display width.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

/// Cuts text to a display width, marking the cut with `~`.
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('~');
    out
}

#[cfg(test)]
mod tests {
    use datatable_lib::error::FetchErrorKind;
    use datatable_lib::model::RecordId;
    use datatable_lib::view::ErrorPanel;
    use datatable_lib::view::HeaderCell;
    use datatable_lib::view::PaginationControls;
    use datatable_lib::view::RowActionKind;
    use datatable_lib::view::TableIntent;

    use super::*;

    fn model() -> ViewModel {
        ViewModel {
            indicator: LoadingIndicator::None,
            header: vec![
                HeaderCell {
                    accessor: "name".into(),
                    title: "Name".into(),
                    sortable: true,
                    sort: Some(Direction::Desc),
                },
                HeaderCell {
                    accessor: "structural".into(),
                    title: "Structural".into(),
                    sortable: false,
                    sort: None,
                },
            ],
            filters: Vec::new(),
            search: None,
            actions: Vec::new(),
            rows: vec![
                RowView {
                    id: RecordId::from(4),
                    cells: vec!["Resistors".into(), "Yes".into()],
                    selected: true,
                    actions: vec![RowActionKind::Edit],
                },
                RowView {
                    id: RecordId::from(12),
                    cells: vec!["Capacitors".into(), "No".into()],
                    selected: false,
                    actions: vec![RowActionKind::Edit],
                },
            ],
            selected_count: 1,
            pagination: Some(PaginationControls {
                page: 1,
                page_size: 25,
                page_count: 1,
                total: 2,
                first: 1,
                last: 2,
                has_previous: false,
                has_next: false,
            }),
            error: None,
        }
    }

    fn render(model: &ViewModel) -> Vec<String> {
        let mut view = TextView::new();
        view.render(model);
        view.take().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_render_table() {
        let lines = render(&model());
        assert_eq!(lines[0], "    | Name v     | Structural");
        assert_eq!(lines[1], "-".repeat(29));
        assert_eq!(lines[2], "*4  | Resistors  | Yes         [Edit]");
        assert_eq!(lines[3], " 12 | Capacitors | No          [Edit]");
        assert_eq!(lines[4], "Page 1 of 1 (1-2 of 2), 1 selected");
    }

    #[test]
    fn test_render_loading_and_error() {
        let mut loading = model();
        loading.indicator = LoadingIndicator::Blocking;
        assert_eq!(render(&loading), vec!["Loading..."]);

        let mut failed = model();
        failed.rows.clear();
        failed.pagination = None;
        failed.error = Some(ErrorPanel {
            kind: FetchErrorKind::ServerError,
            message: "HTTP 500: boom".into(),
            retry: TableIntent::Refresh,
        });
        let lines = render(&failed);
        assert_eq!(
            lines.last().unwrap(),
            &format!("Error ({}): HTTP 500: boom. Type `refresh` to retry.", FetchErrorKind::ServerError)
        );
    }

    #[test]
    fn test_truncate_by_width() {
        assert_eq!(truncate("Capacitors", 20), "Capacitors");
        assert_eq!(truncate("Capacitors", 5), "Capa~");
        assert_eq!(pad("ab", 4), "ab  ");
    }
}
