//! Line commands for the interactive table.

use datatable_lib::model::RecordId;
use datatable_lib::query::FilterValue;
use datatable_lib::view::RowActionKind;
use datatable_lib::view::TableActionKind;
use datatable_lib::view::TableIntent;

pub const HELP: &str = "\
Commands:
  sort KEY              sort by a column, again to reverse
  filter NAME=VALUE     set a filter
  unfilter [NAME]       clear one filter, or all
  search [TERM]         search, empty to clear
  page N | next | prev  move between pages
  size N                records per page
  toggle ID             toggle row selection
  select ID...          replace the selection
  deselect              clear the selection
  open ID               row click
  edit ID | delete ID   row actions
  action NAME ID        custom row action
  add | delete-selected table actions
  column ACCESSOR       show or hide a column
  refresh | reset       reload, or restore the initial query
  download FORMAT       print the export URL
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Intent(TableIntent),
    Download(String),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command `{0}`, type `help` for a list")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Not a positive number: `{0}`")]
    Number(String),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let intent = match (verb, args.as_slice()) {
        ("help" | "?", _) => return Ok(Some(Command::Help)),
        ("quit" | "q" | "exit", _) => return Ok(Some(Command::Quit)),
        ("download", [format]) => return Ok(Some(Command::Download(format.to_string()))),
        ("download", _) => return Err(ParseError::Usage("download FORMAT")),

        ("sort", [key]) => TableIntent::Sort(key.to_string()),
        ("sort", _) => return Err(ParseError::Usage("sort KEY")),
        ("filter", [pair]) => match pair.split_once('=') {
            Some((name, value)) if !name.is_empty() => {
                TableIntent::SetFilter(name.to_string(), FilterValue::parse(value))
            }
            _ => return Err(ParseError::Usage("filter NAME=VALUE")),
        },
        ("filter", _) => return Err(ParseError::Usage("filter NAME=VALUE")),
        ("unfilter", []) => TableIntent::ClearFilters,
        ("unfilter", [name]) => TableIntent::ClearFilter(name.to_string()),
        ("search", terms) => TableIntent::Search(terms.join(" ")),
        ("page", [n]) => TableIntent::Page(number(n)?),
        ("page", _) => return Err(ParseError::Usage("page N")),
        ("next" | "n", []) => TableIntent::NextPage,
        ("prev" | "p", []) => TableIntent::PreviousPage,
        ("size", [n]) => TableIntent::PageSize(number(n)?),
        ("size", _) => return Err(ParseError::Usage("size N")),

        ("toggle", [id]) => TableIntent::ToggleRow(RecordId::from(*id)),
        ("select", ids) if !ids.is_empty() => {
            TableIntent::SelectRows(ids.iter().map(|id| RecordId::from(*id)).collect())
        }
        ("deselect", []) => TableIntent::ClearSelection,
        ("open", [id]) => TableIntent::RowClick(RecordId::from(*id)),
        ("edit", [id]) => TableIntent::RowAction(RowActionKind::Edit, RecordId::from(*id)),
        ("delete", [id]) => TableIntent::RowAction(RowActionKind::Delete, RecordId::from(*id)),
        ("action", [name, id]) => TableIntent::RowAction(
            RowActionKind::Custom(name.to_string()),
            RecordId::from(*id),
        ),
        ("add", []) => TableIntent::TableAction(TableActionKind::Add),
        ("delete-selected", []) => TableIntent::TableAction(TableActionKind::DeleteSelected),
        ("column", [accessor]) => TableIntent::ToggleColumn(accessor.to_string()),

        ("refresh" | "r", []) => TableIntent::Refresh,
        ("reset", []) => TableIntent::Reset,

        (verb, _) => return Err(ParseError::Unknown(verb.to_string())),
    };

    Ok(Some(Command::Intent(intent)))
}

fn number(raw: &str) -> Result<u32, ParseError> {
    raw.parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ParseError::Number(raw.to_string()))
}
