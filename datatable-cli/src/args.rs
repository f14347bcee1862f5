//! Command-line arguments.

use std::path::PathBuf;

use clap::ArgAction;
use clap::Parser;
use datatable_lib::query::Direction;
use datatable_lib::query::FilterValue;
use datatable_lib::query::QueryState;
use simplelog::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "datatable")]
#[command(about = "Browse a paginated REST list endpoint as a table", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML). Defaults to the user config directory.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// API base URL, e.g. https://inventory.example.com/api
    #[arg(long)]
    pub url: Option<String>,

    /// List endpoint path relative to the base URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Bearer token
    #[arg(long)]
    pub token: Option<String>,

    /// Field holding each record's id
    #[arg(long)]
    pub id_field: Option<String>,

    /// Column to show; repeat for several. Replaces configured columns.
    #[arg(long = "column", value_name = "ACCESSOR")]
    pub columns: Vec<String>,

    /// Records per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Initial page
    #[arg(long)]
    pub page: Option<u32>,

    /// Initial sort key; prefix with `-` for descending
    #[arg(long, allow_hyphen_values = true)]
    pub sort: Option<String>,

    /// Initial search term
    #[arg(long)]
    pub search: Option<String>,

    /// Initial filter; repeat for several
    #[arg(long = "filter", value_name = "NAME=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, FilterValue)>,

    /// Print the export URL for the initial query in FORMAT and exit
    #[arg(long, value_name = "FORMAT")]
    pub download: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Builds the starting query from the sort, search, filter and page flags.
    pub fn initial_query(&self, page_size: u32) -> QueryState {
        let mut query = QueryState::new(page_size);
        for (name, value) in &self.filters {
            query.set_filter(name.clone(), value.clone());
        }
        if let Some(sort) = &self.sort {
            let (key, direction) = parse_sort(sort);
            query.set_sort(key, direction);
        }
        if let Some(search) = &self.search {
            query.set_search(search.clone());
        }
        if let Some(page) = self.page {
            query.set_page(page);
        }
        query
    }
}

/// Parses `NAME=VALUE`.
pub fn parse_filter(raw: &str) -> Result<(String, FilterValue), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), FilterValue::parse(value.trim())))
        }
        _ => Err(format!("expected NAME=VALUE, got `{}`", raw)),
    }
}

/// Parses `name` or `-name`.
pub fn parse_sort(raw: &str) -> (&str, Direction) {
    match raw.strip_prefix('-') {
        Some(key) => (key, Direction::Desc),
        None => (raw, Direction::Asc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("cascade=true").unwrap(),
            ("cascade".to_string(), FilterValue::Bool(true))
        );
        assert_eq!(
            parse_filter("parent = 4").unwrap(),
            ("parent".to_string(), FilterValue::Int(4))
        );
        assert!(parse_filter("cascade").is_err());
        assert!(parse_filter("=true").is_err());
    }

    #[test]
    fn test_initial_query() {
        let cli = Cli::parse_from([
            "datatable",
            "--sort",
            "-name",
            "--filter",
            "structural=false",
            "--search",
            "cap",
            "--page",
            "3",
        ]);
        let query = cli.initial_query(10);

        assert_eq!(query.page(), 3);
        assert_eq!(query.page_size(), 10);
        assert_eq!(query.sort().unwrap().key, "name");
        assert_eq!(query.sort().unwrap().direction, Direction::Desc);
        assert_eq!(query.filter("structural"), Some(&FilterValue::Bool(false)));
        assert_eq!(query.search(), Some("cap"));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(Cli::parse_from(["datatable"]).log_level(), LevelFilter::Warn);
        assert_eq!(Cli::parse_from(["datatable", "-vv"]).log_level(), LevelFilter::Debug);
    }
}
