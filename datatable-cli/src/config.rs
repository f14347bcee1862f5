//! TOML configuration file.
//!
//! ```toml
//! url = "https://inventory.example.com/api"
//! token = "..."
//!
//! [table]
//! endpoint = "part/category/"
//! id_field = "pk"
//!
//! [table.params]
//! parent = "null"
//!
//! [capabilities]
//! can_edit = true
//!
//! [[columns]]
//! accessor = "name"
//! sortable = true
//! switchable = false
//!
//! [[filters]]
//! name = "cascade"
//! label = "Include Subcategories"
//! kind = "boolean"
//! ```

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use datatable_lib::ListClient;
use datatable_lib::TableConfig;
use datatable_lib::view::Capabilities;
use datatable_lib::view::Column;
use datatable_lib::view::FilterDef;
use datatable_lib::view::TableLayout;
use serde::Deserialize;

use crate::args::Cli;
use crate::paths;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("No base URL: pass --url or set `url` in the config file")]
    MissingUrl,

    #[error("No columns: pass --column or add [[columns]] to the config file")]
    MissingColumns,

    #[error(transparent)]
    Table(#[from] datatable_lib::error::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub table: TableConfig,
    pub capabilities: CapabilitiesConfig,
    pub columns: Vec<ColumnConfig>,
    pub filters: Vec<FilterConfig>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct CapabilitiesConfig {
    pub can_add: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnConfig {
    pub accessor: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default = "default_true")]
    pub switchable: bool,
    #[serde(default)]
    pub hidden: bool,
    /// Render booleans as Yes / No.
    #[serde(default)]
    pub yes_no: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: FilterKindConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterKindConfig {
    Boolean,
    Choice { values: Vec<String> },
    Text,
}

fn default_true() -> bool {
    true
}

impl CliConfig {
    /// Loads `path`, or the default config file if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match paths::config_file().filter(|path| path.exists()) {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        log::info!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Applies command-line overrides.
    pub fn overlay(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.url {
            self.url = Some(url.clone());
        }
        if let Some(token) = &cli.token {
            self.token = Some(token.clone());
        }
        if let Some(endpoint) = &cli.endpoint {
            self.table.endpoint = endpoint.clone();
        }
        if let Some(id_field) = &cli.id_field {
            self.table.id_field = id_field.clone();
        }
        if let Some(page_size) = cli.page_size {
            self.table.page_size = page_size;
        }
        if !cli.columns.is_empty() {
            self.columns = cli
                .columns
                .iter()
                .map(|accessor| ColumnConfig {
                    accessor: accessor.clone(),
                    title: None,
                    sortable: true,
                    switchable: true,
                    hidden: false,
                    yes_no: false,
                })
                .collect();
        }
        self
    }

    pub fn client(&self) -> Result<ListClient, ConfigError> {
        let url = self.url.as_deref().ok_or(ConfigError::MissingUrl)?;
        let mut builder = ListClient::builder().url(url);
        if let Some(token) = &self.token {
            builder = builder.bearer_token(token);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(builder.build()?)
    }

    pub fn table(&self) -> Result<TableConfig, ConfigError> {
        self.table.validate()?;
        Ok(self.table.clone())
    }

    pub fn layout(&self) -> Result<TableLayout, ConfigError> {
        if self.columns.is_empty() {
            return Err(ConfigError::MissingColumns);
        }
        let layout = self
            .columns
            .iter()
            .fold(TableLayout::new(), |layout, column| layout.column(column.to_column()));
        Ok(self
            .filters
            .iter()
            .fold(layout, |layout, filter| layout.filter(filter.to_filter())))
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::default()
            .with_add(self.capabilities.can_add)
            .with_edit(self.capabilities.can_edit)
            .with_delete(self.capabilities.can_delete)
    }
}

impl ColumnConfig {
    fn to_column(&self) -> Column {
        let mut column = Column::new(&self.accessor)
            .sortable(self.sortable)
            .switchable(self.switchable)
            .hidden(self.hidden);
        if let Some(title) = &self.title {
            column = column.title(title);
        }
        if self.yes_no {
            column = column.yes_no();
        }
        column
    }
}

impl FilterConfig {
    fn to_filter(&self) -> FilterDef {
        let label = self.label.clone().unwrap_or_else(|| self.name.clone());
        let filter = match &self.kind {
            FilterKindConfig::Boolean => FilterDef::boolean(&self.name, label),
            FilterKindConfig::Choice { values } => FilterDef::choice(&self.name, label, values.clone()),
            FilterKindConfig::Text => FilterDef::text(&self.name, label),
        };
        match &self.description {
            Some(description) => filter.description(description),
            None => filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use datatable_lib::query::Pagination;
    use datatable_lib::view::FilterKind;

    use super::*;

    const CATEGORY_TABLE: &str = r#"
        url = "https://inventory.example.com/api"
        timeout_secs = 30

        [table]
        endpoint = "part/category/"
        id_field = "pk"
        page_size = 50

        [table.params]
        parent = "null"

        [table.encoding]
        sort_param = "ordering"

        [table.encoding.pagination]
        style = "limit_offset"

        [capabilities]
        can_edit = true

        [[columns]]
        accessor = "name"
        sortable = true
        switchable = false

        [[columns]]
        accessor = "structural"
        yes_no = true

        [[filters]]
        name = "cascade"
        label = "Include Subcategories"
        description = "Include subcategories in the results"
        kind = "boolean"

        [[filters]]
        name = "starred"
        kind = "choice"
        values = ["true", "false"]
    "#;

    #[test]
    fn test_parse_category_table() {
        let config: CliConfig = toml::from_str(CATEGORY_TABLE).unwrap();

        assert_eq!(config.table.endpoint, "part/category/");
        assert_eq!(config.table.id_field, "pk");
        assert_eq!(config.table.page_size, 50);
        assert_eq!(config.table.params["parent"], "null");
        assert_eq!(config.table.encoding.sort_param, "ordering");
        assert!(matches!(
            config.table.encoding.pagination,
            Pagination::LimitOffset { ref limit, .. } if limit == "limit"
        ));

        let capabilities = config.capabilities();
        assert!(capabilities.can_edit);
        assert!(!capabilities.can_delete);

        let layout = config.layout().unwrap();
        assert_eq!(layout.columns().len(), 2);
        assert!(layout.columns()[1].switchable);
        assert_eq!(layout.filters()[0].label, "Include Subcategories");
        assert_eq!(layout.filters()[1].label, "starred");
        assert_eq!(
            layout.filters()[1].kind,
            FilterKind::Choice(vec!["true".into(), "false".into()])
        );

        assert!(config.client().is_ok());
    }

    #[test]
    fn test_overlay_flags() {
        let config: CliConfig = toml::from_str(CATEGORY_TABLE).unwrap();
        let cli = Cli::parse_from([
            "datatable",
            "--endpoint",
            "part/",
            "--page-size",
            "10",
            "--column",
            "IPN",
        ]);
        let config = config.overlay(&cli);

        assert_eq!(config.table.endpoint, "part/");
        assert_eq!(config.table.page_size, 10);
        assert_eq!(config.layout().unwrap().columns()[0].title, "IPN");
    }

    #[test]
    fn test_missing_url_and_columns() {
        let config = CliConfig::default();
        assert!(matches!(config.client(), Err(ConfigError::MissingUrl)));
        assert!(matches!(config.layout(), Err(ConfigError::MissingColumns)));
        assert!(config.table().is_err());
    }
}
