//! Table configuration

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::query::DEFAULT_PAGE_SIZE;
use crate::query::QueryEncoding;

/// Per-table list endpoint configuration.
///
/// # Example
///
/// ```
/// use datatable_lib::TableConfig;
/// use datatable_lib::query::QueryEncoding;
///
/// let config = TableConfig::new("part/category/")
///     .with_id_field("pk")
///     .with_encoding(QueryEncoding::django())
///     .with_param("parent", "null");
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// List endpoint path, relative to the client's base URL.
    pub endpoint: String,

    /// Field holding each record's unique id.
    ///
    /// Default: `id`
    pub id_field: String,

    /// Initial number of records per page.
    ///
    /// Default: 25
    pub page_size: u32,

    /// Query parameter encoding.
    pub encoding: QueryEncoding,

    /// Fixed parameters sent with every request.
    pub params: BTreeMap<String, String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            id_field: "id".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            encoding: QueryEncoding::default(),
            params: BTreeMap::new(),
        }
    }
}

impl TableConfig {
    /// Creates a config for an endpoint with default settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Sets the id field.
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Sets the initial page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the query encoding.
    pub fn with_encoding(mut self, encoding: QueryEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Adds a fixed parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Checks that the config can drive a table.
    pub fn validate(&self) -> Result<(), Error> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::Config("endpoint must not be empty".to_string()));
        }
        if self.id_field.trim().is_empty() {
            return Err(Error::Config("id_field must not be empty".to_string()));
        }
        if self.page_size == 0 {
            return Err(Error::Config("page_size must be greater than zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(TableConfig::new("part/category/").validate().is_ok());
        assert!(matches!(
            TableConfig::default().validate(),
            Err(Error::Config(_))
        ));
        assert!(TableConfig::new("x").with_page_size(0).validate().is_err());
        assert!(TableConfig::new("x").with_id_field(" ").validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: TableConfig = serde_json::from_str(
            r#"{"endpoint": "part/category/", "id_field": "pk", "params": {"parent": "null"}}"#,
        )
        .unwrap();

        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.encoding, QueryEncoding::default());
        assert_eq!(config.params.get("parent").map(String::as_str), Some("null"));
    }
}
