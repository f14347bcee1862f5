//! List endpoint parameter encoding.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use super::Direction;
use super::QueryState;

/// How pagination is expressed in list requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum Pagination {
    /// `?page=<n>&pageSize=<size>`
    PageNumber {
        /// Page number parameter.
        #[serde(default = "default_page_param")]
        page: String,
        /// Page size parameter.
        #[serde(default = "default_page_size_param")]
        page_size: String,
    },
    /// `?limit=<size>&offset=<index of first record>`
    LimitOffset {
        /// Limit parameter.
        #[serde(default = "default_limit_param")]
        limit: String,
        /// Offset parameter.
        #[serde(default = "default_offset_param")]
        offset: String,
    },
}

impl Default for Pagination {
    fn default() -> Self {
        Self::PageNumber {
            page: default_page_param(),
            page_size: default_page_size_param(),
        }
    }
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_page_size_param() -> String {
    "pageSize".to_string()
}

fn default_limit_param() -> String {
    "limit".to_string()
}

fn default_offset_param() -> String {
    "offset".to_string()
}

/// How the sort is expressed in list requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortStyle {
    /// `?sort=name` / `?sort=-name`
    #[default]
    DashPrefix,
    /// `?sort=name&direction=desc`
    Directional,
}

/// Encodes a [`QueryState`] into list endpoint query parameters.
///
/// Parameters are emitted in a stable order: fixed parameters and filters
/// sorted by name, then sort, search and pagination.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use datatable_lib::query::{Direction, QueryEncoding, QueryState};
///
/// let mut state = QueryState::new(25);
/// state.set_sort("name", Direction::Desc);
///
/// let pairs = QueryEncoding::default().pairs(&state, &BTreeMap::new());
/// assert_eq!(pairs, vec![
///     ("sort".to_string(), "-name".to_string()),
///     ("page".to_string(), "1".to_string()),
///     ("pageSize".to_string(), "25".to_string()),
/// ]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryEncoding {
    /// Pagination parameters.
    pub pagination: Pagination,
    /// Sort parameter name.
    pub sort_param: String,
    /// Sort encoding style.
    pub sort_style: SortStyle,
    /// Direction parameter name, used with [`SortStyle::Directional`].
    pub direction_param: String,
    /// Search parameter name.
    pub search_param: String,
}

impl Default for QueryEncoding {
    fn default() -> Self {
        Self {
            pagination: Pagination::default(),
            sort_param: "sort".to_string(),
            sort_style: SortStyle::DashPrefix,
            direction_param: "direction".to_string(),
            search_param: "search".to_string(),
        }
    }
}

impl QueryEncoding {
    /// Encoding used by Django REST framework style APIs:
    /// `limit`/`offset` pagination and `ordering=-field`.
    pub fn django() -> Self {
        Self {
            pagination: Pagination::LimitOffset {
                limit: default_limit_param(),
                offset: default_offset_param(),
            },
            sort_param: "ordering".to_string(),
            ..Self::default()
        }
    }

    /// Returns the full parameter list for a paginated request.
    pub fn pairs(&self, state: &QueryState, base: &BTreeMap<String, String>) -> Vec<(String, String)> {
        let mut pairs = self.unpaged_pairs(state, base);
        match &self.pagination {
            Pagination::PageNumber { page, page_size } => {
                pairs.push((page.clone(), state.page().to_string()));
                pairs.push((page_size.clone(), state.page_size().to_string()));
            }
            Pagination::LimitOffset { limit, offset } => {
                pairs.push((limit.clone(), state.page_size().to_string()));
                pairs.push((offset.clone(), state.offset().to_string()));
            }
        }
        pairs
    }

    /// Returns the parameters selecting the full result set, without
    /// pagination.
    ///
    /// Filters override fixed parameters with the same name.
    pub fn unpaged_pairs(&self, state: &QueryState, base: &BTreeMap<String, String>) -> Vec<(String, String)> {
        let mut params = base.clone();
        for (name, value) in state.filters() {
            params.insert(name.clone(), value.to_string());
        }
        let mut pairs: Vec<_> = params.into_iter().collect();

        if let Some(sort) = state.sort() {
            match self.sort_style {
                SortStyle::DashPrefix => {
                    let value = match sort.direction {
                        Direction::Asc => sort.key.clone(),
                        Direction::Desc => format!("-{}", sort.key),
                    };
                    pairs.push((self.sort_param.clone(), value));
                }
                SortStyle::Directional => {
                    pairs.push((self.sort_param.clone(), sort.key.clone()));
                    pairs.push((
                        self.direction_param.clone(),
                        sort.direction.as_str().to_string(),
                    ));
                }
            }
        }

        if let Some(term) = state.search() {
            pairs.push((self.search_param.clone(), term.to_string()));
        }

        pairs
    }
}
