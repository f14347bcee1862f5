//! List source trait and wire types.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::Error;
use crate::error::FetchError;
use crate::model::Record;
use crate::query::QueryState;

/// A fully resolved list request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    /// Endpoint path.
    pub endpoint: String,
    /// Encoded query parameters.
    pub params: Vec<(String, String)>,
    /// Field holding each record's id.
    pub id_field: String,
    /// The query state the parameters were encoded from.
    pub query: QueryState,
}

/// Decoded list response: one page of records and the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResponse {
    /// Records on this page.
    pub results: Vec<Record>,
    /// Total number of records matching the query.
    pub count: u64,
}

impl ListResponse {
    /// Creates a response.
    pub fn new(results: Vec<Record>, count: u64) -> Self {
        Self { results, count }
    }

    /// Decodes a response body.
    ///
    /// Accepts `{"results": [...], "count": n}`, or a bare array for
    /// unpaginated endpoints (the count is then the array length).
    pub fn from_json(body: &str, id_field: &str) -> Result<Self, FetchError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| FetchError::decode_with_body(e.to_string(), body))?;
        Self::from_value(value, id_field).map_err(|e| e.with_body(body))
    }

    /// Decodes an already parsed response.
    pub fn from_value(value: Value, id_field: &str) -> Result<Self, FetchError> {
        match value {
            Value::Array(items) => {
                let results = decode_records(items, id_field)?;
                let count = results.len() as u64;
                Ok(Self { results, count })
            }
            Value::Object(mut map) => {
                let results = match map.remove("results") {
                    Some(Value::Array(items)) => decode_records(items, id_field)?,
                    Some(_) => return Err(FetchError::decode("`results` is not an array")),
                    None => return Err(FetchError::decode("response has no `results` field")),
                };
                let count = match map.get("count") {
                    Some(count) => count.as_u64().ok_or_else(|| {
                        FetchError::decode("`count` is not a non-negative integer")
                    })?,
                    None => results.len() as u64,
                };
                Ok(Self { results, count })
            }
            _ => Err(FetchError::decode("expected a JSON object or array")),
        }
    }
}

fn decode_records(items: Vec<Value>, id_field: &str) -> Result<Vec<Record>, FetchError> {
    items
        .into_iter()
        .map(|item| Record::from_json(item, id_field))
        .collect()
}

/// A paginated list endpoint.
///
/// Implementations perform one request per call and never retry; retry
/// policy belongs to the caller.
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    /// Fetches one page of records.
    async fn fetch_list(&self, request: &ListRequest) -> Result<ListResponse, FetchError>;

    /// Returns the absolute URL for an endpoint and parameters.
    ///
    /// Sources that are not URL addressable return [`Error::Unsupported`].
    fn list_url(&self, _endpoint: &str, _params: &[(String, String)]) -> Result<Url, Error> {
        Err(Error::Unsupported("list source has no URL"))
    }
}

#[async_trait]
impl<T: ListSource + ?Sized> ListSource for Arc<T> {
    async fn fetch_list(&self, request: &ListRequest) -> Result<ListResponse, FetchError> {
        (**self).fetch_list(request).await
    }

    fn list_url(&self, endpoint: &str, params: &[(String, String)]) -> Result<Url, Error> {
        (**self).list_url(endpoint, params)
    }
}
