//! Pagination handling for Zoho list endpoints.
//!
//! List endpoints take `page`/`per_page` query parameters and answer with
//! `{ "<result field>": [...], "page_context": { "has_more_page": bool } }`.
//! The paginator keeps requesting pages while `has_more_page` is exactly
//! `true` and concatenates the records in arrival order.

use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{PaginationError, ValidationError, ZohoResult};
use crate::types::Query;

/// Query parameter carrying the page number.
pub const PAGE_PARAM: &str = "page";

/// Query parameter carrying the page size.
pub const PER_PAGE_PARAM: &str = "per_page";

/// Cursor state of one pagination run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Current page number, starting at 1.
    pub page: u32,
    /// Page size sent with every request.
    pub per_page: u32,
    /// Whether the last response reported more pages.
    pub has_more: bool,
}

impl PageCursor {
    /// Start a run, honoring a `per_page` already present in the query.
    pub fn start(query: &Query, default_page_size: u32) -> Result<Self, ValidationError> {
        let per_page = match query.get(PER_PAGE_PARAM) {
            Some(raw) => raw.trim().parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                ValidationError::InvalidQuery {
                    message: format!("per_page must be a positive integer, got '{}'", raw),
                }
            })?,
            None => default_page_size,
        };

        Ok(Self {
            page: 1,
            per_page,
            has_more: false,
        })
    }

    /// Write the cursor into a query.
    pub fn apply(&self, query: &mut Query) {
        query.insert(PAGE_PARAM.to_string(), self.page.to_string());
        query.insert(PER_PAGE_PARAM.to_string(), self.per_page.to_string());
    }
}

/// Whether a list response reports another page.
///
/// Only a literal `true` continues; a missing `page_context`, a missing
/// flag, or any other value ends the run.
pub fn has_more_page(body: &Value) -> bool {
    body.get("page_context")
        .and_then(|c| c.get("has_more_page"))
        .and_then(Value::as_bool)
        == Some(true)
}

/// Move the records under `result_field` into `records`; returns how many.
fn take_records(body: Value, result_field: &str, records: &mut Vec<Value>) -> usize {
    let Value::Object(mut object) = body else {
        return 0;
    };

    match object.remove(result_field) {
        Some(Value::Array(items)) => {
            let count = items.len();
            records.extend(items);
            count
        }
        Some(other) => {
            warn!(
                result_field,
                kind = json_kind(&other),
                "Result field is not a list; ignoring it"
            );
            0
        }
        None => 0,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Drives repeated dispatches for a list endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    default_page_size: u32,
    max_pages: Option<u32>,
}

impl Paginator {
    /// Create a paginator with the page size used when the query sets none.
    pub fn new(default_page_size: u32) -> Self {
        Self {
            default_page_size,
            max_pages: None,
        }
    }

    /// Cap the number of pages; `None` trusts the server's flag entirely.
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Fetch every page and return the concatenated records.
    ///
    /// The first failing page aborts the run and its error is returned;
    /// records gathered from earlier pages are dropped.
    pub async fn fetch_all<'a, F>(
        &self,
        mut dispatch: F,
        initial_query: Query,
        result_field: &str,
    ) -> ZohoResult<Vec<Value>>
    where
        F: FnMut(Query) -> BoxFuture<'a, ZohoResult<Value>>,
    {
        let mut cursor = PageCursor::start(&initial_query, self.default_page_size)?;
        let mut query = initial_query;
        let mut records = Vec::new();

        loop {
            cursor.apply(&mut query);

            let body = dispatch(query.clone()).await?;
            cursor.has_more = has_more_page(&body);
            let received = take_records(body, result_field, &mut records);

            debug!(
                page = cursor.page,
                per_page = cursor.per_page,
                received,
                has_more = cursor.has_more,
                "Received page"
            );

            if !cursor.has_more {
                break;
            }

            if let Some(max_pages) = self.max_pages {
                if cursor.page >= max_pages {
                    warn!(max_pages, "Page limit reached while more pages remain");
                    return Err(PaginationError::PageLimitExceeded { max_pages }.into());
                }
            }

            cursor.page += 1;
        }

        Ok(records)
    }
}

/// Fetch every page of a list endpoint with no page cap.
pub async fn fetch_all<'a, F>(
    dispatch: F,
    initial_query: Query,
    result_field: &str,
    default_page_size: u32,
) -> ZohoResult<Vec<Value>>
where
    F: FnMut(Query) -> BoxFuture<'a, ZohoResult<Value>>,
{
    Paginator::new(default_page_size)
        .fetch_all(dispatch, initial_query, result_field)
        .await
}
