//! Paginated collection fetcher
//!
//! Drives a [`Paginator`] against an [`HttpClient`]: issue a GET with the
//! fixed parameters plus the paginator's parameters, append the page's
//! records, and repeat until the paginator reports [`NextPage::Done`].

use super::types::{NextPage, PaginationState, Paginator};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::StringMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Field holding the page's records in a collection response
pub const RECORDS_FIELD: &str = "items";

/// Fetches every record of a paginated collection
pub struct PaginatedFetcher<'a> {
    client: &'a HttpClient,
    paginator: &'a dyn Paginator,
    max_pages: Option<u32>,
}

impl<'a> PaginatedFetcher<'a> {
    pub fn new(client: &'a HttpClient, paginator: &'a dyn Paginator) -> Self {
        Self {
            client,
            paginator,
            max_pages: None,
        }
    }

    /// Fail instead of fetching more than `max` pages
    #[must_use]
    pub fn max_pages(mut self, max: u32) -> Self {
        self.max_pages = Some(max);
        self
    }

    /// Fetch all records across all pages, in server order
    ///
    /// Any failed page request fails the whole fetch, as does a continuation
    /// token the server already handed out (the chain would never end).
    pub async fn fetch_all(&self, path: &str, params: &StringMap) -> Result<Vec<Value>> {
        let mut records = Vec::new();
        let mut state = PaginationState::new();

        loop {
            if let Some(max) = self.max_pages {
                if state.pages >= max {
                    return Err(Error::pagination(
                        path,
                        format!("more than {max} pages returned"),
                    ));
                }
            }

            let mut req_config = RequestConfig::new();
            for (key, value) in params {
                req_config = req_config.query(key, value);
            }
            for (key, value) in self.paginator.request_params(state.token.as_deref()) {
                req_config = req_config.query(key, value);
            }

            let response = self.client.get_with_config(path, req_config).await?;
            let next = self.paginator.next_page(response.headers());
            let body_text = response.text().await?;

            let mut body = if body_text.trim().is_empty() {
                Value::Object(serde_json::Map::new())
            } else {
                serde_json::from_str(&body_text)?
            };

            let page = take_records(&mut body, RECORDS_FIELD)
                .map_err(|message| Error::pagination(path, message))?;
            let record_count = page.len();
            records.extend(page);
            state.pages += 1;

            match next {
                NextPage::Done => break,
                NextPage::Continue { token } => {
                    if !state.follow(&token) {
                        return Err(Error::pagination(
                            path,
                            format!("continuation token '{token}' was already used"),
                        ));
                    }
                    debug!(
                        "Page {} of {path}: {record_count} records, more pending",
                        state.pages
                    );
                }
            }
        }

        debug!(
            "Fetched {} records from {path} in {} pages",
            records.len(),
            state.pages
        );
        Ok(records)
    }

    /// Fetch all records and deserialize each into `T`
    pub async fn fetch_all_as<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &StringMap,
    ) -> Result<Vec<T>> {
        self.fetch_all(path, params)
            .await?
            .into_iter()
            .map(|record| {
                serde_json::from_value(record).map_err(|e| {
                    Error::pagination(path, format!("unexpected record shape: {e}"))
                })
            })
            .collect()
    }
}

/// Remove the records array from a page body
///
/// An absent or null field is an empty page. A non-object body or a
/// non-array field is an error.
fn take_records(body: &mut Value, field: &str) -> std::result::Result<Vec<Value>, String> {
    let Value::Object(map) = body else {
        return Err("response body is not a JSON object".to_string());
    };

    match map.remove(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(format!("'{field}' is not an array")),
    }
}
