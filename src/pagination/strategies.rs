//! Pagination strategy implementations

use super::types::{NextPage, Paginator};
use crate::types::{
    OptionStringExt, StringMap, CONTINUATION_TOKEN_PARAM, LIMIT_PARAM, NEXT_TOKEN_HEADER,
};
use reqwest::header::HeaderMap;

/// Header-driven continuation token pagination
///
/// Every request carries `limit`. The server answers each page with an
/// opaque token in the `x-next-token` header, which is echoed unmodified as
/// `continuation_token` on the next request. A missing or empty header ends
/// the collection.
#[derive(Debug, Clone)]
pub struct ContinuationTokenPaginator {
    /// Page size
    pub limit: u32,
}

impl ContinuationTokenPaginator {
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }
}

impl Paginator for ContinuationTokenPaginator {
    fn request_params(&self, token: Option<&str>) -> StringMap {
        let mut params = StringMap::new();
        params.insert(LIMIT_PARAM.to_string(), self.limit.to_string());
        if let Some(token) = token {
            params.insert(CONTINUATION_TOKEN_PARAM.to_string(), token.to_string());
        }
        params
    }

    fn next_page(&self, headers: &HeaderMap) -> NextPage {
        let token = headers
            .get(NEXT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .none_if_empty();

        match token {
            Some(token) => NextPage::Continue { token },
            None => NextPage::Done,
        }
    }
}
