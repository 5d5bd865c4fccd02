//! Pagination types and traits
//!
//! A [`Paginator`] decides what to send and reads what came back; the
//! [`PaginationState`] is the single record of where the fetch stands.

use crate::types::StringMap;
use reqwest::header::HeaderMap;
use std::collections::HashSet;

/// What a page's response says about the rest of the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More records follow; send this token with the next request
    Continue {
        /// Opaque continuation token, echoed unmodified
        token: String,
    },
    /// The collection is exhausted
    Done,
}

/// Progress of one collection fetch
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages fetched so far
    pub pages: u32,
    /// Continuation token to send with the next request
    pub token: Option<String>,
    sent: HashSet<String>,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt `token` for the next request
    ///
    /// Returns `false`, leaving the state untouched, if the token was
    /// already handed out earlier in this fetch.
    pub fn follow(&mut self, token: &str) -> bool {
        if !self.sent.insert(token.to_string()) {
            return false;
        }
        self.token = Some(token.to_string());
        true
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Query parameters for a page request carrying `token`, if any
    fn request_params(&self, token: Option<&str>) -> StringMap;

    /// Read the response headers of a page
    fn next_page(&self, headers: &HeaderMap) -> NextPage;
}
