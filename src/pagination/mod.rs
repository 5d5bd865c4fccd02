//! Pagination module
//!
//! Collection endpoints return one page of `items` per request and signal
//! that more remain by sending an opaque token in the `x-next-token`
//! response header. The [`PaginatedFetcher`] follows that token chain until
//! the header is absent, collecting every record in server order.

mod fetcher;
mod strategies;
mod types;

pub use fetcher::{PaginatedFetcher, RECORDS_FIELD};
pub use strategies::ContinuationTokenPaginator;
pub use types::{NextPage, PaginationState, Paginator};
