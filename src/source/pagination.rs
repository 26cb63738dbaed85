//! Pagination & Fan-Out
//!
//! Determines how many pages exist and fetches all of them concurrently.
//!
//! ## Join Policy
//! Every page request is awaited before anything is decided, so no request is left
//! dangling. Afterwards the `FetchPolicy` decides what a failed page means:
//! - **`AllOrNothing`**: the lowest failed page aborts the run.
//! - **`PartialCollection`**: failed pages are handed back next to the successful ones.

use super::client::ContentSource;
use super::types::{FetchOutcome, FetchRequest, PageFailure, PageProbe};
use crate::config::types::{FetchPolicy, QueryOptions};
use crate::error::{SourceError, SyncError};

use futures::future::join_all;

/// `ceil(total / per_page)`. A zero page size yields zero pages.
///
/// A total whose page count does not fit a page number is rejected as malformed.
pub fn page_count(total: u64, per_page: u32) -> Result<u32, SourceError> {
    if per_page == 0 {
        return Ok(0);
    }
    let pages = total.div_ceil(u64::from(per_page));
    u32::try_from(pages).map_err(|_| SourceError::InvalidTotal(total.to_string()))
}

/// Issues one read with the configured options and derives the page count from its
/// `total` header. Any failure here is fatal to the run.
pub async fn probe_page_count<S>(source: &S, options: &QueryOptions) -> Result<PageProbe, SyncError>
where
    S: ContentSource + ?Sized,
{
    let request = FetchRequest::new(options, options.page);
    let page = source
        .fetch_page(&request)
        .await
        .map_err(SyncError::Probe)?;

    let total = page
        .total
        .ok_or(SyncError::Probe(SourceError::MissingTotal))?;
    let page_count = page_count(total, options.per_page).map_err(SyncError::Probe)?;

    tracing::info!(
        "Content source reports {} entries across {} pages of {}",
        total,
        page_count,
        options.per_page
    );

    Ok(PageProbe { total, page_count })
}

/// Fetches pages `1..=page_count` concurrently and returns them in request order.
pub async fn fetch_all_pages<S>(
    source: &S,
    options: &QueryOptions,
    page_count: u32,
    policy: FetchPolicy,
) -> Result<FetchOutcome, SyncError>
where
    S: ContentSource + ?Sized,
{
    let requests: Vec<FetchRequest> = (1..=page_count)
        .map(|page| FetchRequest::new(options, page))
        .collect();

    if requests.is_empty() {
        return Ok(FetchOutcome::default());
    }

    tracing::debug!("Issuing {} page requests", requests.len());

    let results = join_all(requests.iter().map(|request| source.fetch_page(request))).await;

    let mut outcome = FetchOutcome::default();
    for (request, result) in requests.iter().zip(results) {
        match result {
            Ok(page) => outcome.pages.push(page),
            Err(error) => {
                tracing::error!("Failed to fetch page {}: {}", request.page(), error);
                outcome.failed.push(PageFailure {
                    page: request.page(),
                    error,
                });
            }
        }
    }

    if policy == FetchPolicy::AllOrNothing && !outcome.failed.is_empty() {
        let first = outcome.failed.remove(0);
        return Err(SyncError::PageFetch {
            page: first.page,
            source: first.error,
        });
    }

    Ok(outcome)
}
