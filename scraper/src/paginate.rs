//! Paginated scraping: search pages, then each listing's detail page.

use chrono::Utc;
use common::ListingRecord;
use scraper::Html;
use tracing::{debug, info, warn};

use crate::extract::{finalize, SiteExtractor};
use crate::fetch::{Fetcher, Sleep, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `max_pages` search pages were fetched.
    PageLimit,
    /// The last page had no next link.
    NoNextPage,
    /// A search page could not be fetched; earlier pages are kept.
    FetchFailed,
}

#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub listings: Vec<ListingRecord>,
    pub pages_fetched: usize,
    pub stop: StopReason,
}

/// Walks search pages from `start_url`, at most `max_pages` of them.
///
/// A failed search page ends the walk and the listings gathered so far are
/// returned. A failed detail page only costs that listing its details.
pub fn scrape_listings<E, T, S>(
    fetcher: &Fetcher<T, S>,
    extractor: &E,
    start_url: &str,
    max_pages: usize,
) -> ScrapeOutcome
where
    E: SiteExtractor + ?Sized,
    T: Transport,
    S: Sleep,
{
    let mut listings = Vec::new();
    let mut pages_fetched = 0;
    let mut current = Some(start_url.to_string());

    let stop = loop {
        let Some(url) = current.take() else {
            break StopReason::NoNextPage;
        };
        if pages_fetched >= max_pages {
            break StopReason::PageLimit;
        }

        info!(page = pages_fetched + 1, %url, "scraping search page");
        let body = match fetcher.fetch_page(&url) {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    error = %e,
                    kept = listings.len(),
                    "search page failed, returning partial results"
                );
                break StopReason::FetchFailed;
            }
        };
        pages_fetched += 1;

        let (stubs, next) = {
            let page = Html::parse_document(&body);
            (
                extractor.extract_listing_stubs(&page),
                extractor.next_page_url(&page),
            )
        };
        debug!(stubs = stubs.len(), has_next = next.is_some(), "extracted search page");

        for mut stub in stubs {
            if !stub.url.is_empty() {
                fill_details(fetcher, extractor, &mut stub);
            }
            finalize(&mut stub);
            listings.push(stub);
        }

        current = next;
    };

    info!(
        pages = pages_fetched,
        listings = listings.len(),
        ?stop,
        "scrape finished"
    );
    ScrapeOutcome {
        listings,
        pages_fetched,
        stop,
    }
}

fn fill_details<E, T, S>(fetcher: &Fetcher<T, S>, extractor: &E, stub: &mut ListingRecord)
where
    E: SiteExtractor + ?Sized,
    T: Transport,
    S: Sleep,
{
    match fetcher.fetch_page(&stub.url) {
        Ok(body) => {
            let page = Html::parse_document(&body);
            let mut details = extractor.extract_details(&page, &stub.url);
            details.scraped_date = Utc::now().to_rfc3339();
            stub.merge_details(details);
        }
        Err(e) => {
            warn!(error = %e, url = %stub.url, "detail page failed, keeping listing stub");
        }
    }
}
