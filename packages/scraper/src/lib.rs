#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Web scraping for book catalog pages.
//!
//! Provides the [`Scraper`] trait and the [`catalog`] implementation that
//! fetches a catalog page and extracts one [`RawListing`] per listing
//! block.
//!
//! This crate has no awareness of where listings end up. Callers decide
//! how to store them.

pub mod catalog;

use book_pipeline_listing_models::RawListing;

/// Errors that can occur during scraping operations.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Parsing the response body failed.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A single page of scraped listings.
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    /// The listings extracted from this page, in document order.
    pub listings: Vec<RawListing>,
    /// Whether there are more pages available after this one.
    pub has_more: bool,
}

/// Configuration shared across scraper implementations.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// The page URL to fetch.
    pub url: String,
    /// Site root that relative asset paths are resolved against.
    pub base_url: String,
}

impl ScrapeConfig {
    /// Creates a new `ScrapeConfig` for the given page and site root.
    #[must_use]
    pub fn new(url: &str, base_url: &str) -> Self {
        Self {
            url: url.to_owned(),
            base_url: base_url.to_owned(),
        }
    }
}

/// Trait for fetching book listings from a web source.
pub trait Scraper: Send + Sync {
    /// Fetches a single page of listings.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if the HTTP request or response parsing fails.
    fn fetch_page(
        &self,
        page: u32,
    ) -> impl std::future::Future<Output = Result<ScrapedPage, ScrapeError>> + Send;

    /// Returns the name of the scraping strategy (e.g. `"catalog"`).
    fn strategy(&self) -> &str;
}

/// Fetches pages from a scraper sequentially until it reports no more
/// pages or `max_pages` is reached.
///
/// # Errors
///
/// Returns the first [`ScrapeError`] encountered. Listings from earlier
/// pages are discarded in that case.
pub async fn scrape_all(
    scraper: &(impl Scraper + ?Sized),
    max_pages: Option<u32>,
) -> Result<Vec<RawListing>, ScrapeError> {
    let mut all_listings = Vec::new();
    let mut page: u32 = 0;

    loop {
        if let Some(max) = max_pages
            && page >= max
        {
            log::info!("Reached max pages ({max}), stopping");
            break;
        }

        log::debug!("Fetching page {page} ({})", scraper.strategy());
        let result = scraper.fetch_page(page).await?;
        let has_more = result.has_more;

        all_listings.extend(result.listings);

        if !has_more {
            break;
        }

        page += 1;
    }

    log::info!("Scrape complete: {} total listings", all_listings.len());
    Ok(all_listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serves `pages` pages of one listing each.
    struct PagedScraper {
        pages: u32,
    }

    impl Scraper for PagedScraper {
        async fn fetch_page(&self, page: u32) -> Result<ScrapedPage, ScrapeError> {
            Ok(ScrapedPage {
                listings: vec![RawListing {
                    title: format!("Book {page}"),
                    price: "£1.00".to_string(),
                    stock: "In stock".to_string(),
                    rating: "One".to_string(),
                    image_url: String::new(),
                }],
                has_more: page + 1 < self.pages,
            })
        }

        fn strategy(&self) -> &'static str {
            "paged"
        }
    }

    #[tokio::test]
    async fn scrape_all_follows_has_more() {
        let listings = scrape_all(&PagedScraper { pages: 3 }, None).await.unwrap();
        let titles: Vec<&str> = listings.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, ["Book 0", "Book 1", "Book 2"]);
    }

    #[tokio::test]
    async fn scrape_all_respects_max_pages() {
        let listings = scrape_all(&PagedScraper { pages: 3 }, Some(1))
            .await
            .unwrap();
        assert_eq!(listings.len(), 1);
    }
}
