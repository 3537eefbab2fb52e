//! Extract stage: catalog page to document store.
//!
//! Fetches one page, then inserts every listing as its own document. There
//! is no batching or rollback: if an insert fails, the listings inserted
//! before it stay in the store and the stage aborts.

use std::sync::Arc;

use book_pipeline_scraper::{Scraper, scrape_all};
use book_pipeline_store::DocumentStore;

use crate::PipelineError;
use crate::progress::ProgressCallback;

/// Number of catalog pages fetched per run.
pub const PAGES_PER_RUN: u32 = 1;

/// Scrapes the catalog and stores each listing, returning how many were
/// stored.
///
/// Running this twice against the same page stores every listing twice.
///
/// # Errors
///
/// Returns [`PipelineError::Scrape`] if the page cannot be fetched or
/// parsed (nothing is stored), or [`PipelineError::Store`] on the first
/// failed insert.
pub async fn run(
    scraper: &(impl Scraper + ?Sized),
    store: &dyn DocumentStore,
    progress: Arc<dyn ProgressCallback>,
) -> Result<u64, PipelineError> {
    progress.set_message(format!("Scraping catalog ({})", scraper.strategy()));
    let listings = scrape_all(scraper, Some(PAGES_PER_RUN)).await?;
    log::info!(
        "Scraped {} listing(s) via {}, storing into {}",
        listings.len(),
        scraper.strategy(),
        store.name()
    );

    progress.set_total(listings.len() as u64);
    progress.set_message(format!("Storing into {}", store.name()));

    let mut stored: u64 = 0;
    for listing in &listings {
        let id = store.insert_listing(listing).await?;
        log::debug!("Stored {:?} as {id}", listing.title);
        stored += 1;
        progress.inc(1);
    }

    progress.finish(format!("{stored} listing(s) stored"));
    Ok(stored)
}

#[cfg(test)]
pub(crate) mod tests {
    use book_pipeline_scraper::catalog::CatalogScraper;
    use book_pipeline_scraper::{ScrapeError, ScrapedPage};
    use book_pipeline_store::memory::MemoryDocumentStore;

    use super::*;
    use crate::progress::null_progress;

    pub const BASE_URL: &str = "http://books.toscrape.com/";

    /// Two-listing catalog page.
    pub const FIXTURE_PAGE: &str = r#"<html><body><ol class="row">
<li><article class="product_pod">
  <div class="image_container"><a href="a/index.html"><img src="../media/cache/a.jpg" alt="A"></a></div>
  <p class="star-rating Two"><i class="icon-star"></i></p>
  <h3><a href="a/index.html" title="A">A</a></h3>
  <div class="product_price">
    <p class="price_color">£10.00</p>
    <p class="instock availability"><i class="icon-ok"></i>
        In stock
    </p>
  </div>
</article></li>
<li><article class="product_pod">
  <div class="image_container"><a href="b/index.html"><img src="../media/cache/b.jpg" alt="B"></a></div>
  <p class="star-rating Five"><i class="icon-star"></i></p>
  <h3><a href="b/index.html" title="B">B</a></h3>
  <div class="product_price">
    <p class="price_color">£20.50</p>
    <p class="instock availability"><i class="icon-ok"></i>
        In stock
    </p>
  </div>
</article></li>
</ol></body></html>"#;

    /// Serves a fixed HTML body instead of fetching over HTTP.
    pub struct FixtureScraper {
        catalog: CatalogScraper,
        html: String,
    }

    impl FixtureScraper {
        pub fn new(html: &str) -> Self {
            Self {
                catalog: CatalogScraper::new(&format!("{BASE_URL}catalogue/page-1.html"), BASE_URL),
                html: html.to_string(),
            }
        }
    }

    impl Scraper for FixtureScraper {
        async fn fetch_page(&self, _page: u32) -> Result<ScrapedPage, ScrapeError> {
            Ok(ScrapedPage {
                listings: self.catalog.parse(&self.html)?,
                has_more: false,
            })
        }

        fn strategy(&self) -> &'static str {
            "fixture"
        }
    }

    #[tokio::test]
    async fn stores_one_document_per_listing() {
        let store = MemoryDocumentStore::new();

        let stored = run(&FixtureScraper::new(FIXTURE_PAGE), &store, null_progress())
            .await
            .unwrap();

        assert_eq!(stored, 2);
        let docs = store.scan(None).await.unwrap();
        assert_eq!(docs[0].title.as_deref(), Some("A"));
        assert_eq!(docs[0].price.as_deref(), Some("£10.00"));
        assert_eq!(docs[0].stock.as_deref(), Some("In stock"));
        assert_eq!(docs[0].rating.as_deref(), Some("Two"));
        assert_eq!(
            docs[0].image_url.as_deref(),
            Some("http://books.toscrape.com/media/cache/a.jpg")
        );
        assert_eq!(docs[1].title.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn rerunning_duplicates_every_listing() {
        let store = MemoryDocumentStore::new();
        let scraper = FixtureScraper::new(FIXTURE_PAGE);

        run(&scraper, &store, null_progress()).await.unwrap();
        run(&scraper, &store, null_progress()).await.unwrap();

        let docs = store.scan(None).await.unwrap();
        assert_eq!(docs.len(), 4);
        let titles: Vec<&str> = docs.iter().filter_map(|d| d.title.as_deref()).collect();
        assert_eq!(titles, ["A", "B", "A", "B"]);
    }

    #[tokio::test]
    async fn malformed_page_stores_nothing() {
        let store = MemoryDocumentStore::new();
        let broken = FIXTURE_PAGE.replace(r#" title="B""#, "");

        let err = run(&FixtureScraper::new(&broken), &store, null_progress())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Scrape(_)));
        assert!(store.is_empty());
    }
}
