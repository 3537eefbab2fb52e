//! Catalog page scraper.
//!
//! Fetches a single catalog page, locates every listing block via CSS
//! selector, and extracts a [`RawListing`] from each. The default selectors
//! match the `books.toscrape.com` markup:
//!
//! ```html
//! <article class="product_pod">
//!   <div class="image_container"><a href="..."><img src="../media/cache/x.jpg"></a></div>
//!   <p class="star-rating Three"></p>
//!   <h3><a href="..." title="A Light in the Attic">A Light in the ...</a></h3>
//!   <div class="product_price">
//!     <p class="price_color">£51.77</p>
//!     <p class="instock availability"> In stock </p>
//!   </div>
//! </article>
//! ```

use book_pipeline_listing_models::RawListing;
use scraper::{ElementRef, Html, Selector};

use crate::{ScrapeConfig, ScrapeError, ScrapedPage, Scraper};

/// Scraper that extracts book listings from a catalog page.
///
/// [`CatalogScraper::with_listing_selector`] adapts it to other listing containers.
#[derive(Debug, Clone)]
pub struct CatalogScraper {
    /// Page URL and site root.
    config: ScrapeConfig,
    /// CSS selector for one listing block.
    listing_selector: String,
    /// CSS selector for the anchor carrying the `title` attribute.
    title_selector: String,
    /// CSS selector for the price text.
    price_selector: String,
    /// CSS selector for the availability text.
    stock_selector: String,
    /// CSS selector for the element whose second class is the rating. The
    /// first match in the block is used.
    rating_selector: String,
    /// CSS selector for the cover image.
    image_selector: String,
}

/// Selectors compiled once per parse.
struct CompiledSelectors {
    listing: Selector,
    title: Selector,
    price: Selector,
    stock: Selector,
    rating: Selector,
    image: Selector,
}

impl CatalogScraper {
    /// Creates a new `CatalogScraper` for `url`, resolving image paths
    /// against `base_url`.
    #[must_use]
    pub fn new(url: &str, base_url: &str) -> Self {
        Self {
            config: ScrapeConfig::new(url, base_url),
            listing_selector: "article.product_pod".to_owned(),
            title_selector: "h3 a".to_owned(),
            price_selector: "p.price_color".to_owned(),
            stock_selector: "p.instock.availability".to_owned(),
            rating_selector: "p".to_owned(),
            image_selector: "img".to_owned(),
        }
    }

    /// Overrides the CSS selector used to locate listing blocks.
    #[must_use]
    pub fn with_listing_selector(mut self, selector: &str) -> Self {
        selector.clone_into(&mut self.listing_selector);
        self
    }

    /// Extracts every listing from an already-fetched catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Parse`] if a selector is invalid or a
    /// listing block lacks one of the required elements.
    pub fn parse(&self, html: &str) -> Result<Vec<RawListing>, ScrapeError> {
        let selectors = self.compile()?;
        let document = Html::parse_document(html);

        document
            .select(&selectors.listing)
            .enumerate()
            .map(|(i, block)| self.parse_listing(block, &selectors, i + 1))
            .collect()
    }

    fn parse_listing(
        &self,
        block: ElementRef<'_>,
        selectors: &CompiledSelectors,
        position: usize,
    ) -> Result<RawListing, ScrapeError> {
        let title = required_attr(
            first(block, &selectors.title, &self.title_selector, position)?,
            "title",
            position,
        )?;

        let price = element_text(first(
            block,
            &selectors.price,
            &self.price_selector,
            position,
        )?);

        let stock = element_text(first(
            block,
            &selectors.stock,
            &self.stock_selector,
            position,
        )?)
        .trim()
        .to_owned();

        let rating_el = first(block, &selectors.rating, &self.rating_selector, position)?;
        let rating = required_attr(rating_el, "class", position)?
            .split_whitespace()
            .nth(1)
            .map(str::to_owned)
            .ok_or_else(|| {
                ScrapeError::Parse(format!(
                    "listing {position}: rating element has no second class token"
                ))
            })?;

        let src = required_attr(
            first(block, &selectors.image, &self.image_selector, position)?,
            "src",
            position,
        )?;

        Ok(RawListing {
            title,
            price,
            stock,
            rating,
            image_url: absolute_image_url(&self.config.base_url, &src),
        })
    }

    fn compile(&self) -> Result<CompiledSelectors, ScrapeError> {
        Ok(CompiledSelectors {
            listing: parse_selector(&self.listing_selector)?,
            title: parse_selector(&self.title_selector)?,
            price: parse_selector(&self.price_selector)?,
            stock: parse_selector(&self.stock_selector)?,
            rating: parse_selector(&self.rating_selector)?,
            image: parse_selector(&self.image_selector)?,
        })
    }
}

impl Scraper for CatalogScraper {
    async fn fetch_page(&self, _page: u32) -> Result<ScrapedPage, ScrapeError> {
        let response = reqwest::get(&self.config.url).await?.error_for_status()?;
        let body = response.text().await?;
        log::debug!(
            "Fetched {} ({} bytes)",
            self.config.url,
            body.len()
        );

        let listings = self.parse(&body)?;

        // One catalog page per run; pagination links are not followed.
        Ok(ScrapedPage {
            listings,
            has_more: false,
        })
    }

    fn strategy(&self) -> &'static str {
        "catalog"
    }
}

/// Rewrites a page-relative image path into an absolute URL by dropping
/// every `../` segment and prefixing the site root.
///
/// `absolute_image_url("http://books.toscrape.com/", "../media/x.jpg")`
/// yields `"http://books.toscrape.com/media/x.jpg"`.
#[must_use]
pub fn absolute_image_url(base_url: &str, src: &str) -> String {
    format!("{base_url}{}", src.replace("../", ""))
}

/// Parses a CSS selector string, returning a [`ScrapeError`] on failure.
fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::Parse(format!("invalid CSS selector '{selector}': {e}")))
}

fn first<'a>(
    block: ElementRef<'a>,
    selector: &Selector,
    selector_str: &str,
    position: usize,
) -> Result<ElementRef<'a>, ScrapeError> {
    block.select(selector).next().ok_or_else(|| {
        ScrapeError::Parse(format!(
            "listing {position}: no element matching '{selector_str}'"
        ))
    })
}

fn required_attr(el: ElementRef<'_>, name: &str, position: usize) -> Result<String, ScrapeError> {
    el.value().attr(name).map(str::to_owned).ok_or_else(|| {
        ScrapeError::Parse(format!(
            "listing {position}: <{}> has no '{name}' attribute",
            el.value().name()
        ))
    })
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}
