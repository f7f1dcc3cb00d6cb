use crate::extract::extract_page;
use crate::fetch::{ListingSource, PAGE_SIZE};
use crate::{RawListing, ScrapeError};
use tracing::{error, info};

/// Start offsets walked for a genre: 51, 101, ... one per page of the budget.
pub fn page_offsets(max_pages: u32) -> impl Iterator<Item = u32> {
    let end = max_pages.saturating_mul(PAGE_SIZE).saturating_add(2);
    (PAGE_SIZE + 1..end).step_by(PAGE_SIZE as usize)
}

/// Walk a genre's search pages and accumulate every listing found.
///
/// A page that fails to load ends the walk; rows gathered so far are kept.
/// Only extraction errors (bad selectors) propagate.
pub async fn scrape_genre(
    source: &dyn ListingSource,
    genre: &str,
    max_pages: u32,
) -> Result<Vec<RawListing>, ScrapeError> {
    info!(genre, "scraping IMDB movies...");

    let mut table = Vec::new();
    for (page, offset) in page_offsets(max_pages).enumerate() {
        info!(genre, page = page + 1, of = max_pages, offset, "fetching page");

        let html = match source.fetch_page(genre, Some(offset)).await {
            Ok(html) => html,
            Err(e) => {
                error!(genre, offset, error = %e, "page failed, stopping genre");
                break;
            }
        };

        let rows = extract_page(&html)?;
        info!(genre, offset, listings = rows.len(), "page extracted");
        table.extend(rows);
    }

    Ok(table)
}
