use crate::ScrapeError;
use crate::clean::clean;
use crate::config::ScrapeConfig;
use crate::fetch::ListingSource;
use crate::sink::write_json_lines;
use crate::store::DocumentStore;
use crate::table::scrape_genre;
use tracing::info;

/// What happened to one genre's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreReport {
    pub genre: String,
    /// Rows read off the pages, duplicates included.
    pub scraped: usize,
    /// Rows left after dedupe and certificate filtering.
    pub kept: usize,
    /// Rows the store accepted; `None` when the store is disabled.
    pub inserted: Option<usize>,
}

/// Scrape, clean and persist every configured genre in turn.
///
/// Each genre is flushed to the sinks before the next one starts. A page
/// failure only cuts that genre short; coercion and store errors end the run.
pub async fn run(
    config: &ScrapeConfig,
    source: &dyn ListingSource,
    store: Option<&dyn DocumentStore>,
) -> Result<Vec<GenreReport>, ScrapeError> {
    info!(
        genres = config.genres.len(),
        max_pages = config.max_pages,
        "getting data from IMDB website."
    );

    let mut reports = Vec::with_capacity(config.genres.len());
    for genre in &config.genres {
        reports.push(run_genre(config, source, store, genre).await?);
    }
    Ok(reports)
}

async fn run_genre(
    config: &ScrapeConfig,
    source: &dyn ListingSource,
    store: Option<&dyn DocumentStore>,
    genre: &str,
) -> Result<GenreReport, ScrapeError> {
    let raw = scrape_genre(source, genre, config.max_pages).await?;
    let scraped = raw.len();
    let listings = clean(raw, &config.excluded_certificates)?;

    if config.write_json {
        write_json_lines(&config.output_for(genre), &listings)?;
    }

    let inserted = match store {
        Some(store) if config.write_db => Some(store.insert_listings(&listings).await?.inserted),
        _ => None,
    };

    info!(genre, scraped, kept = listings.len(), ?inserted, "genre done");
    Ok(GenreReport {
        genre: genre.to_string(),
        scraped,
        kept: listings.len(),
        inserted,
    })
}
