//! IMDb title search fetcher.
//! Search page: https://www.imdb.com/search/title/?genres=crime&start=51
//! One GET per (genre, offset); nothing is retried.

use crate::ScrapeError;
use reqwest::{Client, StatusCode, header};
use tracing::debug;

const SEARCH_URL: &str = "https://www.imdb.com/search/title/";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// Titles per search page.
pub const PAGE_SIZE: u32 = 50;

/// Where search pages come from.
#[async_trait::async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the raw HTML of one search page.
    async fn fetch_page(&self, genre: &str, offset: Option<u32>) -> Result<String, ScrapeError>;
}

/// Build the search URL for a genre. `None` is the first page; an offset of
/// `1` means "the second page" and is sent as `start=51`.
pub fn search_url(genre: &str, offset: Option<u32>) -> String {
    match offset {
        None => format!("{SEARCH_URL}?genres={genre}&explore=title_type,genres&ref_=adv_prv"),
        Some(start) => {
            let start = if start == 1 { PAGE_SIZE + 1 } else { start };
            format!(
                "{SEARCH_URL}?genres={genre}&start={start}&explore=title_type,genres&ref_=adv_nxt"
            )
        }
    }
}

/// HTTP client with the cookie jar IMDb expects between page loads.
pub fn build_client() -> Result<Client, ScrapeError> {
    Ok(Client::builder().cookie_store(true).build()?)
}

/// Live source backed by imdb.com.
pub struct ImdbSearch {
    client: Client,
}

impl ImdbSearch {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ListingSource for ImdbSearch {
    async fn fetch_page(&self, genre: &str, offset: Option<u32>) -> Result<String, ScrapeError> {
        let url = search_url(genre, offset);
        debug!(%url, "fetching search page");

        let resp = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT_LANGUAGE, "en-US")
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(ScrapeError::Fetch {
                url,
                status: resp.status().as_u16(),
            });
        }

        Ok(resp.text().await?)
    }
}
