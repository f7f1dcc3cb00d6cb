use serde::{Deserialize, Serialize};

pub mod clean;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod sink;
pub mod store;
pub mod table;

pub use config::ScrapeConfig;
pub use error::ScrapeError;
pub use fetch::{ImdbSearch, ListingSource};
pub use store::{DocumentStore, InsertReport, MongoStore};

/// Certificate given to listings that carry neither a rating nor a production status.
pub const NOT_CERTIFIED: &str = "not certified";

/// One listing as read off a search page, before type coercion.
/// Numeric fields stay textual until [`clean::coerce`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawListing {
    pub uid: String,
    pub rank: String,
    pub name: String,
    pub year: String,
    pub certificate: String,
    pub runtime: String,
    pub genre: Vec<String>,
    pub rating: String,
    pub director: String,
    pub stars: Vec<String>,
    pub num_votes: String,
}

/// A scraped movie record, as written to the JSON file and the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub uid: String,
    pub rank: u32,
    pub name: String,
    pub year: u32,
    pub certificate: String,
    pub runtime: u32, // in minutes
    pub genre: Vec<String>,
    pub rating: f64,
    pub director: String,
    pub stars: Vec<String>,
    pub num_votes: u64,
}
