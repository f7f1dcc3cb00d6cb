use crate::config::{MONGODB_URI_ENV, ScrapeConfig, mongodb_uri};
use crate::{Listing, ScrapeError};
use mongodb::bson::doc;
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::IndexOptions;
use mongodb::{Client, IndexModel};
use tracing::{error, info, warn};

/// Outcome of one bulk insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertReport {
    pub attempted: usize,
    pub inserted: usize,
    /// Documents the store refused, duplicate `uid`s in practice.
    pub rejected: usize,
}

impl InsertReport {
    /// Report for an unordered insert where `rejected` documents came back
    /// as write errors; everything else in the batch was stored.
    pub fn partial(attempted: usize, rejected: usize) -> Self {
        let rejected = rejected.min(attempted);
        Self {
            attempted,
            inserted: attempted - rejected,
            rejected,
        }
    }
}

/// Where cleaned listings are persisted.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert every listing, skipping those whose `uid` is already stored.
    /// Conflicts are logged and counted, never returned as errors.
    async fn insert_listings(&self, listings: &[Listing]) -> Result<InsertReport, ScrapeError>;
}

/// MongoDB collection with a unique ascending index on `uid`.
pub struct MongoStore {
    uri: String,
    database: String,
    collection: String,
}

impl MongoStore {
    pub fn new(uri: String, database: String, collection: String) -> Self {
        Self {
            uri,
            database,
            collection,
        }
    }

    /// Uses `MONGODB_URI` for the connection; load `.env` first.
    pub fn from_config(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        Ok(Self::new(
            mongodb_uri(std::env::var(MONGODB_URI_ENV).ok())?,
            config.database.clone(),
            config.collection.clone(),
        ))
    }

    async fn insert_with(
        &self,
        client: &Client,
        listings: &[Listing],
    ) -> Result<InsertReport, ScrapeError> {
        let movies = client
            .database(&self.database)
            .collection::<Listing>(&self.collection);

        let index = IndexModel::builder()
            .keys(doc! { "uid": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        movies.create_index(index).await?;

        if listings.is_empty() {
            info!("no movies to insert");
            return Ok(InsertReport::default());
        }

        match movies.insert_many(listings).ordered(false).await {
            Ok(result) => Ok(InsertReport {
                attempted: listings.len(),
                inserted: result.inserted_ids.len(),
                rejected: 0,
            }),
            Err(e) => match partial_insert(listings.len(), &e) {
                Some(report) => Ok(report),
                None => Err(e.into()),
            },
        }
    }
}

/// Turn an unordered insert failure into a report, logging each refused
/// document. Anything other than an insert-many failure is `None`. A failure
/// carrying only a write concern error counts the whole batch as inserted.
fn partial_insert(attempted: usize, e: &MongoError) -> Option<InsertReport> {
    let ErrorKind::InsertMany(failure) = e.kind.as_ref() else {
        return None;
    };

    let write_errors = failure.write_errors.as_deref().unwrap_or_default();
    for we in write_errors {
        error!(index = we.index, code = we.code, "{}", we.message);
    }
    if let Some(wce) = &failure.write_concern_error {
        warn!(code = wce.code, "write concern: {}", wce.message);
    }

    Some(InsertReport::partial(attempted, write_errors.len()))
}

#[async_trait::async_trait]
impl DocumentStore for MongoStore {
    async fn insert_listings(&self, listings: &[Listing]) -> Result<InsertReport, ScrapeError> {
        info!(
            database = %self.database,
            collection = %self.collection,
            "saving data to database..."
        );

        let client = Client::with_uri_str(&self.uri).await?;
        let result = self.insert_with(&client, listings).await;
        client.shutdown().await;

        if let Ok(report) = &result {
            info!("{} movies inserted", report.inserted);
        }
        result
    }
}
