use std::path::PathBuf;

/// Genres walked by a full run.
pub const DEFAULT_GENRES: &[&str] = &[
    "music",
    "musical",
    "mystery",
    "romance",
    "sci-fi",
    "sport",
    "superhero",
    "thriller",
    "war",
    "western",
];

/// TV parental ratings: titles carrying one of these are series, not movies.
pub const TV_PARENTAL_RATINGS: &[&str] = &["TV-Y", "TV-Y7", "TV-G", "TV-PG", "TV-14", "TV-MA"];

/// Certificates that stand in for "not released yet" or "no rating at all".
pub const MISSING_CERTIFICATES: &[&str] = &[
    "not certified",
    "pre-production",
    "post-production",
    "filming",
    "announced",
    "completed",
];

/// Pages fetched per genre on a full run.
pub const DEFAULT_MAX_PAGES: u32 = 199;

pub const DEFAULT_OUTPUT: &str = "data/raw/movies.json";
pub const DEFAULT_DATABASE: &str = "imdb";
pub const DEFAULT_COLLECTION: &str = "movies";

/// Environment variable holding the MongoDB connection string.
pub const MONGODB_URI_ENV: &str = "MONGODB_URI";

/// Everything a pipeline run needs to know up front.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub genres: Vec<String>,
    pub excluded_certificates: Vec<String>,
    pub max_pages: u32,
    /// May contain `{genre}`; without it every genre overwrites the same file.
    pub output: PathBuf,
    pub write_json: bool,
    pub write_db: bool,
    pub database: String,
    pub collection: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            genres: DEFAULT_GENRES.iter().map(|g| g.to_string()).collect(),
            excluded_certificates: TV_PARENTAL_RATINGS
                .iter()
                .chain(MISSING_CERTIFICATES)
                .map(|c| c.to_string())
                .collect(),
            max_pages: DEFAULT_MAX_PAGES,
            output: PathBuf::from(DEFAULT_OUTPUT),
            write_json: true,
            write_db: true,
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl ScrapeConfig {
    /// The one-page, one-genre smoke run.
    pub fn single_page(genre: &str) -> Self {
        Self {
            genres: vec![genre.to_string()],
            max_pages: 1,
            ..Self::default()
        }
    }

    /// Resolve the JSON output path for a genre.
    pub fn output_for(&self, genre: &str) -> PathBuf {
        let raw = self.output.to_string_lossy();
        if raw.contains("{genre}") {
            PathBuf::from(raw.replace("{genre}", genre))
        } else {
            self.output.clone()
        }
    }
}

/// Validate the MongoDB connection string looked up from `MONGODB_URI`.
pub fn mongodb_uri(lookup: Option<String>) -> Result<String, crate::ScrapeError> {
    match lookup {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(crate::ScrapeError::MissingEnv(MONGODB_URI_ENV)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_excludes_tv_and_missing() {
        let cfg = ScrapeConfig::default();
        assert!(cfg.excluded_certificates.iter().any(|c| c == "TV-MA"));
        assert!(cfg.excluded_certificates.iter().any(|c| c == "not certified"));
        assert!(!cfg.excluded_certificates.iter().any(|c| c == "PG-13"));
        assert_eq!(cfg.genres.len(), DEFAULT_GENRES.len());
    }

    #[test]
    fn output_placeholder() {
        let mut cfg = ScrapeConfig::default();
        assert_eq!(cfg.output_for("war"), PathBuf::from(DEFAULT_OUTPUT));

        cfg.output = PathBuf::from("out/{genre}.json");
        assert_eq!(cfg.output_for("sci-fi"), PathBuf::from("out/sci-fi.json"));
    }

    #[test]
    fn single_page_run() {
        let cfg = ScrapeConfig::single_page("crime");
        assert_eq!(cfg.genres, vec!["crime".to_string()]);
        assert_eq!(cfg.max_pages, 1);
    }

    #[test]
    fn mongodb_uri_must_be_set() {
        assert!(matches!(
            mongodb_uri(None),
            Err(crate::ScrapeError::MissingEnv(MONGODB_URI_ENV))
        ));
        assert!(mongodb_uri(Some("   ".to_string())).is_err());
        assert_eq!(
            mongodb_uri(Some("mongodb://localhost:27017".to_string())).unwrap(),
            "mongodb://localhost:27017"
        );
    }
}
