use clap::{Args, Parser, Subcommand};
use imdb_scrape::config::{DEFAULT_MAX_PAGES, DEFAULT_OUTPUT};
use imdb_scrape::fetch::build_client;
use imdb_scrape::pipeline::{self, GenreReport};
use imdb_scrape::{DocumentStore, ImdbSearch, MongoStore, ScrapeConfig, clean, extract};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "imdb-scrape", about = "Scrape IMDb title search into JSON lines and MongoDB")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk every genre's search pages and persist the movies found
    Run {
        /// Comma-separated genre tokens (default: the built-in list)
        #[arg(short, long, value_delimiter = ',')]
        genres: Vec<String>,
        /// Pages per genre, 50 titles each
        #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: u32,
        #[command(flatten)]
        sinks: SinkArgs,
    },
    /// Scrape a single page of one genre
    Test {
        #[arg(short, long, default_value = "crime")]
        genre: String,
        #[command(flatten)]
        sinks: SinkArgs,
    },
    /// Parse a saved search page and print its listings as JSON lines
    Extract {
        file: PathBuf,
        /// Dedupe, coerce and filter like a real run
        #[arg(long)]
        clean: bool,
    },
}

#[derive(Args)]
struct SinkArgs {
    /// JSON lines output; `{genre}` is replaced by the genre token
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
    /// Skip the JSON file
    #[arg(long)]
    no_json: bool,
    /// Skip MongoDB
    #[arg(long)]
    no_db: bool,
}

impl SinkArgs {
    fn apply(self, config: &mut ScrapeConfig) {
        config.output = self.output;
        config.write_json = !self.no_json;
        config.write_db = !self.no_db;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is looked up in the current directory and its parents
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match cli.command {
        Commands::Run {
            genres,
            max_pages,
            sinks,
        } => {
            let mut config = ScrapeConfig::default();
            if !genres.is_empty() {
                config.genres = genres;
            }
            config.max_pages = max_pages;
            sinks.apply(&mut config);
            config
        }
        Commands::Test { genre, sinks } => {
            info!("starting single test page.");
            let mut config = ScrapeConfig::single_page(&genre);
            sinks.apply(&mut config);
            config
        }
        Commands::Extract { file, clean: do_clean } => {
            return print_extracted(&file, do_clean);
        }
    };

    let source = ImdbSearch::new(build_client()?);
    let store = if config.write_db {
        Some(MongoStore::from_config(&config)?)
    } else {
        None
    };

    let reports = pipeline::run(
        &config,
        &source,
        store.as_ref().map(|s| s as &dyn DocumentStore),
    )
    .await?;
    print_summary(&reports);
    Ok(())
}

fn print_extracted(file: &Path, do_clean: bool) -> anyhow::Result<()> {
    let html = std::fs::read_to_string(file)?;
    let raw = extract::extract_page(&html)?;

    if do_clean {
        let listings = clean::clean(raw, &ScrapeConfig::default().excluded_certificates)?;
        for listing in &listings {
            println!("{}", serde_json::to_string(listing)?);
        }
        eprintln!("{} listings kept", listings.len());
    } else {
        for r in &raw {
            println!("{}", serde_json::to_string(r)?);
        }
        eprintln!("{} listings found", raw.len());
    }
    Ok(())
}

fn print_summary(reports: &[GenreReport]) {
    println!("{:<12} | {:>7} | {:>5} | {:>8}", "Genre", "Scraped", "Kept", "Inserted");
    println!("{}", "-".repeat(42));
    for r in reports {
        let inserted = r
            .inserted
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<12} | {:>7} | {:>5} | {:>8}",
            r.genre, r.scraped, r.kept, inserted
        );
    }
}
