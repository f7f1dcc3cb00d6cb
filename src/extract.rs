//! Listing extraction for IMDb search result pages.
//!
//! Every `div.lister-item` node is read in one pass into a [`RawListing`], so
//! fields can never drift out of alignment when a listing lacks an element.
//! Each field has its own fallback when the element is missing:
//!
//! | field         | source                                              | fallback          |
//! |---------------|-----------------------------------------------------|-------------------|
//! | `uid`         | `img.loadlate[data-tconst]`                         | node skipped      |
//! | `rank`        | `span.lister-item-index`                            | `""`              |
//! | `name`        | first link in `h3.lister-item-header`               | `""`              |
//! | `year`        | first digit run of `span.lister-item-year`          | `"0"`             |
//! | `certificate` | `span.certificate`, else production status          | `"not certified"` |
//! | `runtime`     | `span.runtime`                                      | `"0"`             |
//! | `genre`       | `span.genre`, lower-cased tokens                    | `[]`              |
//! | `rating`      | first decimal in `div.ratings-bar`                  | `"0.0"`           |
//! | `director`    | first link of the credits paragraph, if it has `\|` | `""`              |
//! | `stars`       | up to 5 links of the credits paragraph              | `[]`              |
//! | `num_votes`   | `span[name="nv"]` `data-value`                      | `"0"`             |

use crate::{NOT_CERTIFIED, RawListing, ScrapeError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::warn;

/// Certificate and runtime labels are cut to this many characters.
const LABEL_MAX_CHARS: usize = 10;
const MAX_STARS: usize = 5;

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}

fn decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\.\d+").unwrap())
}

fn sel(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|_| ScrapeError::Selector(css.to_string()))
}

struct ListingSelectors {
    item: Selector,
    uid: Selector,
    rank: Selector,
    name: Selector,
    year: Selector,
    features: Selector,
    certificate: Selector,
    production: Selector,
    runtime: Selector,
    genre: Selector,
    ratings_bar: Selector,
    credits: Selector,
    link: Selector,
    ghost: Selector,
    votes: Selector,
}

impl ListingSelectors {
    fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            item: sel("div.lister-item")?,
            uid: sel("img.loadlate[data-tconst]")?,
            rank: sel("span.lister-item-index")?,
            name: sel("h3.lister-item-header a")?,
            year: sel("span.lister-item-year")?,
            // the first paragraph right after the header holds certificate | runtime | genre
            features: sel("h3.lister-item-header + p.text-muted")?,
            certificate: sel("p.text-muted > span.certificate")?,
            production: sel("p.text-muted > span.ghost + b")?,
            runtime: sel("p.text-muted > span.runtime")?,
            genre: sel("span.genre")?,
            ratings_bar: sel("p.text-muted + div.ratings-bar")?,
            credits: sel("p[class=\"\"]")?,
            link: sel("a")?,
            ghost: sel("span.ghost")?,
            votes: sel("p.sort-num_votes-visible > span[name=\"nv\"]")?,
        })
    }
}

/// Extract every listing on a search results page, in page order.
pub fn extract_page(html: &str) -> Result<Vec<RawListing>, ScrapeError> {
    let document = Html::parse_document(html);
    let s = ListingSelectors::new()?;

    let mut listings = Vec::new();
    for node in document.select(&s.item) {
        match extract_listing(node, &s) {
            Some(listing) => listings.push(listing),
            None => warn!("listing without data-tconst skipped"),
        }
    }
    Ok(listings)
}

fn extract_listing(node: ElementRef<'_>, s: &ListingSelectors) -> Option<RawListing> {
    let uid = node
        .select(&s.uid)
        .next()
        .and_then(|img| img.value().attr("data-tconst"))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())?;

    let features = node.select(&s.features).next();
    let credits = node.select(&s.credits).next();

    Some(RawListing {
        uid,
        rank: rank(node, s),
        name: node
            .select(&s.name)
            .next()
            .map(|a| text_of(a).trim().to_string())
            .unwrap_or_default(),
        year: year(node, s),
        certificate: features
            .map(|p| certificate(p, s))
            .unwrap_or_else(|| NOT_CERTIFIED.to_string()),
        runtime: features
            .and_then(|p| runtime(p, s))
            .unwrap_or_else(|| "0".to_string()),
        genre: node
            .select(&s.genre)
            .next()
            .map(|g| genre_tokens(&text_of(g)))
            .unwrap_or_default(),
        rating: rating(node, s),
        director: credits.map(|p| director(p, s)).unwrap_or_default(),
        stars: credits.map(|p| stars(p, s)).unwrap_or_default(),
        num_votes: node
            .select(&s.votes)
            .next()
            .and_then(|v| v.value().attr("data-value"))
            .map(|v| v.trim().replace(',', ""))
            .unwrap_or_else(|| "0".to_string()),
    })
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn rank(node: ElementRef<'_>, s: &ListingSelectors) -> String {
    node.select(&s.rank)
        .next()
        .map(|r| {
            text_of(r)
                .trim()
                .trim_matches('.')
                .replace(',', "")
        })
        .unwrap_or_default()
}

fn year(node: ElementRef<'_>, s: &ListingSelectors) -> String {
    node.select(&s.year)
        .next()
        .and_then(|y| {
            digits_re()
                .find(&text_of(y))
                .map(|m| m.as_str().replace(',', ""))
        })
        .unwrap_or_else(|| "0".to_string())
}

fn certificate(features: ElementRef<'_>, s: &ListingSelectors) -> String {
    if let Some(cert) = features.select(&s.certificate).next() {
        return truncate_chars(text_of(cert).trim(), LABEL_MAX_CHARS);
    }
    // unreleased titles show their production status in bold instead
    if let Some(status) = features.select(&s.production).next() {
        return text_of(status).trim().to_lowercase();
    }
    NOT_CERTIFIED.to_string()
}

fn runtime(features: ElementRef<'_>, s: &ListingSelectors) -> Option<String> {
    features.select(&s.runtime).next().map(|r| {
        truncate_chars(text_of(r).trim(), LABEL_MAX_CHARS)
            .replace(" min", "")
            .replace(',', "")
    })
}

/// "Action, Sci-Fi" -> ["action", "scifi"]
pub fn genre_tokens(label: &str) -> Vec<String> {
    let cleaned: String = label
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    let mut tokens: Vec<String> = Vec::new();
    for token in cleaned.split_whitespace() {
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

fn rating(node: ElementRef<'_>, s: &ListingSelectors) -> String {
    node.select(&s.ratings_bar)
        .next()
        .and_then(|bar| {
            let text = text_of(bar);
            let first_line = text.trim().lines().next().unwrap_or("").to_string();
            decimal_re()
                .find(&first_line)
                .map(|m| m.as_str().replace(',', ""))
        })
        .unwrap_or_else(|| "0.0".to_string())
}

fn director(credits: ElementRef<'_>, s: &ListingSelectors) -> String {
    if !text_of(credits).contains('|') {
        return String::new();
    }
    credits
        .select(&s.link)
        .next()
        .map(|a| text_of(a).trim().to_string())
        .unwrap_or_default()
}

fn stars(credits: ElementRef<'_>, s: &ListingSelectors) -> Vec<String> {
    let mut names: Vec<String> = credits
        .select(&s.link)
        .take(MAX_STARS)
        .map(|a| text_of(a).trim().to_string())
        .collect();
    // a ghost separator means the first link is the director
    if credits.select(&s.ghost).next().is_some() && !names.is_empty() {
        names.remove(0);
    }
    names
}
