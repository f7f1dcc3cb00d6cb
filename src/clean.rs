use crate::{Listing, RawListing, ScrapeError};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::info;

/// Highest rating the site hands out.
const MAX_RATING: f64 = 10.0;

/// Dedupe, coerce and filter one genre's raw table.
pub fn clean(raw: Vec<RawListing>, excluded: &[String]) -> Result<Vec<Listing>, ScrapeError> {
    let raw = dedupe(raw);
    let listings = coerce(raw)?;
    Ok(exclude_certificates(listings, excluded))
}

/// Drop rows whose `uid` was already seen, keeping the first occurrence.
pub fn dedupe(raw: Vec<RawListing>) -> Vec<RawListing> {
    info!("removing duplicate data...");
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter(|row| seen.insert(row.uid.clone()))
        .collect()
}

/// Convert every textual column to its typed form. A single bad value fails
/// the whole table.
pub fn coerce(raw: Vec<RawListing>) -> Result<Vec<Listing>, ScrapeError> {
    info!("cleaning data...");
    raw.into_iter().map(coerce_row).collect()
}

fn coerce_row(row: RawListing) -> Result<Listing, ScrapeError> {
    let rating: f64 = parse_field(&row.uid, "rating", &row.rating)?;
    if !(0.0..=MAX_RATING).contains(&rating) {
        return Err(ScrapeError::coerce(&row.uid, "rating", &row.rating));
    }

    Ok(Listing {
        rank: parse_field(&row.uid, "rank", &row.rank)?,
        year: parse_field(&row.uid, "year", &row.year)?,
        runtime: parse_field(&row.uid, "runtime", &row.runtime)?,
        num_votes: parse_field(&row.uid, "num_votes", &row.num_votes)?,
        rating,
        uid: row.uid,
        name: row.name,
        certificate: row.certificate,
        genre: row.genre,
        director: row.director,
        stars: row.stars,
    })
}

fn parse_field<T: FromStr>(uid: &str, field: &'static str, value: &str) -> Result<T, ScrapeError> {
    value
        .trim()
        .replace(',', "")
        .parse()
        .map_err(|_| ScrapeError::coerce(uid, field, value))
}

/// Keep only rows whose certificate is not excluded. Applying it twice is
/// the same as applying it once.
pub fn exclude_certificates(listings: Vec<Listing>, excluded: &[String]) -> Vec<Listing> {
    info!("letting only movies onto table...");
    listings
        .into_iter()
        .filter(|l| !excluded.iter().any(|c| *c == l.certificate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScrapeConfig;

    fn raw(uid: &str, certificate: &str) -> RawListing {
        RawListing {
            uid: uid.to_string(),
            rank: "1".to_string(),
            name: format!("Movie {uid}"),
            year: "2001".to_string(),
            certificate: certificate.to_string(),
            runtime: "95".to_string(),
            genre: vec!["crime".to_string()],
            rating: "7.4".to_string(),
            director: "Someone".to_string(),
            stars: vec!["A".to_string(), "B".to_string()],
            num_votes: "1,234".to_string(),
        }
    }

    #[test]
    fn dedupe_keeps_first() {
        let mut second = raw("tt1", "R");
        second.name = "Later copy".to_string();
        let rows = dedupe(vec![raw("tt1", "R"), raw("tt2", "R"), second]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Movie tt1");
        assert_eq!(rows[1].uid, "tt2");
    }

    #[test]
    fn coerce_types() {
        let rows = coerce(vec![raw("tt1", "PG")]).unwrap();
        let l = &rows[0];
        assert_eq!(l.rank, 1);
        assert_eq!(l.year, 2001);
        assert_eq!(l.runtime, 95);
        assert_eq!(l.num_votes, 1234);
        assert!((l.rating - 7.4).abs() < f64::EPSILON);
    }

    #[test]
    fn bad_value_fails_whole_table() {
        let mut bad = raw("tt2", "R");
        bad.runtime = "1h 35m".to_string();
        let err = coerce(vec![raw("tt1", "R"), bad]).unwrap_err();
        match err {
            ScrapeError::Coerce { uid, field, .. } => {
                assert_eq!(uid, "tt2");
                assert_eq!(field, "runtime");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_rank_is_not_coercible() {
        let mut bad = raw("tt1", "R");
        bad.rank = String::new();
        assert!(coerce(vec![bad]).is_err());
    }

    #[test]
    fn rating_out_of_range_rejected() {
        let mut bad = raw("tt1", "R");
        bad.rating = "11.5".to_string();
        assert!(coerce(vec![bad]).is_err());
    }

    #[test]
    fn filter_is_idempotent() {
        let excluded = ScrapeConfig::default().excluded_certificates;
        let rows = coerce(vec![
            raw("tt1", "R"),
            raw("tt2", "TV-14"),
            raw("tt3", "not certified"),
            raw("tt4", "pre-production"),
            raw("tt5", "PG-13"),
        ])
        .unwrap();

        let once = exclude_certificates(rows, &excluded);
        let uids: Vec<&str> = once.iter().map(|l| l.uid.as_str()).collect();
        assert_eq!(uids, vec!["tt1", "tt5"]);

        let twice = exclude_certificates(once.clone(), &excluded);
        assert_eq!(once, twice);
    }

    #[test]
    fn clean_output_is_unique_and_in_range() {
        let rows = vec![raw("tt1", "R"), raw("tt1", "R"), raw("tt2", "TV-MA"), raw("tt3", "G")];
        let out = clean(rows, &ScrapeConfig::default().excluded_certificates).unwrap();
        let uids: HashSet<&str> = out.iter().map(|l| l.uid.as_str()).collect();
        assert_eq!(uids.len(), out.len());
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|l| (0.0..=10.0).contains(&l.rating)));
    }
}
