//! Request parameter extraction.
//!
//! Query strings and form bodies arrive as flat `(key, value)` pairs using
//! bracketed keys for nested values (`ratings[PG]=PG`, `movie[title]=...`).
//! This module turns those pairs into typed parameters and drops anything
//! that is not a known field.

use std::collections::BTreeSet;

use catalog::parser::parse_release_date;
use catalog::{CatalogError, MovieAttributes, Rating, SortKey};
use tracing::warn;

/// Parameters accepted by the movie list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexParams {
    pub sort: Option<SortKey>,
    /// `None` when no valid rating was checked
    pub ratings: Option<BTreeSet<Rating>>,
}

impl IndexParams {
    /// Read `sort` and `ratings[<rating>]` pairs.
    ///
    /// Unknown sort keys and ratings are ignored so that the session or
    /// default value applies instead.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut params = IndexParams::default();
        let mut ratings = BTreeSet::new();

        for (key, value) in pairs {
            if key == "sort" {
                match value.parse::<SortKey>() {
                    Ok(sort) => params.sort = Some(sort),
                    Err(e) => warn!("Ignoring sort parameter: {}", e),
                }
            } else if let Some(name) = nested_key(key, "ratings") {
                match name.parse::<Rating>() {
                    Ok(rating) => {
                        ratings.insert(rating);
                    }
                    Err(e) => warn!("Ignoring ratings parameter: {}", e),
                }
            }
        }

        if !ratings.is_empty() {
            params.ratings = Some(ratings);
        }
        params
    }
}

/// Build the writable movie attributes from `movie[<field>]` pairs.
///
/// An empty rating counts as "not given"; an empty release date clears the date.
pub fn movie_attributes_from_pairs(
    pairs: &[(String, String)],
) -> Result<MovieAttributes, CatalogError> {
    let mut attrs = MovieAttributes::default();

    for (key, value) in pairs {
        let Some(field) = nested_key(key, "movie") else {
            continue;
        };
        match field {
            "title" => attrs.title = Some(value.clone()),
            "director" => attrs.director = Some(value.clone()),
            "description" => attrs.description = Some(value.clone()),
            "rating" if value.trim().is_empty() => {}
            "rating" => attrs.rating = Some(value.trim().parse()?),
            "release_date" => {
                let date = parse_release_date(value).map_err(|_| CatalogError::InvalidValue {
                    field: "release_date".to_string(),
                    value: value.clone(),
                })?;
                attrs.release_date = Some(date);
            }
            other => warn!("Dropping non-writable movie attribute {:?}", other),
        }
    }

    Ok(attrs)
}

/// `outer[inner]` -> `Some("inner")`
fn nested_key<'a>(key: &'a str, outer: &str) -> Option<&'a str> {
    key.strip_prefix(outer)?
        .strip_prefix('[')?
        .strip_suffix(']')
}
