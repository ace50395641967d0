//! Parser for the movie seed file.
//!
//! Format, one movie per line:
//! `movieId::title::rating::releaseDate::director`
//!
//! - `releaseDate` is `YYYY-MM-DD` or empty
//! - `director` may be empty or left off entirely
//! - blank lines and lines starting with `#` are skipped

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{CatalogError, Result};
use crate::types::{Movie, Rating};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Read and parse a seed file from disk
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let content = fs::read_to_string(path)?;
    parse_movies_str(&file, &content)
}

/// Parse seed file content; `file` is only used in error messages
pub fn parse_movies_str(file: &str, content: &str) -> Result<Vec<Movie>> {
    let mut movies = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() || line_trimmed.starts_with('#') {
            continue;
        }

        let parse_error = |reason: String| CatalogError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason,
        };

        let mut parts = line_trimmed.split("::");

        let movie_id = parts
            .next()
            .ok_or_else(|| parse_error("Missing movieId".to_string()))?;
        let title = parts
            .next()
            .ok_or_else(|| parse_error("Missing title".to_string()))?;
        let rating = parts
            .next()
            .ok_or_else(|| parse_error("Missing rating".to_string()))?;
        let release_date = parts
            .next()
            .ok_or_else(|| parse_error("Missing release date".to_string()))?;
        let director = parts.next().unwrap_or_default();
        if parts.next().is_some() {
            return Err(parse_error("Expected at most 5 fields".to_string()));
        }

        if title.trim().is_empty() {
            return Err(parse_error("Empty title".to_string()));
        }

        let movie = Movie {
            id: movie_id
                .trim()
                .parse()
                .map_err(|e| parse_error(format!("Invalid movieId: {}", e)))?,
            title: title.trim().to_string(),
            rating: rating
                .trim()
                .parse::<Rating>()
                .map_err(|e| parse_error(e.to_string()))?,
            release_date: parse_release_date(release_date)
                .map_err(|e| parse_error(format!("Invalid release date: {}", e)))?,
            director: Some(director.trim().to_string()).filter(|d| !d.is_empty()),
            description: None,
        };

        movies.push(movie);
    }

    Ok(movies)
}

/// Parse an optional `YYYY-MM-DD` date; empty input means unknown
pub fn parse_release_date(s: &str) -> std::result::Result<Option<NaiveDate>, chrono::ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).map(Some)
}
