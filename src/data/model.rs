use std::collections::BTreeSet;
use std::fmt;

use anyhow::Result;
use serde::Serialize;

use crate::config::{
    COL_BECHDEL, COL_BECHDEL_RAW, COL_GENRE, COL_RATING, COL_RUNTIME, COL_VOTES, COL_YEAR,
};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Tokens read as a missing value, matching what common CSV writers emit.
const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "<NA>", "#N/A",
];

/// Whether a raw cell denotes a missing value.
pub fn is_null(cell: &str) -> bool {
    NULL_TOKENS.contains(&cell.trim())
}

/// Coerce a raw cell to a number; anything unparseable is missing.
pub fn parse_number(cell: &str) -> Option<f64> {
    if is_null(cell) {
        return None;
    }
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a raw cell to a year. Fractional years count as unparseable.
pub fn parse_year(cell: &str) -> Option<i32> {
    let v = parse_number(cell)?;
    if v.fract() != 0.0 || v < i32::MIN as f64 || v > i32::MAX as f64 {
        return None;
    }
    Some(v as i32)
}

// ---------------------------------------------------------------------------
// BechdelScore – 0 (fewer than two named women) to 3 (full pass)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BechdelScore(u8);

impl BechdelScore {
    pub const FAIL: BechdelScore = BechdelScore(0);
    pub const PASS: BechdelScore = BechdelScore(3);
    pub const ALL: [BechdelScore; 4] = [
        BechdelScore(0),
        BechdelScore(1),
        BechdelScore(2),
        BechdelScore(3),
    ];

    pub fn new(value: u8) -> Option<Self> {
        (value <= 3).then_some(BechdelScore(value))
    }

    /// Parse a raw cell. Accepts `3` as well as `3.0`.
    ///
    /// Stricter than the upstream data: a value outside 0..=3 or with a
    /// fractional part is rejected, and the loader drops that row rather
    /// than carry a score the charts cannot place.
    pub fn parse(cell: &str) -> Option<Self> {
        let v = parse_number(cell)?;
        if v.fract() != 0.0 || !(0.0..=3.0).contains(&v) {
            return None;
        }
        Self::new(v as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for BechdelScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Movie – one row of the cleaned table
// ---------------------------------------------------------------------------

/// One movie with its typed columns and every cell as text in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub year: i32,
    pub genre: Option<String>,
    pub runtime_minutes: Option<f64>,
    pub num_votes: Option<f64>,
    pub imdb_rating: f64,
    pub bechdel: BechdelScore,
    /// Cells aligned with [`MovieDataset::headers`]. Missing values are empty.
    pub fields: Vec<String>,
}

impl Movie {
    /// Whether the row has everything the scatter plot needs.
    pub fn is_plottable(&self) -> bool {
        self.num_votes.is_some() && self.runtime_minutes.is_some()
    }
}

/// Positions of the typed columns within the header.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    bechdel: usize,
    year: usize,
    genre: usize,
    rating: usize,
    runtime: usize,
    votes: usize,
}

impl ColumnIndex {
    fn locate(headers: &[String]) -> Result<Self, DataError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(DataError::MissingColumn(name))
        };
        Ok(ColumnIndex {
            bechdel: find(COL_BECHDEL)?,
            year: find(COL_YEAR)?,
            genre: find(COL_GENRE)?,
            rating: find(COL_RATING)?,
            runtime: find(COL_RUNTIME)?,
            votes: find(COL_VOTES)?,
        })
    }
}

// ---------------------------------------------------------------------------
// MovieDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// How many rows a load kept and discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_dropped: usize,
}

/// The full parsed dataset with pre-computed genre and year indices.
#[derive(Debug, Clone)]
pub struct MovieDataset {
    /// Column names, with the Bechdel column under its canonical name.
    pub headers: Vec<String>,
    /// All retained movies, in source order.
    pub movies: Vec<Movie>,
    /// Sorted distinct non-missing `genre1` values.
    pub genres: BTreeSet<String>,
    /// Smallest and largest `year` present.
    pub year_bounds: Option<(i32, i32)>,
}

impl MovieDataset {
    /// Build the dataset from raw text rows.
    ///
    /// `runtimeMinutes` and `numVotes` are coerced, with unparseable cells
    /// becoming missing. Rows lacking a Bechdel score, a rating or a year are
    /// dropped. Fails only when a required column is absent.
    pub fn from_rows<I>(mut headers: Vec<String>, rows: I) -> Result<(Self, LoadReport)>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        rename_bechdel_column(&mut headers);
        let idx = ColumnIndex::locate(&headers)?;

        let mut report = LoadReport::default();
        let mut movies = Vec::new();
        for mut fields in rows {
            report.rows_read += 1;
            fields.resize(headers.len(), String::new());
            match parse_movie(&idx, fields) {
                Some(movie) => movies.push(movie),
                None => report.rows_dropped += 1,
            }
        }

        Ok((Self::from_movies(headers, movies), report))
    }

    /// Build indices over already-parsed movies.
    pub fn from_movies(headers: Vec<String>, movies: Vec<Movie>) -> Self {
        let genres: BTreeSet<String> = movies.iter().filter_map(|m| m.genre.clone()).collect();
        let year_bounds = movies.iter().fold(None, |acc, m| match acc {
            None => Some((m.year, m.year)),
            Some((lo, hi)) => Some((lo.min(m.year), hi.max(m.year))),
        });
        MovieDataset {
            headers,
            movies,
            genres,
            year_bounds,
        }
    }

    /// Number of movies.
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

/// Rename `bechdelRating` to `bechdel_rating` unless the canonical name exists.
pub fn rename_bechdel_column(headers: &mut [String]) {
    if headers.iter().any(|h| h == COL_BECHDEL) {
        return;
    }
    if let Some(h) = headers.iter_mut().find(|h| *h == COL_BECHDEL_RAW) {
        *h = COL_BECHDEL.to_string();
    }
}

fn parse_movie(idx: &ColumnIndex, mut fields: Vec<String>) -> Option<Movie> {
    for cell in fields.iter_mut() {
        if is_null(cell) {
            cell.clear();
        }
    }

    let runtime_minutes = parse_number(&fields[idx.runtime]);
    if runtime_minutes.is_none() {
        fields[idx.runtime].clear();
    }
    let num_votes = parse_number(&fields[idx.votes]);
    if num_votes.is_none() {
        fields[idx.votes].clear();
    }

    let bechdel = BechdelScore::parse(&fields[idx.bechdel]);
    let imdb_rating = parse_number(&fields[idx.rating]);
    let year = parse_year(&fields[idx.year]);
    let (Some(bechdel), Some(imdb_rating), Some(year)) = (bechdel, imdb_rating, year) else {
        log::debug!("dropping row missing a required field: {fields:?}");
        return None;
    };

    let genre = Some(&fields[idx.genre])
        .filter(|g| !g.is_empty())
        .cloned();

    Some(Movie {
        year,
        genre,
        runtime_minutes,
        num_votes,
        imdb_rating,
        bechdel,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        ["tconst", "primaryTitle", "year", "genre1", "imdbAverageRating", "runtimeMinutes", "numVotes", "bechdelRating"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_numbers_and_nulls() {
        assert_eq!(parse_number(" 7.5 "), Some(7.5));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("\\N"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_year("1950.0"), Some(1950));
        assert_eq!(parse_year("1950.5"), None);
        assert_eq!(parse_year("unknown"), None);
    }

    #[test]
    fn bechdel_score_range() {
        assert_eq!(BechdelScore::parse("3"), Some(BechdelScore::PASS));
        assert_eq!(BechdelScore::parse("0.0"), Some(BechdelScore::FAIL));
        assert_eq!(BechdelScore::parse("4"), None);
        assert_eq!(BechdelScore::parse("-1"), None);
        assert_eq!(BechdelScore::parse("2.5"), None);
        assert!(BechdelScore::new(4).is_none());
    }

    #[test]
    fn renames_raw_bechdel_column() {
        let (ds, _) = MovieDataset::from_rows(headers(), Vec::new()).unwrap();
        assert_eq!(ds.headers[7], "bechdel_rating");
        assert!(ds.is_empty());
        assert_eq!(ds.year_bounds, None);
    }

    #[test]
    fn missing_column_is_an_error() {
        let mut h = headers();
        h.retain(|c| c != "genre1");
        let err = MovieDataset::from_rows(h, Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::MissingColumn("genre1"))
        ));
    }

    #[test]
    fn coerces_optional_numbers_and_drops_required_nulls() {
        let rows = vec![
            row(&["tt1", "A", "1999", "Drama", "7.1", "\\N", "1200", "3"]),
            row(&["tt2", "B", "2001", "", "6.0", "95", "abc", "1"]),
            row(&["tt3", "C", "2003", "Comedy", "", "90", "10", "2"]),
            row(&["tt4", "D", "", "Comedy", "5.0", "90", "10", "2"]),
            row(&["tt5", "E", "2004", "Comedy", "5.0", "90", "10", "NA"]),
        ];
        let (ds, report) = MovieDataset::from_rows(headers(), rows).unwrap();

        assert_eq!(report, LoadReport { rows_read: 5, rows_dropped: 3 });
        assert_eq!(ds.len(), 2);

        let a = &ds.movies[0];
        assert_eq!(a.runtime_minutes, None);
        assert_eq!(a.num_votes, Some(1200.0));
        assert_eq!(a.fields[5], "");
        assert!(!a.is_plottable());

        let b = &ds.movies[1];
        assert_eq!(b.genre, None);
        assert_eq!(b.num_votes, None);
        assert_eq!(b.fields[6], "");

        assert_eq!(ds.genres.iter().collect::<Vec<_>>(), vec!["Drama"]);
        assert_eq!(ds.year_bounds, Some((1999, 2001)));
    }

    #[test]
    fn short_rows_are_padded() {
        let rows = vec![row(&["tt1", "A", "1999", "Drama", "7.1"])];
        let (ds, report) = MovieDataset::from_rows(headers(), rows).unwrap();
        assert_eq!(report.rows_dropped, 1);
        assert!(ds.is_empty());
    }
}
