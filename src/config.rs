use std::path::PathBuf;

use clap::Parser;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COL_BECHDEL: &str = "bechdel_rating";
/// Name of the Bechdel column in the raw download, renamed during ingestion.
pub const COL_BECHDEL_RAW: &str = "bechdelRating";
pub const COL_YEAR: &str = "year";
pub const COL_GENRE: &str = "genre1";
pub const COL_RATING: &str = "imdbAverageRating";
pub const COL_RUNTIME: &str = "runtimeMinutes";
pub const COL_VOTES: &str = "numVotes";

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const CLEANED_FILE_NAME: &str = "cleaned_data.csv";
pub const EXPORT_FILE_NAME: &str = "bechdel_filtered.csv";
pub const EXPORT_MIME: &str = "text/csv";

pub const DEFAULT_DATASET: &str = "nliabzd/movies-imdb-and-bechdel-information";
pub const DEFAULT_ARCHIVE_ENTRY: &str = "Bechdel_IMDB_Merge0524.csv";
pub const DEFAULT_MIN_YEAR: i32 = 1900;

/// Initial year range of the filter, clamped to the dataset's bounds.
pub const DEFAULT_YEAR_RANGE: (i32, i32) = (1980, 2020);
/// Sentinel shown in the genre picker meaning "no genre constraint".
pub const ALL_GENRES: &str = "All";
pub const PREVIEW_ROWS: usize = 20;
/// Largest scatter marker diameter in points (runtime is area-scaled to it).
pub const SCATTER_SIZE_MAX: f64 = 40.0;

pub const DOWNLOAD_TIMEOUT_SECS: u64 = 300;

// ---------------------------------------------------------------------------
// Command lines
// ---------------------------------------------------------------------------

/// Bechdel test dashboard: explore IMDb ratings against Bechdel scores.
#[derive(Debug, Parser)]
#[command(name = "bechdel-dashboard", version, about)]
pub struct DashboardArgs {
    /// Cleaned dataset to open (.csv, .parquet)
    #[arg(default_value = CLEANED_FILE_NAME)]
    pub data: PathBuf,

    /// Print the dashboard summary for the given filter as JSON and exit
    #[arg(long)]
    pub report: bool,

    /// Write the filtered rows as CSV to this path and exit
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Lower bound of the year range (inclusive)
    #[arg(long)]
    pub year_from: Option<i32>,

    /// Upper bound of the year range (inclusive)
    #[arg(long)]
    pub year_to: Option<i32>,

    /// Primary genre to keep ("All" for no constraint)
    #[arg(long, default_value = ALL_GENRES)]
    pub genre: String,
}

impl DashboardArgs {
    /// Whether the command line asks for a headless run instead of the UI.
    pub fn is_headless(&self) -> bool {
        self.report || self.export.is_some()
    }
}

/// Download the IMDb + Bechdel dataset and write the cleaned CSV.
#[derive(Debug, Parser)]
#[command(name = "ingest", version, about)]
pub struct IngestArgs {
    /// Dataset handle on Kaggle (owner/name)
    #[arg(long, default_value = DEFAULT_DATASET)]
    pub dataset: String,

    /// CSV file to read from inside the dataset archive
    #[arg(long, default_value = DEFAULT_ARCHIVE_ENTRY)]
    pub file: String,

    /// Use a local .zip archive or .csv file instead of downloading
    #[arg(long, value_name = "PATH")]
    pub source: Option<PathBuf>,

    /// Where to write the cleaned CSV (overwritten)
    #[arg(long, short, default_value = CLEANED_FILE_NAME)]
    pub output: PathBuf,

    /// Drop movies released before this year
    #[arg(long, default_value_t = DEFAULT_MIN_YEAR)]
    pub min_year: i32,
}
