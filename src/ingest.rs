//! One-off acquisition of the IMDb + Bechdel dataset.
//!
//! Downloads the dataset archive (or takes a local `.zip` / `.csv`), keeps
//! rows with a Bechdel score and a numeric year at or after the minimum year,
//! and writes the cleaned CSV the dashboard reads.

use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine;
use serde::Deserialize;

use crate::config::{IngestArgs, COL_BECHDEL, COL_YEAR, DOWNLOAD_TIMEOUT_SECS};
use crate::data::model::{is_null, parse_year, rename_bechdel_column};
use crate::error::DataError;

const KAGGLE_DOWNLOAD_URL: &str = "https://www.kaggle.com/api/v1/datasets/download";

/// Row counts of one cleaning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub rows_read: usize,
    /// No Bechdel score or no year.
    pub dropped_missing: usize,
    /// Year present but not a whole number. Fractional years such as
    /// `1950.5` land here even when they are past the minimum year.
    pub dropped_bad_year: usize,
    pub dropped_too_old: usize,
    pub rows_written: usize,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Fetch, clean and write the dataset as configured.
///
/// The output is written to a temporary file next to the target and renamed
/// over it, so a failed run leaves any previous file untouched.
pub fn run(args: &IngestArgs) -> Result<CleanReport> {
    let raw = match &args.source {
        Some(path) => read_local_source(path, &args.file)?,
        None => {
            let url = download_url(&args.dataset)?;
            log::info!("Downloading {} from {url}", args.dataset);
            let mut archive = download(&url, credentials())?;
            read_archive_entry(&mut archive, &args.file)?
        }
    };
    log::info!("Read {} bytes of '{}'", raw.len(), args.file);

    let dir = match args.output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    let report = clean_csv(raw.as_slice(), &mut tmp, args.min_year)?;
    tmp.as_file_mut().flush().context("flushing cleaned CSV")?;
    tmp.persist(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    log::info!(
        "Saved {} ({} rows kept of {}; dropped {} missing score/year, {} unparseable year, {} before minimum year)",
        args.output.display(),
        report.rows_written,
        report.rows_read,
        report.dropped_missing,
        report.dropped_bad_year,
        report.dropped_too_old
    );
    Ok(report)
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

/// Copy `input` to `output`, renaming the Bechdel column and keeping only
/// rows with a score and a whole-number year of at least `min_year`.
pub fn clean_csv<R: Read, W: Write>(input: R, output: W, min_year: i32) -> Result<CleanReport> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let mut headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    rename_bechdel_column(&mut headers);

    let find = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(DataError::MissingColumn(name))
    };
    let bechdel_idx = find(COL_BECHDEL)?;
    let year_idx = find(COL_YEAR)?;

    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(&headers).context("writing CSV header")?;

    let mut report = CleanReport::default();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        report.rows_read += 1;

        let bechdel = record.get(bechdel_idx).unwrap_or("");
        let year = record.get(year_idx).unwrap_or("");
        if is_null(bechdel) || is_null(year) {
            report.dropped_missing += 1;
            continue;
        }
        match parse_year(year) {
            None => report.dropped_bad_year += 1,
            Some(y) if y < min_year => report.dropped_too_old += 1,
            Some(_) => {
                // Short rows are padded and long ones cut to the header width.
                let mut row: Vec<&str> = record.iter().collect();
                row.resize(headers.len(), "");
                writer
                    .write_record(&row)
                    .with_context(|| format!("writing CSV row {row_no}"))?;
                report.rows_written += 1;
            }
        }
    }
    writer.flush().context("flushing CSV")?;
    Ok(report)
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Read the CSV bytes from a local `.csv` file or the named entry of a `.zip`.
pub fn read_local_source(path: &Path, entry: &str) -> Result<Vec<u8>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => std::fs::read(path).with_context(|| format!("reading {}", path.display())),
        "zip" => {
            let mut file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            read_archive_entry(&mut file, entry)
        }
        other => Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
}

/// Extract `entry` from a zip archive. The entry may sit in a subdirectory.
pub fn read_archive_entry<R: Read + Seek>(archive: R, entry: &str) -> Result<Vec<u8>> {
    let mut zip = zip::ZipArchive::new(archive).context("opening dataset archive")?;
    let name = zip
        .file_names()
        .find(|n| *n == entry || Path::new(n).file_name().is_some_and(|f| f == entry))
        .map(str::to_string)
        .ok_or_else(|| DataError::MissingArchiveEntry(entry.to_string()))?;

    let mut file = zip
        .by_name(&name)
        .with_context(|| format!("reading '{name}' from archive"))?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)
        .with_context(|| format!("extracting '{name}'"))?;
    Ok(buf)
}

/// Download URL for a Kaggle dataset handle (`owner/name`).
pub fn download_url(handle: &str) -> Result<String, DataError> {
    match handle.split_once('/') {
        Some((owner, name))
            if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
        {
            Ok(format!("{KAGGLE_DOWNLOAD_URL}/{owner}/{name}"))
        }
        _ => Err(DataError::InvalidDatasetHandle(handle.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub key: String,
}

impl Credentials {
    fn basic_auth(&self) -> String {
        let token = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.username, self.key));
        format!("Basic {token}")
    }
}

/// API credentials from `KAGGLE_USERNAME`/`KAGGLE_KEY`, falling back to
/// `kaggle.json` in `$KAGGLE_CONFIG_DIR` or `~/.kaggle`.
pub fn credentials() -> Option<Credentials> {
    if let (Ok(username), Ok(key)) = (std::env::var("KAGGLE_USERNAME"), std::env::var("KAGGLE_KEY")) {
        return Some(Credentials { username, key });
    }
    let dir = std::env::var_os("KAGGLE_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".kaggle")))?;
    let path = dir.join("kaggle.json");
    let text = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&text) {
        Ok(creds) => Some(creds),
        Err(e) => {
            log::warn!("Ignoring unreadable {}: {e}", path.display());
            None
        }
    }
}

/// GET `url` into memory.
fn download(url: &str, creds: Option<Credentials>) -> Result<Cursor<Vec<u8>>> {
    let mut request = ureq::get(url).timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS));
    match &creds {
        Some(c) => request = request.set("Authorization", &c.basic_auth()),
        None => log::warn!("No Kaggle credentials found; trying an anonymous download"),
    }

    let response = request.call().map_err(|e| match e {
        ureq::Error::Status(status, _) => anyhow::Error::new(DataError::HttpStatus {
            status,
            url: url.to_string(),
        }),
        other => anyhow::Error::new(other).context("download failed"),
    })?;

    let mut buf = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut buf)
        .context("download failed while reading the response")?;
    log::info!("Downloaded {} bytes", buf.len());
    Ok(Cursor::new(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "\
tconst,primaryTitle,year,genre1,imdbAverageRating,runtimeMinutes,numVotes,bechdelRating
tt1,Unknown Year,unknown,Drama,7.0,100,10,3
tt2,Too Old,1899,Drama,7.0,100,10,3
tt3,Kept,1950,Drama,7.0,100,10,2
tt4,No Score,1990,Drama,7.0,100,10,
tt5,No Year,,Drama,7.0,100,10,1
tt6,Float Year,1960.0,Comedy,6.0,\\N,10,0
";

    fn args(dir: &Path, source: PathBuf) -> IngestArgs {
        IngestArgs {
            dataset: "owner/name".into(),
            file: "Bechdel_IMDB_Merge0524.csv".into(),
            source: Some(source),
            output: dir.join("cleaned_data.csv"),
            min_year: 1900,
        }
    }

    #[test]
    fn cleaning_drops_invalid_years() {
        let mut out = Vec::new();
        let report = clean_csv(RAW.as_bytes(), &mut out, 1900).unwrap();
        assert_eq!(
            report,
            CleanReport {
                rows_read: 6,
                dropped_missing: 2,
                dropped_bad_year: 1,
                dropped_too_old: 1,
                rows_written: 2,
            }
        );

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].ends_with(",bechdel_rating"));
        assert_eq!(lines[1], "tt3,Kept,1950,Drama,7.0,100,10,2");
        assert!(lines[2].starts_with("tt6,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn cleaning_pads_short_rows_to_header_width() {
        let raw = "\
tconst,bechdelRating,year,genre1,imdbAverageRating,runtimeMinutes,numVotes
tt9,3,1950,Drama
tt10,1,1990,Comedy,6.5,95,20,extra
";
        let mut out = Vec::new();
        let report = clean_csv(raw.as_bytes(), &mut out, 1900).unwrap();
        assert_eq!(report.rows_read, 2);
        assert_eq!(report.rows_written, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "tt9,3,1950,Drama,,,");
        assert_eq!(lines[2], "tt10,1,1990,Comedy,6.5,95,20");
    }

    #[test]
    fn fractional_year_is_a_bad_year() {
        let raw = "tconst,year,bechdelRating\ntt1,1950.5,3\n";
        let report = clean_csv(raw.as_bytes(), Vec::new(), 1900).unwrap();
        assert_eq!(report.dropped_bad_year, 1);
        assert_eq!(report.rows_written, 0);
    }

    #[test]
    fn cleaning_requires_year_column() {
        let err = clean_csv("title,bechdelRating\nA,3\n".as_bytes(), Vec::new(), 1900).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::MissingColumn("year"))
        ));
    }

    #[test]
    fn run_from_local_csv_overwrites_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("raw.csv");
        std::fs::write(&source, RAW).unwrap();
        let args = args(dir.path(), source);
        std::fs::write(&args.output, "stale").unwrap();

        let report = run(&args).unwrap();
        assert_eq!(report.rows_written, 2);

        let (ds, _) = crate::data::loader::read_csv(File::open(&args.output).unwrap()).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(ds.movies.iter().all(|m| m.year >= 1900));
    }

    #[test]
    fn run_from_zip_finds_nested_entry() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("dataset.zip");
        {
            let mut zw = zip::ZipWriter::new(File::create(&source).unwrap());
            zw.start_file(
                "data/Bechdel_IMDB_Merge0524.csv",
                zip::write::SimpleFileOptions::default(),
            )
            .unwrap();
            zw.write_all(RAW.as_bytes()).unwrap();
            zw.finish().unwrap();
        }

        let args = args(dir.path(), source);
        assert_eq!(run(&args).unwrap().rows_written, 2);
        assert!(args.output.exists());
    }

    #[test]
    fn missing_entry_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("dataset.zip");
        {
            let mut zw = zip::ZipWriter::new(File::create(&source).unwrap());
            zw.start_file("other.csv", zip::write::SimpleFileOptions::default())
                .unwrap();
            zw.write_all(RAW.as_bytes()).unwrap();
            zw.finish().unwrap();
        }

        let args = args(dir.path(), source);
        let err = run(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::MissingArchiveEntry(_))
        ));
        assert!(!args.output.exists());
    }

    #[test]
    fn dataset_handles() {
        assert_eq!(
            download_url("nliabzd/movies-imdb-and-bechdel-information").unwrap(),
            "https://www.kaggle.com/api/v1/datasets/download/nliabzd/movies-imdb-and-bechdel-information"
        );
        assert!(download_url("no-slash").is_err());
        assert!(download_url("/name").is_err());
        assert!(download_url("a/b/c").is_err());
    }

    #[test]
    fn basic_auth_header() {
        let c = Credentials {
            username: "user".into(),
            key: "secret".into(),
        };
        assert_eq!(c.basic_auth(), "Basic dXNlcjpzZWNyZXQ=");
    }
}
