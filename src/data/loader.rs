use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{LoadReport, MovieDataset};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the cleaned movie dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one movie per line (what `ingest` writes)
/// * `.parquet` – the same columns stored as Parquet
pub fn load_file(path: &Path) -> Result<MovieDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (dataset, report) = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            read_csv(file)?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedExtension(other.to_string()).into()),
    };

    log::info!(
        "Loaded {} movies from {} ({} of {} rows dropped for missing rating, score or year)",
        dataset.len(),
        path.display(),
        report.rows_dropped,
        report.rows_read
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a cleaned CSV from any reader.
pub fn read_csv<R: Read>(input: R) -> Result<(MovieDataset, LoadReport)> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    MovieDataset::from_rows(headers, rows)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the cleaned columns.
///
/// Every cell is rendered to text and then goes through the same coercion as
/// the CSV path, so integer and float encodings of `year` or the Bechdel
/// score are both accepted. Nulls become empty cells.
fn load_parquet(path: &Path) -> Result<(MovieDataset, LoadReport)> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let mut cells = Vec::with_capacity(batch.num_columns());
            for col in batch.columns() {
                if col.is_null(row) {
                    cells.push(String::new());
                } else {
                    let text = array_value_to_string(col, row)
                        .with_context(|| format!("Row {row}: unreadable cell"))?;
                    cells.push(text);
                }
            }
            rows.push(cells);
        }
    }

    MovieDataset::from_rows(headers, rows)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::BechdelScore;

    const SAMPLE: &str = "\
tconst,primaryTitle,year,genre1,imdbAverageRating,runtimeMinutes,numVotes,bechdel_rating
tt1,\"Alien, Part One\",1979,Horror,8.5,117,900000,3
tt2,Rocky,1976,Drama,8.1,\\N,600000,0
tt3,Broken,,Drama,5.0,90,100,1
";

    #[test]
    fn reads_csv_with_quoted_fields() {
        let (ds, report) = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_dropped, 1);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.movies[0].fields[1], "Alien, Part One");
        assert_eq!(ds.movies[0].bechdel, BechdelScore::PASS);
        assert_eq!(ds.movies[1].runtime_minutes, None);
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("cleaned_data.csv");
        std::fs::File::create(&csv_path)
            .unwrap()
            .write_all(SAMPLE.as_bytes())
            .unwrap();
        assert_eq!(load_file(&csv_path).unwrap().len(), 2);

        let txt_path = dir.path().join("cleaned_data.txt");
        std::fs::write(&txt_path, SAMPLE).unwrap();
        let err = load_file(&txt_path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::UnsupportedExtension(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_file(&dir.path().join("absent.csv")).is_err());
    }

    #[test]
    fn reads_parquet() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("primaryTitle", DataType::Utf8, false),
            Field::new("year", DataType::Int64, false),
            Field::new("genre1", DataType::Utf8, true),
            Field::new("imdbAverageRating", DataType::Float64, false),
            Field::new("runtimeMinutes", DataType::Float64, true),
            Field::new("numVotes", DataType::Int64, true),
            Field::new("bechdelRating", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Heat", "Clue", "Void"])),
                Arc::new(Int64Array::from(vec![1995, 1985, 1990])),
                Arc::new(StringArray::from(vec![Some("Crime"), None, Some("Drama")])),
                Arc::new(Float64Array::from(vec![8.3, 7.2, 4.0])),
                Arc::new(Float64Array::from(vec![Some(170.0), Some(94.0), None])),
                Arc::new(Int64Array::from(vec![Some(700000), None, Some(12)])),
                Arc::new(Int64Array::from(vec![Some(1), Some(3), None])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.headers[6], "bechdel_rating");
        assert_eq!(ds.movies[0].year, 1995);
        assert_eq!(ds.movies[0].runtime_minutes, Some(170.0));
        assert_eq!(ds.movies[1].genre, None);
        assert_eq!(ds.movies[1].num_votes, None);
        assert_eq!(ds.year_bounds, Some((1985, 1995)));
    }
}
