use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::DataType;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Article, ArticleDataset};

/// Column names expected in the cleaned metadata table.
pub const TITLE_COLUMN: &str = "title";
pub const PUBLISH_TIME_COLUMN: &str = "publish_time";
pub const JOURNAL_COLUMN: &str = "journal";
pub const SOURCE_COLUMN: &str = "source_x";

const REQUIRED_COLUMNS: [&str; 4] = [
    TITLE_COLUMN,
    PUBLISH_TIME_COLUMN,
    JOURNAL_COLUMN,
    SOURCE_COLUMN,
];

/// Cell spellings that mean "no value" in exported dataframes.
const NA_MARKERS: [&str; 12] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "NULL", "null", "None", "<NA>", "#N/A",
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why the dataset could not be produced.  Every variant is shown to the user;
/// none of them stops the application.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(
        "'{file}' was not found in the '{dir}' folder.\n\n\
         To create it:\n\
         1. Download the raw `metadata.csv` of the CORD-19 dataset from Kaggle.\n\
         2. Put it in the `data/` folder at the project root.\n\
         3. Run the cleaning notebook (`notebooks/CORD-19_Analysis.ipynb`) to produce `cleaned_metadata.csv`.\n\n\
         The README describes these steps in detail."
    )]
    MissingFile { file: String, dir: String },

    #[error("'{path}' has no '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("failed to read '{path}': {message}")]
    Read { path: PathBuf, message: String },
}

impl LoadError {
    fn missing_file(path: &Path) -> Self {
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let dir = path
            .parent()
            .map(|d| d.display().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| ".".to_string());
        LoadError::MissingFile { file, dir }
    }

    /// Whether this is the "input file not present" case.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, LoadError::MissingFile { .. })
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Raw cells of one row before date parsing.
#[derive(Debug, Clone, Default, PartialEq)]
struct RawRow {
    title: Option<String>,
    publish_time: Option<String>,
    journal: Option<String>,
    source: Option<String>,
}

/// Load the article table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – comma separated with a header row (the cleaned export)
/// * `.tsv`     – tab separated with a header row
/// * `.json`    – `[{ "title": ..., "publish_time": ..., ... }, ...]`
/// * `.parquet` – any column types castable to strings
///
/// Rows whose `publish_time` does not parse are dropped and only counted.
pub fn load_file(path: &Path) -> Result<ArticleDataset, LoadError> {
    if !path.is_file() {
        return Err(LoadError::missing_file(path));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => read_delimited(path, b','),
        "tsv" | "tab" => read_delimited(path, b'\t'),
        "json" => read_json(path),
        "parquet" | "pq" => read_parquet(path),
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let rows = rows.map_err(|err| match err.downcast::<LoadError>() {
        Ok(load_err) => load_err,
        Err(other) => LoadError::Read {
            path: path.to_path_buf(),
            message: format!("{other:#}"),
        },
    })?;

    let dataset = build_dataset(rows);
    log::info!(
        "Loaded {} articles from {} ({} rows dropped for unparseable dates)",
        dataset.len(),
        path.display(),
        dataset.dropped_rows
    );
    Ok(dataset)
}

fn build_dataset(rows: Vec<RawRow>) -> ArticleDataset {
    let mut dropped = 0usize;
    let mut articles = Vec::with_capacity(rows.len());

    for row in rows {
        match row.publish_time.as_deref().and_then(parse_publish_time) {
            Some(date) => articles.push(Article::new(row.title, date, row.journal, row.source)),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!("{dropped} rows had an unparseable publish_time");
    }
    ArticleDataset::from_articles(articles, dropped)
}

fn normalize_cell(value: &str) -> Option<String> {
    if NA_MARKERS.contains(&value) {
        None
    } else {
        Some(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

const DATE_FORMATS: [&str; 6] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y %b %d", "%b %d %Y", "%d %b %Y"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Lenient date parsing: returns `None` for anything that is not a date
/// instead of failing, so the row can be dropped.
pub fn parse_publish_time(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    // Bare year, e.g. "2020"
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i32>().ok().and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    }

    // Year and month, e.g. "2020-03"
    if s.len() == 7 && s.as_bytes()[4] == b'-' {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
            return Some(date);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

// ---------------------------------------------------------------------------
// CSV / TSV reader
// ---------------------------------------------------------------------------

fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<RawRow>> {
    // Short rows are allowed; their missing trailing cells read as absent.
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .context("opening delimited file")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let column = |name: &'static str| -> Result<usize> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: name,
            }
            .into()
        })
    };
    let title_idx = column(TITLE_COLUMN)?;
    let time_idx = column(PUBLISH_TIME_COLUMN)?;
    let journal_idx = column(JOURNAL_COLUMN)?;
    let source_idx = column(SOURCE_COLUMN)?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        let cell = |idx: usize| record.get(idx).and_then(normalize_cell);
        rows.push(RawRow {
            title: cell(title_idx),
            publish_time: cell(time_idx),
            journal: cell(journal_idx),
            source: cell(source_idx),
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn read_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("expected top-level JSON array")?;

    let mut seen_keys: BTreeSet<&str> = BTreeSet::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("row {i} is not a JSON object"))?;
        seen_keys.extend(obj.keys().map(String::as_str));

        let cell = |key: &str| obj.get(key).and_then(json_to_cell);
        rows.push(RawRow {
            title: cell(TITLE_COLUMN),
            publish_time: cell(PUBLISH_TIME_COLUMN),
            journal: cell(JOURNAL_COLUMN),
            source: cell(SOURCE_COLUMN),
        });
    }

    if !records.is_empty() {
        if let Some(column) = REQUIRED_COLUMNS.into_iter().find(|c| !seen_keys.contains(c)) {
            return Err(LoadError::MissingColumn {
                path: path.to_path_buf(),
                column,
            }
            .into());
        }
    }
    Ok(rows)
}

fn json_to_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => normalize_cell(s),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Parquet written by Pandas or Polars.  `publish_time` may be stored as a
/// string, a date, or a timestamp; every column is cast to UTF-8 first.
fn read_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut columns = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for name in REQUIRED_COLUMNS {
            let idx = schema.index_of(name).map_err(|_| LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: name,
            })?;
            let as_text = arrow::compute::cast(batch.column(idx), &DataType::Utf8)
                .with_context(|| format!("casting '{name}' to text"))?;
            columns.push(as_text);
        }

        let [title, time, journal, source] = [&columns[0], &columns[1], &columns[2], &columns[3]]
            .map(|col| col.as_string::<i32>());

        for row in 0..batch.num_rows() {
            let cell = |arr: &arrow::array::StringArray| {
                if arr.is_null(row) {
                    None
                } else {
                    normalize_cell(arr.value(row))
                }
            };
            rows.push(RawRow {
                title: cell(title),
                publish_time: cell(time),
                journal: cell(journal),
                source: cell(source),
            });
        }
    }

    Ok(rows)
}
