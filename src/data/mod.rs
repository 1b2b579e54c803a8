/// Data layer: records, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  cleaned_metadata.csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file, derive publish_year → ArticleDataset
///   └──────────┘
///        │  (memoized once by `cache`)
///        ▼
///   ┌──────────┐
///   │  filter  │  year + source → broad view, + journal → narrow view
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  yearly counts, top journals, title words, sources
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod words;
