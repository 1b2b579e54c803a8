use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Article – one row of the cleaned metadata table
// ---------------------------------------------------------------------------

/// A single article record with a successfully parsed publication date.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: Option<String>,
    pub publish_time: NaiveDate,
    /// Derived from `publish_time`, never read from the file.
    pub publish_year: i32,
    pub journal: Option<String>,
    /// The `source_x` column.
    pub source: Option<String>,
}

impl Article {
    /// Build a record, deriving `publish_year` from the date.
    pub fn new(
        title: Option<String>,
        publish_time: NaiveDate,
        journal: Option<String>,
        source: Option<String>,
    ) -> Self {
        Self {
            title,
            publish_year: publish_time.year(),
            publish_time,
            journal,
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// ArticleDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The immutable dataset with pre-computed option lists for the filter widgets.
#[derive(Debug, Clone, Default)]
pub struct ArticleDataset {
    /// All dated articles in file order.
    pub articles: Vec<Article>,
    /// Sorted unique journal names (absent values excluded).
    pub journals: Vec<String>,
    /// Sorted unique source names (absent values excluded).
    pub sources: Vec<String>,
    /// Rows discarded because `publish_time` did not parse.
    pub dropped_rows: usize,
}

impl ArticleDataset {
    /// Build option lists from the loaded articles.
    pub fn from_articles(articles: Vec<Article>, dropped_rows: usize) -> Self {
        let mut journals: BTreeSet<String> = BTreeSet::new();
        let mut sources: BTreeSet<String> = BTreeSet::new();

        for article in &articles {
            if let Some(j) = &article.journal {
                journals.insert(j.clone());
            }
            if let Some(s) = &article.source {
                sources.insert(s.clone());
            }
        }

        ArticleDataset {
            articles,
            journals: journals.into_iter().collect(),
            sources: sources.into_iter().collect(),
            dropped_rows,
        }
    }

    /// Inclusive `(min_year, max_year)`, or `None` when nothing survived loading.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut years = self.articles.iter().map(|a| a.publish_year);
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }

    /// Resolve a view (list of indices) back into records.
    pub fn select<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a Article> + 'a {
        indices.iter().filter_map(move |&i| self.articles.get(i))
    }

    /// Number of articles.
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(year: i32, journal: Option<&str>, source: Option<&str>) -> Article {
        Article::new(
            Some(format!("Paper from {year}")),
            NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
            journal.map(str::to_string),
            source.map(str::to_string),
        )
    }

    #[test]
    fn year_is_derived_from_date() {
        let a = article(2019, None, None);
        assert_eq!(a.publish_year, 2019);
    }

    #[test]
    fn option_lists_are_sorted_and_skip_absent() {
        let ds = ArticleDataset::from_articles(
            vec![
                article(2020, Some("Virology"), Some("PMC")),
                article(2021, None, Some("Elsevier")),
                article(2020, Some("BMJ"), None),
                article(2019, Some("Virology"), Some("PMC")),
            ],
            3,
        );
        assert_eq!(ds.journals, vec!["BMJ", "Virology"]);
        assert_eq!(ds.sources, vec!["Elsevier", "PMC"]);
        assert_eq!(ds.year_bounds(), Some((2019, 2021)));
        assert_eq!(ds.dropped_rows, 3);
    }

    #[test]
    fn empty_dataset_has_no_year_bounds() {
        let ds = ArticleDataset::from_articles(Vec::new(), 0);
        assert!(ds.is_empty());
        assert_eq!(ds.year_bounds(), None);
    }
}
