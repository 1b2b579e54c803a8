use std::fmt;

use super::model::{Article, ArticleDataset};

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// Value chosen in a journal/source selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// No filter.
    #[default]
    All,
    /// Exact, case-sensitive match.
    Only(String),
}

impl Selection {
    /// Whether `value` passes this selection.  Absent values only pass `All`.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => value == Some(wanted.as_str()),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Selection::Only(_))
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "All"),
            Selection::Only(v) => write!(f, "{v}"),
        }
    }
}

/// The user's current choices.  `year_range` is inclusive on both ends and
/// always ordered (`.0 <= .1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub year_range: (i32, i32),
    pub journal: Selection,
    pub source: Selection,
}

impl FilterState {
    /// Full year coverage, no journal or source filter.
    pub fn initial(dataset: &ArticleDataset) -> Self {
        Self {
            year_range: dataset.year_bounds().unwrap_or((0, 0)),
            journal: Selection::All,
            source: Selection::All,
        }
    }

    /// Restore the initial values regardless of the current ones.
    pub fn reset(&mut self, dataset: &ArticleDataset) {
        *self = Self::initial(dataset);
    }

    /// Move the lower bound, dragging the upper bound along if needed.
    pub fn set_min_year(&mut self, year: i32) {
        self.year_range.0 = year;
        if self.year_range.1 < year {
            self.year_range.1 = year;
        }
    }

    /// Move the upper bound, dragging the lower bound along if needed.
    pub fn set_max_year(&mut self, year: i32) {
        self.year_range.1 = year;
        if self.year_range.0 > year {
            self.year_range.0 = year;
        }
    }

    fn year_matches(&self, article: &Article) -> bool {
        let (lo, hi) = self.year_range;
        lo <= article.publish_year && article.publish_year <= hi
    }
}

// ---------------------------------------------------------------------------
// Two-stage filter pipeline
// ---------------------------------------------------------------------------

/// The two working views as ordered indices into the dataset.
///
/// `broad` has the year and source filters applied and feeds the top-journals
/// chart, so that chart ignores the journal selector.  `narrow` is `broad`
/// with the journal filter applied and feeds everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredViews {
    pub broad: Vec<usize>,
    pub narrow: Vec<usize>,
}

/// Stage 1: year range, then source.
pub fn broad_indices(dataset: &ArticleDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .articles
        .iter()
        .enumerate()
        .filter(|(_, a)| filters.year_matches(a))
        .filter(|(_, a)| filters.source.matches(a.source.as_deref()))
        .map(|(i, _)| i)
        .collect()
}

/// Stage 2: journal, applied on top of the broad view.
pub fn narrow_indices(dataset: &ArticleDataset, broad: &[usize], filters: &FilterState) -> Vec<usize> {
    if !filters.journal.is_active() {
        return broad.to_vec();
    }
    broad
        .iter()
        .copied()
        .filter(|&i| {
            dataset
                .articles
                .get(i)
                .is_some_and(|a| filters.journal.matches(a.journal.as_deref()))
        })
        .collect()
}

/// Run both stages in their fixed order.
pub fn apply_filters(dataset: &ArticleDataset, filters: &FilterState) -> FilteredViews {
    let broad = broad_indices(dataset, filters);
    let narrow = narrow_indices(dataset, &broad, filters);
    FilteredViews { broad, narrow }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn article(year: i32, journal: Option<&str>, source: Option<&str>) -> Article {
        Article::new(
            Some("t".to_string()),
            NaiveDate::from_ymd_opt(year, 1, 15).unwrap(),
            journal.map(str::to_string),
            source.map(str::to_string),
        )
    }

    fn sample() -> ArticleDataset {
        ArticleDataset::from_articles(
            vec![
                article(2018, Some("Virology"), Some("PMC")),
                article(2019, Some("BMJ"), Some("Elsevier")),
                article(2020, Some("Virology"), Some("Elsevier")),
                article(2020, Some("Lancet"), Some("PMC")),
                article(2020, None, Some("PMC")),
                article(2021, Some("Virology"), None),
                article(2021, Some("BMJ"), Some("pmc")),
            ],
            0,
        )
    }

    fn is_subsequence(sub: &[usize], sup: &[usize]) -> bool {
        let mut it = sup.iter();
        sub.iter().all(|x| it.any(|y| y == x))
    }

    fn states(ds: &ArticleDataset) -> Vec<FilterState> {
        let mut out = Vec::new();
        for range in [(2018, 2021), (2020, 2020), (2019, 2020), (2022, 2023)] {
            for journal in [Selection::All, Selection::Only("Virology".into()), Selection::Only("Nope".into())] {
                for source in [Selection::All, Selection::Only("PMC".into()), Selection::Only("Elsevier".into())] {
                    let mut f = FilterState::initial(ds);
                    f.year_range = range;
                    f.journal = journal.clone();
                    f.source = source;
                    out.push(f);
                }
            }
        }
        out
    }

    #[test]
    fn initial_state_covers_everything() {
        let ds = sample();
        let f = FilterState::initial(&ds);
        assert_eq!(f.year_range, (2018, 2021));
        let views = apply_filters(&ds, &f);
        assert_eq!(views.broad, (0..ds.len()).collect::<Vec<_>>());
        assert_eq!(views.narrow, views.broad);
    }

    #[test]
    fn narrow_within_broad_within_dataset() {
        let ds = sample();
        let all: Vec<usize> = (0..ds.len()).collect();
        for f in states(&ds) {
            let v = apply_filters(&ds, &f);
            assert!(is_subsequence(&v.broad, &all), "{f:?}");
            assert!(is_subsequence(&v.narrow, &v.broad), "{f:?}");
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = sample();
        for f in states(&ds) {
            let once = apply_filters(&ds, &f);
            let twice = apply_filters(&ds, &f);
            assert_eq!(once, twice);

            // Re-filtering the narrow view changes nothing.
            let again = narrow_indices(&ds, &once.narrow, &f);
            assert_eq!(again, once.narrow);
        }
    }

    #[test]
    fn source_is_exact_and_case_sensitive() {
        let ds = sample();
        let mut f = FilterState::initial(&ds);
        f.source = Selection::Only("PMC".into());
        let v = apply_filters(&ds, &f);
        assert_eq!(v.broad, vec![0, 3, 4]);
    }

    #[test]
    fn journal_filter_only_narrows() {
        let ds = sample();
        let mut f = FilterState::initial(&ds);
        f.year_range = (2020, 2021);
        f.journal = Selection::Only("Virology".into());
        let v = apply_filters(&ds, &f);
        assert_eq!(v.broad, vec![2, 3, 4, 5, 6]);
        assert_eq!(v.narrow, vec![2, 5]);
    }

    #[test]
    fn empty_views_are_fine() {
        let ds = sample();
        let mut f = FilterState::initial(&ds);
        f.year_range = (1990, 1995);
        let v = apply_filters(&ds, &f);
        assert!(v.broad.is_empty());
        assert!(v.narrow.is_empty());

        let empty = ArticleDataset::default();
        let v = apply_filters(&empty, &FilterState::initial(&empty));
        assert_eq!(v, FilteredViews::default());
    }

    #[test]
    fn reset_restores_initial_values() {
        let ds = sample();
        let mut f = FilterState::initial(&ds);
        f.set_min_year(2020);
        f.set_max_year(2020);
        f.journal = Selection::Only("BMJ".into());
        f.source = Selection::Only("Elsevier".into());

        f.reset(&ds);
        assert_eq!(f.year_range, (2018, 2021));
        assert_eq!(f.journal, Selection::All);
        assert_eq!(f.source, Selection::All);
    }

    #[test]
    fn year_setters_keep_range_ordered() {
        let ds = sample();
        let mut f = FilterState::initial(&ds);
        f.set_min_year(2021);
        assert_eq!(f.year_range, (2021, 2021));
        f.set_max_year(2019);
        assert_eq!(f.year_range, (2019, 2019));
    }
}
