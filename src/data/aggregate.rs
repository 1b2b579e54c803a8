use std::collections::{BTreeMap, HashMap};

use super::filter::FilteredViews;
use super::model::{Article, ArticleDataset};
use super::words::{WordWeight, word_frequencies};

/// Number of bars in the top-journals chart.
pub const TOP_JOURNALS: usize = 10;

/// Default cap on distinct words in the title cloud.
pub const MAX_CLOUD_WORDS: usize = 200;

// ---------------------------------------------------------------------------
// Chart-ready aggregates
// ---------------------------------------------------------------------------

/// `(year, articles)`, ascending by year.
pub type YearCount = (i32, usize);

/// `(label, articles)` for the bar charts.
pub type LabelCount = (String, usize);

/// Articles per publication year, ascending.  Every year appears once.
pub fn yearly_counts<'a>(articles: impl IntoIterator<Item = &'a Article>) -> Vec<YearCount> {
    let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
    for a in articles {
        *per_year.entry(a.publish_year).or_default() += 1;
    }
    per_year.into_iter().collect()
}

/// Count present values in first-appearance order.
fn count_in_order<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<LabelCount> {
    let mut counts: Vec<LabelCount> = Vec::new();
    let mut slot: HashMap<&'a str, usize> = HashMap::new();

    for value in values.flatten() {
        match slot.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                slot.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }
    counts
}

/// The `limit` journals with the most articles, descending by count.
/// Ties keep the order in which the journals first appear.
pub fn top_journals<'a>(
    articles: impl IntoIterator<Item = &'a Article>,
    limit: usize,
) -> Vec<LabelCount> {
    let mut counts = count_in_order(articles.into_iter().map(|a| a.journal.as_deref()));
    // sort_by is stable
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}

/// Articles per source, descending by count with ties in first-appearance
/// order.  No limit.
pub fn source_distribution<'a>(articles: impl IntoIterator<Item = &'a Article>) -> Vec<LabelCount> {
    let mut counts = count_in_order(articles.into_iter().map(|a| a.source.as_deref()));
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// All non-empty titles joined by single spaces, or `None` when there are none.
pub fn title_text<'a>(articles: impl IntoIterator<Item = &'a Article>) -> Option<String> {
    let titles: Vec<&str> = articles
        .into_iter()
        .filter_map(|a| a.title.as_deref())
        .filter(|t| !t.is_empty())
        .collect();
    if titles.is_empty() {
        None
    } else {
        Some(titles.join(" "))
    }
}

// ---------------------------------------------------------------------------
// Dashboard summary
// ---------------------------------------------------------------------------

/// What the word-cloud panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum WordCloud {
    /// The selection has no usable titles.
    NoTitles,
    Words(Vec<WordWeight>),
}

/// Limits applied while building a [`DashboardSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLimits {
    pub top_journals: usize,
    pub max_cloud_words: usize,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self {
            top_journals: TOP_JOURNALS,
            max_cloud_words: MAX_CLOUD_WORDS,
        }
    }
}

/// Everything the central panel renders for one filter state.
///
/// A `None` panel means its input view was empty and the UI shows a
/// "no data" message instead of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Size of the narrow view.
    pub selection_size: usize,
    pub yearly: Option<Vec<YearCount>>,
    pub journals: Option<Vec<LabelCount>>,
    pub cloud: WordCloud,
    pub sources: Option<Vec<LabelCount>>,
}

impl DashboardSummary {
    pub fn build(dataset: &ArticleDataset, views: &FilteredViews, limits: SummaryLimits) -> Self {
        let narrow = || dataset.select(&views.narrow);
        let narrow_empty = views.narrow.is_empty();

        let yearly = (!narrow_empty).then(|| yearly_counts(narrow()));
        let journals = (!views.broad.is_empty())
            .then(|| top_journals(dataset.select(&views.broad), limits.top_journals));
        let sources = (!narrow_empty).then(|| source_distribution(narrow()));

        let cloud = match title_text(narrow()) {
            Some(text) => WordCloud::Words(word_frequencies(&text, limits.max_cloud_words)),
            None => WordCloud::NoTitles,
        };

        Self {
            selection_size: views.narrow.len(),
            yearly,
            journals,
            cloud,
            sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{FilterState, Selection, apply_filters};
    use chrono::NaiveDate;

    fn article(year: i32, title: Option<&str>, journal: Option<&str>, source: Option<&str>) -> Article {
        Article::new(
            title.map(str::to_string),
            NaiveDate::from_ymd_opt(year, 3, 1).unwrap(),
            journal.map(str::to_string),
            source.map(str::to_string),
        )
    }

    fn dataset() -> ArticleDataset {
        let mut articles = Vec::new();
        let journals = [
            "J01", "J02", "J03", "J04", "J05", "J06", "J07", "J08", "J09", "J10", "J11", "J12",
        ];
        for (i, j) in journals.iter().enumerate() {
            // J01 gets 1 article, J12 gets 12; J05 and J06 tie after the extras below.
            for k in 0..=i {
                let source = if k % 2 == 0 { "PMC" } else { "Elsevier" };
                articles.push(article(
                    2015 + (k as i32 % 6),
                    Some("Coronavirus transmission in cells"),
                    Some(j),
                    Some(source),
                ));
            }
        }
        articles.push(article(2020, Some(""), None, None));
        articles.push(article(2020, None, Some("J05"), Some("WHO")));
        ArticleDataset::from_articles(articles, 0)
    }

    #[test]
    fn three_record_scenario() {
        let ds = ArticleDataset::from_articles(
            vec![
                article(2020, Some("a"), None, None),
                article(2020, Some("b"), None, None),
                article(2021, Some("c"), None, None),
            ],
            0,
        );
        let mut f = FilterState::initial(&ds);
        f.year_range = (2020, 2020);
        let v = apply_filters(&ds, &f);
        assert_eq!(yearly_counts(ds.select(&v.narrow)), vec![(2020, 2)]);
    }

    #[test]
    fn yearly_counts_are_ascending_and_complete() {
        let ds = dataset();
        let counts = yearly_counts(&ds.articles);
        assert!(counts.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(counts.iter().map(|c| c.1).sum::<usize>(), ds.len());
    }

    #[test]
    fn top_journals_limits_and_orders() {
        let ds = dataset();
        let top = top_journals(&ds.articles, TOP_JOURNALS);
        assert_eq!(top.len(), 10);
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(top.iter().all(|(_, c)| *c <= ds.len()));
        assert_eq!(top[0], ("J12".to_string(), 12));
        // J06 (6) and J05 (5 + 1) tie; J05 appeared first.
        assert_eq!(top[6], ("J05".to_string(), 6));
        assert_eq!(top[7], ("J06".to_string(), 6));
        assert!(top.iter().all(|(j, _)| j != "J01" && j != "J02"));
    }

    #[test]
    fn top_journals_ignore_journal_selection() {
        let ds = dataset();
        let mut f = FilterState::initial(&ds);
        let before = apply_filters(&ds, &f);
        f.journal = Selection::Only("J03".into());
        let after = apply_filters(&ds, &f);

        let limits = SummaryLimits::default();
        let a = DashboardSummary::build(&ds, &before, limits);
        let b = DashboardSummary::build(&ds, &after, limits);
        assert_eq!(a.journals, b.journals);
        assert_eq!(b.selection_size, 3);
        assert_eq!(b.sources, Some(vec![("PMC".to_string(), 2), ("Elsevier".to_string(), 1)]));
    }

    #[test]
    fn source_distribution_orders_by_count_then_appearance() {
        let ds = ArticleDataset::from_articles(
            vec![
                article(2020, None, None, Some("WHO")),
                article(2020, None, None, Some("PMC")),
                article(2020, None, None, Some("PMC")),
                article(2020, None, None, None),
                article(2020, None, None, Some("Medline")),
            ],
            0,
        );
        assert_eq!(
            source_distribution(&ds.articles),
            vec![
                ("PMC".to_string(), 2),
                ("WHO".to_string(), 1),
                ("Medline".to_string(), 1)
            ]
        );
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let none: Vec<Article> = Vec::new();
        assert!(yearly_counts(&none).is_empty());
        assert!(top_journals(&none, TOP_JOURNALS).is_empty());
        assert!(source_distribution(&none).is_empty());
        assert_eq!(title_text(&none), None);
    }

    #[test]
    fn missing_titles_signal_no_titles() {
        let ds = ArticleDataset::from_articles(
            vec![article(2020, None, None, None), article(2021, Some(""), None, None)],
            0,
        );
        let views = apply_filters(&ds, &FilterState::initial(&ds));
        let summary = DashboardSummary::build(&ds, &views, SummaryLimits::default());
        assert_eq!(summary.cloud, WordCloud::NoTitles);
        assert_eq!(summary.selection_size, 2);
    }

    #[test]
    fn title_text_joins_present_titles() {
        let ds = dataset();
        let text = title_text(ds.articles.iter().rev().take(3)).unwrap();
        assert_eq!(text, "Coronavirus transmission in cells");
    }

    #[test]
    fn empty_selection_has_no_panels() {
        let ds = dataset();
        let mut f = FilterState::initial(&ds);
        f.year_range = (1900, 1901);
        let views = apply_filters(&ds, &f);
        let summary = DashboardSummary::build(&ds, &views, SummaryLimits::default());
        assert_eq!(summary.selection_size, 0);
        assert_eq!(summary.yearly, None);
        assert_eq!(summary.journals, None);
        assert_eq!(summary.sources, None);
        assert_eq!(summary.cloud, WordCloud::NoTitles);
    }

    #[test]
    fn cloud_counts_words_of_selection() {
        let ds = dataset();
        let mut f = FilterState::initial(&ds);
        f.journal = Selection::Only("J02".into());
        let views = apply_filters(&ds, &f);
        let summary = DashboardSummary::build(&ds, &views, SummaryLimits::default());
        let WordCloud::Words(words) = summary.cloud else {
            panic!("expected words");
        };
        let top: Vec<(&str, usize)> = words.iter().map(|w| (w.word.as_str(), w.count)).collect();
        assert_eq!(top, vec![("Coronavirus", 2), ("transmission", 2), ("cells", 2)]);
    }
}
