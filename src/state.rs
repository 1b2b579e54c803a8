use std::path::Path;

use crate::config::DashboardConfig;
use crate::data::aggregate::DashboardSummary;
use crate::data::cache::DatasetCache;
use crate::data::filter::{FilterState, FilteredViews, Selection, apply_filters};
use crate::data::model::{Article, ArticleDataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The session state, independent of rendering.
///
/// Event handlers only touch `filters` and then run one full recomputation
/// pass; the dataset itself lives in the load-once cache.
pub struct AppState {
    pub config: DashboardConfig,

    cache: DatasetCache,

    /// `None` until the dataset has loaded.
    pub filters: Option<FilterState>,

    /// Broad and narrow views for the current filters.
    pub views: FilteredViews,

    /// Aggregates for the current filters.
    pub summary: Option<DashboardSummary>,

    /// Load failure shown in place of the dashboard.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = DatasetCache::new(config.data_path.clone());
        Self {
            config,
            cache,
            filters: None,
            views: FilteredViews::default(),
            summary: None,
            status_message: None,
        }
    }

    /// The loaded dataset, if loading succeeded.
    pub fn dataset(&self) -> Option<&ArticleDataset> {
        self.cache.get().ok()
    }

    /// Where the dataset is read from.
    pub fn data_path(&self) -> &Path {
        self.cache.path()
    }

    /// True until the first load attempt has finished, either way.
    pub fn is_loading(&self) -> bool {
        self.filters.is_none() && self.status_message.is_none()
    }

    /// Trigger the one-time load and set up the initial filters.
    /// A failed load is remembered and the dashboard stays empty.
    pub fn ensure_loaded(&mut self) {
        if !self.is_loading() {
            return;
        }
        let initial = match self.cache.get() {
            Ok(ds) => FilterState::initial(ds),
            Err(e) => {
                if e.is_missing_file() {
                    log::warn!("Input file is missing; showing setup instructions");
                }
                self.status_message = Some(e.to_string());
                return;
            }
        };
        self.filters = Some(initial);
        self.refresh();
    }

    /// Recompute both views and every aggregate.
    pub fn refresh(&mut self) {
        let (Ok(ds), Some(filters)) = (self.cache.get(), self.filters.as_ref()) else {
            return;
        };
        self.views = apply_filters(ds, filters);
        self.summary = Some(DashboardSummary::build(
            ds,
            &self.views,
            self.config.summary_limits(),
        ));
        log::debug!(
            "Recomputed dashboard: {} broad, {} narrow ({:?})",
            self.views.broad.len(),
            self.views.narrow.len(),
            filters
        );
    }

    fn update_filters(&mut self, change: impl FnOnce(&mut FilterState)) {
        if let Some(filters) = self.filters.as_mut() {
            change(filters);
            self.refresh();
        }
    }

    pub fn set_year_min(&mut self, year: i32) {
        self.update_filters(|f| f.set_min_year(year));
    }

    pub fn set_year_max(&mut self, year: i32) {
        self.update_filters(|f| f.set_max_year(year));
    }

    pub fn set_journal(&mut self, journal: Selection) {
        self.update_filters(|f| f.journal = journal);
    }

    pub fn set_source(&mut self, source: Selection) {
        self.update_filters(|f| f.source = source);
    }

    /// Full year range and both selectors back to "All".
    pub fn reset_filters(&mut self) {
        if let (Ok(ds), Some(filters)) = (self.cache.get(), self.filters.as_mut()) {
            filters.reset(ds);
        }
        self.refresh();
    }

    /// First rows of the narrow view for the preview table.
    pub fn preview(&self) -> Vec<&Article> {
        match self.dataset() {
            Some(ds) => ds
                .select(&self.views.narrow)
                .take(self.config.preview_rows)
                .collect(),
            None => Vec::new(),
        }
    }
}
