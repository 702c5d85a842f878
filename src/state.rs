use std::path::Path;

use bechdel_dashboard::color::ScoreColors;
use bechdel_dashboard::data::filter::{clamp_range, FilterState, GenreFilter};
use bechdel_dashboard::data::loader::load_file;
use bechdel_dashboard::{render, DashboardView, MovieDataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is opened).
    pub dataset: Option<MovieDataset>,

    /// Current year range and genre selection.
    pub filters: FilterState,

    /// Everything derived from `dataset` and `filters` (cached until the
    /// filters change).
    pub view: Option<DashboardView>,

    /// Colours per Bechdel score, shared by the charts.
    pub colors: ScoreColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            filters: FilterState::default(),
            view: None,
            colors: ScoreColors::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Load `path` and make it the current dataset. Failures end up in
    /// `status_message`.
    pub fn open(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and reset the filters.
    pub fn set_dataset(&mut self, dataset: MovieDataset) {
        self.filters = FilterState::initial(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the view for the current filters.
    pub fn refresh(&mut self) {
        let Some(ds) = &self.dataset else {
            self.view = None;
            return;
        };
        match render(ds, &self.filters) {
            Ok(view) => self.view = Some(view),
            Err(e) => {
                log::error!("Failed to render view: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Set the year range, keeping it inside the dataset and ordered.
    pub fn set_year_range(&mut self, from: i32, to: i32) {
        let mut range = (from.min(to), from.max(to));
        if let Some(bounds) = self.dataset.as_ref().and_then(|ds| ds.year_bounds) {
            range = clamp_range(range, bounds);
        }
        if range != self.filters.year_range {
            self.filters.year_range = range;
            self.refresh();
        }
    }

    pub fn set_genre(&mut self, genre: GenreFilter) {
        if genre != self.filters.genre {
            self.filters.genre = genre;
            self.refresh();
        }
    }

    /// Write the current export artifact to `path`.
    pub fn save_export(&mut self, path: &Path) {
        let Some(view) = &self.view else {
            return;
        };
        match std::fs::write(path, &view.export.bytes) {
            Ok(()) => {
                log::info!(
                    "Saved {} filtered movies to {}",
                    view.metrics.filtered_movies,
                    path.display()
                );
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to save {}: {e}", path.display());
                self.status_message = Some(format!("Error: could not save {}: {e}", path.display()));
            }
        }
    }
}
