//! One full recomputation of everything the dashboard shows.
//!
//! [`render`] is a pure function of the dataset and the filter; the UI calls
//! it once per interaction and draws from the returned [`DashboardView`].

use anyhow::Result;
use serde::Serialize;

use crate::config::{PREVIEW_ROWS, SCATTER_SIZE_MAX};
use crate::data::export::ExportArtifact;
use crate::data::filter::{filtered_indices, scatter_indices, FilterState};
use crate::data::model::{BechdelScore, Movie, MovieDataset};
use crate::data::stats::{box_summaries, score_counts, BoxSummary, Metrics, ScoreCount};

/// A scatter marker: votes vs rating, coloured by score, sized by runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub votes: f64,
    pub rating: f64,
    pub score: BechdelScore,
    pub runtime_minutes: f64,
    /// Marker diameter in points.
    pub marker_size: f64,
}

/// Everything derived from one (dataset, filter) pair.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub filters: FilterState,
    pub metrics: Metrics,
    pub score_counts: Vec<ScoreCount>,
    pub rating_boxes: Vec<BoxSummary>,
    pub scatter: Vec<ScatterPoint>,
    /// Dataset indices of the filtered rows, source order.
    pub filtered: Vec<usize>,
    /// First rows of the filtered view, for the preview table.
    pub preview: Vec<usize>,
    pub export: ExportArtifact,
}

/// Serializable headline of a [`DashboardView`], used by `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct Summary<'a> {
    pub year_range: (i32, i32),
    pub genre: &'a str,
    pub metrics: &'a Metrics,
    pub insights: [String; 3],
    pub score_counts: &'a [ScoreCount],
    pub rating_boxes: &'a [BoxSummary],
    pub scatter_points: usize,
}

impl DashboardView {
    pub fn summary(&self) -> Summary<'_> {
        Summary {
            year_range: self.filters.year_range,
            genre: self.filters.genre.label(),
            metrics: &self.metrics,
            insights: self.metrics.insights(),
            score_counts: &self.score_counts,
            rating_boxes: &self.rating_boxes,
            scatter_points: self.scatter.len(),
        }
    }
}

/// Recompute metrics, chart inputs, preview and export for `filters`.
pub fn render(dataset: &MovieDataset, filters: &FilterState) -> Result<DashboardView> {
    let filtered = filtered_indices(dataset, filters);
    let rows: Vec<&Movie> = filtered.iter().map(|&i| &dataset.movies[i]).collect();

    let metrics = Metrics::compute(dataset.len(), rows.iter().copied());
    let counts = score_counts(rows.iter().copied());
    let rating_boxes = box_summaries(rows.iter().copied());
    let scatter = scatter_points(dataset, filters);
    let preview = filtered.iter().copied().take(PREVIEW_ROWS).collect();
    let export = ExportArtifact::filtered(dataset, &filtered)?;

    log::debug!(
        "rendered {:?} / {}: {} of {} movies, {} scatter points",
        filters.year_range,
        filters.genre.label(),
        metrics.filtered_movies,
        metrics.total_movies,
        scatter.len()
    );

    Ok(DashboardView {
        filters: filters.clone(),
        metrics,
        score_counts: counts,
        rating_boxes,
        scatter,
        filtered,
        preview,
        export,
    })
}

fn scatter_points(dataset: &MovieDataset, filters: &FilterState) -> Vec<ScatterPoint> {
    let indices = scatter_indices(dataset, filters);
    let max_runtime = indices
        .iter()
        .filter_map(|&i| dataset.movies[i].runtime_minutes)
        .fold(0.0, f64::max);

    indices
        .iter()
        .filter_map(|&i| {
            let m = &dataset.movies[i];
            let (votes, runtime) = (m.num_votes?, m.runtime_minutes?);
            Some(ScatterPoint {
                votes,
                rating: m.imdb_rating,
                score: m.bechdel,
                runtime_minutes: runtime,
                marker_size: marker_size(runtime, max_runtime),
            })
        })
        .collect()
}

/// Area-proportional marker diameter: the longest runtime gets
/// [`SCATTER_SIZE_MAX`].
pub fn marker_size(runtime: f64, max_runtime: f64) -> f64 {
    if max_runtime <= 0.0 || runtime <= 0.0 {
        return 1.0;
    }
    (SCATTER_SIZE_MAX * (runtime / max_runtime).sqrt()).max(1.0)
}
