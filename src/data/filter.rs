use super::model::{Movie, MovieDataset};
use crate::config::{ALL_GENRES, DEFAULT_YEAR_RANGE};

// ---------------------------------------------------------------------------
// Filter predicate: year range + primary genre
// ---------------------------------------------------------------------------

/// Genre constraint. `All` places no constraint on `genre1`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenreFilter {
    #[default]
    All,
    Only(String),
}

impl GenreFilter {
    /// Interpret a picker label; the "All" sentinel means no constraint.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_GENRES {
            GenreFilter::All
        } else {
            GenreFilter::Only(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            GenreFilter::All => ALL_GENRES,
            GenreFilter::Only(g) => g,
        }
    }

    pub fn matches(&self, movie: &Movie) -> bool {
        match self {
            GenreFilter::All => true,
            GenreFilter::Only(g) => movie.genre.as_deref() == Some(g.as_str()),
        }
    }
}

/// The user's current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Inclusive `(from, to)` year range.
    pub year_range: (i32, i32),
    pub genre: GenreFilter,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            year_range: DEFAULT_YEAR_RANGE,
            genre: GenreFilter::All,
        }
    }
}

impl FilterState {
    /// Initial selection for a dataset: the default range clamped to the
    /// years present, every genre.
    pub fn initial(dataset: &MovieDataset) -> Self {
        let mut state = FilterState::default();
        if let Some(bounds) = dataset.year_bounds {
            state.year_range = clamp_range(DEFAULT_YEAR_RANGE, bounds);
        }
        state
    }

    pub fn in_years(&self, movie: &Movie) -> bool {
        let (from, to) = self.year_range;
        from <= movie.year && movie.year <= to
    }

    pub fn matches(&self, movie: &Movie) -> bool {
        self.in_years(movie) && self.genre.matches(movie)
    }
}

/// Clamp both ends of `range` into `bounds`, keeping `from <= to`.
pub fn clamp_range(range: (i32, i32), bounds: (i32, i32)) -> (i32, i32) {
    let (lo, hi) = bounds;
    let from = range.0.clamp(lo, hi);
    let to = range.1.clamp(lo, hi);
    (from.min(to), to)
}

/// Return indices of movies passing the year range and genre constraint,
/// in source order.
pub fn filtered_indices(dataset: &MovieDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .movies
        .iter()
        .enumerate()
        .filter(|(_, m)| filters.matches(m))
        .map(|(i, _)| i)
        .collect()
}

/// Return indices of movies for the scatter plot: votes and runtime present,
/// inside the year range. The genre constraint is not applied here.
pub fn scatter_indices(dataset: &MovieDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .movies
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_plottable() && filters.in_years(m))
        .map(|(i, _)| i)
        .collect()
}
