use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{BechdelScore, Movie};

/// Label shown in place of an aggregate over no rows.
pub const NO_DATA: &str = "no data";

// ---------------------------------------------------------------------------
// Scalar metrics
// ---------------------------------------------------------------------------

/// Headline numbers for the current filter. Means and rates are `None` when
/// there is nothing to average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total_movies: usize,
    pub filtered_movies: usize,
    /// Mean IMDb rating of the filtered view, 2 dp.
    pub mean_rating: Option<f64>,
    /// Share of the filtered view scoring 3, as a percentage with 1 dp.
    pub pass_rate: Option<f64>,
    /// Mean IMDb rating of movies scoring 3, 2 dp.
    pub mean_rating_pass: Option<f64>,
    /// Mean IMDb rating of movies scoring 0, 2 dp.
    pub mean_rating_fail: Option<f64>,
}

impl Metrics {
    pub fn compute<'a>(total_movies: usize, filtered: impl IntoIterator<Item = &'a Movie>) -> Self {
        let filtered: Vec<&Movie> = filtered.into_iter().collect();

        let passes = filtered.iter().filter(|m| m.bechdel == BechdelScore::PASS).count();
        let pass_rate = (!filtered.is_empty())
            .then(|| round_to(passes as f64 / filtered.len() as f64 * 100.0, 1));

        Metrics {
            total_movies,
            filtered_movies: filtered.len(),
            mean_rating: mean(filtered.iter().map(|m| m.imdb_rating)).map(|v| round_to(v, 2)),
            pass_rate,
            mean_rating_pass: mean_rating_for(&filtered, BechdelScore::PASS),
            mean_rating_fail: mean_rating_for(&filtered, BechdelScore::FAIL),
        }
    }

    /// The three "quick insight" sentences.
    pub fn insights(&self) -> [String; 3] {
        let pass_rate = match self.pass_rate {
            Some(v) => format!("{v:.1}%"),
            None => NO_DATA.to_string(),
        };
        [
            format!("• Bechdel score 3 (full pass) share in current filter: {pass_rate}."),
            format!(
                "• Avg IMDb rating (pass=3): {}",
                display_value(self.mean_rating_pass, 2)
            ),
            format!(
                "• Avg IMDb rating (fail=0): {}",
                display_value(self.mean_rating_fail, 2)
            ),
        ]
    }
}

fn mean_rating_for(movies: &[&Movie], score: BechdelScore) -> Option<f64> {
    let ratings = movies
        .iter()
        .filter(|m| m.bechdel == score)
        .map(|m| m.imdb_rating);
    mean(ratings).map(|v| round_to(v, 2))
}

/// Format an optional aggregate with fixed decimals, or [`NO_DATA`].
pub fn display_value(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => NO_DATA.to_string(),
    }
}

/// Arithmetic mean; `None` for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Round to `decimals` places, exact halves going to the even digit
/// (7.125 → 7.12, 6.25 → 6.2).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

// ---------------------------------------------------------------------------
// Score frequencies (bar chart)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreCount {
    pub score: BechdelScore,
    pub count: usize,
}

/// Count movies per Bechdel score. Only scores that occur are listed,
/// ascending by score.
pub fn score_counts<'a>(movies: impl IntoIterator<Item = &'a Movie>) -> Vec<ScoreCount> {
    let mut counts: BTreeMap<BechdelScore, usize> = BTreeMap::new();
    for m in movies {
        *counts.entry(m.bechdel).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(score, count)| ScoreCount { score, count })
        .collect()
}

// ---------------------------------------------------------------------------
// Box summaries (box plot)
// ---------------------------------------------------------------------------

/// Five-number summary of IMDb ratings for one Bechdel score.
///
/// Whiskers reach the most extreme ratings within 1.5 × IQR of the
/// quartiles; anything beyond is listed in `outliers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub score: BechdelScore,
    pub count: usize,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Rating distribution per Bechdel score, ascending by score.
pub fn box_summaries<'a>(movies: impl IntoIterator<Item = &'a Movie>) -> Vec<BoxSummary> {
    let mut groups: BTreeMap<BechdelScore, Vec<f64>> = BTreeMap::new();
    for m in movies {
        groups.entry(m.bechdel).or_default().push(m.imdb_rating);
    }

    groups
        .into_iter()
        .filter_map(|(score, mut ratings)| {
            ratings.sort_by(f64::total_cmp);
            let q1 = quantile(&ratings, 0.25)?;
            let median = quantile(&ratings, 0.5)?;
            let q3 = quantile(&ratings, 0.75)?;
            let fence = 1.5 * (q3 - q1);
            let (lo_fence, hi_fence) = (q1 - fence, q3 + fence);

            let inside = ratings.iter().copied().filter(|r| (lo_fence..=hi_fence).contains(r));
            let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
            let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
            let outliers = ratings
                .iter()
                .copied()
                .filter(|r| !(lo_fence..=hi_fence).contains(r))
                .collect();

            Some(BoxSummary {
                score,
                count: ratings.len(),
                lower_whisker,
                q1,
                median,
                q3,
                upper_whisker,
                outliers,
            })
        })
        .collect()
}

/// Linearly interpolated quantile of sorted values.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(score: u8, rating: f64) -> Movie {
        Movie {
            year: 2000,
            genre: None,
            runtime_minutes: None,
            num_votes: None,
            imdb_rating: rating,
            bechdel: BechdelScore::new(score).unwrap(),
            fields: Vec::new(),
        }
    }

    #[test]
    fn worked_example() {
        let movies = [movie(3, 8.0), movie(3, 6.0), movie(0, 5.0)];
        let m = Metrics::compute(10, &movies);
        assert_eq!(m.total_movies, 10);
        assert_eq!(m.filtered_movies, 3);
        assert_eq!(m.pass_rate, Some(66.7));
        assert_eq!(m.mean_rating_pass, Some(7.0));
        assert_eq!(m.mean_rating_fail, Some(5.0));
        assert_eq!(m.mean_rating, Some(6.33));

        let [rate, pass, fail] = m.insights();
        assert!(rate.ends_with("66.7%."));
        assert!(pass.ends_with("7.00"));
        assert!(fail.ends_with("5.00"));
    }

    #[test]
    fn empty_view_reports_no_data() {
        let m = Metrics::compute(5, &Vec::<Movie>::new());
        assert_eq!(m.filtered_movies, 0);
        assert_eq!(m.mean_rating, None);
        assert_eq!(m.pass_rate, None);
        assert_eq!(display_value(m.mean_rating, 2), NO_DATA);
        assert!(m.insights().iter().all(|line| line.contains(NO_DATA)));
        assert!(score_counts(&Vec::<Movie>::new()).is_empty());
        assert!(box_summaries(&Vec::<Movie>::new()).is_empty());
    }

    #[test]
    fn missing_fail_group_is_no_data() {
        let m = Metrics::compute(2, &vec![movie(3, 9.0), movie(2, 4.0)]);
        assert_eq!(m.pass_rate, Some(50.0));
        assert_eq!(m.mean_rating_fail, None);
    }

    #[test]
    fn counts_only_present_scores() {
        let movies = [movie(3, 1.0), movie(1, 1.0), movie(3, 1.0)];
        assert_eq!(
            score_counts(&movies),
            vec![
                ScoreCount { score: BechdelScore::new(1).unwrap(), count: 1 },
                ScoreCount { score: BechdelScore::PASS, count: 2 },
            ]
        );
    }

    #[test]
    fn quantiles_interpolate() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&v, 0.0), Some(1.0));
        assert_eq!(quantile(&v, 0.5), Some(2.5));
        assert_eq!(quantile(&v, 0.25), Some(1.75));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn box_summary_flags_outliers() {
        let movies: Vec<Movie> = [6.0, 6.5, 7.0, 7.5, 8.0, 1.0]
            .iter()
            .map(|&r| movie(2, r))
            .collect();
        let boxes = box_summaries(&movies);
        assert_eq!(boxes.len(), 1);
        let b = &boxes[0];
        assert_eq!(b.count, 6);
        assert_eq!(b.median, 6.75);
        assert_eq!(b.outliers, vec![1.0]);
        assert_eq!(b.lower_whisker, 6.0);
        assert_eq!(b.upper_whisker, 8.0);
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(66.666, 1), 66.7);
        assert_eq!(round_to(6.333, 2), 6.33);
        assert_eq!(round_to(7.125, 2), 7.12);
        assert_eq!(round_to(6.25, 1), 6.2);
        assert_eq!(round_to(6.35 + 0.001, 1), 6.4);
    }

    #[test]
    fn exact_halves_round_to_even() {
        let pair = [movie(3, 7.0), movie(1, 7.25)];
        let m = Metrics::compute(2, &pair);
        assert_eq!(m.mean_rating, Some(7.12));
        assert_eq!(display_value(m.mean_rating, 2), "7.12");

        let mut sixteen: Vec<Movie> = (0..15).map(|_| movie(0, 5.0)).collect();
        sixteen.push(movie(3, 8.0));
        let m = Metrics::compute(16, &sixteen);
        assert_eq!(m.pass_rate, Some(6.2));
        assert!(m.insights()[0].contains("6.2%"));
    }
}
