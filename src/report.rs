//! Headless dashboard runs: `--report` prints the summary as JSON and
//! `--export` writes the filtered CSV, without opening a window.

use std::io::Write;

use anyhow::{Context, Result};

use crate::config::DashboardArgs;
use crate::data::filter::{FilterState, GenreFilter};
use crate::data::loader::load_file;
use crate::data::model::MovieDataset;
use crate::render::{render, DashboardView};

/// The filter a headless run uses. A year bound left off the command line
/// falls back to the dashboard's initial range for `dataset`.
pub fn headless_filters(dataset: &MovieDataset, args: &DashboardArgs) -> FilterState {
    let mut filters = FilterState::initial(dataset);
    let (from, to) = filters.year_range;
    filters.year_range = (args.year_from.unwrap_or(from), args.year_to.unwrap_or(to));
    filters.genre = GenreFilter::from_label(&args.genre);
    filters
}

/// Render once for the filter given on the command line, write the JSON
/// summary to `out` if asked for, and write the filtered CSV if asked for.
pub fn run_headless<W: Write>(args: &DashboardArgs, mut out: W) -> Result<DashboardView> {
    let dataset = load_file(&args.data)?;
    let filters = headless_filters(&dataset, args);
    let view = render(&dataset, &filters)?;

    if args.report {
        serde_json::to_writer_pretty(&mut out, &view.summary()).context("encoding report")?;
        writeln!(out).context("writing report")?;
    }
    if let Some(path) = &args.export {
        std::fs::write(path, &view.export.bytes)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!(
            "Wrote {} filtered movies to {}",
            view.metrics.filtered_movies,
            path.display()
        );
    }
    Ok(view)
}
