use std::collections::BTreeMap;

use eframe::egui::{Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points};

use bechdel_dashboard::color::ScoreColors;
use bechdel_dashboard::data::model::BechdelScore;
use bechdel_dashboard::data::stats::{BoxSummary, ScoreCount};
use bechdel_dashboard::render::ScatterPoint;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Bar chart: movies per Bechdel score
// ---------------------------------------------------------------------------

/// One bar per score present in the filtered view. An empty view draws empty
/// axes.
pub fn score_bar_chart(ui: &mut Ui, counts: &[ScoreCount], colors: &ScoreColors) {
    let bars: Vec<Bar> = counts
        .iter()
        .map(|c| {
            Bar::new(c.score.value() as f64, c.count as f64)
                .width(0.6)
                .name(format!("Bechdel {}", c.score))
                .fill(colors.color_for(c.score))
        })
        .collect();

    Plot::new("score_counts")
        .height(CHART_HEIGHT)
        .x_axis_label("bechdel_rating")
        .y_axis_label("count")
        .include_x(-0.5)
        .include_x(3.5)
        .include_y(0.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Box plot: IMDb rating per Bechdel score
// ---------------------------------------------------------------------------

pub fn rating_box_plot(ui: &mut Ui, boxes: &[BoxSummary], colors: &ScoreColors) {
    Plot::new("rating_boxes")
        .height(CHART_HEIGHT)
        .x_axis_label("Bechdel score (0–3)")
        .y_axis_label("IMDb rating")
        .include_x(-0.5)
        .include_x(3.5)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for b in boxes {
                let color = colors.color_for(b.score);
                let x = b.score.value() as f64;
                let elem = BoxElem::new(
                    x,
                    BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
                )
                .name(format!("Bechdel {} (n={})", b.score, b.count))
                .box_width(0.5)
                .fill(color.gamma_multiply(0.3))
                .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]));

                if !b.outliers.is_empty() {
                    let points: PlotPoints = b.outliers.iter().map(|&r| [x, r]).collect();
                    plot_ui.points(Points::new(points).radius(2.5).color(color));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter: votes vs rating, coloured by score, sized by runtime
// ---------------------------------------------------------------------------

pub fn votes_scatter(ui: &mut Ui, points: &[ScatterPoint], colors: &ScoreColors) {
    // Group markers of equal colour and (rounded) diameter into one
    // series each; egui_plot sizes a whole series at once.
    let mut series: BTreeMap<(BechdelScore, u32), Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        let diameter = p.marker_size.round() as u32;
        series
            .entry((p.score, diameter))
            .or_default()
            .push([p.votes, p.rating]);
    }

    Plot::new("votes_scatter")
        .height(CHART_HEIGHT * 1.5)
        .legend(Legend::default())
        .x_axis_label("Number of votes")
        .y_axis_label("imdbAverageRating")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for ((score, diameter), xy) in series {
                let color = colors.color_for(score).gamma_multiply(0.7);
                plot_ui.points(
                    Points::new(PlotPoints::from(xy))
                        .name(format!("Bechdel {score}"))
                        .radius(diameter as f32 / 2.0)
                        .filled(true)
                        .color(color),
                );
            }
        });
}
