use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use bechdel_dashboard::config::{ALL_GENRES, EXPORT_FILE_NAME};
use bechdel_dashboard::data::filter::GenreFilter;
use bechdel_dashboard::data::stats::display_value;

use crate::state::AppState;
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state below.
    let genres: Vec<String> = dataset.genres.iter().cloned().collect();
    let bounds = dataset.year_bounds;

    // ---- Year range ----
    ui.strong("Year range");
    if let Some((lo, hi)) = bounds {
        let (old_from, old_to) = state.filters.year_range;
        let (mut from, mut to) = (old_from, old_to);
        ui.add(egui::Slider::new(&mut from, lo..=hi).text("from"));
        ui.add(egui::Slider::new(&mut to, lo..=hi).text("to"));

        // Dragging one end past the other pushes the other end along.
        if from != old_from && from > to {
            to = from;
        } else if to != old_to && to < from {
            from = to;
        }
        state.set_year_range(from, to);
    } else {
        ui.label("No years available.");
    }
    ui.separator();

    // ---- Primary genre ----
    ui.strong("Primary genre");
    let current = state.filters.genre.label().to_string();
    let mut chosen = None;
    egui::ComboBox::from_id_salt("genre")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            ScrollArea::vertical().max_height(300.0).show(ui, |ui: &mut Ui| {
                if ui.selectable_label(current == ALL_GENRES, ALL_GENRES).clicked() {
                    chosen = Some(GenreFilter::All);
                }
                for genre in &genres {
                    if ui.selectable_label(current == *genre, genre).clicked() {
                        chosen = Some(GenreFilter::Only(genre.clone()));
                    }
                }
            });
        });
    if let Some(genre) = chosen {
        state.set_genre(genre);
    }
}

// ---------------------------------------------------------------------------
// Central panel – metrics, charts, insights, preview, download
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let (Some(dataset), Some(view)) = (&state.dataset, &state.view) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a cleaned dataset to begin  (File → Open…)");
        });
        return;
    };

    let mut download = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Bechdel Test Dashboard");
            ui.label(
                RichText::new(
                    "Data source: Kaggle - IMDb + Bechdel ratings. \
                     Use the sidebar to filter by year and primary genre.",
                )
                .weak(),
            );
            ui.add_space(8.0);

            // ---- Metrics ----
            let m = &view.metrics;
            ui.columns(3, |cols| {
                metric(&mut cols[0], "Total movies", m.total_movies.to_string());
                metric(&mut cols[1], "Filtered movies", m.filtered_movies.to_string());
                metric(
                    &mut cols[2],
                    "Avg IMDb rating (filtered)",
                    display_value(m.mean_rating, 2),
                );
            });
            ui.separator();

            // ---- Charts ----
            ui.heading("Bechdel rating counts (filtered)");
            plot::score_bar_chart(ui, &view.score_counts, &state.colors);

            ui.heading("IMDb rating by Bechdel score");
            ui.label("Do movies that pass the Bechdel test have higher IMDb ratings?");
            plot::rating_box_plot(ui, &view.rating_boxes, &state.colors);

            ui.heading("Quick insights");
            for line in m.insights() {
                ui.label(line);
            }
            ui.add_space(8.0);

            ui.heading("Votes vs rating (colored by Bechdel score)");
            ui.label("Popularity, rating, and Bechdel score");
            plot::votes_scatter(ui, &view.scatter, &state.colors);
            ui.separator();

            // ---- Table + download ----
            ui.heading("Filtered data preview");
            table::preview_table(ui, dataset, &view.preview);
            ui.add_space(8.0);

            if ui.button("Download filtered data as CSV").clicked() {
                download = true;
            }
        });

    if download {
        save_file_dialog(state);
    }
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.label(RichText::new(label).weak());
    ui.label(RichText::new(value).size(28.0).strong());
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_save = state.view.is_some();
            if ui
                .add_enabled(can_save, egui::Button::new("Save filtered CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(view)) = (&state.dataset, &state.view) {
            ui.label(format!(
                "{} movies loaded, {} visible",
                ds.len(),
                view.metrics.filtered_movies
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open cleaned movie data")
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download filtered data")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.save_export(&path);
    }
}
