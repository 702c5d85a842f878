use eframe::egui::{Align, Layout, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use bechdel_dashboard::data::stats::NO_DATA;
use bechdel_dashboard::MovieDataset;

/// Render the first filtered rows with every column of the dataset.
pub fn preview_table(ui: &mut Ui, dataset: &MovieDataset, rows: &[usize]) {
    if rows.is_empty() {
        ui.label(NO_DATA);
        return;
    }

    ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(false)
                .cell_layout(Layout::left_to_right(Align::Center))
                .columns(Column::auto().at_least(60.0).clip(true), dataset.headers.len())
                .header(20.0, |mut header| {
                    for name in &dataset.headers {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|mut body| {
                    for &i in rows {
                        body.row(18.0, |mut row| {
                            for cell in &dataset.movies[i].fields {
                                row.col(|ui: &mut Ui| {
                                    ui.label(cell);
                                });
                            }
                        });
                    }
                });
        });
}
