//! egui rendering: panels and controls, charts, and the preview table.

pub mod panels;
pub mod plot;
pub mod table;
