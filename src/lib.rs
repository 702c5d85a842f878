//! Bechdel dashboard core: dataset loading, filtering, aggregation and export.
//!
//! The `bechdel-dashboard` binary wraps these in an egui front-end and the
//! `ingest` binary produces the cleaned CSV the dashboard reads.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod ingest;
pub mod render;
pub mod report;

pub use data::filter::{FilterState, GenreFilter};
pub use data::model::{BechdelScore, Movie, MovieDataset};
pub use error::DataError;
pub use render::{render, DashboardView};
