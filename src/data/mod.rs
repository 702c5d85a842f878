//! Data layer: core types, loading, filtering, aggregation and export.
//!
//! Architecture:
//! ```text
//!  cleaned_data.csv / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file, coerce numbers, drop incomplete rows
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ MovieDataset  │  Vec<Movie>, genre + year indices
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  year range + genre → filtered indices
//!   └──────────┘
//!        │
//!        ├──────────────┐
//!        ▼              ▼
//!   ┌──────────┐   ┌──────────┐
//!   │  stats    │   │  export   │  metrics / chart inputs, CSV bytes
//!   └──────────┘   └──────────┘
//! ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
