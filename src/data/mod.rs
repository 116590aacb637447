/// Data layer: loading, cleaning, filtering and reshaping.
///
/// Architecture:
/// ```text
///   NFHS .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + clean cells → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  load once, share Arc<Table>, reload on change
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  area / region selection → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ reshape   │  pivot / long format / spotlight
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod reshape;
pub mod source;

pub use error::{DataError, DataResult};
pub use filter::{filter_rows, FilterSelection};
pub use loader::{clean_bytes, clean_cell, load, load_from_reader};
pub use model::{Record, Schema, Table, Value};
pub use reshape::{long_format, pivot_by_indicator, spotlight, LongTable, Matrix, Spotlight};
pub use source::DataSource;
