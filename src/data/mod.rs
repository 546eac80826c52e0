/// Data layer: core types, loading, filtering and export.
///
/// Architecture:
/// ```text
///  .csv / .tsv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (schema-checked)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  Vec<AudioAsset>, header order
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria → matching indices
///   └──────────┘
///        │
///        ├──► summary   counts, means, distributions
///        └──► writer    matching rows → .csv / .tsv
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
pub mod writer;

pub use error::CatalogError;
pub use filter::{filter_table, filtered_indices, FilterCriteria, NumericRange};
pub use model::{AudioAsset, CellValue, Column, Table, YesNo};
pub use summary::{value_counts, Summary};
