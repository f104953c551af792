/// Data layer: core types, loading, and the summary operations.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → raw cells → typed Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  process-wide Dataset, loaded on first use
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  summary  │  metrics, describe, distribution, groups, correlation
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod source;
pub mod stats;
pub mod summary;
