/// Data layer: records, loading, and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .ods / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<Student>, sorted by roll
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  mean / median / mode / max / min per field
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ analysis  │  categories, histogram, box, regression → charts
///   └──────────┘
/// ```

pub mod analysis;
pub mod error;
pub mod loader;
pub mod model;
pub mod stats;
