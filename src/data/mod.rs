/// Data layer: catalog types, ingestion, and export.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .csv          .json (exported payload)
///        │                            │
///        ▼                            │
///   ┌──────────┐                      │
///   │ columns   │  header → role      │
///   └──────────┘                      │
///        │                            │
///        ▼                            ▼
///   ┌──────────┐   ┌────────┐   ┌──────────┐
///   │  loader   │──│ limits  │   │ payload   │
///   └──────────┘   └────────┘   └──────────┘
///        │                            │
///        └────────────┬───────────────┘
///                     ▼
///               ┌──────────┐
///               │ Catalog   │  Vec<Course>, limit table
///               └──────────┘
/// ```

pub mod columns;
pub mod limits;
pub mod loader;
pub mod model;
pub mod payload;
