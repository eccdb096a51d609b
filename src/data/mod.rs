/// Data layer: core types and recording loading.
///
/// Architecture:
/// ```text
///  .txt (tab) / .csv (;)
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse table → Recording
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ Recording │  force / aux / displacement / time columns
///   └───────────┘
///        │
///        ▼
///   analysis::pipeline
/// ```

pub mod loader;
pub mod model;
