/// Data layer: catalog types, loading, and download targets.
///
/// Architecture:
/// ```text
///    objects.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate columns → Vec<CatalogRow>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  target   │  subclass → Bucket, row → DownloadTarget (dest + URLs)
///   └──────────┘
///        │
///        ▼
///    harvest (fetch loop)
/// ```

pub mod loader;
pub mod model;
pub mod target;
