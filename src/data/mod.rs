//! Data layer: core types and loading.
//!
//! ```text
//!  *.csv (recursive under INPUT_DIR)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  discover + sniff delimiter + coerce → Curve per file
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ CurveSet  │  Vec<Curve>, filename order
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
