//! Data layer: core types, loading, filtering and aggregation.
//!
//! Nothing here depends on the UI.
//!
//! Architecture:
//! ```text
//!   datos_taller.csv  (utf-8 / windows-1252, ';'-separated)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ encoding  │  bytes → text
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse + clean → Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  group selection → filtered Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  metrics, frequencies, histogram, comments → ReportView
//!   └───────────┘
//! ```

pub mod aggregate;
pub mod encoding;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
