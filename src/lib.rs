#![forbid(unsafe_code)]

//! Line Monitor (lmon): terminal dashboard for two production lines,
//! palletizing and robotic welding.
//!
//! Layers, bottom-up:
//! 1. **Catalog**: compiled-in machines, batches, OEE trend and case studies
//! 2. **Analytics**: pure derivations (OEE, batch progress, grouping, search)
//! 3. **Insight**: templated analysis text behind a ticketed delay
//! 4. **Dashboard**: Elm-style terminal UI (`tui` feature)
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use line_monitor::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use line_monitor::catalog::{bundle, model::ProductionLine};
//! use line_monitor::analytics::oee::overall_oee;
//!
//! let data = bundle(ProductionLine::Palletizing);
//! println!("{:.1}", overall_oee(&data.records));
//! ```

pub mod prelude;

pub mod analytics;
pub mod catalog;
pub mod core;
pub mod insight;
pub mod logger;
#[cfg(feature = "tui")]
pub mod tui;
