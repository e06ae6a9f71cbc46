//! Interactive terminal dashboard.
//!
//! Elm-style seams: `model` holds state, `update` is the pure reducer,
//! `render` composes frames from `widgets`, and `runtime` owns the terminal,
//! timers and activity log.

#![allow(missing_docs)]

pub mod input;
pub mod model;
pub mod render;
pub mod runtime;
pub mod terminal_guard;
pub mod theme;
pub mod update;
pub mod widgets;

#[cfg(test)]
mod test_properties;
#[cfg(test)]
mod test_scenarios;

pub use runtime::{DashboardRuntimeConfig, run_dashboard};
