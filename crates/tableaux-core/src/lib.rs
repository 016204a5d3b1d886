//! Tableaux Core - target-independent pieces of the tableaux client
//!
//! This crate holds everything the tableaux table controller needs that does
//! not touch the browser:
//!
//! - [`breakpoint`]: breakpoint table and the page-wide [`BreakpointService`]
//! - [`settings`]: page-level DOM names and thresholds ([`Settings`])
//! - [`table`]: per-table row-click configuration ([`TableConfig`])
//! - [`selection`]: derived row selection values
//! - [`ids`]: ids synthesized for in-place cell requests
//! - [`logging`]: `debug_log!`, `info_log!`, `warn_log!`, `error_log!`
//! - [`error`]: [`TableauxError`] and the [`Result`] alias
//!
//! The browser-facing controller lives in `tableaux-pages`.

#![warn(missing_docs)]

pub mod breakpoint;
pub mod error;
pub mod ids;
pub mod logging;
pub mod selection;
pub mod settings;
pub mod table;

pub use breakpoint::{Breakpoint, BreakpointService, BreakpointTable, SubscriptionId};
pub use error::{Result, TableauxError};
pub use ids::{CellId, CellKind};
pub use selection::Selection;
pub use settings::Settings;
pub use table::{ClickAction, TableConfig};
