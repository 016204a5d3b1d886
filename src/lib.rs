//! # Tableaux
//!
//! Client behavior for server-rendered tables. The server renders the table
//! HTML; tableaux binds one controller per `data-controller="tableaux"`
//! container and keeps it interactive across htmx swaps.
//!
//! ## Crates
//!
//! - [`tableaux_core`]: breakpoints, settings, table configuration and selection
//!   values. Builds on every target.
//! - [`tableaux_pages`]: the DOM abstraction, the table controller, the registry and
//!   the browser entry point.
//!
//! ## Feature Flags
//!
//! - `console_error_panic_hook` - readable panics in the browser console
//! - `debug-hooks` - enables `debug_log!` output in debug builds
//!
//! ## Quick Start
//!
//! ```
//! use std::rc::Rc;
//!
//! use tableaux::dom::{MemoryDom, builder::{checkbox, div, span, table, td, tr}};
//! use tableaux::transport::RecordingTransport;
//! use tableaux::{BreakpointService, BreakpointTable, Settings, Tableaux};
//!
//! let dom = Rc::new(MemoryDom::new());
//! dom.mount(
//! 	dom.body_id(),
//! 	div().id("orders").attr("data-controller", "tableaux").children([
//! 		span().class("count"),
//! 		table().child(tr().attr("data-pk", "1").child(td().child(checkbox("select-checkbox", "1")))),
//! 	]),
//! );
//!
//! let tableaux = Tableaux::new(
//! 	Rc::clone(&dom),
//! 	Rc::new(RecordingTransport::new()),
//! 	Rc::new(BreakpointService::new(BreakpointTable::default(), 1024)),
//! 	Rc::new(Settings::default()),
//! );
//! assert_eq!(tableaux.init(&dom.body_id()), 1);
//! ```

pub use tableaux_core;
pub use tableaux_pages;

pub use tableaux_core::{
	Breakpoint, BreakpointService, BreakpointTable, CellId, CellKind, ClickAction, Result,
	Selection, Settings, TableConfig, TableauxError,
};
pub use tableaux_pages::{TableController, Tableaux, settings_from_document};
pub use tableaux_pages::{controller, csrf, dom, dropdown, registry, transport};
