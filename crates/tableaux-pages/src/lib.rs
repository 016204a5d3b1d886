//! Tableaux Pages - client behavior for server-rendered tableaux tables
//!
//! The server renders table HTML; this crate makes it interactive:
//!
//! - Row selection with shift-click ranges, "select all on page" and
//!   "select all results"
//! - Inline cell editing and row click actions sent as htmx partial updates
//! - Responsive re-rendering when the viewport crosses a breakpoint
//! - Filter controls and select-list dropdowns
//!
//! ## Architecture
//!
//! - [`dom`]: DOM abstraction ([`dom::Dom`]) with a browser and an in-memory
//!   implementation
//! - [`transport`]: partial-update requests ([`transport::Transport`])
//! - [`controller`]: one [`TableController`] per table container
//! - [`registry`]: the [`Tableaux`] registry and page-level signals
//! - [`dropdown`]: select-list open/close rules
//! - [`csrf`]: CSRF token lookup for inline-edit commits
//!
//! Everything is generic over [`dom::Dom`] and [`transport::Transport`], so
//! the same controller code runs against the live page on WASM and against
//! [`dom::MemoryDom`] in native tests.
//!
//! ## Browser entry point
//!
//! On `wasm32` the module start function reads settings from
//! `<script id="tableaux-settings">`, installs the page-wide
//! [`BreakpointService`], binds the page-level signals and initializes every
//! container once the document has loaded.

#![warn(missing_docs)]

pub mod controller;
pub mod csrf;
pub mod dom;
pub mod dropdown;
pub mod registry;
pub mod transport;

pub use controller::TableController;
pub use registry::{Tableaux, settings_from_document};
pub use tableaux_core::{
	BreakpointService, BreakpointTable, Selection, Settings, TableauxError, debug_log, error_log,
	info_log, warn_log,
};

#[cfg(target_arch = "wasm32")]
pub use wasm::start;

/// Converts a thrown JavaScript value into a [`TableauxError`].
#[cfg(target_arch = "wasm32")]
pub(crate) fn js_error(value: wasm_bindgen::JsValue) -> TableauxError {
	use wasm_bindgen::JsCast;

	let message = match value.dyn_ref::<js_sys::Error>() {
		Some(error) => String::from(error.message()),
		None => value.as_string().unwrap_or_else(|| format!("{value:?}")),
	};
	TableauxError::Js(message)
}

#[cfg(target_arch = "wasm32")]
mod wasm {
	use std::cell::RefCell;
	use std::rc::Rc;

	use tableaux_core::{BreakpointService, Settings, error_log, warn_log};
	use wasm_bindgen::prelude::*;

	use crate::dom::{Dom, EventKind, ListenTarget, WebDom, listener};
	use crate::registry::{Tableaux, settings_from_document};
	use crate::transport::HtmxTransport;

	type PageTableaux = Tableaux<WebDom, HtmxTransport>;

	thread_local! {
		static PAGE: RefCell<Option<PageTableaux>> = const { RefCell::new(None) };
	}

	/// Module start: bind tableaux to the current page.
	#[wasm_bindgen(start)]
	pub fn start() -> Result<(), JsValue> {
		#[cfg(feature = "console_error_panic_hook")]
		console_error_panic_hook::set_once();

		let to_js = |err: tableaux_core::TableauxError| JsValue::from_str(&err.to_string());
		let dom = Rc::new(WebDom::new().map_err(to_js)?);
		let settings = settings_from_document(&*dom).unwrap_or_else(|err| {
			warn_log!("{}; using default settings", err);
			Settings::default()
		});

		let service = BreakpointService::install(BreakpointService::new(
			settings.breakpoints.clone(),
			dom.viewport_width(),
		));
		let transport = Rc::new(HtmxTransport::new().map_err(to_js)?);
		let tableaux = Tableaux::new(Rc::clone(&dom), transport, service, Rc::new(settings));
		tableaux.bind_signals();

		if dom.document().ready_state() == "loading" {
			let page = tableaux.clone();
			let body_dom = Rc::clone(&dom);
			dom.listen(
				&ListenTarget::Window,
				EventKind::Load,
				listener(move |_| match body_dom.body() {
					Some(body) => {
						page.init(&body);
					}
					None => error_log!("tableaux: document has no body"),
				}),
			);
		} else if let Some(body) = dom.body() {
			tableaux.init(&body);
		}

		PAGE.with(|slot| *slot.borrow_mut() = Some(tableaux));
		Ok(())
	}
}
