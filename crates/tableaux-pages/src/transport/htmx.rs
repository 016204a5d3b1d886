//! `htmx.ajax` transport for the browser.

use js_sys::{Function, JSON, Reflect};
use tableaux_core::{Result, TableauxError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

use super::{AjaxRequest, Transport};
use crate::js_error;

/// Sends requests through the page's global `htmx` object.
#[derive(Debug, Clone)]
pub struct HtmxTransport {
	window: Window,
}

impl HtmxTransport {
	/// Binds to the global window.
	///
	/// # Errors
	///
	/// Fails outside a browser window context.
	pub fn new() -> Result<Self> {
		let window =
			web_sys::window().ok_or_else(|| TableauxError::Js("no global window".to_string()))?;
		Ok(Self { window })
	}

	fn htmx(&self) -> Result<JsValue> {
		let htmx = Reflect::get(&self.window, &JsValue::from_str("htmx")).map_err(js_error)?;
		if htmx.is_undefined() || htmx.is_null() {
			return Err(TableauxError::Js("htmx is not loaded".to_string()));
		}
		Ok(htmx)
	}
}

impl Transport for HtmxTransport {
	fn ajax(&self, request: AjaxRequest) -> Result<()> {
		let htmx = self.htmx()?;
		let ajax: Function = Reflect::get(&htmx, &JsValue::from_str("ajax"))
			.map_err(js_error)?
			.dyn_into()
			.map_err(js_error)?;

		let context = JSON::parse(&request.context_json().to_string()).map_err(js_error)?;
		// The returned promise is dropped; swaps are handled by htmx.
		ajax.call3(
			&htmx,
			&JsValue::from_str(request.method().as_str()),
			&JsValue::from_str(request.url()),
			&context,
		)
		.map_err(js_error)?;
		Ok(())
	}

	fn navigate(&self, url: &str) -> Result<()> {
		self.window.location().assign(url).map_err(js_error)
	}
}
