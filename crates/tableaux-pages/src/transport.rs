//! Partial-update transport
//!
//! Controllers never fetch anything themselves. They describe a request as
//! an [`AjaxRequest`] and hand it to a [`Transport`]; the browser transport
//! forwards it to `htmx.ajax`, which performs the request and swaps the
//! response into the page. Requests are fire-and-forget.

mod recording;
#[cfg(target_arch = "wasm32")]
mod htmx;

#[cfg(target_arch = "wasm32")]
pub use htmx::HtmxTransport;
pub use recording::{RecordingTransport, Sent};

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tableaux_core::Result;

/// HTTP method of a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
}

impl Method {
	/// Method name as htmx expects it.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
		}
	}
}

impl fmt::Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// How the response replaces the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Swap {
	/// Replace the target's children.
	#[serde(rename = "innerHTML")]
	InnerHtml,
	/// Replace the target element itself.
	#[serde(rename = "outerHTML")]
	OuterHtml,
}

/// A partial-page request.
///
/// Serializes to the htmx `ajax` context object (`source`, `target`,
/// `swap`, `values`, `headers`); method and URL are passed separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AjaxRequest {
	#[serde(skip)]
	method: Method,
	#[serde(skip)]
	url: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	source: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	target: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	swap: Option<Swap>,
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	values: BTreeMap<String, String>,
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	headers: BTreeMap<String, String>,
}

impl AjaxRequest {
	/// Creates a request. An empty URL means the current page.
	pub fn new(method: Method, url: impl Into<String>) -> Self {
		Self {
			method,
			url: url.into(),
			source: None,
			target: None,
			swap: None,
			values: BTreeMap::new(),
			headers: BTreeMap::new(),
		}
	}

	/// `GET` request.
	pub fn get(url: impl Into<String>) -> Self {
		Self::new(Method::Get, url)
	}

	/// `POST` request.
	pub fn post(url: impl Into<String>) -> Self {
		Self::new(Method::Post, url)
	}

	/// Sets the source element selector.
	pub fn source(mut self, selector: impl Into<String>) -> Self {
		self.source = Some(selector.into());
		self
	}

	/// Sets the target selector, or clears it with `None`.
	pub fn target(mut self, selector: Option<String>) -> Self {
		self.target = selector;
		self
	}

	/// Uses the same selector for source and target.
	pub fn element(self, selector: impl Into<String>) -> Self {
		let selector = selector.into();
		self.source(selector.clone()).target(Some(selector))
	}

	/// Sets the swap style.
	pub fn swap(mut self, swap: Swap) -> Self {
		self.swap = Some(swap);
		self
	}

	/// Adds a request parameter. A repeated name keeps the last value.
	pub fn value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.values.insert(name.into(), value.into());
		self
	}

	/// Adds request parameters.
	pub fn values<I, K, V>(mut self, values: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.values
			.extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
		self
	}

	/// Adds a request header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());
		self
	}

	/// Request method.
	pub fn method(&self) -> Method {
		self.method
	}

	/// Request URL (empty for the current page).
	pub fn url(&self) -> &str {
		&self.url
	}

	/// Source element selector.
	pub fn source_selector(&self) -> Option<&str> {
		self.source.as_deref()
	}

	/// Target selector.
	pub fn target_selector(&self) -> Option<&str> {
		self.target.as_deref()
	}

	/// Swap style.
	pub fn swap_style(&self) -> Option<Swap> {
		self.swap
	}

	/// Request parameters.
	pub fn parameters(&self) -> &BTreeMap<String, String> {
		&self.values
	}

	/// Request headers.
	pub fn headers(&self) -> &BTreeMap<String, String> {
		&self.headers
	}

	/// The htmx `ajax` context object.
	pub fn context_json(&self) -> serde_json::Value {
		serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
	}
}

/// Issues partial updates and navigations on behalf of controllers.
pub trait Transport {
	/// Sends a partial-update request.
	fn ajax(&self, request: AjaxRequest) -> Result<()>;

	/// Performs a full page navigation.
	fn navigate(&self, url: &str) -> Result<()>;
}
