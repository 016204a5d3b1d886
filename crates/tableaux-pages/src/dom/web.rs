//! Browser [`Dom`] implementation backed by `web_sys`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tableaux_core::{Result, TableauxError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
	Document, Element, EventTarget, HtmlElement, HtmlFormElement, HtmlInputElement, Window,
};

use super::{Dom, DomEvent, EventKind, ListenTarget, Listener, ListenerId, Selector};
use crate::js_error;

struct WebListener {
	target: EventTarget,
	kind: String,
	closure: Closure<dyn FnMut(web_sys::Event)>,
}

/// The live browser document.
pub struct WebDom {
	window: Window,
	document: Document,
	listeners: RefCell<HashMap<ListenerId, WebListener>>,
	next_id: Cell<u64>,
}

impl std::fmt::Debug for WebDom {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("WebDom")
			.field("listeners", &self.listeners.borrow().len())
			.finish()
	}
}

impl WebDom {
	/// Binds to `window.document`.
	///
	/// # Errors
	///
	/// Fails outside a browser window context (e.g. in a worker).
	pub fn new() -> Result<Self> {
		let window =
			web_sys::window().ok_or_else(|| TableauxError::Js("no global window".to_string()))?;
		let document = window
			.document()
			.ok_or_else(|| TableauxError::Js("window has no document".to_string()))?;
		Ok(Self {
			window,
			document,
			listeners: RefCell::new(HashMap::new()),
			next_id: Cell::new(1),
		})
	}

	/// The underlying document.
	pub fn document(&self) -> &Document {
		&self.document
	}

	fn event_target(&self, target: &ListenTarget<Element>) -> EventTarget {
		match target {
			ListenTarget::Node(element) => element.clone().unchecked_into(),
			ListenTarget::Document => self.document.clone().unchecked_into(),
			ListenTarget::Window => self.window.clone().unchecked_into(),
		}
	}

	fn input(node: &Element) -> Option<&HtmlInputElement> {
		node.dyn_ref::<HtmlInputElement>()
	}
}

fn convert_event(kind: &EventKind, event: &web_sys::Event) -> DomEvent<Element> {
	let target = event.target().and_then(|t| t.dyn_into::<Element>().ok());
	let mut converted = DomEvent::new(kind.clone(), target);
	if let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() {
		converted.shift_key = mouse.shift_key();
	}
	if let Some(keyboard) = event.dyn_ref::<web_sys::KeyboardEvent>() {
		converted.key = Some(keyboard.key());
	}
	if let Some(custom) = event.dyn_ref::<web_sys::CustomEvent>() {
		converted.detail = js_sys::JSON::stringify(&custom.detail())
			.ok()
			.and_then(|json| json.as_string())
			.and_then(|json| serde_json::from_str(&json).ok());
	}
	converted
}

impl Dom for WebDom {
	type Node = Element;

	fn body(&self) -> Option<Element> {
		self.document.body().map(Into::into)
	}

	fn get_by_id(&self, id: &str) -> Option<Element> {
		self.document.get_element_by_id(id)
	}

	fn query_all(&self, root: &Element, selector: &Selector) -> Vec<Element> {
		let Ok(list) = root.query_selector_all(&selector.to_css()) else {
			return Vec::new();
		};
		(0..list.length())
			.filter_map(|i| list.item(i))
			.filter_map(|node| node.dyn_into::<Element>().ok())
			.collect()
	}

	fn query(&self, root: &Element, selector: &Selector) -> Option<Element> {
		root.query_selector(&selector.to_css()).ok().flatten()
	}

	fn matches(&self, node: &Element, selector: &Selector) -> bool {
		node.matches(&selector.to_css()).unwrap_or(false)
	}

	fn closest(&self, node: &Element, selector: &Selector) -> Option<Element> {
		node.closest(&selector.to_css()).ok().flatten()
	}

	fn parent(&self, node: &Element) -> Option<Element> {
		node.parent_element()
	}

	fn children(&self, node: &Element) -> Vec<Element> {
		let children = node.children();
		(0..children.length())
			.filter_map(|i| children.item(i))
			.collect()
	}

	fn is_connected(&self, node: &Element) -> bool {
		node.is_connected()
	}

	fn tag_name(&self, node: &Element) -> String {
		node.tag_name().to_ascii_lowercase()
	}

	fn attribute(&self, node: &Element, name: &str) -> Option<String> {
		node.get_attribute(name)
	}

	fn set_attribute(&self, node: &Element, name: &str, value: &str) {
		let _ = node.set_attribute(name, value);
	}

	fn remove_attribute(&self, node: &Element, name: &str) {
		let _ = node.remove_attribute(name);
	}

	fn has_class(&self, node: &Element, class: &str) -> bool {
		node.class_list().contains(class)
	}

	fn add_class(&self, node: &Element, class: &str) {
		let _ = node.class_list().add_1(class);
	}

	fn remove_class(&self, node: &Element, class: &str) {
		let _ = node.class_list().remove_1(class);
	}

	fn toggle_class(&self, node: &Element, class: &str) -> bool {
		node.class_list().toggle(class).unwrap_or(false)
	}

	fn is_checked(&self, node: &Element) -> bool {
		Self::input(node).is_some_and(HtmlInputElement::checked)
	}

	fn set_checked(&self, node: &Element, checked: bool) {
		if let Some(input) = Self::input(node) {
			input.set_checked(checked);
		}
	}

	fn is_disabled(&self, node: &Element) -> bool {
		match Self::input(node) {
			Some(input) => input.disabled(),
			None => node.has_attribute("disabled"),
		}
	}

	fn set_disabled(&self, node: &Element, disabled: bool) {
		match Self::input(node) {
			Some(input) => input.set_disabled(disabled),
			// Buttons, selects and fieldsets honor the attribute.
			None if disabled => {
				let _ = node.set_attribute("disabled", "");
			}
			None => {
				let _ = node.remove_attribute("disabled");
			}
		}
	}

	fn value(&self, node: &Element) -> String {
		match Self::input(node) {
			Some(input) => input.value(),
			None => node.get_attribute("value").unwrap_or_default(),
		}
	}

	fn set_value(&self, node: &Element, value: &str) {
		match Self::input(node) {
			Some(input) => input.set_value(value),
			None => {
				let _ = node.set_attribute("value", value);
			}
		}
	}

	fn text(&self, node: &Element) -> String {
		node.text_content().unwrap_or_default()
	}

	fn set_text(&self, node: &Element, text: &str) {
		match node.dyn_ref::<HtmlElement>() {
			Some(html) => html.set_inner_text(text),
			None => node.set_text_content(Some(text)),
		}
	}

	fn set_visible(&self, node: &Element, visible: bool) {
		if let Some(html) = node.dyn_ref::<HtmlElement>() {
			let display = if visible { "block" } else { "none" };
			let _ = html.style().set_property("display", display);
		}
	}

	fn form_values(&self, form: &Element) -> Vec<(String, String)> {
		let Some(form) = form.dyn_ref::<HtmlFormElement>() else {
			return Vec::new();
		};
		let Ok(data) = web_sys::FormData::new_with_form(form) else {
			return Vec::new();
		};
		let Ok(Some(entries)) = js_sys::try_iter(&data) else {
			return Vec::new();
		};
		entries
			.filter_map(|entry| entry.ok())
			.filter_map(|entry| {
				let pair = entry.dyn_into::<js_sys::Array>().ok()?;
				// File inputs yield non-string values; they are not filters.
				Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
			})
			.collect()
	}

	fn blur_active(&self) {
		if let Some(active) = self
			.document
			.active_element()
			.and_then(|el| el.dyn_into::<HtmlElement>().ok())
		{
			let _ = active.blur();
		}
	}

	fn viewport_width(&self) -> u32 {
		self.window
			.inner_width()
			.ok()
			.and_then(|w| w.as_f64())
			.map(|w| w.max(0.0) as u32)
			.unwrap_or(0)
	}

	fn outer_width(&self) -> u32 {
		self.window
			.outer_width()
			.ok()
			.and_then(|w| w.as_f64())
			.map(|w| w.max(0.0) as u32)
			.unwrap_or(0)
	}

	fn location(&self) -> String {
		self.window.location().href().unwrap_or_default()
	}

	fn cookie(&self) -> String {
		self.document
			.dyn_ref::<web_sys::HtmlDocument>()
			.and_then(|doc| doc.cookie().ok())
			.unwrap_or_default()
	}

	fn listen(
		&self,
		target: &ListenTarget<Element>,
		kind: EventKind,
		handler: Listener<Element>,
	) -> ListenerId {
		let id = ListenerId(self.next_id.get());
		self.next_id.set(id.0 + 1);

		let event_target = self.event_target(target);
		let type_name = kind.as_str().to_string();
		let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
			handler(&convert_event(&kind, &event));
		});
		if let Err(err) = event_target
			.add_event_listener_with_callback(&type_name, closure.as_ref().unchecked_ref())
		{
			crate::warn_log!("{}", js_error(err));
		}

		self.listeners.borrow_mut().insert(
			id,
			WebListener {
				target: event_target,
				kind: type_name,
				closure,
			},
		);
		id
	}

	fn unlisten(&self, id: ListenerId) -> bool {
		let Some(listener) = self.listeners.borrow_mut().remove(&id) else {
			return false;
		};
		let _ = listener.target.remove_event_listener_with_callback(
			&listener.kind,
			listener.closure.as_ref().unchecked_ref(),
		);
		true
	}

	fn listener_count(&self) -> usize {
		self.listeners.borrow().len()
	}
}
