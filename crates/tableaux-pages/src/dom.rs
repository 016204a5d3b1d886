//! DOM abstraction layer
//!
//! The controller never touches `web_sys` directly. It talks to a [`Dom`],
//! which has two implementations:
//!
//! - [`WebDom`] (WASM only): the live browser document via `web_sys`
//! - [`MemoryDom`]: an in-memory element tree with synchronous event
//!   dispatch, used by native tests and by tooling that wants to drive a
//!   controller without a browser
//!
//! Listeners are attached with [`Dom::listen`] and return a [`ListenerId`]
//! which is the only way to detach them again, so every controller can
//! remove exactly the listeners it added.

pub mod builder;
mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

pub use memory::{MemoryDom, NodeId};
#[cfg(target_arch = "wasm32")]
pub use web::WebDom;

use std::fmt;
use std::rc::Rc;

/// A simple CSS selector.
///
/// Only the shapes the tableaux templates need are supported; the browser
/// implementation renders them with [`Selector::to_css`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
	/// Element tag name, e.g. `table`.
	Tag(String),
	/// Element id.
	Id(String),
	/// A single class.
	Class(String),
	/// `name` attribute value.
	Name(String),
	/// Attribute with an exact value.
	Attr(String, String),
	/// Every part must match (compound selector).
	All(Vec<Selector>),
}

impl Selector {
	/// `Tag` selector.
	pub fn tag(tag: impl Into<String>) -> Self {
		Self::Tag(tag.into())
	}

	/// `Id` selector.
	pub fn id(id: impl Into<String>) -> Self {
		Self::Id(id.into())
	}

	/// `Class` selector.
	pub fn class(class: impl Into<String>) -> Self {
		Self::Class(class.into())
	}

	/// `Name` selector.
	pub fn name(name: impl Into<String>) -> Self {
		Self::Name(name.into())
	}

	/// `Attr` selector.
	pub fn attr(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self::Attr(name.into(), value.into())
	}

	/// Compound selector requiring every part.
	pub fn all(parts: impl IntoIterator<Item = Selector>) -> Self {
		Self::All(parts.into_iter().collect())
	}

	/// Renders the selector as CSS.
	pub fn to_css(&self) -> String {
		match self {
			Self::Tag(tag) => tag.to_ascii_lowercase(),
			Self::Id(id) => format!("[id=\"{}\"]", escape(id)),
			Self::Class(class) => format!(".{}", escape_ident(class)),
			Self::Name(name) => format!("[name=\"{}\"]", escape(name)),
			Self::Attr(name, value) => format!("[{}=\"{}\"]", name, escape(value)),
			Self::All(parts) => {
				// A type selector must lead a compound selector.
				let (tags, rest): (Vec<&Selector>, Vec<&Selector>) =
					parts.iter().partition(|part| matches!(part, Self::Tag(_)));
				tags.into_iter()
					.chain(rest)
					.map(Selector::to_css)
					.collect()
			}
		}
	}
}

impl fmt::Display for Selector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_css())
	}
}

fn escape(value: &str) -> String {
	value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn escape_ident(value: &str) -> String {
	value
		.chars()
		.flat_map(|c| {
			let needs_escape = !(c.is_ascii_alphanumeric() || c == '-' || c == '_');
			needs_escape.then_some('\\').into_iter().chain([c])
		})
		.collect()
}

/// Event types the tableaux client listens for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
	/// `click`
	Click,
	/// `change`
	Change,
	/// `keypress`
	KeyPress,
	/// `resize` (window only)
	Resize,
	/// `load` (window only)
	Load,
	/// Any custom event, e.g. `htmx:afterSwap` or `tableaux_init`.
	Custom(String),
}

impl EventKind {
	/// Custom event.
	pub fn custom(name: impl Into<String>) -> Self {
		Self::Custom(name.into())
	}

	/// DOM event type string.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Click => "click",
			Self::Change => "change",
			Self::KeyPress => "keypress",
			Self::Resize => "resize",
			Self::Load => "load",
			Self::Custom(name) => name,
		}
	}
}

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenTarget<N> {
	/// A single element.
	Node(N),
	/// The document.
	Document,
	/// The window.
	Window,
}

/// An event as seen by tableaux handlers.
#[derive(Debug, Clone)]
pub struct DomEvent<N> {
	/// Event type.
	pub kind: EventKind,
	/// Element the event was dispatched on, if it was an element.
	pub target: Option<N>,
	/// Whether Shift was held (mouse events).
	pub shift_key: bool,
	/// Key value (keyboard events).
	pub key: Option<String>,
	/// `detail` of a custom event, when it is JSON-representable.
	pub detail: Option<serde_json::Value>,
}

impl<N> DomEvent<N> {
	/// Creates an event with no modifiers, key or detail.
	pub fn new(kind: EventKind, target: Option<N>) -> Self {
		Self {
			kind,
			target,
			shift_key: false,
			key: None,
			detail: None,
		}
	}

	/// Sets the shift modifier.
	pub fn with_shift(mut self, shift: bool) -> Self {
		self.shift_key = shift;
		self
	}

	/// Sets the key value.
	pub fn with_key(mut self, key: impl Into<String>) -> Self {
		self.key = Some(key.into());
		self
	}

	/// Sets the custom event detail.
	pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
		self.detail = Some(detail);
		self
	}
}

/// Event handler stored by a [`Dom`].
pub type Listener<N> = Rc<dyn Fn(&DomEvent<N>) + 'static>;

/// Wraps a closure as a [`Listener`].
pub fn listener<N, F>(handler: F) -> Listener<N>
where
	F: Fn(&DomEvent<N>) + 'static,
{
	Rc::new(handler)
}

/// Handle for detaching a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// Operations the tableaux client performs on a document.
///
/// Methods on missing or detached nodes are no-ops that return empty
/// values; the controller treats every element as optional.
pub trait Dom {
	/// Element handle.
	type Node: Clone + PartialEq + fmt::Debug + 'static;

	/// The `<body>` element.
	fn body(&self) -> Option<Self::Node>;

	/// Element with the given id anywhere in the document.
	fn get_by_id(&self, id: &str) -> Option<Self::Node>;

	/// Descendants of `root` matching `selector`, in document order.
	fn query_all(&self, root: &Self::Node, selector: &Selector) -> Vec<Self::Node>;

	/// First descendant of `root` matching `selector`.
	fn query(&self, root: &Self::Node, selector: &Selector) -> Option<Self::Node> {
		self.query_all(root, selector).into_iter().next()
	}

	/// Whether `node` itself matches `selector`.
	fn matches(&self, node: &Self::Node, selector: &Selector) -> bool;

	/// Parent element.
	fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

	/// Child elements in order.
	fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

	/// Nearest inclusive ancestor matching `selector`.
	fn closest(&self, node: &Self::Node, selector: &Selector) -> Option<Self::Node> {
		let mut current = Some(node.clone());
		while let Some(candidate) = current {
			if self.matches(&candidate, selector) {
				return Some(candidate);
			}
			current = self.parent(&candidate);
		}
		None
	}

	/// Whether the node is still attached to the document.
	fn is_connected(&self, node: &Self::Node) -> bool;

	/// Lowercase tag name.
	fn tag_name(&self, node: &Self::Node) -> String;

	/// Attribute value.
	fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

	/// Sets an attribute.
	fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

	/// Removes an attribute.
	fn remove_attribute(&self, node: &Self::Node, name: &str);

	/// Element id, if non-empty.
	fn id(&self, node: &Self::Node) -> Option<String> {
		self.attribute(node, "id").filter(|id| !id.is_empty())
	}

	/// Whether the class list contains `class`.
	fn has_class(&self, node: &Self::Node, class: &str) -> bool;

	/// Adds a class.
	fn add_class(&self, node: &Self::Node, class: &str);

	/// Removes a class.
	fn remove_class(&self, node: &Self::Node, class: &str);

	/// Toggles a class, returning whether it is now present.
	fn toggle_class(&self, node: &Self::Node, class: &str) -> bool {
		if self.has_class(node, class) {
			self.remove_class(node, class);
			false
		} else {
			self.add_class(node, class);
			true
		}
	}

	/// `checked` property of an input.
	fn is_checked(&self, node: &Self::Node) -> bool;

	/// Sets the `checked` property.
	fn set_checked(&self, node: &Self::Node, checked: bool);

	/// `disabled` property.
	fn is_disabled(&self, node: &Self::Node) -> bool;

	/// Sets the `disabled` property.
	fn set_disabled(&self, node: &Self::Node, disabled: bool);

	/// `value` property of a form control.
	fn value(&self, node: &Self::Node) -> String;

	/// Sets the `value` property.
	fn set_value(&self, node: &Self::Node, value: &str);

	/// Text content.
	fn text(&self, node: &Self::Node) -> String;

	/// Replaces the text content.
	fn set_text(&self, node: &Self::Node, text: &str);

	/// Shows (`display: block`) or hides (`display: none`) an element.
	fn set_visible(&self, node: &Self::Node, visible: bool);

	/// Name/value pairs a form would submit.
	fn form_values(&self, form: &Self::Node) -> Vec<(String, String)>;

	/// Blurs the focused element, if any.
	fn blur_active(&self);

	/// `window.innerWidth`.
	fn viewport_width(&self) -> u32;

	/// `window.outerWidth`.
	fn outer_width(&self) -> u32;

	/// `window.location.href`.
	fn location(&self) -> String;

	/// `document.cookie`.
	fn cookie(&self) -> String;

	/// Attaches a listener.
	fn listen(
		&self,
		target: &ListenTarget<Self::Node>,
		kind: EventKind,
		handler: Listener<Self::Node>,
	) -> ListenerId;

	/// Detaches a listener. Returns `false` if it was already detached.
	fn unlisten(&self, id: ListenerId) -> bool;

	/// Number of attached listeners.
	fn listener_count(&self) -> usize;
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Selector::tag("TABLE"), "table")]
	#[case(Selector::id("orders_select_all"), "[id=\"orders_select_all\"]")]
	#[case(Selector::class("td-editing"), ".td-editing")]
	#[case(Selector::name("select-checkbox"), "[name=\"select-checkbox\"]")]
	#[case(Selector::attr("data-controller", "tableaux"), "[data-controller=\"tableaux\"]")]
	#[case(
		Selector::all([Selector::class("open"), Selector::tag("td"), Selector::class("td-editing")]),
		"td.open.td-editing"
	)]
	#[case(Selector::attr("data-x", "a\"b"), "[data-x=\"a\\\"b\"]")]
	#[case(Selector::class("w-1/2"), ".w-1\\/2")]
	fn test_selector_to_css(#[case] selector: Selector, #[case] expected: &str) {
		assert_eq!(selector.to_css(), expected);
	}

	#[rstest]
	#[case(EventKind::Click, "click")]
	#[case(EventKind::KeyPress, "keypress")]
	#[case(EventKind::custom("htmx:afterSwap"), "htmx:afterSwap")]
	fn test_event_kind_as_str(#[case] kind: EventKind, #[case] expected: &str) {
		assert_eq!(kind.as_str(), expected);
	}

	#[rstest]
	fn test_dom_event_builder() {
		let event = DomEvent::new(EventKind::Click, Some(3u32))
			.with_shift(true)
			.with_key("Enter")
			.with_detail(serde_json::json!({"url": "/x"}));
		assert!(event.shift_key);
		assert_eq!(event.key.as_deref(), Some("Enter"));
		assert_eq!(event.target, Some(3));
		assert_eq!(event.detail.unwrap()["url"], "/x");
	}
}
