//! In-memory [`Dom`] implementation
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Events are
//! dispatched synchronously and bubble from the target through its
//! ancestors to the document and finally the window. Clicking an enabled
//! checkbox flips its `checked` property before listeners run, and clicks
//! on disabled controls are dropped, as in a browser.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use super::builder::ElementSpec;
use super::{Dom, DomEvent, EventKind, ListenTarget, Listener, ListenerId, Selector};
#[cfg(test)]
use super::listener;

/// Handle of a [`MemoryDom`] element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
struct NodeData {
	tag: String,
	attributes: BTreeMap<String, String>,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	checked: bool,
	disabled: bool,
	value: String,
	text: String,
}

struct Registered {
	target: ListenTarget<NodeId>,
	kind: EventKind,
	handler: Listener<NodeId>,
}

/// Element tree held in memory.
pub struct MemoryDom {
	nodes: RefCell<Vec<NodeData>>,
	body: NodeId,
	listeners: RefCell<BTreeMap<ListenerId, Registered>>,
	next_listener: Cell<u64>,
	active: Cell<Option<NodeId>>,
	blur_count: Cell<usize>,
	viewport_width: Cell<u32>,
	outer_width: Cell<u32>,
	location: RefCell<String>,
	cookie: RefCell<String>,
}

impl std::fmt::Debug for MemoryDom {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryDom")
			.field("nodes", &self.nodes.borrow().len())
			.field("listeners", &self.listeners.borrow().len())
			.field("viewport_width", &self.viewport_width.get())
			.finish()
	}
}

impl Default for MemoryDom {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryDom {
	/// Creates a document with an empty `<body>` and a 1024px viewport.
	pub fn new() -> Self {
		let dom = Self {
			nodes: RefCell::new(Vec::new()),
			body: NodeId(0),
			listeners: RefCell::new(BTreeMap::new()),
			next_listener: Cell::new(1),
			active: Cell::new(None),
			blur_count: Cell::new(0),
			viewport_width: Cell::new(1024),
			outer_width: Cell::new(1024),
			location: RefCell::new("http://localhost/".to_string()),
			cookie: RefCell::new(String::new()),
		};
		dom.alloc("body", None);
		dom
	}

	/// The `<body>` node.
	pub fn body_id(&self) -> NodeId {
		self.body
	}

	/// Builds `spec` and appends it to `parent`, returning the new root.
	pub fn mount(&self, parent: NodeId, spec: ElementSpec) -> NodeId {
		let node = self.alloc(&spec.tag, Some(parent));
		{
			let mut nodes = self.nodes.borrow_mut();
			let data = &mut nodes[node.0];
			data.attributes.extend(spec.attributes);
			data.checked = spec.checked;
			data.disabled = spec.disabled;
			data.value = spec.value.unwrap_or_default();
			data.text = spec.text.unwrap_or_default();
		}
		for child in spec.children {
			self.mount(node, child);
		}
		node
	}

	/// Detaches `node` from its parent. The subtree stays addressable but
	/// is no longer connected.
	pub fn remove(&self, node: NodeId) {
		let mut nodes = self.nodes.borrow_mut();
		if let Some(parent) = nodes[node.0].parent.take() {
			nodes[parent.0].children.retain(|child| *child != node);
		}
	}

	/// Replaces `old` with a freshly built `spec` at the same position,
	/// as an `outerHTML` swap would.
	pub fn replace(&self, old: NodeId, spec: ElementSpec) -> NodeId {
		let parent = self.nodes.borrow()[old.0].parent.unwrap_or(self.body);
		let position = self.nodes.borrow()[parent.0]
			.children
			.iter()
			.position(|child| *child == old);
		self.remove(old);
		let new = self.mount(parent, spec);
		if let Some(position) = position {
			let mut nodes = self.nodes.borrow_mut();
			let children = &mut nodes[parent.0].children;
			children.retain(|child| *child != new);
			children.insert(position, new);
		}
		new
	}

	/// Lowercase tag name.
	pub fn tag(&self, node: NodeId) -> String {
		self.nodes.borrow()[node.0].tag.clone()
	}

	/// Whether the element is currently shown (`display` is not `none`).
	pub fn is_visible(&self, node: NodeId) -> bool {
		self.nodes.borrow()[node.0]
			.attributes
			.get("style")
			.is_none_or(|style| !style.contains("display: none"))
	}

	/// Sets the viewport widths and fires `resize` on the window.
	pub fn resize(&self, width: u32) {
		self.viewport_width.set(width);
		self.outer_width.set(width);
		self.dispatch(
			ListenTarget::Window,
			DomEvent::new(EventKind::Resize, None),
		);
	}

	/// Sets `window.location.href`.
	pub fn set_location(&self, href: impl Into<String>) {
		*self.location.borrow_mut() = href.into();
	}

	/// Sets `document.cookie` (the whole header string).
	pub fn set_cookie(&self, cookie: impl Into<String>) {
		*self.cookie.borrow_mut() = cookie.into();
	}

	/// Focuses an element.
	pub fn focus(&self, node: NodeId) {
		self.active.set(Some(node));
	}

	/// Focused element.
	pub fn active_element(&self) -> Option<NodeId> {
		self.active.get()
	}

	/// How many times [`Dom::blur_active`] blurred an element.
	pub fn blur_count(&self) -> usize {
		self.blur_count.get()
	}

	/// Clicks an element.
	pub fn click(&self, node: NodeId) {
		self.click_with(node, false);
	}

	/// Clicks an element with Shift held.
	pub fn shift_click(&self, node: NodeId) {
		self.click_with(node, true);
	}

	fn click_with(&self, node: NodeId, shift: bool) {
		if self.is_disabled(&node) {
			return;
		}
		if self.is_checkbox(node) {
			let checked = self.is_checked(&node);
			self.set_checked(&node, !checked);
		}
		self.dispatch(
			ListenTarget::Node(node),
			DomEvent::new(EventKind::Click, Some(node)).with_shift(shift),
		);
	}

	/// Sets a control's value and fires `change` on it.
	pub fn change(&self, node: NodeId, value: &str) {
		self.set_value(&node, value);
		self.dispatch(
			ListenTarget::Node(node),
			DomEvent::new(EventKind::Change, Some(node)),
		);
	}

	/// Fires `keypress` on the focused element (or the document).
	pub fn key_press(&self, key: &str) {
		let event = DomEvent::new(EventKind::KeyPress, self.active.get()).with_key(key);
		match self.active.get() {
			Some(node) => self.dispatch(ListenTarget::Node(node), event),
			None => self.dispatch(ListenTarget::Document, event),
		}
	}

	/// Fires a custom event on `node` (or the document when `None`).
	pub fn custom_event(
		&self,
		node: Option<NodeId>,
		name: &str,
		detail: Option<serde_json::Value>,
	) {
		let mut event = DomEvent::new(EventKind::custom(name), node);
		event.detail = detail;
		match node {
			Some(node) => self.dispatch(ListenTarget::Node(node), event),
			None => self.dispatch(ListenTarget::Document, event),
		}
	}

	/// Fires `load` on the window.
	pub fn load(&self) {
		self.dispatch(ListenTarget::Window, DomEvent::new(EventKind::Load, None));
	}

	/// Delivers `event` to listeners on `target` and everything it bubbles to.
	pub fn dispatch(&self, target: ListenTarget<NodeId>, event: DomEvent<NodeId>) {
		let mut path = Vec::new();
		match target {
			ListenTarget::Node(node) => {
				let mut current = Some(node);
				while let Some(node) = current {
					path.push(ListenTarget::Node(node));
					current = self.nodes.borrow()[node.0].parent;
				}
				if self.is_connected(&node) {
					path.push(ListenTarget::Document);
					path.push(ListenTarget::Window);
				}
			}
			ListenTarget::Document => {
				path.push(ListenTarget::Document);
				path.push(ListenTarget::Window);
			}
			ListenTarget::Window => path.push(ListenTarget::Window),
		}

		// Snapshot first; handlers mutate the tree and the listener map.
		// Listeners added during dispatch do not run, removed ones are skipped.
		let kind = &event.kind;
		let handlers: Vec<(ListenerId, Listener<NodeId>)> = {
			let listeners = self.listeners.borrow();
			path.iter()
				.flat_map(|hop| {
					listeners
						.iter()
						.filter(move |(_, l)| l.target == *hop && l.kind == *kind)
						.map(|(id, l)| (*id, l.handler.clone()))
				})
				.collect()
		};
		for (id, handler) in handlers {
			if self.listeners.borrow().contains_key(&id) {
				handler(&event);
			}
		}
	}

	fn alloc(&self, tag: &str, parent: Option<NodeId>) -> NodeId {
		let mut nodes = self.nodes.borrow_mut();
		let id = NodeId(nodes.len());
		nodes.push(NodeData {
			tag: tag.to_ascii_lowercase(),
			attributes: BTreeMap::new(),
			parent,
			children: Vec::new(),
			checked: false,
			disabled: false,
			value: String::new(),
			text: String::new(),
		});
		if let Some(parent) = parent {
			nodes[parent.0].children.push(id);
		}
		id
	}

	fn is_checkbox(&self, node: NodeId) -> bool {
		let nodes = self.nodes.borrow();
		let data = &nodes[node.0];
		data.tag == "input"
			&& data
				.attributes
				.get("type")
				.is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
	}

	fn classes(&self, node: NodeId) -> Vec<String> {
		self.nodes.borrow()[node.0]
			.attributes
			.get("class")
			.map(|class| class.split_whitespace().map(str::to_string).collect())
			.unwrap_or_default()
	}

	fn set_classes(&self, node: NodeId, classes: &[String]) {
		self.nodes.borrow_mut()[node.0]
			.attributes
			.insert("class".to_string(), classes.join(" "));
	}

	fn collect_descendants(&self, node: NodeId, selector: &Selector, out: &mut Vec<NodeId>) {
		let children = self.nodes.borrow()[node.0].children.clone();
		for child in children {
			if self.matches(&child, selector) {
				out.push(child);
			}
			self.collect_descendants(child, selector, out);
		}
	}
}

impl Dom for MemoryDom {
	type Node = NodeId;

	fn body(&self) -> Option<NodeId> {
		Some(self.body)
	}

	fn get_by_id(&self, id: &str) -> Option<NodeId> {
		if self.id(&self.body).as_deref() == Some(id) {
			return Some(self.body);
		}
		self.query(&self.body, &Selector::id(id))
	}

	fn query_all(&self, root: &NodeId, selector: &Selector) -> Vec<NodeId> {
		let mut out = Vec::new();
		self.collect_descendants(*root, selector, &mut out);
		out
	}

	fn matches(&self, node: &NodeId, selector: &Selector) -> bool {
		match selector {
			Selector::Tag(tag) => self.nodes.borrow()[node.0].tag.eq_ignore_ascii_case(tag),
			Selector::Id(id) => self.attribute(node, "id").as_deref() == Some(id.as_str()),
			Selector::Class(class) => self.has_class(node, class),
			Selector::Name(name) => self.attribute(node, "name").as_deref() == Some(name.as_str()),
			Selector::Attr(attr, value) => {
				self.attribute(node, attr).as_deref() == Some(value.as_str())
			}
			Selector::All(parts) => parts.iter().all(|part| self.matches(node, part)),
		}
	}

	fn parent(&self, node: &NodeId) -> Option<NodeId> {
		self.nodes.borrow()[node.0].parent
	}

	fn children(&self, node: &NodeId) -> Vec<NodeId> {
		self.nodes.borrow()[node.0].children.clone()
	}

	fn is_connected(&self, node: &NodeId) -> bool {
		let mut current = *node;
		loop {
			if current == self.body {
				return true;
			}
			match self.nodes.borrow()[current.0].parent {
				Some(parent) => current = parent,
				None => return false,
			}
		}
	}

	fn tag_name(&self, node: &NodeId) -> String {
		self.tag(*node)
	}

	fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
		self.nodes.borrow()[node.0].attributes.get(name).cloned()
	}

	fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
		self.nodes.borrow_mut()[node.0]
			.attributes
			.insert(name.to_string(), value.to_string());
	}

	fn remove_attribute(&self, node: &NodeId, name: &str) {
		self.nodes.borrow_mut()[node.0].attributes.remove(name);
	}

	fn has_class(&self, node: &NodeId, class: &str) -> bool {
		self.classes(*node).iter().any(|c| c == class)
	}

	fn add_class(&self, node: &NodeId, class: &str) {
		let mut classes = self.classes(*node);
		if !classes.iter().any(|c| c == class) {
			classes.push(class.to_string());
			self.set_classes(*node, &classes);
		}
	}

	fn remove_class(&self, node: &NodeId, class: &str) {
		let mut classes = self.classes(*node);
		let before = classes.len();
		classes.retain(|c| c != class);
		if classes.len() != before {
			self.set_classes(*node, &classes);
		}
	}

	fn is_checked(&self, node: &NodeId) -> bool {
		self.nodes.borrow()[node.0].checked
	}

	fn set_checked(&self, node: &NodeId, checked: bool) {
		self.nodes.borrow_mut()[node.0].checked = checked;
	}

	fn is_disabled(&self, node: &NodeId) -> bool {
		self.nodes.borrow()[node.0].disabled
	}

	fn set_disabled(&self, node: &NodeId, disabled: bool) {
		self.nodes.borrow_mut()[node.0].disabled = disabled;
	}

	fn value(&self, node: &NodeId) -> String {
		self.nodes.borrow()[node.0].value.clone()
	}

	fn set_value(&self, node: &NodeId, value: &str) {
		self.nodes.borrow_mut()[node.0].value = value.to_string();
	}

	fn text(&self, node: &NodeId) -> String {
		self.nodes.borrow()[node.0].text.clone()
	}

	fn set_text(&self, node: &NodeId, text: &str) {
		self.nodes.borrow_mut()[node.0].text = text.to_string();
	}

	fn set_visible(&self, node: &NodeId, visible: bool) {
		let display = if visible { "display: block" } else { "display: none" };
		self.set_attribute(node, "style", display);
	}

	fn form_values(&self, form: &NodeId) -> Vec<(String, String)> {
		let mut values = Vec::new();
		let mut controls = Vec::new();
		for tag in ["input", "select", "textarea"] {
			controls.extend(self.query_all(form, &Selector::tag(tag)));
		}
		controls.sort();
		for control in controls {
			let Some(name) = self.attribute(&control, "name").filter(|n| !n.is_empty()) else {
				continue;
			};
			if self.is_disabled(&control) {
				continue;
			}
			if self.is_checkbox(control) && !self.is_checked(&control) {
				continue;
			}
			values.push((name, self.value(&control)));
		}
		values
	}

	fn blur_active(&self) {
		if self.active.take().is_some() {
			self.blur_count.set(self.blur_count.get() + 1);
		}
	}

	fn viewport_width(&self) -> u32 {
		self.viewport_width.get()
	}

	fn outer_width(&self) -> u32 {
		self.outer_width.get()
	}

	fn location(&self) -> String {
		self.location.borrow().clone()
	}

	fn cookie(&self) -> String {
		self.cookie.borrow().clone()
	}

	fn listen(
		&self,
		target: &ListenTarget<NodeId>,
		kind: EventKind,
		handler: Listener<NodeId>,
	) -> ListenerId {
		let id = ListenerId(self.next_listener.get());
		self.next_listener.set(id.0 + 1);
		self.listeners.borrow_mut().insert(
			id,
			Registered {
				target: target.clone(),
				kind,
				handler,
			},
		);
		id
	}

	fn unlisten(&self, id: ListenerId) -> bool {
		self.listeners.borrow_mut().remove(&id).is_some()
	}

	fn listener_count(&self) -> usize {
		self.listeners.borrow().len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dom::builder::{checkbox, div, form, input, table, td, tr};
	use rstest::rstest;
	use std::rc::Rc;

	#[rstest]
	fn test_mount_and_query() {
		let dom = MemoryDom::new();
		let root = dom.mount(
			dom.body_id(),
			div().id("wrap").child(table().child(tr().children([
				td().class("a b"),
				td().class("b"),
			]))),
		);

		assert_eq!(dom.get_by_id("wrap"), Some(root));
		assert_eq!(dom.query_all(&root, &Selector::class("b")).len(), 2);
		assert_eq!(dom.query_all(&root, &Selector::tag("td")).len(), 2);
		let first = dom.query(&root, &Selector::class("a")).unwrap();
		assert_eq!(dom.closest(&first, &Selector::tag("table")).map(|t| dom.tag(t)), Some("table".to_string()));
		assert!(dom.closest(&first, &Selector::tag("form")).is_none());
	}

	#[rstest]
	fn test_class_operations() {
		let dom = MemoryDom::new();
		let node = dom.mount(dom.body_id(), div().class("x"));
		dom.add_class(&node, "y");
		dom.add_class(&node, "y");
		assert_eq!(dom.attribute(&node, "class").as_deref(), Some("x y"));
		assert!(!dom.toggle_class(&node, "x"));
		assert!(dom.toggle_class(&node, "z"));
		assert_eq!(dom.attribute(&node, "class").as_deref(), Some("y z"));
	}

	#[rstest]
	fn test_click_toggles_checkbox_before_listeners() {
		let dom = MemoryDom::new();
		let boxed = dom.mount(dom.body_id(), checkbox("c", "1"));
		let seen = Rc::new(Cell::new(None));
		let sink = Rc::clone(&seen);
		let dom = Rc::new(dom);
		let observer = Rc::clone(&dom);
		dom.listen(
			&ListenTarget::Document,
			EventKind::Click,
			listener(move |event| sink.set(event.target.map(|t| observer.is_checked(&t)))),
		);

		dom.click(boxed);
		assert_eq!(seen.get(), Some(true));
	}

	#[rstest]
	fn test_disabled_click_is_dropped() {
		let dom = MemoryDom::new();
		let boxed = dom.mount(dom.body_id(), checkbox("c", "1").disabled(true));
		let calls = Rc::new(Cell::new(0));
		let sink = Rc::clone(&calls);
		dom.listen(
			&ListenTarget::Node(boxed),
			EventKind::Click,
			listener(move |_| sink.set(sink.get() + 1)),
		);

		dom.click(boxed);
		assert_eq!(calls.get(), 0);
		assert!(!dom.is_checked(&boxed));
	}

	#[rstest]
	fn test_events_bubble_and_unlisten() {
		let dom = MemoryDom::new();
		let outer = dom.mount(dom.body_id(), div().child(span_cell()));
		let inner = dom.children(&outer)[0];
		let calls = Rc::new(Cell::new(0));
		let sink = Rc::clone(&calls);
		let id = dom.listen(
			&ListenTarget::Node(outer),
			EventKind::Click,
			listener(move |_| sink.set(sink.get() + 1)),
		);

		dom.click(inner);
		assert_eq!(calls.get(), 1);

		assert!(dom.unlisten(id));
		assert!(!dom.unlisten(id));
		dom.click(inner);
		assert_eq!(calls.get(), 1);
		assert_eq!(dom.listener_count(), 0);
	}

	#[rstest]
	fn test_listener_removed_during_dispatch_is_skipped() {
		let dom = Rc::new(MemoryDom::new());
		let node = dom.mount(dom.body_id(), div());
		let calls = Rc::new(Cell::new(0));
		let later: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

		let remover = Rc::clone(&dom);
		let target = Rc::clone(&later);
		dom.listen(
			&ListenTarget::Node(node),
			EventKind::Click,
			listener(move |_| {
				if let Some(id) = target.get() {
					remover.unlisten(id);
				}
			}),
		);
		let sink = Rc::clone(&calls);
		let id = dom.listen(
			&ListenTarget::Document,
			EventKind::Click,
			listener(move |_| sink.set(sink.get() + 1)),
		);
		later.set(Some(id));

		dom.click(node);
		assert_eq!(calls.get(), 0);
		assert_eq!(dom.listener_count(), 1);
	}

	fn span_cell() -> ElementSpec {
		crate::dom::builder::span().text("x")
	}

	#[rstest]
	fn test_replace_keeps_position_and_disconnects_old() {
		let dom = MemoryDom::new();
		let first = dom.mount(dom.body_id(), div().id("a"));
		let _second = dom.mount(dom.body_id(), div().id("b"));

		let new = dom.replace(first, div().id("a"));

		assert!(!dom.is_connected(&first));
		assert!(dom.is_connected(&new));
		assert_eq!(dom.children(&dom.body_id())[0], new);
		assert_eq!(dom.get_by_id("a"), Some(new));
	}

	#[rstest]
	fn test_form_values_skip_unchecked_and_disabled() {
		let dom = MemoryDom::new();
		let f = dom.mount(
			dom.body_id(),
			form().children([
				input().name("title").value("Alien"),
				checkbox("genre", "scifi").checked(true),
				checkbox("genre", "drama"),
				input().name("year").value("1979").disabled(true),
				input().value("anonymous"),
			]),
		);

		assert_eq!(
			dom.form_values(&f),
			vec![
				("title".to_string(), "Alien".to_string()),
				("genre".to_string(), "scifi".to_string()),
			]
		);
	}

	#[rstest]
	fn test_resize_and_blur() {
		let dom = MemoryDom::new();
		let field = dom.mount(dom.body_id(), input().name("q"));
		dom.resize(600);
		assert_eq!(dom.viewport_width(), 600);

		dom.focus(field);
		dom.blur_active();
		dom.blur_active();
		assert_eq!(dom.blur_count(), 1);
		assert!(dom.active_element().is_none());
	}

	#[rstest]
	fn test_visibility() {
		let dom = MemoryDom::new();
		let node = dom.mount(dom.body_id(), div());
		assert!(dom.is_visible(node));
		dom.set_visible(&node, false);
		assert!(!dom.is_visible(node));
		dom.set_visible(&node, true);
		assert!(dom.is_visible(node));
	}
}
