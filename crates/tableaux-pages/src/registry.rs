//! Controller registry and page-level signals
//!
//! [`Tableaux`] discovers table containers, keeps exactly one
//! [`TableController`] per container and listens for the page-level
//! signals that drive re-initialization:
//!
//! | Event | Target | Effect |
//! |-------|--------|--------|
//! | `htmx:afterSwap` | document | [`Tableaux::init`] over the swapped element and its enclosing container |
//! | `tableaux_init` | document | [`Tableaux::reinit`] with the id in `detail` |
//! | `trigger` | document | GET `detail.url` into the results region |
//! | `click` | document | select-list dropdown rules |
//! | `resize` | window | [`BreakpointService::handle_resize`] |

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::Value;
use tableaux_core::settings::SETTINGS_SCRIPT_ID;
use tableaux_core::{BreakpointService, Result, Settings, debug_log, info_log, warn_log};

use crate::controller::TableController;
use crate::dom::{Dom, DomEvent, EventKind, ListenTarget, ListenerId, Selector, listener};
use crate::dropdown::select_list_click;
use crate::transport::{AjaxRequest, Transport};

/// Custom event asking for a container to be re-initialized.
pub const INIT_EVENT: &str = "tableaux_init";

/// Custom event asking for a URL to be fetched into the results region.
pub const TRIGGER_EVENT: &str = "trigger";

/// Event htmx fires after swapping in new content.
pub const AFTER_SWAP_EVENT: &str = "htmx:afterSwap";

/// Attribute carrying a container's id prefix.
pub const PREFIX_ATTR: &str = "data-prefix";

/// Reads [`Settings`] from the `#tableaux-settings` script element.
///
/// A page without the element gets the defaults.
///
/// # Errors
///
/// Returns [`tableaux_core::TableauxError::InvalidSettings`] when the
/// element holds malformed JSON.
pub fn settings_from_document<D: Dom>(dom: &D) -> Result<Settings> {
	match dom.get_by_id(SETTINGS_SCRIPT_ID) {
		Some(script) => {
			let json = dom.text(&script);
			if json.trim().is_empty() {
				return Ok(Settings::default());
			}
			Settings::from_json(&json)
		}
		None => Ok(Settings::default()),
	}
}

/// Every table controller on the page.
///
/// Cloning yields another handle to the same registry.
pub struct Tableaux<D: Dom, T: Transport> {
	inner: Rc<RegistryInner<D, T>>,
}

impl<D: Dom, T: Transport> Clone for Tableaux<D, T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<D: Dom, T: Transport> std::fmt::Debug for Tableaux<D, T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Tableaux")
			.field("controllers", &self.inner.controllers.borrow().len())
			.field("signal_listeners", &self.inner.signals.borrow().len())
			.finish()
	}
}

struct RegistryInner<D: Dom, T: Transport> {
	dom: Rc<D>,
	transport: Rc<T>,
	breakpoints: Rc<BreakpointService>,
	settings: Rc<Settings>,
	controllers: RefCell<Vec<TableController<D, T>>>,
	signals: RefCell<Vec<ListenerId>>,
}

impl<D, T> Tableaux<D, T>
where
	D: Dom + 'static,
	T: Transport + 'static,
{
	/// Creates an empty registry.
	pub fn new(
		dom: Rc<D>,
		transport: Rc<T>,
		breakpoints: Rc<BreakpointService>,
		settings: Rc<Settings>,
	) -> Self {
		Self {
			inner: Rc::new(RegistryInner {
				dom,
				transport,
				breakpoints,
				settings,
				controllers: RefCell::new(Vec::new()),
				signals: RefCell::new(Vec::new()),
			}),
		}
	}

	/// Binds a fresh controller to every container under `root`, `root`
	/// included. Returns the number of controllers attached.
	///
	/// A container that already has a controller is unbound first, and
	/// controllers whose container left the document are dropped.
	pub fn init(&self, root: &D::Node) -> usize {
		self.inner.init(root)
	}

	/// Re-initializes the container with `container_id`, or the whole
	/// document when no id is given. Returns the number attached.
	pub fn reinit(&self, container_id: Option<&str>) -> usize {
		self.inner.reinit(container_id)
	}

	/// Unbinds the controller of the container with `container_id`.
	pub fn destroy(&self, container_id: &str) -> bool {
		self.inner.destroy(container_id)
	}

	/// Unbinds every controller.
	pub fn destroy_all(&self) {
		self.inner.destroy_all();
	}

	/// Attaches the page-level listeners. Calling it again replaces them.
	pub fn bind_signals(&self) {
		RegistryInner::bind_signals(&self.inner);
	}

	/// Detaches the page-level listeners.
	pub fn unbind_signals(&self) {
		self.inner.unbind_signals();
	}

	/// Controller bound to `container`.
	pub fn controller(&self, container: &D::Node) -> Option<TableController<D, T>> {
		self.inner
			.controllers
			.borrow()
			.iter()
			.find(|controller| controller.container() == container)
			.cloned()
	}

	/// Number of bound controllers.
	pub fn len(&self) -> usize {
		self.inner.controllers.borrow().len()
	}

	/// Whether no controller is bound.
	pub fn is_empty(&self) -> bool {
		self.inner.controllers.borrow().is_empty()
	}

	/// The breakpoint service controllers subscribe to.
	pub fn breakpoints(&self) -> &Rc<BreakpointService> {
		&self.inner.breakpoints
	}
}

impl<D, T> RegistryInner<D, T>
where
	D: Dom + 'static,
	T: Transport + 'static,
{
	fn container_selector(&self) -> Selector {
		Selector::attr(
			self.settings.container_attr.as_str(),
			self.settings.container_value.as_str(),
		)
	}

	fn init(&self, root: &D::Node) -> usize {
		self.prune();

		let selector = self.container_selector();
		let mut containers = Vec::new();
		if self.dom.matches(root, &selector) {
			containers.push(root.clone());
		}
		containers.extend(self.dom.query_all(root, &selector));

		for container in &containers {
			self.attach(container);
		}
		if !containers.is_empty() {
			info_log!("tableaux: bound {} container(s)", containers.len());
		}
		containers.len()
	}

	fn attach(&self, container: &D::Node) {
		self.detach(container);
		let prefix = self.dom.attribute(container, PREFIX_ATTR).unwrap_or_default();
		let controller = TableController::with_prefix(
			Rc::clone(&self.dom),
			Rc::clone(&self.transport),
			Rc::clone(&self.breakpoints),
			container.clone(),
			Rc::clone(&self.settings),
			prefix,
		);
		self.controllers.borrow_mut().push(controller);
	}

	fn detach(&self, container: &D::Node) -> bool {
		let removed: Vec<_> = {
			let mut controllers = self.controllers.borrow_mut();
			let (removed, kept) = controllers
				.drain(..)
				.partition(|controller| controller.container() == container);
			*controllers = kept;
			removed
		};
		for controller in &removed {
			controller.destroy();
		}
		!removed.is_empty()
	}

	fn prune(&self) {
		let stale: Vec<_> = {
			let mut controllers = self.controllers.borrow_mut();
			let (stale, live) = controllers
				.drain(..)
				.partition(|controller| !self.dom.is_connected(controller.container()));
			*controllers = live;
			stale
		};
		for controller in stale {
			debug_log!("dropping controller of a detached container");
			controller.destroy();
		}
	}

	/// Re-runs [`Self::init`] over swapped content. A swap inside a bound
	/// container (its results region, say) replaces elements that
	/// container's listeners hang off, so the enclosing container is
	/// re-attached too.
	fn after_swap(&self, root: &D::Node) -> usize {
		let mut attached = self.init(root);
		let selector = self.container_selector();
		if !self.dom.matches(root, &selector)
			&& let Some(container) = self
				.dom
				.parent(root)
				.and_then(|parent| self.dom.closest(&parent, &selector))
		{
			self.attach(&container);
			attached += 1;
		}
		attached
	}

	fn reinit(&self, container_id: Option<&str>) -> usize {
		let root = match container_id.filter(|id| !id.is_empty()) {
			Some(id) => self.dom.get_by_id(id),
			None => self.dom.body(),
		};
		match root {
			Some(root) => self.init(&root),
			None => {
				debug_log!("{}: no container {:?}", INIT_EVENT, container_id);
				0
			}
		}
	}

	fn destroy(&self, container_id: &str) -> bool {
		match self.dom.get_by_id(container_id) {
			Some(container) => self.detach(&container),
			None => false,
		}
	}

	fn destroy_all(&self) {
		let controllers = self.controllers.take();
		for controller in &controllers {
			controller.destroy();
		}
	}

	fn trigger(&self, event: &DomEvent<D::Node>) {
		let Some(url) = event
			.detail
			.as_ref()
			.and_then(|detail| detail.get("url"))
			.and_then(Value::as_str)
		else {
			debug_log!("{} without detail.url", TRIGGER_EVENT);
			return;
		};
		let results = format!("#{}", self.settings.results_id);
		let request = AjaxRequest::get(url).element(results);
		if let Err(err) = self.transport.ajax(request) {
			warn_log!("trigger request failed: {}", err);
		}
	}

	fn bind_signals(this: &Rc<Self>) {
		this.unbind_signals();

		let after_swap = EventKind::custom(AFTER_SWAP_EVENT);
		let init = EventKind::custom(INIT_EVENT);
		let trigger = EventKind::custom(TRIGGER_EVENT);
		let mut ids = vec![
			Self::listen(this, ListenTarget::Document, after_swap, |inner, event| {
				let swapped = event.target.clone().filter(|node| inner.dom.is_connected(node));
				if let Some(root) = swapped.or_else(|| inner.dom.body()) {
					inner.after_swap(&root);
				}
			}),
			Self::listen(this, ListenTarget::Document, init, |inner, event| {
				inner.reinit(init_target(event.detail.as_ref()).as_deref());
			}),
			Self::listen(this, ListenTarget::Document, trigger, |inner, event| {
				inner.trigger(event);
			}),
			Self::listen(this, ListenTarget::Document, EventKind::Click, |inner, event| {
				if let Some(target) = &event.target {
					select_list_click(&*inner.dom, target);
				}
			}),
			Self::listen(this, ListenTarget::Window, EventKind::Resize, |inner, _| {
				inner.breakpoints.handle_resize(inner.dom.viewport_width());
			}),
		];
		debug_log!("bound {} page-level listeners", ids.len());
		this.signals.borrow_mut().append(&mut ids);
	}

	fn listen<F>(
		this: &Rc<Self>,
		target: ListenTarget<D::Node>,
		kind: EventKind,
		handler: F,
	) -> ListenerId
	where
		F: Fn(&Self, &DomEvent<D::Node>) + 'static,
	{
		let weak: Weak<Self> = Rc::downgrade(this);
		this.dom.listen(
			&target,
			kind,
			listener(move |event| {
				if let Some(inner) = weak.upgrade() {
					handler(&*inner, event);
				}
			}),
		)
	}
}

impl<D: Dom, T: Transport> RegistryInner<D, T> {
	fn unbind_signals(&self) {
		for id in self.signals.take() {
			self.dom.unlisten(id);
		}
	}
}

/// Container id carried by a `tableaux_init` event: either the detail
/// itself as a string or its `id` field.
fn init_target(detail: Option<&Value>) -> Option<String> {
	match detail? {
		Value::String(id) => Some(id.clone()),
		Value::Object(map) => map.get("id").and_then(Value::as_str).map(str::to_string),
		_ => None,
	}
}
