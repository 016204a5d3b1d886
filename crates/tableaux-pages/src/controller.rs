//! Per-container table controller
//!
//! A [`TableController`] binds one `[data-controller="tableaux"]` container:
//! row checkboxes, the two select-all controls, the selection count, inline
//! editing, row click actions, filter controls and breakpoint re-rendering.
//!
//! ## Lifecycle
//!
//! ```text
//! unbound --TableController::new--> bound --destroy--> unbound
//! ```
//!
//! Every listener and the breakpoint subscription are recorded when the
//! controller is built, and [`TableController::destroy`] removes exactly
//! those. Listener closures hold a weak reference to the controller, so the
//! document never keeps it alive; dropping the last handle destroys it.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use tableaux_core::{BreakpointService, BreakpointTable, Settings};
//! use tableaux_pages::controller::TableController;
//! use tableaux_pages::dom::builder::{checkbox, div, span, table, td, tr};
//! use tableaux_pages::dom::{Dom, MemoryDom};
//! use tableaux_pages::transport::RecordingTransport;
//!
//! let dom = Rc::new(MemoryDom::new());
//! let container = dom.mount(
//!     dom.body_id(),
//!     div()
//!         .attr("data-controller", "tableaux")
//!         .child(span().class("count"))
//!         .child(table().child(tr().attr("data-pk", "7").child(td().child(checkbox("select-checkbox", "7"))))),
//! );
//! let service = Rc::new(BreakpointService::new(BreakpointTable::default(), 1024));
//! let controller = TableController::new(
//!     Rc::clone(&dom),
//!     Rc::new(RecordingTransport::new()),
//!     service,
//!     container,
//!     Rc::new(Settings::default()),
//! );
//!
//! let boxed = dom.query_all(&container, &tableaux_pages::dom::Selector::name("select-checkbox"))[0];
//! dom.click(boxed);
//! assert_eq!(controller.selection().hidden_value(), "7");
//! controller.destroy();
//! ```

mod click;
mod filter;

pub use filter::{CLEAR_ATTR, FILTER_CLEAR_CLASS, FILTER_SUBMIT_CLASS, FORM_GROUP_CLASS};

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use tableaux_core::{
	BreakpointService, Selection, Settings, SubscriptionId, TableConfig, debug_log, warn_log,
};

use crate::dom::{Dom, DomEvent, EventKind, ListenTarget, ListenerId, Selector, listener};
use crate::transport::{AjaxRequest, Swap, Transport};

/// Attribute set on a container while a controller is bound to it.
pub const BOUND_ATTR: &str = "data-tableaux-bound";

/// Class of cells that open an inline editor when clicked.
pub const EDITING_CLASS: &str = "td-editing";

/// Class toggled on an inline editor while it is expanded.
pub const OPEN_CLASS: &str = "open";

/// Class of cells fetched as an edit template when clicked.
pub const EDIT_CELL_CLASS: &str = "td-edit";

static GENERATED_IDS: AtomicU64 = AtomicU64::new(1);

/// Controller for one table container.
///
/// Cloning yields another handle to the same controller. Dropping the last
/// handle unbinds it as [`TableController::destroy`] does.
pub struct TableController<D: Dom, T: Transport> {
	inner: Rc<ControllerInner<D, T>>,
}

impl<D: Dom, T: Transport> Clone for TableController<D, T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<D: Dom, T: Transport> Drop for ControllerInner<D, T> {
	fn drop(&mut self) {
		self.destroy();
	}
}

impl<D: Dom, T: Transport> std::fmt::Debug for TableController<D, T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TableController")
			.field("container", &self.inner.container)
			.field("prefix", &self.inner.prefix)
			.field("breakpoint", &self.inner.breakpoint.borrow())
			.field("listeners", &self.inner.listeners.borrow().len())
			.field("destroyed", &self.inner.destroyed.get())
			.finish()
	}
}

pub(crate) struct ControllerInner<D: Dom, T: Transport> {
	pub(crate) dom: Rc<D>,
	pub(crate) transport: Rc<T>,
	breakpoints: Rc<BreakpointService>,
	pub(crate) settings: Rc<Settings>,
	pub(crate) container: D::Node,
	pub(crate) prefix: String,
	select_all: Option<D::Node>,
	pub(crate) select_all_page: Option<D::Node>,
	pub(crate) last_checked: RefCell<Option<D::Node>>,
	breakpoint: RefCell<String>,
	listeners: RefCell<Vec<ListenerId>>,
	subscription: Cell<Option<SubscriptionId>>,
	destroyed: Cell<bool>,
}

impl<D, T> TableController<D, T>
where
	D: Dom + 'static,
	T: Transport + 'static,
{
	/// Binds a controller to `container` with no id prefix.
	pub fn new(
		dom: Rc<D>,
		transport: Rc<T>,
		breakpoints: Rc<BreakpointService>,
		container: D::Node,
		settings: Rc<Settings>,
	) -> Self {
		Self::with_prefix(dom, transport, breakpoints, container, settings, "")
	}

	/// Binds a controller to `container`.
	///
	/// `prefix` disambiguates element ids when a page holds several tables:
	/// the select-all controls are looked up as `{prefix}select_all` and
	/// `{prefix}select_all_page`.
	pub fn with_prefix(
		dom: Rc<D>,
		transport: Rc<T>,
		breakpoints: Rc<BreakpointService>,
		container: D::Node,
		settings: Rc<Settings>,
		prefix: impl Into<String>,
	) -> Self {
		let prefix = prefix.into();
		let find = |id: &str| dom.query(&container, &Selector::id(format!("{prefix}{id}")));
		let select_all = find(&settings.select_all_id);
		let select_all_page = find(&settings.select_all_page_id);
		let current = breakpoints.get();

		let inner = Rc::new(ControllerInner {
			dom,
			transport,
			breakpoints,
			settings,
			container,
			prefix,
			select_all,
			select_all_page,
			last_checked: RefCell::new(None),
			breakpoint: RefCell::new(current.clone()),
			listeners: RefCell::new(Vec::new()),
			subscription: Cell::new(None),
			destroyed: Cell::new(false),
		});

		inner.write_breakpoint_field(&current);
		let weak = Rc::downgrade(&inner);
		let subscription = inner.breakpoints.subscribe(move |name| {
			if let Some(inner) = weak.upgrade() {
				inner.on_breakpoint_change(name);
			}
		});
		inner.subscription.set(Some(subscription));
		ControllerInner::bind(&inner);
		inner.dom.set_attribute(&inner.container, BOUND_ATTR, "true");
		inner.apply_initial_state();

		debug_log!(
			"bound tableaux controller (prefix {:?}, {} listeners)",
			inner.prefix,
			inner.listeners.borrow().len()
		);
		Self { inner }
	}
}

impl<D: Dom, T: Transport> TableController<D, T> {
	/// Mirrors the "select all on page" box onto every row checkbox.
	pub fn select_all_page(&self) {
		self.inner.select_all_page();
	}

	/// Applies the "select all results" box.
	pub fn select_all(&self) {
		self.inner.select_all();
	}

	/// Recomputes row highlighting, the hidden ids field, the count display
	/// and the bulk action control.
	pub fn count_checked(&self) {
		self.inner.count_checked();
	}

	/// Handles a click inside one of the container's tables. Bound to every
	/// `<table>` at construction.
	pub fn table_click(&self, event: &DomEvent<D::Node>) {
		self.inner.table_click(event);
	}

	/// Reacts to a breakpoint change by re-rendering this container.
	pub fn on_breakpoint_change(&self, name: &str) {
		self.inner.on_breakpoint_change(name);
	}

	/// Current selection, derived from the document.
	pub fn selection(&self) -> Selection {
		self.inner.selection()
	}

	/// Removes every listener and the breakpoint subscription. Idempotent.
	pub fn destroy(&self) {
		self.inner.destroy();
	}

	/// The bound container.
	pub fn container(&self) -> &D::Node {
		&self.inner.container
	}

	/// Id prefix of this table.
	pub fn prefix(&self) -> &str {
		&self.inner.prefix
	}

	/// Breakpoint this controller last rendered for.
	pub fn breakpoint(&self) -> String {
		self.inner.breakpoint.borrow().clone()
	}

	/// Number of listeners currently attached by this controller.
	pub fn listener_count(&self) -> usize {
		self.inner.listeners.borrow().len()
	}

	/// Whether [`TableController::destroy`] ran.
	pub fn is_destroyed(&self) -> bool {
		self.inner.destroyed.get()
	}
}

impl<D, T> ControllerInner<D, T>
where
	D: Dom + 'static,
	T: Transport + 'static,
{
	fn bind(this: &Rc<Self>) {
		let dom = &this.dom;

		if let Some(node) = &this.select_all {
			this.on(node, EventKind::Click, Self::weak(this), |inner, _| inner.select_all());
		}
		if let Some(node) = &this.select_all_page {
			this.on(node, EventKind::Click, Self::weak(this), |inner, _| {
				inner.select_all_page()
			});
		}

		for table in dom.query_all(&this.container, &Selector::tag("table")) {
			this.on(&table, EventKind::Click, Self::weak(this), |inner, event| {
				inner.table_click(event)
			});
		}

		Self::bind_filters(this);

		if dom
			.query(&this.container, &Selector::class(EDITING_CLASS))
			.is_some()
		{
			let weak = Self::weak(this);
			let id = dom.listen(
				&ListenTarget::Document,
				EventKind::KeyPress,
				listener(move |event| {
					if let Some(inner) = weak.upgrade()
						&& event.key.as_deref() == Some("Enter")
					{
						inner.dom.blur_active();
					}
				}),
			);
			this.listeners.borrow_mut().push(id);
		}
	}

	fn weak(this: &Rc<Self>) -> Weak<Self> {
		Rc::downgrade(this)
	}

	/// Attaches `handler` to `node`, upgrading `weak` on every event.
	pub(crate) fn on<F>(&self, node: &D::Node, kind: EventKind, weak: Weak<Self>, handler: F)
	where
		F: Fn(&Self, &DomEvent<D::Node>) + 'static,
	{
		let id = self.dom.listen(
			&ListenTarget::Node(node.clone()),
			kind,
			listener(move |event| {
				if let Some(inner) = weak.upgrade() {
					handler(&*inner, event);
				}
			}),
		);
		self.listeners.borrow_mut().push(id);
	}
}

impl<D: Dom, T: Transport> ControllerInner<D, T> {
	pub(crate) fn row_checkboxes(&self) -> Vec<D::Node> {
		self.dom.query_all(
			&self.container,
			&Selector::all([
				Selector::tag("input"),
				Selector::name(self.settings.checkbox_name.as_str()),
			]),
		)
	}

	fn named_input(&self, name: &str) -> Option<D::Node> {
		self.dom.query(
			&self.container,
			&Selector::all([Selector::tag("input"), Selector::name(name)]),
		)
	}

	fn count_display(&self) -> Option<D::Node> {
		self.dom
			.query(&self.container, &Selector::class(self.settings.count_class.as_str()))
	}

	fn select_all_checked(&self) -> bool {
		self.select_all
			.as_ref()
			.is_some_and(|node| self.dom.is_checked(node))
	}

	pub(crate) fn select_all_page(&self) {
		let Some(page) = &self.select_all_page else {
			return;
		};
		let checked = self.dom.is_checked(page);

		if let Some(holder) = self.select_all.as_ref().and_then(|all| self.dom.parent(all)) {
			self.dom.set_visible(&holder, checked);
		}
		for checkbox in self.row_checkboxes() {
			self.dom.set_checked(&checkbox, checked);
		}

		self.last_checked.replace(None);
		self.count_checked();
	}

	pub(crate) fn select_all(&self) {
		let Some(all) = &self.select_all else {
			return;
		};
		let checked = self.dom.is_checked(all);

		if checked && let Some(count) = self.count_display() {
			self.dom.set_text(&count, &self.settings.all_label);
		}
		if let Some(page) = &self.select_all_page {
			self.dom.set_disabled(page, checked);
		}
		for checkbox in self.row_checkboxes() {
			self.dom.set_disabled(&checkbox, checked);
		}

		self.last_checked.replace(None);
		self.count_checked();
	}

	/// Applies the server-rendered state of the select-all controls.
	///
	/// Rows are only overwritten when the page box is checked.
	fn apply_initial_state(&self) {
		if self
			.select_all_page
			.as_ref()
			.is_some_and(|page| self.dom.is_checked(page))
		{
			self.select_all_page();
		}
		if self.select_all_checked() {
			self.select_all();
		}
		self.count_checked();
	}

	pub(crate) fn count_checked(&self) {
		let action_menu = self.dom.query(
			&self.container,
			&Selector::class(self.settings.action_menu_class.as_str()),
		);

		if self.select_all_checked() {
			// The count display already shows the "all" label.
			if let Some(menu) = &action_menu {
				self.dom.set_disabled(menu, false);
			}
			return;
		}

		let mut ids = Vec::new();
		for checkbox in self.row_checkboxes() {
			let row = self.dom.closest(&checkbox, &Selector::tag("tr"));
			let table = self.dom.closest(&checkbox, &Selector::tag("table"));
			let (Some(row), Some(table)) = (row, table) else {
				continue;
			};
			let selected_class =
				TableConfig::from_attributes(|name| self.dom.attribute(&table, name)).selected_class;

			if self.dom.is_checked(&checkbox) {
				ids.push(self.dom.value(&checkbox));
				if let Some(class) = &selected_class {
					self.dom.add_class(&row, class);
				}
			} else if let Some(class) = &selected_class {
				self.dom.remove_class(&row, class);
			}
		}

		let selection = Selection::Rows(ids);
		if let Some(hidden) = self.named_input(&self.settings.selected_ids_name) {
			self.dom.set_value(&hidden, &selection.hidden_value());
		}
		if let Some(count) = self.count_display() {
			self.dom
				.set_text(&count, &selection.count_label(&self.settings.all_label));
		}
		if let Some(menu) = &action_menu {
			self.dom.set_disabled(menu, selection.is_empty());
		}
	}

	pub(crate) fn selection(&self) -> Selection {
		if self.select_all_checked() {
			return Selection::All;
		}
		let ids = self
			.row_checkboxes()
			.into_iter()
			.filter(|checkbox| {
				self.dom.is_checked(checkbox)
					&& self.dom.closest(checkbox, &Selector::tag("tr")).is_some()
					&& self.dom.closest(checkbox, &Selector::tag("table")).is_some()
			})
			.map(|checkbox| self.dom.value(&checkbox))
			.collect();
		Selection::Rows(ids)
	}

	fn write_breakpoint_field(&self, name: &str) {
		if let Some(field) = self.named_input(&self.settings.breakpoint_field) {
			self.dom.set_value(&field, name);
		}
	}

	pub(crate) fn on_breakpoint_change(&self, name: &str) {
		if self.destroyed.get() || *self.breakpoint.borrow() == name {
			return;
		}
		self.breakpoint.replace(name.to_string());
		self.write_breakpoint_field(name);

		let id = self.container_id();
		let request = AjaxRequest::get(self.dom.location())
			.target(Some(format!("#{id}")))
			.swap(Swap::OuterHtml)
			.value(self.settings.breakpoint_field.as_str(), name);
		self.send(request);
	}

	/// Container id, assigning a generated one when the server rendered none.
	fn container_id(&self) -> String {
		if let Some(id) = self.dom.id(&self.container) {
			return id;
		}
		let id = format!(
			"{}tableaux-{}",
			self.prefix,
			GENERATED_IDS.fetch_add(1, Ordering::Relaxed)
		);
		self.dom.set_attribute(&self.container, "id", &id);
		id
	}

	pub(crate) fn send(&self, request: AjaxRequest) {
		debug_log!("{} {:?}", request.method(), request.url());
		if let Err(err) = self.transport.ajax(request) {
			warn_log!("partial update failed: {}", err);
		}
	}

	pub(crate) fn navigate(&self, url: &str) {
		if let Err(err) = self.transport.navigate(url) {
			warn_log!("navigation to {} failed: {}", url, err);
		}
	}

	fn destroy(&self) {
		if self.destroyed.replace(true) {
			return;
		}
		if let Some(subscription) = self.subscription.take() {
			self.breakpoints.unsubscribe(subscription);
		}
		for id in self.listeners.take() {
			self.dom.unlisten(id);
		}
		self.last_checked.replace(None);
		self.dom.remove_attribute(&self.container, BOUND_ATTR);
		debug_log!("destroyed tableaux controller (prefix {:?})", self.prefix);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dom::MemoryDom;
	use crate::dom::builder::{ElementSpec, button, checkbox, div, hidden, input, span, table, td, tr};
	use crate::transport::RecordingTransport;
	use rstest::{fixture, rstest};
	use tableaux_core::BreakpointTable;

	struct Page {
		dom: Rc<MemoryDom>,
		transport: Rc<RecordingTransport>,
		service: Rc<BreakpointService>,
		container: crate::dom::NodeId,
	}

	impl Page {
		fn controller(&self) -> TableController<MemoryDom, RecordingTransport> {
			TableController::new(
				Rc::clone(&self.dom),
				Rc::clone(&self.transport),
				Rc::clone(&self.service),
				self.container,
				Rc::new(Settings::default()),
			)
		}

		fn by_id(&self, id: &str) -> crate::dom::NodeId {
			self.dom.get_by_id(id).unwrap()
		}
	}

	fn row(pk: &str) -> ElementSpec {
		tr().attr("data-pk", pk).children([
			td().child(checkbox("select-checkbox", pk).id(format!("box{pk}"))),
			td().text(format!("row {pk}")),
		])
	}

	#[fixture]
	fn page() -> Page {
		rendered_page(false, false, [row("7"), row("8"), row("9")])
	}

	fn rendered_page(
		all_checked: bool,
		page_checked: bool,
		rows: impl IntoIterator<Item = ElementSpec>,
	) -> Page {
		let dom = Rc::new(MemoryDom::new());
		let container = dom.mount(
			dom.body_id(),
			div()
				.id("orders")
				.attr("data-controller", "tableaux")
				.children([
					div().child(checkbox("all", "1").id("select_all").checked(all_checked)),
					checkbox("page", "1").id("select_all_page").checked(page_checked),
					span().class("count"),
					hidden("selected_ids"),
					hidden("_bp"),
					button().class("selectActionMenu"),
					table().attr("selected", "table-active").children(rows),
				]),
		);
		Page {
			dom,
			transport: Rc::new(RecordingTransport::new()),
			service: Rc::new(BreakpointService::new(BreakpointTable::default(), 1100)),
			container,
		}
	}

	#[rstest]
	fn test_construction_syncs_state(page: Page) {
		let controller = page.controller();
		let dom = &page.dom;

		let bp = dom
			.query(&page.container, &Selector::name("_bp"))
			.unwrap();
		assert_eq!(dom.value(&bp), "lg");
		assert_eq!(controller.breakpoint(), "lg");
		assert_eq!(dom.attribute(&page.container, BOUND_ATTR).as_deref(), Some("true"));
		let count = dom.query(&page.container, &Selector::class("count")).unwrap();
		assert_eq!(dom.text(&count), "0");
		let menu = dom
			.query(&page.container, &Selector::class("selectActionMenu"))
			.unwrap();
		assert!(dom.is_disabled(&menu));
		assert_eq!(page.service.subscriber_count(), 1);
	}

	#[rstest]
	fn test_checking_rows_highlights_and_counts(page: Page) {
		let controller = page.controller();
		let dom = &page.dom;
		dom.click(page.by_id("box8"));

		assert_eq!(controller.selection(), Selection::Rows(vec!["8".to_string()]));
		let row = dom.closest(&page.by_id("box8"), &Selector::tag("tr")).unwrap();
		assert!(dom.has_class(&row, "table-active"));
		let menu = dom
			.query(&page.container, &Selector::class("selectActionMenu"))
			.unwrap();
		assert!(!dom.is_disabled(&menu));

		dom.click(page.by_id("box8"));
		assert!(!dom.has_class(&row, "table-active"));
		assert!(dom.is_disabled(&menu));
	}

	#[rstest]
	fn test_select_all_page_toggles_rows_and_reveals_select_all(page: Page) {
		let _controller = page.controller();
		let dom = &page.dom;
		let all_holder = dom.parent(&page.by_id("select_all")).unwrap();

		dom.click(page.by_id("select_all_page"));
		assert!(["box7", "box8", "box9"].iter().all(|id| dom.is_checked(&page.by_id(id))));
		assert!(dom.is_visible(all_holder));
		let hidden = dom.query(&page.container, &Selector::name("selected_ids")).unwrap();
		assert_eq!(dom.value(&hidden), "7,8,9");

		dom.click(page.by_id("select_all_page"));
		assert!(["box7", "box8", "box9"].iter().all(|id| !dom.is_checked(&page.by_id(id))));
		assert!(!dom.is_visible(all_holder));
	}

	#[rstest]
	fn test_select_all_enables_action_menu(page: Page) {
		let controller = page.controller();
		let dom = &page.dom;
		let menu = dom
			.query(&page.container, &Selector::class("selectActionMenu"))
			.unwrap();

		dom.click(page.by_id("select_all"));
		assert_eq!(controller.selection(), Selection::All);
		assert!(!dom.is_disabled(&menu));
		assert!(dom.is_disabled(&page.by_id("select_all_page")));
	}

	#[rstest]
	fn test_breakpoint_change_rerenders_container(page: Page) {
		let controller = page.controller();

		page.service.handle_resize(500);

		let requests = page.transport.requests();
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].url(), "http://localhost/");
		assert_eq!(requests[0].target_selector(), Some("#orders"));
		assert_eq!(requests[0].swap_style(), Some(Swap::OuterHtml));
		assert_eq!(requests[0].parameters()["_bp"], "sm");
		assert_eq!(controller.breakpoint(), "sm");

		controller.on_breakpoint_change("sm");
		assert_eq!(page.transport.len(), 1);
	}

	#[rstest]
	fn test_container_without_id_gets_generated_id() {
		let dom = Rc::new(MemoryDom::new());
		let container = dom.mount(dom.body_id(), div().child(input().name("q")));
		let transport = Rc::new(RecordingTransport::new());
		let controller = TableController::with_prefix(
			Rc::clone(&dom),
			Rc::clone(&transport),
			Rc::new(BreakpointService::new(BreakpointTable::default(), 1100)),
			container,
			Rc::new(Settings::default()),
			"orders_",
		);

		controller.on_breakpoint_change("xs");

		let id = dom.id(&container).unwrap();
		assert!(id.starts_with("orders_tableaux-"));
		assert_eq!(
			transport.requests()[0].target_selector(),
			Some(format!("#{id}").as_str())
		);
	}

	#[rstest]
	fn test_destroy_is_idempotent(page: Page) {
		let controller = page.controller();
		let before = page.dom.listener_count();
		assert!(before > 0);

		controller.destroy();
		controller.destroy();

		assert!(controller.is_destroyed());
		assert_eq!(page.dom.listener_count(), 0);
		assert_eq!(page.service.subscriber_count(), 0);
		assert!(page.dom.attribute(&page.container, BOUND_ATTR).is_none());

		page.service.handle_resize(300);
		assert!(page.transport.is_empty());
	}

	#[rstest]
	fn test_rendered_select_all_is_applied_on_construction() {
		let page = rendered_page(true, false, [row("7"), row("8")]);
		let controller = page.controller();
		let dom = &page.dom;

		assert_eq!(controller.selection(), Selection::All);
		assert!(dom.is_disabled(&page.by_id("box7")));
		assert!(dom.is_disabled(&page.by_id("box8")));
		assert!(dom.is_disabled(&page.by_id("select_all_page")));
		let count = dom.query(&page.container, &Selector::class("count")).unwrap();
		assert_eq!(dom.text(&count), "All");
		let menu = dom
			.query(&page.container, &Selector::class("selectActionMenu"))
			.unwrap();
		assert!(!dom.is_disabled(&menu));
	}

	#[rstest]
	fn test_rendered_page_box_checks_every_row() {
		let page = rendered_page(false, true, [row("7"), row("8")]);
		let controller = page.controller();

		assert_eq!(controller.selection().hidden_value(), "7,8");
		let holder = page.dom.parent(&page.by_id("select_all")).unwrap();
		assert!(page.dom.is_visible(holder));
	}

	#[rstest]
	fn test_rendered_row_state_survives_construction() {
		let checked_row = tr().attr("data-pk", "8").child(
			td().child(checkbox("select-checkbox", "8").id("box8").checked(true)),
		);
		let page = rendered_page(false, false, [row("7"), checked_row]);
		let controller = page.controller();

		assert_eq!(controller.selection().hidden_value(), "8");
		assert!(!page.dom.is_disabled(&page.by_id("box7")));
		let count = page
			.dom
			.query(&page.container, &Selector::class("count"))
			.unwrap();
		assert_eq!(page.dom.text(&count), "1");
	}

	#[rstest]
	fn test_dropping_last_handle_unbinds(page: Page) {
		let controller = page.controller();
		let other = controller.clone();
		drop(controller);
		assert!(page.dom.listener_count() > 0);

		drop(other);
		assert_eq!(page.dom.listener_count(), 0);
		assert_eq!(page.service.subscriber_count(), 0);
		assert!(page.dom.attribute(&page.container, BOUND_ATTR).is_none());
	}

	#[rstest]
	fn test_dropped_controller_ignores_events(page: Page) {
		let controller = page.controller();
		drop(controller);

		page.dom.click(page.by_id("box7"));
		page.service.handle_resize(300);

		let count = page
			.dom
			.query(&page.container, &Selector::class("count"))
			.unwrap();
		assert_eq!(page.dom.text(&count), "0");
		assert!(page.transport.is_empty());
	}
}
