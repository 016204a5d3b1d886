//! Page-wide breakpoint tracking with publish/subscribe.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::BreakpointTable;
use crate::debug_log;

/// Callback invoked with the new breakpoint name.
pub type BreakpointCallback = Rc<dyn Fn(&str) + 'static>;

/// Handle returned by [`BreakpointService::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

thread_local! {
	static GLOBAL_SERVICE: RefCell<Option<Rc<BreakpointService>>> = const { RefCell::new(None) };
}

/// Tracks the active breakpoint and notifies subscribers when it changes.
///
/// There is one viewport per page, so the browser entry point installs a
/// single instance with [`BreakpointService::install`]. Everything runs on
/// the browser main thread; interior mutability uses `Cell`/`RefCell`.
///
/// # Example
///
/// ```
/// use tableaux_core::breakpoint::{BreakpointService, BreakpointTable};
///
/// let service = BreakpointService::new(BreakpointTable::default(), 800);
/// assert_eq!(service.get(), "md");
///
/// let id = service.subscribe(|name| println!("now at {name}"));
/// assert!(service.handle_resize(1300));
/// assert_eq!(service.get(), "xl");
/// assert!(service.unsubscribe(id));
/// ```
pub struct BreakpointService {
	table: BreakpointTable,
	current: RefCell<String>,
	width: Cell<u32>,
	subscribers: RefCell<BTreeMap<SubscriptionId, BreakpointCallback>>,
	next_id: Cell<u64>,
}

impl fmt::Debug for BreakpointService {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BreakpointService")
			.field("current", &*self.current.borrow())
			.field("width", &self.width.get())
			.field("subscribers", &self.subscribers.borrow().len())
			.finish()
	}
}

impl BreakpointService {
	/// Creates a service for `table`, starting at viewport `width`.
	pub fn new(table: BreakpointTable, width: u32) -> Self {
		let current = table.resolve(width).name.clone();
		Self {
			table,
			current: RefCell::new(current),
			width: Cell::new(width),
			subscribers: RefCell::new(BTreeMap::new()),
			next_id: Cell::new(1),
		}
	}

	/// Returns the active breakpoint name.
	pub fn get(&self) -> String {
		self.current.borrow().clone()
	}

	/// Returns the last viewport width seen.
	pub fn width(&self) -> u32 {
		self.width.get()
	}

	/// Returns the breakpoint table.
	pub fn table(&self) -> &BreakpointTable {
		&self.table
	}

	/// Registers `callback`, invoked with the new name on every change.
	pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
	where
		F: Fn(&str) + 'static,
	{
		let id = SubscriptionId(self.next_id.get());
		self.next_id.set(id.0 + 1);
		self.subscribers.borrow_mut().insert(id, Rc::new(callback));
		id
	}

	/// Removes a subscription. Returns `false` if it was already removed.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.subscribers.borrow_mut().remove(&id).is_some()
	}

	/// Number of active subscriptions.
	pub fn subscriber_count(&self) -> usize {
		self.subscribers.borrow().len()
	}

	/// Recomputes the breakpoint for a new viewport width.
	///
	/// Subscribers are notified only when the resolved name differs from the
	/// previous one. Returns whether a change happened.
	///
	/// Callbacks run from a snapshot of the subscriber list, so a callback
	/// may subscribe or unsubscribe. Callbacks must not resize the viewport.
	pub fn handle_resize(&self, width: u32) -> bool {
		self.width.set(width);
		let resolved = self.table.resolve(width);
		if *self.current.borrow() == resolved.name {
			return false;
		}

		debug_log!(
			"breakpoint {} -> {} at width {}",
			self.current.borrow(),
			resolved.name,
			width
		);
		*self.current.borrow_mut() = resolved.name.clone();

		let callbacks: Vec<BreakpointCallback> =
			self.subscribers.borrow().values().cloned().collect();
		let name = resolved.name.clone();
		for callback in callbacks {
			callback(&name);
		}
		true
	}

	/// Installs `service` as the page-wide instance and returns it.
	///
	/// Replaces any previously installed instance.
	pub fn install(service: BreakpointService) -> Rc<BreakpointService> {
		let service = Rc::new(service);
		GLOBAL_SERVICE.with(|slot| {
			*slot.borrow_mut() = Some(Rc::clone(&service));
		});
		service
	}

	/// Returns the page-wide instance, if one is installed.
	pub fn global() -> Option<Rc<BreakpointService>> {
		GLOBAL_SERVICE.with(|slot| slot.borrow().clone())
	}

	/// Removes the page-wide instance.
	pub fn uninstall() -> Option<Rc<BreakpointService>> {
		GLOBAL_SERVICE.with(|slot| slot.borrow_mut().take())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn service() -> BreakpointService {
		BreakpointService::new(BreakpointTable::default(), 800)
	}

	fn recorder(service: &BreakpointService) -> (SubscriptionId, Rc<RefCell<Vec<String>>>) {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&seen);
		let id = service.subscribe(move |name| sink.borrow_mut().push(name.to_string()));
		(id, seen)
	}

	#[rstest]
	fn test_initial_breakpoint(service: BreakpointService) {
		assert_eq!(service.get(), "md");
		assert_eq!(service.width(), 800);
	}

	#[rstest]
	fn test_notifies_once_per_transition(service: BreakpointService) {
		let (_, seen) = recorder(&service);

		assert!(!service.handle_resize(900));
		assert!(!service.handle_resize(1000));
		assert!(service.handle_resize(1100));
		assert!(!service.handle_resize(1200));
		assert!(service.handle_resize(300));

		assert_eq!(*seen.borrow(), vec!["lg".to_string(), "xs".to_string()]);
		assert_eq!(service.width(), 300);
	}

	#[rstest]
	fn test_multiple_subscribers(service: BreakpointService) {
		let (_, first) = recorder(&service);
		let (_, second) = recorder(&service);

		service.handle_resize(1500);

		assert_eq!(*first.borrow(), vec!["xl".to_string()]);
		assert_eq!(*second.borrow(), vec!["xl".to_string()]);
	}

	#[rstest]
	fn test_unsubscribe_stops_notifications(service: BreakpointService) {
		let (id, seen) = recorder(&service);
		assert!(service.unsubscribe(id));
		assert!(!service.unsubscribe(id));

		service.handle_resize(1500);

		assert!(seen.borrow().is_empty());
		assert_eq!(service.subscriber_count(), 0);
	}

	#[rstest]
	fn test_callback_may_unsubscribe_itself() {
		let service = Rc::new(BreakpointService::new(BreakpointTable::default(), 800));
		let own_id: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
		let calls = Rc::new(Cell::new(0));

		let weak = Rc::downgrade(&service);
		let id = {
			let own_id = Rc::clone(&own_id);
			let calls = Rc::clone(&calls);
			service.subscribe(move |_| {
				calls.set(calls.get() + 1);
				if let (Some(service), Some(id)) = (weak.upgrade(), own_id.get()) {
					service.unsubscribe(id);
				}
			})
		};
		own_id.set(Some(id));

		service.handle_resize(1500);
		service.handle_resize(300);

		assert_eq!(calls.get(), 1);
		assert_eq!(service.subscriber_count(), 0);
	}

	#[rstest]
	fn test_global_install_roundtrip() {
		BreakpointService::uninstall();
		assert!(BreakpointService::global().is_none());

		let installed =
			BreakpointService::install(BreakpointService::new(BreakpointTable::default(), 500));
		let global = BreakpointService::global().unwrap();
		assert!(Rc::ptr_eq(&installed, &global));
		assert_eq!(global.get(), "sm");

		BreakpointService::uninstall();
		assert!(BreakpointService::global().is_none());
	}
}
