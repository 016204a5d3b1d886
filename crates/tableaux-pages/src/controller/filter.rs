//! Filter controls inside a table container.
//!
//! `.filter-submit` elements re-query the results region on `change`;
//! `.filter-clear` buttons empty their input and re-query on `click`.

use std::rc::Rc;

use tableaux_core::debug_log;

use super::ControllerInner;
use crate::dom::{Dom, EventKind, Selector};
use crate::transport::{AjaxRequest, Transport};

/// Class of controls that re-submit the filters when changed.
pub const FILTER_SUBMIT_CLASS: &str = "filter-submit";

/// Class of buttons that clear one filter input.
pub const FILTER_CLEAR_CLASS: &str = "filter-clear";

/// Attribute on a clear button naming the id of the input it clears.
pub const CLEAR_ATTR: &str = "data-clear";

/// Class of the wrapper pairing a filter input with its clear button.
pub const FORM_GROUP_CLASS: &str = "form-group";

impl<D, T> ControllerInner<D, T>
where
	D: Dom + 'static,
	T: Transport + 'static,
{
	pub(super) fn bind_filters(this: &Rc<Self>) {
		let dom = &this.dom;
		for control in dom.query_all(&this.container, &Selector::class(FILTER_SUBMIT_CLASS)) {
			this.on(&control, EventKind::Change, Rc::downgrade(this), |inner, _| {
				inner.submit_filters()
			});
		}
		for button in dom.query_all(&this.container, &Selector::class(FILTER_CLEAR_CLASS)) {
			this.on(&button, EventKind::Click, Rc::downgrade(this), |inner, event| {
				if let Some(target) = &event.target {
					inner.clear_filter(target);
				}
			});
		}
	}
}

impl<D: Dom, T: Transport> ControllerInner<D, T> {
	/// GETs the current page with the filter form values into the results
	/// region.
	pub(crate) fn submit_filters(&self) {
		let results = format!("#{}{}", self.prefix, self.settings.results_id);
		self.send(
			AjaxRequest::get(self.dom.location())
				.source(results.clone())
				.target(Some(results))
				.values(self.filter_values()),
		);
	}

	/// Empties the input a clear button belongs to, then re-submits.
	pub(crate) fn clear_filter(&self, clicked: &D::Node) {
		let dom = &*self.dom;
		let button = dom
			.closest(clicked, &Selector::class(FILTER_CLEAR_CLASS))
			.unwrap_or_else(|| clicked.clone());

		let field = match dom.attribute(&button, CLEAR_ATTR).filter(|id| !id.is_empty()) {
			Some(id) => dom.get_by_id(&id),
			None => dom
				.closest(&button, &Selector::class(FORM_GROUP_CLASS))
				.and_then(|group| dom.query(&group, &Selector::tag("input"))),
		};

		match field {
			Some(field) => {
				dom.set_value(&field, "");
				dom.set_checked(&field, false);
			}
			None => debug_log!("filter-clear without an input to clear"),
		}
		self.submit_filters();
	}
}
