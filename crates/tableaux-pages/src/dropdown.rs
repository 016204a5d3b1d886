//! Select-list dropdowns rendered by the tableaux filter templates.
//!
//! A `.select-list` holds a `.select-title` and a `.select-options` panel.
//! One document-level click handler keeps at most the clicked list open.

use crate::dom::{Dom, Selector};

/// Class of a dropdown wrapper.
pub const SELECT_LIST_CLASS: &str = "select-list";
/// Class of the element that toggles the panel.
pub const SELECT_TITLE_CLASS: &str = "select-title";
/// Class of the options panel.
pub const SELECT_OPTIONS_CLASS: &str = "select-options";
/// Class present on an open options panel.
pub const OPENED_CLASS: &str = "opened";
/// Class of a list that stays open while options are picked.
pub const MULTIPLE_CLASS: &str = "multiple";

/// Applies the dropdown open/close rules for a click on `target`.
///
/// - every open panel outside the clicked list closes
/// - a click on the list's title toggles its panel
/// - any other click inside a single-select list closes its panel
pub fn select_list_click<D: Dom>(dom: &D, target: &D::Node) {
	let list = dom.closest(target, &Selector::class(SELECT_LIST_CLASS));

	if let Some(body) = dom.body() {
		let opened = Selector::all([
			Selector::class(SELECT_OPTIONS_CLASS),
			Selector::class(OPENED_CLASS),
		]);
		for panel in dom.query_all(&body, &opened) {
			if list.is_none() || dom.parent(&panel) != list {
				dom.remove_class(&panel, OPENED_CLASS);
			}
		}
	}

	let Some(list) = list else {
		return;
	};
	let Some(panel) = dom.query(&list, &Selector::class(SELECT_OPTIONS_CLASS)) else {
		return;
	};
	if dom.has_class(target, SELECT_TITLE_CLASS) {
		dom.toggle_class(&panel, OPENED_CLASS);
	} else if !dom.has_class(&list, MULTIPLE_CLASS) {
		dom.remove_class(&panel, OPENED_CLASS);
	}
}
