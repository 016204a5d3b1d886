//! Delegated click handling for table elements.

use tableaux_core::selection::shift_range;
use tableaux_core::table::PK_ATTR;
use tableaux_core::{CellId, CellKind, ClickAction, TableConfig, debug_log};

use super::{ControllerInner, EDIT_CELL_CLASS, EDITING_CLASS, OPEN_CLASS};
use crate::csrf::csrf_header;
use crate::dom::{Dom, DomEvent, Selector};
use crate::transport::{AjaxRequest, Transport};

impl<D: Dom, T: Transport> ControllerInner<D, T> {
	/// Handles a click anywhere inside one of the container's tables.
	pub(crate) fn table_click(&self, event: &DomEvent<D::Node>) {
		let Some(target) = event.target.clone() else {
			return;
		};
		let dom = &*self.dom;
		let row = dom.closest(&target, &Selector::tag("tr"));
		let table = dom.closest(&target, &Selector::tag("table"));
		let (Some(row), Some(table)) = (row, table) else {
			return;
		};

		if dom.has_class(&target, EDITING_CLASS) {
			dom.toggle_class(&target, OPEN_CLASS);
			return;
		}

		let open_editor = Selector::all([Selector::class(EDITING_CLASS), Selector::class(OPEN_CLASS)]);
		if let Some(open) = dom.query(&self.container, &open_editor) {
			self.commit_edit(&open, &target);
		}

		if dom.tag_name(&target) == "td" {
			self.cell_click(&target, &row, &table);
		} else if dom.attribute(&target, "name").as_deref()
			== Some(self.settings.checkbox_name.as_str())
		{
			self.checkbox_click(&target, event.shift_key);
		}
	}

	/// POSTs the open inline editor back to the page and closes it.
	fn commit_edit(&self, open: &D::Node, clicked: &D::Node) {
		let dom = &*self.dom;
		let mut request = AjaxRequest::post("");
		if let Some(id) = dom.id(open) {
			request = request.element(format!("#{id}"));
		}
		if let Some(key) = dom
			.closest(open, &Selector::tag("tr"))
			.and_then(|row| dom.attribute(&row, PK_ATTR))
		{
			request = request.value("id", key);
		}
		if let Some(column) = dom.attribute(clicked, "name") {
			request = request.value("column", column);
		}
		if let Some((name, token)) = csrf_header(dom) {
			request = request.header(name, token);
		}

		self.send(request);
		dom.remove_class(open, OPEN_CLASS);
	}

	fn cell_click(&self, cell: &D::Node, row: &D::Node, table: &D::Node) {
		let dom = &*self.dom;
		let checkbox = Selector::name(self.settings.checkbox_name.as_str());
		if dom.query(cell, &checkbox).is_some() {
			return;
		}

		let column = dom
			.children(row)
			.iter()
			.position(|child| child == cell)
			.unwrap_or_default();
		let row_key = dom.attribute(row, PK_ATTR).filter(|key| !key.is_empty());
		let config = TableConfig::from_attributes(|name| dom.attribute(table, name));

		if dom.has_class(cell, EDIT_CELL_CLASS) {
			if let Some(id) = self.cell_id(cell, CellKind::Edit, row_key.as_deref(), column) {
				self.send(AjaxRequest::get("").element(id.selector()));
			}
		} else if let Some(url) = config.row_url(row_key.as_deref()) {
			match config.click {
				ClickAction::Navigate => self.navigate(&url),
				ClickAction::PartialUpdate => {
					let source = dom
						.id(row)
						.or_else(|| dom.id(table))
						.map(|id| format!("#{id}"));
					let mut request = AjaxRequest::get(url)
						.target(config.target.clone())
						.values(self.filter_values());
					if let Some(source) = source {
						request = request.source(source);
					}
					self.send(request);
				}
				ClickAction::None | ClickAction::Custom => {}
			}
		} else if config.click == ClickAction::Custom
			&& let Some(id) = self.cell_id(cell, CellKind::Custom, row_key.as_deref(), column)
		{
			self.send(
				AjaxRequest::get("")
					.element(id.selector())
					.values(self.filter_values()),
			);
		}
	}

	/// Assigns a synthesized id to `cell`. Rows without a key are skipped.
	fn cell_id(
		&self,
		cell: &D::Node,
		kind: CellKind,
		row_key: Option<&str>,
		column: usize,
	) -> Option<CellId> {
		let Some(row_key) = row_key else {
			debug_log!("row has no {} attribute; cell request skipped", PK_ATTR);
			return None;
		};
		let id = CellId::new(
			self.prefix.as_str(),
			kind,
			row_key,
			column,
			self.dom.outer_width(),
		);
		self.dom.set_attribute(cell, "id", &id.to_string());
		Some(id)
	}

	/// Values of the container's filter form, sent with row actions.
	pub(crate) fn filter_values(&self) -> Vec<(String, String)> {
		self.dom
			.query(
				&self.container,
				&Selector::class(self.settings.filter_form_class.as_str()),
			)
			.map(|form| self.dom.form_values(&form))
			.unwrap_or_default()
	}

	fn checkbox_click(&self, clicked: &D::Node, shift: bool) {
		let dom = &*self.dom;
		if let Some(page) = &self.select_all_page {
			dom.set_checked(page, false);
		}

		let anchor = self.last_checked.replace(Some(clicked.clone()));
		if let Some(anchor) = anchor
			&& shift
		{
			let boxes = self.row_checkboxes();
			let start = boxes.iter().position(|b| b == &anchor);
			let end = boxes.iter().position(|b| b == clicked);
			if let (Some(start), Some(end)) = (start, end) {
				let checked = dom.is_checked(clicked);
				for checkbox in &boxes[shift_range(start, end)] {
					dom.set_checked(checkbox, checked);
				}
			}
		}

		self.count_checked();
	}
}
