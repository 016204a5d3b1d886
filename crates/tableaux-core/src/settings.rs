//! Page-level settings
//!
//! The server can ship settings as JSON in a
//! `<script type="application/json" id="tableaux-settings">` element. Every
//! field is optional; missing fields fall back to the names the tableaux
//! templates render by default.

use serde::{Deserialize, Serialize};

use crate::breakpoint::BreakpointTable;
use crate::error::Result;

/// Id of the script element carrying settings JSON.
pub const SETTINGS_SCRIPT_ID: &str = "tableaux-settings";

/// DOM names and breakpoint thresholds used by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Breakpoint thresholds (`{"sm": 480, ...}`).
	pub breakpoints: BreakpointTable,
	/// Attribute marking a table container.
	pub container_attr: String,
	/// Value of [`Settings::container_attr`] on a table container.
	pub container_value: String,
	/// `name` of the per-row selection checkboxes.
	pub checkbox_name: String,
	/// Id (after the table prefix) of the "select all results" checkbox.
	pub select_all_id: String,
	/// Id (after the table prefix) of the "select all on page" checkbox.
	pub select_all_page_id: String,
	/// Class of the selection count display.
	pub count_class: String,
	/// `name` of the hidden input collecting selected row ids.
	pub selected_ids_name: String,
	/// `name` of the hidden breakpoint input, also the request parameter.
	pub breakpoint_field: String,
	/// Class of the bulk action control.
	pub action_menu_class: String,
	/// Class of the filter form whose values accompany row clicks.
	pub filter_form_class: String,
	/// Id (after the table prefix) of the results region.
	pub results_id: String,
	/// Text shown in the count display while everything is selected.
	pub all_label: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			breakpoints: BreakpointTable::default(),
			container_attr: "data-controller".to_string(),
			container_value: "tableaux".to_string(),
			checkbox_name: "select-checkbox".to_string(),
			select_all_id: "select_all".to_string(),
			select_all_page_id: "select_all_page".to_string(),
			count_class: "count".to_string(),
			selected_ids_name: "selected_ids".to_string(),
			breakpoint_field: "_bp".to_string(),
			action_menu_class: "selectActionMenu".to_string(),
			filter_form_class: "action-form".to_string(),
			results_id: "table_data".to_string(),
			all_label: "All".to_string(),
		}
	}
}

impl Settings {
	/// Parses settings JSON, filling missing fields with defaults.
	///
	/// # Errors
	///
	/// Returns [`crate::TableauxError::InvalidSettings`] for malformed JSON or
	/// an invalid breakpoint table.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}
}
