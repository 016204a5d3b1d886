//! Per-table configuration read from data attributes
//!
//! The server-side table template declares how a row click behaves:
//!
//! ```html
//! <table data-url="/movies/" data-pk="true" data-click="2"
//!        data-target="#detail" selected="table-active">
//! ```

use std::str::FromStr;

use crate::error::TableauxError;
use crate::warn_log;

/// Table attribute holding the base action URL.
pub const URL_ATTR: &str = "data-url";
/// Table attribute requesting the row key be appended to the URL.
pub const PK_ATTR: &str = "data-pk";
/// Table attribute holding the [`ClickAction`] code.
pub const CLICK_ATTR: &str = "data-click";
/// Table attribute holding the partial-update target selector.
pub const TARGET_ATTR: &str = "data-target";
/// Table attribute naming the class applied to selected rows.
pub const SELECTED_ATTR: &str = "selected";

/// What a click on a data cell does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickAction {
	/// Nothing happens.
	#[default]
	None,
	/// Full page load of the row URL.
	Navigate,
	/// AJAX GET of the row URL into the table's target region.
	PartialUpdate,
	/// AJAX GET scoped to the clicked cell.
	Custom,
}

impl ClickAction {
	/// Code used in the `data-click` attribute.
	pub fn code(self) -> &'static str {
		match self {
			Self::None => "0",
			Self::Navigate => "1",
			Self::PartialUpdate => "2",
			Self::Custom => "3",
		}
	}
}

impl FromStr for ClickAction {
	type Err = TableauxError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"" | "0" => Ok(Self::None),
			"1" => Ok(Self::Navigate),
			"2" => Ok(Self::PartialUpdate),
			"3" => Ok(Self::Custom),
			other => Err(TableauxError::UnknownClickAction(other.to_string())),
		}
	}
}

/// Row-click configuration of one `<table>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableConfig {
	/// Base URL for row actions.
	pub url: Option<String>,
	/// Append the row key to [`TableConfig::url`].
	pub append_pk: bool,
	/// Row click behavior.
	pub click: ClickAction,
	/// Selector of the region replaced by [`ClickAction::PartialUpdate`].
	pub target: Option<String>,
	/// Class applied to rows whose checkbox is checked.
	pub selected_class: Option<String>,
}

impl TableConfig {
	/// Reads the configuration through an attribute getter.
	///
	/// Empty attributes count as absent. An unknown `data-click` code is
	/// logged and treated as [`ClickAction::None`].
	pub fn from_attributes<F>(attribute: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let non_empty = |name: &str| attribute(name).filter(|value| !value.is_empty());

		let click = match non_empty(CLICK_ATTR) {
			Some(code) => code.parse().unwrap_or_else(|err| {
				warn_log!("{}; row clicks disabled", err);
				ClickAction::None
			}),
			None => ClickAction::None,
		};

		Self {
			url: non_empty(URL_ATTR),
			append_pk: non_empty(PK_ATTR).is_some_and(|value| is_truthy(&value)),
			click,
			target: non_empty(TARGET_ATTR),
			selected_class: non_empty(SELECTED_ATTR),
		}
	}

	/// URL for a row action, or `None` when the table declares no URL.
	pub fn row_url(&self, row_key: Option<&str>) -> Option<String> {
		let base = self.url.as_deref()?;
		match (self.append_pk, row_key) {
			(true, Some(key)) => Some(format!("{base}{key}")),
			_ => Some(base.to_string()),
		}
	}
}

fn is_truthy(value: &str) -> bool {
	!matches!(
		value.trim().to_ascii_lowercase().as_str(),
		"" | "0" | "false" | "no" | "off"
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;

	fn config(attrs: &[(&str, &str)]) -> TableConfig {
		let attrs: HashMap<String, String> = attrs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		TableConfig::from_attributes(|name| attrs.get(name).cloned())
	}

	#[rstest]
	#[case("0", ClickAction::None)]
	#[case("", ClickAction::None)]
	#[case("1", ClickAction::Navigate)]
	#[case("2", ClickAction::PartialUpdate)]
	#[case(" 3 ", ClickAction::Custom)]
	fn test_click_action_parse(#[case] code: &str, #[case] expected: ClickAction) {
		assert_eq!(code.parse::<ClickAction>().unwrap(), expected);
	}

	#[rstest]
	fn test_click_action_code_roundtrip() {
		for action in [
			ClickAction::None,
			ClickAction::Navigate,
			ClickAction::PartialUpdate,
			ClickAction::Custom,
		] {
			assert_eq!(action.code().parse::<ClickAction>().unwrap(), action);
		}
	}

	#[rstest]
	fn test_unknown_click_action() {
		let err = "7".parse::<ClickAction>().unwrap_err();
		assert!(matches!(err, TableauxError::UnknownClickAction(code) if code == "7"));
	}

	#[rstest]
	fn test_from_attributes_full() {
		let cfg = config(&[
			("data-url", "/movies/"),
			("data-pk", "True"),
			("data-click", "2"),
			("data-target", "#detail"),
			("selected", "table-active"),
		]);
		assert_eq!(cfg.url.as_deref(), Some("/movies/"));
		assert!(cfg.append_pk);
		assert_eq!(cfg.click, ClickAction::PartialUpdate);
		assert_eq!(cfg.target.as_deref(), Some("#detail"));
		assert_eq!(cfg.selected_class.as_deref(), Some("table-active"));
	}

	#[rstest]
	fn test_from_attributes_empty() {
		let cfg = config(&[("data-url", ""), ("selected", "")]);
		assert_eq!(cfg, TableConfig::default());
	}

	#[rstest]
	fn test_unknown_click_code_disables_clicks() {
		let cfg = config(&[("data-click", "9")]);
		assert_eq!(cfg.click, ClickAction::None);
	}

	#[rstest]
	#[case(&[("data-url", "/movies/"), ("data-pk", "1")], Some("42"), Some("/movies/42"))]
	#[case(&[("data-url", "/movies/"), ("data-pk", "false")], Some("42"), Some("/movies/"))]
	#[case(&[("data-url", "/movies/")], Some("42"), Some("/movies/"))]
	#[case(&[("data-url", "/movies/"), ("data-pk", "1")], None, Some("/movies/"))]
	#[case(&[("data-pk", "1")], Some("42"), None)]
	fn test_row_url(
		#[case] attrs: &[(&str, &str)],
		#[case] key: Option<&str>,
		#[case] expected: Option<&str>,
	) {
		assert_eq!(config(attrs).row_url(key).as_deref(), expected);
	}
}
