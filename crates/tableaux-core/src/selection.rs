//! Row selection values

use std::ops::RangeInclusive;

/// Selection derived from the checkboxes currently in the DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
	/// The whole result set, across every page.
	All,
	/// Individually checked rows, in DOM order.
	Rows(Vec<String>),
}

impl Selection {
	/// Value written to the hidden ids field (comma-joined row ids).
	///
	/// Empty for [`Selection::All`]; the server reads the select-all box.
	pub fn hidden_value(&self) -> String {
		match self {
			Self::All => String::new(),
			Self::Rows(ids) => ids.join(","),
		}
	}

	/// Text for the count display.
	pub fn count_label(&self, all_label: &str) -> String {
		match self {
			Self::All => all_label.to_string(),
			Self::Rows(ids) => ids.len().to_string(),
		}
	}

	/// Whether nothing is selected.
	pub fn is_empty(&self) -> bool {
		matches!(self, Self::Rows(ids) if ids.is_empty())
	}
}

/// Inclusive index range between a shift-click anchor and the clicked box,
/// whichever comes first in DOM order.
pub fn shift_range(anchor: usize, clicked: usize) -> RangeInclusive<usize> {
	anchor.min(clicked)..=anchor.max(clicked)
}
