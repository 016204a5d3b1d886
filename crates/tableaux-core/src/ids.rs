//! Element ids synthesized for cell requests
//!
//! When a cell is fetched in place, the clicked `<td>` is given an id that
//! the server splits on `_` to recover the row key and column index from
//! the second and third fields: `cell_{row}_{column}_{width}` for editable
//! cells and `td_{row}_{column}_{width}` for custom click actions. A table
//! prefix goes last (`cell_{row}_{column}_{width}_{prefix}`) so those
//! positions hold on multi-table pages.

use std::fmt;

/// Which server handler a synthesized cell id addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
	/// Fetch an inline-edit template for the cell.
	Edit,
	/// Run the table's custom cell click handler.
	Custom,
}

impl CellKind {
	fn tag(self) -> &'static str {
		match self {
			Self::Edit => "cell",
			Self::Custom => "td",
		}
	}
}

/// Id assigned to a clicked cell before requesting its replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellId {
	/// Table prefix (empty for single-table pages).
	pub prefix: String,
	/// Handler addressed by this id.
	pub kind: CellKind,
	/// Opaque row key from the row's `data-pk` attribute.
	pub row_key: String,
	/// Index of the cell among its row's children.
	pub column: usize,
	/// Viewport outer width, keeping ids unique across layouts.
	pub viewport_width: u32,
}

impl CellId {
	/// Creates a cell id.
	pub fn new(
		prefix: impl Into<String>,
		kind: CellKind,
		row_key: impl Into<String>,
		column: usize,
		viewport_width: u32,
	) -> Self {
		Self {
			prefix: prefix.into(),
			kind,
			row_key: row_key.into(),
			column,
			viewport_width,
		}
	}

	/// The id as a CSS selector (`#...`).
	pub fn selector(&self) -> String {
		format!("#{self}")
	}
}

impl fmt::Display for CellId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}_{}_{}_{}",
			self.kind.tag(),
			self.row_key,
			self.column,
			self.viewport_width
		)?;
		let prefix = self.prefix.trim_matches('_');
		if !prefix.is_empty() {
			write!(f, "_{prefix}")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(CellKind::Edit, "", "cell_17_3_1280")]
	#[case(CellKind::Custom, "", "td_17_3_1280")]
	#[case(CellKind::Edit, "orders", "cell_17_3_1280_orders")]
	#[case(CellKind::Custom, "orders_", "td_17_3_1280_orders")]
	fn test_cell_id_format(#[case] kind: CellKind, #[case] prefix: &str, #[case] expected: &str) {
		let id = CellId::new(prefix, kind, "17", 3, 1280);
		assert_eq!(id.to_string(), expected);
		assert_eq!(id.selector(), format!("#{expected}"));
	}

	#[rstest]
	#[case("")]
	#[case("orders_")]
	#[case("invoices")]
	fn test_server_split_positions(#[case] prefix: &str) {
		let id = CellId::new(prefix, CellKind::Edit, "abc", 5, 900).to_string();
		let bits: Vec<&str> = id.split('_').collect();
		assert_eq!(bits[0], "cell");
		assert_eq!(bits[1], "abc");
		assert_eq!(bits[2], "5");
	}
}
