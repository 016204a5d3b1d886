//! Responsive breakpoints
//!
//! A [`BreakpointTable`] maps a viewport width onto one of a small ordered
//! set of named thresholds. The server renders a different column set per
//! breakpoint, so the client reports the active name with every re-render
//! request. [`BreakpointService`] tracks the active name for the whole page
//! and notifies subscribers when it changes.

mod service;

pub use service::{BreakpointCallback, BreakpointService, SubscriptionId};

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableauxError};

/// Thresholds used when the page does not configure its own.
pub const DEFAULT_BREAKPOINTS: [(&str, u32); 5] = [
	("xs", 0),
	("sm", 480),
	("md", 768),
	("lg", 1024),
	("xl", 1280),
];

/// A named breakpoint with an inclusive minimum width in CSS pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Breakpoint {
	/// Name reported to the server (e.g. `"md"`).
	pub name: String,
	/// Smallest viewport width at which this breakpoint applies.
	pub min_width: u32,
}

impl Breakpoint {
	/// Creates a breakpoint.
	pub fn new(name: impl Into<String>, min_width: u32) -> Self {
		Self {
			name: name.into(),
			min_width,
		}
	}
}

/// Ordered, non-empty set of breakpoints.
///
/// Serialized as a JSON object mapping names to thresholds, e.g.
/// `{"sm": 576, "md": 768}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
	try_from = "BTreeMap<String, u32>",
	into = "BTreeMap<String, u32>"
)]
pub struct BreakpointTable {
	// Sorted by `min_width`, names and widths unique.
	breakpoints: Vec<Breakpoint>,
}

impl BreakpointTable {
	/// Builds a table from `(name, min_width)` pairs in any order.
	///
	/// # Errors
	///
	/// Returns [`TableauxError::InvalidBreakpoints`] when no entries are
	/// given, or when a name or threshold appears twice.
	pub fn new<I, S>(entries: I) -> Result<Self>
	where
		I: IntoIterator<Item = (S, u32)>,
		S: Into<String>,
	{
		let mut breakpoints: Vec<Breakpoint> = entries
			.into_iter()
			.map(|(name, width)| Breakpoint::new(name, width))
			.collect();

		if breakpoints.is_empty() {
			return Err(TableauxError::InvalidBreakpoints(
				"at least one breakpoint is required".to_string(),
			));
		}

		let mut names = HashSet::new();
		for bp in &breakpoints {
			if bp.name.is_empty() {
				return Err(TableauxError::InvalidBreakpoints(
					"breakpoint names must not be empty".to_string(),
				));
			}
			if !names.insert(bp.name.as_str()) {
				return Err(TableauxError::InvalidBreakpoints(format!(
					"duplicate name '{}'",
					bp.name
				)));
			}
		}

		breakpoints.sort_by_key(|bp| bp.min_width);
		if let Some(pair) = breakpoints
			.windows(2)
			.find(|pair| pair[0].min_width == pair[1].min_width)
		{
			return Err(TableauxError::InvalidBreakpoints(format!(
				"'{}' and '{}' share threshold {}",
				pair[0].name, pair[1].name, pair[0].min_width
			)));
		}

		Ok(Self { breakpoints })
	}

	/// Returns the breakpoint active at `width`.
	///
	/// This is the breakpoint with the largest threshold `<= width`, or the
	/// smallest breakpoint when `width` is below every threshold.
	pub fn resolve(&self, width: u32) -> &Breakpoint {
		let above = self
			.breakpoints
			.partition_point(|bp| bp.min_width <= width);
		&self.breakpoints[above.saturating_sub(1)]
	}

	/// Returns the breakpoint with the smallest threshold.
	pub fn smallest(&self) -> &Breakpoint {
		&self.breakpoints[0]
	}

	/// Looks up a breakpoint by name.
	pub fn get(&self, name: &str) -> Option<&Breakpoint> {
		self.breakpoints.iter().find(|bp| bp.name == name)
	}

	/// Iterates breakpoints in ascending threshold order.
	pub fn iter(&self) -> impl Iterator<Item = &Breakpoint> {
		self.breakpoints.iter()
	}

	/// Number of breakpoints in the table.
	pub fn len(&self) -> usize {
		self.breakpoints.len()
	}

	/// Always false; a table holds at least one breakpoint.
	pub fn is_empty(&self) -> bool {
		self.breakpoints.is_empty()
	}
}

impl Default for BreakpointTable {
	fn default() -> Self {
		Self {
			breakpoints: DEFAULT_BREAKPOINTS
				.iter()
				.map(|(name, width)| Breakpoint::new(*name, *width))
				.collect(),
		}
	}
}

impl TryFrom<BTreeMap<String, u32>> for BreakpointTable {
	type Error = TableauxError;

	fn try_from(map: BTreeMap<String, u32>) -> Result<Self> {
		Self::new(map)
	}
}

impl From<BreakpointTable> for BTreeMap<String, u32> {
	fn from(table: BreakpointTable) -> Self {
		table
			.breakpoints
			.into_iter()
			.map(|bp| (bp.name, bp.min_width))
			.collect()
	}
}
