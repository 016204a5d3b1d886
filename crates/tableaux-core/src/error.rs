//! Error types for the tableaux client

/// Result alias used across the tableaux crates.
pub type Result<T> = std::result::Result<T, TableauxError>;

/// Errors raised while configuring tableaux or talking to the browser.
///
/// Missing optional DOM elements are never errors; controllers skip the
/// affected step instead.
#[derive(Debug, thiserror::Error)]
pub enum TableauxError {
	/// The breakpoint table is empty or has duplicate names or thresholds.
	#[error("Invalid breakpoint table: {0}")]
	InvalidBreakpoints(String),

	/// Settings JSON could not be deserialized.
	#[error("Invalid tableaux settings: {0}")]
	InvalidSettings(#[from] serde_json::Error),

	/// A table declared a `data-click` value outside the known set.
	#[error("Unknown click action: {0:?}")]
	UnknownClickAction(String),

	/// A JavaScript call failed (WASM only).
	#[error("JavaScript error: {0}")]
	Js(String),
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_error_display() {
		let err = TableauxError::InvalidBreakpoints("duplicate name 'md'".to_string());
		assert_eq!(err.to_string(), "Invalid breakpoint table: duplicate name 'md'");

		let err = TableauxError::UnknownClickAction("9".to_string());
		assert_eq!(err.to_string(), "Unknown click action: \"9\"");
	}

	#[rstest]
	fn test_settings_error_from_serde() {
		let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
		let err: TableauxError = parse_err.into();
		assert!(matches!(err, TableauxError::InvalidSettings(_)));
		assert!(err.to_string().starts_with("Invalid tableaux settings"));
	}
}
