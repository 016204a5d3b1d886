//! Element specs for building [`MemoryDom`](super::MemoryDom) trees
//!
//! ## Example
//!
//! ```
//! use tableaux_pages::dom::builder::{checkbox, table, td, tr};
//! use tableaux_pages::dom::MemoryDom;
//!
//! let dom = MemoryDom::new();
//! let body = dom.body_id();
//! let table = dom.mount(
//!     body,
//!     table()
//!         .attr("selected", "table-active")
//!         .child(tr().attr("data-pk", "7").child(td().child(checkbox("select-checkbox", "7")))),
//! );
//! assert_eq!(dom.tag(table), "table");
//! ```

/// Description of an element and its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpec {
	pub(crate) tag: String,
	pub(crate) attributes: Vec<(String, String)>,
	pub(crate) checked: bool,
	pub(crate) disabled: bool,
	pub(crate) value: Option<String>,
	pub(crate) text: Option<String>,
	pub(crate) children: Vec<ElementSpec>,
}

impl ElementSpec {
	/// Creates a spec for `tag`.
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into().to_ascii_lowercase(),
			attributes: Vec::new(),
			checked: false,
			disabled: false,
			value: None,
			text: None,
			children: Vec::new(),
		}
	}

	/// Sets an attribute, replacing an earlier value.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		let name = name.into();
		let value = value.into();
		match self.attributes.iter_mut().find(|(n, _)| *n == name) {
			Some(slot) => slot.1 = value,
			None => self.attributes.push((name, value)),
		}
		self
	}

	/// Sets the id.
	pub fn id(self, id: impl Into<String>) -> Self {
		self.attr("id", id)
	}

	/// Sets the class attribute (space-separated).
	pub fn class(self, class: impl Into<String>) -> Self {
		self.attr("class", class)
	}

	/// Sets the `name` attribute.
	pub fn name(self, name: impl Into<String>) -> Self {
		self.attr("name", name)
	}

	/// Sets the initial `checked` property.
	pub fn checked(mut self, checked: bool) -> Self {
		self.checked = checked;
		self
	}

	/// Sets the initial `disabled` property.
	pub fn disabled(mut self, disabled: bool) -> Self {
		self.disabled = disabled;
		self
	}

	/// Sets the `value` attribute and property.
	pub fn value(mut self, value: impl Into<String>) -> Self {
		let value = value.into();
		self.value = Some(value.clone());
		self.attr("value", value)
	}

	/// Sets the text content.
	pub fn text(mut self, text: impl Into<String>) -> Self {
		self.text = Some(text.into());
		self
	}

	/// Appends a child.
	pub fn child(mut self, child: ElementSpec) -> Self {
		self.children.push(child);
		self
	}

	/// Appends children.
	pub fn children(mut self, children: impl IntoIterator<Item = ElementSpec>) -> Self {
		self.children.extend(children);
		self
	}
}

macro_rules! element_fns {
	($($name:ident),* $(,)?) => {
		$(
			#[doc = concat!("Creates a `<", stringify!($name), ">` spec.")]
			pub fn $name() -> ElementSpec {
				ElementSpec::new(stringify!($name))
			}
		)*
	};
}

element_fns!(div, span, table, thead, tbody, tr, th, td, form, input, button, select);

/// `<input type="checkbox" name=.. value=..>`
pub fn checkbox(name: &str, value: &str) -> ElementSpec {
	input().attr("type", "checkbox").name(name).value(value)
}

/// `<input type="hidden" name=..>`
pub fn hidden(name: &str) -> ElementSpec {
	input().attr("type", "hidden").name(name)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_attr_replaces_existing() {
		let spec = div().class("a").class("b");
		assert_eq!(spec.attributes, vec![("class".to_string(), "b".to_string())]);
	}

	#[rstest]
	fn test_checkbox_helper() {
		let spec = checkbox("select-checkbox", "7").checked(true);
		assert_eq!(spec.tag, "input");
		assert_eq!(spec.value.as_deref(), Some("7"));
		assert!(spec.checked);
		assert!(spec
			.attributes
			.contains(&("type".to_string(), "checkbox".to_string())));
	}

	#[rstest]
	fn test_tag_is_lowercased() {
		assert_eq!(ElementSpec::new("TD").tag, "td");
	}
}
