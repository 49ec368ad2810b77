use tracing::warn;
use web_sys::Element;

pub const DEFAULT_WRAPPER_SELECTOR: &str = ".nested-form-wrapper";

/// Attribute on the controller element that overrides [`NestedFormOptions::wrapper_selector`].
pub const WRAPPER_SELECTOR_ATTRIBUTE: &str = "data-nested-form-wrapper-selector-value";

/// Per-controller configuration, read from `data-nested-form-*-value` attributes on the controller element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedFormOptions {
	/// Selects the row element a remove action acts on, as nearest ancestor (or self) of the clicked element.
	pub wrapper_selector: String,
}
impl Default for NestedFormOptions {
	fn default() -> Self {
		Self {
			wrapper_selector: DEFAULT_WRAPPER_SELECTOR.to_owned(),
		}
	}
}
impl NestedFormOptions {
	#[must_use]
	pub fn from_element(root: &Element) -> Self {
		Self::from_attribute(root.get_attribute(WRAPPER_SELECTOR_ATTRIBUTE).as_deref())
	}

	#[must_use]
	pub fn from_attribute(wrapper_selector: Option<&str>) -> Self {
		match wrapper_selector {
			None => Self::default(),
			Some(selector) if selector.trim().is_empty() => {
				warn!("Ignoring empty `{}`, using {:?}.", WRAPPER_SELECTOR_ATTRIBUTE, DEFAULT_WRAPPER_SELECTOR);
				Self::default()
			}
			Some(selector) => Self {
				wrapper_selector: selector.trim().to_owned(),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{NestedFormOptions, DEFAULT_WRAPPER_SELECTOR};

	#[test]
	fn missing_and_blank_fall_back() {
		assert_eq!(NestedFormOptions::from_attribute(None).wrapper_selector, DEFAULT_WRAPPER_SELECTOR);
		assert_eq!(NestedFormOptions::from_attribute(Some("  ")).wrapper_selector, DEFAULT_WRAPPER_SELECTOR);
	}

	#[test]
	fn r#override() {
		assert_eq!(NestedFormOptions::from_attribute(Some(" tr.row ")).wrapper_selector, "tr.row");
	}
}
