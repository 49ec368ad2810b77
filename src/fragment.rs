//! Stamping a row out of template markup.

use crate::{Error, Result};
use tracing::{instrument, trace, warn};
use wasm_bindgen::JsCast;
use web_sys::{DomParser, Element, SupportedType};

/// Stands in for the not-yet-known record identifier in template markup.
pub const PLACEHOLDER: &str = "NEW_RECORD";

/// Marks rows added on the client, which are discarded outright on removal.
pub const NEW_RECORD_ATTRIBUTE: &str = "data-new-record";

/// Attributes that are made unique with the row token on every descendant of a stamped row.
pub const UNIQUE_ATTRIBUTES: [&str; 2] = ["id", "for"];

#[must_use]
pub fn substitute_placeholder(markup: &str, token: &str) -> String {
	markup.replace(PLACEHOLDER, token)
}

/// The row-unique form of an `id` or `for` value.
///
/// Values that already contain `token` (because the template used the placeholder there) are kept as they are,
/// all others are suffixed with `_<token>`.
#[must_use]
pub fn unique_value(value: &str, token: &str) -> Option<String> {
	if value.contains(token) {
		None
	} else {
		Some(format!("{}_{}", value, token))
	}
}

/// Parses `markup` (already substituted with `token`) into a detached row element ready for insertion.
///
/// The row is marked with [`NEW_RECORD_ATTRIBUTE`] and its descendants' [`UNIQUE_ATTRIBUTES`] are rewritten by [`unique_value`].
#[instrument(skip(markup))]
pub fn stamp(markup: &str, token: &str) -> Result<Element> {
	let document = DomParser::new()?.parse_from_string(markup, SupportedType::TextHtml)?;
	let body = document.body().ok_or(Error::EmptyTemplate)?;
	let wrapper = body.first_element_child().ok_or(Error::EmptyTemplate)?;
	if body.child_element_count() > 1 {
		warn!(
			"The template has {} root elements, but only the first (<{}>) is inserted.",
			body.child_element_count(),
			wrapper.tag_name()
		);
	}

	wrapper.set_attribute(NEW_RECORD_ATTRIBUTE, "true")?;
	for &attribute in &UNIQUE_ATTRIBUTES {
		rewrite_descendants(&wrapper, attribute, token)?;
	}
	Ok(wrapper)
}

fn rewrite_descendants(wrapper: &Element, attribute: &str, token: &str) -> Result<()> {
	let elements = wrapper.query_selector_all(&format!("[{}]", attribute))?;
	for i in 0..elements.length() {
		let element = match elements.get(i).and_then(|node| node.dyn_into::<Element>().ok()) {
			Some(element) => element,
			None => continue,
		};
		if let Some(value) = element.get_attribute(attribute).and_then(|value| unique_value(&value, token)) {
			trace!("Rewriting {}={:?}.", attribute, value);
			element.set_attribute(attribute, &value)?;
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::{substitute_placeholder, unique_value};

	#[test]
	fn every_placeholder_is_replaced() {
		let markup = r#"<div><input id="item_NEW_RECORD_name" name="items[NEW_RECORD][name]"></div>"#;
		assert_eq!(
			substitute_placeholder(markup, "1700000000000"),
			r#"<div><input id="item_1700000000000_name" name="items[1700000000000][name]"></div>"#
		);
	}

	#[test]
	fn markup_without_placeholder() {
		assert_eq!(substitute_placeholder("<p>static</p>", "1"), "<p>static</p>");
	}

	#[test]
	fn static_ids_are_suffixed() {
		assert_eq!(unique_value("notes", "1700000000000").as_deref(), Some("notes_1700000000000"));
	}

	#[test]
	fn substituted_ids_are_kept() {
		assert_eq!(unique_value("item_1700000000000_name", "1700000000000"), None);
	}
}
