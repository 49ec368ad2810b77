//! Resolves the declarative `data-*` conventions below a controller element into a lookup table.

use crate::{Result, IDENTIFIER};
use hashbrown::HashMap;
use tracing::{instrument, trace};
use wasm_bindgen::JsCast;
use web_sys::{Element, Node};

/// Matches every controller element of this crate.
pub const CONTROLLER_SELECTOR: &str = "[data-controller~=\"nested-form\"]";

/// `data-nested-form-target="target template"`
pub const TARGET_ATTRIBUTE: &str = "data-nested-form-target";

/// Older form: `data-target="nested-form.template"`
pub const LEGACY_TARGET_ATTRIBUTE: &str = "data-target";

/// Named target elements of one controller element, in document order.
#[derive(Debug, Default)]
pub struct Targets {
	table: HashMap<String, Vec<Element>>,
}
impl Targets {
	/// Collects the targets of `root`.
	///
	/// Elements that belong to a different (nested) `nested-form` controller element are skipped.
	#[instrument]
	pub fn collect(root: &Element) -> Result<Self> {
		let mut table = HashMap::<String, Vec<Element>>::new();
		let candidates = root.query_selector_all(&format!("[{}], [{}]", TARGET_ATTRIBUTE, LEGACY_TARGET_ATTRIBUTE))?;
		for i in 0..candidates.length() {
			let element = match candidates.get(i).and_then(|node| node.dyn_into::<Element>().ok()) {
				Some(element) => element,
				None => continue,
			};
			if !is_in_scope(root, &element)? {
				trace!("Skipping target {:?} of a nested controller.", element);
				continue;
			}
			for name in target_names(&element) {
				table.entry(name).or_default().push(element.clone());
			}
		}
		Ok(Self { table })
	}

	/// The first target named `name`.
	#[must_use]
	pub fn target(&self, name: &str) -> Option<&Element> {
		self.targets(name).first()
	}

	#[must_use]
	pub fn targets(&self, name: &str) -> &[Element] {
		self.table.get(name).map_or(&[], |targets| targets.as_slice())
	}
}

fn target_names(element: &Element) -> Vec<String> {
	let mut names: Vec<String> = element
		.get_attribute(TARGET_ATTRIBUTE)
		.map(|value| value.split_ascii_whitespace().map(str::to_owned).collect())
		.unwrap_or_default();
	if let Some(legacy) = element.get_attribute(LEGACY_TARGET_ATTRIBUTE) {
		names.extend(legacy_target_names(&legacy).map(str::to_owned));
	}
	names
}

/// Extracts this controller's names from a legacy `data-target` value such as `"nested-form.target other.thing"`.
pub fn legacy_target_names(value: &str) -> impl Iterator<Item = &str> {
	value.split_ascii_whitespace().filter_map(|entry| match entry.split_once('.') {
		Some((identifier, name)) if identifier == IDENTIFIER && !name.is_empty() => Some(name),
		_ => None,
	})
}

/// Whether `root` is the nearest `nested-form` controller element enclosing `element`.
///
/// `root` itself counts as in scope of its own controller.
pub fn is_in_scope(root: &Element, element: &Element) -> Result<bool> {
	let root_node: &Node = root.as_ref();
	if element.is_same_node(Some(root_node)) {
		return Ok(true);
	}
	let owner = match element.parent_element() {
		Some(parent) => parent.closest(CONTROLLER_SELECTOR)?,
		None => None,
	};
	Ok(owner.map_or(false, |owner| owner.is_same_node(Some(root_node))))
}
