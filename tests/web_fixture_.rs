#![allow(dead_code)]

use std::sync::Once;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, HtmlElement};

static LOG_INITIALIZED: Once = Once::new();

pub const ROW_TEMPLATE: &str = r#"<div class="nested-form-wrapper"><input id="item_NEW_RECORD_name"><label for="item_NEW_RECORD_name">Name</label></div>"#;

pub fn document() -> Document {
	window().unwrap().document().unwrap()
}

/// Mounts `html` in a fresh host element at the end of the body and returns that host's first element.
pub fn mount(html: &str) -> Element {
	LOG_INITIALIZED.call_once(tracing_wasm::set_as_global_default);

	let document = document();
	let host = document.create_element("div").unwrap();
	host.set_inner_html(html);
	document.body().unwrap().append_child(&host).unwrap();
	host.first_element_child().unwrap()
}

/// A controller element with one server-rendered row (record 1) and a remove button per row.
pub fn nested_form(extra_root_attributes: &str) -> Element {
	mount(&format!(
		r#"<form data-controller="nested-form" {}>
			<template data-nested-form-target="template">
				<div class="nested-form-wrapper">
					<input id="item_NEW_RECORD_name" name="items[NEW_RECORD][name]">
					<label for="item_NEW_RECORD_name">Name</label>
					<button type="button" class="remove" data-action="nested-form#remove"><span>Remove</span></button>
				</div>
			</template>
			<div data-nested-form-target="target">
				<div class="nested-form-wrapper persisted">
					<input id="item_1_name" name="items[1][name]" value="Kept">
					<input type="hidden" name="items[1][_destroy]" value="0">
					<button type="button" class="remove" data-action="nested-form#remove">Remove</button>
				</div>
			</div>
			<button type="button" class="add" data-action="nested-form#add">Add</button>
		</form>"#,
		extra_root_attributes
	))
}

pub fn find(scope: &Element, selector: &str) -> Element {
	scope.query_selector(selector).unwrap().unwrap_or_else(|| panic!("Nothing matches {:?}.", selector))
}

pub fn find_all(scope: &Element, selector: &str) -> Vec<Element> {
	let found = scope.query_selector_all(selector).unwrap();
	(0..found.length()).map(|i| found.get(i).unwrap().dyn_into().unwrap()).collect()
}

pub fn click(scope: &Element, selector: &str) {
	find(scope, selector).dyn_into::<HtmlElement>().unwrap().click();
}
