use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Hard failures while connecting or operating a controller.
///
/// Markup problems that only affect a single removal (no wrapper ancestor, no `_destroy` input)
/// are not errors. They are logged and reported through [`Removal`](`crate::Removal`) instead.
#[derive(Debug, Error)]
pub enum Error {
	#[error("no `nested-form` target {name:?} found below the controller element")]
	MissingTarget { name: &'static str },

	#[error("the template markup has no root element")]
	EmptyTemplate,

	#[error("the event has no element target")]
	NoEventTarget,

	#[error("DOM operation failed: {0:?}")]
	Dom(JsValue),
}

// Not `#[from]`: `JsValue` isn't a `std::error::Error` source.
impl From<JsValue> for Error {
	fn from(value: JsValue) -> Self {
		Self::Dom(value)
	}
}
