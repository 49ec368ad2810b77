use crate::{
	binding::Targets,
	fragment::{self, NEW_RECORD_ATTRIBUTE},
	Error, NestedFormOptions, Result, TokenSource, ADD_EVENT, REMOVE_EVENT,
};
use tracing::{debug, instrument, trace, warn};
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, CustomEventInit, Element, HtmlElement, HtmlInputElement};

pub const TARGET: &str = "target";
pub const TEMPLATE: &str = "template";

/// Matches the soft delete flag inside a persisted row.
pub const DESTROY_INPUT_SELECTOR: &str = "input[name*='_destroy']";

/// What [`NestedFormController::remove`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
	/// The row was added on the client and has been detached.
	Discarded,
	/// The row came from the server. It is hidden and its `_destroy` input is set to `"1"`.
	MarkedForDestruction,
	/// The row came from the server and is hidden, but has no `_destroy` input to flag.
	HiddenOnly,
	/// No ancestor matched the wrapper selector. Nothing changed and no event was dispatched.
	WrapperNotFound,
}

/// Adds rows stamped from a template and removes them again.
///
/// # Row lifecycle
///
/// Rows rendered by the server are *persisted*: removing one only hides it and flags its `_destroy` input,
/// so that the next submission deletes the record.
///
/// Rows created through [`add`](`NestedFormController::add`) carry [`NEW_RECORD_ATTRIBUTE`] and are detached on removal.
#[derive(Debug)]
pub struct NestedFormController {
	element: Element,
	container: Element,
	template: Element,
	options: NestedFormOptions,
	tokens: TokenSource,
}
impl NestedFormController {
	/// Binds to the controller element `root`, reading its targets and options.
	///
	/// # Errors
	///
	/// Iff the `target` or `template` target is missing or the DOM can't be queried.
	#[instrument]
	pub fn connect(root: Element, tokens: TokenSource) -> Result<Self> {
		let options = NestedFormOptions::from_element(&root);
		Self::connect_with_options(root, options, tokens)
	}

	/// Like [`connect`](`NestedFormController::connect`), but ignores the element's `data-*-value` attributes.
	///
	/// # Errors
	///
	/// Iff the `target` or `template` target is missing or the DOM can't be queried.
	#[instrument]
	pub fn connect_with_options(root: Element, options: NestedFormOptions, tokens: TokenSource) -> Result<Self> {
		let targets = Targets::collect(&root)?;
		let container = targets.target(TARGET).ok_or(Error::MissingTarget { name: TARGET })?.clone();
		let template = targets.target(TEMPLATE).ok_or(Error::MissingTarget { name: TEMPLATE })?.clone();
		if targets.targets(TARGET).len() > 1 {
			warn!("Found {} `target` targets; rows are added to the first.", targets.targets(TARGET).len());
		}
		debug!("Connected with wrapper selector {:?}.", options.wrapper_selector);
		Ok(Self {
			element: root,
			container,
			template,
			options,
			tokens,
		})
	}

	#[must_use]
	pub fn element(&self) -> &Element {
		&self.element
	}

	/// The element rows are appended to.
	#[must_use]
	pub fn container(&self) -> &Element {
		&self.container
	}

	#[must_use]
	pub fn template(&self) -> &Element {
		&self.template
	}

	#[must_use]
	pub fn options(&self) -> &NestedFormOptions {
		&self.options
	}

	/// Appends one new row stamped from the template and dispatches [`ADD_EVENT`].
	///
	/// The template is only read. Each row gets a fresh token in place of `NEW_RECORD`,
	/// and its descendants' `id` and `for` attributes are made unique with that token.
	///
	/// # Errors
	///
	/// Iff the template has no root element or a DOM operation throws.
	#[instrument(skip(event))]
	pub fn add(&self, event: &web_sys::Event) -> Result<Element> {
		event.prevent_default();
		self.add_row()
	}

	/// [`add`](`NestedFormController::add`) without an event to cancel.
	///
	/// # Errors
	///
	/// Iff the template has no root element or a DOM operation throws.
	#[instrument]
	pub fn add_row(&self) -> Result<Element> {
		let token = self.tokens.issue();
		let markup = fragment::substitute_placeholder(&self.template.inner_html(), &token);
		if cfg!(feature = "dangerous-logging") {
			trace!("Stamping row {} from {:?}.", token, markup);
		}

		let wrapper = fragment::stamp(&markup, &token)?;
		self.container.append_child(&wrapper)?;
		debug!("Added row {}.", token);

		self.dispatch(ADD_EVENT)?;
		Ok(wrapper)
	}

	/// Removes the row the event originated in and dispatches [`REMOVE_EVENT`].
	///
	/// # Errors
	///
	/// Iff the event has no element target or a DOM operation throws.
	#[instrument(skip(event))]
	pub fn remove(&self, event: &web_sys::Event) -> Result<Removal> {
		event.prevent_default();
		let origin = event
			.target()
			.and_then(|target| target.dyn_into::<Element>().ok())
			.ok_or(Error::NoEventTarget)?;
		self.remove_from(&origin)
	}

	/// Removes the row enclosing (or being) `origin`.
	///
	/// # Errors
	///
	/// Iff the wrapper selector is invalid or another DOM operation throws.
	#[instrument]
	pub fn remove_from(&self, origin: &Element) -> Result<Removal> {
		let wrapper = match origin.closest(&self.options.wrapper_selector)? {
			Some(wrapper) => wrapper,
			None => {
				warn!("No ancestor of {:?} matches {:?}; nothing to remove.", origin, self.options.wrapper_selector);
				return Ok(Removal::WrapperNotFound);
			}
		};

		let removal = if wrapper.has_attribute(NEW_RECORD_ATTRIBUTE) {
			wrapper.remove();
			Removal::Discarded
		} else {
			hide(&wrapper)?;
			match wrapper
				.query_selector(DESTROY_INPUT_SELECTOR)?
				.and_then(|input| input.dyn_into::<HtmlInputElement>().ok())
			{
				Some(input) => {
					input.set_value("1");
					Removal::MarkedForDestruction
				}
				None => {
					warn!("Persisted row {:?} has no `_destroy` input; it is only hidden.", wrapper);
					Removal::HiddenOnly
				}
			}
		};
		debug!("Removal: {:?}", removal);

		self.dispatch(REMOVE_EVENT)?;
		Ok(removal)
	}

	fn dispatch(&self, name: &str) -> Result<()> {
		let mut init = CustomEventInit::new();
		init.bubbles(true);
		let event = CustomEvent::new_with_event_init_dict(name, &init)?;
		self.element.dispatch_event(&event)?;
		Ok(())
	}
}

fn hide(wrapper: &Element) -> Result<()> {
	match wrapper.dyn_ref::<HtmlElement>() {
		Some(html_element) => html_element.style().set_property("display", "none")?,
		// SVG and MathML rows have no `style` binding in `web_sys::Element`.
		None => wrapper.set_attribute("style", "display: none")?,
	}
	Ok(())
}
