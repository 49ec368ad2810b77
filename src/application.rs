use crate::{
	action::{self, ActionDescriptor, ACTION_ATTRIBUTE},
	binding::{self, CONTROLLER_SELECTOR},
	NestedFormController, Result, TokenSource, IDENTIFIER,
};
use hashbrown::HashSet;
use js_sys::Function;
use std::rc::Rc;
use tracing::{error, info, instrument, trace, trace_span, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Document, DomParser, Element, EventTarget, Node, SupportedType};

/// Connects `nested-form` controller elements and routes their `data-action`s.
///
/// All controllers connected through one [`Application`] share one [`TokenSource`].
///
/// Dropping the [`Application`] disconnects everything it connected.
#[derive(Debug, Default)]
pub struct Application {
	tokens: TokenSource,
	connections: Vec<Connection>,
}
impl Application {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Connects every controller element in `document`.
	///
	/// Controller elements that can't be connected (see [`NestedFormController::connect`]) are logged and skipped,
	/// so one misconfigured form doesn't disable the others.
	///
	/// # Errors
	///
	/// Iff the document can't be queried.
	#[instrument]
	pub fn start(document: &Document) -> Result<Self> {
		let mut application = Self::new();
		let found = document.query_selector_all(CONTROLLER_SELECTOR)?;
		let roots = (0..found.length()).filter_map(|i| found.get(i).and_then(|node| node.dyn_into::<Element>().ok()));
		let skipped = application.connect_each(roots);
		info!("Started with {} controller(s), skipped {}.", application.connections.len(), skipped);
		Ok(application)
	}

	/// Connects every controller element below `scope` (and `scope` itself, if it is one).
	///
	/// Returns how many controllers were newly connected.
	/// Controller elements that can't be connected are logged and skipped, like in [`Application::start`].
	///
	/// # Errors
	///
	/// Iff `scope` can't be queried.
	#[instrument]
	pub fn connect_within(&mut self, scope: &Element) -> Result<usize> {
		let mut roots = Vec::new();
		if scope.matches(CONTROLLER_SELECTOR)? {
			roots.push(scope.clone());
		}
		let found = scope.query_selector_all(CONTROLLER_SELECTOR)?;
		roots.extend((0..found.length()).filter_map(|i| found.get(i).and_then(|node| node.dyn_into::<Element>().ok())));

		let before = self.connections.len();
		let roots: Vec<_> = roots.into_iter().filter(|root| !self.is_connected(root)).collect();
		self.connect_each(roots);
		Ok(self.connections.len() - before)
	}

	/// Returns how many roots were skipped.
	fn connect_each(&mut self, roots: impl IntoIterator<Item = Element>) -> usize {
		let mut skipped = 0;
		for root in roots {
			if let Err(error) = self.connect(root.clone()) {
				error!("Skipping controller element {:?}: {}", root, error);
				skipped += 1;
			}
		}
		skipped
	}

	/// Connects the controller element `root`.
	///
	/// If `root` is already connected, the existing controller is returned.
	///
	/// # Errors
	///
	/// Iff the controller can't be bound (see [`NestedFormController::connect`]) or listeners can't be installed.
	#[instrument]
	pub fn connect(&mut self, root: Element) -> Result<Rc<NestedFormController>> {
		if let Some(connection) = self.connection(&root) {
			warn!("{:?} is already connected.", root);
			return Ok(Rc::clone(&connection.controller));
		}
		let controller = Rc::new(NestedFormController::connect(root, self.tokens.clone())?);
		let connection = Connection::new(Rc::clone(&controller))?;
		self.connections.push(connection);
		Ok(controller)
	}

	#[must_use]
	pub fn is_connected(&self, root: &Element) -> bool {
		self.connection(root).is_some()
	}

	fn connection(&self, root: &Element) -> Option<&Connection> {
		let root: &Node = root.as_ref();
		self.connections.iter().find(|connection| connection.controller.element().is_same_node(Some(root)))
	}

	#[must_use]
	pub fn controllers(&self) -> Vec<Rc<NestedFormController>> {
		self.connections.iter().map(|connection| Rc::clone(&connection.controller)).collect()
	}

	/// Removes the listeners of `root`'s controller. Returns whether it was connected.
	pub fn disconnect(&mut self, root: &Element) -> bool {
		let root_node: &Node = root.as_ref();
		let before = self.connections.len();
		self.connections.retain(|connection| !connection.controller.element().is_same_node(Some(root_node)));
		before != self.connections.len()
	}

	pub fn disconnect_all(&mut self) {
		self.connections.clear();
	}
}

/// The delegated event listeners of one connected controller. They are removed on drop.
#[derive(Debug)]
struct Connection {
	controller: Rc<NestedFormController>,
	listener: Closure<dyn Fn(web_sys::Event)>,
	event_types: Vec<String>,
}
impl Connection {
	#[instrument]
	fn new(controller: Rc<NestedFormController>) -> Result<Self> {
		let event_types = listened_event_types(&controller)?;

		let routed = Rc::clone(&controller);
		let listener = Closure::wrap(Box::new(move |event: web_sys::Event| {
			let span = trace_span!("nested_form_listener", event_type = %event.type_());
			let _enter = span.enter();
			if let Err(error) = route(&routed, &event) {
				error!("Action failed: {}", error);
			}
		}) as Box<dyn Fn(web_sys::Event)>);

		let target: &EventTarget = controller.element().as_ref();
		for event_type in &event_types {
			target.add_event_listener_with_callback(event_type, listener.as_ref().unchecked_ref::<Function>())?;
		}
		trace!("Listening for {:?}.", event_types);

		Ok(Self {
			controller,
			listener,
			event_types,
		})
	}
}
impl Drop for Connection {
	fn drop(&mut self) {
		let target: &EventTarget = self.controller.element().as_ref();
		for event_type in &self.event_types {
			if let Err(error) = target.remove_event_listener_with_callback(event_type, self.listener.as_ref().unchecked_ref::<Function>()) {
				error!("Failed to remove {} listener: {:?}", event_type, error);
			}
		}
		trace!("Disconnected.");
	}
}

/// `click`, plus every event named by this controller's actions in the current markup and in the template.
fn listened_event_types(controller: &NestedFormController) -> Result<Vec<String>> {
	let mut event_types = HashSet::new();
	event_types.insert("click".to_owned());
	for_each_own_action(controller.element(), |_, event_type| {
		event_types.insert(event_type.to_owned());
	});
	collect_event_types(controller.element(), Some(controller.element()), &mut event_types)?;

	let template = DomParser::new()?.parse_from_string(&controller.template().inner_html(), SupportedType::TextHtml)?;
	if let Some(body) = template.body() {
		collect_event_types(&body, None, &mut event_types)?;
	}

	let mut event_types: Vec<_> = event_types.into_iter().collect();
	event_types.sort();
	Ok(event_types)
}

/// Without a `root`, all `nested-form` actions below `scope` are counted.
fn collect_event_types(scope: &Element, root: Option<&Element>, event_types: &mut HashSet<String>) -> Result<()> {
	let found = scope.query_selector_all(&format!("[{}]", ACTION_ATTRIBUTE))?;
	for i in 0..found.length() {
		let element = match found.get(i).and_then(|node| node.dyn_into::<Element>().ok()) {
			Some(element) => element,
			None => continue,
		};
		if let Some(root) = root {
			if !binding::is_in_scope(root, &element)? {
				continue;
			}
		}
		for_each_own_action(&element, |descriptor, event_type| {
			trace!("{} listens for {:?}.", descriptor, event_type);
			event_types.insert(event_type.to_owned());
		});
	}
	Ok(())
}

fn for_each_own_action(element: &Element, mut f: impl FnMut(&ActionDescriptor<'_>, &str)) {
	let value = match element.get_attribute(ACTION_ATTRIBUTE) {
		Some(value) => value,
		None => return,
	};
	let tag_name = element.tag_name();
	let input_type = element.get_attribute("type");
	for descriptor in action::parse_all(&value).filter(|descriptor| descriptor.identifier == IDENTIFIER) {
		let event_type = descriptor.event_for(&tag_name, input_type.as_deref());
		f(&descriptor, event_type);
	}
}

/// Invokes the actions of the elements between `event.target` and the controller element that match `event`.
fn route(controller: &NestedFormController, event: &web_sys::Event) -> Result<()> {
	let root = controller.element();
	let root_node: &Node = root.as_ref();
	let event_type = event.type_();
	let action_selector = format!("[{}]", ACTION_ATTRIBUTE);

	let mut current = event.target().and_then(|target| target.dyn_into::<Element>().ok());
	while let Some(element) = current {
		let action_element = match element.closest(&action_selector)? {
			Some(action_element) => action_element,
			None => break,
		};
		let action_node: &Node = action_element.as_ref();
		if !root_node.contains(Some(action_node)) {
			break;
		}

		if binding::is_in_scope(root, &action_element)? {
			let mut methods = Vec::new();
			for_each_own_action(&action_element, |descriptor, listens_for| {
				if listens_for == event_type {
					methods.push(descriptor.method.to_owned());
				}
			});
			for method in methods {
				invoke(controller, &method, event)?;
			}
		}

		if action_node.is_same_node(Some(root_node)) {
			break;
		}
		current = action_element.parent_element();
	}
	Ok(())
}

fn invoke(controller: &NestedFormController, method: &str, event: &web_sys::Event) -> Result<()> {
	match method {
		"add" => controller.add(event).map(drop),
		"remove" => controller.remove(event).map(drop),
		unknown => {
			warn!("`{}` has no action {:?}.", IDENTIFIER, unknown);
			Ok(())
		}
	}
}
