//! `data-action` descriptors: `[event->]identifier#method`, whitespace-separated.

use core::fmt::{self, Display, Formatter};
use tracing::warn;

pub const ACTION_ATTRIBUTE: &str = "data-action";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor<'a> {
	/// [`None`] if the descriptor relies on the element's default event, see [`default_event`].
	pub event: Option<&'a str>,
	pub identifier: &'a str,
	pub method: &'a str,
}
impl<'a> ActionDescriptor<'a> {
	#[must_use]
	pub fn parse(descriptor: &'a str) -> Option<Self> {
		let (event, rest) = match descriptor.split_once("->") {
			Some((event, rest)) => (Some(event), rest),
			None => (None, descriptor),
		};
		let (identifier, method) = rest.split_once('#')?;

		if event.map_or(false, |event| !is_name(event)) || !is_name(identifier) || !is_name(method) {
			return None;
		}
		Some(Self { event, identifier, method })
	}

	/// The event this action listens for on an element named `tag_name` (with `type` attribute `input_type`).
	#[must_use]
	pub fn event_for(&self, tag_name: &str, input_type: Option<&str>) -> &'a str {
		self.event.unwrap_or_else(|| default_event(tag_name, input_type))
	}
}
impl Display for ActionDescriptor<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		if let Some(event) = self.event {
			write!(f, "{}->", event)?;
		}
		write!(f, "{}#{}", self.identifier, self.method)
	}
}

fn is_name(s: &str) -> bool {
	!s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

/// Parses all descriptors in a `data-action` value, skipping (and logging) malformed ones.
pub fn parse_all(value: &str) -> impl Iterator<Item = ActionDescriptor<'_>> {
	value.split_ascii_whitespace().filter_map(|descriptor| {
		let parsed = ActionDescriptor::parse(descriptor);
		if parsed.is_none() {
			warn!("Skipping malformed action descriptor {:?}.", descriptor);
		}
		parsed
	})
}

/// The event an action listens for if its descriptor doesn't name one.
#[must_use]
pub fn default_event(tag_name: &str, input_type: Option<&str>) -> &'static str {
	match tag_name.to_ascii_lowercase().as_str() {
		"form" => "submit",
		"select" => "change",
		"textarea" => "input",
		"input" => match input_type.map(str::to_ascii_lowercase).as_deref() {
			Some("submit" | "button" | "reset" | "image") => "click",
			_ => "input",
		},
		_ => "click",
	}
}

#[cfg(test)]
mod tests {
	use super::{default_event, parse_all, ActionDescriptor};

	#[test]
	fn explicit_and_implicit_events() {
		let actions: Vec<_> = parse_all("click->nested-form#add  nested-form#remove\n").collect();
		assert_eq!(
			actions,
			[
				ActionDescriptor {
					event: Some("click"),
					identifier: "nested-form",
					method: "add",
				},
				ActionDescriptor {
					event: None,
					identifier: "nested-form",
					method: "remove",
				},
			]
		);
		assert_eq!(actions[1].to_string(), "nested-form#remove");
	}

	#[test]
	fn malformed_descriptors_are_skipped() {
		let actions: Vec<_> = parse_all("nested-form click-> ->nested-form#add nested-form# other#go").collect();
		assert_eq!(actions.len(), 1);
		assert_eq!(actions[0].identifier, "other");
	}

	#[test]
	fn defaults() {
		assert_eq!(default_event("BUTTON", None), "click");
		assert_eq!(default_event("A", None), "click");
		assert_eq!(default_event("FORM", None), "submit");
		assert_eq!(default_event("SELECT", None), "change");
		assert_eq!(default_event("INPUT", Some("text")), "input");
		assert_eq!(default_event("INPUT", Some("Submit")), "click");
		assert_eq!(default_event("TEXTAREA", None), "input");
	}
}
