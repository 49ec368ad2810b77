use core::cell::Cell;
use std::rc::Rc;
use tracing::trace;

/// Issues the numeric tokens that replace `NEW_RECORD` in stamped rows.
///
/// Tokens are wall-clock milliseconds, bumped past the previously issued one whenever the clock
/// hasn't advanced (or went backwards), so every token from one sequence is distinct.
///
/// Clones share their sequence. [`Application`](`crate::Application`) hands one sequence to all
/// controllers it connects, which keeps tokens unique across independent nested form groups on the page.
#[derive(Debug, Clone, Default)]
pub struct TokenSource {
	last: Rc<Cell<u64>>,
}
impl TokenSource {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Issues a token based on [***Date.now()***](https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/Date/now).
	#[must_use]
	pub fn issue(&self) -> String {
		#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
		let now = js_sys::Date::now() as u64;
		self.issue_at(now).to_string()
	}

	/// Issues the next token for a clock reading of `now_ms`.
	#[must_use]
	pub fn issue_at(&self, now_ms: u64) -> u64 {
		let last = self.last.get();
		let token = if now_ms > last { now_ms } else { last.saturating_add(1) };
		if token != now_ms {
			trace!("Clock at {} didn't pass the last token {}; issuing {}.", now_ms, last, token);
		}
		self.last.set(token);
		token
	}
}
