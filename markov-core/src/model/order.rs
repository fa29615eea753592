use serde::{Deserialize, Serialize};

use crate::error::MarkovError;

/// Number of preceding tokens used to build a context key.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum Order {
	/// The context key is the previous token itself.
	#[default]
	First,
	/// The context key is the two previous tokens joined by a single space.
	Second,
}

impl TryFrom<u8> for Order {
	type Error = MarkovError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			1 => Ok(Order::First),
			2 => Ok(Order::Second),
			other => Err(MarkovError::InvalidOrder(other)),
		}
	}
}

impl From<Order> for u8 {
	fn from(order: Order) -> Self {
		match order {
			Order::First => 1,
			Order::Second => 2,
		}
	}
}

/// Sliding window over the last one or two tokens of a stream.
///
/// Empty slots hold the sentinel `""`, so a fresh order-2 window
/// produces the key `" "`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ContextWindow {
	order: Order,
	prev1: String,
	prev2: String,
}

impl ContextWindow {
	pub(crate) fn new(order: Order) -> Self {
		Self { order, prev1: String::new(), prev2: String::new() }
	}

	/// Builds a window already holding `(prev1, prev2)`.
	///
	/// For order-1 only `prev2` is relevant.
	pub(crate) fn with_tokens(order: Order, prev1: &str, prev2: &str) -> Self {
		Self { order, prev1: prev1.to_owned(), prev2: prev2.to_owned() }
	}

	/// Returns the context key for the current window.
	pub(crate) fn key(&self) -> String {
		match self.order {
			Order::First => self.prev2.clone(),
			Order::Second => format!("{} {}", self.prev1, self.prev2),
		}
	}

	/// Shifts `token` into the window.
	pub(crate) fn push(&mut self, token: &str) {
		self.prev1 = std::mem::replace(&mut self.prev2, token.to_owned());
	}
}
