use indexmap::IndexMap;

use rand::Rng;

use serde::{Deserialize, Serialize};


/// Successor set of a single context key.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations. It serializes as a plain
/// `successor -> weight` object.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during training
/// - Pick the next token using weighted random sampling
///
/// ## Invariants
/// - Successors keep their first-seen order
/// - Counts produced by training are strictly positive
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct State {
	/// Example: { "world" => 42, "there" => 3 }
	transitions: IndexMap<String, u64>,
}

impl State {
	/// Records one more occurrence of `successor`.
	pub fn add_transition(&mut self, successor: &str) {
		match self.transitions.get_mut(successor) {
			Some(occurrence) => *occurrence += 1,
			None => {
				self.transitions.insert(successor.to_owned(), 1);
			}
		}
	}

	/// Returns the weight recorded for `successor`, if any.
	pub fn weight(&self, successor: &str) -> Option<u64> {
		self.transitions.get(successor).copied()
	}

	/// Iterates over `(successor, weight)` pairs in first-seen order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
		self.transitions.iter().map(|(k, v)| (k.as_str(), *v))
	}

	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Sum of all weights.
	///
	/// Widened to `u128` so a loaded file holding weights near `u64::MAX`
	/// cannot overflow.
	pub fn total(&self) -> u128 {
		self.transitions.values().map(|&w| u128::from(w)).sum()
	}

	/// Picks a successor with probability proportional to its weight.
	///
	/// Weights are relative; they do not need to sum to anything in particular.
	///
	/// Returns `None` if the state has no successors or only zero weights
	/// (which only a hand-edited model file can contain).
	pub fn predict<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		let total = self.total();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for (successor, &occurrence) in &self.transitions {
			let occurrence = u128::from(occurrence);
			if r < occurrence {
				return Some(successor);
			}
			r -= occurrence;
		}

		// r < total guarantees an earlier return
		None
	}

	/// Sorts successors lexicographically.
	pub(crate) fn sort(&mut self) {
		self.transitions.sort_keys();
	}
}
