use indexmap::IndexMap;
use log::debug;
use rand::Rng;
use rand::prelude::IteratorRandom;
use serde::{Deserialize, Serialize};

use super::order::{ContextWindow, Order};
use super::state::State;
use crate::tokenizer::TokenizerConfig;

/// The learned model: context key -> successor token -> weight.
///
/// # Responsibilities
/// - Accumulate transition counts from token streams (order-1 or order-2)
/// - Answer lookups for the generator
/// - Serialize as a two-level `{ context: { successor: weight } }` object
///
/// # Invariants
/// - Every context present has at least one successor
/// - Training only ever adds keys and increments weights
/// - Contexts and successors keep their first-seen order
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct TransitionTable {
	contexts: IndexMap<String, State>,
}

impl TransitionTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds one observation of `successor` following `context`.
	///
	/// Missing context and successor entries are created on the fly.
	fn increment(&mut self, context: String, successor: &str) {
		self.contexts.entry(context).or_default().add_transition(successor);
	}

	/// Trains from an already tokenized sequence.
	///
	/// Empty strings are reserved as the "no prior token" sentinel and are
	/// ignored if present in `tokens`.
	pub fn train_tokens<S: AsRef<str>>(&mut self, tokens: &[S], order: Order) {
		let mut window = ContextWindow::new(order);
		let mut observed = 0usize;

		for token in tokens.iter().map(AsRef::as_ref).filter(|t| !t.is_empty()) {
			self.increment(window.key(), token);
			window.push(token);
			observed += 1;
		}

		debug!(
			"trained {} tokens at order {}, table now holds {} contexts",
			observed,
			u8::from(order),
			self.contexts.len()
		);
	}

	/// Tokenizes `text` with `config`, then trains on the result.
	pub fn train_text(&mut self, text: &str, config: &TokenizerConfig, order: Order) {
		let tokens = config.tokenize(text);
		self.train_tokens(&tokens, order);
	}

	/// Returns the successor set for `context`, if it was ever observed.
	pub fn successors(&self, context: &str) -> Option<&State> {
		self.contexts.get(context)
	}

	/// Returns the weight of the `(context, successor)` transition.
	pub fn weight(&self, context: &str, successor: &str) -> Option<u64> {
		self.contexts.get(context)?.weight(successor)
	}

	pub fn contains_context(&self, context: &str) -> bool {
		self.contexts.contains_key(context)
	}

	/// Iterates over context keys in first-seen order.
	pub fn contexts(&self) -> impl Iterator<Item = &str> {
		self.contexts.keys().map(String::as_str)
	}

	/// Number of distinct context keys.
	pub fn len(&self) -> usize {
		self.contexts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.contexts.is_empty()
	}

	/// Sum of every weight in the table.
	pub fn total_transitions(&self) -> u128 {
		self.contexts.values().map(State::total).sum()
	}

	/// Returns a uniformly chosen context key.
	///
	/// Useful for starting a generation without a user prompt.
	/// Returns `None` if the table is empty.
	pub fn random_context<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		self.contexts.keys().choose(rng).map(String::as_str)
	}

	/// Returns a copy with contexts and successors in lexicographic order.
	pub(crate) fn sorted(&self) -> Self {
		let mut contexts = self.contexts.clone();
		contexts.sort_keys();
		contexts.values_mut().for_each(State::sort);
		Self { contexts }
	}
}
