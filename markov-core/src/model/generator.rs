use log::debug;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

use super::order::{ContextWindow, Order};
use super::transition_table::TransitionTable;
use crate::error::{MarkovError, Result};
use crate::tokenizer::is_separator;

/// Weighted random walk over a [`TransitionTable`].
///
/// The generator owns its random source. A seeded generator replays the
/// same walk for the same table, start and budget; an entropy-backed one
/// does not.
#[derive(Debug)]
pub struct Generator<R: Rng> {
	rng: R,
}

impl Generator<StdRng> {
	/// Deterministic generator seeded with `seed`.
	pub fn seeded(seed: u64) -> Self {
		Self { rng: StdRng::seed_from_u64(seed) }
	}
}

impl Generator<ThreadRng> {
	/// Non-reproducible generator backed by the thread-local RNG.
	pub fn from_entropy() -> Self {
		Self { rng: rand::rng() }
	}
}

impl<R: Rng> Generator<R> {
	/// Wraps an existing RNG handle.
	pub fn with_rng(rng: R) -> Self {
		Self { rng }
	}

	/// Mutable access to the underlying RNG (e.g. to pick a random start).
	pub fn rng_mut(&mut self) -> &mut R {
		&mut self.rng
	}

	/// Generates at most `max_tokens` tokens starting from `start`.
	///
	/// # Behavior
	/// - Order-1: `start` is used verbatim as the first token and context.
	/// - Order-2: the last two whitespace-separated words of `start` seed the
	///   window; a single word is paired with the empty sentinel.
	/// - The walk stops early, without error, as soon as a context is unknown.
	///
	/// # Errors
	/// Returns [`MarkovError::InvalidMaxTokens`] if `max_tokens` is 0.
	pub fn generate(
		&mut self,
		table: &TransitionTable,
		start: &str,
		max_tokens: usize,
		order: Order,
	) -> Result<Vec<String>> {
		if max_tokens == 0 {
			return Err(MarkovError::InvalidMaxTokens);
		}

		let (mut window, mut output) = match order {
			Order::First => (
				ContextWindow::with_tokens(order, "", start),
				vec![start.to_owned()],
			),
			Order::Second => {
				let words: Vec<&str> = start.split(is_separator).filter(|w| !w.is_empty()).collect();
				let (prev1, prev2) = match words.as_slice() {
					[] => ("", ""),
					[word] => ("", *word),
					[.., prev1, prev2] => (*prev1, *prev2),
				};
				let output = if prev1.is_empty() {
					vec![prev2.to_owned()]
				} else {
					vec![prev1.to_owned(), prev2.to_owned()]
				};
				(ContextWindow::with_tokens(order, prev1, prev2), output)
			}
		};

		let steps = match order {
			Order::First => max_tokens - 1,
			Order::Second => max_tokens.saturating_sub(2),
		};

		let mut exhausted = true;
		for _ in 0..steps {
			let key = window.key();
			let next = match table.successors(&key).and_then(|state| state.predict(&mut self.rng)) {
				Some(next) => next.to_owned(),
				None => {
					debug!("generation stopped on unknown context {:?} after {} tokens", key, output.len());
					exhausted = false;
					break;
				}
			};
			window.push(&next);
			output.push(next);
		}
		if exhausted {
			debug!("generation stopped after reaching the budget of {} tokens", max_tokens);
		}

		output.truncate(max_tokens);
		Ok(output)
	}
}

/// One-shot generation: seeded when `seed` is given, entropy-backed otherwise.
pub fn generate(
	table: &TransitionTable,
	start: &str,
	max_tokens: usize,
	order: Order,
	seed: Option<u64>,
) -> Result<Vec<String>> {
	match seed {
		Some(seed) => Generator::seeded(seed).generate(table, start, max_tokens, order),
		None => Generator::from_entropy().generate(table, start, max_tokens, order),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn abac_table() -> TransitionTable {
		let mut table = TransitionTable::new();
		table.train_tokens(&["a", "b", "a", "b", "a", "c"], Order::First);
		table
	}

	#[test]
	fn zero_budget_is_rejected() {
		let table = abac_table();
		assert!(matches!(
			generate(&table, "a", 0, Order::First, Some(1)),
			Err(MarkovError::InvalidMaxTokens)
		));
	}

	#[test]
	fn unknown_start_returns_only_start() {
		let table = abac_table();
		assert_eq!(generate(&table, "zzz", 50, Order::First, Some(9)).unwrap(), vec!["zzz"]);
	}

	#[test]
	fn budget_of_one_returns_start() {
		let table = abac_table();
		assert_eq!(generate(&table, "a", 1, Order::First, None).unwrap(), vec!["a"]);
	}

	#[test]
	fn output_follows_observed_transitions() {
		let table = abac_table();
		for seed in 0..50 {
			let output = generate(&table, "a", 20, Order::First, Some(seed)).unwrap();
			assert!(output.len() <= 20);
			assert_eq!(output[0], "a");
			for pair in output.windows(2) {
				assert!(table.weight(&pair[0], &pair[1]).is_some(), "{pair:?}");
			}
			// "c" was never followed by anything
			if let Some(pos) = output.iter().position(|t| t == "c") {
				assert_eq!(pos, output.len() - 1);
			}
		}
	}

	#[test]
	fn after_a_comes_b_twice_as_often_as_c() {
		let table = abac_table();
		let mut generator = Generator::seeded(2024);
		let (mut b, mut c) = (0usize, 0usize);
		for _ in 0..30_000 {
			let output = generator.generate(&table, "a", 2, Order::First).unwrap();
			match output[1].as_str() {
				"b" => b += 1,
				"c" => c += 1,
				other => panic!("unexpected successor {other}"),
			}
		}
		let ratio = b as f64 / c as f64;
		assert!((ratio - 2.0).abs() < 0.15, "ratio was {ratio}");
	}

	#[test]
	fn same_seed_same_output() {
		let table = abac_table();
		let first = generate(&table, "a", 100, Order::First, Some(7)).unwrap();
		let second = generate(&table, "a", 100, Order::First, Some(7)).unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn second_order_start_window() {
		let mut table = TransitionTable::new();
		table.train_tokens(&["the", "cat", "sat", "down"], Order::Second);

		assert_eq!(
			generate(&table, "the", 10, Order::Second, Some(1)).unwrap(),
			vec!["the", "cat", "sat", "down"]
		);
		assert_eq!(
			generate(&table, "so the cat", 10, Order::Second, Some(1)).unwrap(),
			vec!["the", "cat", "sat", "down"]
		);
		assert_eq!(
			generate(&table, "", 10, Order::Second, Some(1)).unwrap(),
			vec!["", "the", "cat", "sat", "down"]
		);
	}

	#[test]
	fn second_order_unknown_start_keeps_prefix() {
		let table = TransitionTable::new();
		assert_eq!(generate(&table, "hello", 10, Order::Second, None).unwrap(), vec!["hello"]);
		assert_eq!(
			generate(&table, "hello there", 10, Order::Second, None).unwrap(),
			vec!["hello", "there"]
		);
	}

	#[test]
	fn looping_chain_stops_at_budget() {
		let mut table = TransitionTable::new();
		table.train_tokens(&["x", "x"], Order::First);
		assert_eq!(generate(&table, "x", 6, Order::First, Some(3)).unwrap(), vec!["x"; 6]);
	}

	#[test]
	fn huge_loaded_weights_still_sample() {
		let table: TransitionTable =
			serde_json::from_str(r#"{"a": {"b": 18446744073709551615, "c": 1}}"#).unwrap();
		for seed in 0..20 {
			let output = generate(&table, "a", 3, Order::First, Some(seed)).unwrap();
			assert_eq!(output.len(), 2);
			assert!(output[1] == "b" || output[1] == "c", "{output:?}");
		}
	}

	#[test]
	fn second_order_start_splits_on_separators() {
		let mut table = TransitionTable::new();
		table.train_tokens(&["the", "cat", "sat"], Order::Second);
		assert_eq!(
			generate(&table, "the\u{1f}cat", 5, Order::Second, Some(1)).unwrap(),
			vec!["the", "cat", "sat"]
		);
	}

	#[test]
	fn second_order_respects_budget() {
		let mut table = TransitionTable::new();
		table.train_tokens(&["a", "b", "a", "b", "a", "b"], Order::Second);

		assert_eq!(generate(&table, "a b", 1, Order::Second, Some(0)).unwrap(), vec!["a"]);
		assert_eq!(generate(&table, "a b", 2, Order::Second, Some(0)).unwrap(), vec!["a", "b"]);
		assert_eq!(generate(&table, "a b", 5, Order::Second, Some(0)).unwrap().len(), 5);
	}
}
