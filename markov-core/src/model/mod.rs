//! Markov chain model and the walk that samples from it.
//!
//! - Context orders and the sliding context window (`Order`)
//! - Per-context successor weights (`State`)
//! - The learned table and its training entry points (`TransitionTable`)
//! - Weighted random generation (`Generator`)

/// Context order (1 or 2 preceding tokens) and context-key construction.
pub mod order;

/// Successor weights of a single context, with weighted sampling.
pub mod state;

/// Two-level `context -> successor -> weight` table.
///
/// Owns all learned state; training is additive only.
pub mod transition_table;

/// Bounded weighted random walk with an explicit RNG handle.
pub mod generator;
