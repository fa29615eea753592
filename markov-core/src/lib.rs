//! Variable-order Markov chain text engine.
//!
//! This crate provides:
//! - A stateless whitespace tokenizer with a configurable skip set
//! - An order-1 / order-2 transition table trained from token streams
//! - Weighted random generation, optionally seeded for reproducible output
//! - Exact persistence of the learned table (JSON document or binary snapshot)

/// Raw text to token sequence.
pub mod tokenizer;

/// Transition table, context orders and generation.
pub mod model;

/// Saving and loading transition tables.
pub mod persistence;

/// File helpers (plain-text corpus lines).
pub mod io;

/// Error type shared by every fallible operation.
pub mod error;

pub use error::{MarkovError, Result};
pub use model::generator::{generate, Generator};
pub use model::order::Order;
pub use model::transition_table::TransitionTable;
pub use persistence::{load, save, KeyOrder};
pub use tokenizer::{tokenize, TokenizerConfig, DEFAULT_SKIP};
