use std::io;
use std::path::PathBuf;

/// Errors surfaced by the Markov engine.
///
/// None of these are retried internally; every failure propagates to the
/// immediate caller.
#[derive(Debug, thiserror::Error)]
pub enum MarkovError {
	/// A model file was requested that does not exist on disk.
	#[error("model file {} does not exist", path.display())]
	NotFound { path: PathBuf },

	/// The JSON document is not a `context -> successor -> weight` mapping.
	#[error("malformed model document: {0}")]
	Format(#[from] serde_json::Error),

	/// The binary snapshot could not be encoded or decoded.
	#[error("malformed model snapshot: {0}")]
	Snapshot(#[from] postcard::Error),

	#[error("i/o error: {0}")]
	Io(#[from] io::Error),

	/// Only order-1 and order-2 contexts are supported.
	#[error("unsupported order {0}, expected 1 or 2")]
	InvalidOrder(u8),

	#[error("max_tokens must be at least 1")]
	InvalidMaxTokens,
}

pub type Result<T> = std::result::Result<T, MarkovError>;
