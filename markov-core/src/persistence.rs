use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::error::{MarkovError, Result};
use crate::io::open_existing;
use crate::model::transition_table::TransitionTable;

/// Key ordering used when writing a model document.
///
/// Both orderings load back to the same table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyOrder {
	/// Keys appear in the order they were first observed.
	#[default]
	Insertion,
	/// Keys appear in lexicographic order at both levels, for stable diffs.
	Sorted,
}

/// Keeps I/O failures raised inside `serde_json` out of the format category.
fn json_error(e: serde_json::Error) -> MarkovError {
	if e.is_io() { MarkovError::Io(e.into()) } else { MarkovError::Format(e) }
}

/// Writes `table` as a pretty-printed JSON object (4-space indent, UTF-8).
///
/// Non-ASCII tokens are written as-is, not escaped.
pub fn save<P: AsRef<Path>>(table: &TransitionTable, path: P, key_order: KeyOrder) -> Result<()> {
	let path = path.as_ref();
	let mut writer = BufWriter::new(File::create(path)?);

	let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
	let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
	match key_order {
		KeyOrder::Insertion => table.serialize(&mut serializer),
		KeyOrder::Sorted => table.sorted().serialize(&mut serializer),
	}
	.map_err(json_error)?;
	writer.flush()?;

	info!("saved {} contexts to {}", table.len(), path.display());
	Ok(())
}

/// Reads a JSON model document written by [`save`] (either key order).
///
/// # Errors
/// - [`MarkovError::NotFound`] if `path` does not exist.
/// - [`MarkovError::Format`] if the document is not a two-level
///   `string -> string -> integer` object.
pub fn load<P: AsRef<Path>>(path: P) -> Result<TransitionTable> {
	let path = path.as_ref();
	let reader = BufReader::new(open_existing(path)?);
	let table: TransitionTable = serde_json::from_reader(reader).map_err(json_error)?;

	info!("loaded {} contexts from {}", table.len(), path.display());
	Ok(table)
}

/// Writes `table` as a compact `postcard` snapshot.
pub fn save_snapshot<P: AsRef<Path>>(table: &TransitionTable, path: P) -> Result<()> {
	let path = path.as_ref();
	let bytes = postcard::to_stdvec(table)?;
	std::fs::write(path, bytes)?;

	info!("saved snapshot of {} contexts to {}", table.len(), path.display());
	Ok(())
}

/// Reads a snapshot written by [`save_snapshot`].
///
/// # Errors
/// - [`MarkovError::NotFound`] if `path` does not exist.
/// - [`MarkovError::Snapshot`] if the bytes do not decode to a table.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<TransitionTable> {
	let path = path.as_ref();
	let mut bytes = Vec::new();
	open_existing(path)?.read_to_end(&mut bytes)?;
	let table: TransitionTable = postcard::from_bytes(&bytes)?;

	info!("loaded snapshot of {} contexts from {}", table.len(), path.display());
	Ok(table)
}

impl TransitionTable {
	/// Replaces the whole table with the contents of a JSON model file.
	///
	/// Nothing is merged: on success the previous contents are gone; on
	/// failure `self` is left untouched.
	pub fn load_from<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
		*self = load(path)?;
		Ok(())
	}

	/// Shorthand for [`save`].
	pub fn save_to<P: AsRef<Path>>(&self, path: P, key_order: KeyOrder) -> Result<()> {
		save(self, path, key_order)
	}
}
