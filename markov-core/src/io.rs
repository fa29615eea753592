use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{MarkovError, Result};

/// Opens `path` for reading.
///
/// A missing file maps to [`MarkovError::NotFound`], anything else to
/// [`MarkovError::Io`].
pub(crate) fn open_existing(path: &Path) -> Result<File> {
	File::open(path).map_err(|e| match e.kind() {
		io::ErrorKind::NotFound => MarkovError::NotFound { path: path.to_path_buf() },
		_ => MarkovError::Io(e),
	})
}

/// Reads a text file and returns its non-blank lines.
///
/// - Splits on `\n` / `\r\n`
/// - Lines holding only whitespace are dropped
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
	let reader = BufReader::new(open_existing(path.as_ref())?);
	let mut lines = Vec::new();
	for line in reader.lines() {
		let line = line?;
		if !line.trim().is_empty() {
			lines.push(line);
		}
	}
	Ok(lines)
}
