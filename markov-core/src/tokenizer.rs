use std::collections::HashSet;

/// Punctuation dropped from tokens unless the caller overrides it.
pub const DEFAULT_SKIP: &str = ",.:;'\"![]()*&";

/// Settings controlling how raw text is split into tokens.
///
/// # Invariants
/// - Whitespace always separates tokens, it is never part of `skip`'s effect.
/// - Characters in `skip` are removed in place and never split a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenizerConfig {
	/// Characters silently removed from the input.
	pub skip: HashSet<char>,
	/// Lower-case the whole input before scanning.
	pub case_insensitive: bool,
}

impl Default for TokenizerConfig {
	fn default() -> Self {
		Self {
			skip: DEFAULT_SKIP.chars().collect(),
			case_insensitive: true,
		}
	}
}

impl TokenizerConfig {
	/// Replaces the skip set with the characters of `skip`.
	///
	/// An empty string disables skipping entirely.
	pub fn with_skip(mut self, skip: &str) -> Self {
		self.skip = skip.chars().collect();
		self
	}

	pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
		self.case_insensitive = case_insensitive;
		self
	}

	/// Splits `text` using this configuration.
	pub fn tokenize(&self, text: &str) -> Vec<String> {
		tokenize(text, &self.skip, self.case_insensitive)
	}
}

/// Unicode whitespace plus the ASCII information separators (U+001C..=U+001F),
/// which also split words in plain-text exports.
pub(crate) fn is_separator(c: char) -> bool {
	c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Splits raw text into an ordered sequence of non-empty tokens.
///
/// - Whitespace flushes the current token.
/// - Characters in `skip` are dropped without flushing, so `"do.not"` becomes `"donot"`.
/// - With `case_insensitive`, the entire input is lower-cased first.
pub fn tokenize(text: &str, skip: &HashSet<char>, case_insensitive: bool) -> Vec<String> {
	let lowered;
	let text = if case_insensitive {
		lowered = text.to_lowercase();
		lowered.as_str()
	} else {
		text
	};

	let mut tokens = Vec::new();
	let mut token = String::new();

	for c in text.chars() {
		if is_separator(c) {
			if !token.is_empty() {
				tokens.push(std::mem::take(&mut token));
			}
		} else if skip.contains(&c) {
			continue;
		} else {
			token.push(c);
		}
	}

	if !token.is_empty() {
		tokens.push(token);
	}

	tokens
}
