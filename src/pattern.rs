use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;

/// Placeholder type used when a template names an unknown type.
pub const ANY: &str = "any";

/// Maps placeholder type names to the regex fragment they match.
///
/// Every fragment is a single capturing group so matched segments come out in template order.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
	fragments: HashMap<String, String>,
}

impl Default for PatternRegistry {
	fn default() -> Self {
		let mut fragments = HashMap::new();
		fragments.insert("id".to_owned(), "([0-9]+)".to_owned());
		fragments.insert("slug".to_owned(), "([a-zA-Z0-9-]+)".to_owned());
		fragments.insert(ANY.to_owned(), "([^/]+)".to_owned());

		Self { fragments }
	}
}

impl PatternRegistry {
	/// Adds or replaces a placeholder type.
	pub fn insert(&mut self, name: &str, fragment: &str) -> Result<&mut Self> {
		let invalid = |reason: String| Error::InvalidPattern {
			name: name.to_owned(),
			reason,
		};

		let compiled = Regex::new(fragment).map_err(|e| invalid(e.to_string()))?;
		// one implicit group for the whole match, plus exactly one of ours
		if compiled.captures_len() != 2 {
			return Err(invalid(format!(
				"expected exactly one capturing group, found {}",
				compiled.captures_len() - 1
			)));
		}

		self.fragments.insert(name.to_owned(), fragment.to_owned());
		Ok(self)
	}

	pub fn resolve(&self, name: &str) -> &str {
		self.fragments
			.get(name)
			.or_else(|| self.fragments.get(ANY))
			.map(String::as_str)
			.unwrap_or("([^/]+)")
	}
}
