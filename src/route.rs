use crate::error::{Error, Result};
use crate::pattern::PatternRegistry;
use regex::Regex;
use std::{
	borrow::Cow,
	fmt::{self, Debug, Formatter},
	path::{Path, PathBuf},
};

/// A piece of a route template.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum Token<'a> {
	Literal(&'a str),
	/// A `:name` placeholder, without the colon.
	Placeholder(&'a str),
}

fn is_name_byte(b: u8) -> bool {
	b.is_ascii_alphanumeric() || b == b'_'
}

/// Splits a template into literal spans and placeholders, left to right.
///
/// A colon that isn't followed by a name character is kept as literal text.
pub(crate) fn tokenize(template: &str) -> Vec<Token<'_>> {
	let bytes = template.as_bytes();
	let mut tokens = vec![];
	let mut literal_start = 0;
	let mut i = 0;

	while i < bytes.len() {
		if bytes[i] == b':' {
			let name_len = bytes[i + 1..]
				.iter()
				.take_while(|b| is_name_byte(**b))
				.count();

			if name_len > 0 {
				if literal_start < i {
					tokens.push(Token::Literal(&template[literal_start..i]));
				}
				tokens.push(Token::Placeholder(&template[i + 1..i + 1 + name_len]));

				i += 1 + name_len;
				literal_start = i;
				continue;
			}
		}

		i += 1;
	}

	if literal_start < template.len() {
		tokens.push(Token::Literal(&template[literal_start..]));
	}
	tokens
}

/// An anchored pattern compiled from a route template.
#[derive(Debug, Clone)]
pub struct Matcher {
	regex: Regex,
}

impl Matcher {
	/// Compiles a template such as `/blog/:id/:slug`.
	///
	/// One trailing slash is dropped and a leading slash is implied, so `blog/:id/` and
	/// `/blog/:id` compile to the same matcher. Literal text is escaped; each placeholder is
	/// replaced by its type's fragment from `patterns`.
	pub fn compile(template: &str, patterns: &PatternRegistry) -> Result<Self> {
		let trimmed = template.strip_suffix('/').unwrap_or(template);

		let mut pattern = String::from("^");
		if !trimmed.starts_with('/') {
			pattern.push('/');
		}

		for token in tokenize(trimmed) {
			match token {
				Token::Literal(text) => pattern.push_str(&regex::escape(text)),
				Token::Placeholder(name) => pattern.push_str(patterns.resolve(name)),
			}
		}
		pattern.push_str("/?$");

		let regex = Regex::new(&pattern).map_err(|source| Error::InvalidTemplate {
			template: template.to_owned(),
			source,
		})?;
		Ok(Self { regex })
	}

	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(&with_leading_slash(path))
	}

	/// Returns the captured placeholder values in template order, or `None` if the path
	/// doesn't match.
	pub fn captures(&self, path: &str) -> Option<Vec<String>> {
		let path = with_leading_slash(path);
		self.regex.captures(&path).map(|caps| {
			caps.iter()
				.skip(1)
				.map(|m| m.map(|m| m.as_str().to_owned()).unwrap_or_default())
				.collect()
		})
	}

	pub fn as_str(&self) -> &str {
		self.regex.as_str()
	}
}

fn with_leading_slash(path: &str) -> Cow<'_, str> {
	if path.starts_with('/') {
		Cow::Borrowed(path)
	} else {
		Cow::Owned(format!("/{}", path))
	}
}

/// A function route handler: receives the captured parameters in template order.
pub type Func<R> = Box<dyn Fn(Vec<String>) -> anyhow::Result<R> + Send + Sync>;

/// What a route runs once it matches.
pub enum Handler<R> {
	Func(Func<R>),
	/// An executable file, run with the captured parameters as its arguments.
	Script(PathBuf),
}

impl<R> Handler<R> {
	pub fn func<F>(f: F) -> Self
	where
		F: Fn(Vec<String>) -> anyhow::Result<R> + Send + Sync + 'static,
	{
		Handler::Func(Box::new(f))
	}

	pub fn script(path: impl Into<PathBuf>) -> Self {
		Handler::Script(path.into())
	}
}

impl<R> Debug for Handler<R> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Handler::Func(_) => f.write_str("Func(..)"),
			Handler::Script(path) => f.debug_tuple("Script").field(path).finish(),
		}
	}
}

/// A registered route. The matcher is derived from the template once and never changes.
#[derive(Debug)]
pub struct Route<R> {
	method: String,
	template: String,
	matcher: Matcher,
	handler: Handler<R>,
	name: Option<String>,
}

impl<R> Route<R> {
	pub(crate) fn new(
		method: String,
		template: String,
		matcher: Matcher,
		handler: Handler<R>,
		name: Option<String>,
	) -> Self {
		Self {
			method,
			template,
			matcher,
			handler,
			name,
		}
	}

	pub fn method(&self) -> &str {
		&self.method
	}

	pub fn template(&self) -> &str {
		&self.template
	}

	pub fn matcher(&self) -> &Matcher {
		&self.matcher
	}

	pub fn handler(&self) -> &Handler<R> {
		&self.handler
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn script(&self) -> Option<&Path> {
		match &self.handler {
			Handler::Script(path) => Some(path),
			Handler::Func(_) => None,
		}
	}
}
