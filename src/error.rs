use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
	/// No route collection exists for the request method.
	#[error("method not supported: {0}")]
	MethodNotSupported(String),
	/// The method is known but none of its routes match the path.
	#[error("no route matches {0}")]
	NotFound(String),
	/// The matched route points at a script that does not exist.
	#[error("invalid route handler: {}", .0.display())]
	InvalidHandler(PathBuf),
	#[error("invalid placeholder type `{name}`: {reason}")]
	InvalidPattern { name: String, reason: String },
	#[error("invalid route template `{template}`")]
	InvalidTemplate {
		template: String,
		#[source]
		source: regex::Error,
	},
	/// An error returned by the route handler itself, passed through untouched.
	#[error(transparent)]
	Handler(#[from] anyhow::Error),
}

impl Error {
	/// The HTTP status code a transport should answer with for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			Error::NotFound(_) => 404,
			Error::MethodNotSupported(_) => 405,
			_ => 500,
		}
	}
}
