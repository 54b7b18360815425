//! A dead simple pattern-based HTTP router with named routes and URL generation.
//!
//! ```
//! use pathmark::{params, Handler, Router};
//!
//! fn main() -> Result<(), pathmark::Error> {
//! 	let mut router = Router::<String>::new();
//! 	router
//! 		.get("/", Handler::func(|_| Ok("home".to_owned())), Some("home"))?
//! 		.get("/blog/:id/:slug", Handler::func(|params| Ok(params.join(" "))), Some("post"))?
//! 		.group("admin", |admin| {
//! 			admin.get("users/:id", Handler::script("admin/user.sh"), None)?;
//! 			Ok(())
//! 		})?;
//!
//! 	let url = router.url("post", params! { "id" => 42, "slug" => "hello" });
//! 	assert_eq!(url, "/blog/42/hello");
//! 	assert_eq!(router.dispatch(&url, "get")?, "42 hello");
//! 	Ok(())
//! }
//! ```
//!
//! Templates are made of literal text and `:type` placeholders. `:id` matches digits, `:slug`
//! matches letters, digits and hyphens, and anything else matches a single path segment. More
//! types can be added through [`RouterBuilder::pattern`]. Captured segments are passed to the
//! handler in template order.
//!
//! Routes are tried in registration order and the first match wins. Dispatch fails with
//! [`Error::MethodNotSupported`] for methods without routes, [`Error::NotFound`] when nothing
//! matches and [`Error::InvalidHandler`] when a script handler is missing.
//!
//! With the `http` feature, [`HttpRouter`] serves a router through hyper.

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::*;

mod error;

/// Placeholder types and the regex fragments they match.
pub mod pattern;

/// Route templates, matchers and handlers.
pub mod route;

/// The route table, groups, dispatch and URL generation.
pub mod router;

/// Running script handlers.
pub mod script;

pub use error::{Error, Result};
pub use pattern::PatternRegistry;
pub use route::{Handler, Matcher, Route};
pub use router::{Group, Router, RouterBuilder};
pub use script::{ScriptOutput, ScriptRunner};
