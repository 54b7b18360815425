use crate::{
	error::{Error, Result},
	pattern::PatternRegistry,
	route::{tokenize, Handler, Matcher, Route, Token},
	script::{self, ScriptOutput, ScriptRunner},
};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Builds a list of URL parameters with mixed value types.
///
/// ```
/// use pathmark::params;
///
/// let params = params! { "id" => 42, "slug" => "php-router" };
/// assert_eq!(params, vec![("id", "42".to_owned()), ("slug", "php-router".to_owned())]);
/// ```
#[macro_export]
macro_rules! params {
	{} => { ::std::vec::Vec::<(&str, ::std::string::String)>::new() };
	{ $($key:expr => $value:expr),+ $(,)? } => {
		vec![$(($key, ::std::string::ToString::to_string(&$value))),+]
	};
}

/// Configures a [`Router`] before any route is registered.
pub struct RouterBuilder<R> {
	pub patterns: PatternRegistry,
	pub script_runner: ScriptRunner<R>,
}

impl<R> RouterBuilder<R> {
	pub fn new(script_runner: ScriptRunner<R>) -> Self {
		Self {
			patterns: PatternRegistry::default(),
			script_runner,
		}
	}

	/// Adds a placeholder type usable as `:name` in templates.
	pub fn pattern(mut self, name: &str, fragment: &str) -> Result<Self> {
		self.patterns.insert(name, fragment)?;
		Ok(self)
	}

	pub fn script_runner(mut self, script_runner: ScriptRunner<R>) -> Self {
		self.script_runner = script_runner;
		self
	}

	pub fn build(self) -> Router<R> {
		let mut routes = HashMap::new();
		routes.insert("GET".to_owned(), vec![]);
		routes.insert("POST".to_owned(), vec![]);

		Router {
			routes,
			named: HashMap::new(),
			patterns: self.patterns,
			script_runner: self.script_runner,
		}
	}
}

impl<R: From<ScriptOutput>> Default for RouterBuilder<R> {
	fn default() -> Self {
		Self::new(script::run_into::<R>)
	}
}

/// Per-method route lists plus the named-route index.
///
/// Routes are registered up front through `&mut self`; dispatch and URL generation only need
/// `&self`, so a built router can be shared behind an `Arc` once registration is done.
pub struct Router<R> {
	routes: HashMap<String, Vec<Route<R>>>,
	named: HashMap<String, String>,
	patterns: PatternRegistry,
	script_runner: ScriptRunner<R>,
}

impl<R: From<ScriptOutput>> Router<R> {
	pub fn new() -> Self {
		RouterBuilder::default().build()
	}

	pub fn builder() -> RouterBuilder<R> {
		RouterBuilder::default()
	}
}

impl<R: From<ScriptOutput>> Default for Router<R> {
	fn default() -> Self {
		Self::new()
	}
}

impl<R> Router<R> {
	/// Appends a route for `method`. Earlier routes win when several match the same path.
	///
	/// A non-empty `name` makes the template available to [`Router::url`]; registering the same
	/// name again replaces the previous template.
	pub fn register(
		&mut self,
		method: &str,
		template: &str,
		handler: Handler<R>,
		name: Option<&str>,
	) -> Result<&mut Self> {
		let method = method.to_uppercase();
		let matcher = Matcher::compile(template, &self.patterns)?;
		let name = name.filter(|name| !name.is_empty());

		if let Some(name) = name {
			if let Some(previous) = self.named.insert(name.to_owned(), template.to_owned()) {
				warn!(name, previous = %previous, template, "route name overwritten");
			}
		}

		debug!(method = %method, template, pattern = matcher.as_str(), "registered route");
		self.routes
			.entry(method.clone())
			.or_default()
			.push(Route::new(
				method,
				template.to_owned(),
				matcher,
				handler,
				name.map(str::to_owned),
			));
		Ok(self)
	}

	pub fn get(&mut self, template: &str, handler: Handler<R>, name: Option<&str>) -> Result<&mut Self> {
		self.register("GET", template, handler, name)
	}

	pub fn post(&mut self, template: &str, handler: Handler<R>, name: Option<&str>) -> Result<&mut Self> {
		self.register("POST", template, handler, name)
	}

	/// Registers a batch of routes under a common prefix.
	///
	/// ```
	/// use pathmark::{Handler, Router};
	///
	/// let mut router = Router::<String>::new();
	/// router.group("admin", |admin| {
	/// 	admin.get("users/:id", Handler::func(|params| Ok(params.join(","))), None)?;
	/// 	Ok(())
	/// })?;
	///
	/// assert_eq!(router.dispatch("/admin/users/5", "GET")?, "5");
	/// # Ok::<(), pathmark::Error>(())
	/// ```
	pub fn group<F>(&mut self, prefix: &str, body: F) -> Result<&mut Self>
	where
		F: FnOnce(&mut Group<'_, R>) -> Result<()>,
	{
		let mut group = Group::new(prefix, self);
		debug!(prefix = %group.prefix, "entering route group");
		body(&mut group)?;
		Ok(self)
	}

	/// Routes a request to the first matching handler and returns its result.
	///
	/// `uri` may be a bare path or a full request target; only its path is matched.
	/// Handler errors come back as [`Error::Handler`] without modification.
	pub fn dispatch(&self, uri: &str, method: &str) -> Result<R> {
		let path = extract_path(uri);
		let method = method.to_uppercase();

		let routes = match self.routes.get(&method) {
			Some(routes) => routes,
			None => {
				debug!(method = %method, path, "method not supported");
				return Err(Error::MethodNotSupported(method));
			}
		};

		for route in routes {
			if let Some(params) = route.matcher().captures(path) {
				trace!(method = %method, path, template = route.template(), ?params, "matched route");
				return self.invoke(route, params);
			}
		}

		debug!(method = %method, path, "no route matched");
		Err(Error::NotFound(path.to_owned()))
	}

	fn invoke(&self, route: &Route<R>, params: Vec<String>) -> Result<R> {
		match route.handler() {
			Handler::Func(f) => Ok(f(params)?),
			Handler::Script(script) => {
				if !script.is_file() {
					debug!(script = %script.display(), "script handler not found");
					return Err(Error::InvalidHandler(script.clone()));
				}
				Ok((self.script_runner)(script, &params)?)
			}
		}
	}

	/// Expands a named route, or a raw template if no route has that name.
	///
	/// Placeholders without a matching parameter are left in the output as-is. Values are not
	/// checked against the placeholder types.
	pub fn url<I, K, V>(&self, route: &str, params: I) -> String
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: ToString,
	{
		let template = self.named.get(route).map(String::as_str).unwrap_or(route);
		let params: HashMap<String, String> = params
			.into_iter()
			.map(|(k, v)| (k.into(), v.to_string()))
			.collect();

		let mut url = String::with_capacity(template.len());
		for token in tokenize(template) {
			match token {
				Token::Literal(text) => url.push_str(text),
				Token::Placeholder(name) => match params.get(name) {
					Some(value) => url.push_str(value),
					None => {
						url.push(':');
						url.push_str(name);
					}
				},
			}
		}
		url
	}

	/// The template registered under `name`, if any.
	pub fn named(&self, name: &str) -> Option<&str> {
		self.named.get(name).map(String::as_str)
	}

	/// Routes registered for `method`, in match order.
	pub fn routes(&self, method: &str) -> Option<&[Route<R>]> {
		self.routes.get(&method.to_uppercase()).map(Vec::as_slice)
	}

	pub fn patterns(&self) -> &PatternRegistry {
		&self.patterns
	}
}

/// Registers routes on a parent [`Router`] with a shared prefix.
pub struct Group<'a, R> {
	prefix: String,
	router: &'a mut Router<R>,
}

impl<'a, R> Group<'a, R> {
	fn new(prefix: &str, router: &'a mut Router<R>) -> Self {
		Self {
			prefix: prefix.trim_end_matches('/').to_owned(),
			router,
		}
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	fn template(&self, path: &str) -> String {
		format!("{}/{}", self.prefix, path.trim_start_matches('/'))
	}

	pub fn register(
		&mut self,
		method: &str,
		path: &str,
		handler: Handler<R>,
		name: Option<&str>,
	) -> Result<&mut Self> {
		let template = self.template(path);
		self.router.register(method, &template, handler, name)?;
		Ok(self)
	}

	pub fn get(&mut self, path: &str, handler: Handler<R>, name: Option<&str>) -> Result<&mut Self> {
		self.register("GET", path, handler, name)
	}

	pub fn post(&mut self, path: &str, handler: Handler<R>, name: Option<&str>) -> Result<&mut Self> {
		self.register("POST", path, handler, name)
	}

	/// Opens a nested group whose prefix is appended to this one.
	pub fn group<F>(&mut self, prefix: &str, body: F) -> Result<&mut Self>
	where
		F: FnOnce(&mut Group<'_, R>) -> Result<()>,
	{
		let prefix = self.template(prefix);
		self.router.group(&prefix, body)?;
		Ok(self)
	}
}

/// Pulls the path out of a request target, dropping scheme, authority, query and fragment.
fn extract_path(uri: &str) -> &str {
	let uri = uri.split(['?', '#']).next().unwrap_or_default();

	match uri.find("://") {
		Some(scheme_end) if is_scheme(&uri[..scheme_end]) => {
			let authority = &uri[scheme_end + 3..];
			match authority.find('/') {
				Some(path_start) => &authority[path_start..],
				None => "/",
			}
		}
		_ => uri,
	}
}

/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
fn is_scheme(s: &str) -> bool {
	let mut bytes = s.bytes();
	match bytes.next() {
		Some(first) if first.is_ascii_alphabetic() => {
			bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
		}
		_ => false,
	}
}
