use crate::{Error, Router, ScriptOutput};
use hyper::{body::Body, service::Service};
use std::{
	convert::Infallible,
	future::{ready, Ready},
	sync::Arc,
	task::{Context, Poll},
};

pub use hyper;

pub use hyper::http::response::Builder as ResponseBuilder;
pub type Request = hyper::Request<Body>;
pub type Response = hyper::Response<Body>;

impl From<ScriptOutput> for Response {
	fn from(output: ScriptOutput) -> Self {
		Response::new(Body::from(output.stdout))
	}
}

fn default_error_handler(e: Error) -> Response {
	let body = e.to_string();
	ResponseBuilder::default()
		.status(e.status_code())
		.body(Body::from(body.clone()))
		.unwrap_or_else(|_| Response::new(Body::from(body)))
}

/// A function that converts a dispatch error into a response.
pub type ErrorHandler = fn(e: Error) -> Response;

/// Serves a [`Router`] through hyper.
///
/// Handlers run synchronously inside the request future, so a script handler holds its tokio
/// worker until the child process exits. Keep slow handlers off this path or give the runtime
/// enough workers.
pub struct HttpRouter {
	router: Arc<Router<Response>>,
	error_handler: ErrorHandler,
}

impl HttpRouter {
	pub fn error_handler(mut self, error_handler: ErrorHandler) -> Self {
		self.error_handler = error_handler;
		self
	}
}

impl From<Router<Response>> for HttpRouter {
	fn from(router: Router<Response>) -> Self {
		Self {
			router: Arc::new(router),
			error_handler: default_error_handler,
		}
	}
}

impl<T> Service<T> for HttpRouter {
	type Response = RouteHandler;
	type Error = Infallible;
	type Future = Ready<Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _: &mut Context) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, _: T) -> Self::Future {
		ready(Ok(RouteHandler {
			router: Arc::clone(&self.router),
			error_handler: self.error_handler,
		}))
	}
}

/// Responsible for handling the actual HTTP requests from hyper.
pub struct RouteHandler {
	router: Arc<Router<Response>>,
	error_handler: ErrorHandler,
}

impl Service<Request> for RouteHandler {
	type Response = Response;
	type Error = Infallible;
	type Future = Ready<Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, req: Request) -> Self::Future {
		let res = self
			.router
			.dispatch(req.uri().path(), req.method().as_str())
			.unwrap_or_else(self.error_handler);
		ready(Ok(res))
	}
}
