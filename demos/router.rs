use pathmark::{
	hyper::{Body, Server},
	params, Handler, HttpRouter, Response, Router,
};
use tracing_subscriber::EnvFilter;

fn home(_params: Vec<String>) -> anyhow::Result<Response> {
	Ok(Response::new(Body::from("home")))
}

fn blog_post(params: Vec<String>) -> anyhow::Result<Response> {
	dbg!(&params);
	Ok(Response::new(Body::from(params.join(" "))))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let addr = ([127, 0, 0, 1], 3000).into();

	let mut router = Router::new();
	router
		.get("/", Handler::func(home), Some("home"))?
		.get("/blog/:id/:slug", Handler::func(blog_post), Some("blog_post"))?
		.group("admin", |admin| {
			admin.get("users/:id", Handler::script("demos/admin_user.sh"), Some("admin_user"))?;
			Ok(())
		})?;

	println!(
		"Try http://{}{}",
		addr,
		router.url("blog_post", params! { "id" => 42, "slug" => "hello" })
	);

	let server = Server::bind(&addr).serve(HttpRouter::from(router));
	println!("Listening on http://{}", addr);

	server.await?;
	Ok(())
}
