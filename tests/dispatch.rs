//! Dispatch and URL generation through the public API.

use pathmark::{params, Error, Handler, Router};

fn echo() -> Handler<String> {
	Handler::func(|params| Ok(params.join(",")))
}

fn constant(value: &'static str) -> Handler<String> {
	Handler::func(move |_| Ok(value.to_owned()))
}

fn blog_router() -> Router<String> {
	let mut router = Router::new();
	router
		.get("/", constant("home"), Some("home"))
		.unwrap()
		.get("/blog/:id", echo(), Some("blog"))
		.unwrap()
		.get("/blog/:id/:slug", echo(), Some("blog_post"))
		.unwrap();
	router
}

#[test]
fn extracts_params_in_order() {
	let router = blog_router();
	assert_eq!(router.dispatch("/blog/42/php-router", "GET").unwrap(), "42,php-router");
	assert_eq!(router.dispatch("/", "GET").unwrap(), "home");
}

#[test]
fn trailing_slash_equivalence() {
	let mut router = Router::<String>::new();
	router
		.get("/blog/:id", echo(), None)
		.unwrap()
		.get("/docs/:slug/", echo(), None)
		.unwrap();

	assert_eq!(router.dispatch("/blog/42/", "GET").unwrap(), "42");
	assert_eq!(router.dispatch("/blog/42", "GET").unwrap(), "42");
	assert_eq!(router.dispatch("/docs/intro", "GET").unwrap(), "intro");
	assert_eq!(router.dispatch("/docs/intro/", "GET").unwrap(), "intro");
}

#[test]
fn first_match_wins() {
	let mut router = Router::<String>::new();
	router
		.get("/item/:any", constant("a"), None)
		.unwrap()
		.get("/item/:id", constant("b"), None)
		.unwrap();

	assert_eq!(router.dispatch("/item/5", "GET").unwrap(), "a");
}

#[test]
fn url_round_trips_through_dispatch() {
	let router = blog_router();

	let url = router.url("blog_post", params! { "id" => 42, "slug" => "php-router" });
	assert_eq!(url, "/blog/42/php-router");
	assert_eq!(router.dispatch(&url, "GET").unwrap(), "42,php-router");

	assert_eq!(router.url("home", params! {}), "/");
}

#[test]
fn url_from_raw_template() {
	let router = blog_router();
	assert_eq!(
		router.url("/blog/:id/:slug", params! { "id" => 7, "slug" => "deneme" }),
		"/blog/7/deneme"
	);
}

#[test]
fn url_keeps_missing_placeholders() {
	let router = blog_router();
	assert_eq!(router.url("/blog/:id/:slug", [("id", 7)]), "/blog/7/:slug");
}

#[test]
fn url_does_not_validate_types() {
	let router = blog_router();
	assert_eq!(router.url("blog", [("id", "not-a-number")]), "/blog/not-a-number");
}

#[test]
fn unknown_method() {
	let router = blog_router();
	assert!(matches!(
		router.dispatch("/", "DELETE"),
		Err(Error::MethodNotSupported(method)) if method == "DELETE"
	));
}

#[test]
fn unmatched_path() {
	let mut router = Router::<String>::new();
	router
		.get("/", constant("home"), None)
		.unwrap()
		.get("/blog/:id", echo(), None)
		.unwrap();

	let err = router.dispatch("/nope", "GET").unwrap_err();
	assert!(matches!(err, Error::NotFound(_)));
	assert_eq!(err.status_code(), 404);
}

#[test]
fn method_is_case_insensitive() {
	let router = blog_router();
	assert_eq!(router.dispatch("/blog/1", "get").unwrap(), "1");
}

#[test]
fn matches_path_of_full_uri() {
	let router = blog_router();
	assert_eq!(
		router
			.dispatch("https://example.com/blog/3/intro?ref=home#comments", "GET")
			.unwrap(),
		"3,intro"
	);
}

#[test]
fn keeps_scheme_like_text_inside_paths() {
	let mut router = Router::<String>::new();
	router.get("/proxy/:any//:any", echo(), None).unwrap();

	assert_eq!(router.dispatch("/proxy/a://b", "GET").unwrap(), "a:,b");
	assert_eq!(
		router.dispatch("http://example.com/proxy/a://b?x=1", "GET").unwrap(),
		"a:,b"
	);
}

#[test]
fn group_prefixing() {
	let mut router = Router::<String>::new();
	router
		.group("admin", |admin| {
			admin.get("users/:id", echo(), Some("admin_user_show"))?;
			Ok(())
		})
		.unwrap();

	assert_eq!(router.named("admin_user_show"), Some("admin/users/:id"));
	assert_eq!(router.dispatch("/admin/users/5", "GET").unwrap(), "5");

	let url = router.url("admin_user_show", [("id", 5)]);
	assert_eq!(url, "admin/users/5");
	assert_eq!(router.dispatch(&url, "GET").unwrap(), "5");
}

#[test]
fn placeholder_types_are_enforced() {
	let mut ids = Router::<String>::new();
	ids.get("/item/:id", echo(), None).unwrap();
	assert!(matches!(ids.dispatch("/item/abc", "GET"), Err(Error::NotFound(_))));

	let mut slugs = Router::<String>::new();
	slugs.get("/item/:slug", echo(), None).unwrap();
	assert_eq!(slugs.dispatch("/item/abc-1", "GET").unwrap(), "abc-1");
	assert!(matches!(slugs.dispatch("/item/abc_1", "GET"), Err(Error::NotFound(_))));
}

#[test]
fn literal_metacharacters_are_escaped() {
	let mut router = Router::<String>::new();
	router.get("/v1.0/:id", echo(), None).unwrap();

	assert_eq!(router.dispatch("/v1.0/3", "GET").unwrap(), "3");
	assert!(matches!(router.dispatch("/v1x0/3", "GET"), Err(Error::NotFound(_))));
}

#[test]
fn handler_errors_pass_through() {
	#[derive(Debug, thiserror::Error)]
	#[error("order {0} is locked")]
	struct Locked(String);

	let mut router = Router::<String>::new();
	router
		.post(
			"/orders/:id",
			Handler::func(|params| Err(Locked(params[0].clone()).into())),
			None,
		)
		.unwrap();

	match router.dispatch("/orders/9", "POST") {
		Err(Error::Handler(e)) => {
			assert_eq!(e.to_string(), "order 9 is locked");
			assert!(e.downcast_ref::<Locked>().is_some());
		}
		other => panic!("expected handler error, got {:?}", other),
	}
}

#[test]
fn missing_script_is_invalid_handler() {
	let mut router = Router::<String>::new();
	router
		.get("/page/:id", Handler::script("does/not/exist.sh"), None)
		.unwrap();

	let err = router.dispatch("/page/1", "GET").unwrap_err();
	assert!(matches!(err, Error::InvalidHandler(ref path) if path.ends_with("exist.sh")));
	assert_eq!(err.status_code(), 500);
}

#[test]
fn directory_script_is_invalid_handler() {
	let dir = tempfile::tempdir().unwrap();

	let mut router = Router::<String>::new();
	router
		.get("/page/:id", Handler::script(dir.path()), None)
		.unwrap();

	let err = router.dispatch("/page/1", "GET").unwrap_err();
	assert!(matches!(err, Error::InvalidHandler(ref path) if path == dir.path()));
}

#[cfg(unix)]
mod scripts {
	use pathmark::{Error, Handler, Router};
	use std::{
		fs,
		os::unix::fs::PermissionsExt,
		path::{Path, PathBuf},
	};
	use tempfile::TempDir;

	fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
		let path = dir.path().join(name);
		fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
		fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
		path
	}

	#[test]
	fn runs_script_with_params() {
		let dir = tempfile::tempdir().unwrap();
		let script = write_script(&dir, "blog_detail.sh", r#"echo "post $1 is $2""#);

		let mut router = Router::<String>::new();
		router
			.get("/blog/:id/:slug", Handler::script(&script), Some("blog_detail"))
			.unwrap();

		assert_eq!(
			router.dispatch("/blog/42/php-router", "GET").unwrap(),
			"post 42 is php-router\n"
		);
	}

	#[test]
	fn script_failures_are_handler_errors() {
		let dir = tempfile::tempdir().unwrap();
		let script = write_script(&dir, "broken.sh", "echo broken >&2; exit 1");

		let mut router = Router::<String>::new();
		router.get("/broken", Handler::script(&script), None).unwrap();

		assert!(matches!(
			router.dispatch("/broken", "GET"),
			Err(Error::Handler(e)) if e.to_string().contains("broken")
		));
	}

	#[test]
	fn runs_script_by_bare_name_from_working_dir() {
		let name = format!("pathmark-bare-{}.sh", std::process::id());
		let path = Path::new(&name);
		fs::write(path, "#!/bin/sh\necho \"hi $1\"\n").unwrap();
		fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();

		let mut router = Router::<String>::new();
		router.get("/x/:id", Handler::script(&name), None).unwrap();
		let result = router.dispatch("/x/1", "GET");
		fs::remove_file(path).unwrap();

		assert_eq!(result.unwrap(), "hi 1\n");
	}

	#[test]
	fn runs_script_by_relative_path() {
		let dir = tempfile::tempdir_in(".").unwrap();
		let script = write_script(&dir, "show.sh", r#"echo "show $1""#);
		let cwd = std::env::current_dir().unwrap();
		let script = script.strip_prefix(&cwd).unwrap().to_path_buf();
		assert!(script.is_relative());

		let mut router = Router::<String>::new();
		router.get("/show/:id", Handler::script(&script), None).unwrap();

		assert_eq!(router.dispatch("/show/7", "GET").unwrap(), "show 7\n");
	}
}
