use anyhow::{bail, Context, Result};
use std::{
	borrow::Cow,
	path::Path,
	process::{Command, ExitStatus},
};

/// Runs a script handler with the captured parameters and turns its outcome into a route result.
pub type ScriptRunner<R> = fn(script: &Path, params: &[String]) -> Result<R>;

/// Everything a finished script handler produced.
#[derive(Debug, Clone)]
pub struct ScriptOutput {
	pub status: ExitStatus,
	pub stdout: Vec<u8>,
	pub stderr: Vec<u8>,
}

impl ScriptOutput {
	pub fn stdout_lossy(&self) -> String {
		String::from_utf8_lossy(&self.stdout).into_owned()
	}
}

impl From<ScriptOutput> for String {
	fn from(output: ScriptOutput) -> Self {
		match String::from_utf8(output.stdout) {
			Ok(stdout) => stdout,
			Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
		}
	}
}

/// Executes `script` as a child process, passing `params` as its arguments in order.
///
/// The script sees nothing else from the router. A non-zero exit status is an error carrying
/// the script's stderr.
pub fn run_script(script: &Path, params: &[String]) -> Result<ScriptOutput> {
	let output = Command::new(program(script).as_ref())
		.args(params)
		.output()
		.with_context(|| format!("failed to execute {}", script.display()))?;

	if !output.status.success() {
		bail!(
			"{} exited with {}: {}",
			script.display(),
			output.status,
			String::from_utf8_lossy(&output.stderr).trim()
		);
	}

	Ok(ScriptOutput {
		status: output.status,
		stdout: output.stdout,
		stderr: output.stderr,
	})
}

/// A bare file name would be looked up on `PATH`; anchor it to the working directory instead.
fn program(script: &Path) -> Cow<'_, Path> {
	if script.is_relative() && script.components().count() == 1 {
		Cow::Owned(Path::new(".").join(script))
	} else {
		Cow::Borrowed(script)
	}
}

/// The default runner: [`run_script`] followed by a conversion into the route result type.
pub fn run_into<R: From<ScriptOutput>>(script: &Path, params: &[String]) -> Result<R> {
	run_script(script, params).map(R::from)
}
