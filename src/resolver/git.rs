use std::{
	io::Read,
	path::{Path, PathBuf},
	process::{Child, Command, ExitStatus, Stdio},
	thread,
	time::{Duration, Instant},
};

use buildvars_core::{Error, Result, trace};

/// Bound on a single query when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Names the revision of the current checkout.
///
/// Every failure is reported as [`Error::VersionControlUnavailable`] so the
/// caller can substitute its fallback without inspecting the cause.
pub trait RevisionSource {
	/// The full revision identifier, trimmed and non-empty.
	fn revision(&self) -> Result<String>;
}

impl<F> RevisionSource for F
where
	F: Fn() -> Result<String>,
{
	fn revision(&self) -> Result<String> { self() }
}

/// Queries a git executable in a fixed working directory.
#[derive(Clone, Debug)]
pub struct Git {
	program: String,
	workdir: PathBuf,
	timeout: Duration,
}

impl Git {
	#[must_use]
	pub fn new(workdir: impl Into<PathBuf>) -> Self {
		Self {
			program: "git".to_owned(),
			workdir: workdir.into(),
			timeout: DEFAULT_TIMEOUT,
		}
	}

	#[must_use]
	pub fn program(mut self, program: impl Into<String>) -> Self {
		self.program = program.into();
		self
	}

	#[must_use]
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	#[inline]
	#[must_use]
	pub fn workdir(&self) -> &Path { &self.workdir }

	/// Runs the executable with `args` and returns its trimmed stdout.
	///
	/// stdout is collected after the child exits, so this is only meant for
	/// commands with short output.
	pub fn run(&self, args: &[&str]) -> Result<String> {
		let command = format!("{} {}", self.program, args.join(" "));
		trace!(%command, workdir = %self.workdir.display(), "querying version control");

		let mut child = Command::new(&self.program)
			.args(args)
			.current_dir(&self.workdir)
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::null())
			.spawn()
			.map_err(|e| Error::vcs(format!("failed to spawn {command}: {e}")))?;

		let status = wait(&mut child, self.timeout)
			.map_err(|e| Error::vcs(format!("{command}: {e}")))?;

		if !status.success() {
			return Err(Error::vcs(format!("{command} exited with {status}")));
		}

		let mut stdout = Vec::new();
		if let Some(mut out) = child.stdout.take() {
			out.read_to_end(&mut stdout)
				.map_err(|e| Error::vcs(format!("reading output of {command}: {e}")))?;
		}

		let output = String::from_utf8(stdout)
			.map_err(|_| Error::vcs(format!("{command} produced non-UTF-8 output")))?;

		match output.trim() {
			| "" => Err(Error::vcs(format!("{command} produced no output"))),
			| trimmed => Ok(trimmed.to_owned()),
		}
	}

	/// Resolves a path inside the git directory, e.g. `HEAD` or
	/// `refs/heads/main`, relative to the working directory.
	#[must_use]
	pub fn git_path(&self, name: &str) -> Option<PathBuf> {
		self.run(&["rev-parse", "--git-path", name])
			.ok()
			.map(|path| self.workdir.join(path))
	}
}

impl RevisionSource for Git {
	fn revision(&self) -> Result<String> { self.run(&["rev-parse", "HEAD"]) }
}

/// A revision fixed ahead of time instead of queried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pinned(String);

impl Pinned {
	#[must_use]
	pub fn new(revision: impl Into<String>) -> Self { Self(revision.into()) }
}

impl RevisionSource for Pinned {
	fn revision(&self) -> Result<String> {
		match self.0.trim() {
			| "" => Err(Error::vcs("pinned revision is empty")),
			| trimmed => Ok(trimmed.to_owned()),
		}
	}
}

/// Waits for the child, killing it once `timeout` has elapsed.
fn wait(child: &mut Child, timeout: Duration) -> std::io::Result<ExitStatus> {
	let start = Instant::now();
	loop {
		if let Some(status) = child.try_wait()? {
			return Ok(status);
		}

		if start.elapsed() >= timeout {
			child.kill().ok();
			child.wait().ok();
			return Err(std::io::Error::new(
				std::io::ErrorKind::TimedOut,
				format!("timed out after {timeout:?}"),
			));
		}

		thread::sleep(POLL_INTERVAL);
	}
}
