use std::convert::Infallible;
use std::ffi::{CStr, CString};
use std::fs;
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;

use nix::sys::signal::{self, SigHandler, Signal};
use nix::unistd;

use crate::error::{Error, Result};
use crate::job;
use crate::job::WaitStatusExt;
use crate::types::*;

/// Replaces the current process image with `argv`. Returns only on failure.
///
/// SIGPIPE is ignored in this process and an ignored signal survives exec,
/// so it is put back to the default first.
///
/// An empty `argv` (a pipe with nothing on its right) is still handed to
/// exec, which rejects the empty program name with the OS error.
pub fn exec(argv: &[&str]) -> Result<Infallible> {
	let argv: Vec<CString> = argv.iter().map(|&s| CString::new(s)).collect::<std::result::Result<_, _>>()?;
	let program: &CStr = argv.first().map(|s| s.as_c_str()).unwrap_or_default();
	unsafe { signal::signal(Signal::SIGPIPE, SigHandler::SigDfl) }.map_err(Error::Signal)?;
	unistd::execvp(program, &argv).map_err(Error::ExecFailed)
}

/// Opens the redirect target and puts it on stdin or stdout. The opened
/// descriptor is closed before returning, on success and failure alike.
fn redirect_stdio(redirect: &Redirect) -> Result<()> {
	let mut oopt = fs::OpenOptions::new();
	let from = match redirect.typ {
		RedirectType::Input => {
			oopt.read(true);
			libc::STDIN_FILENO
		},
		RedirectType::Output => {
			oopt.write(true).create(true).truncate(true).mode(0o666);
			libc::STDOUT_FILENO
		},
	};
	let file = oopt.open(redirect.target).map_err(|e| Error::OpenFailed {
		typ: redirect.typ,
		path: redirect.target.to_owned(),
		source: e,
	})?;
	unistd::dup2(file.as_raw_fd(), from).map_err(Error::Dup)?;
	Ok(())
}

fn exec_plan(plan: &Plan) -> Result<Infallible> {
	match *plan {
		Plan::Single { ref argv, redirect } => {
			if let Some(ref redirect) = redirect {
				redirect_stdio(redirect)?;
			}
			exec(argv)
		},
		Plan::Piped { ref left, ref right } => job::connect(|| exec(left), || exec(right)),
	}
}

/// Runs `pipeline` in a child process. Blocks until it terminates unless it
/// is a background pipeline; its exit status is not used either way.
pub fn eval(pipeline: &Pipeline) -> Result<()> {
	let handle = job::spawn(|| exec_plan(&pipeline.plan))?;
	tracing::debug!(pid = %handle.pid(), background = pipeline.is_background, "spawned");
	if pipeline.is_background {
		return Ok(());
	}
	let status = job::wait(handle)?;
	tracing::debug!(code = status.code(), "foreground job finished");
	Ok(())
}
