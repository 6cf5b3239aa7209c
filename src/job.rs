use std::convert::Infallible;
use std::io;
use std::io::Write;
use std::os::fd::{AsRawFd, OwnedFd};

use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::wait::{self, WaitPidFlag, WaitStatus};
use nix::unistd::{self, Pid};

use crate::error::{Error, Result};

pub trait WaitStatusExt {
	fn get_pid(self) -> Option<Pid>;
	fn code(self) -> i32;
}

impl WaitStatusExt for WaitStatus {
	fn get_pid(self) -> Option<Pid> {
		match self {
			WaitStatus::StillAlive => None,
			s => s.pid(),
		}
	}

	/// Shell-style exit code: signals map to 128 + signo.
	fn code(self) -> i32 {
		match self {
			WaitStatus::Exited(_, code) => code,
			WaitStatus::Signaled(_, sig, _) => 128 + sig as i32,
			_ => 0,
		}
	}
}

/// A child that has been forked and may still be waited for.
#[derive(Debug, PartialEq, Eq)]
pub struct Handle {
	pid: Pid,
}

impl Handle {
	pub fn pid(&self) -> Pid {
		self.pid
	}
}

pub enum Fork {
	Parent(Handle),
	Child,
}

pub fn fork() -> Result<Fork> {
	match unsafe { unistd::fork() } {
		Ok(unistd::ForkResult::Parent { child }) => Ok(Fork::Parent(Handle { pid: child })),
		Ok(unistd::ForkResult::Child) => Ok(Fork::Child),
		Err(e) => Err(Error::ForkFailed(e)),
	}
}

/// Reports `r` and leaves the current process. Only called in forked
/// children, so `_exit` keeps inherited stdio buffers from being flushed twice.
pub fn exit_on_error(r: Result<Infallible>) -> ! {
	let e = match r {
		Ok(never) => match never {},
		Err(e) => e,
	};
	let _ = writeln!(&mut io::stderr(), "{}", e);
	unsafe { libc::_exit(1) }
}

/// Runs `body` in a new child process. `body` only returns on failure.
pub fn spawn<F>(body: F) -> Result<Handle> where F: FnOnce() -> Result<Infallible> {
	match fork()? {
		Fork::Parent(handle) => Ok(handle),
		Fork::Child => exit_on_error(body()),
	}
}

/// Blocks until this particular child terminates.
pub fn wait(handle: Handle) -> Result<WaitStatus> {
	loop {
		match wait::waitpid(handle.pid, None) {
			Err(Errno::EINTR) => continue,
			r => { return r.map_err(Error::Wait); },
		}
	}
}

/// Collects children that have already terminated, without blocking.
/// Returns how many were reaped.
pub fn reap_finished() -> usize {
	let mut reaped = 0;
	loop {
		match wait::waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
			Ok(WaitStatus::StillAlive) | Err(_) => { break; },
			Ok(status) => {
				tracing::debug!(pid = ?status.get_pid(), code = status.code(), "reaped background child");
				reaped += 1;
			},
		}
	}
	reaped
}

/// An anonymous pipe. Both ends are close-on-exec, so only the end
/// duplicated onto a standard descriptor survives process replacement.
#[derive(Debug)]
pub struct Pipe {
	read: OwnedFd,
	write: OwnedFd,
}

impl Pipe {
	pub fn new() -> Result<Pipe> {
		let (read, write) = unistd::pipe2(OFlag::O_CLOEXEC).map_err(Error::PipeCreationFailed)?;
		Ok(Pipe { read: read, write: write })
	}

	/// Makes the write end this process's stdout and closes both ends.
	pub fn into_stdout(self) -> Result<()> {
		unistd::dup2(self.write.as_raw_fd(), libc::STDOUT_FILENO).map_err(Error::Dup)?;
		Ok(())
	}

	/// Makes the read end this process's stdin and closes both ends.
	pub fn into_stdin(self) -> Result<()> {
		unistd::dup2(self.read.as_raw_fd(), libc::STDIN_FILENO).map_err(Error::Dup)?;
		Ok(())
	}
}

/// Wires `upstream` into `downstream` through a pipe.
///
/// `upstream` runs in a new child with its stdout on the pipe. The calling
/// process waits for that child to terminate, then attaches the pipe to its
/// own stdin and becomes `downstream`. The reader therefore never sees a
/// partially written upstream, at the cost of running the two sequentially.
pub fn connect<U, D>(upstream: U, downstream: D) -> Result<Infallible>
	where U: FnOnce() -> Result<Infallible>, D: FnOnce() -> Result<Infallible> {
	let pipe = Pipe::new()?;
	match fork()? {
		Fork::Child => exit_on_error(pipe.into_stdout().and_then(|()| upstream())),
		Fork::Parent(writer) => {
			let status = wait(writer)?;
			tracing::debug!(code = status.code(), "upstream finished");
			pipe.into_stdin()?;
			downstream()
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use nix::sys::signal::Signal;
	use std::io::Read;
	use std::fs::File;

	#[test]
	fn status_codes() {
		let pid = Pid::from_raw(42);
		assert_eq!(WaitStatus::Exited(pid, 3).code(), 3);
		assert_eq!(WaitStatus::Signaled(pid, Signal::SIGKILL, false).code(), 137);
		assert_eq!(WaitStatus::Exited(pid, 0).get_pid(), Some(pid));
		assert_eq!(WaitStatus::StillAlive.get_pid(), None);
	}

	#[test]
	fn pipe_ends_are_connected() {
		let pipe = Pipe::new().unwrap();
		let Pipe { read, write } = pipe;
		let mut writer = File::from(write);
		writer.write_all(b"through the pipe").unwrap();
		drop(writer);
		let mut buf = String::new();
		File::from(read).read_to_string(&mut buf).unwrap();
		assert_eq!(buf, "through the pipe");
	}

	#[test]
	fn reap_without_children_is_noop() {
		assert_eq!(reap_finished(), 0);
	}
}
