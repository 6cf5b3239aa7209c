//! Error types for osh

use std::{ffi, io};

use thiserror::Error;

use crate::types::{RedirectType, MAX_ARGS, MAX_LINE};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
	#[error("Line too long: at most {} characters", MAX_LINE - 1)]
	LineTooLong,

	#[error("Too many arguments: at most {}", MAX_ARGS)]
	TooManyTokens,

	#[error("Missing file name after '{}'", .0.symbol())]
	MissingRedirectTarget(RedirectType),

	#[error("No command in history.")]
	NoHistory,

	#[error("{} file failed: {}: {}", .typ.label(), .path, .source)]
	OpenFailed {
		typ: RedirectType,
		path: String,
		#[source]
		source: io::Error,
	},

	#[error("Pipe failed: {0}")]
	PipeCreationFailed(#[source] nix::Error),

	#[error("Fork failed: {0}")]
	ForkFailed(#[source] nix::Error),

	#[error("Exec failed: {0}")]
	ExecFailed(#[source] nix::Error),

	#[error("Dup failed: {0}")]
	Dup(#[source] nix::Error),

	#[error("Signal reset failed: {0}")]
	Signal(#[source] nix::Error),

	#[error("Wait failed: {0}")]
	Wait(#[source] nix::Error),

	#[error("Nul char error: {0}")]
	Nul(#[from] ffi::NulError),

	#[error("IO error: {0}")]
	Io(#[from] io::Error),
}
