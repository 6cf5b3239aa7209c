mod builtin;
mod error;
mod eval;
mod global;
mod history;
mod job;
mod parser;
mod types;

use std::io;
use std::process;
use io::{BufRead, Write};

use clap::Parser;

use builtin::Builtin;
use error::{Error, Result};
use types::MAX_LINE;

/// osh - a small interactive command interpreter
#[derive(Parser, Debug)]
#[command(name = "osh", version, about)]
struct Args {
	/// Prompt printed before each line is read
	#[arg(long, default_value = global::DEFAULT_PROMPT)]
	prompt: String,

	/// Do not print the greeting
	#[arg(short, long)]
	quiet: bool,

	/// Interpret one line and exit
	#[arg(short = 'c')]
	command: Option<String>,

	/// Log filter used when RUST_LOG is not set
	#[arg(long, default_value = "warn")]
	log_level: String,
}

#[derive(Debug, PartialEq, Eq)]
enum Control { Continue, Exit }

/// One interpretation cycle: builtins and history, then parse and run.
fn run_line<W: Write>(state: &mut global::State, raw: &str, out: &mut W) -> Result<Control> {
	let line = raw.strip_suffix('\n').unwrap_or(raw);
	let line = line.strip_suffix('\r').unwrap_or(line);
	if parser::is_blank(line) {
		return Ok(Control::Continue);
	}
	if line.chars().count() >= MAX_LINE {
		return Err(Error::LineTooLong);
	}

	let line = match builtin::match_builtin(line) {
		Some(Builtin::Exit) => { return Ok(Control::Exit); },
		Some(Builtin::Recall) => {
			let previous = state.history.recall().ok_or(Error::NoHistory)?.to_owned();
			writeln!(out, "Previous command: {}", previous)?;
			previous
		},
		None => {
			state.history.record(line);
			line.to_owned()
		},
	};
	tracing::debug!(line = %line, "accepted");

	if let Some(pipeline) = parser::parse(&line)? {
		// children must not inherit unwritten output
		out.flush()?;
		eval::eval(&pipeline)?;
	}
	Ok(Control::Continue)
}

fn run<R: BufRead, W: Write>(state: &mut global::State, mut input: R, mut out: W) -> io::Result<()> {
	loop {
		job::reap_finished();
		out.write_all(state.prompt.as_bytes())?;
		out.flush()?;

		let mut buf: Vec<u8> = vec![];
		if input.read_until(b'\n', &mut buf)? == 0 {
			writeln!(out)?;
			return Ok(());
		}
		let line = String::from_utf8_lossy(&buf);
		match run_line(state, &line, &mut out) {
			Ok(Control::Exit) => { return Ok(()); },
			Ok(Control::Continue) => {},
			Err(e) => {
				tracing::debug!(error = %e, "command abandoned");
				let _ = writeln!(&mut io::stderr(), "{}", e);
			},
		}
	}
}

fn main() {
	let args = Args::parse();

	tracing_subscriber::fmt()
		.with_writer(io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
		)
		.init();

	let mut state = global::State::new(&args.prompt);

	if let Some(line) = args.command {
		if let Err(e) = run_line(&mut state, &line, &mut io::stdout()) {
			eprintln!("{}", e);
			process::exit(1);
		}
		return;
	}

	if !args.quiet {
		println!("osh: begin typing commands, or type \"exit\" to quit.");
	}
	let stdin = io::stdin();
	if let Err(e) = run(&mut state, stdin.lock(), io::stdout()) {
		eprintln!("osh: {}", e);
		process::exit(1);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::RedirectType;

	fn cycle(state: &mut global::State, line: &str) -> (Result<Control>, String) {
		let mut out: Vec<u8> = vec![];
		let r = run_line(state, line, &mut out);
		(r, String::from_utf8(out).unwrap())
	}

	#[test]
	fn blank_lines_touch_nothing() {
		let mut state = global::State::new(global::DEFAULT_PROMPT);
		for line in &["\n", "   \n", "\t \r\n", ""] {
			let (r, out) = cycle(&mut state, line);
			assert_eq!(r.unwrap(), Control::Continue);
			assert_eq!(out, "");
		}
		assert_eq!(state.history.recall(), None);
	}

	#[test]
	fn exit_terminates_without_recording() {
		let mut state = global::State::new(global::DEFAULT_PROMPT);
		let (r, _) = cycle(&mut state, "exit\n");
		assert_eq!(r.unwrap(), Control::Exit);
		assert_eq!(state.history.recall(), None);
	}

	#[test]
	fn recall_with_empty_history() {
		let mut state = global::State::new(global::DEFAULT_PROMPT);
		let (r, out) = cycle(&mut state, "!!\n");
		match r {
			Err(Error::NoHistory) => {},
			r => panic!("unexpected {:?}", r),
		}
		assert_eq!(out, "");
		assert_eq!(state.history.recall(), None);
	}

	#[test]
	fn recall_echoes_and_keeps_slot() {
		let mut state = global::State::new(global::DEFAULT_PROMPT);
		// a lone '&' parses to nothing, so no process is started
		assert_eq!(cycle(&mut state, "&\n").0.unwrap(), Control::Continue);
		for _ in 0 .. 2 {
			let (r, out) = cycle(&mut state, "!!\n");
			assert_eq!(r.unwrap(), Control::Continue);
			assert_eq!(out, "Previous command: &\n");
			assert_eq!(state.history.recall(), Some("&"));
		}
	}

	#[test]
	fn invalid_lines_are_still_recorded() {
		let mut state = global::State::new(global::DEFAULT_PROMPT);
		match cycle(&mut state, "ls >\n").0 {
			Err(Error::MissingRedirectTarget(RedirectType::Output)) => {},
			r => panic!("unexpected {:?}", r),
		}
		assert_eq!(state.history.recall(), Some("ls >"));
	}

	#[test]
	fn overlong_line_is_rejected() {
		let mut state = global::State::new(global::DEFAULT_PROMPT);
		let line = "a".repeat(MAX_LINE);
		match cycle(&mut state, &line).0 {
			Err(Error::LineTooLong) => {},
			r => panic!("unexpected {:?}", r),
		}
		assert_eq!(state.history.recall(), None);
	}

	#[test]
	fn loop_stops_at_exit() {
		let mut state = global::State::new("$ ");
		let input = io::Cursor::new(&b"   \nexit\nls\n"[..]);
		let mut out: Vec<u8> = vec![];
		run(&mut state, input, &mut out).unwrap();
		assert_eq!(out, b"$ $ ");
	}

	#[test]
	fn loop_stops_at_eof() {
		let mut state = global::State::new(global::DEFAULT_PROMPT);
		let mut out: Vec<u8> = vec![];
		run(&mut state, io::Cursor::new(&b""[..]), &mut out).unwrap();
		assert_eq!(out, b"osh> \n");
	}
}
