use crate::error::{Error, Result};
use crate::types::*;

struct Tokenizer<'a> {
	line: &'a str,
	i: usize,
}

impl<'a> Tokenizer<'a> {
	fn proceed_while<F>(&mut self, f: F) where F: Fn(u8) -> bool {
		while let Some(c) = self.line.as_bytes().get(self.i) {
			if !f(*c) { break; }
			self.i += 1;
		}
	}

	fn is_whitespace(c: u8) -> bool {
		match c {
			b' ' | b'\t' | b'\r' | b'\n' => true,
			_ => false,
		}
	}

	fn skip_whitespaces(&mut self) {
		self.proceed_while(Tokenizer::is_whitespace);
	}

	fn read_word(&mut self) -> &'a str {
		let orig = self.i;
		self.proceed_while(|c| !Tokenizer::is_whitespace(c));
		&self.line[orig .. self.i]
	}
}

/// True when `line` holds nothing but the whitespace `tokenize` splits on.
pub fn is_blank(line: &str) -> bool {
	line.bytes().all(Tokenizer::is_whitespace)
}

/// Splits `line` on runs of whitespace. No quoting or escaping is recognized.
pub fn tokenize(line: &str) -> Result<Vec<&str>> {
	let mut tokenizer = Tokenizer { line: line, i: 0 };
	let mut tokens: Vec<&str> = vec![];
	loop {
		tokenizer.skip_whitespaces();
		let word = tokenizer.read_word();
		if word.is_empty() {
			break;
		}
		if tokens.len() == MAX_ARGS {
			return Err(Error::TooManyTokens);
		}
		tokens.push(word);
	}
	Ok(tokens)
}

/// Finds the first `<`, `>` or `|` after the program name. Anything past it
/// that looks like an operator is left alone as a plain argument.
pub fn scan_operator(tokens: &[&str]) -> Option<Operator> {
	tokens.iter().enumerate().skip(1).find_map(|(index, &token)| {
		let kind = match token {
			"<" => OperatorKind::InputRedirect,
			">" => OperatorKind::OutputRedirect,
			"|" => OperatorKind::Pipe,
			_ => { return None; },
		};
		Some(Operator { kind: kind, index: index })
	})
}

pub fn build_plan<'a>(tokens: &[&'a str], operator: Option<Operator>) -> Result<Plan<'a>> {
	let Operator { kind, index: i } = match operator {
		Some(op) => op,
		None => { return Ok(Plan::Single { argv: tokens.to_vec(), redirect: None }); },
	};
	let typ = match kind {
		OperatorKind::InputRedirect => RedirectType::Input,
		OperatorKind::OutputRedirect => RedirectType::Output,
		// an empty right side is left for exec to reject
		OperatorKind::Pipe => {
			return Ok(Plan::Piped { left: tokens[.. i].to_vec(), right: tokens[i+1 ..].to_vec() });
		},
	};
	let target = match tokens.get(i+1) {
		Some(&target) => target,
		None => { return Err(Error::MissingRedirectTarget(typ)); },
	};
	Ok(Plan::Single {
		argv: tokens[.. i].to_vec(),
		redirect: Some(Redirect { target: target, typ: typ }),
	})
}

/// Strips a trailing `&`, which may be glued to the last word.
pub fn split_background(line: &str) -> (&str, bool) {
	match line.strip_suffix('&') {
		Some(rest) => (rest, true),
		None => (line, false),
	}
}

/// Parses one line. `Ok(None)` means there is nothing to run.
pub fn parse(line: &str) -> Result<Option<Pipeline>> {
	let (line, is_background) = split_background(line);
	let tokens = tokenize(line)?;
	if tokens.is_empty() {
		return Ok(None);
	}
	let plan = build_plan(&tokens, scan_operator(&tokens))?;
	Ok(Some(Pipeline { plan: plan, is_background: is_background }))
}
