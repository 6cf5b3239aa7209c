/// Longest accepted line, counting the terminator.
pub const MAX_LINE: usize = 80;

/// Most arguments a line can split into; one more slot is the exec terminator.
pub const MAX_ARGS: usize = MAX_LINE / 2;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OperatorKind { InputRedirect, OutputRedirect, Pipe }

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Operator {
	pub kind: OperatorKind,
	pub index: usize,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RedirectType { Input, Output }

impl RedirectType {
	pub fn symbol(self) -> &'static str {
		match self {
			RedirectType::Input => "<",
			RedirectType::Output => ">",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			RedirectType::Input => "Input",
			RedirectType::Output => "Output",
		}
	}
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Redirect<'a> {
	pub target: &'a str,
	pub typ: RedirectType,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Plan<'a> {
	Single {
		argv: Vec<&'a str>,
		redirect: Option<Redirect<'a>>,
	},
	Piped {
		left: Vec<&'a str>,
		right: Vec<&'a str>,
	},
}

#[derive(Debug, PartialEq, Eq)]
pub struct Pipeline<'a> {
	pub plan: Plan<'a>,
	pub is_background: bool,
}
