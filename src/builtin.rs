#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Builtin { Exit, Recall }

/// Builtins only match the whole line, exactly.
pub fn match_builtin(line: &str) -> Option<Builtin> {
	match line {
		"exit" => Some(Builtin::Exit),
		"!!" => Some(Builtin::Recall),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn exact_match_only() {
		assert_eq!(match_builtin("exit"), Some(Builtin::Exit));
		assert_eq!(match_builtin("!!"), Some(Builtin::Recall));
		assert_eq!(match_builtin("exit 1"), None);
		assert_eq!(match_builtin("!! &"), None);
		assert_eq!(match_builtin("ls"), None);
	}
}
