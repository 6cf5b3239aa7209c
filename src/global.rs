use crate::history;

pub const DEFAULT_PROMPT: &str = "osh> ";

/// Everything the interpreter loop carries from one line to the next.
pub struct State {
	pub history: history::HistorySlot,
	pub prompt: String,
}

impl State {
	pub fn new(prompt: &str) -> State {
		let history = history::HistorySlot::new();
		State { history: history, prompt: prompt.to_owned() }
	}
}
