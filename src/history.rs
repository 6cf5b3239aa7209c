/// Holds the most recently entered line. Recalling never changes it.
#[derive(Debug, Default)]
pub struct HistorySlot {
	line: Option<String>,
}

impl HistorySlot {
	pub fn new() -> HistorySlot {
		HistorySlot { line: None }
	}

	pub fn record(&mut self, line: &str) {
		self.line = Some(line.to_owned());
	}

	pub fn recall(&self) -> Option<&str> {
		self.line.as_ref().map(|s| s.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_at_start() {
		assert_eq!(HistorySlot::new().recall(), None);
	}

	#[test]
	fn recall_is_idempotent() {
		let mut slot = HistorySlot::new();
		slot.record("ls -l");
		assert_eq!(slot.recall(), Some("ls -l"));
		assert_eq!(slot.recall(), Some("ls -l"));
	}

	#[test]
	fn record_overwrites() {
		let mut slot = HistorySlot::new();
		slot.record("ls");
		slot.record("wc -l < x");
		assert_eq!(slot.recall(), Some("wc -l < x"));
	}
}
