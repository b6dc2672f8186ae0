//! Memory logger capturing payment log records.

use payment_method_form::PaymentLogger;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
	Warning,
	Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
	pub level: LogLevel,
	pub message: String,
}

/// Logger keeping every record in memory.
///
/// Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
	records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemoryLogger {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get_records(&self) -> Vec<LogRecord> {
		self.records
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.clone()
	}

	pub fn messages(&self, level: LogLevel) -> Vec<String> {
		self.get_records()
			.into_iter()
			.filter(|record| record.level == level)
			.map(|record| record.message)
			.collect()
	}

	pub fn clear(&self) {
		self.records
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.clear();
	}

	fn push(&self, level: LogLevel, message: &str) {
		self.records
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.push(LogRecord {
				level,
				message: message.to_string(),
			});
	}
}

impl PaymentLogger for MemoryLogger {
	fn warning(&self, message: &str) {
		self.push(LogLevel::Warning, message);
	}

	fn error(&self, message: &str) {
		self.push(LogLevel::Error, message);
	}
}
