//! Logging sink for payment errors

use crate::config::FormSettings;

/// Default logger channel.
pub const DEFAULT_CHANNEL: &str = "commerce_payment";

/// Receives the unsanitized gateway messages.
pub trait PaymentLogger: Send + Sync {
	fn warning(&self, message: &str);
	fn error(&self, message: &str);
}

/// Logger forwarding to `tracing`, tagging every event with its channel.
///
/// # Examples
///
/// ```
/// use payment_method_form::logger::{PaymentLogger, TracingLogger};
///
/// let logger = TracingLogger::new("commerce_payment");
/// assert_eq!(logger.channel(), "commerce_payment");
/// logger.warning("Card declined");
/// ```
#[derive(Debug, Clone)]
pub struct TracingLogger {
	channel: String,
}

impl TracingLogger {
	pub fn new(channel: impl Into<String>) -> Self {
		Self {
			channel: channel.into(),
		}
	}

	/// Logger writing to the channel configured in `settings`.
	pub fn from_settings(settings: &FormSettings) -> Self {
		Self::new(settings.logger_channel.clone())
	}

	pub fn channel(&self) -> &str {
		&self.channel
	}
}

impl Default for TracingLogger {
	fn default() -> Self {
		Self::new(DEFAULT_CHANNEL)
	}
}

impl PaymentLogger for TracingLogger {
	fn warning(&self, message: &str) {
		tracing::warn!(channel = %self.channel, "{}", message);
	}

	fn error(&self, message: &str) {
		tracing::error!(channel = %self.channel, "{}", message);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_default_channel() {
		assert_eq!(TracingLogger::default().channel(), DEFAULT_CHANNEL);
	}

	#[rstest]
	fn test_channel_from_settings() {
		let settings = FormSettings::from_toml_str("logger_channel = \"payments\"").unwrap();
		assert_eq!(TracingLogger::from_settings(&settings).channel(), "payments");
	}
}
