//! Translation of user facing strings

use std::collections::HashMap;

/// Translates source strings into the active language.
pub trait Translator: Send + Sync {
	/// Returns the translation of `message`, or `message` itself when none exists.
	fn gettext(&self, message: &str) -> String;
}

/// Translator returning every message untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTranslator;

impl Translator for NullTranslator {
	fn gettext(&self, message: &str) -> String {
		message.to_string()
	}
}

/// A message catalog containing translations for a specific locale
///
/// # Example
/// ```
/// use payment_method_form::i18n::{MessageCatalog, Translator};
///
/// let mut catalog = MessageCatalog::new("fr");
/// catalog.add_translation("Month", "Mois");
///
/// assert_eq!(catalog.gettext("Month"), "Mois");
/// assert_eq!(catalog.gettext("Year"), "Year");
/// ```
#[derive(Debug, Clone)]
pub struct MessageCatalog {
	locale: String,
	messages: HashMap<String, String>,
}

impl MessageCatalog {
	pub fn new(locale: &str) -> Self {
		Self {
			locale: locale.to_string(),
			messages: HashMap::new(),
		}
	}

	pub fn locale(&self) -> &str {
		&self.locale
	}

	pub fn add_translation(&mut self, message: impl Into<String>, translation: impl Into<String>) {
		self.messages.insert(message.into(), translation.into());
	}

	pub fn get(&self, message: &str) -> Option<&String> {
		self.messages.get(message)
	}

	pub fn len(&self) -> usize {
		self.messages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.messages.is_empty()
	}
}

impl Translator for MessageCatalog {
	fn gettext(&self, message: &str) -> String {
		self.get(message)
			.cloned()
			.unwrap_or_else(|| message.to_string())
	}
}
