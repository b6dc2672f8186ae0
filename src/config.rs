//! Form settings
//!
//! Settings are optional; every key falls back to its default.
//!
//! ```toml
//! logger_channel = "commerce_payment"
//! expiration_years = 10
//! billing_information_weight = 50
//! form_library = "commerce_payment/payment_method_form"
//! icons_library = "commerce_payment/payment_method_icons"
//! ```

use crate::logger::DEFAULT_CHANNEL;
use serde::Deserialize;

/// Largest number of years the expiration year selector may offer.
pub const MAX_EXPIRATION_YEARS: u32 = 100;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("Invalid setting {key}: {message}")]
	Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormSettings {
	/// Channel the gateway failures are logged to.
	pub logger_channel: String,
	/// Number of years offered by the expiration year selector.
	pub expiration_years: u32,
	/// Weight of the billing information section.
	pub billing_information_weight: i32,
	/// Front-end library attached to the whole form.
	pub form_library: String,
	/// Front-end library rendering the card brand icons.
	pub icons_library: String,
}

impl Default for FormSettings {
	fn default() -> Self {
		Self {
			logger_channel: DEFAULT_CHANNEL.to_string(),
			expiration_years: 10,
			billing_information_weight: 50,
			form_library: "commerce_payment/payment_method_form".to_string(),
			icons_library: "commerce_payment/payment_method_icons".to_string(),
		}
	}
}

impl FormSettings {
	/// Parses settings from TOML.
	///
	/// # Examples
	///
	/// ```
	/// use payment_method_form::FormSettings;
	///
	/// let settings = FormSettings::from_toml_str("expiration_years = 15").unwrap();
	/// assert_eq!(settings.expiration_years, 15);
	/// assert_eq!(settings.billing_information_weight, 50);
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: FormSettings = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.expiration_years == 0 {
			return Err(SettingsError::Invalid {
				key: "expiration_years",
				message: "at least one year must be offered".to_string(),
			});
		}
		if self.expiration_years > MAX_EXPIRATION_YEARS {
			return Err(SettingsError::Invalid {
				key: "expiration_years",
				message: format!("at most {} years can be offered", MAX_EXPIRATION_YEARS),
			});
		}
		if self.logger_channel.trim().is_empty() {
			return Err(SettingsError::Invalid {
				key: "logger_channel",
				message: "must not be empty".to_string(),
			});
		}
		Ok(())
	}
}
