//! Billing profiles, stores and the profile selection widget
//!
//! The billing information section of the edit form is a profile selection
//! widget. Its defaults come from the payment method's current profile and from
//! the default store, which decides the default country and the countries a
//! customer may bill to.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

// ISO 3166-1 alpha-2 shape: two uppercase ASCII letters.
static COUNTRY_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[A-Z]{2}$").expect("COUNTRY_CODE_REGEX: invalid regex pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid country code: {0:?}")]
pub struct CountryCodeError(pub String);

/// Two letter country code, e.g. `US`.
///
/// # Examples
///
/// ```
/// use payment_method_form::CountryCode;
///
/// let code: CountryCode = "fr".parse().unwrap();
/// assert_eq!(code.as_str(), "FR");
/// assert!("FRA".parse::<CountryCode>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
	pub fn new(code: impl Into<String>) -> Result<Self, CountryCodeError> {
		let code = code.into();
		let normalized = code.trim().to_ascii_uppercase();
		if COUNTRY_CODE_REGEX.is_match(&normalized) {
			Ok(Self(normalized))
		} else {
			Err(CountryCodeError(code))
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::str::FromStr for CountryCode {
	type Err = CountryCodeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl TryFrom<String> for CountryCode {
	type Error = CountryCodeError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<CountryCode> for String {
	fn from(code: CountryCode) -> Self {
		code.0
	}
}

impl fmt::Display for CountryCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
	pub country_code: CountryCode,
	#[serde(default)]
	pub given_name: String,
	#[serde(default)]
	pub family_name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub organization: Option<String>,
	#[serde(default)]
	pub address_line1: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address_line2: Option<String>,
	#[serde(default)]
	pub locality: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub administrative_area: Option<String>,
	#[serde(default)]
	pub postal_code: String,
}

impl Address {
	/// Creates an address with only the country filled in.
	pub fn new(country_code: CountryCode) -> Self {
		Self {
			country_code,
			given_name: String::new(),
			family_name: String::new(),
			organization: None,
			address_line1: String::new(),
			address_line2: None,
			locality: String::new(),
			administrative_area: None,
			postal_code: String::new(),
		}
	}
}

/// Address record a payment method bills to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingProfile {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<u64>,
	pub address: Address,
}

impl BillingProfile {
	pub fn new(address: Address) -> Self {
		Self { id: None, address }
	}

	pub fn with_id(mut self, id: u64) -> Self {
		self.id = Some(id);
		self
	}
}

/// Read-only store context.
///
/// An empty `billing_countries` set means every country is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
	pub id: u64,
	pub name: String,
	pub address: Address,
	#[serde(default)]
	pub billing_countries: BTreeSet<CountryCode>,
}

impl Store {
	pub fn default_country(&self) -> &CountryCode {
		&self.address.country_code
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileSelectError {
	#[error("Billing information is malformed: {0}")]
	Malformed(#[from] serde_json::Error),
	#[error("Country {0} is not available for billing")]
	CountryNotAvailable(CountryCode),
}

/// Profile selection widget of the billing information section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSelect {
	pub default_value: Option<BillingProfile>,
	pub default_country: Option<CountryCode>,
	pub available_countries: BTreeSet<CountryCode>,
}

impl ProfileSelect {
	/// Builds the widget for a payment method's current profile.
	///
	/// Without a default store the widget has no default country and no
	/// country restriction.
	///
	/// # Examples
	///
	/// ```
	/// use payment_method_form::ProfileSelect;
	///
	/// let widget = ProfileSelect::for_store(None, None);
	/// assert!(widget.default_country.is_none());
	/// assert!(widget.available_countries.is_empty());
	/// ```
	pub fn for_store(profile: Option<&BillingProfile>, store: Option<&Store>) -> Self {
		Self {
			default_value: profile.cloned(),
			default_country: store.map(|store| store.default_country().clone()),
			available_countries: store
				.map(|store| store.billing_countries.clone())
				.unwrap_or_default(),
		}
	}

	pub fn allows(&self, country: &CountryCode) -> bool {
		self.available_countries.is_empty() || self.available_countries.contains(country)
	}

	/// Resolves the submitted billing information into a profile.
	///
	/// The submitted address always edits the current profile. A submitted
	/// profile id is ignored; the id comes from the default profile only.
	pub fn resolve(&self, values: &serde_json::Value) -> Result<BillingProfile, ProfileSelectError> {
		let mut profile: BillingProfile = serde_json::from_value(values.clone())?;
		profile.id = self.default_value.as_ref().and_then(|default| default.id);
		if !self.allows(&profile.address.country_code) {
			return Err(ProfileSelectError::CountryNotAvailable(
				profile.address.country_code,
			));
		}
		Ok(profile)
	}
}
