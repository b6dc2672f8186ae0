//! Credit card types and expiration handling
//!
//! Stored credit cards only keep the card type, the last digits of the number
//! and the expiration date. This module validates expiration values and turns
//! them into the moment a stored card stops being usable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Earliest expiration year accepted for a stored card.
pub const MIN_EXPIRATION_YEAR: i32 = 1970;

/// Latest expiration year accepted for a stored card.
pub const MAX_EXPIRATION_YEAR: i32 = 9999;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpirationError {
	#[error("Invalid card expiration month: {0}")]
	InvalidMonth(u32),
	#[error("Invalid card expiration year: {0}")]
	InvalidYear(i32),
	#[error("Cannot parse card expiration value: {0:?}")]
	Unparsable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown card type: {0}")]
pub struct UnknownCardType(pub String);

/// Credit card brands a stored payment method can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
	Visa,
	Mastercard,
	Maestro,
	Amex,
	DinersClub,
	Discover,
	Jcb,
	UnionPay,
}

impl CardType {
	pub const ALL: [CardType; 8] = [
		CardType::Visa,
		CardType::Mastercard,
		CardType::Maestro,
		CardType::Amex,
		CardType::DinersClub,
		CardType::Discover,
		CardType::Jcb,
		CardType::UnionPay,
	];

	/// Machine name, also used for the payment method icon class.
	///
	/// # Examples
	///
	/// ```
	/// use payment_method_form::CardType;
	///
	/// assert_eq!(CardType::DinersClub.id(), "dinersclub");
	/// assert_eq!(CardType::Amex.id(), "amex");
	/// ```
	pub fn id(&self) -> &'static str {
		match self {
			CardType::Visa => "visa",
			CardType::Mastercard => "mastercard",
			CardType::Maestro => "maestro",
			CardType::Amex => "amex",
			CardType::DinersClub => "dinersclub",
			CardType::Discover => "discover",
			CardType::Jcb => "jcb",
			CardType::UnionPay => "unionpay",
		}
	}

	/// Human readable brand name.
	pub fn label(&self) -> &'static str {
		match self {
			CardType::Visa => "Visa",
			CardType::Mastercard => "Mastercard",
			CardType::Maestro => "Maestro",
			CardType::Amex => "American Express",
			CardType::DinersClub => "Diners Club",
			CardType::Discover => "Discover Card",
			CardType::Jcb => "JCB",
			CardType::UnionPay => "UnionPay",
		}
	}
}

impl fmt::Display for CardType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.id())
	}
}

impl FromStr for CardType {
	type Err = UnknownCardType;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		CardType::ALL
			.into_iter()
			.find(|card_type| card_type.id() == s)
			.ok_or_else(|| UnknownCardType(s.to_string()))
	}
}

/// Expiration month, always within 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ExpirationMonth(u32);

impl ExpirationMonth {
	pub fn new(month: u32) -> Result<Self, ExpirationError> {
		if (1..=12).contains(&month) {
			Ok(Self(month))
		} else {
			Err(ExpirationError::InvalidMonth(month))
		}
	}

	/// Parses a submitted month such as `"03"` or `"3"`.
	pub fn parse(value: &str) -> Result<Self, ExpirationError> {
		let month = value
			.trim()
			.parse::<u32>()
			.map_err(|_| ExpirationError::Unparsable(value.to_string()))?;
		Self::new(month)
	}

	pub fn value(&self) -> u32 {
		self.0
	}

	/// Zero-padded form used as select key and label.
	///
	/// # Examples
	///
	/// ```
	/// use payment_method_form::credit_card::ExpirationMonth;
	///
	/// assert_eq!(ExpirationMonth::new(3).unwrap().two_digits(), "03");
	/// assert_eq!(ExpirationMonth::new(11).unwrap().two_digits(), "11");
	/// ```
	pub fn two_digits(&self) -> String {
		format!("{:02}", self.0)
	}
}

impl TryFrom<u32> for ExpirationMonth {
	type Error = ExpirationError;

	fn try_from(value: u32) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<ExpirationMonth> for u32 {
	fn from(month: ExpirationMonth) -> Self {
		month.0
	}
}

/// Four digit expiration year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct ExpirationYear(i32);

impl ExpirationYear {
	pub fn new(year: i32) -> Result<Self, ExpirationError> {
		if (MIN_EXPIRATION_YEAR..=MAX_EXPIRATION_YEAR).contains(&year) {
			Ok(Self(year))
		} else {
			Err(ExpirationError::InvalidYear(year))
		}
	}

	pub fn parse(value: &str) -> Result<Self, ExpirationError> {
		let year = value
			.trim()
			.parse::<i32>()
			.map_err(|_| ExpirationError::Unparsable(value.to_string()))?;
		Self::new(year)
	}

	pub fn value(&self) -> i32 {
		self.0
	}

	pub fn four_digits(&self) -> String {
		format!("{:04}", self.0)
	}

	/// Last two digits of the year, zero-padded.
	///
	/// # Examples
	///
	/// ```
	/// use payment_method_form::credit_card::ExpirationYear;
	///
	/// assert_eq!(ExpirationYear::new(2029).unwrap().two_digits(), "29");
	/// assert_eq!(ExpirationYear::new(2100).unwrap().two_digits(), "00");
	/// ```
	pub fn two_digits(&self) -> String {
		format!("{:02}", self.0.rem_euclid(100))
	}
}

impl TryFrom<i32> for ExpirationYear {
	type Error = ExpirationError;

	fn try_from(value: i32) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<ExpirationYear> for i32 {
	fn from(year: ExpirationYear) -> Self {
		year.0
	}
}

/// A validated (month, year) expiration pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardExpiration {
	month: ExpirationMonth,
	year: ExpirationYear,
}

impl CardExpiration {
	pub fn new(month: u32, year: i32) -> Result<Self, ExpirationError> {
		Ok(Self {
			month: ExpirationMonth::new(month)?,
			year: ExpirationYear::new(year)?,
		})
	}

	pub fn from_parts(month: ExpirationMonth, year: ExpirationYear) -> Self {
		Self { month, year }
	}

	pub fn month(&self) -> ExpirationMonth {
		self.month
	}

	pub fn year(&self) -> ExpirationYear {
		self.year
	}

	/// The last second of the expiration month, in UTC.
	pub fn expires_at(&self) -> DateTime<Utc> {
		// Both parts are range checked, so the date always exists.
		last_moment_of_month(self.month.value(), self.year.value())
			.unwrap_or(DateTime::<Utc>::MAX_UTC)
	}

	/// Card expiry day is the last day of the expiration month.
	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		now > self.expires_at()
	}
}

impl fmt::Display for CardExpiration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.month.two_digits(), self.year.four_digits())
	}
}

/// Calculates the expiration timestamp of a card.
///
/// Cards stay valid through the whole expiration month, so the timestamp is
/// 23:59:59 UTC on the last day of that month.
///
/// # Examples
///
/// ```
/// use payment_method_form::credit_card::calculate_expiration_timestamp;
///
/// let expires = calculate_expiration_timestamp(2, 2028).unwrap();
/// assert_eq!(expires.to_rfc3339(), "2028-02-29T23:59:59+00:00");
///
/// assert!(calculate_expiration_timestamp(13, 2028).is_err());
/// ```
pub fn calculate_expiration_timestamp(month: u32, year: i32) -> Result<DateTime<Utc>, ExpirationError> {
	let expiration = CardExpiration::new(month, year)?;
	last_moment_of_month(expiration.month.value(), expiration.year.value())
		.ok_or(ExpirationError::InvalidYear(year))
}

fn last_moment_of_month(month: u32, year: i32) -> Option<DateTime<Utc>> {
	let (next_year, next_month) = if month == 12 {
		(year + 1, 1)
	} else {
		(year, month + 1)
	};
	let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
	Some(last_day.and_hms_opt(23, 59, 59)?.and_utc())
}

/// Month select options: `"01"` through `"12"`, key and label identical.
pub fn month_options() -> Vec<(String, String)> {
	(1..=12)
		.map(|month| {
			let padded = format!("{:02}", month);
			(padded.clone(), padded)
		})
		.collect()
}

/// Year select options starting at `first_year`.
///
/// Keys are four digit years, labels the two digit form.
///
/// # Examples
///
/// ```
/// use payment_method_form::credit_card::year_options;
///
/// let options = year_options(2026, 10);
/// assert_eq!(options.len(), 10);
/// assert_eq!(options[0], ("2026".to_string(), "26".to_string()));
/// assert_eq!(options[9], ("2035".to_string(), "35".to_string()));
/// ```
pub fn year_options(first_year: i32, count: u32) -> Vec<(String, String)> {
	let count = i32::try_from(count).unwrap_or(i32::MAX);
	(0..count)
		.map_while(|offset| first_year.checked_add(offset))
		.map(|year| (format!("{:04}", year), format!("{:02}", year.rem_euclid(100))))
		.collect()
}
