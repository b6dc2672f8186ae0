//! Stored payment method entity

use crate::billing::BillingProfile;
use crate::credit_card::{CardExpiration, CardType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment method bundle (type) identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethodBundle {
	#[serde(rename = "credit_card")]
	CreditCard,
	#[serde(rename = "paypal")]
	PayPal,
}

impl PaymentMethodBundle {
	/// Entity id, `None` until the payment method is saved.
	pub fn id(&self) -> &'static str {
		match self {
			PaymentMethodBundle::CreditCard => "credit_card",
			PaymentMethodBundle::PayPal => "paypal",
		}
	}
}

impl fmt::Display for PaymentMethodBundle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.id())
	}
}

/// Stored credit card data.
///
/// Only the last digits of the number are ever kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
	pub card_type: CardType,
	pub card_number: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expiration: Option<CardExpiration>,
}

impl CreditCard {
	pub fn new(card_type: CardType, card_number: impl Into<String>) -> Self {
		Self {
			card_type,
			card_number: card_number.into(),
			expiration: None,
		}
	}

	pub fn with_expiration(mut self, expiration: CardExpiration) -> Self {
		self.expiration = Some(expiration);
		self
	}

	pub fn set_expiration(&mut self, expiration: CardExpiration) {
		self.expiration = Some(expiration);
	}

	/// # Examples
	///
	/// ```
	/// use payment_method_form::{CardType, CreditCard};
	///
	/// let card = CreditCard::new(CardType::Visa, "1111");
	/// assert_eq!(card.label(), "Visa ending in 1111");
	/// ```
	pub fn label(&self) -> String {
		format!("{} ending in {}", self.card_type.label(), self.card_number)
	}
}

/// Stored PayPal account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPal {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub paypal_mail: Option<String>,
}

impl PayPal {
	pub fn label(&self) -> String {
		self.paypal_mail
			.clone()
			.unwrap_or_else(|| "PayPal".to_string())
	}
}

/// Bundle specific fields of a payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PaymentMethodDetails {
	#[serde(rename = "credit_card")]
	CreditCard(CreditCard),
	#[serde(rename = "paypal")]
	PayPal(PayPal),
}

impl PaymentMethodDetails {
	pub fn bundle(&self) -> PaymentMethodBundle {
		match self {
			PaymentMethodDetails::CreditCard(_) => PaymentMethodBundle::CreditCard,
			PaymentMethodDetails::PayPal(_) => PaymentMethodBundle::PayPal,
		}
	}
}

/// A customer's stored, reusable payment instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
	id: Option<u64>,
	payment_gateway: String,
	remote_id: Option<String>,
	details: PaymentMethodDetails,
	billing_profile: Option<BillingProfile>,
	expires: Option<DateTime<Utc>>,
	reusable: bool,
	is_default: bool,
}

impl PaymentMethod {
	/// Creates an unsaved payment method for the given gateway.
	///
	/// # Examples
	///
	/// ```
	/// use payment_method_form::{CardType, CreditCard, PaymentMethod, PaymentMethodBundle, PaymentMethodDetails};
	///
	/// let method = PaymentMethod::new(
	///     "braintree",
	///     PaymentMethodDetails::CreditCard(CreditCard::new(CardType::Mastercard, "4444")),
	/// );
	/// assert_eq!(method.bundle(), PaymentMethodBundle::CreditCard);
	/// assert!(method.id().is_none());
	/// assert!(method.is_reusable());
	/// ```
	pub fn new(payment_gateway: impl Into<String>, details: PaymentMethodDetails) -> Self {
		Self {
			id: None,
			payment_gateway: payment_gateway.into(),
			remote_id: None,
			details,
			billing_profile: None,
			expires: None,
			reusable: true,
			is_default: false,
		}
	}

	/// Sets the entity id.
	pub fn with_id(mut self, id: u64) -> Self {
		self.id = Some(id);
		self
	}

	/// Sets the id of the payment method at the gateway.
	pub fn with_remote_id(mut self, remote_id: impl Into<String>) -> Self {
		self.remote_id = Some(remote_id.into());
		self
	}

	/// Sets the billing profile.
	pub fn with_billing_profile(mut self, profile: BillingProfile) -> Self {
		self.billing_profile = Some(profile);
		self
	}

	/// Sets the expiration timestamp.
	pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
		self.expires = Some(expires);
		self
	}

	pub fn id(&self) -> Option<u64> {
		self.id
	}

	/// Sets the entity id, usually on first save.
	pub fn set_id(&mut self, id: u64) {
		self.id = Some(id);
	}

	/// Id of the payment gateway owning the payment method.
	pub fn payment_gateway(&self) -> &str {
		&self.payment_gateway
	}

	/// Id of the payment method at the gateway.
	pub fn remote_id(&self) -> Option<&str> {
		self.remote_id.as_deref()
	}

	/// Sets the id of the payment method at the gateway.
	pub fn set_remote_id(&mut self, remote_id: impl Into<String>) {
		self.remote_id = Some(remote_id.into());
	}

	/// Bundle of the payment method.
	pub fn bundle(&self) -> PaymentMethodBundle {
		self.details.bundle()
	}

	/// Bundle specific fields.
	pub fn details(&self) -> &PaymentMethodDetails {
		&self.details
	}

	/// Mutable access to the bundle specific fields.
	pub fn details_mut(&mut self) -> &mut PaymentMethodDetails {
		&mut self.details
	}

	/// Credit card fields, if this is a credit card.
	pub fn credit_card(&self) -> Option<&CreditCard> {
		match &self.details {
			PaymentMethodDetails::CreditCard(card) => Some(card),
			PaymentMethodDetails::PayPal(_) => None,
		}
	}

	/// Current billing profile.
	pub fn billing_profile(&self) -> Option<&BillingProfile> {
		self.billing_profile.as_ref()
	}

	/// Replaces the billing profile.
	pub fn set_billing_profile(&mut self, profile: BillingProfile) {
		self.billing_profile = Some(profile);
	}

	/// Time after which the payment method can no longer be charged.
	pub fn expires_time(&self) -> Option<DateTime<Utc>> {
		self.expires
	}

	/// Sets or clears the expiration timestamp.
	pub fn set_expires_time(&mut self, expires: Option<DateTime<Utc>>) {
		self.expires = expires;
	}

	/// Whether the payment method expired before `now`. Never true without a timestamp.
	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		self.expires.is_some_and(|expires| now > expires)
	}

	/// Whether the payment method can be charged more than once.
	pub fn is_reusable(&self) -> bool {
		self.reusable
	}

	/// Whether this is the customer's default payment method.
	pub fn is_default(&self) -> bool {
		self.is_default
	}

	/// Display label, e.g. "Visa ending in 1234".
	pub fn label(&self) -> String {
		match &self.details {
			PaymentMethodDetails::CreditCard(card) => card.label(),
			PaymentMethodDetails::PayPal(paypal) => paypal.label(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_paypal_label_falls_back_to_brand() {
		let method = PaymentMethod::new("paypal_ec", PaymentMethodDetails::PayPal(PayPal::default()));
		assert_eq!(method.label(), "PayPal");
		assert_eq!(method.bundle(), PaymentMethodBundle::PayPal);
		assert!(method.credit_card().is_none());

		let method = PaymentMethod::new(
			"paypal_ec",
			PaymentMethodDetails::PayPal(PayPal {
				paypal_mail: Some("buyer@example.com".to_string()),
			}),
		);
		assert_eq!(method.label(), "buyer@example.com");
	}

	#[rstest]
	fn test_is_expired_at() {
		let expires = Utc.with_ymd_and_hms(2027, 3, 31, 23, 59, 59).unwrap();
		let method = PaymentMethod::new(
			"example",
			PaymentMethodDetails::CreditCard(CreditCard::new(CardType::Visa, "1111")),
		)
		.with_expires(expires);

		assert!(!method.is_expired_at(expires));
		assert!(method.is_expired_at(expires + chrono::Duration::seconds(1)));
	}

	#[rstest]
	fn test_never_expires_without_timestamp() {
		let method = PaymentMethod::new("paypal_ec", PaymentMethodDetails::PayPal(PayPal::default()));
		assert!(!method.is_expired_at(Utc::now()));
	}

	#[rstest]
	fn test_deserialize_stored_record() {
		let method: PaymentMethod = serde_json::from_value(json!({
			"id": 3,
			"payment_gateway": "paypal_ec",
			"remote_id": "B-7XY",
			"details": {"type": "paypal", "paypal_mail": "buyer@example.com"},
			"billing_profile": null,
			"expires": null,
			"reusable": false,
			"is_default": true
		}))
		.unwrap();

		assert_eq!(method.id(), Some(3));
		assert_eq!(method.payment_gateway(), "paypal_ec");
		assert_eq!(method.remote_id(), Some("B-7XY"));
		assert!(!method.is_reusable());
		assert!(method.is_default());
	}

	#[rstest]
	fn test_details_serialize_with_bundle_tag() {
		let details = PaymentMethodDetails::CreditCard(
			CreditCard::new(CardType::Amex, "0005")
				.with_expiration(CardExpiration::new(3, 2028).unwrap()),
		);

		let value = serde_json::to_value(&details).unwrap();

		assert_eq!(
			value,
			json!({
				"type": "credit_card",
				"card_type": "amex",
				"card_number": "0005",
				"expiration": {"month": 3, "year": 2028}
			})
		);
		let back: PaymentMethodDetails = serde_json::from_value(value).unwrap();
		assert_eq!(back.bundle(), PaymentMethodBundle::CreditCard);
	}
}
