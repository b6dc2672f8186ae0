//! Errors surfaced by the edit form

use crate::billing::ProfileSelectError;
use crate::credit_card::ExpirationError;
use crate::storage::StorageError;
use std::collections::BTreeMap;

/// Customer facing message for a declined update.
pub const DECLINE_MESSAGE: &str =
	"We encountered an error processing your payment method. Please verify your details and try again.";

/// Customer facing message for any other gateway failure.
pub const GATEWAY_ERROR_MESSAGE: &str =
	"We encountered an unexpected error processing your payment method. Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum FormError {
	/// The processor declined the update. Carries the translated generic message.
	#[error("{0}")]
	Declined(String),
	/// The gateway failed. Carries the translated generic message.
	#[error("{0}")]
	Gateway(String),
	#[error("Invalid card expiration: {0}")]
	Expiration(#[from] ExpirationError),
	#[error("Invalid billing information: {0}")]
	BillingInformation(#[from] ProfileSelectError),
	#[error("Missing submitted value: {0}")]
	MissingValue(String),
	#[error("Form element not found: {0}")]
	MissingElement(String),
	#[error("Template rendering failed: {0}")]
	Template(#[from] tera::Error),
	#[error("Form validation failed")]
	Invalid(BTreeMap<String, Vec<String>>),
	#[error(transparent)]
	Storage(#[from] StorageError),
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl FormError {
	/// Whether the error carries a message safe to show to customers.
	pub fn is_customer_facing(&self) -> bool {
		matches!(self, FormError::Declined(_) | FormError::Gateway(_))
	}
}

pub type FormResult<T> = Result<T, FormError>;
