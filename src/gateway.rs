//! Payment gateway capability used by the edit form

use crate::payment_method::PaymentMethod;

/// Outcome of a failed gateway call.
///
/// Messages carry the processor's own wording and are meant for logs only.
#[derive(Debug, thiserror::Error)]
pub enum PaymentGatewayError {
	/// The processor rejected the operation.
	#[error("Payment declined: {0}")]
	Declined(String),
	/// Any other failure reported by the gateway.
	#[error("Payment gateway error: {0}")]
	Gateway(String),
	/// A failure the gateway does not classify.
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl PaymentGatewayError {
	/// The original, unsanitized message.
	pub fn message(&self) -> String {
		match self {
			PaymentGatewayError::Declined(message) | PaymentGatewayError::Gateway(message) => {
				message.clone()
			}
			PaymentGatewayError::Other(error) => error.to_string(),
		}
	}
}

/// Gateways able to update a stored payment method remotely.
pub trait SupportsUpdatingStoredPaymentMethods: Send + Sync {
	/// Pushes the payment method's current state to the processor.
	///
	/// Gateways may update the entity, for example to record a new remote id.
	fn update_payment_method(
		&self,
		payment_method: &mut PaymentMethod,
	) -> Result<(), PaymentGatewayError>;
}
