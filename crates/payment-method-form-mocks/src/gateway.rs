//! Mock gateway for testing the stored payment method update flow.

use payment_method_form::{PaymentGatewayError, PaymentMethod, SupportsUpdatingStoredPaymentMethods};
use std::sync::Mutex;

/// Failure the mock reports on its next update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayFailure {
	Decline(String),
	Gateway(String),
	/// Unclassified failure, reported as [`PaymentGatewayError::Other`].
	Other(String),
}

impl GatewayFailure {
	fn into_error(self) -> PaymentGatewayError {
		match self {
			GatewayFailure::Decline(message) => PaymentGatewayError::Declined(message),
			GatewayFailure::Gateway(message) => PaymentGatewayError::Gateway(message),
			GatewayFailure::Other(message) => PaymentGatewayError::Other(anyhow::anyhow!(message)),
		}
	}
}

/// Mock gateway recording every payment method it was asked to update.
///
/// Successful updates assign a remote id to payment methods that lack one.
#[derive(Debug, Default)]
pub struct MockGateway {
	updates: Mutex<Vec<PaymentMethod>>,
	fail_next: Mutex<Option<GatewayFailure>>,
}

impl MockGateway {
	pub fn new() -> Self {
		Self::default()
	}

	/// Configures the next update to fail. The failure is consumed by that update.
	pub fn set_fail_next(&self, failure: GatewayFailure) {
		*self.fail_next.lock().unwrap_or_else(|e| e.into_inner()) = Some(failure);
	}

	/// Payment methods as they were received, in call order.
	pub fn updates(&self) -> Vec<PaymentMethod> {
		self.updates
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.clone()
	}

	pub fn update_count(&self) -> usize {
		self.updates.lock().unwrap_or_else(|e| e.into_inner()).len()
	}
}

impl SupportsUpdatingStoredPaymentMethods for MockGateway {
	fn update_payment_method(
		&self,
		payment_method: &mut PaymentMethod,
	) -> Result<(), PaymentGatewayError> {
		let mut updates = self.updates.lock().unwrap_or_else(|e| e.into_inner());
		updates.push(payment_method.clone());

		if let Some(failure) = self
			.fail_next
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.take()
		{
			return Err(failure.into_error());
		}

		if payment_method.remote_id().is_none() {
			payment_method.set_remote_id(format!("pm_mock_{}", updates.len()));
		}
		Ok(())
	}
}
