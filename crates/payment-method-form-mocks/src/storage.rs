//! In-memory store and payment method storage.

use payment_method_form::{PaymentMethod, PaymentMethodStorage, StorageError, Store, StoreStorage};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Store storage returning a fixed default store.
#[derive(Debug, Default)]
pub struct InMemoryStoreStorage {
	default_store: Option<Store>,
	fail: bool,
}

impl InMemoryStoreStorage {
	pub fn new(default_store: Option<Store>) -> Self {
		Self {
			default_store,
			fail: false,
		}
	}

	/// Storage whose lookups always fail.
	pub fn failing() -> Self {
		Self {
			default_store: None,
			fail: true,
		}
	}
}

impl StoreStorage for InMemoryStoreStorage {
	fn load_default(&self) -> Result<Option<Store>, StorageError> {
		if self.fail {
			return Err(StorageError::Backend(anyhow::anyhow!(
				"Mock configured to fail"
			)));
		}
		Ok(self.default_store.clone())
	}
}

/// Payment method storage keyed by id.
///
/// Unsaved payment methods receive the next free id on save.
#[derive(Debug, Default)]
pub struct InMemoryPaymentMethodStorage {
	payment_methods: Mutex<BTreeMap<u64, PaymentMethod>>,
	fail_next: Mutex<bool>,
}

impl InMemoryPaymentMethodStorage {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set_fail_next(&self, fail: bool) {
		*self.fail_next.lock().unwrap_or_else(|e| e.into_inner()) = fail;
	}

	/// Loads a saved payment method.
	pub fn load(&self, id: u64) -> Result<PaymentMethod, StorageError> {
		self.payment_methods
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.get(&id)
			.cloned()
			.ok_or_else(|| StorageError::NotFound(format!("payment method {}", id)))
	}

	pub fn count(&self) -> usize {
		self.payment_methods
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.len()
	}
}

impl PaymentMethodStorage for InMemoryPaymentMethodStorage {
	fn save(&self, payment_method: &mut PaymentMethod) -> Result<(), StorageError> {
		let mut fail_next = self.fail_next.lock().unwrap_or_else(|e| e.into_inner());
		if *fail_next {
			*fail_next = false;
			return Err(StorageError::Backend(anyhow::anyhow!(
				"Mock configured to fail"
			)));
		}

		let mut payment_methods = self
			.payment_methods
			.lock()
			.unwrap_or_else(|e| e.into_inner());
		let id = match payment_method.id() {
			Some(id) => id,
			None => {
				let id = payment_methods.keys().next_back().map_or(1, |last| last + 1);
				payment_method.set_id(id);
				id
			}
		};
		payment_methods.insert(id, payment_method.clone());
		Ok(())
	}
}
