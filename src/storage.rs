//! Entity storage collaborators

use crate::billing::Store;
use crate::payment_method::PaymentMethod;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
	#[error("Entity not found: {0}")]
	NotFound(String),
	#[error("Storage backend error: {0}")]
	Backend(#[from] anyhow::Error),
}

/// Store lookups.
pub trait StoreStorage: Send + Sync {
	/// Loads the default store, if one is configured.
	fn load_default(&self) -> Result<Option<Store>, StorageError>;
}

/// Payment method persistence.
pub trait PaymentMethodStorage: Send + Sync {
	fn save(&self, payment_method: &mut PaymentMethod) -> Result<(), StorageError>;
}
