//! In-memory collaborators for testing the payment method edit form.
//!
//! Every mock keeps its data in memory and can be inspected after the form
//! ran. The gateway and storage mocks can be configured to fail so that error
//! paths can be exercised.

pub mod gateway;
pub mod logger;
pub mod storage;

pub use gateway::{GatewayFailure, MockGateway};
pub use logger::{LogLevel, LogRecord, MemoryLogger};
pub use storage::{InMemoryPaymentMethodStorage, InMemoryStoreStorage};
