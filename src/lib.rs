//! Edit form for stored payment methods
//!
//! This crate renders and processes the customer facing form used to edit a
//! stored payment method (a tokenized credit card or a PayPal account):
//! - Billing information through a profile selection widget, defaulted from the default store
//! - Read-only card display with an editable expiration date for credit cards
//! - Gateway update with sanitized, translated error messages for customers
//! - HTML rendering of the built form tree
//!
//! Storage, the payment gateway, logging and translation are collaborators
//! passed to [`PaymentMethodEditForm::new`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use payment_method_form::{FormState, PaymentMethodEditForm, TracingLogger};
//! use std::sync::Arc;
//!
//! let edit_form = PaymentMethodEditForm::new(stores, payment_methods, gateway, Arc::new(TracingLogger::default()));
//! let mut form_state = FormState::new();
//! let form = edit_form.build_form(&payment_method, &mut form_state)?;
//! let html = payment_method_form::form::render_html(&form)?;
//! ```

pub mod billing;
pub mod config;
pub mod credit_card;
pub mod edit_form;
pub mod error;
pub mod form;
pub mod gateway;
pub mod i18n;
pub mod logger;
pub mod payment_method;
pub mod storage;

pub use billing::{
	Address, BillingProfile, CountryCode, CountryCodeError, ProfileSelect, ProfileSelectError,
	Store,
};
pub use config::{FormSettings, SettingsError};
pub use credit_card::{
	CardExpiration, CardType, ExpirationError, calculate_expiration_timestamp,
};
pub use edit_form::{BILLING_INFORMATION, PAYMENT_DETAILS, PaymentMethodEditForm};
pub use error::{DECLINE_MESSAGE, FormError, FormResult, GATEWAY_ERROR_MESSAGE};
pub use form::{ElementKind, FormElement, FormState, SelectOption};
pub use gateway::{PaymentGatewayError, SupportsUpdatingStoredPaymentMethods};
pub use i18n::{MessageCatalog, NullTranslator, Translator};
pub use logger::{PaymentLogger, TracingLogger};
pub use payment_method::{
	CreditCard, PayPal, PaymentMethod, PaymentMethodBundle, PaymentMethodDetails,
};
pub use storage::{PaymentMethodStorage, StorageError, StoreStorage};
