//! Edit form submission tests
//!
//! Tests for validation, gateway error handling and persistence

use chrono::{TimeZone, Utc};
use payment_method_form::{
	Address, BillingProfile, CardExpiration, CardType, CountryCode, CreditCard, DECLINE_MESSAGE,
	FormError, FormState, GATEWAY_ERROR_MESSAGE, MessageCatalog, PayPal, PaymentMethod,
	PaymentMethodDetails, PaymentMethodEditForm, Store,
};
use payment_method_form_mocks::{
	GatewayFailure, InMemoryPaymentMethodStorage, InMemoryStoreStorage, LogLevel, LogRecord,
	MemoryLogger, MockGateway,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;

struct Harness {
	gateway: Arc<MockGateway>,
	storage: Arc<InMemoryPaymentMethodStorage>,
	logger: MemoryLogger,
	edit_form: PaymentMethodEditForm,
}

fn code(value: &str) -> CountryCode {
	CountryCode::new(value).unwrap()
}

#[fixture]
fn harness() -> Harness {
	let store = Store {
		id: 1,
		name: "Main store".to_string(),
		address: Address::new(code("US")),
		billing_countries: [code("US"), code("FR")].into_iter().collect(),
	};
	let gateway = Arc::new(MockGateway::new());
	let storage = Arc::new(InMemoryPaymentMethodStorage::new());
	let logger = MemoryLogger::new();
	let edit_form = PaymentMethodEditForm::new(
		Arc::new(InMemoryStoreStorage::new(Some(store))),
		storage.clone(),
		gateway.clone(),
		Arc::new(logger.clone()),
	);
	Harness {
		gateway,
		storage,
		logger,
		edit_form,
	}
}

#[fixture]
fn card() -> PaymentMethod {
	PaymentMethod::new(
		"authorize_net",
		PaymentMethodDetails::CreditCard(
			CreditCard::new(CardType::Visa, "1111")
				.with_expiration(CardExpiration::new(3, 2027).unwrap()),
		),
	)
	.with_id(5)
	.with_remote_id("cust_1|pm_1")
	.with_billing_profile(BillingProfile::new(Address::new(code("US"))).with_id(11))
}

fn submission(payment_details: Value) -> FormState {
	FormState::at(Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap()).with_values(json!({
		"payment_method": {
			"billing_information": {
				"address": {
					"country_code": "FR",
					"given_name": "Camille",
					"family_name": "Martin",
					"address_line1": "10 rue de Rivoli",
					"locality": "Paris",
					"postal_code": "75001"
				}
			},
			"payment_details": payment_details
		}
	}))
}

fn expiration(month: &str, year: &str) -> FormState {
	submission(json!({"type": "visa", "expiration": {"month": month, "year": year}}))
}

#[rstest]
fn test_submit_updates_expiration(harness: Harness, mut card: PaymentMethod) {
	let mut form_state = expiration("12", "2029");

	harness
		.edit_form
		.process_submission(&mut card, &mut form_state)
		.unwrap();

	let stored = card.credit_card().unwrap().expiration.unwrap();
	assert_eq!(stored.month().value(), 12);
	assert_eq!(stored.year().value(), 2029);
	assert_eq!(
		card.expires_time(),
		Some(Utc.with_ymd_and_hms(2029, 12, 31, 23, 59, 59).unwrap())
	);
}

#[rstest]
fn test_numeric_expiration_values_are_accepted(harness: Harness, mut card: PaymentMethod) {
	let mut form_state = submission(json!({"type": "visa", "expiration": {"month": 3, "year": 2029}}));

	harness
		.edit_form
		.process_submission(&mut card, &mut form_state)
		.unwrap();

	assert_eq!(
		card.credit_card().unwrap().expiration.unwrap().to_string(),
		"03/2029"
	);
}

#[rstest]
fn test_submitted_profile_id_is_ignored(harness: Harness, mut card: PaymentMethod) {
	let mut form_state = expiration("12", "2029");
	let mut values = form_state.values().clone();
	values["payment_method"]["billing_information"]["id"] = json!(999);
	form_state.set_values(values);

	harness
		.edit_form
		.process_submission(&mut card, &mut form_state)
		.unwrap();

	assert_eq!(card.billing_profile().unwrap().id, Some(11));
}

#[rstest]
fn test_submit_calls_gateway_with_updated_values(harness: Harness, mut card: PaymentMethod) {
	harness
		.edit_form
		.process_submission(&mut card, &mut expiration("01", "2030"))
		.unwrap();

	let updates = harness.gateway.updates();
	assert_eq!(updates.len(), 1);
	let sent = updates[0].credit_card().unwrap().expiration.unwrap();
	assert_eq!(sent.to_string(), "01/2030");
	assert_eq!(
		updates[0].billing_profile().unwrap().address.locality,
		"Paris"
	);
}

#[rstest]
fn test_submit_saves_after_gateway_update(harness: Harness, mut card: PaymentMethod) {
	harness
		.edit_form
		.process_submission(&mut card, &mut expiration("12", "2029"))
		.unwrap();

	let saved = harness.storage.load(5).unwrap();
	assert_eq!(saved, card);
	assert_eq!(saved.remote_id(), Some("cust_1|pm_1"));
	let profile = saved.billing_profile().unwrap();
	assert_eq!(profile.id, Some(11));
	assert_eq!(profile.address.country_code, code("FR"));
	assert_eq!(profile.address.given_name, "Camille");
	assert!(harness.logger.get_records().is_empty());
}

#[rstest]
fn test_decline_shows_generic_message(harness: Harness, mut card: PaymentMethod) {
	harness
		.gateway
		.set_fail_next(GatewayFailure::Decline("Insufficient funds".to_string()));

	let err = harness
		.edit_form
		.process_submission(&mut card, &mut expiration("12", "2029"))
		.unwrap_err();

	assert!(matches!(&err, FormError::Declined(message) if message == DECLINE_MESSAGE));
	assert!(!err.to_string().contains("Insufficient funds"));
	assert_eq!(
		harness.logger.get_records(),
		vec![LogRecord {
			level: LogLevel::Warning,
			message: "Insufficient funds".to_string(),
		}]
	);
	assert_eq!(harness.storage.count(), 0);
}

#[rstest]
fn test_gateway_failure_shows_generic_message(harness: Harness, mut card: PaymentMethod) {
	harness.gateway.set_fail_next(GatewayFailure::Gateway(
		"Timeout contacting processor".to_string(),
	));

	let err = harness
		.edit_form
		.process_submission(&mut card, &mut expiration("12", "2029"))
		.unwrap_err();

	assert!(matches!(&err, FormError::Gateway(message) if message == GATEWAY_ERROR_MESSAGE));
	assert!(err.is_customer_facing());
	assert_eq!(
		harness.logger.messages(LogLevel::Error),
		vec!["Timeout contacting processor".to_string()]
	);
	assert!(harness.logger.messages(LogLevel::Warning).is_empty());
	assert_eq!(harness.storage.count(), 0);
}

#[rstest]
fn test_unclassified_failure_propagates(harness: Harness, mut card: PaymentMethod) {
	harness
		.gateway
		.set_fail_next(GatewayFailure::Other("connection reset by peer".to_string()));

	let err = harness
		.edit_form
		.process_submission(&mut card, &mut expiration("12", "2029"))
		.unwrap_err();

	assert!(matches!(err, FormError::Other(_)));
	assert_eq!(err.to_string(), "connection reset by peer");
	assert!(!err.is_customer_facing());
	assert!(harness.logger.get_records().is_empty());
	assert_eq!(harness.storage.count(), 0);
}

#[rstest]
fn test_storage_failure_propagates(harness: Harness, mut card: PaymentMethod) {
	harness.storage.set_fail_next(true);

	let err = harness
		.edit_form
		.process_submission(&mut card, &mut expiration("12", "2029"))
		.unwrap_err();

	assert!(matches!(err, FormError::Storage(_)));
	assert_eq!(harness.gateway.update_count(), 1);
}

#[rstest]
fn test_generic_messages_are_translated(mut card: PaymentMethod) {
	let mut catalog = MessageCatalog::new("fr");
	catalog.add_translation(DECLINE_MESSAGE, "Votre moyen de paiement a été refusé.");
	let gateway = Arc::new(MockGateway::new());
	gateway.set_fail_next(GatewayFailure::Decline("Do not honor".to_string()));
	let edit_form = PaymentMethodEditForm::new(
		Arc::new(InMemoryStoreStorage::new(None)),
		Arc::new(InMemoryPaymentMethodStorage::new()),
		gateway,
		Arc::new(MemoryLogger::new()),
	)
	.with_translator(Arc::new(catalog));

	let err = edit_form
		.process_submission(&mut card, &mut expiration("12", "2029"))
		.unwrap_err();

	assert_eq!(err.to_string(), "Votre moyen de paiement a été refusé.");
}

#[rstest]
#[case("13", "2029", "payment_method.payment_details.expiration.month")]
#[case("12", "2025", "payment_method.payment_details.expiration.year")]
#[case("12", "2036", "payment_method.payment_details.expiration.year")]
#[case("", "2029", "payment_method.payment_details.expiration.month")]
fn test_invalid_expiration_is_rejected(
	harness: Harness,
	mut card: PaymentMethod,
	#[case] month: &str,
	#[case] year: &str,
	#[case] key: &str,
) {
	let original = card.clone();

	let err = harness
		.edit_form
		.process_submission(&mut card, &mut expiration(month, year))
		.unwrap_err();

	match err {
		FormError::Invalid(errors) => assert!(errors.contains_key(key)),
		other => panic!("unexpected error: {:?}", other),
	}
	assert_eq!(card, original);
	assert_eq!(harness.gateway.update_count(), 0);
}

#[rstest]
fn test_billing_country_outside_store_is_rejected(harness: Harness, mut card: PaymentMethod) {
	let mut form_state = expiration("12", "2029");
	let mut values = form_state.values().clone();
	values["payment_method"]["billing_information"]["address"]["country_code"] = json!("DE");
	form_state.set_values(values);

	let err = harness
		.edit_form
		.process_submission(&mut card, &mut form_state)
		.unwrap_err();

	match err {
		FormError::Invalid(errors) => {
			assert!(errors.contains_key("payment_method.billing_information"))
		}
		other => panic!("unexpected error: {:?}", other),
	}
}

#[rstest]
fn test_paypal_submit_sets_billing_profile_only(harness: Harness) {
	let mut paypal = PaymentMethod::new(
		"paypal_checkout",
		PaymentMethodDetails::PayPal(PayPal {
			paypal_mail: Some("buyer@example.com".to_string()),
		}),
	)
	.with_id(8);
	let before = paypal.clone();

	harness
		.edit_form
		.process_submission(&mut paypal, &mut submission(Value::Null))
		.unwrap();

	assert_eq!(paypal.details(), before.details());
	assert_eq!(paypal.expires_time(), None);
	assert_eq!(
		paypal.billing_profile().unwrap().address.country_code,
		code("FR")
	);
	assert_eq!(harness.gateway.update_count(), 1);
	assert!(harness.storage.load(8).is_ok());
}
