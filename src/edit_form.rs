//! Payment method edit form
//!
//! Builds the customer facing form for editing a stored payment method and
//! applies the submitted values back to it. The gateway is asked to update the
//! remote payment method before the entity is saved. Gateway failures are
//! logged with their original message, while the customer only ever sees one
//! of two generic messages.

use crate::billing::ProfileSelect;
use crate::config::{FormSettings, SettingsError};
use crate::credit_card::{self, ExpirationMonth, ExpirationYear};
use crate::error::{DECLINE_MESSAGE, FormError, FormResult, GATEWAY_ERROR_MESSAGE};
use crate::form::{DEFAULT_PARENT, ElementKind, FormElement, FormState, SelectOption};
use crate::gateway::{PaymentGatewayError, SupportsUpdatingStoredPaymentMethods};
use crate::i18n::{NullTranslator, Translator};
use crate::logger::PaymentLogger;
use crate::payment_method::{CreditCard, PaymentMethod, PaymentMethodDetails};
use crate::storage::{PaymentMethodStorage, StoreStorage};
use chrono::Datelike;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const BILLING_INFORMATION: &str = "billing_information";
pub const PAYMENT_DETAILS: &str = "payment_details";

const ILLEGAL_CHOICE_MESSAGE: &str = "An illegal choice has been detected. Please contact the site administrator.";

const NUMBER_TEMPLATE: &str =
	"<span class=\"payment-method-icon payment-method-icon--{{ type }}\"></span>{{ label }}";
const DIVIDER_MARKUP: &str = "<span class=\"credit-card-form__divider\">/</span>";

/// Edit form for a stored payment method.
///
/// Collaborators are passed in explicitly; the form keeps no state between
/// requests.
pub struct PaymentMethodEditForm {
	store_storage: Arc<dyn StoreStorage>,
	payment_method_storage: Arc<dyn PaymentMethodStorage>,
	gateway: Arc<dyn SupportsUpdatingStoredPaymentMethods>,
	logger: Arc<dyn PaymentLogger>,
	translator: Arc<dyn Translator>,
	settings: FormSettings,
}

impl PaymentMethodEditForm {
	/// Creates the form with a pass-through translator and default settings.
	pub fn new(
		store_storage: Arc<dyn StoreStorage>,
		payment_method_storage: Arc<dyn PaymentMethodStorage>,
		gateway: Arc<dyn SupportsUpdatingStoredPaymentMethods>,
		logger: Arc<dyn PaymentLogger>,
	) -> Self {
		Self {
			store_storage,
			payment_method_storage,
			gateway,
			logger,
			translator: Arc::new(NullTranslator),
			settings: FormSettings::default(),
		}
	}

	/// Sets the translator used for titles and customer facing errors.
	pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
		self.translator = translator;
		self
	}

	/// Replaces the default settings after validating them.
	pub fn with_settings(mut self, settings: FormSettings) -> Result<Self, SettingsError> {
		settings.validate()?;
		self.settings = settings;
		Ok(self)
	}

	/// Active settings.
	pub fn settings(&self) -> &FormSettings {
		&self.settings
	}

	/// Builds the form for the payment method's current state.
	pub fn build_form(
		&self,
		payment_method: &PaymentMethod,
		form_state: &mut FormState,
	) -> FormResult<FormElement> {
		let store = self.store_storage.load_default()?;
		let key = form_state
			.parents()
			.last()
			.cloned()
			.unwrap_or_else(|| DEFAULT_PARENT.to_string());

		let mut form =
			FormElement::new(key, ElementKind::Form).with_parents(form_state.parents().to_vec());
		form.attach_library(&self.settings.form_library);
		form.add_child(
			FormElement::new(
				BILLING_INFORMATION,
				ElementKind::ProfileSelect(ProfileSelect::for_store(
					payment_method.billing_profile(),
					store.as_ref(),
				)),
			)
			.with_weight(self.settings.billing_information_weight),
		);

		match payment_method.details() {
			PaymentMethodDetails::CreditCard(card) => {
				form.add_child(self.build_credit_card_form(payment_method, card, form_state));
			}
			// Stored PayPal accounts have nothing editable besides billing information.
			PaymentMethodDetails::PayPal(_) => {}
		}

		tracing::debug!(
			bundle = %payment_method.bundle(),
			has_store = store.is_some(),
			"Built payment method edit form"
		);
		Ok(form)
	}

	/// Builds the credit card subform.
	///
	/// The card type and number are displayed read-only; only the expiration
	/// date can be changed.
	pub fn build_credit_card_form(
		&self,
		payment_method: &PaymentMethod,
		card: &CreditCard,
		form_state: &FormState,
	) -> FormElement {
		let months: Vec<SelectOption> = credit_card::month_options()
			.into_iter()
			.map(SelectOption::from)
			.collect();
		let years: Vec<SelectOption> =
			credit_card::year_options(form_state.now().year(), self.settings.expiration_years)
				.into_iter()
				.map(SelectOption::from)
				.collect();

		let mut month = FormElement::select("month", months)
			.with_title(self.translator.gettext("Month"))
			.with_required(true);
		let mut year = FormElement::select("year", years)
			.with_title(self.translator.gettext("Year"))
			.with_required(true);
		if let Some(expiration) = card.expiration {
			month = month.with_default_value(expiration.month().two_digits());
			year = year.with_default_value(expiration.year().four_digits());
		}

		let mut context = BTreeMap::new();
		context.insert("type".to_string(), card.card_type.id().to_string());
		context.insert("label".to_string(), payment_method.label());

		let mut element = FormElement::new(PAYMENT_DETAILS, ElementKind::Container)
			.with_class("credit-card-form")
			.with_child(FormElement::hidden("type", card.card_type.id()))
			.with_child(FormElement::new(
				"number",
				ElementKind::InlineTemplate {
					template: NUMBER_TEMPLATE.to_string(),
					context,
				},
			))
			.with_child(
				FormElement::new("expiration", ElementKind::Container)
					.with_class("credit-card-form__expiration")
					.with_child(month)
					.with_child(
						FormElement::new(
							"divider",
							ElementKind::Item {
								markup: DIVIDER_MARKUP.to_string(),
							},
						)
						.with_title(""),
					)
					.with_child(year),
			);
		element.attach_library(&self.settings.icons_library);
		element
	}

	/// Validates the submitted values against the built form.
	///
	/// Errors are recorded on the form state; returns whether the submission
	/// is valid.
	pub fn validate_form(
		&self,
		form: &FormElement,
		payment_method: &PaymentMethod,
		form_state: &mut FormState,
	) -> bool {
		form_state.clear_errors();

		let billing_key = form_state.plugin_key(&[BILLING_INFORMATION]);
		match (
			form.child(BILLING_INFORMATION).and_then(FormElement::profile_select),
			form_state.plugin_value(&[BILLING_INFORMATION]).cloned(),
		) {
			(Some(widget), Some(values)) => {
				if let Err(e) = widget.resolve(&values) {
					form_state.set_error(billing_key, e.to_string());
				}
			}
			(None, _) => form_state.set_error(billing_key, "Billing information is not available."),
			(_, None) => form_state.set_error(billing_key, "Billing information is required."),
		}

		match payment_method.details() {
			PaymentMethodDetails::CreditCard(_) => {
				for field in ["month", "year"] {
					let path = [PAYMENT_DETAILS, "expiration", field];
					let key = form_state.plugin_key(&path);
					let Some(element) = form.get(&path) else {
						form_state.set_error(key, "Expiration date is not available.");
						continue;
					};
					match form_state.plugin_text(&path) {
						None => {
							let title = element.title().unwrap_or(field);
							form_state.set_error(key, format!("{} field is required.", title));
						}
						Some(value) => {
							let offered = option_key(field, &value)
								.is_some_and(|option| element.has_option(&option));
							if !offered {
								form_state.set_error(key, ILLEGAL_CHOICE_MESSAGE);
							}
						}
					}
				}
			}
			PaymentMethodDetails::PayPal(_) => {}
		}

		!form_state.has_errors()
	}

	/// Applies the submitted values and updates the payment method.
	///
	/// The gateway is called with the modified payment method, which is saved
	/// afterwards. A decline or gateway failure is logged with the original
	/// message and replaced by a generic, translated one.
	pub fn submit_form(
		&self,
		form: &FormElement,
		payment_method: &mut PaymentMethod,
		form_state: &FormState,
	) -> FormResult<()> {
		let widget = form
			.child(BILLING_INFORMATION)
			.and_then(FormElement::profile_select)
			.ok_or_else(|| FormError::MissingElement(BILLING_INFORMATION.to_string()))?;
		let values = form_state
			.plugin_value(&[BILLING_INFORMATION])
			.ok_or_else(|| FormError::MissingValue(form_state.plugin_key(&[BILLING_INFORMATION])))?;
		let billing_profile = widget.resolve(values)?;
		let expiration = match payment_method.details() {
			PaymentMethodDetails::CreditCard(_) => {
				let expiration = form_state.submitted_expiration()?;
				let expires = credit_card::calculate_expiration_timestamp(
					expiration.month().value(),
					expiration.year().value(),
				)?;
				Some((expiration, expires))
			}
			PaymentMethodDetails::PayPal(_) => None,
		};

		// Nothing is applied until every submitted value has been read.
		payment_method.set_billing_profile(billing_profile);
		if let Some((expiration, expires)) = expiration {
			match payment_method.details_mut() {
				PaymentMethodDetails::CreditCard(card) => card.set_expiration(expiration),
				PaymentMethodDetails::PayPal(_) => {}
			}
			payment_method.set_expires_time(Some(expires));
		}

		match self.gateway.update_payment_method(payment_method) {
			Ok(()) => {}
			Err(PaymentGatewayError::Declined(message)) => {
				self.logger.warning(&message);
				return Err(FormError::Declined(self.translator.gettext(DECLINE_MESSAGE)));
			}
			Err(PaymentGatewayError::Gateway(message)) => {
				self.logger.error(&message);
				return Err(FormError::Gateway(
					self.translator.gettext(GATEWAY_ERROR_MESSAGE),
				));
			}
			Err(PaymentGatewayError::Other(e)) => return Err(FormError::Other(e)),
		}
		self.payment_method_storage.save(payment_method)?;

		tracing::debug!(
			bundle = %payment_method.bundle(),
			payment_method_id = ?payment_method.id(),
			"Updated stored payment method"
		);
		Ok(())
	}

	/// Runs a full submission: build, validate, then submit.
	pub fn process_submission(
		&self,
		payment_method: &mut PaymentMethod,
		form_state: &mut FormState,
	) -> FormResult<FormElement> {
		let form = self.build_form(payment_method, form_state)?;
		if !self.validate_form(&form, payment_method, form_state) {
			return Err(FormError::Invalid(form_state.errors().clone()));
		}
		self.submit_form(&form, payment_method, form_state)?;
		Ok(form)
	}
}

/// Select key a submitted expiration value maps to, e.g. `3` to `"03"`.
fn option_key(field: &str, value: &str) -> Option<String> {
	match field {
		"month" => ExpirationMonth::parse(value).ok().map(|month| month.two_digits()),
		"year" => ExpirationYear::parse(value).ok().map(|year| year.four_digits()),
		_ => None,
	}
}

/// Default values shown by the expiration selectors of a built form.
pub fn expiration_defaults(form: &FormElement) -> Option<(ExpirationMonth, ExpirationYear)> {
	let month = form
		.get(&[PAYMENT_DETAILS, "expiration", "month"])?
		.default_value()?;
	let year = form
		.get(&[PAYMENT_DETAILS, "expiration", "year"])?
		.default_value()?;
	Some((
		ExpirationMonth::parse(month).ok()?,
		ExpirationYear::parse(year).ok()?,
	))
}
