//! Request scoped form state

use crate::credit_card::{CardExpiration, ExpirationMonth, ExpirationYear};
use crate::error::{FormError, FormResult};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

/// Default value path of the payment method subform.
pub const DEFAULT_PARENT: &str = "payment_method";

/// State shared by the build, validate and submit steps of one request.
#[derive(Debug, Clone)]
pub struct FormState {
	now: DateTime<Utc>,
	parents: Vec<String>,
	values: Value,
	errors: BTreeMap<String, Vec<String>>,
}

impl FormState {
	pub fn new() -> Self {
		Self::at(Utc::now())
	}

	/// State pinned to a fixed current time.
	pub fn at(now: DateTime<Utc>) -> Self {
		Self {
			now,
			parents: vec![DEFAULT_PARENT.to_string()],
			values: Value::Object(serde_json::Map::new()),
			errors: BTreeMap::new(),
		}
	}

	pub fn with_parents(mut self, parents: Vec<String>) -> Self {
		self.parents = parents;
		self
	}

	pub fn with_values(mut self, values: Value) -> Self {
		self.values = values;
		self
	}

	pub fn now(&self) -> DateTime<Utc> {
		self.now
	}

	pub fn parents(&self) -> &[String] {
		&self.parents
	}

	/// All submitted values, rooted at the complete form.
	pub fn values(&self) -> &Value {
		&self.values
	}

	pub fn set_values(&mut self, values: Value) {
		self.values = values;
	}

	/// A submitted value, addressed from the root of the complete form.
	pub fn value(&self, path: &[&str]) -> Option<&Value> {
		path.iter()
			.try_fold(&self.values, |value, key| value.get(*key))
	}

	/// A submitted value, addressed relative to this subform's parents.
	///
	/// # Examples
	///
	/// ```
	/// use payment_method_form::form::FormState;
	/// use serde_json::json;
	///
	/// let state = FormState::new().with_values(json!({
	///     "payment_method": {"payment_details": {"type": "visa"}}
	/// }));
	/// assert_eq!(state.plugin_value(&["payment_details", "type"]), Some(&json!("visa")));
	/// ```
	pub fn plugin_value(&self, path: &[&str]) -> Option<&Value> {
		let root = self
			.parents
			.iter()
			.try_fold(&self.values, |value, key| value.get(key.as_str()))?;
		path.iter().try_fold(root, |value, key| value.get(*key))
	}

	/// Submitted value as text. Numbers are accepted as well as strings.
	pub fn plugin_text(&self, path: &[&str]) -> Option<String> {
		match self.plugin_value(path)? {
			Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
			Value::Number(n) => Some(n.to_string()),
			_ => None,
		}
	}

	/// Reads and validates the submitted expiration date.
	pub fn submitted_expiration(&self) -> FormResult<CardExpiration> {
		const MONTH: [&str; 3] = ["payment_details", "expiration", "month"];
		const YEAR: [&str; 3] = ["payment_details", "expiration", "year"];

		let month = self
			.plugin_text(&MONTH)
			.ok_or_else(|| FormError::MissingValue(self.plugin_key(&MONTH)))?;
		let year = self
			.plugin_text(&YEAR)
			.ok_or_else(|| FormError::MissingValue(self.plugin_key(&YEAR)))?;

		Ok(CardExpiration::from_parts(
			ExpirationMonth::parse(&month)?,
			ExpirationYear::parse(&year)?,
		))
	}

	/// Dotted key of a subform path, as used for error reporting.
	pub fn plugin_key(&self, path: &[&str]) -> String {
		self.parents
			.iter()
			.map(String::as_str)
			.chain(path.iter().copied())
			.collect::<Vec<_>>()
			.join(".")
	}

	pub fn set_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
		self.errors
			.entry(key.into())
			.or_default()
			.push(message.into());
	}

	pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
		&self.errors
	}

	pub fn has_errors(&self) -> bool {
		!self.errors.is_empty()
	}

	pub fn clear_errors(&mut self) {
		self.errors.clear();
	}
}

impl Default for FormState {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::credit_card::ExpirationError;
	use rstest::rstest;
	use serde_json::json;

	fn state(expiration: Value) -> FormState {
		FormState::new().with_values(json!({
			"payment_method": {"payment_details": {"expiration": expiration}}
		}))
	}

	#[rstest]
	#[case(json!({"month": "12", "year": "2029"}), 12, 2029)]
	#[case(json!({"month": "03", "year": 2031}), 3, 2031)]
	#[case(json!({"month": 7, "year": "2030"}), 7, 2030)]
	fn test_submitted_expiration(#[case] expiration: Value, #[case] month: u32, #[case] year: i32) {
		let parsed = state(expiration).submitted_expiration().unwrap();
		assert_eq!(parsed.month().value(), month);
		assert_eq!(parsed.year().value(), year);
	}

	#[rstest]
	fn test_submitted_expiration_missing_month() {
		let err = state(json!({"year": "2029"})).submitted_expiration().unwrap_err();
		match err {
			FormError::MissingValue(key) => {
				assert_eq!(key, "payment_method.payment_details.expiration.month")
			}
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[rstest]
	fn test_submitted_expiration_invalid_month() {
		let err = state(json!({"month": "13", "year": "2029"}))
			.submitted_expiration()
			.unwrap_err();
		assert!(matches!(err, FormError::Expiration(ExpirationError::InvalidMonth(13))));
	}

	#[rstest]
	fn test_custom_parents() {
		let state = FormState::new()
			.with_parents(vec!["checkout".to_string(), "payment".to_string()])
			.with_values(json!({"checkout": {"payment": {"billing_information": {"id": 3}}}}));

		assert_eq!(state.plugin_value(&["billing_information", "id"]), Some(&json!(3)));
		assert_eq!(state.plugin_key(&["billing_information"]), "checkout.payment.billing_information");
	}

	#[rstest]
	fn test_blank_text_is_missing() {
		let state = state(json!({"month": "  ", "year": "2029"}));
		assert!(state.plugin_text(&["payment_details", "expiration", "month"]).is_none());
	}

	#[rstest]
	fn test_errors() {
		let mut state = FormState::new();
		assert!(!state.has_errors());
		state.set_error("payment_method.billing_information", "Invalid");
		state.set_error("payment_method.billing_information", "Still invalid");
		assert_eq!(state.errors()["payment_method.billing_information"].len(), 2);
		state.clear_errors();
		assert!(!state.has_errors());
	}
}
