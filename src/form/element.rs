//! Form element tree
//!
//! A built form is a tree of [`FormElement`]s. Each element has a key unique
//! among its siblings; the keys from the root down form the element's path,
//! which is also where its submitted value lives.

use crate::billing::ProfileSelect;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single `<option>` of a select element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
	pub value: String,
	pub label: String,
}

impl SelectOption {
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
		}
	}
}

impl From<(String, String)> for SelectOption {
	fn from((value, label): (String, String)) -> Self {
		Self { value, label }
	}
}

/// What an element renders as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
	/// Root of a (sub)form.
	Form,
	/// Groups children without a value of its own.
	Container,
	Select { options: Vec<SelectOption> },
	/// Value round-tripped without being displayed.
	Hidden { value: String },
	/// Read-only markup built from a template and escaped context values.
	InlineTemplate {
		template: String,
		context: BTreeMap<String, String>,
	},
	/// Decorative markup with no submitted value.
	Item { markup: String },
	ProfileSelect(ProfileSelect),
}

impl ElementKind {
	/// Whether the element submits a value.
	pub fn has_value(&self) -> bool {
		matches!(
			self,
			ElementKind::Select { .. } | ElementKind::Hidden { .. } | ElementKind::ProfileSelect(_)
		)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormElement {
	key: String,
	#[serde(flatten)]
	kind: ElementKind,
	#[serde(skip_serializing_if = "Option::is_none")]
	title: Option<String>,
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	required: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	default_value: Option<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	classes: Vec<String>,
	weight: i32,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	parents: Vec<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	libraries: Vec<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	children: Vec<FormElement>,
}

impl FormElement {
	/// # Examples
	///
	/// ```
	/// use payment_method_form::form::{ElementKind, FormElement};
	///
	/// let mut form = FormElement::new("payment_method", ElementKind::Form);
	/// form.add_child(FormElement::new("expiration", ElementKind::Container));
	/// assert!(form.child("expiration").is_some());
	/// assert!(form.child("number").is_none());
	/// ```
	pub fn new(key: impl Into<String>, kind: ElementKind) -> Self {
		Self {
			key: key.into(),
			kind,
			title: None,
			required: false,
			default_value: None,
			classes: Vec::new(),
			weight: 0,
			parents: Vec::new(),
			libraries: Vec::new(),
			children: Vec::new(),
		}
	}

	/// Creates a select element with the given options.
	pub fn select(key: impl Into<String>, options: Vec<SelectOption>) -> Self {
		Self::new(key, ElementKind::Select { options })
	}

	/// Creates a hidden element carrying `value`.
	pub fn hidden(key: impl Into<String>, value: impl Into<String>) -> Self {
		Self::new(
			key,
			ElementKind::Hidden {
				value: value.into(),
			},
		)
	}

	/// Sets the label shown next to the element.
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Marks the element as required.
	pub fn with_required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	/// Sets the value selected or shown initially.
	pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
		self.default_value = Some(value.into());
		self
	}

	/// Adds a CSS class.
	pub fn with_class(mut self, class: impl Into<String>) -> Self {
		self.classes.push(class.into());
		self
	}

	/// Sets the weight; lighter elements are rendered first.
	pub fn with_weight(mut self, weight: i32) -> Self {
		self.weight = weight;
		self
	}

	/// Sets the value path of the element's parents in the enclosing form.
	pub fn with_parents(mut self, parents: Vec<String>) -> Self {
		self.parents = parents;
		self
	}

	/// Adds a child, see [`FormElement::add_child`].
	pub fn with_child(mut self, child: FormElement) -> Self {
		self.add_child(child);
		self
	}

	/// Attaches a front-end library (CSS/JS asset bundle) to the element.
	///
	/// Attaching the same library twice has no effect.
	pub fn attach_library(&mut self, library: impl Into<String>) {
		let library = library.into();
		if !self.libraries.contains(&library) {
			self.libraries.push(library);
		}
	}

	/// Adds a child, replacing an existing child with the same key.
	pub fn add_child(&mut self, child: FormElement) {
		match self.children.iter_mut().find(|c| c.key == child.key) {
			Some(existing) => *existing = child,
			None => self.children.push(child),
		}
	}

	/// Key of the element among its siblings.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// What the element renders as.
	pub fn kind(&self) -> &ElementKind {
		&self.kind
	}

	/// Label of the element.
	pub fn title(&self) -> Option<&str> {
		self.title.as_deref()
	}

	/// Whether a value must be submitted.
	pub fn is_required(&self) -> bool {
		self.required
	}

	/// Initial value of the element.
	pub fn default_value(&self) -> Option<&str> {
		self.default_value.as_deref()
	}

	/// CSS classes of the element.
	pub fn classes(&self) -> &[String] {
		&self.classes
	}

	/// Ordering weight among siblings.
	pub fn weight(&self) -> i32 {
		self.weight
	}

	/// Value path of the parents in the enclosing form.
	pub fn parents(&self) -> &[String] {
		&self.parents
	}

	/// Libraries attached to this element only.
	pub fn libraries(&self) -> &[String] {
		&self.libraries
	}

	/// Libraries attached anywhere in the tree, in document order.
	pub fn all_libraries(&self) -> Vec<&str> {
		let mut libraries: Vec<&str> = Vec::new();
		self.collect_libraries(&mut libraries);
		libraries
	}

	fn collect_libraries<'a>(&'a self, into: &mut Vec<&'a str>) {
		for library in &self.libraries {
			if !into.contains(&library.as_str()) {
				into.push(library);
			}
		}
		for child in &self.children {
			child.collect_libraries(into);
		}
	}

	/// Children ordered by weight, keeping insertion order for equal weights.
	pub fn children(&self) -> Vec<&FormElement> {
		let mut children: Vec<&FormElement> = self.children.iter().collect();
		children.sort_by_key(|child| child.weight);
		children
	}

	/// Direct child with the given key.
	pub fn child(&self, key: &str) -> Option<&FormElement> {
		self.children.iter().find(|c| c.key == key)
	}

	/// Looks up a descendant by its key path.
	///
	/// # Examples
	///
	/// ```
	/// use payment_method_form::form::{ElementKind, FormElement};
	///
	/// let form = FormElement::new("payment_details", ElementKind::Container).with_child(
	///     FormElement::new("expiration", ElementKind::Container)
	///         .with_child(FormElement::select("month", vec![])),
	/// );
	/// assert_eq!(form.get(&["expiration", "month"]).unwrap().key(), "month");
	/// ```
	pub fn get(&self, path: &[&str]) -> Option<&FormElement> {
		path.iter()
			.try_fold(self, |element, key| element.child(key))
	}

	/// Options of a select element.
	pub fn select_options(&self) -> Option<&[SelectOption]> {
		match &self.kind {
			ElementKind::Select { options } => Some(options),
			_ => None,
		}
	}

	/// Whether a select element offers `value` as an option key.
	pub fn has_option(&self, value: &str) -> bool {
		self.select_options()
			.is_some_and(|options| options.iter().any(|option| option.value == value))
	}

	/// Profile selection widget of a billing information element.
	pub fn profile_select(&self) -> Option<&ProfileSelect> {
		match &self.kind {
			ElementKind::ProfileSelect(widget) => Some(widget),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_add_child_replaces_same_key() {
		let mut form = FormElement::new("root", ElementKind::Form);
		form.add_child(FormElement::hidden("type", "visa"));
		form.add_child(FormElement::hidden("type", "amex"));

		assert_eq!(form.children().len(), 1);
		assert_eq!(
			form.child("type").unwrap().kind(),
			&ElementKind::Hidden {
				value: "amex".to_string()
			}
		);
	}

	#[rstest]
	fn test_children_sorted_by_weight() {
		let form = FormElement::new("root", ElementKind::Form)
			.with_child(FormElement::new("billing", ElementKind::Container).with_weight(50))
			.with_child(FormElement::new("details", ElementKind::Container))
			.with_child(FormElement::new("extra", ElementKind::Container));

		let keys: Vec<&str> = form.children().iter().map(|c| c.key()).collect();
		assert_eq!(keys, vec!["details", "extra", "billing"]);
	}

	#[rstest]
	fn test_libraries_are_deduplicated() {
		let mut child = FormElement::new("details", ElementKind::Container);
		child.attach_library("icons");
		let mut form = FormElement::new("root", ElementKind::Form).with_child(child);
		form.attach_library("form");
		form.attach_library("form");
		form.attach_library("icons");

		assert_eq!(form.libraries(), &["form".to_string(), "icons".to_string()]);
		assert_eq!(form.all_libraries(), vec!["form", "icons"]);
	}

	#[rstest]
	fn test_get_missing_path() {
		let form = FormElement::new("root", ElementKind::Form);
		assert!(form.get(&["payment_details", "expiration"]).is_none());
		assert_eq!(form.get(&[]).map(|e| e.key()), Some("root"));
	}

	#[rstest]
	fn test_has_option() {
		let select = FormElement::select("month", vec![SelectOption::new("01", "01")]);
		assert!(select.has_option("01"));
		assert!(!select.has_option("1"));
		assert!(!FormElement::hidden("type", "visa").has_option("visa"));
	}

	#[rstest]
	fn test_serializes_kind_inline() {
		let element = FormElement::select("year", vec![SelectOption::new("2030", "30")])
			.with_title("Year")
			.with_required(true)
			.with_default_value("2030");

		assert_eq!(
			serde_json::to_value(&element).unwrap(),
			json!({
				"key": "year",
				"type": "select",
				"options": [{"value": "2030", "label": "30"}],
				"title": "Year",
				"required": true,
				"default_value": "2030",
				"weight": 0
			})
		);
	}
}
