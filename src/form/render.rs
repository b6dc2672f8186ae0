//! HTML rendering of form element trees

use super::element::{ElementKind, FormElement};
use crate::billing::ProfileSelect;
use crate::error::FormResult;
use std::collections::BTreeMap;
use tera::{Context, Tera};

/// Escapes text for use in HTML content and attribute values.
///
/// # Examples
///
/// ```
/// use payment_method_form::form::escape_html;
///
/// assert_eq!(escape_html("<b>\"Tom\" & 'Jerry'</b>"),
///     "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
	let mut escaped = String::with_capacity(input.len());
	for c in input.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#x27;"),
			_ => escaped.push(c),
		}
	}
	escaped
}

/// Renders an element tree as HTML.
///
/// Value names follow the bracketed path convention, e.g.
/// `payment_method[payment_details][expiration][month]`.
///
/// Fails when an inline template does not parse or render.
pub fn render_html(element: &FormElement) -> FormResult<String> {
	let mut html = String::new();
	let base: Vec<&str> = element.parents().iter().map(String::as_str).collect();
	render_children(element, &base, &mut html)?;
	Ok(html)
}

fn render_children(element: &FormElement, path: &[&str], html: &mut String) -> FormResult<()> {
	for child in element.children() {
		let mut child_path = path.to_vec();
		child_path.push(child.key());
		render_element(child, &child_path, html)?;
	}
	Ok(())
}

/// Renders an inline template with Tera, escaping every context value.
///
/// # Examples
///
/// ```
/// use payment_method_form::form::render_inline_template;
/// use std::collections::BTreeMap;
///
/// let mut context = BTreeMap::new();
/// context.insert("label".to_string(), "<b>Visa</b>".to_string());
/// assert_eq!(
///     render_inline_template("{{ label }}", &context).unwrap(),
///     "&lt;b&gt;Visa&lt;&#x2F;b&gt;"
/// );
/// ```
pub fn render_inline_template(
	template: &str,
	context: &BTreeMap<String, String>,
) -> FormResult<String> {
	let context = Context::from_serialize(context)?;
	Ok(Tera::one_off(template, &context, true)?)
}

fn render_element(element: &FormElement, path: &[&str], html: &mut String) -> FormResult<()> {
	let name = html_name(path);
	let id = html_id(path);
	match element.kind() {
		ElementKind::Form | ElementKind::Container => {
			html.push_str(&format!("<div{}>", class_attribute(element.classes())));
			render_children(element, path, html)?;
			html.push_str("</div>");
		}
		ElementKind::Select { options } => {
			html.push_str("<div class=\"form-item\">");
			if let Some(title) = element.title() {
				html.push_str(&format!(
					"<label for=\"{}\">{}</label>",
					escape_html(&id),
					escape_html(title)
				));
			}
			html.push_str(&format!(
				"<select id=\"{}\" name=\"{}\"{}>",
				escape_html(&id),
				escape_html(&name),
				if element.is_required() { " required" } else { "" }
			));
			for option in options {
				let selected = element.default_value() == Some(option.value.as_str());
				html.push_str(&format!(
					"<option value=\"{}\"{}>{}</option>",
					escape_html(&option.value),
					if selected { " selected" } else { "" },
					escape_html(&option.label)
				));
			}
			html.push_str("</select></div>");
		}
		ElementKind::Hidden { value } => {
			html.push_str(&format!(
				"<input type=\"hidden\" name=\"{}\" value=\"{}\" />",
				escape_html(&name),
				escape_html(value)
			));
		}
		ElementKind::InlineTemplate { template, context } => {
			html.push_str(&render_inline_template(template, context)?);
		}
		ElementKind::Item { markup } => {
			html.push_str("<div class=\"form-item\">");
			html.push_str(markup);
			html.push_str("</div>");
		}
		ElementKind::ProfileSelect(widget) => render_profile_select(widget, &name, &id, html),
	}
	Ok(())
}

fn render_profile_select(widget: &ProfileSelect, name: &str, id: &str, html: &mut String) {
	let address = widget.default_value.as_ref().map(|profile| &profile.address);
	let selected_country = address
		.map(|address| &address.country_code)
		.or(widget.default_country.as_ref());

	html.push_str(&format!("<fieldset id=\"{}\">", escape_html(id)));

	let country_name = format!("{}[address][country_code]", name);
	if widget.available_countries.is_empty() {
		html.push_str(&format!(
			"<input type=\"text\" name=\"{}\" value=\"{}\" required />",
			escape_html(&country_name),
			selected_country.map(|c| c.as_str()).unwrap_or_default()
		));
	} else {
		html.push_str(&format!(
			"<select name=\"{}\" required>",
			escape_html(&country_name)
		));
		for country in &widget.available_countries {
			let selected = selected_country == Some(country);
			html.push_str(&format!(
				"<option value=\"{0}\"{1}>{0}</option>",
				country.as_str(),
				if selected { " selected" } else { "" }
			));
		}
		html.push_str("</select>");
	}

	let fields = [
		("given_name", address.map(|a| a.given_name.as_str())),
		("family_name", address.map(|a| a.family_name.as_str())),
		("address_line1", address.map(|a| a.address_line1.as_str())),
		("locality", address.map(|a| a.locality.as_str())),
		("postal_code", address.map(|a| a.postal_code.as_str())),
	];
	for (field, value) in fields {
		html.push_str(&format!(
			"<input type=\"text\" name=\"{}[address][{}]\" value=\"{}\" />",
			escape_html(name),
			field,
			escape_html(value.unwrap_or_default())
		));
	}
	html.push_str("</fieldset>");
}

fn html_name(path: &[&str]) -> String {
	match path.split_first() {
		Some((first, rest)) => {
			let mut name = first.to_string();
			for key in rest {
				name.push_str(&format!("[{}]", key));
			}
			name
		}
		None => String::new(),
	}
}

fn html_id(path: &[&str]) -> String {
	format!("edit-{}", path.join("-").replace('_', "-"))
}

fn class_attribute(classes: &[String]) -> String {
	if classes.is_empty() {
		String::new()
	} else {
		format!(" class=\"{}\"", escape_html(&classes.join(" ")))
	}
}
