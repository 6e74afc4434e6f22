//! Public forms
//!
//! Server-side validation for the contact, careers and export request
//! forms. Validated input becomes the submission record sent to the content
//! API; invalid input yields per-field i18n error keys.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::content::{CareerApplication, ContactMessage, ExportRequest};

/// Field name -> i18n key of the problem with it
pub type FormErrors = BTreeMap<String, &'static str>;

/// Submitted form values keyed by field name
pub type FormValues = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Widget {
    Text,
    Email,
    Tel,
    Textarea,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FormField {
    pub name: &'static str,
    /// i18n key of the label
    pub label: &'static str,
    pub widget: Widget,
    pub required: bool,
    pub max_len: usize,
}

const fn field(
    name: &'static str,
    label: &'static str,
    widget: Widget,
    required: bool,
    max_len: usize,
) -> FormField {
    FormField {
        name,
        label,
        widget,
        required,
        max_len,
    }
}

pub const CONTACT_FIELDS: &[FormField] = &[
    field("name", "form_name", Widget::Text, true, 120),
    field("email", "form_email", Widget::Email, true, 200),
    field("phone", "form_phone", Widget::Tel, false, 40),
    field("subject", "form_subject", Widget::Text, true, 200),
    field("message", "form_message", Widget::Textarea, true, 5000),
];

pub const CAREER_FIELDS: &[FormField] = &[
    field("full_name", "form_full_name", Widget::Text, true, 120),
    field("email", "form_email", Widget::Email, true, 200),
    field("phone", "form_phone", Widget::Tel, true, 40),
    field("position", "form_position", Widget::Text, true, 120),
    field("message", "form_message", Widget::Textarea, false, 5000),
];

pub const EXPORT_FIELDS: &[FormField] = &[
    field("company", "form_company", Widget::Text, true, 200),
    field("contact_name", "form_contact_name", Widget::Text, true, 120),
    field("email", "form_email", Widget::Email, true, 200),
    field("phone", "form_phone", Widget::Tel, false, 40),
    field("country", "form_country", Widget::Text, true, 80),
    field("products", "form_products", Widget::Textarea, true, 2000),
    field("quantity", "form_quantity", Widget::Text, false, 120),
    field("message", "form_message", Widget::Textarea, false, 5000),
];

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().map_or(false, |re| re.is_match(value))
}

/// Check `values` against `fields`
pub fn validate(fields: &[FormField], values: &FormValues) -> FormErrors {
    let mut errors = FormErrors::new();
    for field in fields {
        let value = values.get(field.name).map(|v| v.trim()).unwrap_or_default();
        let problem = if value.is_empty() {
            field.required.then_some("form_required")
        } else if value.chars().count() > field.max_len {
            Some("form_too_long")
        } else if field.widget == Widget::Email && !is_valid_email(value) {
            Some("form_invalid_email")
        } else {
            None
        };
        if let Some(key) = problem {
            errors.insert(field.name.to_string(), key);
        }
    }
    errors
}

fn take(values: &FormValues, name: &str) -> String {
    values.get(name).map(|v| v.trim().to_string()).unwrap_or_default()
}

pub fn contact(values: &FormValues) -> Result<ContactMessage, FormErrors> {
    let errors = validate(CONTACT_FIELDS, values);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ContactMessage {
        id: None,
        name: take(values, "name"),
        email: take(values, "email"),
        phone: take(values, "phone"),
        subject: take(values, "subject"),
        message: take(values, "message"),
    })
}

pub fn career(values: &FormValues, cv_url: Option<String>) -> Result<CareerApplication, FormErrors> {
    let errors = validate(CAREER_FIELDS, values);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(CareerApplication {
        id: None,
        full_name: take(values, "full_name"),
        email: take(values, "email"),
        phone: take(values, "phone"),
        position: take(values, "position"),
        message: take(values, "message"),
        cv_url,
    })
}

pub fn export_request(values: &FormValues) -> Result<ExportRequest, FormErrors> {
    let errors = validate(EXPORT_FIELDS, values);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ExportRequest {
        id: None,
        company: take(values, "company"),
        contact_name: take(values, "contact_name"),
        email: take(values, "email"),
        phone: take(values, "phone"),
        country: take(values, "country"),
        products: take(values, "products"),
        quantity: take(values, "quantity"),
        message: take(values, "message"),
    })
}
