//! Contact form schema, binding and validation

use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::http::FormData;

/// Input widget used to render a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Widget {
    Text,
    Email,
    Textarea,
    Checkbox,
}

/// Declarative description of one form field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub widget: Widget,
    pub required: bool,
    pub max_length: Option<usize>,
}

pub const NAME_MAX_LENGTH: usize = 100;

/// Contact form fields in display order
pub const CONTACT_FIELDS: [FieldSpec; 4] = [
    FieldSpec {
        name: "name",
        label: "Name",
        widget: Widget::Text,
        required: true,
        max_length: Some(NAME_MAX_LENGTH),
    },
    FieldSpec {
        name: "email",
        label: "Email",
        widget: Widget::Email,
        required: true,
        max_length: None,
    },
    FieldSpec {
        name: "message",
        label: "Message",
        widget: Widget::Textarea,
        required: true,
        max_length: None,
    },
    FieldSpec {
        name: "subscribe",
        label: "Subscribe",
        widget: Widget::Checkbox,
        required: false,
        max_length: None,
    },
];

/// Cleaned text fields before validation. `None` means missing or blank.
#[derive(Debug, Default, Validate)]
struct ContactInput {
    #[validate(
        required(message = "This field is required."),
        length(max = 100, message = "Ensure this value has at most 100 characters."),
        custom(function = "plain_text")
    )]
    name: Option<String>,
    #[validate(
        required(message = "This field is required."),
        email(message = "Enter a valid email address."),
        custom(function = "email_text")
    )]
    email: Option<String>,
    #[validate(
        required(message = "This field is required."),
        custom(function = "plain_text")
    )]
    message: Option<String>,
    subscribe: bool,
}

impl ContactInput {
    fn from_data(data: &FormData) -> Self {
        Self {
            name: clean_text(data, "name"),
            email: clean_text(data, "email"),
            message: clean_text(data, "message"),
            subscribe: checkbox_value(data.get("subscribe")),
        }
    }

    fn into_submission(self) -> Option<ContactSubmission> {
        Some(ContactSubmission {
            name: self.name?,
            email: self.email?,
            message: self.message?,
            subscribe: self.subscribe,
        })
    }
}

/// A validated contact submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub subscribe: bool,
}

/// Per-field error messages, keyed by field name
pub type FieldErrors = HashMap<&'static str, Vec<String>>;

/// Contact form, either unbound (fresh) or bound to submitted data
#[derive(Debug, Default)]
pub struct ContactForm {
    data: Option<FormData>,
    errors: FieldErrors,
    cleaned: Option<ContactSubmission>,
}

impl ContactForm {
    /// A form with no data and no errors
    pub fn unbound() -> Self {
        Self::default()
    }

    /// Bind submitted data and validate it
    pub fn bind(data: FormData) -> Self {
        let input = ContactInput::from_data(&data);
        let (errors, cleaned) = match input.validate() {
            Ok(()) => (FieldErrors::new(), input.into_submission()),
            Err(e) => (collect_errors(&e), None),
        };
        Self {
            data: Some(data),
            errors,
            cleaned,
        }
    }

    pub const fn is_bound(&self) -> bool {
        self.data.is_some()
    }

    pub const fn is_valid(&self) -> bool {
        self.cleaned.is_some()
    }

    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn field_errors(&self, name: &str) -> &[String] {
        self.errors.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub const fn cleaned_data(&self) -> Option<&ContactSubmission> {
        self.cleaned.as_ref()
    }

    /// Template-facing description of the form
    pub fn view(&self) -> FormView {
        let fields = CONTACT_FIELDS
            .iter()
            .map(|spec| {
                let raw = self.data.as_ref().and_then(|d| d.get(spec.name));
                FieldView {
                    name: spec.name,
                    label: spec.label,
                    widget: spec.widget,
                    required: spec.required,
                    max_length: spec.max_length,
                    value: match spec.widget {
                        Widget::Checkbox => String::new(),
                        _ => raw.unwrap_or_default().to_string(),
                    },
                    checked: spec.widget == Widget::Checkbox && checkbox_value(raw),
                    errors: self.field_errors(spec.name).to_vec(),
                }
            })
            .collect();

        FormView {
            is_bound: self.is_bound(),
            has_errors: !self.errors.is_empty(),
            fields,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub is_bound: bool,
    pub has_errors: bool,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub widget: Widget,
    pub required: bool,
    pub max_length: Option<usize>,
    pub value: String,
    pub checked: bool,
    pub errors: Vec<String>,
}

/// Strip surrounding whitespace; blank counts as missing
fn clean_text(data: &FormData, name: &str) -> Option<String> {
    data.get(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

const INVALID_EMAIL: &str = "Enter a valid email address.";
const NULL_CHARACTERS: &str = "Null characters are not allowed.";

fn rejected(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn plain_text(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        return Err(rejected("null_characters", NULL_CHARACTERS));
    }
    Ok(())
}

/// Text rules plus the domain shape the `email` rule lets through
///
/// The domain must be `localhost`, an address literal, or end in a dotted
/// label of 2 to 63 letters, digits or hyphens (not ending in a hyphen).
fn email_text(value: &str) -> Result<(), ValidationError> {
    plain_text(value)?;
    let Some((_, domain)) = value.rsplit_once('@') else {
        return Ok(());
    };
    if domain.eq_ignore_ascii_case("localhost") || domain.starts_with('[') {
        return Ok(());
    }
    match domain.rsplit_once('.') {
        Some((labels, tld)) if !labels.is_empty() && is_top_level_label(tld) => Ok(()),
        _ => Err(rejected("email_domain", INVALID_EMAIL)),
    }
}

fn is_top_level_label(label: &str) -> bool {
    (2..=63).contains(&label.chars().count())
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_alphanumeric() || c == '-')
}

/// Checkbox semantics: absent, empty, "false" and "0" are unchecked
fn checkbox_value(raw: Option<&str>) -> bool {
    match raw {
        None => false,
        Some(v) => {
            let v = v.trim();
            !(v.is_empty() || v.eq_ignore_ascii_case("false") || v == "0")
        }
    }
}

fn collect_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, field_errors) in errors.field_errors() {
        let field: &str = &field;
        let Some(spec) = CONTACT_FIELDS.iter().find(|f| f.name == field) else {
            continue;
        };
        let messages = out.entry(spec.name).or_default();
        for e in field_errors {
            let message = e
                .message
                .as_ref()
                .map_or_else(|| e.code.to_string(), ToString::to_string);
            // `email` and the domain check can both reject one value
            if !messages.contains(&message) {
                messages.push(message);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(pairs: &[(&str, &str)]) -> ContactForm {
        ContactForm::bind(FormData::from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn test_unbound_form() {
        let form = ContactForm::unbound();
        assert!(!form.is_bound());
        assert!(!form.is_valid());
        assert!(form.errors().is_empty());

        let view = form.view();
        assert!(!view.is_bound);
        assert!(!view.has_errors);
        assert!(view.fields.iter().all(|f| f.value.is_empty() && f.errors.is_empty()));
    }

    #[test]
    fn test_valid_submission() {
        let form = submit(&[("name", "Ada"), ("email", "ada@example.com"), ("message", "hi")]);
        assert!(form.is_bound());
        assert!(form.is_valid());
        assert_eq!(
            form.cleaned_data(),
            Some(&ContactSubmission {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                message: "hi".to_string(),
                subscribe: false,
            })
        );
    }

    #[test]
    fn test_values_are_stripped() {
        let form = submit(&[("name", "  Ada  "), ("email", " ada@example.com "), ("message", "\nhi\n")]);
        let cleaned = form.cleaned_data().unwrap();
        assert_eq!(cleaned.name, "Ada");
        assert_eq!(cleaned.email, "ada@example.com");
        assert_eq!(cleaned.message, "hi");
    }

    #[test]
    fn test_invalid_submission_reports_each_field() {
        let form = submit(&[("name", ""), ("email", "not-an-email"), ("message", "")]);
        assert!(form.is_bound());
        assert!(!form.is_valid());
        assert_eq!(form.field_errors("name"), ["This field is required."]);
        assert_eq!(form.field_errors("email"), ["Enter a valid email address."]);
        assert_eq!(form.field_errors("message"), ["This field is required."]);
        assert!(form.field_errors("subscribe").is_empty());
    }

    #[test]
    fn test_missing_fields_are_required() {
        let form = submit(&[]);
        assert_eq!(form.errors().len(), 3);
        // required suppresses the email shape check
        assert_eq!(form.field_errors("email"), ["This field is required."]);
    }

    #[test]
    fn test_blank_name_is_required() {
        let form = submit(&[("name", "   "), ("email", "ada@example.com"), ("message", "hi")]);
        assert_eq!(form.field_errors("name"), ["This field is required."]);
    }

    #[test]
    fn test_name_length_limit() {
        let at_limit = "a".repeat(NAME_MAX_LENGTH);
        let form = submit(&[("name", &at_limit), ("email", "ada@example.com"), ("message", "hi")]);
        assert!(form.is_valid());

        let too_long = "a".repeat(NAME_MAX_LENGTH + 1);
        let form = submit(&[("name", &too_long), ("email", "ada@example.com"), ("message", "hi")]);
        assert_eq!(
            form.field_errors("name"),
            ["Ensure this value has at most 100 characters."]
        );
    }

    #[test]
    fn test_name_length_counts_characters() {
        let accented = "é".repeat(NAME_MAX_LENGTH);
        let form = submit(&[("name", &accented), ("email", "ada@example.com"), ("message", "hi")]);
        assert!(form.is_valid());
    }

    #[test]
    fn test_subscribe_checkbox() {
        let base = [("name", "Ada"), ("email", "ada@example.com"), ("message", "hi")];
        for (raw, expected) in [("on", true), ("true", true), ("1", true), ("", false), ("False", false), ("0", false)] {
            let mut pairs = base.to_vec();
            pairs.push(("subscribe", raw));
            let form = submit(&pairs);
            assert_eq!(form.cleaned_data().unwrap().subscribe, expected, "subscribe={raw:?}");
        }
    }

    #[test]
    fn test_bound_view_keeps_submitted_values() {
        let form = submit(&[("name", "Ada"), ("email", "nope"), ("subscribe", "on")]);
        let view = form.view();
        assert!(view.is_bound);
        assert!(view.has_errors);

        let field = |name: &str| view.fields.iter().find(|f| f.name == name).unwrap();
        assert_eq!(field("name").value, "Ada");
        assert!(field("name").errors.is_empty());
        assert_eq!(field("email").value, "nope");
        assert_eq!(field("email").errors, ["Enter a valid email address."]);
        assert_eq!(field("message").errors, ["This field is required."]);
        assert!(field("subscribe").checked);
    }

    #[test]
    fn test_email_domain_needs_top_level_label() {
        for email in ["ada@example", "a@b.c", "ada@example.c0m-", "ada@.com"] {
            let form = submit(&[("name", "Ada"), ("email", email), ("message", "hi")]);
            assert_eq!(
                form.field_errors("email"),
                ["Enter a valid email address."],
                "email={email:?}"
            );
        }
    }

    #[test]
    fn test_email_domain_accepted_forms() {
        for email in ["ada@localhost", "ada@mail.example.co", "ada@example.museum"] {
            let form = submit(&[("name", "Ada"), ("email", email), ("message", "hi")]);
            assert!(form.is_valid(), "email={email:?}: {:?}", form.errors());
        }
    }

    #[test]
    fn test_null_characters_rejected() {
        let form = submit(&[("name", "A\0da"), ("email", "ada@example.com"), ("message", "h\0i")]);
        assert!(!form.is_valid());
        assert_eq!(form.field_errors("name"), ["Null characters are not allowed."]);
        assert_eq!(form.field_errors("message"), ["Null characters are not allowed."]);
        assert!(form.field_errors("email").is_empty());
    }

    #[test]
    fn test_field_order_and_schema() {
        let names: Vec<_> = CONTACT_FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names, ["name", "email", "message", "subscribe"]);
        assert!(!CONTACT_FIELDS[3].required);
    }
}
