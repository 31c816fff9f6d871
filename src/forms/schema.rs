use serde::Serialize;

use super::domain::{FieldSet, FieldValue};

/// One selectable option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Input kind of a field, driving both rendering hints and submit-time
/// format validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FieldKind {
    Text,
    MultiLine,
    Email,
    Phone,
    /// Calendar date entered as `YYYY-MM-DD`.
    Date,
    Choice { options: Vec<ChoiceOption> },
    Checkbox,
}

/// Static description of one form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
        }
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn multi_line(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::MultiLine)
    }

    pub fn email(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    pub fn phone(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Phone)
    }

    pub fn date(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub fn choice(name: &str, label: &str, options: Vec<ChoiceOption>) -> Self {
        Self::new(name, label, FieldKind::Choice { options })
    }

    pub fn checkbox(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Checkbox)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value this field holds before the user touches it.
    pub fn initial_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Checkbox => FieldValue::Flag(false),
            _ => FieldValue::Text(String::new()),
        }
    }

    pub const fn expects_flag(&self) -> bool {
        matches!(self.kind, FieldKind::Checkbox)
    }
}

/// Immutable description of one form: its fields, constraints, and the fixed
/// metadata the intake endpoint expects alongside every submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    pub slug: String,
    /// Routing subject line sent with every submission of this form.
    pub subject: String,
    /// Per-deployment credential for the intake endpoint.
    pub access_key: String,
    /// Confirmation shown to the user after the endpoint accepts a payload.
    pub success_message: String,
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Snapshot used at mount time and again after a successful submission.
    pub fn initial_fields(&self) -> FieldSet {
        let mut fields = FieldSet::default();
        for spec in &self.fields {
            fields.seed(spec.name.clone(), spec.initial_value());
        }
        fields
    }
}
