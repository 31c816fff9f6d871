use chrono::NaiveDate;

use super::domain::{FieldSet, FieldValue};
use super::schema::{FieldKind, FormSchema};

/// Constraint violations found when a submission is checked against its
/// schema. Messages are user-facing; the session prefixes the resubmit hint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{label} is required")]
    MissingRequired { label: String },
    #[error("{label} must be a valid email address")]
    InvalidEmail { label: String },
    #[error("{label} must be a date in YYYY-MM-DD format")]
    InvalidDate { label: String },
    #[error("{label} must be one of the listed options")]
    UnknownChoice { label: String },
    #[error("{label} must be accepted")]
    ConsentRequired { label: String },
}

/// Check a field set against its schema's required-field and format
/// constraints. Validation runs only at submit time; the first violation in
/// schema order ends the check.
pub fn validate(schema: &FormSchema, fields: &FieldSet) -> Result<(), ValidationError> {
    for spec in &schema.fields {
        let value = fields.get(&spec.name);

        if let FieldKind::Checkbox = spec.kind {
            let checked = value.and_then(FieldValue::as_flag).unwrap_or(false);
            if spec.required && !checked {
                return Err(ValidationError::ConsentRequired {
                    label: spec.label.clone(),
                });
            }
            continue;
        }

        let text = value.and_then(FieldValue::as_text).unwrap_or("").trim();

        if text.is_empty() {
            if spec.required {
                return Err(ValidationError::MissingRequired {
                    label: spec.label.clone(),
                });
            }
            continue;
        }

        match &spec.kind {
            FieldKind::Email if !is_valid_email(text) => {
                return Err(ValidationError::InvalidEmail {
                    label: spec.label.clone(),
                });
            }
            FieldKind::Date if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err() => {
                return Err(ValidationError::InvalidDate {
                    label: spec.label.clone(),
                });
            }
            FieldKind::Choice { options }
                if !options.iter().any(|option| option.value == text) =>
            {
                return Err(ValidationError::UnknownChoice {
                    label: spec.label.clone(),
                });
            }
            _ => {}
        }
    }

    Ok(())
}

/// Syntactic email check: one `@`, a non-empty local part, and a dotted
/// domain. Deliverability is the intake endpoint's problem.
pub(crate) fn is_valid_email(raw: &str) -> bool {
    if raw.contains(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
