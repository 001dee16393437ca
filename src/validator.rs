// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form payload validator.
//!
//! Checks run in order and stop at the first failure:
//! - `type`, `name`, `email` and `message` present and not falsy
//! - `email` shaped like `local@domain.tld`

use crate::models::{ContactSubmission, InquiryType};
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Deliberately permissive: one `@`, no whitespace, a dot in the domain part.
/// U+FEFF is listed explicitly because browsers treat it as whitespace and
/// Unicode `\s` does not.
const EMAIL_PATTERN: &str =
    r"^[^\s\x{FEFF}@]+@[^\s\x{FEFF}@]+\.[^\s\x{FEFF}@]+$";

const REQUIRED_FIELDS: [&str; 4] = ["type", "name", "email", "message"];

/// Validation error types. The display text is sent to the client verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields {
        /// Names of the fields that were absent or empty
        fields: Vec<&'static str>,
    },

    #[error("Invalid email format")]
    InvalidEmail,
}

/// Contact form validator.
#[derive(Debug, Clone)]
pub struct ContactValidator {
    email_regex: Regex,
}

impl ContactValidator {
    /// Create a new validator.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            email_regex: Regex::new(EMAIL_PATTERN)?,
        })
    }

    /// Check an email address against the accepted shape.
    pub fn is_valid_email(&self, email: &str) -> bool {
        self.email_regex.is_match(email)
    }

    /// Validate a decoded request body and build the typed submission.
    pub fn validate(&self, payload: &Value) -> Result<ContactSubmission, ValidationError> {
        let values = REQUIRED_FIELDS.map(|field| field_text(payload.get(field)));
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .iter()
            .zip(&values)
            .filter(|(_, value)| value.is_none())
            .map(|(field, _)| *field)
            .collect();

        if !missing.is_empty() {
            debug!(fields = ?missing, "Missing required fields");
            return Err(ValidationError::MissingFields { fields: missing });
        }

        let [type_label, name, email, message] = values.map(Option::unwrap_or_default);

        if !self.is_valid_email(&email) {
            debug!(email = %email, "Invalid email format");
            return Err(ValidationError::InvalidEmail);
        }

        Ok(ContactSubmission {
            inquiry_type: InquiryType::from_label(&type_label),
            type_label,
            name,
            email,
            company: field_text(payload.get("company")),
            message,
        })
    }
}

/// Text of a form field, or `None` when the field is absent or falsy.
///
/// `null`, `false`, zero and the empty string are falsy. Any other value is
/// present and converted to text the way a browser would: arrays join their
/// elements with `,` and objects become `[object Object]`.
fn field_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(browser_text(other)),
    }
}

fn browser_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(browser_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
