// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Data types shared by the intake pipeline and the notifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inquiry categories offered by the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryType {
    General,
    Service,
    Partnership,
}

impl InquiryType {
    /// Map a form label to an inquiry type.
    ///
    /// The endpoint accepts any non-empty label; labels the form does not
    /// produce fall back to [`InquiryType::General`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "service" => Self::Service,
            "partnership" => Self::Partnership,
            _ => Self::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Service => "service",
            Self::Partnership => "partnership",
        }
    }
}

impl fmt::Display for InquiryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Site locales. Selects the language of outgoing notification emails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ko,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" => Ok(Self::Ko),
            "en" => Ok(Self::En),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// A contact submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub inquiry_type: InquiryType,
    /// The `type` value exactly as submitted.
    pub type_label: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
}

impl ContactSubmission {
    /// Company name, or `-` when none was given.
    pub fn company_or_dash(&self) -> &str {
        self.company.as_deref().unwrap_or("-")
    }
}
