// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Intake
//!
//! This crate receives contact-form submissions from the company website
//! and delivers them to a notifier:
//!
//! - Per-client cooldown (one accepted submission per 60 s by default)
//! - Required-field validation (`type`, `name`, `email`, `message`)
//! - Permissive email format validation
//! - Delivery to the service log or a transactional email API
//! - Outcome metrics in Prometheus format

pub mod config;
pub mod error;
pub mod handlers;
pub mod intake;
pub mod limiter;
pub mod metrics;
pub mod models;
pub mod notifier;
pub mod template;
pub mod validator;

pub use config::Config;
pub use error::{IntakeError, SubmissionResult};
pub use intake::ContactIntake;
pub use limiter::{RateLimitResult, RateLimiter};
pub use notifier::{EmailNotifier, LogNotifier, Notifier};
pub use validator::{ContactValidator, ValidationError};
