// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! The contact submission pipeline.
//!
//! A submission passes through, in order:
//!
//! 1. the per-client cooldown, which charges the client's slot as soon as it
//!    is admitted, before the payload is inspected
//! 2. required-field validation
//! 3. email format validation
//! 4. dispatch to the configured [`Notifier`]
//!
//! The first failing step decides the result.

use crate::error::{IntakeError, SubmissionResult};
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::notifier::Notifier;
use crate::validator::ContactValidator;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Validates, rate-limits and dispatches contact submissions.
pub struct ContactIntake {
    limiter: RateLimiter,
    validator: ContactValidator,
    notifier: Arc<dyn Notifier>,
}

impl ContactIntake {
    pub fn new(limiter: RateLimiter, validator: ContactValidator, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            limiter,
            validator,
            notifier,
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Process one submission.
    ///
    /// `body` is the raw request body, `client_id` the rate-limiting key and
    /// `now_ms` the current time in milliseconds since the Unix epoch.
    pub async fn submit(&self, body: &[u8], client_id: &str, now_ms: i64) -> SubmissionResult {
        if let RateLimitResult::Limited { retry_after } =
            self.limiter.check_and_charge(client_id, now_ms).await
        {
            info!(
                client_id,
                retry_after_ms = u64::try_from(retry_after.as_millis()).unwrap_or(u64::MAX),
                "Submission rate limited"
            );
            return Err(IntakeError::RateLimited { retry_after });
        }

        let payload: Value = serde_json::from_slice(body).map_err(|err| {
            error!(client_id, error = %err, "Failed to decode submission body");
            IntakeError::Internal(format!("malformed request body: {err}"))
        })?;

        if payload.is_null() {
            error!(client_id, "Submission body is null");
            return Err(IntakeError::Internal("request body is null".to_string()));
        }

        let submission = self.validator.validate(&payload).map_err(|err| {
            warn!(client_id, error = %err, "Submission failed validation");
            IntakeError::from(err)
        })?;

        debug!(client_id, inquiry_type = %submission.inquiry_type, "Dispatching submission");

        self.notifier.notify(&submission).await.map_err(|err| {
            error!(client_id, error = %err, "Notification delivery failed");
            IntakeError::Internal(err.to_string())
        })?;

        info!(client_id, inquiry_type = %submission.type_label, "Submission accepted");
        Ok(())
    }
}
