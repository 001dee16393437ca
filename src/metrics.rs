// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for submission outcomes.

use crate::error::{IntakeError, SubmissionResult};
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

pub const OUTCOME_ACCEPTED: &str = "accepted";
pub const OUTCOME_RATE_LIMITED: &str = "rate_limited";
pub const OUTCOME_INVALID: &str = "invalid";
pub const OUTCOME_INTERNAL_ERROR: &str = "internal_error";

/// Submission counters and ledger size gauge, in a private registry.
#[derive(Clone)]
pub struct IntakeMetrics {
    registry: Registry,
    submissions: IntCounterVec,
    ledger_entries: IntGauge,
}

impl IntakeMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let submissions = IntCounterVec::new(
            Opts::new("contact_submissions_total", "Contact submissions by outcome"),
            &["outcome"],
        )?;
        let ledger_entries = IntGauge::new(
            "contact_ledger_entries",
            "Clients currently tracked by the cooldown ledger",
        )?;

        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(ledger_entries.clone()))?;

        Ok(Self {
            registry,
            submissions,
            ledger_entries,
        })
    }

    /// Count one submission under its outcome label.
    pub fn record(&self, result: &SubmissionResult) {
        self.submissions.with_label_values(&[outcome_label(result)]).inc();
    }

    pub fn set_ledger_entries(&self, entries: usize) {
        self.ledger_entries.set(i64::try_from(entries).unwrap_or(i64::MAX));
    }

    /// Current count for an outcome label.
    pub fn count(&self, outcome: &str) -> u64 {
        self.submissions.with_label_values(&[outcome]).get()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn outcome_label(result: &SubmissionResult) -> &'static str {
    match result {
        Ok(()) => OUTCOME_ACCEPTED,
        Err(IntakeError::RateLimited { .. }) => OUTCOME_RATE_LIMITED,
        Err(IntakeError::Validation(_)) => OUTCOME_INVALID,
        Err(IntakeError::Internal(_)) => OUTCOME_INTERNAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::ValidationError;
    use std::time::Duration;

    #[test]
    fn test_record_outcomes() {
        let metrics = IntakeMetrics::new().unwrap();

        metrics.record(&Ok(()));
        metrics.record(&Ok(()));
        metrics.record(&Err(IntakeError::RateLimited {
            retry_after: Duration::from_secs(1),
        }));
        metrics.record(&Err(ValidationError::InvalidEmail.into()));

        assert_eq!(metrics.count(OUTCOME_ACCEPTED), 2);
        assert_eq!(metrics.count(OUTCOME_RATE_LIMITED), 1);
        assert_eq!(metrics.count(OUTCOME_INVALID), 1);
        assert_eq!(metrics.count(OUTCOME_INTERNAL_ERROR), 0);
    }

    #[test]
    fn test_render_text_format() {
        let metrics = IntakeMetrics::new().unwrap();
        metrics.record(&Err(IntakeError::Internal("boom".to_string())));
        metrics.set_ledger_entries(3);

        let text = metrics.render().unwrap();
        assert!(text.contains("contact_submissions_total{outcome=\"internal_error\"} 1"));
        assert!(text.contains("contact_ledger_entries 3"));
    }
}
