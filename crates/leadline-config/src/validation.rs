// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as parseable quiet-hours times and positive caps.

use leadline_compliance::QuietHours;
use leadline_core::LeadlineError;

use crate::model::LeadlineConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<LeadlineError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &LeadlineConfig) -> Result<(), Vec<LeadlineError>> {
    let mut errors = Vec::new();

    if config.agent.agent_name.trim().is_empty() {
        errors.push(LeadlineError::Config(
            "agent.agent_name must not be empty".to_string(),
        ));
    }

    if let Err(e) = QuietHours::parse(
        &config.compliance.quiet_hours_start,
        &config.compliance.quiet_hours_end,
    ) {
        errors.push(e);
    }

    if config.compliance.timezone.trim().is_empty() {
        errors.push(LeadlineError::Config(
            "compliance.timezone must not be empty".to_string(),
        ));
    }

    if config.channels.sms_daily_cap == 0 {
        errors.push(LeadlineError::Config(
            "channels.sms_daily_cap must be at least 1".to_string(),
        ));
    }

    if config.channels.email_daily_cap == 0 {
        errors.push(LeadlineError::Config(
            "channels.email_daily_cap must be at least 1".to_string(),
        ));
    }

    if config.channels.sms_failure_cooldown_hours < 0 {
        errors.push(LeadlineError::Config(format!(
            "channels.sms_failure_cooldown_hours must be non-negative, got {}",
            config.channels.sms_failure_cooldown_hours
        )));
    }

    if config.channels.email_failure_cooldown_hours < 0 {
        errors.push(LeadlineError::Config(format!(
            "channels.email_failure_cooldown_hours must be non-negative, got {}",
            config.channels.email_failure_cooldown_hours
        )));
    }

    if config.booking.meeting_duration_minutes == 0 {
        errors.push(LeadlineError::Config(
            "booking.meeting_duration_minutes must be at least 1".to_string(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
