// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Leadline outreach engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, producing actionable errors.

use serde::{Deserialize, Serialize};

/// Top-level Leadline configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LeadlineConfig {
    /// Outreach assistant identity used when rendering message templates.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Quiet hours and timezone settings.
    #[serde(default)]
    pub compliance: ComplianceConfig,

    /// Per-channel caps and failure cooldowns.
    #[serde(default)]
    pub channels: ChannelPolicyConfig,

    /// Booking sub-flow settings.
    #[serde(default)]
    pub booking: BookingConfig,
}

/// Assistant identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in outbound messages.
    #[serde(default = "default_agent_name")]
    pub agent_name: String,

    /// Company name used in outbound messages.
    #[serde(default = "default_company_name")]
    pub company_name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent_name: default_agent_name(),
            company_name: default_company_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "Derek".to_string()
}

fn default_company_name() -> String {
    "Real Estate Solutions Team".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Quiet hours and default-timezone configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ComplianceConfig {
    /// Start of the quiet-hours window, local time `HH:MM`.
    #[serde(default = "default_quiet_start")]
    pub quiet_hours_start: String,

    /// End of the quiet-hours window, local time `HH:MM`.
    #[serde(default = "default_quiet_end")]
    pub quiet_hours_end: String,

    /// Default IANA timezone for leads without one.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            quiet_hours_start: default_quiet_start(),
            quiet_hours_end: default_quiet_end(),
            timezone: default_timezone(),
        }
    }
}

fn default_quiet_start() -> String {
    "21:00".to_string()
}

fn default_quiet_end() -> String {
    "08:00".to_string()
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}

/// Per-channel daily caps and failure cooldowns.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelPolicyConfig {
    /// Maximum SMS messages per lead per calendar day.
    #[serde(default = "default_sms_daily_cap")]
    pub sms_daily_cap: usize,

    /// Maximum emails per lead per calendar day.
    #[serde(default = "default_email_daily_cap")]
    pub email_daily_cap: usize,

    /// Hours to back off SMS after a failed delivery.
    #[serde(default = "default_sms_cooldown")]
    pub sms_failure_cooldown_hours: i64,

    /// Hours to back off email after a failed delivery.
    #[serde(default = "default_email_cooldown")]
    pub email_failure_cooldown_hours: i64,
}

impl Default for ChannelPolicyConfig {
    fn default() -> Self {
        Self {
            sms_daily_cap: default_sms_daily_cap(),
            email_daily_cap: default_email_daily_cap(),
            sms_failure_cooldown_hours: default_sms_cooldown(),
            email_failure_cooldown_hours: default_email_cooldown(),
        }
    }
}

fn default_sms_daily_cap() -> usize {
    5
}

fn default_email_daily_cap() -> usize {
    3
}

fn default_sms_cooldown() -> i64 {
    24
}

fn default_email_cooldown() -> i64 {
    6
}

/// Booking sub-flow configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    /// Consultation call length in minutes.
    #[serde(default = "default_meeting_duration")]
    pub meeting_duration_minutes: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            meeting_duration_minutes: default_meeting_duration(),
        }
    }
}

fn default_meeting_duration() -> u32 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_policy() {
        let config = LeadlineConfig::default();
        assert_eq!(config.agent.agent_name, "Derek");
        assert_eq!(config.channels.sms_daily_cap, 5);
        assert_eq!(config.channels.email_daily_cap, 3);
        assert_eq!(config.channels.sms_failure_cooldown_hours, 24);
        assert_eq!(config.channels.email_failure_cooldown_hours, 6);
        assert_eq!(config.compliance.quiet_hours_start, "21:00");
        assert_eq!(config.booking.meeting_duration_minutes, 15);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let toml_str = r#"
[channels]
sms_daily_cap = 4
surprise_knob = true
"#;
        assert!(toml::from_str::<LeadlineConfig>(toml_str).is_err());
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let toml_str = r#"
[agent]
agent_name = "Dana"

[channels]
sms_daily_cap = 2
"#;
        let config: LeadlineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.agent.agent_name, "Dana");
        assert_eq!(config.agent.company_name, "Real Estate Solutions Team");
        assert_eq!(config.channels.sms_daily_cap, 2);
        assert_eq!(config.channels.email_daily_cap, 3);
    }
}
