// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The pre-contact compliance gate.
//!
//! A compliance violation is not an error: it is a normal decision outcome
//! that blocks sending and routes the turn to its end or to an alternate
//! channel.

use leadline_core::ComplianceQuery;

/// Outcome of a compliance evaluation for a contact attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceOutcome {
    pub compliant: bool,
    pub quiet_hours_blocked: bool,
    pub opted_out: bool,
    pub reason: &'static str,
}

impl ComplianceOutcome {
    fn passed() -> Self {
        Self {
            compliant: true,
            quiet_hours_blocked: false,
            opted_out: false,
            reason: "all checks passed",
        }
    }
}

/// Evaluates quiet-hours and opt-out predicates over a [`ComplianceQuery`].
///
/// Daily contact caps and failure cooldowns are per-channel concerns and
/// live with the channel router, which also reads the communication log.
pub struct ComplianceGate<'a> {
    query: &'a dyn ComplianceQuery,
}

impl<'a> ComplianceGate<'a> {
    pub fn new(query: &'a dyn ComplianceQuery) -> Self {
        Self { query }
    }

    /// Full pre-contact check across both contact addresses.
    ///
    /// `bypass_quiet_hours` is set for inbound-reply turns: a lead who just
    /// texted us should get an answer even inside the quiet window.
    pub fn check_contact(
        &self,
        phone: Option<&str>,
        email: Option<&str>,
        timezone: &str,
        bypass_quiet_hours: bool,
    ) -> ComplianceOutcome {
        let opted_out = phone.is_some_and(|p| self.query.is_opted_out(p))
            || email.is_some_and(|e| self.query.is_opted_out(e));
        if opted_out {
            return ComplianceOutcome {
                compliant: false,
                quiet_hours_blocked: false,
                opted_out: true,
                reason: "contact has opted out",
            };
        }

        let quiet = !bypass_quiet_hours && self.query.is_quiet_hours(timezone);
        if quiet {
            return ComplianceOutcome {
                compliant: false,
                quiet_hours_blocked: true,
                opted_out: false,
                reason: "inside quiet hours",
            };
        }

        ComplianceOutcome::passed()
    }

    /// Opt-out check for a single address.
    pub fn is_opted_out(&self, contact: &str) -> bool {
        self.query.is_opted_out(contact)
    }

    /// Quiet-hours check for a timezone.
    pub fn is_quiet_hours(&self, timezone: &str) -> bool {
        self.query.is_quiet_hours(timezone)
    }
}
