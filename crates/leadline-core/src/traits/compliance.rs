// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compliance lookup capability.

/// Compliance inputs the engine consumes but does not compute.
///
/// Opt-out membership and quiet-hours evaluation live with the caller
/// (the opt-out list is persisted outside this engine; quiet hours need a
/// wall clock and timezone database). The engine only evaluates predicates
/// over these answers. Per-lead send counts are derived from the
/// conversation's own communication log, not from this capability.
pub trait ComplianceQuery: Send + Sync {
    /// Whether a contact address (phone or email) is on the opt-out list.
    fn is_opted_out(&self, contact: &str) -> bool;

    /// Whether the current wall-clock time falls in the quiet-hours window
    /// for the given IANA timezone name.
    fn is_quiet_hours(&self, timezone: &str) -> bool;
}
