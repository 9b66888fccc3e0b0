// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process [`ComplianceQuery`] implementation.
//!
//! Holds an in-memory opt-out set and a configured quiet-hours window with
//! an injected local-clock function, so every check is deterministic under
//! test. Production deployments that need a real opt-out database or
//! multi-timezone conversion supply their own `ComplianceQuery`.

use std::sync::RwLock;

use chrono::NaiveTime;

use leadline_core::ComplianceQuery;

use crate::quiet_hours::QuietHours;

/// A compliance query backed by local state.
///
/// The clock function returns the current local wall-clock time for the
/// deployment's region; the timezone argument of `is_quiet_hours` is
/// accepted for interface compatibility but the single configured window
/// applies. This mirrors the single-region setup the engine ships with.
pub struct LocalComplianceQuery {
    quiet_hours: QuietHours,
    opt_outs: RwLock<std::collections::HashSet<String>>,
    clock: Box<dyn Fn() -> NaiveTime + Send + Sync>,
}

impl LocalComplianceQuery {
    pub fn new(
        quiet_hours: QuietHours,
        clock: impl Fn() -> NaiveTime + Send + Sync + 'static,
    ) -> Self {
        Self {
            quiet_hours,
            opt_outs: RwLock::new(std::collections::HashSet::new()),
            clock: Box::new(clock),
        }
    }

    /// Add a contact address to the opt-out set.
    pub fn add_opt_out(&self, contact: &str) {
        if let Ok(mut set) = self.opt_outs.write() {
            set.insert(contact.to_string());
        }
    }

    /// Remove a contact address (re-opt-in).
    pub fn remove_opt_out(&self, contact: &str) -> bool {
        self.opt_outs
            .write()
            .map(|mut set| set.remove(contact))
            .unwrap_or(false)
    }

    /// Number of opted-out contacts, for operator reporting.
    pub fn opt_out_count(&self) -> usize {
        self.opt_outs.read().map(|set| set.len()).unwrap_or(0)
    }

    /// Operator-facing compliance report.
    pub fn report(&self) -> ComplianceReport {
        ComplianceReport {
            opt_out_count: self.opt_out_count(),
            quiet_hours_active: self.quiet_hours.blocks((self.clock)()),
            quiet_hours: self.quiet_hours,
        }
    }
}

impl ComplianceQuery for LocalComplianceQuery {
    fn is_opted_out(&self, contact: &str) -> bool {
        self.opt_outs
            .read()
            .map(|set| set.contains(contact))
            .unwrap_or(false)
    }

    fn is_quiet_hours(&self, _timezone: &str) -> bool {
        self.quiet_hours.blocks((self.clock)())
    }
}

/// Snapshot of compliance state for operator visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceReport {
    pub opt_out_count: usize,
    pub quiet_hours_active: bool,
    pub quiet_hours: QuietHours,
}
