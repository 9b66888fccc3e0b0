// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quiet-hours window evaluation.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use leadline_core::LeadlineError;

/// A local-time window during which outbound contact is blocked.
///
/// The window may span midnight (the default TCPA-style window of
/// 21:00-08:00 does). Evaluation is a pure function of a local wall-clock
/// time; converting "now" into the lead's local time is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl QuietHours {
    /// Parse a window from `HH:MM` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, LeadlineError> {
        let parse = |s: &str| {
            NaiveTime::parse_from_str(s, "%H:%M")
                .map_err(|e| LeadlineError::Config(format!("invalid quiet-hours time `{s}`: {e}")))
        };
        Ok(Self {
            start: parse(start)?,
            end: parse(end)?,
        })
    }

    /// Whether `local_now` falls inside the blocked window.
    pub fn blocks(&self, local_now: NaiveTime) -> bool {
        if self.start > self.end {
            // Window spans midnight, e.g. 21:00 -> 08:00.
            local_now >= self.start || local_now <= self.end
        } else {
            self.start <= local_now && local_now <= self.end
        }
    }
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(21, 0, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
        }
    }
}
