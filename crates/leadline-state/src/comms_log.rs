// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only communication attempt log.
//!
//! The log is the source of truth for per-day send counts and
//! failed-recently checks. Entries are appended in send-attempt order and
//! never edited or removed; cap and cooldown checks read the log as of the
//! start of the current turn.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use leadline_core::types::ChannelKind;

/// A single outbound delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationAttempt {
    pub channel: ChannelKind,
    pub timestamp: DateTime<Utc>,
    pub body: String,
    pub success: bool,
    pub provider_message_id: Option<String>,
    pub error: Option<String>,
}

impl CommunicationAttempt {
    /// A successful attempt with the provider's message id.
    pub fn succeeded(
        channel: ChannelKind,
        body: impl Into<String>,
        provider_message_id: Option<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            channel,
            timestamp: at,
            body: body.into(),
            success: true,
            provider_message_id,
            error: None,
        }
    }

    /// A failed attempt with the transport's error text.
    pub fn failed(
        channel: ChannelKind,
        body: impl Into<String>,
        error: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            channel,
            timestamp: at,
            body: body.into(),
            success: false,
            provider_message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Ordered, append-only sequence of delivery attempts for one lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationLog {
    entries: Vec<CommunicationAttempt>,
}

impl CommunicationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attempt. There is no removal API.
    pub fn append(&mut self, attempt: CommunicationAttempt) {
        self.entries.push(attempt);
    }

    pub fn entries(&self) -> &[CommunicationAttempt] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&CommunicationAttempt> {
        self.entries.last()
    }

    /// Number of attempts on `channel` whose timestamp falls on the same
    /// calendar day as `now`.
    pub fn sent_today(&self, channel: ChannelKind, now: DateTime<Utc>) -> usize {
        let today = now.date_naive();
        self.entries
            .iter()
            .filter(|a| a.channel == channel && a.timestamp.date_naive() == today)
            .count()
    }

    /// Number of attempts on `channel` across the whole log.
    pub fn attempts_on(&self, channel: ChannelKind) -> usize {
        self.entries.iter().filter(|a| a.channel == channel).count()
    }

    /// Whether `channel` has a failed attempt within `window` of `now`.
    pub fn failed_within(&self, channel: ChannelKind, window: TimeDelta, now: DateTime<Utc>) -> bool {
        let cutoff = now - window;
        self.entries
            .iter()
            .any(|a| a.channel == channel && !a.success && a.timestamp > cutoff)
    }
}
