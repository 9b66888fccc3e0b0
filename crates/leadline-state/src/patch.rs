// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! State patches: the only write path into a conversation state.
//!
//! Handlers receive a read-only view of [`crate::ConversationState`] and
//! return a `StatePatch`; the graph runner applies patches atomically.
//! Counter fields are increments, not absolute values, so patches from one
//! turn compose without reading back intermediate state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use leadline_core::types::{
    Action, ChannelKind, CommunicationStyle, FieldKey, HandlerId, Sentiment, Stage,
};

use crate::comms_log::CommunicationAttempt;
use crate::conversation::{BookingContext, BookingDetails};

/// A set of deltas to apply to a conversation state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatePatch {
    /// Requested stage transition, validated against [`Stage::can_transition`].
    pub stage: Option<Stage>,
    /// Handler to record as current (appended to history idempotently).
    pub handler: Option<HandlerId>,
    pub next_action: Option<Action>,
    pub sentiment: Option<Sentiment>,
    pub style: Option<CommunicationStyle>,
    /// Qualification fills, applied with the fill-only-if-empty rule.
    pub qualification: Vec<(FieldKey, String)>,
    pub custom_fields: Vec<(String, String)>,
    /// Communication attempts to append, in send order.
    pub log_entries: Vec<CommunicationAttempt>,
    /// Objection texts to record (deduplicated by exact string).
    pub objections: Vec<String>,
    pub opted_out: Option<bool>,
    pub email_opted_out: Option<bool>,
    /// Result of the most recent quiet-hours check.
    pub quiet_hours_blocked: Option<bool>,
    pub compliance_checked_at: Option<DateTime<Utc>>,
    pub sms_failed: Option<bool>,
    pub email_failed: Option<bool>,
    pub last_contact: Option<(ChannelKind, DateTime<Utc>)>,
    /// Increment for total messages sent.
    pub messages_sent: u32,
    /// Increment for booking attempts.
    pub booking_attempts: u32,
    /// Increment for the no-show counter.
    pub no_shows: u32,
    /// Increment for the retry counter.
    pub retries: u32,
    pub last_error: Option<String>,
    pub clear_last_error: bool,
    pub booking_context: Option<BookingContext>,
    pub booking_details: Option<BookingDetails>,
}

impl StatePatch {
    /// A patch that only records the acting handler.
    pub fn for_handler(handler: HandlerId) -> Self {
        Self {
            handler: Some(handler),
            ..Self::default()
        }
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.next_action = Some(action);
        self
    }
}

/// A routing decision: which handler runs next, under which action, and
/// the state deltas produced by the deciding handler.
#[derive(Debug, Clone)]
pub struct Decision {
    pub next: HandlerId,
    pub action: Action,
    pub patch: StatePatch,
}

impl Decision {
    pub fn new(next: HandlerId, action: Action, patch: StatePatch) -> Self {
        Self { next, action, patch }
    }

    /// A terminal decision with no further handler.
    pub fn end(action: Action, patch: StatePatch) -> Self {
        Self {
            next: HandlerId::End,
            action,
            patch,
        }
    }
}
