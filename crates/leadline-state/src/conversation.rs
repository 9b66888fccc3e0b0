// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation state record threaded through every handler.
//!
//! One `ConversationState` is live per lead. Handlers never mutate it
//! directly: they return a [`StatePatch`] and the graph runner applies it
//! through [`ConversationState::apply`], which enforces the stage
//! monotonicity and fill-only-if-empty invariants in one place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use leadline_core::types::{
    Action, CampaignId, ChannelKind, CommunicationStyle, HandlerId, LeadId, PropertyType,
    Sentiment, Stage,
};

use crate::comms_log::CommunicationLog;
use crate::patch::StatePatch;
use crate::qualification::QualificationData;

/// Snapshot of the most recent compliance evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSnapshot {
    /// Lead has opted out of all contact.
    pub opted_out: bool,
    /// Lead has opted out of email specifically.
    pub email_opted_out: bool,
    /// Whether the last quiet-hours check blocked sending.
    pub quiet_hours_blocked: Option<bool>,
    pub last_checked: Option<DateTime<Utc>>,
}

/// Status of a confirmed booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Calendar event created and confirmed.
    Scheduled,
    /// Time and contact confirmed with the lead; external event not yet created.
    PendingExternalConfirmation,
    /// Calendar creation failed; an operator must follow up manually.
    PendingManualFollowUp,
}

/// Details of a booked consultation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub scheduled_at: DateTime<Utc>,
    pub channel: Option<ChannelKind>,
    pub event_id: Option<String>,
    pub meeting_link: Option<String>,
    pub status: BookingStatus,
}

/// Which booking prompt was sent last, used to vary phrasing between turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingPrompt {
    OpenQuestionA,
    OpenQuestionB,
    ConcreteSlots,
    EmailRequest,
}

/// Pending booking sub-flow state: what the lead has confirmed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingContext {
    pub confirmed_time: Option<DateTime<Utc>>,
    /// Human phrasing of the confirmed time ("tomorrow afternoon", "2:00 PM").
    pub confirmed_time_label: Option<String>,
    pub confirmed_email: Option<String>,
    pub last_prompt: Option<BookingPrompt>,
    /// When set, a successful scheduling updates state without sending a
    /// confirmation message.
    pub suppress_confirmation: bool,
}

/// Agent-routing bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingMeta {
    pub current_handler: Option<HandlerId>,
    pub handler_history: Vec<HandlerId>,
    pub next_action: Option<Action>,
    pub last_error: Option<String>,
    pub retry_count: u32,
}

impl RoutingMeta {
    /// Record `handler` as current, appending to history unless it equals
    /// the most recent entry.
    pub fn record_handler(&mut self, handler: HandlerId) {
        self.current_handler = Some(handler);
        if self.handler_history.last() != Some(&handler) {
            self.handler_history.push(handler);
        }
    }
}

/// Conversation counters used by the escalation heuristic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub total_messages_sent: u32,
    pub booking_attempts: u32,
    pub no_show_count: u32,
    pub objections_handled: Vec<String>,
}

impl Counters {
    /// Record an objection text once (deduplicated by exact string).
    pub fn record_objection(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !self.objections_handled.contains(&text) {
            self.objections_handled.push(text);
        }
    }
}

/// The mutable record for one lead's conversation, long-lived across turns.
///
/// Created on first contact with `stage = initial`; archival and deletion
/// belong to the persistence layer, not this engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub lead_id: LeadId,
    pub lead_name: String,
    pub property_address: String,
    pub property_type: PropertyType,
    pub campaign_id: CampaignId,
    /// IANA timezone name used for quiet-hours evaluation.
    pub timezone: String,

    pub phone: Option<String>,
    pub email: Option<String>,

    stage: Stage,
    qualification: QualificationData,
    log: CommunicationLog,

    pub compliance: ComplianceSnapshot,
    pub routing: RoutingMeta,
    pub booking: BookingContext,
    pub booking_details: Option<BookingDetails>,
    pub counters: Counters,

    pub sentiment: Option<Sentiment>,
    pub style: Option<CommunicationStyle>,

    pub sms_failed: bool,
    pub email_failed: bool,
    pub last_contact_channel: Option<ChannelKind>,
    pub last_contact_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(
        lead_id: LeadId,
        lead_name: impl Into<String>,
        property_address: impl Into<String>,
        property_type: PropertyType,
        campaign_id: CampaignId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            lead_id,
            lead_name: lead_name.into(),
            property_address: property_address.into(),
            property_type,
            campaign_id,
            timezone: "America/New_York".to_string(),
            phone: None,
            email: None,
            stage: Stage::Initial,
            qualification: QualificationData::new(),
            log: CommunicationLog::new(),
            compliance: ComplianceSnapshot::default(),
            routing: RoutingMeta::default(),
            booking: BookingContext::default(),
            booking_details: None,
            counters: Counters::default(),
            sentiment: None,
            style: None,
            sms_failed: false,
            email_failed: false,
            last_contact_channel: None,
            last_contact_at: None,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn qualification(&self) -> &QualificationData {
        &self.qualification
    }

    pub fn log(&self) -> &CommunicationLog {
        &self.log
    }

    /// Apply a patch atomically.
    ///
    /// Stage requests that violate [`Stage::can_transition`] are dropped
    /// with a warning rather than applied; everything else in the patch
    /// still lands. Qualification fills go through the fill-only-if-empty
    /// rule, log entries are appended in order, and counter fields are
    /// treated as increments.
    pub fn apply(&mut self, patch: StatePatch, now: DateTime<Utc>) {
        if let Some(handler) = patch.handler {
            self.routing.record_handler(handler);
        }

        if let Some(stage) = patch.stage {
            if self.stage.can_transition(stage) {
                self.stage = stage;
            } else {
                warn!(
                    lead_id = %self.lead_id,
                    from = %self.stage,
                    to = %stage,
                    "dropping invalid stage transition"
                );
            }
        }

        if let Some(action) = patch.next_action {
            self.routing.next_action = Some(action);
        }
        if let Some(sentiment) = patch.sentiment {
            self.sentiment = Some(sentiment);
        }
        if let Some(style) = patch.style {
            self.style = Some(style);
        }

        self.qualification.fill_all(patch.qualification);
        for (key, value) in patch.custom_fields {
            self.qualification.fill_custom(key, value);
        }

        for entry in patch.log_entries {
            self.log.append(entry);
        }

        for objection in patch.objections {
            self.counters.record_objection(objection);
        }

        if let Some(opted_out) = patch.opted_out {
            self.compliance.opted_out = opted_out;
        }
        if let Some(email_opted_out) = patch.email_opted_out {
            self.compliance.email_opted_out = email_opted_out;
        }
        if let Some(blocked) = patch.quiet_hours_blocked {
            self.compliance.quiet_hours_blocked = Some(blocked);
        }
        if let Some(checked_at) = patch.compliance_checked_at {
            self.compliance.last_checked = Some(checked_at);
        }

        if let Some(sms_failed) = patch.sms_failed {
            self.sms_failed = sms_failed;
        }
        if let Some(email_failed) = patch.email_failed {
            self.email_failed = email_failed;
        }
        if let Some((channel, at)) = patch.last_contact {
            self.last_contact_channel = Some(channel);
            self.last_contact_at = Some(at);
        }

        self.counters.total_messages_sent += patch.messages_sent;
        self.counters.booking_attempts += patch.booking_attempts;
        self.counters.no_show_count += patch.no_shows;
        self.routing.retry_count += patch.retries;

        if patch.clear_last_error {
            self.routing.last_error = None;
        }
        if let Some(error) = patch.last_error {
            self.routing.last_error = Some(error);
        }

        if let Some(booking) = patch.booking_context {
            self.booking = booking;
        }
        if let Some(details) = patch.booking_details {
            self.booking_details = Some(details);
        }

        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use leadline_core::types::FieldKey;

    use crate::comms_log::CommunicationAttempt;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap()
    }

    fn state() -> ConversationState {
        ConversationState::new(
            LeadId("lead-1".into()),
            "John Smith",
            "123 Oak Street, Dallas, TX",
            PropertyType::FixFlip,
            CampaignId("camp-1".into()),
            now(),
        )
        .with_phone("+12145551234")
        .with_email("john@example.com")
    }

    #[test]
    fn new_state_starts_initial() {
        let s = state();
        assert_eq!(s.stage(), Stage::Initial);
        assert!(s.log().is_empty());
        assert_eq!(s.qualification().filled_count(), 0);
    }

    #[test]
    fn apply_advances_stage_forward() {
        let mut s = state();
        s.apply(StatePatch::default().with_stage(Stage::Qualifying), now());
        assert_eq!(s.stage(), Stage::Qualifying);
    }

    #[test]
    fn apply_drops_backward_stage_transition() {
        let mut s = state();
        s.apply(StatePatch::default().with_stage(Stage::Booking), now());
        s.apply(StatePatch::default().with_stage(Stage::Qualifying), now());
        assert_eq!(s.stage(), Stage::Booking, "backward transition must be ignored");
    }

    #[test]
    fn apply_allows_decline_from_anywhere() {
        let mut s = state();
        s.apply(StatePatch::default().with_stage(Stage::Booking), now());
        s.apply(StatePatch::default().with_stage(Stage::NotInterested), now());
        assert_eq!(s.stage(), Stage::NotInterested);
    }

    #[test]
    fn handler_history_deduplicates_consecutive() {
        let mut s = state();
        s.apply(StatePatch::for_handler(HandlerId::Supervisor), now());
        s.apply(StatePatch::for_handler(HandlerId::Supervisor), now());
        s.apply(StatePatch::for_handler(HandlerId::FixFlipSpecialist), now());
        s.apply(StatePatch::for_handler(HandlerId::Supervisor), now());
        assert_eq!(
            s.routing.handler_history,
            vec![
                HandlerId::Supervisor,
                HandlerId::FixFlipSpecialist,
                HandlerId::Supervisor
            ]
        );
    }

    #[test]
    fn qualification_fills_respect_monotonicity() {
        let mut s = state();
        let mut patch = StatePatch::default();
        patch.qualification.push((FieldKey::OccupancyStatus, "vacant".into()));
        s.apply(patch, now());

        let mut patch = StatePatch::default();
        patch.qualification.push((FieldKey::OccupancyStatus, "rented".into()));
        s.apply(patch, now());

        assert_eq!(s.qualification().get(FieldKey::OccupancyStatus), Some("vacant"));
    }

    #[test]
    fn objections_deduplicate_by_exact_text() {
        let mut s = state();
        let mut patch = StatePatch::default();
        patch.objections.push("that offer is too low".into());
        patch.objections.push("that offer is too low".into());
        s.apply(patch, now());
        assert_eq!(s.counters.objections_handled.len(), 1);
    }

    #[test]
    fn counters_accumulate_as_increments() {
        let mut s = state();
        let mut patch = StatePatch::default();
        patch.messages_sent = 1;
        patch.booking_attempts = 1;
        s.apply(patch, now());
        let mut patch = StatePatch::default();
        patch.messages_sent = 1;
        patch.retries = 1;
        s.apply(patch, now());

        assert_eq!(s.counters.total_messages_sent, 2);
        assert_eq!(s.counters.booking_attempts, 1);
        assert_eq!(s.routing.retry_count, 1);
    }

    #[test]
    fn log_entries_append_in_order() {
        let mut s = state();
        let mut patch = StatePatch::default();
        patch
            .log_entries
            .push(CommunicationAttempt::succeeded(ChannelKind::Sms, "hi", None, now()));
        patch.log_entries.push(CommunicationAttempt::failed(
            ChannelKind::Sms,
            "again",
            "rejected",
            now(),
        ));
        s.apply(patch, now());
        assert_eq!(s.log().len(), 2);
        assert!(s.log().entries()[0].success);
        assert!(!s.log().entries()[1].success);
    }

    #[test]
    fn clear_then_set_last_error() {
        let mut s = state();
        let mut patch = StatePatch::default();
        patch.last_error = Some("sms failed: timeout".into());
        s.apply(patch, now());
        assert!(s.routing.last_error.is_some());

        let mut patch = StatePatch::default();
        patch.clear_last_error = true;
        s.apply(patch, now());
        assert!(s.routing.last_error.is_none());
    }

    #[test]
    fn serde_round_trip_preserves_private_fields() {
        let mut s = state();
        let mut patch = StatePatch::default().with_stage(Stage::Qualifying);
        patch.qualification.push((FieldKey::Condition, "needs_work".into()));
        s.apply(patch, now());

        let json = serde_json::to_string(&s).unwrap();
        let back: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stage(), Stage::Qualifying);
        assert_eq!(back.qualification().get(FieldKey::Condition), Some("needs_work"));
    }
}
