// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The booking agent: consultation-call scheduling sub-flow.
//!
//! State machine over `{confirmed_time, confirmed_email}` in the booking
//! context. Once both are known, the external calendar event is attempted;
//! calendar failure degrades to a verbal confirmation with a
//! pending-manual-follow-up booking rather than failing the turn.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{info, warn};

use leadline_config::{AgentConfig, BookingConfig};
use leadline_core::types::{Action, EventRequest, HandlerId, PropertyType, Stage};
use leadline_core::CalendarService;
use leadline_state::{
    BookingContext, BookingDetails, BookingPrompt, BookingStatus, ConversationState, StatePatch,
};

use crate::timeparse::{
    format_slot, is_affirmative_only, parse_email, parse_time_selection,
};

/// A booking agent response for one turn.
#[derive(Debug)]
pub struct BookingTurn {
    /// Outbound message, absent for silent scheduling.
    pub body: Option<String>,
    pub patch: StatePatch,
    pub action: Action,
}

/// Consultation-type display names per property type.
fn meeting_type(property_type: PropertyType) -> &'static str {
    match property_type {
        PropertyType::FixFlip => "Property Consultation - Fix & Flip",
        PropertyType::VacantLand => "Land Consultation - 15 Minutes",
        PropertyType::LongTermRental => "Rental Property Consultation",
    }
}

/// Schedules consultation calls through an injected calendar service.
pub struct BookingAgent {
    calendar: Arc<dyn CalendarService>,
    identity: AgentConfig,
    config: BookingConfig,
}

impl BookingAgent {
    pub fn new(
        calendar: Arc<dyn CalendarService>,
        identity: AgentConfig,
        config: BookingConfig,
    ) -> Self {
        Self {
            calendar,
            identity,
            config,
        }
    }

    /// Run one booking turn.
    ///
    /// With a confirmed time and a contact email already in context, the
    /// calendar event is attempted directly without re-asking anything.
    /// Otherwise the inbound text is parsed for a time expression and an
    /// email address, and the reply advances whichever half is missing.
    pub async fn handle(
        &self,
        state: &ConversationState,
        inbound: Option<&str>,
        now: DateTime<Utc>,
    ) -> BookingTurn {
        let mut patch = StatePatch::for_handler(HandlerId::BookingAgent);
        patch.booking_attempts = 1;

        let mut context = state.booking.clone();

        // Absorb any new information from the inbound message first.
        if let Some(text) = inbound {
            if let Some(email) = parse_email(text) {
                if context.confirmed_email.is_none() {
                    context.confirmed_email = Some(email);
                }
            }
            if context.confirmed_time.is_none()
                && let Some(selection) = parse_time_selection(text, now)
            {
                context.confirmed_time = Some(selection.at);
                context.confirmed_time_label = Some(selection.label);
            }
        }

        let contact_email = context
            .confirmed_email
            .clone()
            .or_else(|| state.email.clone());

        if let (Some(at), Some(email)) = (context.confirmed_time, contact_email.clone()) {
            return self.schedule(state, &mut patch, context, at, &email, now).await;
        }

        // Not enough to schedule yet: figure out what to ask for.
        let Some(text) = inbound else {
            return self.offer_slots(state, patch, context, now);
        };

        if context.confirmed_time.is_some() {
            // Time known, email missing. Vary the phrasing on repeats.
            let label = context
                .confirmed_time_label
                .clone()
                .unwrap_or_else(|| "that time".to_string());
            let body = if context.last_prompt == Some(BookingPrompt::EmailRequest) {
                format!(
                    "Almost there, {} - I just need an email address to send the invite to.",
                    state.lead_name
                )
            } else {
                format!(
                    "Great, {} works! What's the best email for the calendar invite?",
                    label
                )
            };
            context.last_prompt = Some(BookingPrompt::EmailRequest);
            patch.next_action = Some(Action::SendMessage);
            patch.booking_context = Some(context);
            return BookingTurn {
                body: Some(body),
                patch,
                action: Action::SendMessage,
            };
        }

        if is_affirmative_only(text) {
            // A bare "yes" gets concrete choices, never the open question
            // again.
            return self.offer_slots(state, patch, context, now);
        }

        // No scheduling signal at all: open question, alternating phrasing
        // so the lead never sees the identical prompt twice in a row.
        let (prompt_kind, body) = match context.last_prompt {
            Some(BookingPrompt::OpenQuestionA) => (
                BookingPrompt::OpenQuestionB,
                format!(
                    "No problem, {} - is there a day and time this week or next that usually works for you?",
                    state.lead_name
                ),
            ),
            _ => (
                BookingPrompt::OpenQuestionA,
                format!(
                    "Happy to work around your schedule, {}. What day and time would suit you for a quick 15-minute call?",
                    state.lead_name
                ),
            ),
        };
        context.last_prompt = Some(prompt_kind);
        patch.next_action = Some(Action::SendMessage);
        patch.booking_context = Some(context);
        BookingTurn {
            body: Some(body),
            patch,
            action: Action::SendMessage,
        }
    }

    /// Offer two concrete slots (tomorrow morning / tomorrow afternoon).
    fn offer_slots(
        &self,
        state: &ConversationState,
        mut patch: StatePatch,
        mut context: BookingContext,
        now: DateTime<Utc>,
    ) -> BookingTurn {
        let tomorrow = now.date_naive() + TimeDelta::days(1);
        let weekday = tomorrow.format("%A");
        let body = format!(
            "Perfect, {}! Would tomorrow ({}) morning or afternoon work for a quick {}-minute call? If neither fits, just name a day and time.",
            state.lead_name, weekday, self.config.meeting_duration_minutes
        );
        context.last_prompt = Some(BookingPrompt::ConcreteSlots);
        patch.next_action = Some(Action::SendMessage);
        patch.booking_context = Some(context);
        BookingTurn {
            body: Some(body),
            patch,
            action: Action::SendMessage,
        }
    }

    /// Attempt calendar creation with a confirmed time and email.
    async fn schedule(
        &self,
        state: &ConversationState,
        patch: &mut StatePatch,
        mut context: BookingContext,
        at: DateTime<Utc>,
        email: &str,
        _now: DateTime<Utc>,
    ) -> BookingTurn {
        let request = EventRequest {
            start: at,
            duration_minutes: self.config.meeting_duration_minutes,
            attendee_email: Some(email.to_string()),
            summary: format!("{} - {}", meeting_type(state.property_type), state.lead_name),
            description: format!(
                "Consultation for {} with {}. Scheduled by {}.",
                state.property_address, state.lead_name, self.identity.agent_name
            ),
        };

        let suppress = context.suppress_confirmation;
        let label = context
            .confirmed_time_label
            .clone()
            .unwrap_or_else(|| format_slot(at));
        context.confirmed_email = Some(email.to_string());

        match self.calendar.create_event(&request).await {
            Ok(details) => {
                info!(
                    lead_id = %state.lead_id,
                    event_id = details.event_id.as_str(),
                    "consultation scheduled"
                );
                patch.booking_details = Some(BookingDetails {
                    scheduled_at: at,
                    channel: state.last_contact_channel,
                    event_id: Some(details.event_id),
                    meeting_link: details.meeting_link.clone(),
                    status: BookingStatus::Scheduled,
                });
                patch.stage = Some(Stage::Scheduled);
                patch.booking_context = Some(context);

                if suppress {
                    return BookingTurn {
                        body: None,
                        patch: std::mem::take(patch),
                        action: Action::ScheduledSilently,
                    };
                }

                let mut body = format!(
                    "All set! I've scheduled us for {} ({} minutes) and emailed the invite to {}.",
                    format_slot(at),
                    self.config.meeting_duration_minutes,
                    email
                );
                if let Some(link) = details.meeting_link {
                    body.push_str(&format!(" Here's the call link: {link}"));
                }
                patch.next_action = Some(Action::SendMessage);
                BookingTurn {
                    body: Some(body),
                    patch: std::mem::take(patch),
                    action: Action::SendMessage,
                }
            }
            Err(e) => {
                // Degraded mode: confirm verbally, flag for manual follow-up.
                warn!(lead_id = %state.lead_id, error = %e, "calendar creation failed");
                patch.booking_details = Some(BookingDetails {
                    scheduled_at: at,
                    channel: state.last_contact_channel,
                    event_id: None,
                    meeting_link: None,
                    status: BookingStatus::PendingManualFollowUp,
                });
                patch.stage = Some(Stage::Scheduled);
                patch.last_error = Some(format!("calendar creation failed: {e}"));
                patch.booking_context = Some(context);

                if suppress {
                    return BookingTurn {
                        body: None,
                        patch: std::mem::take(patch),
                        action: Action::ScheduledSilently,
                    };
                }

                let body = format!(
                    "I've got you down for {}. I'll follow up with a calendar invite to {} shortly.",
                    label, email
                );
                patch.next_action = Some(Action::SendMessage);
                BookingTurn {
                    body: Some(body),
                    patch: std::mem::take(patch),
                    action: Action::SendMessage,
                }
            }
        }
    }

    /// No-show follow-up with an escalating message sequence.
    ///
    /// The counter only ever increments; it is never reset here.
    pub fn handle_no_show(&self, state: &ConversationState) -> BookingTurn {
        let mut patch = StatePatch::for_handler(HandlerId::BookingAgent);
        patch.no_shows = 1;
        patch.next_action = Some(Action::SendMessage);

        let upcoming = state.counters.no_show_count + 1;
        let body = match upcoming {
            1 => format!(
                "Hi {}, looks like we missed each other for our call today - no worries at all! Would you like to reschedule? I'm still happy to put a cash offer together.",
                state.lead_name
            ),
            2 => format!(
                "Hi {}, we've missed each other a couple of times now - I understand you're busy! If you're still interested, just reply with a good time to talk. If now isn't right, no problem at all.",
                state.lead_name
            ),
            _ => format!(
                "Hi {}, I don't want to keep bothering you, so this is my last note about the call. If you'd still like to explore an offer, I'm here - otherwise I'll assume the timing isn't right. Reach out anytime. - {}",
                state.lead_name, self.identity.agent_name
            ),
        };

        BookingTurn {
            body: Some(body),
            patch,
            action: Action::NoShowFollowUp,
        }
    }
}
