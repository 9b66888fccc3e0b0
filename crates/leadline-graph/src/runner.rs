// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The graph runner: one synchronous pass per inbound event.
//!
//! Wires supervisor, specialists, booking, and channel agents into the
//! conversation graph and executes exactly one pass for each event
//! (inbound message, first contact, or follow-up tick). Handlers return
//! patches; the runner applies them in order, so a half-failed turn keeps
//! the effects that already landed and later turns re-derive the rest
//! from state.
//!
//! Per-lead serialization: events for the same lead are processed under a
//! per-lead async mutex, so two turns for one lead never interleave while
//! distinct leads run fully in parallel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use leadline_booking::BookingAgent;
use leadline_channel::{EmailChannelAgent, SendDirective, SmsChannelAgent, TurnKind};
use leadline_compliance::OPT_OUT_CONFIRMATION;
use leadline_config::LeadlineConfig;
use leadline_core::types::{Action, ChannelKind, HandlerId, PropertyType};
use leadline_core::{
    CalendarService, ComplianceQuery, FieldEnricher, IntentClassifier, MessageTransport,
};
use leadline_routing::{CommunicationRouter, Supervisor};
use leadline_specialist::{PropertySpecialist, QualificationExtractor};
use leadline_state::{ConversationState, StatePatch};

/// External collaborators injected into the graph.
pub struct GraphDependencies {
    pub classifier: Arc<dyn IntentClassifier>,
    pub enricher: Option<Arc<dyn FieldEnricher>>,
    pub sms_transport: Arc<dyn MessageTransport>,
    pub email_transport: Arc<dyn MessageTransport>,
    pub calendar: Arc<dyn CalendarService>,
    pub compliance: Arc<dyn ComplianceQuery>,
}

/// A message that went out during a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel: ChannelKind,
    pub body: String,
    pub provider_message_id: Option<String>,
}

/// Result of one graph pass: the patched state, what was sent, and the
/// final action for operator visibility.
#[derive(Debug)]
pub struct TurnReport {
    pub state: ConversationState,
    pub outbound: Vec<SentMessage>,
    pub final_action: Action,
}

/// Executes conversation turns over the handler graph.
pub struct GraphRunner {
    supervisor: Supervisor,
    router: CommunicationRouter,
    sms: SmsChannelAgent,
    email: EmailChannelAgent,
    booking: BookingAgent,
    fix_flip: PropertySpecialist,
    vacant_land: PropertySpecialist,
    rental: PropertySpecialist,
    compliance: Arc<dyn ComplianceQuery>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl GraphRunner {
    pub fn new(deps: GraphDependencies, config: &LeadlineConfig) -> Self {
        let extractor = |enricher: &Option<Arc<dyn FieldEnricher>>| match enricher {
            Some(e) => QualificationExtractor::with_enricher(e.clone()),
            None => QualificationExtractor::rules_only(),
        };

        Self {
            supervisor: Supervisor::new(deps.classifier),
            router: CommunicationRouter::new(config.channels.clone()),
            sms: SmsChannelAgent::new(deps.sms_transport),
            email: EmailChannelAgent::new(deps.email_transport),
            booking: BookingAgent::new(
                deps.calendar,
                config.agent.clone(),
                config.booking.clone(),
            ),
            fix_flip: PropertySpecialist::new(
                PropertyType::FixFlip,
                extractor(&deps.enricher),
                config.agent.clone(),
            ),
            vacant_land: PropertySpecialist::new(
                PropertyType::VacantLand,
                extractor(&deps.enricher),
                config.agent.clone(),
            ),
            rental: PropertySpecialist::new(
                PropertyType::LongTermRental,
                extractor(&deps.enricher),
                config.agent.clone(),
            ),
            compliance: deps.compliance,
            locks: DashMap::new(),
        }
    }

    fn specialist_for(&self, property_type: PropertyType) -> &PropertySpecialist {
        match property_type {
            PropertyType::FixFlip => &self.fix_flip,
            PropertyType::VacantLand => &self.vacant_land,
            PropertyType::LongTermRental => &self.rental,
        }
    }

    fn lock_for(&self, lead_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(lead_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Advisory escalation check for the external human-handoff collaborator.
    pub fn should_escalate(state: &ConversationState) -> bool {
        Supervisor::should_escalate(state)
    }

    /// Process one event for a lead: an inbound message (`Some`), or the
    /// first outbound contact / a follow-up tick (`None`).
    pub async fn process_event(
        &self,
        mut state: ConversationState,
        inbound: Option<String>,
        now: DateTime<Utc>,
    ) -> TurnReport {
        let lock = self.lock_for(&state.lead_id.0);
        let _guard = lock.lock().await;

        let turn_kind = if inbound.is_some() {
            TurnKind::InboundReply
        } else {
            TurnKind::Outbound
        };
        let mut outbound = Vec::new();

        let decision = self
            .supervisor
            .route(&state, inbound.as_deref(), &*self.compliance, now)
            .await;

        debug!(
            lead_id = %state.lead_id,
            next = %decision.next,
            action = %decision.action,
            "supervisor decision"
        );

        let final_action = match (decision.next, decision.action) {
            (HandlerId::End, Action::OptOut) => {
                // Confirmation goes out before the latch lands on state.
                self.route_and_send(&mut state, OPT_OUT_CONFIRMATION, turn_kind, now, &mut outbound)
                    .await;
                state.apply(decision.patch, now);
                Action::OptOut
            }
            (HandlerId::End, Action::MarkNotInterested) => {
                state.apply(decision.patch, now);
                let reply = self
                    .specialist_for(state.property_type)
                    .handle_decline(&state);
                state.apply(reply.patch, now);
                self.route_and_send(&mut state, &reply.body, turn_kind, now, &mut outbound)
                    .await;
                Action::MarkNotInterested
            }
            (HandlerId::End, action) => {
                state.apply(decision.patch, now);
                action
            }
            (HandlerId::CommunicationRouter, _) => {
                state.apply(decision.patch, now);
                let specialist = self.specialist_for(state.property_type);
                let body = if state.counters.total_messages_sent == 0 {
                    specialist.initial_outreach(&state)
                } else {
                    specialist.follow_up(&state)
                };
                self.route_and_send(&mut state, &body, turn_kind, now, &mut outbound)
                    .await
            }
            (HandlerId::BookingAgent, _) => {
                state.apply(decision.patch, now);
                let turn = self.booking.handle(&state, inbound.as_deref(), now).await;
                let action = turn.action;
                state.apply(turn.patch, now);
                match turn.body {
                    Some(body) => {
                        self.route_and_send(&mut state, &body, turn_kind, now, &mut outbound)
                            .await
                    }
                    None => action,
                }
            }
            (
                HandlerId::FixFlipSpecialist
                | HandlerId::VacantLandSpecialist
                | HandlerId::RentalSpecialist,
                action,
            ) => {
                state.apply(decision.patch, now);
                let specialist = self.specialist_for(state.property_type);
                let text = inbound.as_deref().unwrap_or_default();
                let reply = if action == Action::HandleObjection {
                    specialist.handle_objection(&state, text)
                } else {
                    specialist.continue_qualification(&state, text).await
                };
                if reply.qualification_complete {
                    info!(lead_id = %state.lead_id, "lead qualified, booking is next");
                }
                state.apply(reply.patch, now);
                self.route_and_send(&mut state, &reply.body, turn_kind, now, &mut outbound)
                    .await
            }
            (HandlerId::Supervisor | HandlerId::SmsAgent | HandlerId::EmailAgent, _) => {
                // The supervisor never routes to itself or directly to a
                // channel agent; reaching this arm is a routing bug.
                warn!(lead_id = %state.lead_id, next = %decision.next, "unexpected routing target");
                let mut patch = StatePatch::default();
                patch.retries = 1;
                patch.last_error = Some(format!("unexpected routing target {}", decision.next));
                state.apply(patch, now);
                Action::HandlerError
            }
        };

        let mut patch = StatePatch::default();
        patch.next_action = Some(final_action);
        state.apply(patch, now);

        TurnReport {
            state,
            outbound,
            final_action,
        }
    }

    /// Pick a channel and send, with the single SMS-to-email fallback.
    async fn route_and_send(
        &self,
        state: &mut ConversationState,
        body: &str,
        turn_kind: TurnKind,
        now: DateTime<Utc>,
        outbound: &mut Vec<SentMessage>,
    ) -> Action {
        let decision = self.router.decide_channel(state, &*self.compliance, now);
        debug!(
            lead_id = %state.lead_id,
            channel = ?decision.channel,
            reason = decision.reason,
            "channel decision"
        );

        match decision.channel {
            Some(ChannelKind::Sms) => {
                let outcome = self
                    .sms
                    .send(state, body, turn_kind, &*self.compliance, now)
                    .await;
                let directive = outcome.directive;
                let provider_id = outcome.provider_message_id.clone();
                state.apply(outcome.patch, now);
                match directive {
                    SendDirective::Sent => {
                        outbound.push(SentMessage {
                            channel: ChannelKind::Sms,
                            body: body.to_string(),
                            provider_message_id: provider_id,
                        });
                        Action::MessageSent
                    }
                    SendDirective::FallbackToEmail => {
                        self.try_email_fallback(state, body, turn_kind, now, outbound).await
                    }
                    SendDirective::Escalate => Action::Escalate,
                }
            }
            Some(ChannelKind::Email) => self.send_email(state, body, turn_kind, now, outbound).await,
            None => {
                info!(lead_id = %state.lead_id, "no channels available, going silent");
                let mut patch = StatePatch::default();
                patch.last_error = Some("no available communication channels".into());
                state.apply(patch, now);
                Action::NoChannelsAvailable
            }
        }
    }

    async fn try_email_fallback(
        &self,
        state: &mut ConversationState,
        body: &str,
        turn_kind: TurnKind,
        now: DateTime<Utc>,
        outbound: &mut Vec<SentMessage>,
    ) -> Action {
        if !self.router.can_use_email(state, &*self.compliance, now) {
            warn!(lead_id = %state.lead_id, "sms failed and email unavailable");
            return Action::Escalate;
        }
        self.send_email(state, body, turn_kind, now, outbound).await
    }

    async fn send_email(
        &self,
        state: &mut ConversationState,
        body: &str,
        turn_kind: TurnKind,
        now: DateTime<Utc>,
        outbound: &mut Vec<SentMessage>,
    ) -> Action {
        let outcome = self
            .email
            .send(state, body, turn_kind, &*self.compliance, now)
            .await;
        let directive = outcome.directive;
        let provider_id = outcome.provider_message_id.clone();
        state.apply(outcome.patch, now);
        match directive {
            SendDirective::Sent => {
                outbound.push(SentMessage {
                    channel: ChannelKind::Email,
                    body: body.to_string(),
                    provider_message_id: provider_id,
                });
                Action::MessageSent
            }
            _ => Action::Escalate,
        }
    }
}
