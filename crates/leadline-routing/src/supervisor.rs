// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The supervisor: top-level routing over the conversation graph.
//!
//! Given the current state and the latest inbound message (if any), the
//! supervisor decides which handler runs next. It owns compliance
//! oversight for first contact, intent-based dispatch for replies, and the
//! advisory escalation heuristic.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use leadline_compliance::{is_opt_out_request, ComplianceGate};
use leadline_core::traits::classifier::{ClassifyContext, IntentClassifier};
use leadline_core::types::{Action, HandlerId, Intent, Sentiment, Stage};
use leadline_core::ComplianceQuery;
use leadline_state::{ConversationState, Decision, StatePatch};

use crate::classifier::keyword_analysis;

/// Top-level router for one conversation turn.
pub struct Supervisor {
    classifier: Arc<dyn IntentClassifier>,
}

impl Supervisor {
    pub fn new(classifier: Arc<dyn IntentClassifier>) -> Self {
        Self { classifier }
    }

    /// Decide which handler runs next.
    ///
    /// `inbound` is `None` for the very first outbound contact; otherwise
    /// it is the lead's latest message. Classification failures never
    /// surface: the keyword rules take over in place of a broken remote
    /// classifier.
    pub async fn route(
        &self,
        state: &ConversationState,
        inbound: Option<&str>,
        query: &dyn ComplianceQuery,
        now: DateTime<Utc>,
    ) -> Decision {
        match inbound {
            None => self.route_initial_contact(state, query, now),
            Some(text) => self.route_inbound(state, text, now).await,
        }
    }

    fn route_initial_contact(
        &self,
        state: &ConversationState,
        query: &dyn ComplianceQuery,
        now: DateTime<Utc>,
    ) -> Decision {
        // The state's own latch blocks even when the external opt-out list
        // has not caught up yet.
        if state.compliance.opted_out {
            let mut patch = StatePatch::for_handler(HandlerId::Supervisor);
            patch.compliance_checked_at = Some(now);
            patch.last_error = Some("compliance check failed: contact has opted out".into());
            info!(lead_id = %state.lead_id, "initial contact blocked: lead opted out");
            return Decision::end(Action::ComplianceFailed, patch);
        }

        let gate = ComplianceGate::new(query);
        let outcome = gate.check_contact(
            state.phone.as_deref(),
            state.email.as_deref(),
            &state.timezone,
            false,
        );

        let mut patch = StatePatch::for_handler(HandlerId::Supervisor);
        patch.quiet_hours_blocked = Some(outcome.quiet_hours_blocked);
        patch.compliance_checked_at = Some(now);

        if !outcome.compliant {
            info!(
                lead_id = %state.lead_id,
                reason = outcome.reason,
                "initial contact blocked by compliance"
            );
            patch.last_error = Some(format!("compliance check failed: {}", outcome.reason));
            return Decision::end(Action::ComplianceFailed, patch);
        }

        debug!(lead_id = %state.lead_id, "routing initial outreach");
        patch.next_action = Some(Action::InitialOutreach);
        Decision::new(HandlerId::CommunicationRouter, Action::InitialOutreach, patch)
    }

    async fn route_inbound(
        &self,
        state: &ConversationState,
        text: &str,
        _now: DateTime<Utc>,
    ) -> Decision {
        // Opt-out requests latch before any classification.
        if is_opt_out_request(text) {
            info!(lead_id = %state.lead_id, "opt-out request received");
            let mut patch = StatePatch::for_handler(HandlerId::Supervisor)
                .with_stage(Stage::NotInterested);
            patch.opted_out = Some(true);
            patch.email_opted_out = Some(true);
            return Decision::end(Action::OptOut, patch);
        }

        let ctx = ClassifyContext {
            property_type: state.property_type,
            stage: state.stage(),
        };
        let analysis = match self.classifier.classify(text, &ctx).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(lead_id = %state.lead_id, error = %e, "classifier failed, using keyword rules");
                keyword_analysis(text)
            }
        };

        let mut patch = StatePatch::for_handler(HandlerId::Supervisor);
        patch.sentiment = Some(analysis.sentiment);
        patch.style = Some(analysis.style);

        debug!(
            lead_id = %state.lead_id,
            intent = %analysis.intent,
            sentiment = %analysis.sentiment,
            "classified inbound message"
        );

        match analysis.intent {
            Intent::NotInterested => {
                patch.stage = Some(Stage::NotInterested);
                Decision::end(Action::MarkNotInterested, patch)
            }
            Intent::ReadyToBook => {
                patch.stage = Some(Stage::Booking);
                patch.next_action = Some(Action::ScheduleAppointment);
                Decision::new(HandlerId::BookingAgent, Action::ScheduleAppointment, patch)
            }
            Intent::Objection | Intent::Question => {
                patch.next_action = Some(Action::HandleObjection);
                Decision::new(
                    HandlerId::specialist_for(state.property_type),
                    Action::HandleObjection,
                    patch,
                )
            }
            Intent::Interested | Intent::Unknown => {
                // Once qualification is done the booking agent owns replies:
                // "tomorrow afternoon" must reach the time parser, not the
                // qualification script.
                if matches!(
                    state.stage(),
                    Stage::Interested | Stage::Booking | Stage::Scheduled
                ) {
                    patch.next_action = Some(Action::ScheduleAppointment);
                    return Decision::new(
                        HandlerId::BookingAgent,
                        Action::ScheduleAppointment,
                        patch,
                    );
                }
                patch.next_action = Some(Action::ContinueQualification);
                Decision::new(
                    HandlerId::specialist_for(state.property_type),
                    Action::ContinueQualification,
                    patch,
                )
            }
        }
    }

    /// Advisory escalation predicate for human handoff.
    ///
    /// Exposed for the external handoff collaborator to poll; routing
    /// never acts on it automatically.
    pub fn should_escalate(state: &ConversationState) -> bool {
        state.routing.retry_count > 3
            || state.counters.booking_attempts > 3
            || state.counters.objections_handled.len() > 5
            || state.sentiment == Some(Sentiment::Negative)
            || state.counters.no_show_count > 2
            || state
                .routing
                .last_error
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains("legal"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone};
    use leadline_compliance::{LocalComplianceQuery, QuietHours};
    use leadline_core::types::{CampaignId, LeadId, PropertyType};

    use crate::classifier::ResilientClassifier;

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

    fn daytime_query() -> LocalComplianceQuery {
        LocalComplianceQuery::new(QuietHours::default(), || {
            NaiveTime::from_hms_opt(14, 0, 0).unwrap()
        })
    }

    fn supervisor() -> Supervisor {
        Supervisor::new(Arc::new(ResilientClassifier::rules_only()))
    }

    #[tokio::test]
    async fn initial_contact_routes_to_communication_router() {
        let query = daytime_query();
        let decision = supervisor().route(&state(), None, &query, now()).await;
        assert_eq!(decision.next, HandlerId::CommunicationRouter);
        assert_eq!(decision.action, Action::InitialOutreach);
    }

    #[tokio::test]
    async fn opted_out_lead_ends_without_log_entries() {
        let query = daytime_query();
        query.add_opt_out("+12145551234");
        let decision = supervisor().route(&state(), None, &query, now()).await;
        assert_eq!(decision.next, HandlerId::End);
        assert_eq!(decision.action, Action::ComplianceFailed);
        assert!(decision.patch.log_entries.is_empty());
    }

    #[tokio::test]
    async fn quiet_hours_block_initial_contact() {
        let query = LocalComplianceQuery::new(QuietHours::default(), || {
            NaiveTime::from_hms_opt(23, 0, 0).unwrap()
        });
        let decision = supervisor().route(&state(), None, &query, now()).await;
        assert_eq!(decision.next, HandlerId::End);
        assert_eq!(decision.action, Action::ComplianceFailed);
        assert_eq!(decision.patch.quiet_hours_blocked, Some(true));
    }

    #[tokio::test]
    async fn not_interested_reply_ends_conversation() {
        let query = daytime_query();
        let decision = supervisor()
            .route(&state(), Some("not interested, thanks"), &query, now())
            .await;
        assert_eq!(decision.next, HandlerId::End);
        assert_eq!(decision.action, Action::MarkNotInterested);
        assert_eq!(decision.patch.stage, Some(Stage::NotInterested));
    }

    #[tokio::test]
    async fn booking_reply_routes_to_booking_agent() {
        let query = daytime_query();
        let decision = supervisor()
            .route(&state(), Some("let's schedule that call"), &query, now())
            .await;
        assert_eq!(decision.next, HandlerId::BookingAgent);
        assert_eq!(decision.patch.stage, Some(Stage::Booking));
    }

    #[tokio::test]
    async fn objection_routes_to_matching_specialist() {
        let query = daytime_query();
        let decision = supervisor()
            .route(&state(), Some("that price is too low"), &query, now())
            .await;
        assert_eq!(decision.next, HandlerId::FixFlipSpecialist);
        assert_eq!(decision.action, Action::HandleObjection);
    }

    #[tokio::test]
    async fn other_replies_continue_qualification() {
        let query = daytime_query();
        let mut s = state();
        s.property_type = PropertyType::VacantLand;
        let decision = supervisor()
            .route(&s, Some("it's about five acres"), &query, now())
            .await;
        assert_eq!(decision.next, HandlerId::VacantLandSpecialist);
        assert_eq!(decision.action, Action::ContinueQualification);
    }

    #[tokio::test]
    async fn replies_after_qualification_go_to_booking_agent() {
        let query = daytime_query();
        let mut s = state();
        s.apply(
            StatePatch::default().with_stage(Stage::Interested),
            now(),
        );
        let decision = supervisor()
            .route(&s, Some("tomorrow afternoon works"), &query, now())
            .await;
        assert_eq!(decision.next, HandlerId::BookingAgent);
        assert_eq!(decision.action, Action::ScheduleAppointment);
    }

    #[tokio::test]
    async fn stop_message_sets_opt_out_latch() {
        let query = daytime_query();
        let decision = supervisor().route(&state(), Some("STOP"), &query, now()).await;
        assert_eq!(decision.next, HandlerId::End);
        assert_eq!(decision.action, Action::OptOut);
        assert_eq!(decision.patch.opted_out, Some(true));
        assert_eq!(decision.patch.stage, Some(Stage::NotInterested));
    }

    #[test]
    fn escalation_heuristic_triggers() {
        let mut s = state();
        assert!(!Supervisor::should_escalate(&s));

        s.counters.no_show_count = 3;
        assert!(Supervisor::should_escalate(&s));

        let mut s = state();
        s.routing.last_error = Some("Threatened LEGAL action".into());
        assert!(Supervisor::should_escalate(&s));

        let mut s = state();
        s.sentiment = Some(Sentiment::Negative);
        assert!(Supervisor::should_escalate(&s));

        let mut s = state();
        s.counters.objections_handled = (0..6).map(|i| format!("objection {i}")).collect();
        assert!(Supervisor::should_escalate(&s));
    }
}
