// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMS channel agent.
//!
//! Re-validates compliance and recipient format before every send, logs
//! the attempt, and on any failure directs the caller to fall back to
//! email. The transport is an injected dependency; this agent never
//! retries on its own.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use leadline_compliance::ComplianceGate;
use leadline_core::types::{ChannelKind, HandlerId};
use leadline_core::{ComplianceQuery, MessageTransport};
use leadline_state::{CommunicationAttempt, ConversationState, StatePatch};

use crate::validate::normalize_us_phone;
use crate::{ChannelOutcome, SendDirective, TurnKind};

/// Sends SMS messages through an injected transport.
pub struct SmsChannelAgent {
    transport: Arc<dyn MessageTransport>,
}

impl SmsChannelAgent {
    pub fn new(transport: Arc<dyn MessageTransport>) -> Self {
        Self { transport }
    }

    /// Attempt to deliver `body` to the lead by SMS.
    ///
    /// Quiet hours are bypassed only for inbound-reply turns; opt-out is
    /// never bypassed. Unavailability (missing/invalid phone, compliance
    /// block) and delivery failure both yield a fallback-to-email
    /// directive; only actual delivery attempts append log entries.
    pub async fn send(
        &self,
        state: &ConversationState,
        body: &str,
        turn: TurnKind,
        query: &dyn ComplianceQuery,
        now: DateTime<Utc>,
    ) -> ChannelOutcome {
        let mut patch = StatePatch::for_handler(HandlerId::SmsAgent);

        let Some(phone) = state.phone.as_deref() else {
            warn!(lead_id = %state.lead_id, "sms unavailable: no phone number");
            patch.sms_failed = Some(true);
            patch.last_error = Some("sms failed: no phone number".into());
            return ChannelOutcome::fallback(patch);
        };

        let phone = match normalize_us_phone(phone) {
            Ok(normalized) => normalized,
            Err(e) => {
                warn!(lead_id = %state.lead_id, error = %e, "sms unavailable: invalid phone");
                patch.sms_failed = Some(true);
                patch.last_error = Some(format!("sms failed: {e}"));
                return ChannelOutcome::fallback(patch);
            }
        };

        if state.compliance.opted_out {
            warn!(lead_id = %state.lead_id, "sms blocked: lead opted out");
            patch.last_error = Some("sms blocked: contact has opted out".into());
            return ChannelOutcome::fallback(patch);
        }

        // Defense in depth: the router already checked, but state may have
        // moved since the turn started.
        let gate = ComplianceGate::new(query);
        let outcome = gate.check_contact(
            Some(&phone),
            None,
            &state.timezone,
            turn == TurnKind::InboundReply,
        );
        patch.quiet_hours_blocked = Some(outcome.quiet_hours_blocked);
        patch.compliance_checked_at = Some(now);
        if !outcome.compliant {
            warn!(
                lead_id = %state.lead_id,
                reason = outcome.reason,
                "sms blocked by compliance re-check"
            );
            patch.last_error = Some(format!("sms blocked: {}", outcome.reason));
            return ChannelOutcome::fallback(patch);
        }

        match self.transport.deliver(&phone, body).await {
            Ok(receipt) if receipt.success => {
                info!(
                    lead_id = %state.lead_id,
                    provider_id = receipt.provider_id.as_deref().unwrap_or(""),
                    "sms delivered"
                );
                patch.log_entries.push(CommunicationAttempt::succeeded(
                    ChannelKind::Sms,
                    body,
                    receipt.provider_id.clone(),
                    now,
                ));
                patch.sms_failed = Some(false);
                patch.last_contact = Some((ChannelKind::Sms, now));
                patch.messages_sent = 1;
                patch.clear_last_error = true;
                ChannelOutcome {
                    directive: SendDirective::Sent,
                    provider_message_id: receipt.provider_id,
                    patch,
                }
            }
            Ok(receipt) => {
                let error = receipt.error.unwrap_or_else(|| "sms delivery failed".into());
                warn!(lead_id = %state.lead_id, error = %error, "sms rejected by provider");
                patch
                    .log_entries
                    .push(CommunicationAttempt::failed(ChannelKind::Sms, body, &error, now));
                patch.sms_failed = Some(true);
                patch.retries = 1;
                patch.last_error = Some(format!("sms failed: {error}"));
                ChannelOutcome::fallback(patch)
            }
            Err(e) => {
                warn!(lead_id = %state.lead_id, error = %e, "sms transport error");
                patch.log_entries.push(CommunicationAttempt::failed(
                    ChannelKind::Sms,
                    body,
                    e.to_string(),
                    now,
                ));
                patch.sms_failed = Some(true);
                patch.retries = 1;
                patch.last_error = Some(format!("sms failed: {e}"));
                ChannelOutcome::fallback(patch)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{blocked_query, daytime_query, FlakyTransport};
    use chrono::TimeZone;
    use leadline_core::types::{CampaignId, LeadId, PropertyType};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap()
    }

    fn state() -> ConversationState {
        ConversationState::new(
            LeadId("lead-1".into()),
            "John",
            "123 Oak Street",
            PropertyType::FixFlip,
            CampaignId("camp-1".into()),
            now(),
        )
        .with_phone("(214) 555-1234")
        .with_email("john@example.com")
    }

    #[tokio::test]
    async fn successful_send_logs_and_clears_failure_flag() {
        let transport = Arc::new(FlakyTransport::succeeding(ChannelKind::Sms));
        let agent = SmsChannelAgent::new(transport.clone());
        let query = daytime_query();

        let outcome = agent
            .send(&state(), "hello there", TurnKind::Outbound, &query, now())
            .await;

        assert_eq!(outcome.directive, SendDirective::Sent);
        assert_eq!(outcome.patch.log_entries.len(), 1);
        assert!(outcome.patch.log_entries[0].success);
        assert_eq!(outcome.patch.sms_failed, Some(false));
        assert_eq!(outcome.patch.messages_sent, 1);
        assert_eq!(transport.deliveries().await, vec![("+12145551234".to_string(), "hello there".to_string())]);
    }

    #[tokio::test]
    async fn failed_send_directs_fallback_to_email() {
        // A failed delivery yields exactly fallback_to_email plus a failed entry.
        let transport = Arc::new(FlakyTransport::failing(ChannelKind::Sms, "carrier rejected"));
        let agent = SmsChannelAgent::new(transport);
        let query = daytime_query();

        let outcome = agent
            .send(&state(), "hello", TurnKind::Outbound, &query, now())
            .await;

        assert_eq!(outcome.directive, SendDirective::FallbackToEmail);
        assert_eq!(outcome.patch.log_entries.len(), 1);
        assert!(!outcome.patch.log_entries[0].success);
        assert_eq!(outcome.patch.sms_failed, Some(true));
        assert!(outcome.patch.last_error.as_deref().unwrap().contains("carrier rejected"));
    }

    #[tokio::test]
    async fn missing_phone_falls_back_without_log_entry() {
        let transport = Arc::new(FlakyTransport::succeeding(ChannelKind::Sms));
        let agent = SmsChannelAgent::new(transport);
        let query = daytime_query();
        let mut s = state();
        s.phone = None;

        let outcome = agent.send(&s, "hello", TurnKind::Outbound, &query, now()).await;
        assert_eq!(outcome.directive, SendDirective::FallbackToEmail);
        assert!(outcome.patch.log_entries.is_empty());
        assert_eq!(outcome.patch.sms_failed, Some(true));
    }

    #[tokio::test]
    async fn quiet_hours_block_outbound_but_not_replies() {
        let transport = Arc::new(FlakyTransport::succeeding(ChannelKind::Sms));
        let agent = SmsChannelAgent::new(transport);
        let query = blocked_query();

        let outbound = agent
            .send(&state(), "hello", TurnKind::Outbound, &query, now())
            .await;
        assert_eq!(outbound.directive, SendDirective::FallbackToEmail);
        assert!(outbound.patch.log_entries.is_empty());

        let reply = agent
            .send(&state(), "hello", TurnKind::InboundReply, &query, now())
            .await;
        assert_eq!(reply.directive, SendDirective::Sent);
    }

    #[tokio::test]
    async fn opted_out_contact_never_sends() {
        let transport = Arc::new(FlakyTransport::succeeding(ChannelKind::Sms));
        let agent = SmsChannelAgent::new(transport.clone());
        let query = daytime_query();
        query.add_opt_out("+12145551234");

        let outcome = agent
            .send(&state(), "hello", TurnKind::InboundReply, &query, now())
            .await;
        assert_eq!(outcome.directive, SendDirective::FallbackToEmail);
        assert!(transport.deliveries().await.is_empty());
    }
}
