// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email channel agent.
//!
//! Email is the fallback channel: on failure there is nowhere further to
//! fall back to, so the directive is escalation. Quiet hours do not gate
//! email, matching the channel router's availability rules; opt-out
//! always does.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use leadline_core::types::{ChannelKind, HandlerId};
use leadline_core::{ComplianceQuery, MessageTransport};
use leadline_state::{CommunicationAttempt, ConversationState, StatePatch};

use crate::validate::validate_email;
use crate::{ChannelOutcome, SendDirective, TurnKind};

/// Sends email through an injected transport.
pub struct EmailChannelAgent {
    transport: Arc<dyn MessageTransport>,
}

impl EmailChannelAgent {
    pub fn new(transport: Arc<dyn MessageTransport>) -> Self {
        Self { transport }
    }

    /// Attempt to deliver `body` to the lead by email.
    pub async fn send(
        &self,
        state: &ConversationState,
        body: &str,
        _turn: TurnKind,
        query: &dyn ComplianceQuery,
        now: DateTime<Utc>,
    ) -> ChannelOutcome {
        let mut patch = StatePatch::for_handler(HandlerId::EmailAgent);

        let Some(email) = state.email.as_deref() else {
            warn!(lead_id = %state.lead_id, "email unavailable: no address");
            patch.email_failed = Some(true);
            patch.last_error = Some("email failed: no address".into());
            return ChannelOutcome::escalate(patch);
        };

        let email = match validate_email(email) {
            Ok(validated) => validated,
            Err(e) => {
                warn!(lead_id = %state.lead_id, error = %e, "email unavailable: invalid address");
                patch.email_failed = Some(true);
                patch.last_error = Some(format!("email failed: {e}"));
                return ChannelOutcome::escalate(patch);
            }
        };

        if state.compliance.opted_out
            || state.compliance.email_opted_out
            || query.is_opted_out(&email)
        {
            warn!(lead_id = %state.lead_id, "email blocked: opted out");
            patch.last_error = Some("email blocked: contact has opted out".into());
            return ChannelOutcome::escalate(patch);
        }

        match self.transport.deliver(&email, body).await {
            Ok(receipt) if receipt.success => {
                info!(
                    lead_id = %state.lead_id,
                    provider_id = receipt.provider_id.as_deref().unwrap_or(""),
                    "email delivered"
                );
                patch.log_entries.push(CommunicationAttempt::succeeded(
                    ChannelKind::Email,
                    body,
                    receipt.provider_id.clone(),
                    now,
                ));
                patch.email_failed = Some(false);
                patch.last_contact = Some((ChannelKind::Email, now));
                patch.messages_sent = 1;
                patch.clear_last_error = true;
                ChannelOutcome {
                    directive: SendDirective::Sent,
                    provider_message_id: receipt.provider_id,
                    patch,
                }
            }
            Ok(receipt) => {
                let error = receipt.error.unwrap_or_else(|| "email delivery failed".into());
                warn!(lead_id = %state.lead_id, error = %error, "email rejected by provider");
                patch.log_entries.push(CommunicationAttempt::failed(
                    ChannelKind::Email,
                    body,
                    &error,
                    now,
                ));
                patch.email_failed = Some(true);
                patch.retries = 1;
                patch.last_error = Some(format!("email failed: {error}"));
                ChannelOutcome::escalate(patch)
            }
            Err(e) => {
                warn!(lead_id = %state.lead_id, error = %e, "email transport error");
                patch.log_entries.push(CommunicationAttempt::failed(
                    ChannelKind::Email,
                    body,
                    e.to_string(),
                    now,
                ));
                patch.email_failed = Some(true);
                patch.retries = 1;
                patch.last_error = Some(format!("email failed: {e}"));
                ChannelOutcome::escalate(patch)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{daytime_query, FlakyTransport};
    use chrono::TimeZone;
    use leadline_core::types::{CampaignId, LeadId, PropertyType};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap()
    }

    fn state() -> ConversationState {
        ConversationState::new(
            LeadId("lead-1".into()),
            "Sarah",
            "456 Pine Avenue",
            PropertyType::VacantLand,
            CampaignId("camp-1".into()),
            now(),
        )
        .with_email("sarah@example.com")
    }

    #[tokio::test]
    async fn successful_email_logs_and_updates_contact() {
        let transport = Arc::new(FlakyTransport::succeeding(ChannelKind::Email));
        let agent = EmailChannelAgent::new(transport);
        let query = daytime_query();

        let outcome = agent
            .send(&state(), "hello by email", TurnKind::Outbound, &query, now())
            .await;

        assert_eq!(outcome.directive, SendDirective::Sent);
        assert_eq!(outcome.patch.log_entries.len(), 1);
        assert_eq!(outcome.patch.email_failed, Some(false));
        assert_eq!(
            outcome.patch.last_contact,
            Some((ChannelKind::Email, now()))
        );
    }

    #[tokio::test]
    async fn failed_email_escalates() {
        let transport = Arc::new(FlakyTransport::failing(ChannelKind::Email, "smtp refused"));
        let agent = EmailChannelAgent::new(transport);
        let query = daytime_query();

        let outcome = agent
            .send(&state(), "hello", TurnKind::Outbound, &query, now())
            .await;

        assert_eq!(outcome.directive, SendDirective::Escalate);
        assert_eq!(outcome.patch.email_failed, Some(true));
        assert_eq!(outcome.patch.log_entries.len(), 1);
        assert!(!outcome.patch.log_entries[0].success);
    }

    #[tokio::test]
    async fn invalid_address_escalates_without_delivery() {
        let transport = Arc::new(FlakyTransport::succeeding(ChannelKind::Email));
        let agent = EmailChannelAgent::new(transport.clone());
        let query = daytime_query();
        let mut s = state();
        s.email = Some("not-an-email".into());

        let outcome = agent.send(&s, "hello", TurnKind::Outbound, &query, now()).await;
        assert_eq!(outcome.directive, SendDirective::Escalate);
        assert!(transport.deliveries().await.is_empty());
    }

    #[tokio::test]
    async fn email_opt_out_blocks_delivery() {
        let transport = Arc::new(FlakyTransport::succeeding(ChannelKind::Email));
        let agent = EmailChannelAgent::new(transport.clone());
        let query = daytime_query();
        query.add_opt_out("sarah@example.com");

        let outcome = agent
            .send(&state(), "hello", TurnKind::Outbound, &query, now())
            .await;
        assert_eq!(outcome.directive, SendDirective::Escalate);
        assert!(transport.deliveries().await.is_empty());
    }
}
