// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel selection: SMS first, email fallback.
//!
//! Selection is independent of message content and has no side effects: it
//! reads the communication log and compliance snapshot as of the start of
//! the turn and returns a decision.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use leadline_config::ChannelPolicyConfig;
use leadline_core::types::ChannelKind;
use leadline_core::ComplianceQuery;
use leadline_state::ConversationState;

/// Outcome of channel selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelDecision {
    pub channel: Option<ChannelKind>,
    pub reason: &'static str,
}

/// Chooses the outbound channel for a lead given availability, compliance,
/// failure history, and daily caps.
pub struct CommunicationRouter {
    policy: ChannelPolicyConfig,
}

impl CommunicationRouter {
    pub fn new(policy: ChannelPolicyConfig) -> Self {
        Self { policy }
    }

    /// Whether SMS is currently usable for this lead.
    pub fn can_use_sms(
        &self,
        state: &ConversationState,
        query: &dyn ComplianceQuery,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(phone) = state.phone.as_deref() else {
            debug!(lead_id = %state.lead_id, "sms unavailable: no phone number");
            return false;
        };
        if state.compliance.opted_out || query.is_opted_out(phone) {
            debug!(lead_id = %state.lead_id, "sms unavailable: opted out");
            return false;
        }
        if query.is_quiet_hours(&state.timezone) {
            debug!(lead_id = %state.lead_id, "sms unavailable: quiet hours");
            return false;
        }
        let cooldown = TimeDelta::hours(self.policy.sms_failure_cooldown_hours);
        if state.log().failed_within(ChannelKind::Sms, cooldown, now) {
            debug!(lead_id = %state.lead_id, "sms unavailable: recent failure");
            return false;
        }
        if state.log().sent_today(ChannelKind::Sms, now) >= self.policy.sms_daily_cap {
            debug!(lead_id = %state.lead_id, "sms unavailable: daily cap reached");
            return false;
        }
        true
    }

    /// Whether email is currently usable for this lead.
    pub fn can_use_email(
        &self,
        state: &ConversationState,
        query: &dyn ComplianceQuery,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(email) = state.email.as_deref() else {
            debug!(lead_id = %state.lead_id, "email unavailable: no address");
            return false;
        };
        if state.compliance.opted_out
            || state.compliance.email_opted_out
            || query.is_opted_out(email)
        {
            debug!(lead_id = %state.lead_id, "email unavailable: opted out");
            return false;
        }
        let cooldown = TimeDelta::hours(self.policy.email_failure_cooldown_hours);
        if state.log().failed_within(ChannelKind::Email, cooldown, now) {
            debug!(lead_id = %state.lead_id, "email unavailable: recent failure");
            return false;
        }
        if state.log().sent_today(ChannelKind::Email, now) >= self.policy.email_daily_cap {
            debug!(lead_id = %state.lead_id, "email unavailable: daily cap reached");
            return false;
        }
        true
    }

    /// Pick the outbound channel: SMS first, email fallback, else none.
    pub fn decide_channel(
        &self,
        state: &ConversationState,
        query: &dyn ComplianceQuery,
        now: DateTime<Utc>,
    ) -> ChannelDecision {
        if self.can_use_sms(state, query, now) {
            return ChannelDecision {
                channel: Some(ChannelKind::Sms),
                reason: "sms available and preferred",
            };
        }
        if self.can_use_email(state, query, now) {
            return ChannelDecision {
                channel: Some(ChannelKind::Email),
                reason: "email fallback, sms unavailable",
            };
        }
        ChannelDecision {
            channel: None,
            reason: "no communication channels available",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone};
    use leadline_compliance::{LocalComplianceQuery, QuietHours};
    use leadline_core::types::{CampaignId, LeadId, PropertyType};
    use leadline_state::{CommunicationAttempt, StatePatch};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap()
    }

    fn state() -> ConversationState {
        ConversationState::new(
            LeadId("lead-1".into()),
            "Sarah Johnson",
            "456 Pine Avenue, Austin, TX",
            PropertyType::VacantLand,
            CampaignId("camp-1".into()),
            now(),
        )
        .with_phone("+15125551234")
        .with_email("sarah@example.com")
    }

    fn daytime_query() -> LocalComplianceQuery {
        LocalComplianceQuery::new(QuietHours::default(), || {
            NaiveTime::from_hms_opt(14, 0, 0).unwrap()
        })
    }

    fn router() -> CommunicationRouter {
        CommunicationRouter::new(ChannelPolicyConfig::default())
    }

    fn append_sms(state: &mut ConversationState, count: usize, success: bool) {
        let mut patch = StatePatch::default();
        for i in 0..count {
            let body = format!("msg {i}");
            patch.log_entries.push(if success {
                CommunicationAttempt::succeeded(ChannelKind::Sms, body, None, now())
            } else {
                CommunicationAttempt::failed(ChannelKind::Sms, body, "rejected", now())
            });
        }
        state.apply(patch, now());
    }

    #[test]
    fn sms_preferred_when_available() {
        let query = daytime_query();
        let decision = router().decide_channel(&state(), &query, now());
        assert_eq!(decision.channel, Some(ChannelKind::Sms));
    }

    #[test]
    fn sms_wins_even_when_email_also_available() {
        // Channel priority is unconditional on email state.
        let query = daytime_query();
        let s = state();
        let r = router();
        assert!(r.can_use_sms(&s, &query, now()));
        assert!(r.can_use_email(&s, &query, now()));
        assert_eq!(r.decide_channel(&s, &query, now()).channel, Some(ChannelKind::Sms));
    }

    #[test]
    fn daily_cap_blocks_sixth_sms() {
        // Five entries today block the sixth; four do not.
        let query = daytime_query();
        let r = router();

        let mut s = state();
        append_sms(&mut s, 4, true);
        assert!(r.can_use_sms(&s, &query, now()));

        append_sms(&mut s, 1, true);
        assert!(!r.can_use_sms(&s, &query, now()));
        assert_eq!(r.decide_channel(&s, &query, now()).channel, Some(ChannelKind::Email));
    }

    #[test]
    fn opt_out_blocks_both_channels() {
        // An opted-out contact gets no channel at all.
        let query = daytime_query();
        query.add_opt_out("+15125551234");
        query.add_opt_out("sarah@example.com");
        let r = router();
        let s = state();
        assert!(!r.can_use_sms(&s, &query, now()));
        assert!(!r.can_use_email(&s, &query, now()));
        assert_eq!(r.decide_channel(&s, &query, now()).channel, None);
    }

    #[test]
    fn opted_out_snapshot_blocks_without_query_membership() {
        let query = daytime_query();
        let mut s = state();
        let mut patch = StatePatch::default();
        patch.opted_out = Some(true);
        s.apply(patch, now());
        let r = router();
        assert!(!r.can_use_sms(&s, &query, now()));
        assert!(!r.can_use_email(&s, &query, now()));
    }

    #[test]
    fn recent_sms_failure_forces_email() {
        let query = daytime_query();
        let mut s = state();
        append_sms(&mut s, 1, false);
        let decision = router().decide_channel(&s, &query, now());
        assert_eq!(decision.channel, Some(ChannelKind::Email));
    }

    #[test]
    fn stale_sms_failure_does_not_block() {
        let query = daytime_query();
        let mut s = state();
        let mut patch = StatePatch::default();
        patch.log_entries.push(CommunicationAttempt::failed(
            ChannelKind::Sms,
            "old",
            "rejected",
            now() - TimeDelta::hours(30),
        ));
        s.apply(patch, now());
        assert!(router().can_use_sms(&s, &query, now()));
    }

    #[test]
    fn quiet_hours_block_sms_but_not_email() {
        let query = LocalComplianceQuery::new(QuietHours::default(), || {
            NaiveTime::from_hms_opt(23, 0, 0).unwrap()
        });
        let s = state();
        let r = router();
        assert!(!r.can_use_sms(&s, &query, now()));
        assert!(r.can_use_email(&s, &query, now()));
        assert_eq!(r.decide_channel(&s, &query, now()).channel, Some(ChannelKind::Email));
    }

    #[test]
    fn missing_contacts_yield_none() {
        let query = daytime_query();
        let mut s = state();
        s.phone = None;
        s.email = None;
        let decision = router().decide_channel(&s, &query, now());
        assert_eq!(decision.channel, None);
        assert_eq!(decision.reason, "no communication channels available");
    }

    #[test]
    fn email_daily_cap_enforced() {
        let query = daytime_query();
        let mut s = state();
        s.phone = None;
        let mut patch = StatePatch::default();
        for i in 0..3 {
            patch.log_entries.push(CommunicationAttempt::succeeded(
                ChannelKind::Email,
                format!("email {i}"),
                None,
                now(),
            ));
        }
        s.apply(patch, now());
        assert!(!router().can_use_email(&s, &query, now()));
        assert_eq!(router().decide_channel(&s, &query, now()).channel, None);
    }
}
