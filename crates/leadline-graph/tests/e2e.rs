// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end conversation flows through the graph runner.

use std::sync::Arc;

use leadline_compliance::LocalComplianceQuery;
use leadline_config::LeadlineConfig;
use leadline_core::types::{Action, ChannelKind, FieldKey, PropertyType, Stage};
use leadline_graph::{GraphDependencies, GraphRunner};
use leadline_routing::ResilientClassifier;
use leadline_state::{BookingContext, BookingStatus, CommunicationAttempt, StatePatch};
use leadline_test_utils::{
    daytime_query, fixed_now, sample_state, MockCalendar, MockTransport,
};

struct Harness {
    runner: GraphRunner,
    sms: Arc<MockTransport>,
    email: Arc<MockTransport>,
    calendar: Arc<MockCalendar>,
}

fn harness_with_query(query: LocalComplianceQuery) -> Harness {
    let sms = Arc::new(MockTransport::new(ChannelKind::Sms));
    let email = Arc::new(MockTransport::new(ChannelKind::Email));
    let calendar = Arc::new(MockCalendar::new());
    let deps = GraphDependencies {
        classifier: Arc::new(ResilientClassifier::rules_only()),
        enricher: None,
        sms_transport: sms.clone(),
        email_transport: email.clone(),
        calendar: calendar.clone(),
        compliance: Arc::new(query),
    };
    Harness {
        runner: GraphRunner::new(deps, &LeadlineConfig::default()),
        sms,
        email,
        calendar,
    }
}

fn harness() -> Harness {
    harness_with_query(daytime_query())
}

#[tokio::test]
async fn vacant_reply_fills_occupancy_and_asks_condition() {
    let h = harness();
    let mut state = sample_state(PropertyType::FixFlip);
    state.apply(StatePatch::default().with_stage(Stage::Qualifying), fixed_now());

    let report = h
        .runner
        .process_event(state, Some("it's vacant".into()), fixed_now())
        .await;

    assert_eq!(
        report.state.qualification().get(FieldKey::OccupancyStatus),
        Some("vacant")
    );
    assert_eq!(report.final_action, Action::MessageSent);
    assert_eq!(report.outbound.len(), 1);
    assert_eq!(report.outbound[0].channel, ChannelKind::Sms);
    assert!(report.outbound[0].body.contains("condition"));
    assert!(!report.outbound[0].body.contains("vacant, rented, or owner-occupied"));
}

#[tokio::test]
async fn final_price_answer_completes_qualification() {
    let h = harness();
    let mut state = sample_state(PropertyType::FixFlip);
    let mut patch = StatePatch::default().with_stage(Stage::Qualifying);
    for (key, value) in [
        (FieldKey::OccupancyStatus, "vacant"),
        (FieldKey::Condition, "needs_work"),
        (FieldKey::RepairsNeeded, "roof_issues"),
        (FieldKey::Timeline, "immediate"),
        (FieldKey::Access, "lockbox"),
    ] {
        patch.qualification.push((key, value.into()));
    }
    state.apply(patch, fixed_now());

    let report = h
        .runner
        .process_event(state, Some("around $200k".into()), fixed_now())
        .await;

    assert_eq!(
        report.state.qualification().get(FieldKey::PriceExpectation),
        Some("200000")
    );
    assert_eq!(report.state.stage(), Stage::Interested);
    assert!(report.outbound[0].body.contains("15-minute call"));
}

#[tokio::test]
async fn opted_out_lead_gets_no_initial_outreach() {
    let query = daytime_query();
    query.add_opt_out("+12145551234");
    let h = harness_with_query(query);

    let report = h
        .runner
        .process_event(sample_state(PropertyType::FixFlip), None, fixed_now())
        .await;

    assert_eq!(report.final_action, Action::ComplianceFailed);
    assert!(report.outbound.is_empty());
    assert!(report.state.log().is_empty());
    assert_eq!(h.sms.delivery_count().await, 0);
    assert_eq!(h.email.delivery_count().await, 0);
}

#[tokio::test]
async fn daily_sms_cap_routes_to_email() {
    let h = harness();
    let mut state = sample_state(PropertyType::FixFlip);
    let mut patch = StatePatch::default().with_stage(Stage::Qualifying);
    for i in 0..5 {
        patch.log_entries.push(CommunicationAttempt::succeeded(
            ChannelKind::Sms,
            format!("msg {i}"),
            None,
            fixed_now(),
        ));
    }
    state.apply(patch, fixed_now());

    let report = h
        .runner
        .process_event(state, Some("it's vacant".into()), fixed_now())
        .await;

    assert_eq!(report.outbound.len(), 1);
    assert_eq!(report.outbound[0].channel, ChannelKind::Email);
    assert_eq!(h.sms.delivery_count().await, 0);
}

#[tokio::test]
async fn confirmed_booking_context_goes_straight_to_calendar() {
    let h = harness();
    let mut state = sample_state(PropertyType::FixFlip);
    let mut patch = StatePatch::default().with_stage(Stage::Booking);
    patch.booking_context = Some(BookingContext {
        confirmed_time: Some(fixed_now() + chrono::TimeDelta::days(1)),
        confirmed_time_label: Some("tomorrow at 2:00 PM".into()),
        confirmed_email: Some("a@b.com".into()),
        last_prompt: None,
        suppress_confirmation: false,
    });
    state.apply(patch, fixed_now());

    let report = h
        .runner
        .process_event(state, Some("ok".into()), fixed_now())
        .await;

    let requests = h.calendar.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].attendee_email.as_deref(), Some("a@b.com"));
    assert_eq!(report.state.stage(), Stage::Scheduled);
    let details = report.state.booking_details.as_ref().unwrap();
    assert_eq!(details.status, BookingStatus::Scheduled);
    assert!(report.outbound[0].body.contains("scheduled"));
}

#[tokio::test]
async fn stop_reply_latches_opt_out_for_good() {
    let h = harness();
    let state = sample_state(PropertyType::LongTermRental);

    let report = h
        .runner
        .process_event(state, Some("STOP".into()), fixed_now())
        .await;

    assert_eq!(report.final_action, Action::OptOut);
    assert!(report.state.compliance.opted_out);
    assert_eq!(report.state.stage(), Stage::NotInterested);
    // The opt-out confirmation still goes out.
    assert_eq!(report.outbound.len(), 1);
    assert!(report.outbound[0].body.contains("removed"));

    // No further outbound is ever routed.
    let deliveries_before = h.sms.delivery_count().await;
    let follow_up = h.runner.process_event(report.state, None, fixed_now()).await;
    assert_eq!(follow_up.final_action, Action::ComplianceFailed);
    assert!(follow_up.outbound.is_empty());
    assert_eq!(h.sms.delivery_count().await, deliveries_before);
}

#[tokio::test]
async fn sms_failure_falls_back_to_email_once() {
    let h = harness();
    h.sms.fail_next("carrier rejected").await;
    let mut state = sample_state(PropertyType::FixFlip);
    state.apply(StatePatch::default().with_stage(Stage::Qualifying), fixed_now());

    let report = h
        .runner
        .process_event(state, Some("it's vacant".into()), fixed_now())
        .await;

    assert_eq!(report.final_action, Action::MessageSent);
    assert_eq!(report.outbound.len(), 1);
    assert_eq!(report.outbound[0].channel, ChannelKind::Email);
    assert!(report.state.sms_failed);

    let entries = report.state.log().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].channel, ChannelKind::Sms);
    assert!(!entries[0].success);
    assert_eq!(entries[1].channel, ChannelKind::Email);
    assert!(entries[1].success);
}

#[tokio::test]
async fn no_channels_available_goes_silent() {
    let h = harness();
    let mut state = sample_state(PropertyType::VacantLand);
    state.phone = None;
    state.email = None;

    let report = h.runner.process_event(state, None, fixed_now()).await;

    assert_eq!(report.final_action, Action::NoChannelsAvailable);
    assert!(report.outbound.is_empty());
    assert_eq!(
        report.state.routing.next_action,
        Some(Action::NoChannelsAvailable)
    );
}

#[tokio::test]
async fn decline_reply_sends_polite_closure() {
    let h = harness();
    let mut state = sample_state(PropertyType::VacantLand);
    state.apply(StatePatch::default().with_stage(Stage::Qualifying), fixed_now());

    let report = h
        .runner
        .process_event(state, Some("no thanks, not interested".into()), fixed_now())
        .await;

    assert_eq!(report.final_action, Action::MarkNotInterested);
    assert_eq!(report.state.stage(), Stage::NotInterested);
    assert_eq!(report.outbound.len(), 1);
    assert!(report.outbound[0].body.contains("No problem"));
}

#[tokio::test]
async fn initial_outreach_uses_property_template() {
    let h = harness();
    let report = h
        .runner
        .process_event(sample_state(PropertyType::FixFlip), None, fixed_now())
        .await;

    assert_eq!(report.final_action, Action::MessageSent);
    assert_eq!(report.outbound.len(), 1);
    let body = &report.outbound[0].body;
    assert!(body.contains("cash offer"));
    assert!(body.contains("STOP"));
    assert!(body.contains("123 Oak Street"));
    assert_eq!(report.state.counters.total_messages_sent, 1);
}

#[tokio::test]
async fn follow_up_tick_escalates_template() {
    let h = harness();
    let first = h
        .runner
        .process_event(sample_state(PropertyType::FixFlip), None, fixed_now())
        .await;
    let second = h.runner.process_event(first.state, None, fixed_now()).await;

    assert_eq!(second.outbound.len(), 1);
    assert!(second.outbound[0].body.contains("Just checking in"));
}

#[tokio::test]
async fn booking_flow_collects_time_then_email() {
    let h = harness();
    let mut state = sample_state(PropertyType::FixFlip);
    state.email = None;
    state.apply(StatePatch::default().with_stage(Stage::Booking), fixed_now());

    // Time only: the runner should ask for an email.
    let report = h
        .runner
        .process_event(state, Some("tomorrow at 2pm".into()), fixed_now())
        .await;
    assert!(report.outbound[0].body.contains("email"));
    assert!(report.state.booking.confirmed_time.is_some());

    // Email arrives: calendar event is created without re-asking the time.
    let report = h
        .runner
        .process_event(report.state, Some("john@example.com".into()), fixed_now())
        .await;
    assert_eq!(h.calendar.requests().await.len(), 1);
    assert_eq!(report.state.stage(), Stage::Scheduled);
}

#[tokio::test]
async fn calendar_outage_degrades_to_manual_follow_up() {
    let sms = Arc::new(MockTransport::new(ChannelKind::Sms));
    let email = Arc::new(MockTransport::new(ChannelKind::Email));
    let calendar = Arc::new(MockCalendar::unavailable());
    let deps = GraphDependencies {
        classifier: Arc::new(ResilientClassifier::rules_only()),
        enricher: None,
        sms_transport: sms.clone(),
        email_transport: email,
        calendar,
        compliance: Arc::new(daytime_query()),
    };
    let runner = GraphRunner::new(deps, &LeadlineConfig::default());

    let mut state = sample_state(PropertyType::FixFlip);
    state.apply(StatePatch::default().with_stage(Stage::Booking), fixed_now());

    let report = runner
        .process_event(state, Some("tomorrow at 2pm".into()), fixed_now())
        .await;

    // Lead email is on file, so scheduling proceeds despite the outage.
    let details = report.state.booking_details.as_ref().unwrap();
    assert_eq!(details.status, BookingStatus::PendingManualFollowUp);
    assert_eq!(report.state.stage(), Stage::Scheduled);
    assert!(report.outbound[0].body.contains("follow up with a calendar invite"));
}

#[tokio::test]
async fn distinct_leads_process_concurrently() {
    let h = Arc::new(harness());
    let mut other = sample_state(PropertyType::VacantLand);
    other.lead_id = leadline_core::types::LeadId("lead-2".into());
    other.phone = Some("+15125551234".into());

    let (a, b) = tokio::join!(
        h.runner
            .process_event(sample_state(PropertyType::FixFlip), None, fixed_now()),
        h.runner.process_event(other, None, fixed_now()),
    );

    assert_eq!(a.final_action, Action::MessageSent);
    assert_eq!(b.final_action, Action::MessageSent);
    assert_eq!(h.sms.delivery_count().await, 2);
}
