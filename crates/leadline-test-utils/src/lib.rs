// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Leadline workspace.
//!
//! Mock collaborator implementations (transport, calendar, enricher) and
//! conversation-state builders used across crate tests.

pub mod mock_calendar;
pub mod mock_enricher;
pub mod mock_transport;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};

use leadline_compliance::{LocalComplianceQuery, QuietHours};
use leadline_core::types::{CampaignId, LeadId, PropertyType};
use leadline_state::ConversationState;

pub use mock_calendar::MockCalendar;
pub use mock_enricher::MockEnricher;
pub use mock_transport::{CapturedDelivery, MockTransport};

/// A fixed "now" used across tests: Tuesday 2026-03-10 15:00 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap()
}

/// A lead with both contact channels available.
pub fn sample_state(property_type: PropertyType) -> ConversationState {
    ConversationState::new(
        LeadId("lead-1".into()),
        "John",
        "123 Oak Street, Dallas, TX",
        property_type,
        CampaignId("camp-1".into()),
        fixed_now(),
    )
    .with_phone("+12145551234")
    .with_email("john@example.com")
}

/// A compliance query whose clock reads mid-afternoon (outside quiet hours).
pub fn daytime_query() -> LocalComplianceQuery {
    LocalComplianceQuery::new(QuietHours::default(), || {
        NaiveTime::from_hms_opt(14, 0, 0).unwrap()
    })
}

/// A compliance query whose clock reads late evening (inside quiet hours).
pub fn quiet_hours_query() -> LocalComplianceQuery {
    LocalComplianceQuery::new(QuietHours::default(), || {
        NaiveTime::from_hms_opt(23, 0, 0).unwrap()
    })
}
