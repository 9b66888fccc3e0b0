// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Leadline workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a lead (prospective property seller).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

impl std::fmt::Display for LeadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an outreach campaign.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub String);

/// Property type driving specialist selection and qualification scripts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    FixFlip,
    VacantLand,
    LongTermRental,
}

/// Communication medium.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Sms,
    Email,
}

/// Position of a lead in the conversation lifecycle.
///
/// Transitions are monotonic forward through the ranked stages, with two
/// exceptions: any active stage may decline to [`Stage::NotInterested`],
/// and the side states [`Stage::FollowUp`] / [`Stage::Responding`] may be
/// entered from (and left toward) any active stage. All transitions go
/// through [`Stage::can_transition`]; nothing else assigns stages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Initial,
    Qualifying,
    Interested,
    Booking,
    Scheduled,
    Completed,
    NotInterested,
    FollowUp,
    Responding,
}

impl Stage {
    /// Forward rank for monotonicity checks. Side and terminal-decline
    /// states have no rank.
    fn rank(self) -> Option<u8> {
        match self {
            Stage::Initial => Some(0),
            Stage::Qualifying => Some(1),
            Stage::Interested => Some(2),
            Stage::Booking => Some(3),
            Stage::Scheduled => Some(4),
            Stage::Completed => Some(5),
            Stage::NotInterested | Stage::FollowUp | Stage::Responding => None,
        }
    }

    /// Whether the conversation is over at this stage.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Completed | Stage::NotInterested)
    }

    /// Whether a transition from `self` to `to` is allowed.
    pub fn can_transition(self, to: Stage) -> bool {
        if self == to {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        // Explicit decline path from any active stage.
        if to == Stage::NotInterested {
            return true;
        }
        // Side states are reachable from any active stage, and leaving a
        // side state toward any ranked stage is allowed.
        if matches!(to, Stage::FollowUp | Stage::Responding) {
            return true;
        }
        match (self.rank(), to.rank()) {
            (Some(from), Some(target)) => target >= from,
            (None, Some(_)) => true,
            _ => false,
        }
    }
}

/// A structured qualification data point.
///
/// Required field lists per property type live with the specialist
/// scripts; the extractor may also fill non-required keys (motivation,
/// liens, rental income) that never gate completeness.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    OccupancyStatus,
    Condition,
    RepairsNeeded,
    Timeline,
    Access,
    PriceExpectation,
    Acreage,
    RoadAccess,
    Utilities,
    RentalStatus,
    Motivation,
    Liens,
    RentalIncome,
    TenantSituation,
}

/// Intent classes produced by the intent classifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Interested,
    NotInterested,
    ReadyToBook,
    Objection,
    Question,
    Unknown,
}

/// Conversation sentiment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Communication style detected from a lead's messages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommunicationStyle {
    Formal,
    Casual,
    Neutral,
}

/// Urgency signal from a lead's messages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Result of analyzing an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAnalysis {
    pub intent: Intent,
    pub sentiment: Sentiment,
    pub style: CommunicationStyle,
    pub urgency: Urgency,
}

impl MessageAnalysis {
    /// Neutral analysis used when nothing matched.
    pub fn unknown() -> Self {
        Self {
            intent: Intent::Unknown,
            sentiment: Sentiment::Neutral,
            style: CommunicationStyle::Neutral,
            urgency: Urgency::Medium,
        }
    }
}

/// Handler nodes in the conversation graph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HandlerId {
    Supervisor,
    CommunicationRouter,
    SmsAgent,
    EmailAgent,
    FixFlipSpecialist,
    VacantLandSpecialist,
    RentalSpecialist,
    BookingAgent,
    End,
}

impl HandlerId {
    /// The specialist handler for a property type.
    pub fn specialist_for(property_type: PropertyType) -> Self {
        match property_type {
            PropertyType::FixFlip => HandlerId::FixFlipSpecialist,
            PropertyType::VacantLand => HandlerId::VacantLandSpecialist,
            PropertyType::LongTermRental => HandlerId::RentalSpecialist,
        }
    }
}

/// Actions attached to routing decisions.
///
/// A closed enum rather than free-form tokens: the graph runner dispatches
/// on these with an exhaustive match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Action {
    InitialOutreach,
    ComplianceFailed,
    OptOut,
    MarkNotInterested,
    ContinueQualification,
    HandleObjection,
    ScheduleAppointment,
    SendMessage,
    MessageSent,
    FallbackToEmail,
    Escalate,
    NoChannelsAvailable,
    ScheduledSilently,
    NoShowFollowUp,
    HandlerError,
}

/// Outcome of a single transport delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOutcome {
    pub success: bool,
    pub provider_id: Option<String>,
    pub error: Option<String>,
}

impl SendOutcome {
    pub fn delivered(provider_id: impl Into<String>) -> Self {
        Self {
            success: true,
            provider_id: Some(provider_id.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            provider_id: None,
            error: Some(error.into()),
        }
    }
}

/// Request to create an external calendar event for a consultation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRequest {
    pub start: chrono::DateTime<chrono::Utc>,
    pub duration_minutes: u32,
    pub attendee_email: Option<String>,
    pub summary: String,
    pub description: String,
}

/// Details of a created calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    pub event_id: String,
    pub meeting_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn property_type_round_trips_through_strings() {
        for pt in [
            PropertyType::FixFlip,
            PropertyType::VacantLand,
            PropertyType::LongTermRental,
        ] {
            let s = pt.to_string();
            assert_eq!(PropertyType::from_str(&s).unwrap(), pt);
        }
        assert_eq!(PropertyType::FixFlip.to_string(), "fix_flip");
        assert_eq!(PropertyType::LongTermRental.to_string(), "long_term_rental");
    }

    #[test]
    fn stage_forward_transitions_allowed() {
        assert!(Stage::Initial.can_transition(Stage::Qualifying));
        assert!(Stage::Qualifying.can_transition(Stage::Interested));
        assert!(Stage::Interested.can_transition(Stage::Booking));
        assert!(Stage::Booking.can_transition(Stage::Scheduled));
        assert!(Stage::Scheduled.can_transition(Stage::Completed));
        // Skipping stages forward is fine.
        assert!(Stage::Initial.can_transition(Stage::Booking));
    }

    #[test]
    fn stage_backward_transitions_rejected() {
        assert!(!Stage::Booking.can_transition(Stage::Qualifying));
        assert!(!Stage::Scheduled.can_transition(Stage::Initial));
        assert!(!Stage::Interested.can_transition(Stage::Initial));
    }

    #[test]
    fn decline_allowed_from_any_active_stage() {
        for from in [
            Stage::Initial,
            Stage::Qualifying,
            Stage::Interested,
            Stage::Booking,
            Stage::Scheduled,
            Stage::FollowUp,
            Stage::Responding,
        ] {
            assert!(from.can_transition(Stage::NotInterested), "{from} should decline");
        }
    }

    #[test]
    fn terminal_stages_are_sticky() {
        assert!(!Stage::NotInterested.can_transition(Stage::Qualifying));
        assert!(!Stage::Completed.can_transition(Stage::Booking));
        assert!(!Stage::Completed.can_transition(Stage::NotInterested));
    }

    #[test]
    fn side_states_bridge_forward() {
        assert!(Stage::Qualifying.can_transition(Stage::Responding));
        assert!(Stage::Responding.can_transition(Stage::Booking));
        assert!(Stage::Booking.can_transition(Stage::FollowUp));
        assert!(Stage::FollowUp.can_transition(Stage::Scheduled));
    }

    #[test]
    fn specialist_for_each_property_type() {
        assert_eq!(
            HandlerId::specialist_for(PropertyType::FixFlip),
            HandlerId::FixFlipSpecialist
        );
        assert_eq!(
            HandlerId::specialist_for(PropertyType::VacantLand),
            HandlerId::VacantLandSpecialist
        );
        assert_eq!(
            HandlerId::specialist_for(PropertyType::LongTermRental),
            HandlerId::RentalSpecialist
        );
    }

    #[test]
    fn field_key_serialization() {
        let key = FieldKey::OccupancyStatus;
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"occupancy_status\"");
        let parsed: FieldKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn action_display_snake_case() {
        assert_eq!(Action::FallbackToEmail.to_string(), "fallback_to_email");
        assert_eq!(Action::NoChannelsAvailable.to_string(), "no_channels_available");
    }
}
