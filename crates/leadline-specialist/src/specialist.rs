// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-property-type qualification specialist.
//!
//! A specialist owns one property type's ordered field list and dialogue
//! script. On each inbound message it merges extracted fields (fill-only-
//! if-empty), then either asks about the first still-missing field or
//! emits the qualification-complete message and signals that booking is
//! next.

use tracing::{debug, info};

use leadline_config::AgentConfig;
use leadline_core::types::{Action, FieldKey, HandlerId, PropertyType, Stage};
use leadline_state::{ConversationState, QualificationData, StatePatch};

use crate::extract::QualificationExtractor;
use crate::templates::{render, script_for, SpecialistScript};

/// A specialist's response for one turn.
#[derive(Debug)]
pub struct SpecialistReply {
    /// Outbound message body to deliver to the lead.
    pub body: String,
    pub patch: StatePatch,
    /// True when every required field is filled and the caller should
    /// route to the booking agent next.
    pub qualification_complete: bool,
}

/// Qualification script runner for one property type.
pub struct PropertySpecialist {
    script: &'static SpecialistScript,
    extractor: QualificationExtractor,
    identity: AgentConfig,
}

impl PropertySpecialist {
    pub fn new(
        property_type: PropertyType,
        extractor: QualificationExtractor,
        identity: AgentConfig,
    ) -> Self {
        Self {
            script: script_for(property_type),
            extractor,
            identity,
        }
    }

    pub fn property_type(&self) -> PropertyType {
        self.script.property_type
    }

    pub fn handler_id(&self) -> HandlerId {
        HandlerId::specialist_for(self.script.property_type)
    }

    /// The first required field with no value, or `None` when
    /// qualification is complete.
    pub fn next_missing_field(&self, qualification: &QualificationData) -> Option<FieldKey> {
        self.script
            .required
            .iter()
            .copied()
            .find(|field| !qualification.is_filled(*field))
    }

    /// The canned question for a field, rendered for this lead.
    pub fn question_for(&self, state: &ConversationState, field: FieldKey) -> String {
        let template = self.script.prompt_for(field).unwrap_or(self.script.completion);
        self.render(state, template)
    }

    /// The initial outreach message for this lead.
    pub fn initial_outreach(&self, state: &ConversationState) -> String {
        self.render(state, self.script.initial_outreach)
    }

    /// The follow-up message for a lead who has gone quiet, escalating
    /// with the number of messages already sent.
    pub fn follow_up(&self, state: &ConversationState) -> String {
        let sent = state.counters.total_messages_sent as usize;
        let idx = sent.saturating_sub(1).min(self.script.follow_ups.len() - 1);
        self.render(state, self.script.follow_ups[idx])
    }

    /// Merge newly-extracted fields and continue the qualification script.
    ///
    /// Extraction failures never abort the turn: the extractor swallows
    /// enrichment errors and returns whatever the rule layer found.
    pub async fn continue_qualification(
        &self,
        state: &ConversationState,
        text: &str,
    ) -> SpecialistReply {
        let fills = self
            .extractor
            .extract(
                self.script.property_type,
                text,
                state.qualification(),
                self.script.required,
            )
            .await;

        let mut patch = StatePatch::for_handler(self.handler_id());
        patch.qualification = fills.clone();

        // Next missing field after this merge lands.
        let next = self.script.required.iter().copied().find(|field| {
            !state.qualification().is_filled(*field) && !fills.iter().any(|(k, _)| k == field)
        });

        match next {
            Some(field) => {
                debug!(
                    lead_id = %state.lead_id,
                    field = %field,
                    "continuing qualification"
                );
                patch.stage = Some(Stage::Qualifying);
                patch.next_action = Some(Action::SendMessage);
                SpecialistReply {
                    body: self.question_for(state, field),
                    patch,
                    qualification_complete: false,
                }
            }
            None => {
                info!(lead_id = %state.lead_id, "qualification complete");
                patch.stage = Some(Stage::Interested);
                patch.next_action = Some(Action::ScheduleAppointment);
                SpecialistReply {
                    body: self.render(state, self.script.completion),
                    patch,
                    qualification_complete: true,
                }
            }
        }
    }

    /// Respond to an objection or question with a canned rebuttal.
    pub fn handle_objection(&self, state: &ConversationState, text: &str) -> SpecialistReply {
        let lower = text.to_lowercase();
        let template = self
            .script
            .objections
            .iter()
            .find(|rule| rule.keywords.iter().any(|kw| lower.contains(kw)))
            .map(|rule| rule.response)
            .unwrap_or(self.script.generic_objection);

        let mut patch = StatePatch::for_handler(self.handler_id());
        patch.objections.push(text.to_string());
        patch.next_action = Some(Action::SendMessage);

        SpecialistReply {
            body: self.render(state, template),
            patch,
            qualification_complete: false,
        }
    }

    /// Polite closure when the lead declines.
    pub fn handle_decline(&self, state: &ConversationState) -> SpecialistReply {
        let mut patch =
            StatePatch::for_handler(self.handler_id()).with_stage(Stage::NotInterested);
        patch.next_action = Some(Action::SendMessage);
        SpecialistReply {
            body: self.render(state, self.script.decline),
            patch,
            qualification_complete: false,
        }
    }

    fn render(&self, state: &ConversationState, template: &str) -> String {
        render(
            template,
            &state.lead_name,
            &state.property_address,
            &self.identity.agent_name,
        )
    }
}
