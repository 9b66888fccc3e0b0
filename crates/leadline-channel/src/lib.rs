// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel agents for the Leadline outreach engine.
//!
//! The engine decides *that* and *what* to send; these agents own the
//! pre-send compliance re-check, recipient validation, attempt logging,
//! and the single SMS-to-email fallback. Vendor calls go through the
//! injected [`leadline_core::MessageTransport`].

pub mod email;
pub mod sms;
pub mod validate;

use leadline_state::StatePatch;

pub use email::EmailChannelAgent;
pub use sms::SmsChannelAgent;
pub use validate::{normalize_us_phone, validate_email};

/// Whether this send answers an inbound message or initiates contact.
///
/// Inbound replies bypass quiet hours (a lead who just texted should get
/// an answer); they never bypass opt-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    Outbound,
    InboundReply,
}

/// What the caller should do after a send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendDirective {
    /// Delivered; no further action.
    Sent,
    /// SMS failed or was unavailable; try email.
    FallbackToEmail,
    /// Email failed; no further channel exists, surface to an operator.
    Escalate,
}

/// Result of a channel agent send: the directive plus state deltas.
#[derive(Debug)]
pub struct ChannelOutcome {
    pub directive: SendDirective,
    pub provider_message_id: Option<String>,
    pub patch: StatePatch,
}

impl ChannelOutcome {
    fn fallback(patch: StatePatch) -> Self {
        Self {
            directive: SendDirective::FallbackToEmail,
            provider_message_id: None,
            patch,
        }
    }

    fn escalate(patch: StatePatch) -> Self {
        Self {
            directive: SendDirective::Escalate,
            provider_message_id: None,
            patch,
        }
    }
}
