// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state model for the Leadline outreach engine.
//!
//! This crate provides:
//! - [`ConversationState`]: the per-lead record threaded through handlers
//! - [`QualificationData`]: monotonic, fill-only-if-empty field storage
//! - [`CommunicationLog`]: append-only delivery attempt history
//! - [`StatePatch`] / [`Decision`]: the immutable-in, patch-out write path
//!
//! The engine performs no persistence itself. Callers receive the patched
//! state at the end of a turn and persist it keyed by lead id.

pub mod comms_log;
pub mod conversation;
pub mod patch;
pub mod qualification;

pub use comms_log::{CommunicationAttempt, CommunicationLog};
pub use conversation::{
    BookingContext, BookingDetails, BookingPrompt, BookingStatus, ComplianceSnapshot,
    ConversationState, Counters, RoutingMeta,
};
pub use patch::{Decision, StatePatch};
pub use qualification::QualificationData;
