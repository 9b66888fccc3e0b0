// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking sub-flow for the Leadline outreach engine.
//!
//! This crate provides:
//! - [`BookingAgent`]: the scheduling state machine over confirmed time +
//!   contact email, with degraded handling for calendar failures and an
//!   escalating no-show sequence
//! - Time/email parsing for booking replies ([`timeparse`])

pub mod booking;
pub mod timeparse;

pub use booking::{BookingAgent, BookingTurn};
pub use timeparse::{
    format_slot, is_affirmative_only, parse_email, parse_time_selection, SelectionKind,
    TimeSelection,
};
