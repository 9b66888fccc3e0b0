// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External calendar scheduling trait.

use async_trait::async_trait;

use crate::error::LeadlineError;
use crate::types::{EventDetails, EventRequest};

/// Creates consultation-call events on an external calendar.
///
/// Failure is non-fatal: the booking agent confirms verbally and marks the
/// booking pending manual follow-up instead of failing the turn.
#[async_trait]
pub trait CalendarService: Send + Sync {
    async fn create_event(&self, request: &EventRequest) -> Result<EventDetails, LeadlineError>;
}
