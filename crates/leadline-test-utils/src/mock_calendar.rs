// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock calendar service for deterministic testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use leadline_core::types::{EventDetails, EventRequest};
use leadline_core::{CalendarService, LeadlineError};

/// A mock calendar that records event requests.
///
/// Succeeds by default with a fixed meeting link; construct with
/// [`MockCalendar::unavailable`] to simulate calendar outages.
pub struct MockCalendar {
    fail: bool,
    requests: Arc<Mutex<Vec<EventRequest>>>,
}

impl MockCalendar {
    pub fn new() -> Self {
        Self {
            fail: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            fail: true,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All event requests received.
    pub async fn requests(&self) -> Vec<EventRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockCalendar {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CalendarService for MockCalendar {
    async fn create_event(&self, request: &EventRequest) -> Result<EventDetails, LeadlineError> {
        self.requests.lock().await.push(request.clone());
        if self.fail {
            return Err(LeadlineError::Calendar {
                message: "calendar service unavailable".into(),
                source: None,
            });
        }
        Ok(EventDetails {
            event_id: format!("evt-{}", uuid::Uuid::new_v4()),
            meeting_link: Some("https://meet.example.com/mock".into()),
        })
    }
}
