// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock message transport for deterministic testing.
//!
//! `MockTransport` implements `MessageTransport` with scripted outcomes
//! and captured deliveries for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use leadline_core::types::{ChannelKind, SendOutcome};
use leadline_core::{LeadlineError, MessageTransport};

/// A delivery captured by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedDelivery {
    pub to: String,
    pub body: String,
}

/// A mock transport for one channel.
///
/// By default every delivery succeeds with a generated provider id.
/// Failures can be scripted with [`MockTransport::push_outcome`]; scripted
/// outcomes are consumed in order, after which the mock reverts to
/// success.
pub struct MockTransport {
    kind: ChannelKind,
    scripted: Mutex<VecDeque<SendOutcome>>,
    deliveries: Arc<Mutex<Vec<CapturedDelivery>>>,
}

impl MockTransport {
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            scripted: Mutex::new(VecDeque::new()),
            deliveries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue an outcome for the next delivery attempt.
    pub async fn push_outcome(&self, outcome: SendOutcome) {
        self.scripted.lock().await.push_back(outcome);
    }

    /// Queue a failure for the next delivery attempt.
    pub async fn fail_next(&self, error: &str) {
        self.push_outcome(SendOutcome::failed(error)).await;
    }

    /// All deliveries that reached the transport (successful or not).
    pub async fn deliveries(&self) -> Vec<CapturedDelivery> {
        self.deliveries.lock().await.clone()
    }

    pub async fn delivery_count(&self) -> usize {
        self.deliveries.lock().await.len()
    }
}

#[async_trait]
impl MessageTransport for MockTransport {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn deliver(&self, to: &str, body: &str) -> Result<SendOutcome, LeadlineError> {
        self.deliveries.lock().await.push(CapturedDelivery {
            to: to.to_string(),
            body: body.to_string(),
        });
        if let Some(outcome) = self.scripted.lock().await.pop_front() {
            return Ok(outcome);
        }
        Ok(SendOutcome::delivered(format!(
            "{}-{}",
            self.kind,
            uuid::Uuid::new_v4()
        )))
    }
}
