// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classification trait for inbound lead messages.

use async_trait::async_trait;

use crate::error::LeadlineError;
use crate::types::{MessageAnalysis, PropertyType, Stage};

/// Conversation context handed to the classifier alongside the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyContext {
    pub property_type: PropertyType,
    pub stage: Stage,
}

/// Maps free text from a lead to an intent/sentiment analysis.
///
/// Implementations may call a remote model, but a deterministic
/// keyword-based implementation is always present and is the fallback
/// whenever a remote classifier errors. Classification failure is never
/// fatal to a turn.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(
        &self,
        text: &str,
        ctx: &ClassifyContext,
    ) -> Result<MessageAnalysis, LeadlineError>;
}
