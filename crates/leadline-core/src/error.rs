// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Leadline outreach engine.

use thiserror::Error;

/// The primary error type used across all Leadline collaborator traits and
/// core operations.
///
/// Every variant has a defined degraded path at the layer that observes it:
/// classification falls back to keyword rules, extraction skips the merge,
/// channel failures trigger fallback or escalation, and calendar failures
/// put the booking into pending-manual-follow-up. Nothing here is fatal to
/// a conversation turn.
#[derive(Debug, Error)]
pub enum LeadlineError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Intent classification errors (remote classifier unavailable or malformed).
    #[error("classification error: {message}")]
    Classification {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Structured field extraction errors (enrichment service unavailable or malformed).
    #[error("extraction error: {message}")]
    Extraction {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Channel transport errors (vendor rejection, connection failure).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Calendar event creation errors.
    #[error("calendar error: {message}")]
    Calendar {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A contact address failed validation before sending.
    #[error("invalid contact for {channel}: {reason}")]
    InvalidContact { channel: String, reason: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LeadlineError {
    /// Convenience constructor for channel errors without a source.
    pub fn channel(message: impl Into<String>) -> Self {
        LeadlineError::Channel {
            message: message.into(),
            source: None,
        }
    }

    /// Convenience constructor for extraction errors without a source.
    pub fn extraction(message: impl Into<String>) -> Self {
        LeadlineError::Extraction {
            message: message.into(),
            source: None,
        }
    }
}
