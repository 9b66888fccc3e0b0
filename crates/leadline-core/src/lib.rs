// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Leadline outreach engine.
//!
//! This crate provides the foundational type vocabulary, error type, and
//! collaborator trait definitions used throughout the Leadline workspace.
//! The routing, specialist, channel, and booking crates all build on the
//! enums and traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::LeadlineError;
pub use types::{
    Action, CampaignId, ChannelKind, FieldKey, HandlerId, Intent, LeadId, MessageAnalysis,
    PropertyType, Sentiment, Stage,
};

pub use traits::{
    CalendarService, ClassifyContext, ComplianceQuery, FieldEnricher, IntentClassifier,
    MessageTransport,
};
