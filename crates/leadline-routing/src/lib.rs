// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing for the Leadline outreach engine.
//!
//! This crate provides:
//! - [`KeywordClassifier`] / [`ResilientClassifier`]: deterministic intent
//!   classification with optional remote-model layering
//! - [`Supervisor`]: top-level handler dispatch per conversation turn
//! - [`CommunicationRouter`]: SMS-first channel selection under compliance,
//!   failure-history, and daily-cap constraints

pub mod channel_router;
pub mod classifier;
pub mod supervisor;

pub use channel_router::{ChannelDecision, CommunicationRouter};
pub use classifier::{keyword_analysis, KeywordClassifier, ResilientClassifier};
pub use supervisor::Supervisor;
