// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the routing core.
//!
//! Each trait is a narrow seam to functionality that lives outside this
//! engine: intent classification, field enrichment, channel transports,
//! calendar scheduling, and compliance lookups.

pub mod calendar;
pub mod classifier;
pub mod compliance;
pub mod enrich;
pub mod transport;

pub use calendar::CalendarService;
pub use classifier::{ClassifyContext, IntentClassifier};
pub use compliance::ComplianceQuery;
pub use enrich::FieldEnricher;
pub use transport::MessageTransport;
