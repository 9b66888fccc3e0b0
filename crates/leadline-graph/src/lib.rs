// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graph execution for the Leadline outreach engine.
//!
//! [`GraphRunner`] wires the supervisor, property specialists, booking
//! agent, and channel agents into a directed handler graph and runs one
//! pass per inbound event, serialized per lead.

pub mod runner;

pub use runner::{GraphDependencies, GraphRunner, SentMessage, TurnReport};
