// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-type qualification scripts for the Leadline outreach engine.
//!
//! This crate provides:
//! - [`PropertySpecialist`]: the per-property-type qualification state machine
//! - [`QualificationExtractor`]: deterministic rule extraction with optional
//!   enrichment
//! - Static dialogue scripts (prompts, objection rebuttals, outreach and
//!   follow-up templates) per property type

pub mod extract;
pub mod fields;
pub mod specialist;
pub mod templates;

pub use extract::{extract_rules, parse_price, parse_timeline, QualificationExtractor};
pub use fields::required_fields;
pub use specialist::{PropertySpecialist, SpecialistReply};
pub use templates::{script_for, SpecialistScript};
