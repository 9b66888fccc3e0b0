// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Leadline outreach engine.
//!
//! Layered TOML configuration (compiled defaults, system, XDG user, local
//! directory, `LEADLINE_*` environment) with strict unknown-key rejection
//! and post-deserialization validation.

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    AgentConfig, BookingConfig, ChannelPolicyConfig, ComplianceConfig, LeadlineConfig,
};
pub use validation::validate_config;
