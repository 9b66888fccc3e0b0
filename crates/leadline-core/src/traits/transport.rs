// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message transport trait for per-channel delivery (SMS, email vendors).

use async_trait::async_trait;

use crate::error::LeadlineError;
use crate::types::{ChannelKind, SendOutcome};

/// Delivers a message through one concrete channel vendor.
///
/// The engine decides *that* and *what* to send; transports own the vendor
/// call, its credentials, and its timeout policy. A vendor-level rejection
/// is reported as `Ok(SendOutcome { success: false, .. })`; transport-layer
/// faults may surface as `Err`. Channel agents treat both as a failed
/// attempt.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Which channel this transport serves.
    fn kind(&self) -> ChannelKind;

    /// Deliver `body` to the validated address `to`.
    async fn deliver(&self, to: &str, body: &str) -> Result<SendOutcome, LeadlineError>;
}
