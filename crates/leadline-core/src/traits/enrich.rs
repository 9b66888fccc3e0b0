// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured field enrichment trait.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::LeadlineError;
use crate::types::{FieldKey, PropertyType};

/// Extracts structured qualification fields from free text.
///
/// Callers send exactly the schema of still-missing fields, never fields
/// that are already filled. Implementations backed by a remote service may
/// return malformed data; the extractor discards anything it cannot use
/// without mutating state.
#[async_trait]
pub trait FieldEnricher: Send + Sync {
    async fn extract_fields(
        &self,
        property_type: PropertyType,
        text: &str,
        missing: &[FieldKey],
    ) -> Result<BTreeMap<FieldKey, String>, LeadlineError>;
}
