// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock field enricher for deterministic testing.

use std::collections::BTreeMap;

use async_trait::async_trait;

use leadline_core::types::{FieldKey, PropertyType};
use leadline_core::{FieldEnricher, LeadlineError};

/// A scripted enricher returning fixed values for requested fields.
pub struct MockEnricher {
    values: BTreeMap<FieldKey, String>,
    fail: bool,
}

impl MockEnricher {
    pub fn with_values(values: BTreeMap<FieldKey, String>) -> Self {
        Self {
            values,
            fail: false,
        }
    }

    /// An enricher that always errors, for failure-path tests.
    pub fn failing() -> Self {
        Self {
            values: BTreeMap::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl FieldEnricher for MockEnricher {
    async fn extract_fields(
        &self,
        _property_type: PropertyType,
        _text: &str,
        missing: &[FieldKey],
    ) -> Result<BTreeMap<FieldKey, String>, LeadlineError> {
        if self.fail {
            return Err(LeadlineError::extraction("mock enricher failure"));
        }
        Ok(self
            .values
            .iter()
            .filter(|(key, _)| missing.contains(key))
            .map(|(key, value)| (*key, value.clone()))
            .collect())
    }
}
