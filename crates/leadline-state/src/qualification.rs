// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property qualification data with fill-only-if-empty merge semantics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use leadline_core::types::FieldKey;

/// Structured qualification answers collected from a lead.
///
/// Fields are keyed by [`FieldKey`]; a `custom` map holds truly dynamic
/// extras that have no typed key. Merges are monotonic: a field that holds
/// a non-empty value is never overwritten by a later pass, so a
/// low-confidence extraction can never clobber an earlier answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationData {
    fields: BTreeMap<FieldKey, String>,
    #[serde(default)]
    custom: BTreeMap<String, String>,
}

impl QualificationData {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored value for `key`, if non-empty.
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.fields
            .get(&key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Whether `key` holds a non-empty value.
    pub fn is_filled(&self, key: FieldKey) -> bool {
        self.get(key).is_some()
    }

    /// Store `value` under `key` only if the field is currently empty.
    ///
    /// Returns `true` if the value was stored. Empty or whitespace-only
    /// values are never stored.
    pub fn fill(&mut self, key: FieldKey, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.trim().is_empty() || self.is_filled(key) {
            return false;
        }
        self.fields.insert(key, value);
        true
    }

    /// Apply a batch of fills, returning how many were stored.
    pub fn fill_all<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (FieldKey, String)>,
    {
        pairs
            .into_iter()
            .filter(|(key, value)| self.fill(*key, value.clone()))
            .count()
    }

    /// Number of filled typed fields.
    pub fn filled_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .count()
    }

    /// Iterate over filled typed fields.
    pub fn filled(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.fields
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| (*k, v.as_str()))
    }

    /// Store a dynamic custom value (same fill-only-empty rule).
    pub fn fill_custom(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        let value = value.into();
        if value.trim().is_empty() {
            return false;
        }
        if self
            .custom
            .get(&key)
            .is_some_and(|existing| !existing.trim().is_empty())
        {
            return false;
        }
        self.custom.insert(key, value);
        true
    }

    /// The dynamic custom map.
    pub fn custom(&self) -> &BTreeMap<String, String> {
        &self.custom
    }
}
