// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic qualification field extraction.
//!
//! Keyword and regex rules per field, plus an optional enrichment layer
//! that asks an external structured-extraction service only for fields the
//! rules left empty. Extraction is monotonic: a merge only adds
//! information, and enrichment failures are logged and skipped.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, warn};

use leadline_core::traits::enrich::FieldEnricher;
use leadline_core::types::{FieldKey, PropertyType};
use leadline_state::QualificationData;

/// Sentinel value some enrichment backends return for fields they could
/// not determine; never merged.
const UNKNOWN_SENTINEL: &str = "unknown";

static PRICE_WITH_SIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$\s*([\d,]+(?:\.\d+)?)\s*(k|m|million|grand)?").unwrap()
});
static PRICE_WITH_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*(k|m|million|grand)\b").unwrap());
static PRICE_DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{5,})\b").unwrap());
static ACREAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*(?:acres?|ac)\b").unwrap());
static TIMELINE_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s*(day|week|month)s?\b").unwrap());
static MONTHLY_INCOME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$?\s*([\d,]+)\s*(?:per\s*month|/\s*month|monthly|a\s*month)").unwrap()
});

/// Parse a dollar amount from free text, normalized to whole dollars.
///
/// Supports `$X`, `Xk`, `X million`, and plain digit runs of five or more
/// digits.
pub fn parse_price(text: &str) -> Option<u64> {
    let to_amount = |digits: &str, suffix: Option<&str>| -> Option<u64> {
        let base: f64 = digits.replace(',', "").parse().ok()?;
        let multiplier = match suffix.map(|s| s.to_lowercase()) {
            Some(s) if s == "k" || s == "grand" => 1_000.0,
            Some(s) if s == "m" || s == "million" => 1_000_000.0,
            _ => 1.0,
        };
        let amount = base * multiplier;
        if amount.is_finite() && amount >= 1.0 {
            Some(amount.round() as u64)
        } else {
            None
        }
    };

    if let Some(caps) = PRICE_WITH_SIGN.captures(text)
        && let Some(digits) = caps.get(1)
    {
        return to_amount(digits.as_str(), caps.get(2).map(|m| m.as_str()));
    }
    if let Some(caps) = PRICE_WITH_SUFFIX.captures(text)
        && let Some(digits) = caps.get(1)
    {
        return to_amount(digits.as_str(), caps.get(2).map(|m| m.as_str()));
    }
    if let Some(caps) = PRICE_DIGIT_RUN.captures(text)
        && let Some(digits) = caps.get(1)
    {
        return to_amount(digits.as_str(), None);
    }
    None
}

/// Parse a selling timeline from free text into a canonical token.
pub fn parse_timeline(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    if ["asap", "immediately", "right away", "urgent"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        return Some("immediate".to_string());
    }
    if let Some(caps) = TIMELINE_COUNT.captures(&lower) {
        let n: u32 = caps[1].parse().ok()?;
        let unit = &caps[2];
        let plural = if n == 1 { "" } else { "s" };
        return Some(format!("{n}_{unit}{plural}"));
    }
    if ["few weeks", "next month", "soon"].iter().any(|kw| lower.contains(kw)) {
        return Some("1-3_months".to_string());
    }
    if ["few months", "later this year"].iter().any(|kw| lower.contains(kw)) {
        return Some("3-6_months".to_string());
    }
    if ["no rush", "flexible", "whenever"].iter().any(|kw| lower.contains(kw)) {
        return Some("flexible".to_string());
    }
    None
}

fn match_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| lower.contains(kw))
}

fn extract_condition(lower: &str, out: &mut Vec<(FieldKey, String)>) {
    // needs_work takes precedence over good when both appear in one message.
    if match_any(lower, &["needs work", "fixer", "rough shape", "needs repairs", "outdated"]) {
        out.push((FieldKey::Condition, "needs_work".into()));
    } else if match_any(lower, &["falling apart", "terrible", "bad condition", "poor condition"]) {
        out.push((FieldKey::Condition, "poor".into()));
    } else if match_any(
        lower,
        &["good condition", "great shape", "well maintained", "good shape", "excellent condition"],
    ) {
        out.push((FieldKey::Condition, "good".into()));
    }
}

fn extract_timeline(text: &str, out: &mut Vec<(FieldKey, String)>) {
    if let Some(timeline) = parse_timeline(text) {
        out.push((FieldKey::Timeline, timeline));
    }
}

fn extract_access(lower: &str, out: &mut Vec<(FieldKey, String)>) {
    if lower.contains("lockbox") {
        out.push((FieldKey::Access, "lockbox".into()));
    } else if match_any(lower, &["anytime", "any time", "come by whenever"]) {
        out.push((FieldKey::Access, "open".into()));
    } else if match_any(lower, &["can let you in", "meet you there", "i'll be there"]) {
        out.push((FieldKey::Access, "with_owner".into()));
    } else if match_any(lower, &["appointment", "call first", "need notice", "coordinate"]) {
        out.push((FieldKey::Access, "by_appointment".into()));
    }
}

fn extract_price(text: &str, out: &mut Vec<(FieldKey, String)>) {
    if let Some(price) = parse_price(text) {
        out.push((FieldKey::PriceExpectation, price.to_string()));
    }
}

fn extract_fix_flip(text: &str, lower: &str, out: &mut Vec<(FieldKey, String)>) {
    if match_any(lower, &["vacant", "empty", "nobody living", "no one living"]) {
        out.push((FieldKey::OccupancyStatus, "vacant".into()));
    } else if match_any(lower, &["rented", "tenant"]) {
        out.push((FieldKey::OccupancyStatus, "rented".into()));
    } else if match_any(lower, &["i live", "live there", "owner occupied", "owner-occupied"]) {
        out.push((FieldKey::OccupancyStatus, "owner_occupied".into()));
    }

    extract_condition(lower, out);

    if match_any(lower, &["roof", "leak"]) {
        out.push((FieldKey::RepairsNeeded, "roof_issues".into()));
    } else if match_any(lower, &["plumbing", "pipes"]) {
        out.push((FieldKey::RepairsNeeded, "plumbing_issues".into()));
    } else if match_any(lower, &["electrical", "wiring"]) {
        out.push((FieldKey::RepairsNeeded, "electrical_issues".into()));
    } else if match_any(lower, &["foundation", "structural", "sinking"]) {
        out.push((FieldKey::RepairsNeeded, "structural_issues".into()));
    } else if match_any(lower, &["cosmetic", "paint", "carpet"]) {
        out.push((FieldKey::RepairsNeeded, "cosmetic".into()));
    }

    extract_timeline(text, out);
    extract_access(lower, out);
    extract_price(text, out);

    // Opportunistic extras; never required.
    if match_any(lower, &["divorce", "separated"]) {
        out.push((FieldKey::Motivation, "divorce".into()));
    } else if match_any(lower, &["inherited", "estate", "passed away"]) {
        out.push((FieldKey::Motivation, "inherited".into()));
    } else if match_any(lower, &["relocating", "moving", "job transfer"]) {
        out.push((FieldKey::Motivation, "relocation".into()));
    } else if match_any(lower, &["behind on payments", "foreclosure", "financial"]) {
        out.push((FieldKey::Motivation, "financial_distress".into()));
    }
}

fn extract_vacant_land(text: &str, lower: &str, out: &mut Vec<(FieldKey, String)>) {
    if let Some(caps) = ACREAGE.captures(lower) {
        out.push((FieldKey::Acreage, caps[1].to_string()));
    }

    // "no road"/"landlocked" must win over the "road access" substring.
    if match_any(lower, &["landlocked", "no road", "no access"]) {
        out.push((FieldKey::RoadAccess, "no".into()));
    } else if match_any(lower, &["dirt road", "gravel", "unpaved"]) {
        out.push((FieldKey::RoadAccess, "dirt_road".into()));
    } else if match_any(lower, &["road access", "paved", "county road", "accessible"]) {
        out.push((FieldKey::RoadAccess, "yes".into()));
    }

    if match_any(lower, &["no utilities", "off grid", "off-grid", "no power"]) {
        out.push((FieldKey::Utilities, "none".into()));
    } else if match_any(lower, &["water only", "some utilities", "partial"]) {
        out.push((FieldKey::Utilities, "partial".into()));
    } else if match_any(
        lower,
        &["utilities", "power nearby", "water hookup", "septic", "sewer", "electric nearby"],
    ) {
        out.push((FieldKey::Utilities, "available".into()));
    }

    extract_price(text, out);

    if match_any(lower, &["no liens", "clear title", "taxes current", "taxes are current"]) {
        out.push((FieldKey::Liens, "clear".into()));
    } else if match_any(lower, &["back taxes", "tax lien", "behind on taxes"]) {
        out.push((FieldKey::Liens, "tax_issues".into()));
    } else if lower.contains("lien") {
        out.push((FieldKey::Liens, "liens_present".into()));
    }
}

fn extract_rental(text: &str, lower: &str, out: &mut Vec<(FieldKey, String)>) {
    if match_any(lower, &["vacant", "empty", "no tenants", "between tenants"]) {
        out.push((FieldKey::RentalStatus, "vacant".into()));
    } else if match_any(lower, &["rented", "tenant", "occupied"]) {
        out.push((FieldKey::RentalStatus, "rented".into()));
    }

    extract_condition(lower, out);
    extract_timeline(text, out);
    extract_access(lower, out);

    // A dollar amount qualified with "per month" is rent, not a price
    // expectation.
    if let Some(caps) = MONTHLY_INCOME.captures(lower) {
        let amount = caps[1].replace(',', "");
        out.push((FieldKey::RentalIncome, amount));
    } else {
        extract_price(text, out);
    }
    if match_any(lower, &["pay on time", "good tenants", "no problems"]) {
        out.push((FieldKey::TenantSituation, "good".into()));
    } else if match_any(lower, &["late payments", "eviction", "problem tenants"]) {
        out.push((FieldKey::TenantSituation, "problematic".into()));
    }
}

/// Run the deterministic rule layer for one message.
pub fn extract_rules(property_type: PropertyType, text: &str) -> Vec<(FieldKey, String)> {
    let lower = text.to_lowercase();
    let mut out = Vec::new();
    match property_type {
        PropertyType::FixFlip => extract_fix_flip(text, &lower, &mut out),
        PropertyType::VacantLand => extract_vacant_land(text, &lower, &mut out),
        PropertyType::LongTermRental => extract_rental(text, &lower, &mut out),
    }
    out
}

/// Two-layer extractor: deterministic rules plus optional enrichment.
pub struct QualificationExtractor {
    enricher: Option<Arc<dyn FieldEnricher>>,
}

impl QualificationExtractor {
    /// Rules-only extractor; always available.
    pub fn rules_only() -> Self {
        Self { enricher: None }
    }

    /// Extractor with an external enrichment service layered on top.
    pub fn with_enricher(enricher: Arc<dyn FieldEnricher>) -> Self {
        Self {
            enricher: Some(enricher),
        }
    }

    /// Extract fields from `text`, returning fills for fields that are
    /// empty in `existing`.
    ///
    /// The enrichment service is consulted only when required fields are
    /// still missing after the rule pass, and is sent exactly those
    /// missing keys. Malformed or errored enrichment responses are
    /// discarded without touching the result.
    pub async fn extract(
        &self,
        property_type: PropertyType,
        text: &str,
        existing: &QualificationData,
        required: &[FieldKey],
    ) -> Vec<(FieldKey, String)> {
        let mut fills: Vec<(FieldKey, String)> = extract_rules(property_type, text)
            .into_iter()
            .filter(|(key, _)| !existing.is_filled(*key))
            .collect();

        debug!(
            property_type = %property_type,
            rule_fills = fills.len(),
            "deterministic extraction pass complete"
        );

        let Some(enricher) = &self.enricher else {
            return fills;
        };

        let missing: Vec<FieldKey> = required
            .iter()
            .copied()
            .filter(|key| !existing.is_filled(*key) && !fills.iter().any(|(k, _)| k == key))
            .collect();
        if missing.is_empty() {
            return fills;
        }

        match enricher.extract_fields(property_type, text, &missing).await {
            Ok(enriched) => {
                for (key, value) in enriched {
                    if !missing.contains(&key) {
                        continue;
                    }
                    if value.trim().is_empty() || value.trim().eq_ignore_ascii_case(UNKNOWN_SENTINEL)
                    {
                        continue;
                    }
                    fills.push((key, value));
                }
            }
            Err(e) => {
                warn!(error = %e, "field enrichment failed, continuing with rule fills");
            }
        }

        fills
    }
}
