// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic keyword-based intent classification.
//!
//! This is the always-present fallback implementation of
//! [`IntentClassifier`]: zero-cost heuristic rules, no network, no
//! latency. A remote-model classifier may be layered on top via
//! [`ResilientClassifier`]; when it errors, these rules take over.

use async_trait::async_trait;
use tracing::warn;

use leadline_core::error::LeadlineError;
use leadline_core::traits::classifier::{ClassifyContext, IntentClassifier};
use leadline_core::types::{CommunicationStyle, Intent, MessageAnalysis, Sentiment, Urgency};

/// Decline phrases (contains, case-insensitive). Checked before the
/// interested set so "not interested" never matches "interested".
const NOT_INTERESTED: &[&str] = &[
    "not interested",
    "no thanks",
    "no thank you",
    "stop",
    "remove",
    "leave me alone",
    "wrong number",
];

/// Booking phrases (contains, case-insensitive).
const READY_TO_BOOK: &[&str] = &["book", "schedule", "appointment", "give me a call", "call me"];

/// Objection phrases, grouped loosely by concern.
const OBJECTIONS: &[&str] = &[
    "price",
    "low offer",
    "lowball",
    "worth more",
    "agent",
    "realtor",
    "list it",
    "think about it",
    "need time",
    "need to think",
];

/// Interested phrases (contains, case-insensitive).
const INTERESTED: &[&str] = &["yes", "interested", "sure", "ok", "okay", "sounds good", "tell me more"];

const POSITIVE_WORDS: &[&str] = &["great", "awesome", "perfect", "excellent", "love", "appreciate"];

const NEGATIVE_WORDS: &[&str] = &["bad", "terrible", "awful", "hate", "scam", "harassing", "annoying"];

const FORMAL_MARKERS: &[&str] = &["good morning", "good afternoon", "regards", "sincerely", "dear "];

const CASUAL_MARKERS: &[&str] = &["hey", "yeah", "yep", "gonna", "lol", "cool"];

const HIGH_URGENCY: &[&str] = &["asap", "urgent", "immediately", "right away"];

const LOW_URGENCY: &[&str] = &["no rush", "whenever", "flexible", "no hurry"];

/// Pure keyword analysis of an inbound message.
///
/// Precedence: decline > booking > objection > question > interested >
/// unknown. Decline is checked first so phrases like "not interested"
/// cannot fall through to the interested set.
pub fn keyword_analysis(text: &str) -> MessageAnalysis {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return MessageAnalysis::unknown();
    }

    let contains_any = |set: &[&str]| set.iter().any(|kw| lower.contains(kw));

    let intent = if contains_any(NOT_INTERESTED) || lower == "no" {
        Intent::NotInterested
    } else if contains_any(READY_TO_BOOK) {
        Intent::ReadyToBook
    } else if contains_any(OBJECTIONS) {
        Intent::Objection
    } else if lower.contains('?') {
        Intent::Question
    } else if contains_any(INTERESTED) {
        Intent::Interested
    } else {
        Intent::Unknown
    };

    let sentiment = if contains_any(POSITIVE_WORDS) {
        Sentiment::Positive
    } else if contains_any(NEGATIVE_WORDS) {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    let style = if contains_any(FORMAL_MARKERS) {
        CommunicationStyle::Formal
    } else if contains_any(CASUAL_MARKERS) {
        CommunicationStyle::Casual
    } else {
        CommunicationStyle::Neutral
    };

    let urgency = if contains_any(HIGH_URGENCY) {
        Urgency::High
    } else if contains_any(LOW_URGENCY) {
        Urgency::Low
    } else {
        Urgency::Medium
    };

    MessageAnalysis {
        intent,
        sentiment,
        style,
        urgency,
    }
}

/// The deterministic keyword classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IntentClassifier for KeywordClassifier {
    async fn classify(
        &self,
        text: &str,
        _ctx: &ClassifyContext,
    ) -> Result<MessageAnalysis, LeadlineError> {
        Ok(keyword_analysis(text))
    }
}

/// Wraps an optional remote classifier with the keyword fallback.
///
/// When no remote classifier is configured, or the remote call errors,
/// the keyword rules produce the analysis. Classification failure is
/// therefore never surfaced to callers.
pub struct ResilientClassifier {
    remote: Option<std::sync::Arc<dyn IntentClassifier>>,
}

impl ResilientClassifier {
    pub fn rules_only() -> Self {
        Self { remote: None }
    }

    pub fn with_remote(remote: std::sync::Arc<dyn IntentClassifier>) -> Self {
        Self {
            remote: Some(remote),
        }
    }
}

#[async_trait]
impl IntentClassifier for ResilientClassifier {
    async fn classify(
        &self,
        text: &str,
        ctx: &ClassifyContext,
    ) -> Result<MessageAnalysis, LeadlineError> {
        if let Some(remote) = &self.remote {
            match remote.classify(text, ctx).await {
                Ok(analysis) => return Ok(analysis),
                Err(e) => {
                    warn!(error = %e, "remote classifier failed, using keyword rules");
                }
            }
        }
        Ok(keyword_analysis(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadline_core::types::{PropertyType, Stage};

    #[test]
    fn interested_phrases() {
        assert_eq!(keyword_analysis("yes, sounds good").intent, Intent::Interested);
        assert_eq!(keyword_analysis("sure").intent, Intent::Interested);
    }

    #[test]
    fn not_interested_beats_interested_substring() {
        assert_eq!(keyword_analysis("I'm not interested").intent, Intent::NotInterested);
        assert_eq!(keyword_analysis("no thanks").intent, Intent::NotInterested);
        assert_eq!(keyword_analysis("no").intent, Intent::NotInterested);
    }

    #[test]
    fn booking_phrases() {
        assert_eq!(keyword_analysis("can we schedule a time").intent, Intent::ReadyToBook);
        assert_eq!(keyword_analysis("book me for tomorrow").intent, Intent::ReadyToBook);
        assert_eq!(keyword_analysis("give me a call").intent, Intent::ReadyToBook);
    }

    #[test]
    fn objection_phrases() {
        assert_eq!(
            keyword_analysis("that price seems way too low").intent,
            Intent::Objection
        );
        assert_eq!(
            keyword_analysis("I'd rather use a realtor").intent,
            Intent::Objection
        );
        assert_eq!(
            keyword_analysis("I need time to decide").intent,
            Intent::Objection
        );
    }

    #[test]
    fn question_mark_yields_question() {
        assert_eq!(keyword_analysis("how much would you pay?").intent, Intent::Question);
    }

    #[test]
    fn unknown_for_unmatched_text() {
        assert_eq!(keyword_analysis("the roof is blue").intent, Intent::Unknown);
        assert_eq!(keyword_analysis("").intent, Intent::Unknown);
    }

    #[test]
    fn sentiment_word_sets() {
        assert_eq!(keyword_analysis("that's great, perfect timing").sentiment, Sentiment::Positive);
        assert_eq!(keyword_analysis("this is a terrible scam").sentiment, Sentiment::Negative);
        assert_eq!(keyword_analysis("the house is vacant").sentiment, Sentiment::Neutral);
    }

    #[test]
    fn urgency_detection() {
        assert_eq!(keyword_analysis("need to sell asap").urgency, Urgency::High);
        assert_eq!(keyword_analysis("no rush on my end").urgency, Urgency::Low);
    }

    #[tokio::test]
    async fn resilient_falls_back_when_remote_errors() {
        struct Failing;

        #[async_trait]
        impl IntentClassifier for Failing {
            async fn classify(
                &self,
                _text: &str,
                _ctx: &ClassifyContext,
            ) -> Result<MessageAnalysis, LeadlineError> {
                Err(LeadlineError::Classification {
                    message: "model unavailable".into(),
                    source: None,
                })
            }
        }

        let classifier = ResilientClassifier::with_remote(std::sync::Arc::new(Failing));
        let ctx = ClassifyContext {
            property_type: PropertyType::FixFlip,
            stage: Stage::Qualifying,
        };
        let analysis = classifier.classify("not interested", &ctx).await.unwrap();
        assert_eq!(analysis.intent, Intent::NotInterested);
    }

    #[tokio::test]
    async fn rules_only_uses_keywords() {
        let classifier = ResilientClassifier::rules_only();
        let ctx = ClassifyContext {
            property_type: PropertyType::VacantLand,
            stage: Stage::Initial,
        };
        let analysis = classifier.classify("let's book a call", &ctx).await.unwrap();
        assert_eq!(analysis.intent, Intent::ReadyToBook);
    }
}
