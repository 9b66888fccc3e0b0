// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opt-out request detection.

/// Keywords that mark an inbound message as an opt-out request
/// (whole-message or contained phrase, case-insensitive).
const OPT_OUT_KEYWORDS: &[&str] = &[
    "stop",
    "unsubscribe",
    "remove",
    "opt out",
    "opt-out",
    "no more",
    "don't contact",
    "dont contact",
    "leave me alone",
];

/// Whether an inbound message is an opt-out request.
///
/// Single-word keywords ("stop", "remove", "unsubscribe") must stand alone
/// as the whole message so that "please stop by anytime" is not treated as
/// an opt-out; multi-word phrases match anywhere in the text.
pub fn is_opt_out_request(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    OPT_OUT_KEYWORDS.iter().any(|kw| {
        if kw.contains(' ') || kw.contains('-') {
            lower.contains(kw)
        } else {
            lower == *kw
        }
    })
}

/// The confirmation sent back when a lead opts out.
pub const OPT_OUT_CONFIRMATION: &str =
    "You have been removed from our contact list. Thank you.";
