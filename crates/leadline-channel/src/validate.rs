// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recipient contact format validation.

use std::sync::LazyLock;

use regex::Regex;

use leadline_core::LeadlineError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
});

/// Normalize a US phone number to E.164 (`+1XXXXXXXXXX`).
///
/// Accepts common formatting (dashes, spaces, parentheses, leading `+1` or
/// `1`). Rejects numbers that are not ten NANP digits, or whose area code
/// or exchange starts with 0 or 1.
pub fn normalize_us_phone(raw: &str) -> Result<String, LeadlineError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let national = match digits.len() {
        10 => digits,
        11 if digits.starts_with('1') => digits[1..].to_string(),
        _ => {
            return Err(LeadlineError::InvalidContact {
                channel: "sms".into(),
                reason: format!("expected 10 digits, got {}", digits.len()),
            });
        }
    };

    let area = national.as_bytes()[0];
    let exchange = national.as_bytes()[3];
    if !(b'2'..=b'9').contains(&area) || !(b'2'..=b'9').contains(&exchange) {
        return Err(LeadlineError::InvalidContact {
            channel: "sms".into(),
            reason: "area code and exchange must start with 2-9".into(),
        });
    }

    Ok(format!("+1{national}"))
}

/// Validate an email address format.
pub fn validate_email(raw: &str) -> Result<String, LeadlineError> {
    let trimmed = raw.trim();
    if EMAIL_RE.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(LeadlineError::InvalidContact {
            channel: "email".into(),
            reason: format!("`{trimmed}` is not a valid email address"),
        })
    }
}
