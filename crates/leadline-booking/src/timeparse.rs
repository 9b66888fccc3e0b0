// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Natural-language time and email parsing for booking replies.
//!
//! Handles 12h/24h clock expressions, weekday names, and day-part
//! keywords (today/tomorrow/morning/afternoon/evening/this week/next
//! week). Resolution is relative to a caller-supplied "now" so parsing is
//! deterministic under test.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, TimeZone, Timelike, Utc, Weekday};
use regex::Regex;

static EMAIL_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap()
});
static CLOCK_12H: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").unwrap());
static CLOCK_24H: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})\b").unwrap());

/// How precise the lead's time selection was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// A concrete clock time ("2pm", "14:30").
    Clock,
    /// A day or day-part only ("tomorrow morning", "next week").
    DayPart,
}

/// A resolved time selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSelection {
    /// Resolved concrete start time (day parts get a default hour).
    pub at: DateTime<Utc>,
    /// Phrasing to echo back to the lead.
    pub label: String,
    pub kind: SelectionKind,
}

/// Find an email address anywhere in free text.
pub fn parse_email(text: &str) -> Option<String> {
    EMAIL_IN_TEXT.find(text).map(|m| m.as_str().to_string())
}

/// Whether the message is a bare affirmative ("yes", "sure", "ok") with
/// no scheduling information.
pub fn is_affirmative_only(text: &str) -> bool {
    let cleaned: String = text
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    matches!(
        cleaned.trim(),
        "yes" | "yeah" | "yep" | "sure" | "ok" | "okay" | "sounds good" | "works for me" | "lets do it"
    )
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// The day the lead named, with the phrasing used.
fn find_day(lower: &str, now: DateTime<Utc>) -> Option<(NaiveDate, String)> {
    let today = now.date_naive();
    if lower.contains("today") {
        return Some((today, "today".to_string()));
    }
    if lower.contains("tomorrow") {
        return Some((today + TimeDelta::days(1), "tomorrow".to_string()));
    }
    for name in [
        "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    ] {
        if lower.contains(name) {
            let target = weekday_from_name(name)?;
            let mut days_ahead =
                (target.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7;
            if days_ahead == 0 {
                days_ahead = 7;
            }
            let date = today + TimeDelta::days(i64::from(days_ahead));
            let mut label = name.to_string();
            if let Some(first) = label.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            return Some((date, label));
        }
    }
    if lower.contains("next week") {
        return Some((today + TimeDelta::days(7), "next week".to_string()));
    }
    if lower.contains("this week") {
        return Some((today + TimeDelta::days(1), "this week".to_string()));
    }
    None
}

/// A clock time in the text, as (hour, minute, phrasing).
fn find_clock(lower: &str) -> Option<(u32, u32, String)> {
    if let Some(caps) = CLOCK_12H.captures(lower) {
        let mut hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps.get(2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
        if hour > 12 || minute > 59 {
            return None;
        }
        let meridiem = caps[3].to_lowercase();
        if meridiem == "pm" && hour != 12 {
            hour += 12;
        } else if meridiem == "am" && hour == 12 {
            hour = 0;
        }
        let display_hour = if hour % 12 == 0 { 12 } else { hour % 12 };
        let label = format!("{display_hour}:{minute:02} {}", meridiem.to_uppercase());
        return Some((hour, minute, label));
    }
    if let Some(caps) = CLOCK_24H.captures(lower) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        if hour <= 23 && minute <= 59 {
            return Some((hour, minute, format!("{hour}:{minute:02}")));
        }
    }
    None
}

/// A day-part keyword in the text, as (hour, phrasing).
fn find_day_part(lower: &str) -> Option<(u32, &'static str)> {
    if lower.contains("morning") {
        Some((10, "morning"))
    } else if lower.contains("afternoon") {
        Some((14, "afternoon"))
    } else if lower.contains("evening") {
        Some((18, "evening"))
    } else {
        None
    }
}

/// Parse a time selection from an inbound booking reply.
///
/// Returns `None` when the text carries no usable scheduling signal.
pub fn parse_time_selection(text: &str, now: DateTime<Utc>) -> Option<TimeSelection> {
    let lower = text.to_lowercase();
    let day = find_day(&lower, now);
    let clock = find_clock(&lower);
    let day_part = find_day_part(&lower);

    if let Some((hour, minute, time_label)) = clock {
        // Clock with no day defaults to tomorrow.
        let (date, day_label) = day.unwrap_or_else(|| {
            (now.date_naive() + TimeDelta::days(1), "tomorrow".to_string())
        });
        let at = resolve(date, hour, minute)?;
        return Some(TimeSelection {
            at,
            label: format!("{day_label} at {time_label}"),
            kind: SelectionKind::Clock,
        });
    }

    if let Some((hour, part_label)) = day_part {
        let (date, day_label) = day.unwrap_or_else(|| {
            (now.date_naive() + TimeDelta::days(1), "tomorrow".to_string())
        });
        let at = resolve(date, hour, 0)?;
        return Some(TimeSelection {
            at,
            label: format!("{day_label} {part_label}"),
            kind: SelectionKind::DayPart,
        });
    }

    if let Some((date, day_label)) = day {
        // Day only: default to mid-afternoon.
        let at = resolve(date, 14, 0)?;
        return Some(TimeSelection {
            at,
            label: day_label,
            kind: SelectionKind::DayPart,
        });
    }

    None
}

fn resolve(date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(hour, minute, 0)?;
    Utc.from_local_datetime(&naive).single()
}

/// Human phrasing for a resolved time, e.g. "Tuesday, March 11 at 2:00 PM".
pub fn format_slot(at: DateTime<Utc>) -> String {
    let hour12 = if at.hour() % 12 == 0 { 12 } else { at.hour() % 12 };
    let meridiem = if at.hour() < 12 { "AM" } else { "PM" };
    format!(
        "{}, {} {} at {}:{:02} {}",
        at.format("%A"),
        at.format("%B"),
        at.day(),
        hour12,
        at.minute(),
        meridiem
    )
}
