//! Field validation rules.
//!
//! Every function here is a pure predicate or parser over primitive input.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;

use super::clock::{Clock, LocalClock};
use super::model::{DATE_FORMAT, Slot, TIME_FORMAT};

/// First bookable hour (inclusive).
pub const OPENING_HOUR: u32 = 14;

/// Closing hour (exclusive): 22:00 itself cannot be booked.
pub const CLOSING_HOUR: u32 = 22;

pub const MIN_PARTY_SIZE: i64 = 1;
pub const MAX_PARTY_SIZE: i64 = 20;

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+[1-9][0-9]{1,14}$").expect("phone pattern compiles"))
}

/// E.164: `+`, a non-zero country digit, 2-15 digits in total.
pub fn validate_phone_number(phone: &str) -> bool {
    phone_pattern().is_match(phone)
}

pub fn validate_party_size(party_size: i64) -> bool {
    (MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&party_size)
}

/// Check a date/time pair against the current local time.
pub fn validate_date_time(date: &str, time: &str) -> bool {
    validate_date_time_with(date, time, &LocalClock)
}

/// Check a date/time pair: strict `YYYY-MM-DD HH:MM`, strictly after
/// `clock.now()`, and inside business hours.
pub fn validate_date_time_with(date: &str, time: &str, clock: &dyn Clock) -> bool {
    bookable_slot(date, time, clock.now()).is_some()
}

/// Parse and check a slot, returning it only when it can be booked at `now`.
pub fn bookable_slot(date: &str, time: &str, now: NaiveDateTime) -> Option<Slot> {
    let slot = parse_slot(date, time)?;
    let at = slot.date.and_time(slot.time);
    if at <= now {
        return None;
    }
    if !(OPENING_HOUR..CLOSING_HOUR).contains(&at.hour()) {
        return None;
    }
    Some(slot)
}

/// Parse a date and time as one `YYYY-MM-DD HH:MM` timestamp.
pub fn parse_slot(date: &str, time: &str) -> Option<Slot> {
    let format = format!("{} {}", DATE_FORMAT, TIME_FORMAT);
    let at = NaiveDateTime::parse_from_str(&format!("{} {}", date, time), &format).ok()?;
    Some(Slot {
        date: at.date(),
        time: at.time(),
    })
}

pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

pub fn parse_time(time: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(time, TIME_FORMAT).ok()
}
