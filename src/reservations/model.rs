//! Reservation records.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Date format accepted and rendered for reservations.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day format accepted and rendered for reservations.
pub const TIME_FORMAT: &str = "%H:%M";

/// A `(date, time)` pair. At most one reservation may occupy a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// A stored reservation. The phone number is the store key, not a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub name: String,
    pub party_size: u32,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Reservation {
    pub fn slot(&self) -> Slot {
        Slot {
            date: self.date,
            time: self.time,
        }
    }

    /// Snapshot this record together with its key.
    pub fn view(&self, phone_number: &str) -> ReservationView {
        ReservationView {
            name: self.name.clone(),
            party_size: self.party_size,
            date: self.date.format(DATE_FORMAT).to_string(),
            time: self.time.format(TIME_FORMAT).to_string(),
            phone_number: phone_number.to_string(),
        }
    }
}

/// Serializable, key-carrying copy of a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationView {
    pub name: String,
    pub party_size: u32,
    pub date: String,
    pub time: String,
    pub phone_number: String,
}

impl ReservationView {
    /// `John Doe for 4 people on 2026-10-20 at 19:00. Contact: +19185551234`
    pub fn summary(&self) -> String {
        format!(
            "{} for {} people on {} at {}. Contact: {}",
            self.name, self.party_size, self.date, self.time, self.phone_number
        )
    }

    /// Copy with all but the last four digits of the phone number hidden.
    pub fn masked(&self) -> Self {
        Self {
            phone_number: mask_phone_number(&self.phone_number),
            ..self.clone()
        }
    }
}

/// Replace every digit except the last four with `*`, keeping the `+`.
pub fn mask_phone_number(phone: &str) -> String {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    let hidden = digits.saturating_sub(4);
    let mut seen = 0;
    phone
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                seen += 1;
                if seen <= hidden { '*' } else { c }
            } else {
                c
            }
        })
        .collect()
}
