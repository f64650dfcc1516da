//! In-memory reservation table keyed by phone number.

use std::collections::BTreeMap;

use super::model::{Reservation, ReservationView, Slot};

/// Phone number -> reservation. Volatile; lives as long as its owner.
#[derive(Debug, Default)]
pub struct ReservationStore {
    entries: BTreeMap<String, Reservation>,
}

impl ReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, phone_number: &str) -> Option<&Reservation> {
        self.entries.get(phone_number)
    }

    pub fn get_mut(&mut self, phone_number: &str) -> Option<&mut Reservation> {
        self.entries.get_mut(phone_number)
    }

    /// Insert or overwrite the entry for `phone_number`.
    pub fn set(&mut self, phone_number: impl Into<String>, reservation: Reservation) {
        self.entries.insert(phone_number.into(), reservation);
    }

    pub fn remove(&mut self, phone_number: &str) -> Option<Reservation> {
        self.entries.remove(phone_number)
    }

    pub fn contains(&self, phone_number: &str) -> bool {
        self.entries.contains_key(phone_number)
    }

    /// Whether any reservation occupies `slot`.
    pub fn slot_taken(&self, slot: Slot) -> bool {
        self.entries.values().any(|r| r.slot() == slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Reservation)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Owned copy of every entry, ordered by phone number.
    pub fn snapshot(&self) -> Vec<ReservationView> {
        self.iter().map(|(phone, r)| r.view(phone)).collect()
    }
}
