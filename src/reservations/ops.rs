//! The five reservation operations.
//!
//! Each operation composes validation with a store read or mutation and
//! returns a [`Confirmation`] or the first rule that failed. Operations
//! never touch I/O; the caller supplies the current time.

use chrono::NaiveDateTime;

use super::model::Reservation;
use super::outcome::{Confirmation, ReservationError};
use super::store::ReservationStore;
use super::validation::{
    MAX_PARTY_SIZE, MIN_PARTY_SIZE, bookable_slot, parse_date, parse_time,
    validate_party_size, validate_phone_number,
};

/// Input for creating a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub name: String,
    pub party_size: i64,
    pub date: String,
    pub time: String,
    pub phone_number: String,
}

/// Partial update of an existing reservation. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationChanges {
    pub phone_number: String,
    pub name: Option<String>,
    pub party_size: Option<i64>,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// New slot for an existing reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotChange {
    pub phone_number: String,
    pub new_date: String,
    pub new_time: String,
}

fn check_phone(phone_number: &str) -> Result<(), ReservationError> {
    if validate_phone_number(phone_number) {
        Ok(())
    } else {
        Err(ReservationError::InvalidPhoneNumber)
    }
}

fn party_size(n: i64) -> Result<u32, ReservationError> {
    if n < MIN_PARTY_SIZE {
        return Err(ReservationError::PartySizeTooSmall);
    }
    if n > MAX_PARTY_SIZE {
        return Err(ReservationError::PartySizeOutOfRange);
    }
    u32::try_from(n).map_err(|_| ReservationError::PartySizeOutOfRange)
}

pub fn create_reservation(
    store: &mut ReservationStore,
    request: NewReservation,
    now: NaiveDateTime,
) -> Result<Confirmation, ReservationError> {
    check_phone(&request.phone_number)?;

    if !validate_party_size(request.party_size) {
        return Err(ReservationError::PartySizeOutOfRange);
    }
    let size = party_size(request.party_size)?;

    let slot = bookable_slot(&request.date, &request.time, now)
        .ok_or(ReservationError::UnbookableSlot)?;

    if store.contains(&request.phone_number) {
        return Err(ReservationError::AlreadyExists);
    }
    if store.slot_taken(slot) {
        return Err(ReservationError::SlotTaken);
    }

    let reservation = Reservation {
        name: request.name,
        party_size: size,
        date: slot.date,
        time: slot.time,
    };
    let view = reservation.view(&request.phone_number);
    store.set(request.phone_number, reservation);

    Ok(Confirmation::Created(view))
}

pub fn get_reservation(
    store: &ReservationStore,
    phone_number: &str,
) -> Result<Confirmation, ReservationError> {
    check_phone(phone_number)?;

    store
        .get(phone_number)
        .map(|r| Confirmation::Found(r.view(phone_number)))
        .ok_or(ReservationError::NotFound)
}

/// Merge `changes` over the stored record.
///
/// A date together with a time is checked as a bookable slot. A date or
/// time on its own is only parsed: the future and business-hours rules
/// are not applied to single-field changes. Slot collisions are not
/// checked on update.
pub fn update_reservation(
    store: &mut ReservationStore,
    changes: ReservationChanges,
    now: NaiveDateTime,
) -> Result<Confirmation, ReservationError> {
    check_phone(&changes.phone_number)?;

    let current = store
        .get(&changes.phone_number)
        .ok_or(ReservationError::NotFound)?;

    let (date, time) = match (changes.date.as_deref(), changes.time.as_deref()) {
        (Some(date), Some(time)) => {
            let slot = bookable_slot(date, time, now).ok_or(ReservationError::InvalidDateTime)?;
            (slot.date, slot.time)
        }
        (Some(date), None) => (
            parse_date(date).ok_or(ReservationError::InvalidDateTime)?,
            current.time,
        ),
        (None, Some(time)) => (
            current.date,
            parse_time(time).ok_or(ReservationError::InvalidDateTime)?,
        ),
        (None, None) => (current.date, current.time),
    };

    let size = match changes.party_size {
        Some(n) => party_size(n)?,
        None => current.party_size,
    };

    let updated = Reservation {
        name: changes.name.unwrap_or_else(|| current.name.clone()),
        party_size: size,
        date,
        time,
    };
    let view = updated.view(&changes.phone_number);
    store.set(changes.phone_number, updated);

    Ok(Confirmation::Updated(view))
}

pub fn cancel_reservation(
    store: &mut ReservationStore,
    phone_number: &str,
) -> Result<Confirmation, ReservationError> {
    check_phone(phone_number)?;

    store
        .remove(phone_number)
        .map(|r| Confirmation::Cancelled(r.view(phone_number)))
        .ok_or(ReservationError::NotFound)
}

/// Move a reservation to a new bookable slot. The new slot is not checked
/// against other reservations.
pub fn move_reservation(
    store: &mut ReservationStore,
    change: SlotChange,
    now: NaiveDateTime,
) -> Result<Confirmation, ReservationError> {
    check_phone(&change.phone_number)?;

    let slot = bookable_slot(&change.new_date, &change.new_time, now)
        .ok_or(ReservationError::InvalidDateTime)?;

    let reservation = store
        .get_mut(&change.phone_number)
        .ok_or(ReservationError::NotFound)?;
    reservation.date = slot.date;
    reservation.time = slot.time;

    Ok(Confirmation::Moved(reservation.view(&change.phone_number)))
}
