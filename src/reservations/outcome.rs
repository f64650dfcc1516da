//! Tagged operation results and their legacy prose rendering.
//!
//! Callers branch on [`OutcomeKind`]; the `message` carries the exact
//! sentences the voice agent has always received.

use std::fmt;

use serde::Serialize;

use super::model::ReservationView;

/// Classification of an operation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    NotFound,
    Conflict,
    InvalidInput,
    AlreadyExists,
    Internal,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::NotFound => "not_found",
            OutcomeKind::Conflict => "conflict",
            OutcomeKind::InvalidInput => "invalid_input",
            OutcomeKind::AlreadyExists => "already_exists",
            OutcomeKind::Internal => "internal",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business-rule failures. `Display` is the user-facing sentence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReservationError {
    #[error("Invalid phone number format. Please use E.164 format (e.g., +19185551234).")]
    InvalidPhoneNumber,

    #[error("Party size must be between 1 and 20 people.")]
    PartySizeOutOfRange,

    #[error("Party size must be at least 1 person.")]
    PartySizeTooSmall,

    #[error(
        "Invalid date or time. Reservations must be for future dates during business hours (14:00-22:00)."
    )]
    UnbookableSlot,

    #[error("Invalid date or time format. Use YYYY-MM-DD for date and HH:MM for time.")]
    InvalidDateTime,

    #[error("A reservation already exists for this phone number.")]
    AlreadyExists,

    #[error("This time slot is already booked. Please choose a different time.")]
    SlotTaken,

    #[error("No reservation found for this phone number.")]
    NotFound,

    /// A field could not be coerced to its declared type.
    #[error("Error {action} reservation: {reason}")]
    InvalidField {
        action: &'static str,
        reason: String,
    },

    #[error("Reservation service is unavailable")]
    Unavailable,
}

impl ReservationError {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            ReservationError::InvalidPhoneNumber
            | ReservationError::PartySizeOutOfRange
            | ReservationError::PartySizeTooSmall
            | ReservationError::UnbookableSlot
            | ReservationError::InvalidDateTime
            | ReservationError::InvalidField { .. } => OutcomeKind::InvalidInput,
            ReservationError::AlreadyExists => OutcomeKind::AlreadyExists,
            ReservationError::SlotTaken => OutcomeKind::Conflict,
            ReservationError::NotFound => OutcomeKind::NotFound,
            ReservationError::Unavailable => OutcomeKind::Internal,
        }
    }
}

/// Successful operation results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Created(ReservationView),
    Found(ReservationView),
    Updated(ReservationView),
    Cancelled(ReservationView),
    Moved(ReservationView),
}

impl Confirmation {
    pub fn reservation(&self) -> &ReservationView {
        match self {
            Confirmation::Created(r)
            | Confirmation::Found(r)
            | Confirmation::Updated(r)
            | Confirmation::Cancelled(r)
            | Confirmation::Moved(r) => r,
        }
    }

    pub fn into_reservation(self) -> ReservationView {
        match self {
            Confirmation::Created(r)
            | Confirmation::Found(r)
            | Confirmation::Updated(r)
            | Confirmation::Cancelled(r)
            | Confirmation::Moved(r) => r,
        }
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confirmation::Created(_) => f.write_str("Reservation successfully created."),
            Confirmation::Found(r) => write!(f, "Reservation found: {}", r.summary()),
            Confirmation::Updated(r) => write!(f, "Reservation updated: {}", r.summary()),
            Confirmation::Cancelled(_) => f.write_str("Reservation canceled successfully."),
            Confirmation::Moved(_) => f.write_str("Reservation moved successfully."),
        }
    }
}

/// Result of one operation as seen by transports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<ReservationView>,
}

impl Outcome {
    pub fn new(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            reservation: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }
}

impl From<Confirmation> for Outcome {
    fn from(confirmation: Confirmation) -> Self {
        let message = confirmation.to_string();
        Self {
            kind: OutcomeKind::Success,
            message,
            reservation: Some(confirmation.into_reservation()),
        }
    }
}

impl From<ReservationError> for Outcome {
    fn from(err: ReservationError) -> Self {
        Outcome::new(err.kind(), err.to_string())
    }
}

impl From<Result<Confirmation, ReservationError>> for Outcome {
    fn from(result: Result<Confirmation, ReservationError>) -> Self {
        match result {
            Ok(confirmation) => confirmation.into(),
            Err(err) => err.into(),
        }
    }
}
