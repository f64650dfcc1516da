//! Reservation domain: records, rules, the store and its owning service.

pub mod clock;
pub mod model;
pub mod ops;
pub mod outcome;
pub mod service;
pub mod store;
pub mod validation;

pub use clock::{Clock, FixedClock, LocalClock};
pub use model::{Reservation, ReservationView, Slot};
pub use ops::{NewReservation, ReservationChanges, SlotChange};
pub use outcome::{Confirmation, Outcome, OutcomeKind, ReservationError};
pub use service::ReservationService;
pub use store::ReservationStore;
pub use validation::{validate_date_time, validate_party_size, validate_phone_number};
