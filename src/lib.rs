//! Webhook-driven reservation manager.
//!
//! An external voice/AI agent calls named functions (`create_reservation`,
//! `get_reservation`, ...) over HTTP. Requests are normalized, resolved
//! against a fixed allow-list of functions, bound to each function's
//! declared parameters and executed against an in-memory reservation
//! table keyed by phone number.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod functions;
pub mod logging;
pub mod reservations;
pub mod server;

pub use config::Config;
pub use dispatch::{Dispatcher, FunctionCall};
pub use functions::FunctionRegistry;
pub use reservations::{Outcome, OutcomeKind, ReservationService};
