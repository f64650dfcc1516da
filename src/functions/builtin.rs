//! The five reservation functions exposed to the agent.

use async_trait::async_trait;

use super::binding::{ArgumentError, BoundArguments};
use super::function::{ParamKind, Parameter, ReservationFunction};
use crate::reservations::{
    NewReservation, Outcome, ReservationChanges, ReservationError, ReservationService, SlotChange,
};

fn invalid(action: &'static str, err: ArgumentError) -> ReservationError {
    ReservationError::InvalidField {
        action,
        reason: err.to_string(),
    }
}

fn text(
    args: &BoundArguments,
    name: &str,
    action: &'static str,
) -> Result<Option<String>, ReservationError> {
    args.string(name).map_err(|e| invalid(action, e))
}

fn number(
    args: &BoundArguments,
    name: &str,
    action: &'static str,
) -> Result<Option<i64>, ReservationError> {
    args.integer(name).map_err(|e| invalid(action, e))
}

fn required_text(
    args: &BoundArguments,
    name: &str,
    action: &'static str,
) -> Result<String, ReservationError> {
    args.require_string(name).map_err(|e| invalid(action, e))
}

fn required_number(
    args: &BoundArguments,
    name: &str,
    action: &'static str,
) -> Result<i64, ReservationError> {
    args.require_integer(name).map_err(|e| invalid(action, e))
}

/// Creates a reservation.
pub struct CreateReservation;

const CREATE_PARAMS: [Parameter; 5] = [
    Parameter::required(
        "name",
        ParamKind::String,
        "The name of the person making the reservation",
    ),
    Parameter::required("party_size", ParamKind::Integer, "Number of people in the party"),
    Parameter::required(
        "date",
        ParamKind::String,
        "Date of reservation in YYYY-MM-DD format",
    ),
    Parameter::required(
        "time",
        ParamKind::String,
        "Time of reservation in HH:MM format (24-hour)",
    ),
    Parameter::required(
        "phone_number",
        ParamKind::String,
        "Contact phone number in E.164 format (e.g., +19185551234)",
    ),
];

impl CreateReservation {
    fn request(args: &BoundArguments) -> Result<NewReservation, ReservationError> {
        const ACTION: &str = "creating";
        Ok(NewReservation {
            name: required_text(args, "name", ACTION)?,
            party_size: required_number(args, "party_size", ACTION)?,
            date: required_text(args, "date", ACTION)?,
            time: required_text(args, "time", ACTION)?,
            phone_number: required_text(args, "phone_number", ACTION)?,
        })
    }
}

#[async_trait]
impl ReservationFunction for CreateReservation {
    fn name(&self) -> &str {
        "create_reservation"
    }

    fn description(&self) -> &str {
        "Create a new reservation for a customer"
    }

    fn parameters(&self) -> &[Parameter] {
        &CREATE_PARAMS
    }

    async fn invoke(&self, args: BoundArguments, service: &ReservationService) -> Outcome {
        match Self::request(&args) {
            Ok(request) => service.create(request).await,
            Err(e) => e.into(),
        }
    }
}

/// Looks up a reservation by phone number.
pub struct GetReservation;

const GET_PARAMS: [Parameter; 1] = [Parameter::required(
    "phone_number",
    ParamKind::String,
    "Phone number used for the reservation in E.164 format",
)];

#[async_trait]
impl ReservationFunction for GetReservation {
    fn name(&self) -> &str {
        "get_reservation"
    }

    fn description(&self) -> &str {
        "Retrieve an existing reservation"
    }

    fn parameters(&self) -> &[Parameter] {
        &GET_PARAMS
    }

    async fn invoke(&self, args: BoundArguments, service: &ReservationService) -> Outcome {
        let phone = required_text(&args, "phone_number", "retrieving");
        match phone {
            Ok(phone) => service.get(phone).await,
            Err(e) => e.into(),
        }
    }
}

/// Changes any subset of an existing reservation's fields.
pub struct UpdateReservation;

const UPDATE_PARAMS: [Parameter; 5] = [
    Parameter::required(
        "phone_number",
        ParamKind::String,
        "Phone number of the existing reservation",
    ),
    Parameter::optional("name", ParamKind::String, "Updated name (optional)"),
    Parameter::optional(
        "party_size",
        ParamKind::Integer,
        "Updated party size (optional)",
    ),
    Parameter::optional(
        "date",
        ParamKind::String,
        "Updated date in YYYY-MM-DD format (optional)",
    ),
    Parameter::optional(
        "time",
        ParamKind::String,
        "Updated time in HH:MM format (optional)",
    ),
];

impl UpdateReservation {
    fn changes(args: &BoundArguments) -> Result<ReservationChanges, ReservationError> {
        const ACTION: &str = "updating";
        Ok(ReservationChanges {
            phone_number: required_text(args, "phone_number", ACTION)?,
            name: text(args, "name", ACTION)?,
            party_size: number(args, "party_size", ACTION)?,
            date: text(args, "date", ACTION)?,
            time: text(args, "time", ACTION)?,
        })
    }
}

#[async_trait]
impl ReservationFunction for UpdateReservation {
    fn name(&self) -> &str {
        "update_reservation"
    }

    fn description(&self) -> &str {
        "Update an existing reservation"
    }

    fn parameters(&self) -> &[Parameter] {
        &UPDATE_PARAMS
    }

    async fn invoke(&self, args: BoundArguments, service: &ReservationService) -> Outcome {
        match Self::changes(&args) {
            Ok(changes) => service.update(changes).await,
            Err(e) => e.into(),
        }
    }
}

/// Cancels a reservation.
pub struct CancelReservation;

const CANCEL_PARAMS: [Parameter; 1] = [Parameter::required(
    "phone_number",
    ParamKind::String,
    "Phone number of the reservation to cancel",
)];

#[async_trait]
impl ReservationFunction for CancelReservation {
    fn name(&self) -> &str {
        "cancel_reservation"
    }

    fn description(&self) -> &str {
        "Cancel an existing reservation"
    }

    fn parameters(&self) -> &[Parameter] {
        &CANCEL_PARAMS
    }

    async fn invoke(&self, args: BoundArguments, service: &ReservationService) -> Outcome {
        let phone = required_text(&args, "phone_number", "canceling");
        match phone {
            Ok(phone) => service.cancel(phone).await,
            Err(e) => e.into(),
        }
    }
}

/// Moves a reservation to a new date and time.
pub struct MoveReservation;

const MOVE_PARAMS: [Parameter; 3] = [
    Parameter::required(
        "phone_number",
        ParamKind::String,
        "Phone number of the existing reservation",
    ),
    Parameter::required("new_date", ParamKind::String, "New date in YYYY-MM-DD format"),
    Parameter::required("new_time", ParamKind::String, "New time in HH:MM format"),
];

impl MoveReservation {
    fn change(args: &BoundArguments) -> Result<SlotChange, ReservationError> {
        const ACTION: &str = "moving";
        Ok(SlotChange {
            phone_number: required_text(args, "phone_number", ACTION)?,
            new_date: required_text(args, "new_date", ACTION)?,
            new_time: required_text(args, "new_time", ACTION)?,
        })
    }
}

#[async_trait]
impl ReservationFunction for MoveReservation {
    fn name(&self) -> &str {
        "move_reservation"
    }

    fn description(&self) -> &str {
        "Move an existing reservation to a new date and time"
    }

    fn parameters(&self) -> &[Parameter] {
        &MOVE_PARAMS
    }

    async fn invoke(&self, args: BoundArguments, service: &ReservationService) -> Outcome {
        match Self::change(&args) {
            Ok(change) => service.move_to(change).await,
            Err(e) => e.into(),
        }
    }
}
