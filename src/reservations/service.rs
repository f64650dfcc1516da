//! Single-owner reservation service.
//!
//! The store is owned by one tokio task. Every operation is sent to that
//! task as a command and answered over a oneshot channel, so concurrent
//! requests are applied one at a time and check-then-insert sequences
//! cannot interleave.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use super::clock::{Clock, LocalClock};
use super::model::ReservationView;
use super::ops::{self, NewReservation, ReservationChanges, SlotChange};
use super::outcome::{Confirmation, Outcome, ReservationError};
use super::store::ReservationStore;

/// Queue depth between request handlers and the store task.
const COMMAND_BUFFER: usize = 256;

type Reply<T> = oneshot::Sender<T>;
type OpResult = Result<Confirmation, ReservationError>;

enum Command {
    Create(NewReservation, Reply<OpResult>),
    Get(String, Reply<OpResult>),
    Update(ReservationChanges, Reply<OpResult>),
    Cancel(String, Reply<OpResult>),
    Move(SlotChange, Reply<OpResult>),
    Snapshot(Reply<Vec<ReservationView>>),
}

/// Cloneable handle to the reservation task.
#[derive(Clone)]
pub struct ReservationService {
    tx: mpsc::Sender<Command>,
}

impl ReservationService {
    /// Spawn the store task using the local wall clock.
    pub fn spawn() -> Self {
        Self::spawn_with(ReservationStore::new(), Arc::new(LocalClock))
    }

    /// Spawn the store task over an existing store and clock.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_with(store: ReservationStore, clock: Arc<dyn Clock>) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        tokio::spawn(run(store, clock, rx));
        Self { tx }
    }

    pub async fn create(&self, request: NewReservation) -> Outcome {
        self.call(|reply| Command::Create(request, reply)).await
    }

    pub async fn get(&self, phone_number: impl Into<String>) -> Outcome {
        let phone_number = phone_number.into();
        self.call(|reply| Command::Get(phone_number, reply)).await
    }

    pub async fn update(&self, changes: ReservationChanges) -> Outcome {
        self.call(|reply| Command::Update(changes, reply)).await
    }

    pub async fn cancel(&self, phone_number: impl Into<String>) -> Outcome {
        let phone_number = phone_number.into();
        self.call(|reply| Command::Cancel(phone_number, reply)).await
    }

    pub async fn move_to(&self, change: SlotChange) -> Outcome {
        self.call(|reply| Command::Move(change, reply)).await
    }

    /// Read-only copy of every reservation.
    pub async fn snapshot(&self) -> Result<Vec<ReservationView>, ReservationError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Snapshot(reply))
            .await
            .map_err(|_| ReservationError::Unavailable)?;
        rx.await.map_err(|_| ReservationError::Unavailable)
    }

    async fn call<F>(&self, command: F) -> Outcome
    where
        F: FnOnce(Reply<OpResult>) -> Command,
    {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(command(reply)).await.is_err() {
            tracing::error!("Reservation task is gone, rejecting operation");
            return ReservationError::Unavailable.into();
        }
        match rx.await {
            Ok(result) => result.into(),
            Err(_) => ReservationError::Unavailable.into(),
        }
    }
}

async fn run(mut store: ReservationStore, clock: Arc<dyn Clock>, mut rx: mpsc::Receiver<Command>) {
    tracing::debug!("Reservation task started");

    while let Some(command) = rx.recv().await {
        match command {
            Command::Create(request, reply) => {
                let result = ops::create_reservation(&mut store, request, clock.now());
                log_result("create", &result);
                let _ = reply.send(result);
            }
            Command::Get(phone_number, reply) => {
                let _ = reply.send(ops::get_reservation(&store, &phone_number));
            }
            Command::Update(changes, reply) => {
                let result = ops::update_reservation(&mut store, changes, clock.now());
                log_result("update", &result);
                let _ = reply.send(result);
            }
            Command::Cancel(phone_number, reply) => {
                let result = ops::cancel_reservation(&mut store, &phone_number);
                log_result("cancel", &result);
                let _ = reply.send(result);
            }
            Command::Move(change, reply) => {
                let result = ops::move_reservation(&mut store, change, clock.now());
                log_result("move", &result);
                let _ = reply.send(result);
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(store.snapshot());
            }
        }
    }

    tracing::debug!(remaining = store.len(), "Reservation task stopped");
}

fn log_result(operation: &str, result: &OpResult) {
    match result {
        Ok(_) => tracing::info!(operation, "Reservation changed"),
        Err(e) => tracing::debug!(operation, kind = %e.kind(), "Reservation rule rejected request"),
    }
}
