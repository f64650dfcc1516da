//! Resolve, bind and invoke.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use uuid::Uuid;

use super::normalize::FunctionCall;
use crate::functions::{FunctionRegistry, bind};
use crate::logging::PAYLOAD_TARGET;
use crate::reservations::{Outcome, OutcomeKind, ReservationService};

/// Failures before or around a function invocation. Business-rule
/// failures are not errors here; they come back as an [`Outcome`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("Function '{0}' not found")]
    UnknownFunction(String),

    #[error("Invalid arguments for function '{function}': {reason}")]
    InvalidArguments { function: String, reason: String },

    /// The function faulted while running.
    #[error("Invalid arguments for function '{function}': {reason}")]
    Internal { function: String, reason: String },
}

impl DispatchError {
    /// Outcome kind of a call that reached a function. `None` for an
    /// unknown function, which never produced an outcome.
    pub fn kind(&self) -> Option<OutcomeKind> {
        match self {
            DispatchError::UnknownFunction(_) => None,
            DispatchError::InvalidArguments { .. } => Some(OutcomeKind::InvalidInput),
            DispatchError::Internal { .. } => Some(OutcomeKind::Internal),
        }
    }
}

/// Routes normalized calls to registered functions.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<FunctionRegistry>,
    service: ReservationService,
}

impl Dispatcher {
    pub fn new(registry: Arc<FunctionRegistry>, service: ReservationService) -> Self {
        Self { registry, service }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn service(&self) -> &ReservationService {
        &self.service
    }

    /// Dispatch one call. Never panics; a faulting function becomes
    /// [`DispatchError::Internal`].
    pub async fn dispatch(&self, call: FunctionCall) -> Result<Outcome, DispatchError> {
        let call_id = Uuid::new_v4();
        let start = Instant::now();

        tracing::debug!(
            target: PAYLOAD_TARGET,
            %call_id,
            function = %call.function,
            source = ?call.source,
            arguments = %serde_json::Value::Object(call.arguments.clone()),
            "Normalized call"
        );

        let Some(function) = self.registry.get(&call.function) else {
            tracing::debug!(target: PAYLOAD_TARGET, %call_id, function = %call.function, "Function not found");
            return Err(DispatchError::UnknownFunction(call.function));
        };

        let bound = bind(function.parameters(), call.arguments).map_err(|e| {
            tracing::debug!(target: PAYLOAD_TARGET, %call_id, error = %e, "Argument binding failed");
            DispatchError::InvalidArguments {
                function: call.function.clone(),
                reason: e.to_string(),
            }
        })?;

        let result = AssertUnwindSafe(function.invoke(bound, &self.service))
            .catch_unwind()
            .await;

        match result {
            Ok(outcome) => {
                tracing::debug!(
                    target: PAYLOAD_TARGET,
                    %call_id,
                    kind = %outcome.kind,
                    message = %outcome.message,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Function result"
                );
                Ok(outcome)
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                tracing::error!(%call_id, function = %call.function, %reason, "Function panicked");
                Err(DispatchError::Internal {
                    function: call.function,
                    reason,
                })
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected fault".to_string()
    }
}
