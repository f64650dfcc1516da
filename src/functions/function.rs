//! Function trait and parameter declarations.

use async_trait::async_trait;
use serde::Serialize;

use super::binding::BoundArguments;
use crate::reservations::{Outcome, ReservationService};

/// Declared type of a parameter, as advertised to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
}

impl ParamKind {
    pub fn json_type(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
        }
    }
}

/// One declared parameter of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
}

impl Parameter {
    pub const fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            description,
        }
    }
}

/// Signature entry returned to the agent platform during the
/// `get_signature` handshake.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSignature {
    pub function: String,
    pub purpose: String,
    pub argument: serde_json::Value,
}

/// A function the agent may call by name.
#[async_trait]
pub trait ReservationFunction: Send + Sync {
    /// Name the agent uses to call this function.
    fn name(&self) -> &str;

    /// Human-readable purpose, sent to the agent.
    fn description(&self) -> &str;

    /// Declared parameters. Arguments are bound against this list.
    fn parameters(&self) -> &[Parameter];

    /// Run the function with already-bound arguments.
    async fn invoke(&self, args: BoundArguments, service: &ReservationService) -> Outcome;

    /// JSON Schema for the parameters.
    fn parameters_schema(&self) -> serde_json::Value {
        let properties: serde_json::Map<String, serde_json::Value> = self
            .parameters()
            .iter()
            .map(|p| {
                (
                    p.name.to_string(),
                    serde_json::json!({
                        "type": p.kind.json_type(),
                        "description": p.description,
                    }),
                )
            })
            .collect();
        let required: Vec<&str> = self
            .parameters()
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    fn signature(&self) -> FunctionSignature {
        FunctionSignature {
            function: self.name().to_string(),
            purpose: self.description().to_string(),
            argument: self.parameters_schema(),
        }
    }
}
