//! Callable functions exposed to the voice agent.
//!
//! Each function declares its parameters up front. The dispatcher binds
//! incoming argument objects against that declaration, so nothing outside
//! the registry can ever be reached by name.

pub mod binding;
pub mod builtin;
mod function;
mod registry;

pub use binding::{ArgumentError, Arguments, BindError, BoundArguments, bind};
pub use function::{FunctionSignature, ParamKind, Parameter, ReservationFunction};
pub use registry::FunctionRegistry;
