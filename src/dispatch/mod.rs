//! Request normalization and function dispatch.

mod dispatcher;
mod normalize;

pub use dispatcher::{DispatchError, Dispatcher};
pub use normalize::{
    ArgumentSource, FunctionCall, NormalizeError, RESERVED_KEYS, WebhookRequest, normalize,
    parse_body,
};
