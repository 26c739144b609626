//! Command dispatch for lobbylink.
//!
//! Parsed lines come in, [`EventSink`] calls and [`Action`]s go out.
//!
//! # Key types
//!
//! - [`EventSink`]: the trait the application implements
//! - [`Dispatcher`]: routes one line to its handler
//! - [`CommandKind`]: the table of understood commands
//! - [`Action`]: follow-up work for the connection supervisor

mod dispatcher;
mod error;
mod sink;
mod table;

pub use dispatcher::{Action, Dispatcher};
pub use error::DispatchError;
pub use sink::{EventSink, NullSink};
pub use table::{CommandKind, NUMERIC_COMMANDS, TEXT_COMMANDS};
