//! Application layer: client state and the store service
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod services;
pub mod state;

pub use error::{ApplicationError, ApplicationResult};
pub use state::{reduce, AppState, Effect, Event, Transition};
