//! Error types for the event AI core

use thiserror::Error;

/// Main error type for the event AI core
///
/// Nothing here is fatal to the host. Callers inside the interpreter log these
/// with `tracing::warn!` and fall back to behaving as if the feature were absent.
#[derive(Error, Debug)]
pub enum EventAiError {
    #[error("Unknown map: {0}")]
    UnknownMap(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("No such item: {0}")]
    NoSuchItem(String),

    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Malformed move route: {0}")]
    MalformedRoute(String),

    #[error("Cannot erase linked event {event_id} on map {map_id} from map {current_map_id}")]
    CrossMapErase {
        event_id: i32,
        map_id: i32,
        current_map_id: i32,
    },

    #[error("End of weight branches at depth {0} with no branch set open")]
    NoOpenWeightBranches(u32),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

/// Result type alias for the event AI core
pub type Result<T> = std::result::Result<T, EventAiError>;
