//! Error taxonomy
//!
//! - [`ValidationError`]: bad user input, caught before any mutation.
//! - [`GeometryRejection`]: a resize refused before any mutation or request.
//! - [`RemoteError`]: the backend call failed; the coordinator rolls back.
//! - [`ReducerError`]: a caller bug; dispatch fails and state is untouched.

use thiserror::Error;

use crate::domain::Coord;
use crate::geometry::{Axis, Edge};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("a garden named `{0}` already exists")]
    DuplicateName(String),
    #[error("{field} must be a whole number, got `{value}`")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
    #[error("interval must be at least one day")]
    ZeroInterval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryRejection {
    #[error("a garden can be at most {max} cells {axis}")]
    TooLarge { axis: Axis, max: usize },
    #[error("a garden must be at least 1 cell {axis}")]
    TooSmall { axis: Axis },
    #[error("the {edge} edge still has {occupied} plant(s); remove them first")]
    Occupied { edge: Edge, occupied: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("network error on {path}: {message}")]
    Network { path: String, message: String },
    #[error("{path} answered {status}")]
    Status { path: String, status: u16 },
    #[error("could not decode response from {path}: {message}")]
    Decode { path: String, message: String },
}

impl RemoteError {
    /// Transport failures and server-side errors are worth another attempt;
    /// client errors and undecodable bodies are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::Network { .. } => true,
            RemoteError::Status { status, .. } => *status >= 500,
            RemoteError::Decode { .. } => false,
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReducerError {
    #[error("garden index {index} out of bounds for {len} garden(s)")]
    GardenIndexOutOfBounds { index: usize, len: usize },
    #[error("cell {coord} lies outside the {size_x}x{size_y} grid of garden {garden_index}")]
    CellOutOfBounds {
        garden_index: usize,
        coord: Coord,
        size_x: usize,
        size_y: usize,
    },
    #[error("garden {garden_index} cells do not form a {size_x}x{size_y} grid")]
    DimensionMismatch {
        garden_index: usize,
        size_x: usize,
        size_y: usize,
    },
    #[error("garden {garden_index} has no notification {notification_id}")]
    UnknownNotification {
        garden_index: usize,
        notification_id: u32,
    },
    #[error("{action} is missing required field `{field}`")]
    MissingField {
        action: &'static str,
        field: &'static str,
    },
    #[error("malformed action: {0}")]
    MalformedAction(String),
}

/// Outcome of a coordinator operation that did not complete
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Rejected(#[from] GeometryRejection),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Reducer(#[from] ReducerError),
    #[error("garden {garden_index} has not been saved yet")]
    Unsaved { garden_index: usize },
    #[error("notification {notification_id} has no pending occurrence")]
    NoPendingInstance { notification_id: u32 },
}
