//! Garden State
//!
//! Client-side state for the garden tracker: a reducer-driven collection of
//! gardens (grids of plant cells plus their notifications), grid geometry,
//! and optimistic mutations synchronized with the backend.
//!
//! ```text
//! UI event -> Coordinator -> GardenStore::dispatch -> reduce -> listeners
//!                 |
//!                 +-> GardenRepository (HTTP) -> reconcile | rollback
//! ```

pub mod config;
pub mod coordinator;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod format;
pub mod forms;
pub mod geometry;
pub mod raw;
pub mod reducer;
pub mod repository;
pub mod selection;
pub mod store;

pub use config::{ClientConfig, ConfigError, RetryPolicy};
pub use coordinator::{
    Backoff, BatchReport, Coordinator, Feedback, Idempotency, MutationPhase, NoBackoff, Notice, NoticeLevel,
    SilentFeedback, Snapshot,
};
pub use domain::{Cell, Coord, Garden, GardenKey, GardenPatch, Grid, Notification, NotificationPatch, PlantDetail};
pub use error::{GeometryRejection, MutationError, ReducerError, RemoteError, ValidationError};
pub use fetch::FetchState;
pub use geometry::{resize_grid, Axis, Edge, GridLimits, Step, MAX_GRID_SIDE};
pub use reducer::{reduce, validate, GardenAction};
pub use repository::{GardenRepository, HttpGardenRepository, InMemoryGardenRepository};
pub use selection::{follow_garden, FollowedGarden, Selection};
pub use store::GardenStore;
