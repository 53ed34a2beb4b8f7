//! Domain Layer
//!
//! Normalized in-memory entities. Raw API shapes never reach this layer;
//! see `format` for the translation boundary.

mod cell;
mod coord;
mod entity;
mod garden;
mod notification;

pub use cell::{Cell, PlantDetail};
pub use coord::{Coord, CoordParseError};
pub use entity::{position_by_id, Entity};
pub use garden::{empty_grid, grid_matches, position_by_key, Garden, GardenKey, GardenPatch, Grid};
pub use notification::{Notification, NotificationPatch};
