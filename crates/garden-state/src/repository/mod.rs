//! Repository Layer
//!
//! Port to the garden backend plus its HTTP and in-memory adapters.

mod http;
mod memory;
mod payloads;
mod traits;

pub use http::HttpGardenRepository;
pub use memory::{InMemoryGardenRepository, Op};
pub use payloads::{GardenUpdate, NewGarden, NewGardenLog, NewNotification};
pub use traits::GardenRepository;
