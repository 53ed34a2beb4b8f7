//! Repository Port
//!
//! Abstract interface to the garden backend. The coordinator only talks to
//! this trait, so it runs the same against HTTP or in memory.

use async_trait::async_trait;

use crate::error::RemoteResult;
use crate::raw::{RawGarden, RawGardenLog, RawNotification, RawPlant};

use super::payloads::{GardenUpdate, NewGarden, NewGardenLog, NewNotification};

/// Remote operations on gardens, garden logs, notifications and the catalog
///
/// Futures are `?Send`: the client runs on a single-threaded event loop.
#[async_trait(?Send)]
pub trait GardenRepository {
    async fn list_gardens(&self) -> RemoteResult<Vec<RawGarden>>;

    async fn list_notifications(&self) -> RemoteResult<Vec<RawNotification>>;

    /// Plant catalog
    async fn list_plants(&self) -> RemoteResult<Vec<RawPlant>>;

    async fn create_garden(&self, garden: &NewGarden) -> RemoteResult<RawGarden>;

    async fn update_garden(&self, id: u32, update: &GardenUpdate) -> RemoteResult<RawGarden>;

    async fn delete_garden(&self, id: u32) -> RemoteResult<()>;

    async fn create_garden_log(&self, log: &NewGardenLog) -> RemoteResult<RawGardenLog>;

    async fn delete_garden_log(&self, id: u32) -> RemoteResult<()>;

    async fn create_notification(&self, notification: &NewNotification) -> RemoteResult<RawNotification>;

    async fn delete_notification(&self, id: u32) -> RemoteResult<()>;

    /// Mark a pending occurrence done; returns the rescheduled notification
    /// when the server includes it
    async fn complete_instance(&self, instance_id: u32) -> RemoteResult<Option<RawNotification>>;

    async fn skip_instance(&self, instance_id: u32) -> RemoteResult<Option<RawNotification>>;
}
