//! Optimistic Mutations
//!
//! Apply locally, request remotely, then confirm or roll back. Every
//! mutating operation goes through [`Coordinator::run_optimistic_mutation`],
//! so the retry and rollback policy lives here only.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;

use crate::domain::{
    position_by_id, position_by_key, Cell, Coord, Entity, Garden, GardenKey, GardenPatch, Notification,
};
use crate::error::{MutationError, RemoteResult};
use crate::geometry::{resize_grid, with_cells, Edge, GridLimits, Step};
use crate::reducer::GardenAction;
use crate::repository::GardenRepository;

use super::{Coordinator, Notice};

/// Pre-mutation copy of whatever a mutation touches
///
/// Gardens are found by key when the rollback runs, so other mutations
/// finishing in between cannot redirect it. Each variant undoes only what
/// its own mutation changed.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// Name before a rename
    Name { key: GardenKey, name: String },
    /// Resize undone by the inverse step; `size_x`/`size_y` are the resized dimensions
    Resize {
        key: GardenKey,
        step: Step,
        edge: Edge,
        size_x: usize,
        size_y: usize,
    },
    /// Re-inserted near its old position
    RemovedGarden { index: usize, garden: Garden },
    /// Optimistic garden to drop again
    InsertedGarden { key: GardenKey },
    /// Prior contents of the listed slots
    Cells {
        key: GardenKey,
        cells: Vec<(Coord, Option<Cell>)>,
    },
    /// Reminder put back as it was, at `position` if it is gone
    Notification {
        key: GardenKey,
        position: usize,
        notification: Notification,
    },
    /// Optimistic reminder to drop again
    InsertedNotification { key: GardenKey, local_id: u64 },
}

impl Snapshot {
    pub fn key(&self) -> Option<GardenKey> {
        match self {
            Snapshot::RemovedGarden { garden, .. } => garden.key(),
            Snapshot::Name { key, .. }
            | Snapshot::Resize { key, .. }
            | Snapshot::InsertedGarden { key }
            | Snapshot::Cells { key, .. }
            | Snapshot::Notification { key, .. }
            | Snapshot::InsertedNotification { key, .. } => Some(*key),
        }
    }

    /// Compensating actions against the state as it is now
    pub fn rollback_actions(&self, state: &[Garden]) -> Vec<GardenAction> {
        if let Snapshot::RemovedGarden { index, garden } = self {
            let present = garden.key().is_some_and(|key| position_by_key(state, key).is_some());
            if present {
                return Vec::new();
            }
            return vec![GardenAction::AddGarden {
                payload: garden.clone().into(),
                garden_index: Some((*index).min(state.len())),
            }];
        }

        let Some((garden_index, garden)) = self
            .key()
            .and_then(|key| position_by_key(state, key))
            .map(|i| (i, &state[i]))
        else {
            log::debug!("nothing to roll back, {:?} is gone", self.key());
            return Vec::new();
        };

        match self {
            Snapshot::Name { name, .. } => vec![GardenAction::UpdateGarden {
                garden_index,
                payload: GardenPatch::renamed(name.clone()),
            }],
            Snapshot::Resize {
                step,
                edge,
                size_x,
                size_y,
                ..
            } => undo_resize(garden_index, garden, *step, *edge, (*size_x, *size_y)),
            Snapshot::InsertedGarden { .. } => vec![GardenAction::RemoveGarden { garden_index }],
            Snapshot::Cells { cells, .. } => {
                let changes: Vec<(Coord, Option<Cell>)> = cells
                    .iter()
                    .filter(|(coord, _)| garden.contains(*coord))
                    .filter_map(|(coord, prior)| match (prior, garden.cell(*coord)) {
                        // placement: clear our placeholder, never a saved cell
                        (None, Some(current)) if !current.is_persisted() => Some((*coord, None)),
                        // removal: put the cell back into a still empty slot
                        (Some(cell), None) => Some((*coord, Some(cell.clone()))),
                        _ => None,
                    })
                    .collect();
                if changes.is_empty() {
                    return Vec::new();
                }
                vec![GardenAction::PatchCells {
                    garden_index,
                    payload: with_cells(&garden.cells, changes),
                }]
            }
            Snapshot::Notification {
                position,
                notification,
                ..
            } => {
                let mut notifications = garden.notifications.clone();
                match notification.id.and_then(|id| position_by_id(&notifications, id)) {
                    Some(current) => notifications[current] = notification.clone(),
                    None => notifications.insert((*position).min(notifications.len()), notification.clone()),
                }
                vec![GardenAction::UpdateNotifications {
                    garden_index,
                    payload: notifications,
                }]
            }
            Snapshot::InsertedNotification { local_id, .. } => {
                let mut notifications = garden.notifications.clone();
                let before = notifications.len();
                notifications.retain(|n| n.local_id != Some(*local_id));
                if notifications.len() == before {
                    return Vec::new();
                }
                vec![GardenAction::UpdateNotifications {
                    garden_index,
                    payload: notifications,
                }]
            }
            Snapshot::RemovedGarden { .. } => Vec::new(),
        }
    }
}

/// Inverse resize, refused when the grid changed size since or the added edge is planted
fn undo_resize(
    garden_index: usize,
    garden: &Garden,
    step: Step,
    edge: Edge,
    resized: (usize, usize),
) -> Vec<GardenAction> {
    if (garden.size_x, garden.size_y) != resized {
        log::warn!(
            "not undoing resize of {:?}: now {}x{}, expected {}x{}",
            garden.name,
            garden.size_x,
            garden.size_y,
            resized.0,
            resized.1
        );
        return Vec::new();
    }
    match resize_grid(garden, step.inverse(), edge, GridLimits::hard()) {
        Ok(restored) => vec![GardenAction::UpdateGarden {
            garden_index,
            payload: GardenPatch::resized(restored.size_x, restored.size_y, restored.cells),
        }],
        Err(rejection) => {
            log::warn!("not undoing resize of {:?}: {}", garden.name, rejection);
            Vec::new()
        }
    }
}

/// Whether a request may be sent again after a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Idempotency {
    /// GET, PATCH and DELETE
    Idempotent,
    /// POST: the server may have committed before the failure, so never repeated
    SendOnce,
}

/// Lifecycle of one mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    Idle,
    OptimisticallyApplied,
    PendingNetwork,
    Confirmed,
    RolledBack,
}

impl fmt::Display for MutationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationPhase::Idle => "idle",
            MutationPhase::OptimisticallyApplied => "optimistically-applied",
            MutationPhase::PendingNetwork => "pending-network",
            MutationPhase::Confirmed => "confirmed",
            MutationPhase::RolledBack => "rolled-back",
        };
        f.write_str(name)
    }
}

fn enter(label: &str, phase: MutationPhase) {
    match phase {
        MutationPhase::RolledBack => log::warn!("[{}] {}", label, phase),
        _ => log::debug!("[{}] {}", label, phase),
    }
}

/// Sleep between retry attempts
#[async_trait(?Send)]
pub trait Backoff {
    async fn sleep(&self, ms: u64);
}

/// Retries immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBackoff;

#[async_trait(?Send)]
impl Backoff for NoBackoff {
    async fn sleep(&self, _ms: u64) {}
}

impl<R: GardenRepository> Coordinator<R> {
    /// Run `request` under the retry policy, tracking it as in flight
    pub(super) async fn request_with_retry<T, Fut, Req>(
        &self,
        label: &str,
        idempotency: Idempotency,
        mut request: Req,
    ) -> RemoteResult<T>
    where
        Req: FnMut() -> Fut,
        Fut: Future<Output = RemoteResult<T>>,
    {
        let policy = self.config.retry;
        let max_attempts = match idempotency {
            Idempotency::Idempotent => policy.max_attempts.max(1),
            Idempotency::SendOnce => 1,
        };
        self.track(1);
        let mut attempt = 1;
        let result = loop {
            match request().await {
                Ok(value) => break Ok(value),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = policy.delay_ms(attempt);
                    log::warn!("[{}] attempt {} failed: {}; retrying in {}ms", label, attempt, e, delay);
                    self.backoff.sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => break Err(e),
            }
        };
        self.track(-1);
        result
    }

    fn rollback(&self, label: &str, snapshot: &Snapshot) {
        let actions = self.store.with_state(|state| snapshot.rollback_actions(state.unwrap_or(&[])));
        for action in actions {
            if let Err(e) = self.store.dispatch(action) {
                log::error!("[{}] rollback failed: {}", label, e);
            }
        }
        enter(label, MutationPhase::RolledBack);
    }

    /// Apply, request, then reconcile or roll back
    ///
    /// `apply` is dispatched before the request. On failure the snapshot's
    /// compensating actions are dispatched and exactly one error notice is
    /// raised. On success `reconcile` derives follow-up actions from the
    /// response and the state at that moment.
    pub async fn run_optimistic_mutation<T, Fut, Req, Rec>(
        &self,
        label: &str,
        idempotency: Idempotency,
        snapshot: Snapshot,
        apply: Vec<GardenAction>,
        request: Req,
        reconcile: Rec,
    ) -> Result<T, MutationError>
    where
        Req: FnMut() -> Fut,
        Fut: Future<Output = RemoteResult<T>>,
        Rec: FnOnce(&T, &[Garden]) -> Vec<GardenAction>,
    {
        enter(label, MutationPhase::Idle);
        for action in apply {
            if let Err(e) = self.store.dispatch(action) {
                self.rollback(label, &snapshot);
                return self.reject(e);
            }
        }
        enter(label, MutationPhase::OptimisticallyApplied);

        enter(label, MutationPhase::PendingNetwork);
        match self.request_with_retry(label, idempotency, request).await {
            Ok(value) => {
                let follow_up = self.store.with_state(|state| reconcile(&value, state.unwrap_or(&[])));
                for action in follow_up {
                    if let Err(e) = self.store.dispatch(action) {
                        log::error!("[{}] saved, but reconcile failed: {}", label, e);
                        self.feedback.notice(Notice::error(format!(
                            "Saved, but the page is out of date after trying to {label}; reload to refresh"
                        )));
                        return Err(e.into());
                    }
                }
                enter(label, MutationPhase::Confirmed);
                Ok(value)
            }
            Err(e) => {
                log::error!("[{}] request failed: {}", label, e);
                self.rollback(label, &snapshot);
                self.feedback.notice(Notice::error(format!("Could not {label}: {e}")));
                Err(e.into())
            }
        }
    }
}
