//! Optimistic Mutation Coordinator
//!
//! Owns the conversation between the store and the backend:
//! - optimistic: the generic apply/request/reconcile/rollback combinator
//! - gardens: create, rename, delete and resize
//! - plants: batch placement and removal
//! - notifications: create, delete, complete and skip

mod gardens;
mod notifications;
mod optimistic;
mod plants;


use std::cell::Cell as Counter;
use std::rc::Rc;

use crate::config::ClientConfig;
use crate::domain::{Garden, PlantDetail};
use crate::error::{MutationError, ReducerError};
use crate::format::{format_plant_detail, join_notifications};
use crate::reducer::GardenAction;
use crate::repository::GardenRepository;
use crate::store::GardenStore;

pub use optimistic::{Backoff, Idempotency, MutationPhase, NoBackoff, Snapshot};
pub use plants::BatchReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-facing message raised by a coordinator operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Where the coordinator reports to the user
pub trait Feedback {
    fn notice(&self, notice: Notice);

    /// Number of requests currently in flight
    fn in_flight(&self, count: usize);
}

/// Discards everything; for headless use
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn notice(&self, notice: Notice) {
        log::info!("notice: {}", notice.message);
    }

    fn in_flight(&self, _count: usize) {}
}

pub struct Coordinator<R> {
    store: GardenStore,
    repo: Rc<R>,
    feedback: Rc<dyn Feedback>,
    backoff: Rc<dyn Backoff>,
    config: ClientConfig,
    in_flight: Counter<usize>,
    next_local: Counter<u64>,
}

impl<R: GardenRepository> Coordinator<R> {
    pub fn new(store: GardenStore, repo: Rc<R>, feedback: Rc<dyn Feedback>, config: ClientConfig) -> Self {
        Self {
            store,
            repo,
            feedback,
            backoff: Rc::new(NoBackoff),
            config,
            in_flight: Counter::new(0),
            next_local: Counter::new(1),
        }
    }

    pub fn with_backoff(mut self, backoff: Rc<dyn Backoff>) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn store(&self) -> &GardenStore {
        &self.store
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    fn track(&self, delta: isize) {
        let count = self.in_flight.get().saturating_add_signed(delta);
        self.in_flight.set(count);
        self.feedback.in_flight(count);
    }

    /// Client token for an entity the server has not assigned an id yet
    fn next_local_id(&self) -> u64 {
        let token = self.next_local.get();
        self.next_local.set(token + 1);
        token
    }

    /// Raise a notice for an error caught before any mutation
    fn reject<T>(&self, err: impl Into<MutationError>) -> Result<T, MutationError> {
        let err = err.into();
        log::warn!("rejected: {}", err);
        self.feedback.notice(Notice::error(err.to_string()));
        Err(err)
    }

    fn garden_at(&self, index: usize) -> Result<Garden, MutationError> {
        match self.store.garden(index) {
            Some(garden) => Ok(garden),
            None => self.reject(ReducerError::GardenIndexOutOfBounds {
                index,
                len: self.store.len(),
            }),
        }
    }

    /// Fetch gardens and notifications, join them and replace the state
    pub async fn populate(&self) -> Result<(), MutationError> {
        let repo = self.repo.as_ref();
        let gardens = self
            .request_with_retry("load gardens", Idempotency::Idempotent, move || repo.list_gardens())
            .await;
        let notifications = match gardens {
            Ok(_) => {
                self.request_with_retry("load notifications", Idempotency::Idempotent, move || {
                    repo.list_notifications()
                })
                .await
            }
            Err(_) => Ok(Vec::new()),
        };
        let joined = gardens.and_then(|gardens| notifications.map(|n| join_notifications(gardens, n)));
        match joined {
            Ok(payload) => {
                log::info!("populating {} garden(s)", payload.len());
                match self.store.dispatch(GardenAction::Populate { payload }) {
                    Ok(()) => Ok(()),
                    Err(e) => self.reject(e),
                }
            }
            Err(e) => {
                log::error!("populate failed: {}", e);
                self.feedback.notice(Notice::error(format!("Could not load gardens: {e}")));
                Err(e.into())
            }
        }
    }

    /// Plant catalog for the palette
    pub async fn load_catalog(&self) -> Result<Vec<PlantDetail>, MutationError> {
        let repo = self.repo.as_ref();
        let plants = self
            .request_with_retry("load plants", Idempotency::Idempotent, move || repo.list_plants())
            .await;
        match plants {
            Ok(raw) => Ok(raw.into_iter().map(format_plant_detail).collect()),
            Err(e) => {
                self.feedback.notice(Notice::error(format!("Could not load plants: {e}")));
                Err(e.into())
            }
        }
    }
}
