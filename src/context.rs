//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use std::future::Future;
use std::rc::Rc;

use chrono::NaiveDate;
use garden_state::{Coordinator, HttpGardenRepository, MutationError};
use leptos::prelude::*;
use leptos::task::spawn_local;

pub type AppCoordinator = Coordinator<HttpGardenRepository>;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Coordinator for every mutation; not `Send`, so kept in local storage
    coordinator: StoredValue<Rc<AppCoordinator>, LocalStorage>,
    /// Trigger to reload gardens and catalog from the backend - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to reload gardens and catalog from the backend - write
    set_reload_trigger: WriteSignal<u32>,
}

impl AppContext {
    pub fn new(coordinator: Rc<AppCoordinator>, reload_trigger: (ReadSignal<u32>, WriteSignal<u32>)) -> Self {
        Self {
            coordinator: StoredValue::new_local(coordinator),
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
        }
    }

    pub fn coordinator(&self) -> Rc<AppCoordinator> {
        self.coordinator.get_value()
    }

    /// Trigger a reload from the backend
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    /// Local calendar date, used for planting and reminder scheduling
    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}

/// Run a coordinator operation from an event handler
///
/// The coordinator has already raised a notice for the user; the failure
/// is logged here so it also reaches the console.
pub fn spawn_mutation<T: 'static>(
    label: &'static str,
    mutation: impl Future<Output = Result<T, MutationError>> + 'static,
) {
    spawn_local(async move {
        if let Err(e) = mutation.await {
            log::error!("[{}] {}", label, e);
        }
    });
}
