//! Garden Store
//!
//! Single-threaded holder of the garden collection. Every change goes
//! through [`GardenStore::dispatch`]; listeners are notified after the new
//! state is in place and no borrow is held, so a listener may read the store
//! or dispatch again.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::Garden;
use crate::error::ReducerError;
use crate::reducer::{reduce, validate, GardenAction};

pub type SubscriptionId = usize;

type Listener = Rc<dyn Fn(&[Garden])>;

#[derive(Default)]
struct Inner {
    /// `None` until the first `POPULATE` or `ADD_GARDEN`
    state: Option<Rc<Vec<Garden>>>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: SubscriptionId,
}

/// Shared handle; clones point at the same state
#[derive(Clone, Default)]
pub struct GardenStore {
    inner: Rc<RefCell<Inner>>,
}

impl GardenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current collection (empty before population)
    pub fn get_state(&self) -> Vec<Garden> {
        self.inner
            .borrow()
            .state
            .as_deref()
            .cloned()
            .unwrap_or_default()
    }

    /// Borrow the current state without copying it
    pub fn with_state<T>(&self, f: impl FnOnce(Option<&[Garden]>) -> T) -> T {
        let state = self.inner.borrow().state.clone();
        f(state.as_deref().map(Vec::as_slice))
    }

    pub fn garden(&self, index: usize) -> Option<Garden> {
        self.with_state(|state| state.and_then(|gardens| gardens.get(index).cloned()))
    }

    pub fn len(&self) -> usize {
        self.with_state(|state| state.map_or(0, <[Garden]>::len))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_populated(&self) -> bool {
        self.inner.borrow().state.is_some()
    }

    /// Reduce `action` into the stored state and notify listeners
    ///
    /// On error the stored state is left exactly as it was.
    pub fn dispatch(&self, action: GardenAction) -> Result<(), ReducerError> {
        let current = self.inner.borrow().state.clone();
        let current = current.as_deref().map(Vec::as_slice);

        if cfg!(debug_assertions) {
            if let Err(e) = validate(current, &action) {
                log::error!("[GardenStore] rejected {}: {}", action.kind(), e);
                return Err(e);
            }
        }

        let next = match reduce(current, &action) {
            Ok(next) => Rc::new(next),
            Err(e) => {
                log::error!("[GardenStore] {} failed: {}", action.kind(), e);
                return Err(e);
            }
        };
        log::debug!(
            "[GardenStore] {} -> {} garden(s)",
            action.kind(),
            next.len()
        );

        let listeners: Vec<Listener> = {
            let mut inner = self.inner.borrow_mut();
            inner.state = Some(next.clone());
            inner.listeners.iter().map(|(_, l)| l.clone()).collect()
        };
        for listener in listeners {
            listener(&next);
        }
        Ok(())
    }

    /// Register a listener called after every successful dispatch
    pub fn subscribe(&self, listener: impl Fn(&[Garden]) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.borrow_mut().listeners.retain(|(l, _)| *l != id);
    }
}
