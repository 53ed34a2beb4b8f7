//! Data-Fetch Hook
//!
//! Runs a request on mount and again whenever the trigger changes,
//! exposing its `FetchState` as a signal.

use std::fmt::Display;
use std::future::Future;

use garden_state::FetchState;
use leptos::prelude::*;
use leptos::task::spawn_local;

pub fn use_fetch<T, E, F, Fut>(trigger: ReadSignal<u32>, fetcher: F) -> ReadSignal<FetchState<T>>
where
    T: Send + Sync + 'static,
    E: Display + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    let (state, set_state) = signal(FetchState::<T>::Idle);

    Effect::new(move |_| {
        let run = trigger.get();
        log::debug!("[use_fetch] run {}", run);
        set_state.update(FetchState::start);
        let request = fetcher();
        spawn_local(async move {
            let result = request.await;
            set_state.update(|s| s.finish(result));
        });
    });

    state
}
