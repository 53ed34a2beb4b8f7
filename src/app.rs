//! Garden Tracker Frontend App
//!
//! Wires the core coordinator to the reactive store and lays out the
//! tab bar, grid, notifications and plant palette.

use std::rc::Rc;

use garden_state::domain::position_by_id;
use garden_state::{ClientConfig, Coord, Coordinator, FetchState, GardenStore, HttpGardenRepository};
use leptos::prelude::*;
use leptos_dragdrop::{bind_global_mouseup, create_dnd_signals, DndSignals, DragSource, DropTarget};
use reactive_stores::Store;

use crate::components::{GardenGrid, GardenTabBar, NewGardenForm, NoticeBanner, NotificationList, PlantPalette};
use crate::config::load_client_config;
use crate::context::{spawn_mutation, AppContext, AppCoordinator};
use crate::feedback::UiFeedback;
use crate::fetch::use_fetch;
use crate::runtime::GlooBackoff;
use crate::store::{AppState, AppStateStoreFields, AppStore};

fn build_coordinator(store: AppStore, config: ClientConfig) -> AppCoordinator {
    let core = GardenStore::new();
    crate::store::connect_garden_store(store, &core);
    let repo = Rc::new(HttpGardenRepository::from_config(&config));
    log::info!("garden API at {}", repo.base_url());
    Coordinator::new(core, repo, Rc::new(UiFeedback::new(store)), config).with_backoff(Rc::new(GlooBackoff))
}

/// Plants dropped on a cell are planted there; cells dropped on the trash are cleared
fn bind_drops(dnd: DndSignals, ctx: AppContext, store: AppStore) {
    bind_global_mouseup(dnd, move |source, target| {
        let index = store.selected_garden().get_untracked();
        let coordinator = ctx.coordinator();
        match (source, target) {
            (DragSource::Plant(plant_id), DropTarget::Cell { row, col }) => {
                let plant = store
                    .catalog()
                    .with_untracked(|catalog| position_by_id(catalog, plant_id).map(|i| catalog[i].clone()));
                let Some(plant) = plant else {
                    log::warn!("[DND] plant {} not in catalog", plant_id);
                    return;
                };
                let today = ctx.today();
                spawn_mutation("place plant", async move {
                    coordinator.place_plant(index, &plant, [Coord::new(row, col)], today).await
                });
            }
            (DragSource::Cell { row, col }, DropTarget::Trash) => {
                spawn_mutation("remove plants", async move {
                    coordinator.remove_plants(index, [Coord::new(row, col)]).await
                });
            }
            (source, target) => log::debug!("[DND] ignoring {:?} onto {:?}", source, target),
        }
    });
}

#[component]
pub fn App() -> impl IntoView {
    let store = Store::new(AppState::default());
    provide_context(store);

    let coordinator = Rc::new(build_coordinator(store, load_client_config()));
    let (reload_trigger, set_reload_trigger) = signal(0u32);
    let ctx = AppContext::new(coordinator, (reload_trigger, set_reload_trigger));
    provide_context(ctx);

    let dnd = create_dnd_signals();
    provide_context(dnd);
    bind_drops(dnd, ctx, store);

    // Load gardens and the plant catalog on mount and on reload
    let gardens = use_fetch(reload_trigger, move || {
        let coordinator = ctx.coordinator();
        async move { coordinator.populate().await }
    });
    let catalog = use_fetch(reload_trigger, move || {
        let coordinator = ctx.coordinator();
        async move { coordinator.load_catalog().await }
    });
    Effect::new(move |_| {
        if let Some(plants) = catalog.with(|state| state.data().cloned()) {
            store.catalog().set(plants);
        }
    });

    view! {
        <div class="app-layout">
            <main class="main-content">
                <NoticeBanner />
                <h1>"Garden Tracker"</h1>

                {move || match gardens.get() {
                    FetchState::Idle | FetchState::Loading => view! {
                        <p class="loading">"Loading gardens..."</p>
                    }.into_any(),
                    FetchState::Failed(message) => view! {
                        <p class="error">
                            {message}
                            <button on:click=move |_| ctx.reload()>"Retry"</button>
                        </p>
                    }.into_any(),
                    FetchState::Loaded(()) => view! {
                        <GardenTabBar />
                        <NewGardenForm />
                        <GardenGrid />
                        <NotificationList />
                    }.into_any(),
                }}
            </main>

            <PlantPalette catalog=catalog />
        </div>
    }
}
