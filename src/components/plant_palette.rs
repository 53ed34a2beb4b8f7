//! Plant Palette Component
//!
//! Sidebar listing the plant catalog. Plants are dragged onto cells, or
//! clicked to plant every selected cell at once. Planted cells dropped on
//! the trash are removed.

use garden_state::{FetchState, PlantDetail};
use leptos::prelude::*;
use leptos_dragdrop::{make_on_mousedown, make_on_mouseleave, make_on_target_mouseenter, DndSignals, DragSource, DropTarget};

use crate::context::{spawn_mutation, use_app_context};
use crate::store::{store_take_selection, use_app_store, AppStateStoreFields};

#[component]
pub fn PlantPalette(catalog: ReadSignal<FetchState<Vec<PlantDetail>>>) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let dnd = expect_context::<DndSignals>();

    let plant_selection = move |plant: PlantDetail| {
        if store.selection().with_untracked(|s| s.is_empty()) {
            return;
        }
        let index = store.selected_garden().get_untracked();
        let coords = store_take_selection(&store);
        let today = ctx.today();
        let coordinator = ctx.coordinator();
        spawn_mutation("place plant", async move {
            coordinator.place_plant(index, &plant, coords, today).await
        });
    };

    let is_trash_target = move || dnd.drop_target_read.get() == Some(DropTarget::Trash);

    view! {
        <aside class="plant-palette">
            <h2>"Plants"</h2>
            {move || match catalog.get() {
                FetchState::Idle | FetchState::Loading => view! {
                    <p class="loading">"Loading plants..."</p>
                }.into_any(),
                FetchState::Failed(message) => view! {
                    <p class="error">{message}</p>
                }.into_any(),
                FetchState::Loaded(plants) if plants.is_empty() => view! {
                    <p class="empty-hint">"The plant catalog is empty."</p>
                }.into_any(),
                FetchState::Loaded(plants) => view! {
                    <ul class="plant-list">
                        <For
                            each=move || plants.clone()
                            key=|plant| plant.id
                            children=move |plant| {
                                let label = match &plant.family {
                                    Some(family) => format!("{} ({})", plant.name, family),
                                    None => plant.name.clone(),
                                };
                                let on_mousedown = make_on_mousedown(dnd, DragSource::Plant(plant.id));
                                view! {
                                    <li
                                        class="plant-item"
                                        class:dragging=move || dnd.dragging_read.get() == Some(DragSource::Plant(plant.id))
                                        on:mousedown=on_mousedown
                                        on:click=move |_| plant_selection(plant.clone())
                                    >
                                        {label}
                                    </li>
                                }
                            }
                        />
                    </ul>
                }.into_any(),
            }}
            <div
                class="trash-target"
                class:drop-target=is_trash_target
                on:mouseenter=make_on_target_mouseenter(dnd, DropTarget::Trash)
                on:mouseleave=make_on_mouseleave(dnd)
            >
                "Drop here to remove"
            </div>
        </aside>
    }
}
