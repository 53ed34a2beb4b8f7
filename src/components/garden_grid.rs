//! Garden Grid Component
//!
//! Renders the selected garden as a grid of cells. Clicking toggles a cell
//! in the batch selection; planted cells can be dragged to the trash.

use garden_state::{Coord, Garden};
use leptos::prelude::*;
use leptos_dragdrop::{make_on_mousedown, make_on_mouseleave, make_on_target_mouseenter, DndSignals, DragSource, DropTarget};

use crate::components::ResizeControls;
use crate::context::{spawn_mutation, use_app_context};
use crate::store::{selected_garden, store_take_selection, store_toggle_cell, use_app_store, AppStateStoreFields};

#[component]
pub fn GardenGrid() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let remove_selected = move |_| {
        let index = store.selected_garden().get_untracked();
        let coords = store_take_selection(&store);
        if coords.is_empty() {
            return;
        }
        let coordinator = ctx.coordinator();
        spawn_mutation("remove plants", async move {
            coordinator.remove_plants(index, coords).await
        });
    };

    view! {
        <section class="garden-grid-panel">
            {move || match selected_garden(&store) {
                None => view! {
                    <p class="empty-hint">"No gardens yet. Create one to start planting."</p>
                }.into_any(),
                Some((_, garden)) => view! {
                    <h2>{format!("{} ({} × {})", garden.name, garden.size_x, garden.size_y)}</h2>
                    <ResizeControls />
                    <GridCells garden=garden />
                }.into_any(),
            }}
            <div class="selection-actions">
                <span class="selection-count">
                    {move || format!("{} selected", store.selection().with(|s| s.len()))}
                </span>
                <button
                    class="remove-selected-btn"
                    disabled=move || store.selection().with(|s| s.is_empty())
                    on:click=remove_selected
                >
                    "Remove selected"
                </button>
                <button
                    class="clear-selection-btn"
                    on:click=move |_| store.selection().write().clear()
                >
                    "Clear"
                </button>
            </div>
        </section>
    }
}

#[component]
fn GridCells(garden: Garden) -> impl IntoView {
    let store = use_app_store();
    let dnd = expect_context::<DndSignals>();

    let rows = (0..garden.size_y)
        .map(|row| {
            let cells = (0..garden.size_x)
                .map(|col| {
                    let coord = Coord::new(row, col);
                    let cell = garden.cell(coord).cloned();
                    let target = DropTarget::Cell { row, col };

                    let is_selected = move || store.selection().with(|s| s.contains(coord));
                    let is_drop_target = move || dnd.drop_target_read.get() == Some(target);
                    let on_click = move |_| {
                        if dnd.drag_just_ended_read.get_untracked() {
                            return;
                        }
                        store_toggle_cell(&store, coord);
                    };

                    match cell {
                        Some(cell) => {
                            let on_mousedown = make_on_mousedown(dnd, DragSource::Cell { row, col });
                            let title = match cell.planted_date {
                                Some(date) => format!("{} (planted {})", cell.plant_detail.name, date),
                                None => cell.plant_detail.name.clone(),
                            };
                            view! {
                                <div
                                    class="grid-cell planted"
                                    class:selected=is_selected
                                    class:drop-target=is_drop_target
                                    class:pending=cell.id.is_none()
                                    title=title
                                    on:click=on_click
                                    on:mousedown=on_mousedown
                                    on:mouseenter=make_on_target_mouseenter(dnd, target)
                                    on:mouseleave=make_on_mouseleave(dnd)
                                >
                                    {cell.plant_detail.name}
                                </div>
                            }
                            .into_any()
                        }
                        None => view! {
                            <div
                                class="grid-cell empty"
                                class:selected=is_selected
                                class:drop-target=is_drop_target
                                on:click=on_click
                                on:mouseenter=make_on_target_mouseenter(dnd, target)
                                on:mouseleave=make_on_mouseleave(dnd)
                            ></div>
                        }
                        .into_any(),
                    }
                })
                .collect_view();
            view! { <div class="grid-row">{cells}</div> }
        })
        .collect_view();

    view! { <div class="garden-grid">{rows}</div> }
}
