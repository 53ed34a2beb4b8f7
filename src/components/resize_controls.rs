//! Resize Controls Component
//!
//! One grow and one shrink button per grid edge.

use garden_state::{Edge, Step};
use leptos::prelude::*;

use crate::context::{spawn_mutation, use_app_context};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn ResizeControls() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let resize = move |step: Step, edge: Edge| {
        let index = store.selected_garden().get_untracked();
        let coordinator = ctx.coordinator();
        spawn_mutation("resize garden", async move {
            coordinator.resize_garden(index, step, edge).await
        });
    };

    let controls = Edge::ALL
        .into_iter()
        .map(|edge| {
            view! {
                <span class="resize-edge">
                    <span class="resize-edge-label">{edge.to_string()}</span>
                    <button
                        title=format!("Add a {} row or column", edge)
                        on:click=move |_| resize(Step::Grow, edge)
                    >
                        "+"
                    </button>
                    <button
                        title=format!("Remove the {} row or column", edge)
                        on:click=move |_| resize(Step::Shrink, edge)
                    >
                        "−"
                    </button>
                </span>
            }
        })
        .collect_view();

    view! { <div class="resize-controls">{controls}</div> }
}
