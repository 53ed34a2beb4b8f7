//! Garden Tab Bar Component
//!
//! Tabs for switching gardens, with inline rename and delete.

use leptos::prelude::*;

use crate::components::DeleteConfirmButton;
use crate::context::{spawn_mutation, use_app_context};
use crate::store::{store_select_garden, use_app_store, AppStateStoreFields};

#[component]
pub fn GardenTabBar() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (renaming, set_renaming) = signal(None::<usize>);
    let (new_name, set_new_name) = signal(String::new());

    let on_rename = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(index) = renaming.get() else { return };
        let name = new_name.get();
        let coordinator = ctx.coordinator();
        spawn_mutation("rename garden", async move {
            coordinator.rename_garden(index, &name).await
        });
        set_renaming.set(None);
    };

    let tabs = move || {
        store
            .gardens()
            .with(|gardens| {
                gardens
                    .iter()
                    .enumerate()
                    .map(|(i, g)| (i, g.id, g.name.clone(), g.total_plants))
                    .collect::<Vec<_>>()
            })
    };

    view! {
        <div class="garden-tab-bar">
            <For
                each=tabs
                key=|tab| tab.clone()
                children=move |(index, id, name, total)| {
                    let is_active = move || store.selected_garden().get() == index;
                    let tab_class = move || if is_active() { "garden-tab active" } else { "garden-tab" };
                    let pending = id.is_none();
                    let current_name = name.clone();

                    view! {
                        <div class=tab_class>
                            {move || if renaming.get() == Some(index) {
                                view! {
                                    <form class="garden-rename-form" on:submit=on_rename>
                                        <input
                                            type="text"
                                            prop:value=move || new_name.get()
                                            on:input=move |ev| set_new_name.set(event_target_value(&ev))
                                        />
                                        <button type="submit">"✓"</button>
                                        <button type="button" on:click=move |_| set_renaming.set(None)>"✗"</button>
                                    </form>
                                }.into_any()
                            } else {
                                let label = format!("{} ({})", name, total);
                                let current_name = current_name.clone();
                                view! {
                                    <button
                                        class="garden-tab-name"
                                        class:pending=pending
                                        on:click=move |_| store_select_garden(&store, index)
                                        on:dblclick=move |_| {
                                            set_new_name.set(current_name.clone());
                                            set_renaming.set(Some(index));
                                        }
                                    >
                                        {label}
                                    </button>
                                }.into_any()
                            }}
                            <DeleteConfirmButton
                                button_class="garden-delete-btn"
                                on_confirm=move |_| {
                                    let coordinator = ctx.coordinator();
                                    spawn_mutation("delete garden", async move {
                                        coordinator.delete_garden(index).await
                                    });
                                }
                            />
                        </div>
                    }
                }
            />
        </div>
    }
}
