//! New Garden Form Component

use garden_state::forms::GardenForm;
use leptos::prelude::*;

use crate::context::{spawn_mutation, use_app_context};
use crate::store::{store_select_garden, use_app_store};

#[component]
pub fn NewGardenForm() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (name, set_name) = signal(String::new());
    let (size_x, set_size_x) = signal(String::from("4"));
    let (size_y, set_size_y) = signal(String::from("4"));

    let create_garden = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = GardenForm {
            name: name.get(),
            size_x: size_x.get(),
            size_y: size_y.get(),
        };
        let coordinator = ctx.coordinator();
        spawn_mutation("create garden", async move {
            coordinator.create_garden(&form).await.map(|_| {
                set_name.set(String::new());
                store_select_garden(&store, 0);
            })
        });
    };

    view! {
        <form class="new-garden-form" on:submit=create_garden>
            <input
                type="text"
                placeholder="New garden name"
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <input
                type="number"
                min="1"
                title="Width"
                prop:value=move || size_x.get()
                on:input=move |ev| set_size_x.set(event_target_value(&ev))
            />
            "×"
            <input
                type="number"
                min="1"
                title="Height"
                prop:value=move || size_y.get()
                on:input=move |ev| set_size_y.set(event_target_value(&ev))
            />
            <button type="submit">"Add garden"</button>
        </form>
    }
}
