//! Notification List Component
//!
//! Care reminders of the selected garden with complete/skip/delete actions,
//! and a form to create new ones.

use garden_state::forms::NotificationForm;
use garden_state::{Garden, Notification, PlantDetail};
use leptos::prelude::*;

use crate::components::DeleteConfirmButton;
use crate::context::{spawn_mutation, use_app_context};
use crate::store::{selected_garden, use_app_store};

/// Reminder types offered by the form
const KINDS: [&str; 4] = ["water", "fertilize", "prune", "harvest"];

/// Distinct plants currently growing in `garden`, by catalog id
fn planted_species(garden: &Garden) -> Vec<PlantDetail> {
    let mut species: Vec<PlantDetail> = Vec::new();
    for (_, cell) in garden.planted() {
        if !species.iter().any(|p| p.id == cell.plant_detail.id) {
            species.push(cell.plant_detail.clone());
        }
    }
    species
}

#[component]
pub fn NotificationList() -> impl IntoView {
    let store = use_app_store();

    view! {
        <section class="notification-panel">
            <h2>"Reminders"</h2>
            {move || selected_garden(&store).map(|(index, garden)| {
                let species = planted_species(&garden);
                let rows = garden
                    .notifications
                    .iter()
                    .cloned()
                    .map(|notification| view! { <NotificationRow index=index notification=notification /> })
                    .collect_view();
                view! {
                    <ul class="notification-list">{rows}</ul>
                    <NewNotificationForm index=index species=species />
                }
            })}
        </section>
    }
}

#[component]
fn NotificationRow(index: usize, notification: Notification) -> impl IntoView {
    let ctx = use_app_context();

    let due = notification
        .next_due
        .map(|date| format!("due {}", date))
        .unwrap_or_else(|| "not scheduled".to_string());
    let kind = match &notification.subtype {
        Some(subtype) => format!("{} / {}", notification.kind, subtype),
        None => notification.kind.clone(),
    };
    let plants = notification.plant_names.join(", ");

    let actions = notification.id.map(|id| {
        let complete = move |_| {
            let coordinator = ctx.coordinator();
            let today = ctx.today();
            spawn_mutation("complete notification", async move {
                coordinator.complete_notification(index, id, today).await
            });
        };
        let skip = move |_| {
            let coordinator = ctx.coordinator();
            let today = ctx.today();
            spawn_mutation("skip notification", async move {
                coordinator.skip_notification(index, id, today).await
            });
        };
        view! {
            <span class="notification-actions">
                <button class="complete-btn" on:click=complete>"Done"</button>
                <button class="skip-btn" on:click=skip>"Skip"</button>
                <DeleteConfirmButton
                    button_class="notification-delete-btn"
                    on_confirm=move |_| {
                        let coordinator = ctx.coordinator();
                        spawn_mutation("delete notification", async move {
                            coordinator.delete_notification(index, id).await
                        });
                    }
                />
            </span>
        }
    });

    view! {
        <li class="notification-item" class:pending=notification.id.is_none()>
            <span class="notification-name">{notification.name.clone()}</span>
            <span class="notification-kind">{kind}</span>
            <span class="notification-interval">{format!("every {} days", notification.interval)}</span>
            <span class="notification-due">{due}</span>
            <span class="notification-plants">{plants}</span>
            {actions}
        </li>
    }
}

#[component]
fn NewNotificationForm(index: usize, species: Vec<PlantDetail>) -> impl IntoView {
    let ctx = use_app_context();
    let (name, set_name) = signal(String::new());
    let (interval, set_interval) = signal(String::from("7"));
    let (kind, set_kind) = signal(KINDS[0].to_string());
    let (subtype, set_subtype) = signal(String::new());
    let (plants, set_plants) = signal(Vec::<u32>::new());

    let toggle_plant = move |id: u32| {
        set_plants.update(|ids| {
            if let Some(pos) = ids.iter().position(|p| *p == id) {
                ids.remove(pos);
            } else {
                ids.push(id);
            }
        });
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = NotificationForm {
            name: name.get(),
            interval: interval.get(),
            kind: kind.get(),
            subtype: Some(subtype.get()),
            plants: plants.get(),
        };
        let coordinator = ctx.coordinator();
        spawn_mutation("create notification", async move {
            coordinator.create_notification(index, &form).await.map(|_| {
                set_name.set(String::new());
                set_subtype.set(String::new());
                set_plants.set(Vec::new());
            })
        });
    };

    let kind_options = KINDS
        .into_iter()
        .map(|k| view! { <option value=k>{k}</option> })
        .collect_view();

    let plant_choices = species
        .into_iter()
        .map(|plant| {
            let id = plant.id;
            view! {
                <label class="plant-choice">
                    <input
                        type="checkbox"
                        prop:checked=move || plants.with(|ids| ids.contains(&id))
                        on:change=move |_| toggle_plant(id)
                    />
                    {plant.name}
                </label>
            }
        })
        .collect_view();

    view! {
        <form class="new-notification-form" on:submit=submit>
            <input
                type="text"
                placeholder="Reminder name"
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <select
                prop:value=move || kind.get()
                on:change=move |ev| set_kind.set(event_target_value(&ev))
            >
                {kind_options}
            </select>
            <input
                type="text"
                placeholder="Subtype (optional)"
                prop:value=move || subtype.get()
                on:input=move |ev| set_subtype.set(event_target_value(&ev))
            />
            <input
                type="number"
                min="1"
                title="Interval in days"
                prop:value=move || interval.get()
                on:input=move |ev| set_interval.set(event_target_value(&ev))
            />
            <div class="plant-choices">{plant_choices}</div>
            <button type="submit">"Add reminder"</button>
        </form>
    }
}
