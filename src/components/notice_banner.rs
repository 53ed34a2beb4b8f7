//! Notice Banner Component
//!
//! User-visible notices raised by failed mutations, plus a saving indicator.

use garden_state::NoticeLevel;
use leptos::prelude::*;

use crate::store::{store_dismiss_notice, use_app_store, AppStateStoreFields};

#[component]
pub fn NoticeBanner() -> impl IntoView {
    let store = use_app_store();

    let notices = move || store.notices().get().into_iter().enumerate().collect::<Vec<_>>();

    view! {
        <div class="notice-banner">
            <Show when=move || { store.in_flight().get() > 0 }>
                <span class="saving-indicator">
                    {move || format!("Saving… ({})", store.in_flight().get())}
                </span>
            </Show>
            <For
                each=notices
                key=|(i, notice)| (*i, notice.message.clone())
                children=move |(index, notice)| {
                    let class = match notice.level {
                        NoticeLevel::Info => "notice info",
                        NoticeLevel::Error => "notice error",
                    };
                    view! {
                        <div class=class>
                            <span class="notice-message">{notice.message}</span>
                            <button
                                class="notice-dismiss"
                                title="Dismiss"
                                on:click=move |_| store_dismiss_notice(&store, index)
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
