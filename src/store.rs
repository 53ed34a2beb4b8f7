//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The garden
//! collection itself is owned by the core `GardenStore`; this store mirrors
//! it for rendering and holds the UI-only state around it.

use garden_state::{follow_garden, Coord, FollowedGarden, Garden, GardenStore, Notice, PlantDetail, Selection};
use leptos::prelude::*;
use reactive_stores::Store;

#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Mirror of the core store, replaced after every dispatch
    pub gardens: Vec<Garden>,
    /// Index of the garden shown in the grid
    pub selected_garden: usize,
    /// Cells picked for the next batch operation
    pub selection: Selection,
    /// Plant catalog for the palette
    pub catalog: Vec<PlantDetail>,
    pub in_flight: usize,
    pub notices: Vec<Notice>,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

/// Mirror every core dispatch into the reactive store
///
/// The grid keeps showing the same garden while others are added or
/// removed; if it disappears the neighbour is shown with no cells selected.
pub fn connect_garden_store(store: AppStore, core: &GardenStore) {
    core.subscribe(move |gardens| {
        let selected = store.selected_garden().get_untracked();
        let followed = store
            .gardens()
            .with_untracked(|previous| follow_garden(previous, gardens, selected));
        store.gardens().set(gardens.to_vec());
        match followed {
            FollowedGarden::Kept(index) if index != selected => store.selected_garden().set(index),
            FollowedGarden::Kept(_) => {}
            FollowedGarden::Lost(index) => {
                log::debug!("garden {} is gone, showing {}", selected, index);
                store_select_garden(&store, index);
            }
        }
    });
}

// ========================
// Store Helper Functions
// ========================

/// The garden shown in the grid, with its index
pub fn selected_garden(store: &AppStore) -> Option<(usize, Garden)> {
    let index = store.selected_garden().get();
    store.gardens().with(|gardens| gardens.get(index).cloned().map(|g| (index, g)))
}

/// Switch gardens; the selection never carries over
pub fn store_select_garden(store: &AppStore, index: usize) {
    store.selected_garden().set(index);
    store.selection().write().clear();
}

pub fn store_toggle_cell(store: &AppStore, coord: Coord) {
    store.selection().write().toggle(coord);
}

/// Copy and clear the selection for a batch operation
pub fn store_take_selection(store: &AppStore) -> Vec<Coord> {
    store.selection().write().take()
}

pub fn store_dismiss_notice(store: &AppStore, index: usize) {
    let notices_field = store.notices();
    let mut notices = notices_field.write();
    if index < notices.len() {
        notices.remove(index);
    }
}
