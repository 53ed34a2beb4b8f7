//! UI Components
//!
//! Reusable Leptos components.

mod delete_confirm_button;
mod garden_grid;
mod garden_tab_bar;
mod new_garden_form;
mod notice_banner;
mod notification_list;
mod plant_palette;
mod resize_controls;

pub use delete_confirm_button::DeleteConfirmButton;
pub use garden_grid::GardenGrid;
pub use garden_tab_bar::GardenTabBar;
pub use new_garden_form::NewGardenForm;
pub use notice_banner::NoticeBanner;
pub use notification_list::NotificationList;
pub use plant_palette::PlantPalette;
pub use resize_controls::ResizeControls;
