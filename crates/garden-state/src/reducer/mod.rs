//! Garden State Reducer
//!
//! Pure transitions over the ordered garden collection:
//! - action: the action vocabulary and its wire form
//! - validate: bounds and required-field checks
//! - reduce: the state transition itself

mod action;
mod reduce;
mod validate;

pub use action::GardenAction;
pub use reduce::reduce;
pub use validate::validate;
