//! Garden Actions
//!
//! Tagged on `type` with the wire names (`"ADD_GARDEN"`, `"PATCH_CELLS"`, ...)
//! so actions can be logged, replayed and decoded from JSON. Decoding an
//! unknown type or a known type without its required fields is an error.

use serde::{Deserialize, Serialize};

use crate::domain::{GardenPatch, Grid, Notification, NotificationPatch};
use crate::error::ReducerError;
use crate::format::{GardenSource, NotificationSource};
use crate::raw::{RawGarden, RawGardenLog};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GardenAction {
    /// Replace the whole state with freshly formatted gardens
    Populate { payload: Vec<RawGarden> },
    /// Insert at `garden_index`, or prepend when absent
    AddGarden {
        payload: GardenSource,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        garden_index: Option<usize>,
    },
    RemoveGarden { garden_index: usize },
    /// Shallow merge of the present patch fields
    UpdateGarden {
        garden_index: usize,
        payload: GardenPatch,
    },
    /// Overlay each log at its coordinates
    AddGardenLogs {
        garden_index: usize,
        payload: Vec<RawGardenLog>,
    },
    /// Replace the whole cell matrix
    PatchCells { garden_index: usize, payload: Grid },
    AddNotification {
        garden_index: usize,
        payload: NotificationSource,
    },
    RemoveNotification {
        garden_index: usize,
        notification_id: u32,
    },
    UpdateNotification {
        garden_index: usize,
        notification_id: u32,
        payload: NotificationPatch,
    },
    /// Replace every notification of a garden
    UpdateNotifications {
        garden_index: usize,
        payload: Vec<Notification>,
    },
}

impl GardenAction {
    /// Decode an action from its JSON form
    pub fn from_json(json: &str) -> Result<Self, ReducerError> {
        serde_json::from_str(json).map_err(|e| ReducerError::MalformedAction(e.to_string()))
    }

    /// Wire name of the action type
    pub fn kind(&self) -> &'static str {
        match self {
            GardenAction::Populate { .. } => "POPULATE",
            GardenAction::AddGarden { .. } => "ADD_GARDEN",
            GardenAction::RemoveGarden { .. } => "REMOVE_GARDEN",
            GardenAction::UpdateGarden { .. } => "UPDATE_GARDEN",
            GardenAction::AddGardenLogs { .. } => "ADD_GARDEN_LOGS",
            GardenAction::PatchCells { .. } => "PATCH_CELLS",
            GardenAction::AddNotification { .. } => "ADD_NOTIFICATION",
            GardenAction::RemoveNotification { .. } => "REMOVE_NOTIFICATION",
            GardenAction::UpdateNotification { .. } => "UPDATE_NOTIFICATION",
            GardenAction::UpdateNotifications { .. } => "UPDATE_NOTIFICATIONS",
        }
    }

    /// Garden the action targets, if it targets one
    pub fn garden_index(&self) -> Option<usize> {
        match self {
            GardenAction::Populate { .. } => None,
            GardenAction::AddGarden { garden_index, .. } => *garden_index,
            GardenAction::RemoveGarden { garden_index }
            | GardenAction::UpdateGarden { garden_index, .. }
            | GardenAction::AddGardenLogs { garden_index, .. }
            | GardenAction::PatchCells { garden_index, .. }
            | GardenAction::AddNotification { garden_index, .. }
            | GardenAction::RemoveNotification { garden_index, .. }
            | GardenAction::UpdateNotification { garden_index, .. }
            | GardenAction::UpdateNotifications { garden_index, .. } => Some(*garden_index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_wire_names() {
        let action = GardenAction::from_json(r#"{"type": "REMOVE_GARDEN", "garden_index": 2}"#).unwrap();
        assert_eq!(action, GardenAction::RemoveGarden { garden_index: 2 });
        assert_eq!(action.kind(), "REMOVE_GARDEN");
    }

    #[test]
    fn test_add_garden_index_is_optional() {
        let action = GardenAction::from_json(r#"{"type": "ADD_GARDEN", "payload": {"id": 4, "size_x": 1, "size_y": 1}}"#).unwrap();
        match action {
            GardenAction::AddGarden { payload: GardenSource::Raw(raw), garden_index: None } => {
                assert_eq!(raw.id, Some(4));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let err = GardenAction::from_json(r#"{"type": "FLUSH_ALL"}"#).unwrap_err();
        assert!(matches!(err, ReducerError::MalformedAction(_)));
    }

    #[test]
    fn test_missing_required_field_is_an_error() {
        let err = GardenAction::from_json(r#"{"type": "REMOVE_NOTIFICATION", "garden_index": 0}"#).unwrap_err();
        assert!(matches!(err, ReducerError::MalformedAction(msg) if msg.contains("notification_id")));
    }
}
