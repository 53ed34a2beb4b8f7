//! Action Validation
//!
//! Bounds and required-field checks shared by [`validate`] and the reducer.
//! Callers run `validate` before dispatch in development builds to get a
//! descriptive error at the call site.

use crate::domain::{grid_matches, position_by_id, Garden, Grid};
use crate::error::ReducerError;
use crate::format::{format_garden, format_garden_log};

use super::GardenAction;

pub(super) fn check_index(gardens: &[Garden], index: usize) -> Result<(), ReducerError> {
    if index < gardens.len() {
        Ok(())
    } else {
        Err(ReducerError::GardenIndexOutOfBounds {
            index,
            len: gardens.len(),
        })
    }
}

pub(super) fn check_grid(garden_index: usize, grid: &Grid, size_x: usize, size_y: usize) -> Result<(), ReducerError> {
    if grid_matches(grid, size_x, size_y) {
        Ok(())
    } else {
        Err(ReducerError::DimensionMismatch {
            garden_index,
            size_x,
            size_y,
        })
    }
}

fn missing(action: &GardenAction, field: &'static str) -> ReducerError {
    ReducerError::MissingField {
        action: action.kind(),
        field,
    }
}

/// Check `action` against `state` without producing a new state
pub fn validate(state: Option<&[Garden]>, action: &GardenAction) -> Result<(), ReducerError> {
    let gardens = state.unwrap_or(&[]);

    match action {
        GardenAction::Populate { .. } => Ok(()),
        GardenAction::AddGarden { payload, garden_index } => {
            let index = garden_index.unwrap_or(0);
            // insertion may append
            if index > gardens.len() {
                return Err(ReducerError::GardenIndexOutOfBounds {
                    index,
                    len: gardens.len(),
                });
            }
            let garden = format_garden(payload.clone());
            check_grid(index, &garden.cells, garden.size_x, garden.size_y)
        }
        GardenAction::RemoveGarden { garden_index } => check_index(gardens, *garden_index),
        GardenAction::UpdateGarden { garden_index, payload } => {
            check_index(gardens, *garden_index)?;
            if payload.is_empty() {
                return Err(missing(action, "payload"));
            }
            let garden = &gardens[*garden_index];
            let (size_x, size_y) = payload.resulting_size(garden);
            let cells = payload.cells.as_ref().unwrap_or(&garden.cells);
            check_grid(*garden_index, cells, size_x, size_y)
        }
        GardenAction::AddGardenLogs { garden_index, payload } => {
            check_index(gardens, *garden_index)?;
            if payload.is_empty() {
                return Err(missing(action, "payload"));
            }
            let garden = &gardens[*garden_index];
            for log in payload {
                let coord = format_garden_log(log.clone()).coord();
                if !garden.contains(coord) {
                    return Err(ReducerError::CellOutOfBounds {
                        garden_index: *garden_index,
                        coord,
                        size_x: garden.size_x,
                        size_y: garden.size_y,
                    });
                }
            }
            Ok(())
        }
        GardenAction::PatchCells { garden_index, payload } => {
            check_index(gardens, *garden_index)?;
            let garden = &gardens[*garden_index];
            check_grid(*garden_index, payload, garden.size_x, garden.size_y)
        }
        GardenAction::AddNotification { garden_index, .. }
        | GardenAction::RemoveNotification { garden_index, .. }
        | GardenAction::UpdateNotifications { garden_index, .. } => check_index(gardens, *garden_index),
        GardenAction::UpdateNotification {
            garden_index,
            notification_id,
            payload,
        } => {
            check_index(gardens, *garden_index)?;
            if payload.is_empty() {
                return Err(missing(action, "payload"));
            }
            if position_by_id(&gardens[*garden_index].notifications, *notification_id).is_some() {
                Ok(())
            } else {
                Err(ReducerError::UnknownNotification {
                    garden_index: *garden_index,
                    notification_id: *notification_id,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GardenPatch, NotificationPatch};
    use crate::raw::RawGardenLog;

    fn state() -> Vec<Garden> {
        vec![Garden::placeholder("A", 2, 2), Garden::placeholder("B", 1, 1)]
    }

    #[test]
    fn test_index_bounds() {
        let gardens = state();
        assert!(validate(Some(&gardens), &GardenAction::RemoveGarden { garden_index: 1 }).is_ok());
        assert_eq!(
            validate(Some(&gardens), &GardenAction::RemoveGarden { garden_index: 2 }),
            Err(ReducerError::GardenIndexOutOfBounds { index: 2, len: 2 })
        );
        assert!(validate(None, &GardenAction::RemoveGarden { garden_index: 0 }).is_err());
    }

    #[test]
    fn test_size_change_needs_matching_cells() {
        let gardens = state();
        let action = GardenAction::UpdateGarden {
            garden_index: 0,
            payload: GardenPatch {
                size_x: Some(3),
                ..Default::default()
            },
        };
        assert!(matches!(
            validate(Some(&gardens), &action),
            Err(ReducerError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_payloads_are_missing_fields() {
        let gardens = state();
        let empty_update = GardenAction::UpdateGarden {
            garden_index: 0,
            payload: GardenPatch::default(),
        };
        assert_eq!(
            validate(Some(&gardens), &empty_update),
            Err(ReducerError::MissingField { action: "UPDATE_GARDEN", field: "payload" })
        );
        let no_logs = GardenAction::AddGardenLogs { garden_index: 0, payload: vec![] };
        assert!(matches!(validate(Some(&gardens), &no_logs), Err(ReducerError::MissingField { .. })));
    }

    #[test]
    fn test_log_outside_grid() {
        let gardens = state();
        let action = GardenAction::AddGardenLogs {
            garden_index: 1,
            payload: vec![RawGardenLog {
                x_coordinate: Some(1),
                y_coordinate: Some(0),
                ..Default::default()
            }],
        };
        assert!(matches!(
            validate(Some(&gardens), &action),
            Err(ReducerError::CellOutOfBounds { garden_index: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_notification() {
        let gardens = state();
        let action = GardenAction::UpdateNotification {
            garden_index: 0,
            notification_id: 99,
            payload: NotificationPatch {
                interval: Some(2),
                ..Default::default()
            },
        };
        assert_eq!(
            validate(Some(&gardens), &action),
            Err(ReducerError::UnknownNotification { garden_index: 0, notification_id: 99 })
        );
    }
}
