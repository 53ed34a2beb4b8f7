//! Garden State Reducer
//!
//! `reduce` is pure and synchronous. It never mutates the slice it is given:
//! the next state is built from a copy, and on error no state is produced.

use crate::domain::{position_by_id, Garden};
use crate::error::ReducerError;
use crate::format::{format_garden, format_garden_log, format_notification};

use super::validate::validate;
use super::GardenAction;

/// Compute the state that follows `action`
///
/// A missing state is treated as an empty collection, so only `POPULATE`
/// and `ADD_GARDEN` can succeed before population.
pub fn reduce(state: Option<&[Garden]>, action: &GardenAction) -> Result<Vec<Garden>, ReducerError> {
    validate(state, action)?;
    let mut next: Vec<Garden> = state.map(<[Garden]>::to_vec).unwrap_or_default();

    match action {
        GardenAction::Populate { payload } => {
            next = payload.iter().cloned().map(format_garden).collect();
        }
        GardenAction::AddGarden { payload, garden_index } => {
            let garden = format_garden(payload.clone());
            next.insert(garden_index.unwrap_or(0), garden);
        }
        GardenAction::RemoveGarden { garden_index } => {
            next.remove(*garden_index);
        }
        GardenAction::UpdateGarden { garden_index, payload } => {
            payload.apply_to(&mut next[*garden_index]);
        }
        GardenAction::AddGardenLogs { garden_index, payload } => {
            let garden = &mut next[*garden_index];
            for log in payload {
                let cell = format_garden_log(log.clone());
                let coord = cell.coord();
                garden.cells[coord.row][coord.col] = Some(cell);
            }
        }
        GardenAction::PatchCells { garden_index, payload } => {
            next[*garden_index].cells = payload.clone();
        }
        GardenAction::AddNotification { garden_index, payload } => {
            next[*garden_index]
                .notifications
                .push(format_notification(payload.clone()));
        }
        GardenAction::RemoveNotification {
            garden_index,
            notification_id,
        } => {
            next[*garden_index]
                .notifications
                .retain(|n| n.id != Some(*notification_id));
        }
        GardenAction::UpdateNotification {
            garden_index,
            notification_id,
            payload,
        } => {
            let notifications = &mut next[*garden_index].notifications;
            if let Some(position) = position_by_id(notifications, *notification_id) {
                payload.apply_to(&mut notifications[position]);
            }
        }
        GardenAction::UpdateNotifications { garden_index, payload } => {
            next[*garden_index].notifications = payload.clone();
        }
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cell, Coord, GardenPatch, Notification, NotificationPatch, PlantDetail};
    use crate::geometry::with_cells;
    use crate::raw::{RawGarden, RawGardenLog, RawNotification, RawPlant};

    fn oak() -> RawPlant {
        RawPlant {
            id: Some(1),
            common_name: Some("Oak".into()),
            family: Some("Fagaceae".into()),
            ..Default::default()
        }
    }

    fn log_at(row: usize, col: usize) -> RawGardenLog {
        RawGardenLog {
            x_coordinate: Some(col),
            y_coordinate: Some(row),
            plant_details: Some(oak()),
            ..Default::default()
        }
    }

    fn notification(id: u32) -> Notification {
        Notification {
            id: Some(id),
            name: format!("Reminder {id}"),
            interval: 7,
            kind: "water".into(),
            plant_names: vec![],
            subtype: None,
            next_due: None,
            instance_id: None,
            local_id: None,
        }
    }

    fn three_gardens() -> Vec<Garden> {
        (1..=3)
            .map(|id| {
                let mut g = Garden::placeholder(format!("G{id}"), 3, 3);
                g.id = Some(id);
                g
            })
            .collect()
    }

    fn assert_invariant(state: &[Garden]) {
        for garden in state {
            assert_eq!(garden.cells.len(), garden.size_y, "{}", garden.name);
            assert!(garden.cells.iter().all(|row| row.len() == garden.size_x), "{}", garden.name);
        }
    }

    #[test]
    fn test_populate_formats_gardens() {
        let raw = RawGarden {
            size_x: Some(2),
            size_y: Some(1),
            garden_logs: vec![log_at(0, 0)],
            ..Default::default()
        };
        let state = reduce(None, &GardenAction::Populate { payload: vec![raw] }).unwrap();

        let expected = Cell {
            id: None,
            plant_detail: PlantDetail { id: 1, name: "Oak".into(), family: Some("Fagaceae".into()) },
            x_coordinate: 0,
            y_coordinate: 0,
            planted_date: None,
        };
        assert_eq!(state[0].cells, vec![vec![Some(expected), None]]);
        assert_invariant(&state);
    }

    #[test]
    fn test_populate_formats_embedded_notifications() {
        let raw = RawGarden {
            id: Some(1),
            notifications: vec![RawNotification {
                id: Some(8),
                name: Some("Water".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let state = reduce(None, &GardenAction::Populate { payload: vec![raw] }).unwrap();
        assert_eq!(state[0].notifications[0].id, Some(8));
        assert_eq!(state[0].notifications[0].name, "Water");
    }

    #[test]
    fn test_add_garden_prepends_or_splices() {
        let state = three_gardens();
        let prepended = reduce(
            Some(&state),
            &GardenAction::AddGarden {
                payload: Garden::placeholder("New", 1, 1).into(),
                garden_index: None,
            },
        )
        .unwrap();
        assert_eq!(prepended[0].name, "New");
        assert_eq!(prepended.len(), 4);

        let spliced = reduce(
            Some(&state),
            &GardenAction::AddGarden {
                payload: Garden::placeholder("Mid", 1, 1).into(),
                garden_index: Some(2),
            },
        )
        .unwrap();
        let names: Vec<&str> = spliced.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["G1", "G2", "Mid", "G3"]);
    }

    #[test]
    fn test_remove_garden_out_of_bounds_fails() {
        let state = three_gardens();
        let err = reduce(Some(&state), &GardenAction::RemoveGarden { garden_index: 5 }).unwrap_err();
        assert_eq!(err, ReducerError::GardenIndexOutOfBounds { index: 5, len: 3 });
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn test_update_garden_merges() {
        let state = three_gardens();
        let next = reduce(
            Some(&state),
            &GardenAction::UpdateGarden {
                garden_index: 1,
                payload: GardenPatch::renamed("Herbs"),
            },
        )
        .unwrap();
        assert_eq!(next[1].name, "Herbs");
        assert_eq!(next[1].id, Some(2));
        assert_eq!(state[1].name, "G2");
    }

    #[test]
    fn test_batch_logs_in_one_dispatch() {
        let state = three_gardens();
        let next = reduce(
            Some(&state),
            &GardenAction::AddGardenLogs {
                garden_index: 0,
                payload: vec![log_at(0, 0), log_at(2, 1), log_at(1, 2)],
            },
        )
        .unwrap();
        assert_eq!(next[0].planted().count(), 3);
        assert!(state[0].planted().next().is_none());
        assert_invariant(&next);
    }

    #[test]
    fn test_place_then_patch_restores_grid() {
        let state = three_gardens();
        let placed = reduce(
            Some(&state),
            &GardenAction::AddGardenLogs { garden_index: 0, payload: vec![log_at(1, 1)] },
        )
        .unwrap();
        assert!(placed[0].cell(Coord::new(1, 1)).is_some());

        let cleared = with_cells(&placed[0].cells, [(Coord::new(1, 1), None)]);
        let removed = reduce(
            Some(&placed),
            &GardenAction::PatchCells { garden_index: 0, payload: cleared },
        )
        .unwrap();
        assert_eq!(removed[0].cells, state[0].cells);
    }

    #[test]
    fn test_patch_cells_rejects_wrong_shape() {
        let state = three_gardens();
        let err = reduce(
            Some(&state),
            &GardenAction::PatchCells { garden_index: 0, payload: vec![vec![None; 3]; 2] },
        )
        .unwrap_err();
        assert!(matches!(err, ReducerError::DimensionMismatch { garden_index: 0, .. }));
    }

    #[test]
    fn test_notification_actions() {
        let state = three_gardens();
        let added = reduce(
            Some(&state),
            &GardenAction::AddNotification { garden_index: 2, payload: notification(5).into() },
        )
        .unwrap();
        let added = reduce(
            Some(&added),
            &GardenAction::AddNotification { garden_index: 2, payload: notification(6).into() },
        )
        .unwrap();
        assert_eq!(added[2].notifications.len(), 2);

        let updated = reduce(
            Some(&added),
            &GardenAction::UpdateNotification {
                garden_index: 2,
                notification_id: 6,
                payload: NotificationPatch { interval: Some(1), ..Default::default() },
            },
        )
        .unwrap();
        assert_eq!(updated[2].notifications[1].interval, 1);
        assert_eq!(updated[2].notifications[0].interval, 7);

        let removed = reduce(
            Some(&updated),
            &GardenAction::RemoveNotification { garden_index: 2, notification_id: 5 },
        )
        .unwrap();
        let ids: Vec<Option<u32>> = removed[2].notifications.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![Some(6)]);

        let replaced = reduce(
            Some(&removed),
            &GardenAction::UpdateNotifications { garden_index: 2, payload: vec![] },
        )
        .unwrap();
        assert!(replaced[2].notifications.is_empty());
    }

    #[test]
    fn test_actions_before_populate() {
        let err = reduce(None, &GardenAction::PatchCells { garden_index: 0, payload: vec![] }).unwrap_err();
        assert_eq!(err, ReducerError::GardenIndexOutOfBounds { index: 0, len: 0 });
    }

    #[test]
    fn test_invariant_holds_across_a_session() {
        let mut state = reduce(
            None,
            &GardenAction::Populate {
                payload: vec![RawGarden { id: Some(1), size_x: Some(2), size_y: Some(2), ..Default::default() }],
            },
        )
        .unwrap();
        let actions = vec![
            GardenAction::AddGarden { payload: Garden::placeholder("Second", 4, 1).into(), garden_index: Some(1) },
            GardenAction::AddGardenLogs { garden_index: 1, payload: vec![log_at(0, 3)] },
            GardenAction::UpdateGarden {
                garden_index: 0,
                payload: GardenPatch::resized(3, 2, vec![vec![None; 3]; 2]),
            },
            GardenAction::RemoveGarden { garden_index: 0 },
        ];
        for action in &actions {
            state = reduce(Some(&state), action).unwrap();
            assert_invariant(&state);
        }
        assert_eq!(state.len(), 1);
        assert_eq!(state[0].name, "Second");
    }
}
