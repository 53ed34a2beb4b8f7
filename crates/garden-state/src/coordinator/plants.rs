//! Batch Plant Placement and Removal
//!
//! A batch is applied in one dispatch, then persisted one cell at a time.
//! Each confirmed cell is reconciled as soon as the server answers, so the
//! client always matches what the server has committed. When cell `k`
//! fails, cells before it stay, cells from `k` on are restored and the
//! batch stops.

use chrono::NaiveDate;

use crate::domain::{position_by_key, Cell, Coord, Entity, Garden, GardenKey, GardenPatch, PlantDetail};
use crate::error::{MutationError, RemoteError};
use crate::format::parse_date;
use crate::geometry::{partition_selection, with_cells};
use crate::raw::RawGardenLog;
use crate::reducer::GardenAction;
use crate::repository::{GardenRepository, NewGardenLog};

use super::{Coordinator, Idempotency, MutationPhase, Snapshot};

/// Outcome of a batch operation, cell by cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Persisted (or, for unsaved cells, removed locally)
    pub confirmed: Vec<Coord>,
    /// Out of bounds, or not applicable to the cell's contents
    pub skipped: Vec<Coord>,
    /// Put back after the batch failed
    pub restored: Vec<Coord>,
    /// The failure that stopped the batch
    pub error: Option<RemoteError>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Follow-up for one confirmed placement: server id and running total
///
/// The log only lands on our own placeholder; a slot that was resized away
/// or taken meanwhile is left alone.
fn reconcile_placement(
    key: GardenKey,
    plant: &PlantDetail,
    coord: Coord,
    planted: NaiveDate,
    raw: &RawGardenLog,
    state: &[Garden],
) -> Vec<GardenAction> {
    let Some(index) = position_by_key(state, key) else {
        return Vec::new();
    };
    let garden = &state[index];
    let mut actions = Vec::with_capacity(2);
    let ours = garden.contains(coord) && garden.cell(coord).is_some_and(|cell| !cell.is_persisted());
    if ours {
        let planted = raw.planted_date.as_deref().and_then(parse_date).unwrap_or(planted);
        actions.push(GardenAction::AddGardenLogs {
            garden_index: index,
            payload: vec![RawGardenLog::for_plant(raw.id, plant, coord, Some(planted))],
        });
    } else {
        log::warn!("{} of {} changed before placement was confirmed", coord, key);
    }
    actions.push(GardenAction::UpdateGarden {
        garden_index: index,
        payload: GardenPatch::total_plants(garden.total_plants + 1),
    });
    actions
}

fn reconcile_removal(key: GardenKey, state: &[Garden]) -> Vec<GardenAction> {
    position_by_key(state, key)
        .map(|index| GardenAction::UpdateGarden {
            garden_index: index,
            payload: GardenPatch::total_plants(state[index].total_plants.saturating_sub(1)),
        })
        .into_iter()
        .collect()
}

impl<R: GardenRepository> Coordinator<R> {
    /// Plant `plant` in every empty selected cell
    ///
    /// Out-of-bounds and occupied cells are skipped. A remote failure is
    /// reported in the returned [`BatchReport`], not as an `Err`.
    pub async fn place_plant(
        &self,
        index: usize,
        plant: &PlantDetail,
        coords: impl IntoIterator<Item = Coord>,
        planted: NaiveDate,
    ) -> Result<BatchReport, MutationError> {
        let garden = self.garden_at(index)?;
        let garden_id = match garden.id {
            Some(id) => id,
            None => return self.reject(MutationError::Unsaved { garden_index: index }),
        };
        let key = GardenKey::Saved(garden_id);

        let partition = partition_selection(&garden, coords);
        let mut report = BatchReport {
            skipped: partition.out_of_bounds,
            ..Default::default()
        };
        let (targets, occupied): (Vec<Coord>, Vec<Coord>) =
            partition.in_bounds.into_iter().partition(|c| garden.cell(*c).is_none());
        for coord in &occupied {
            log::warn!("skipping occupied cell {}", coord);
        }
        report.skipped.extend(occupied);
        if targets.is_empty() {
            return Ok(report);
        }

        let placeholders = targets
            .iter()
            .map(|c| RawGardenLog::for_plant(None, plant, *c, Some(planted)))
            .collect();
        if let Err(e) = self.store.dispatch(GardenAction::AddGardenLogs {
            garden_index: index,
            payload: placeholders,
        }) {
            return self.reject(e);
        }
        log::debug!("[place plant] {} for {} cell(s)", MutationPhase::OptimisticallyApplied, targets.len());

        let repo = self.repo.as_ref();
        for (k, coord) in targets.iter().copied().enumerate() {
            let remaining = &targets[k..];
            let snapshot = Snapshot::Cells {
                key,
                cells: remaining.iter().map(|c| (*c, None)).collect(),
            };
            let body = NewGardenLog::planting(garden_id, plant, coord, planted);
            let body = &body;
            let result = self
                .run_optimistic_mutation(
                    "place plant",
                    Idempotency::SendOnce,
                    snapshot,
                    Vec::new(),
                    move || repo.create_garden_log(body),
                    |raw, state| reconcile_placement(key, plant, coord, planted, raw, state),
                )
                .await;
            match result {
                Ok(_) => report.confirmed.push(coord),
                Err(MutationError::Remote(e)) => {
                    report.restored = remaining.to_vec();
                    report.error = Some(e);
                    break;
                }
                Err(other) => return Err(other),
            }
        }
        Ok(report)
    }

    /// Clear every planted selected cell
    ///
    /// Empty and out-of-bounds cells are skipped; cells without a server id
    /// are removed locally only.
    pub async fn remove_plants(
        &self,
        index: usize,
        coords: impl IntoIterator<Item = Coord>,
    ) -> Result<BatchReport, MutationError> {
        let garden = self.garden_at(index)?;
        let Some(key) = garden.key() else {
            return self.reject(MutationError::Unsaved { garden_index: index });
        };
        let partition = partition_selection(&garden, coords);
        let mut report = BatchReport {
            skipped: partition.out_of_bounds,
            ..Default::default()
        };

        let mut targets: Vec<(Coord, Cell)> = Vec::new();
        for coord in partition.in_bounds {
            match garden.cell(coord) {
                Some(cell) => targets.push((coord, cell.clone())),
                None => report.skipped.push(coord),
            }
        }
        if targets.is_empty() {
            return Ok(report);
        }

        let cleared = with_cells(&garden.cells, targets.iter().map(|(c, _)| (*c, None)));
        if let Err(e) = self.store.dispatch(GardenAction::PatchCells {
            garden_index: index,
            payload: cleared,
        }) {
            return self.reject(e);
        }
        log::debug!("[remove plants] {} for {} cell(s)", MutationPhase::OptimisticallyApplied, targets.len());

        let repo = self.repo.as_ref();
        for (k, (coord, cell)) in targets.iter().enumerate() {
            let Some(log_id) = cell.id else {
                report.confirmed.push(*coord);
                continue;
            };
            let remaining = &targets[k..];
            let snapshot = Snapshot::Cells {
                key,
                cells: remaining.iter().map(|(c, cell)| (*c, Some(cell.clone()))).collect(),
            };
            let result = self
                .run_optimistic_mutation(
                    "remove plant",
                    Idempotency::Idempotent,
                    snapshot,
                    Vec::new(),
                    move || repo.delete_garden_log(log_id),
                    |_, state| reconcile_removal(key, state),
                )
                .await;
            match result {
                Ok(()) => report.confirmed.push(*coord),
                Err(MutationError::Remote(e)) => {
                    report.restored = remaining.iter().map(|(c, _)| *c).collect();
                    report.error = Some(e);
                    break;
                }
                Err(other) => return Err(other),
            }
        }
        Ok(report)
    }
}
