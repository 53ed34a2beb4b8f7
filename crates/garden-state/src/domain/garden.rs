//! Garden Entity
//!
//! A rectangular grid of plantable cells plus its maintenance notifications.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::coord::Coord;
use super::entity::Entity;
use super::notification::Notification;

/// Row-major cell matrix: `cells[row][col]`
pub type Grid = Vec<Vec<Option<Cell>>>;

/// Build a `size_y` by `size_x` grid of empty cells
pub fn empty_grid(size_x: usize, size_y: usize) -> Grid {
    vec![vec![None; size_x]; size_y]
}

/// Whether every row of `grid` matches the declared dimensions
pub fn grid_matches(grid: &Grid, size_x: usize, size_y: usize) -> bool {
    grid.len() == size_y && grid.iter().all(|row| row.len() == size_x)
}

/// A user-owned garden
///
/// Invariant: `cells.len() == size_y` and every row has `size_x` slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Garden {
    /// Server id (None for an optimistic garden awaiting creation)
    pub id: Option<u32>,
    pub name: String,
    pub size_x: usize,
    pub size_y: usize,
    pub cells: Grid,
    pub notifications: Vec<Notification>,
    pub total_plants: u32,
    pub created_at: Option<DateTime<Utc>>,
    /// Client token of an optimistic garden; kept after confirmation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<u64>,
}

/// Identity of a garden that survives reordering of the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GardenKey {
    /// Server id
    Saved(u32),
    /// Client token of a garden the server has not confirmed yet
    Local(u64),
}

impl fmt::Display for GardenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GardenKey::Saved(id) => write!(f, "garden {id}"),
            GardenKey::Local(token) => write!(f, "unsaved garden #{token}"),
        }
    }
}

/// Current position of the garden identified by `key`
pub fn position_by_key(gardens: &[Garden], key: GardenKey) -> Option<usize> {
    gardens.iter().position(|g| g.has_key(key))
}

impl Garden {
    /// Optimistic garden shown while the create request is in flight
    pub fn placeholder(name: impl Into<String>, size_x: usize, size_y: usize) -> Self {
        Self {
            id: None,
            name: name.into(),
            size_x,
            size_y,
            cells: empty_grid(size_x, size_y),
            notifications: Vec::new(),
            total_plants: 0,
            created_at: None,
            local_id: None,
        }
    }

    /// Tag an optimistic garden with a client token
    pub fn with_local_id(mut self, token: u64) -> Self {
        self.local_id = Some(token);
        self
    }

    /// Server id when saved, client token otherwise
    pub fn key(&self) -> Option<GardenKey> {
        self.id.map(GardenKey::Saved).or(self.local_id.map(GardenKey::Local))
    }

    pub fn has_key(&self, key: GardenKey) -> bool {
        match key {
            GardenKey::Saved(id) => self.id == Some(id),
            GardenKey::Local(token) => self.local_id == Some(token),
        }
    }

    pub fn has_consistent_dimensions(&self) -> bool {
        grid_matches(&self.cells, self.size_x, self.size_y)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.within(self.size_x, self.size_y)
    }

    /// Planted cell at `coord`, if any
    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.cells
            .get(coord.row)
            .and_then(|row| row.get(coord.col))
            .and_then(Option::as_ref)
    }

    /// Iterate over every planted cell with its position
    pub fn planted(&self) -> impl Iterator<Item = (Coord, &Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, slot)| slot.as_ref().map(|cell| (Coord::new(r, c), cell)))
        })
    }
}

impl Entity for Garden {
    type Id = u32;

    fn id(&self) -> Option<u32> {
        self.id
    }
}

/// Shallow merge applied by `UPDATE_GARDEN`
///
/// Only present fields are written, so a patch never clears a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenPatch {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub size_x: Option<usize>,
    pub size_y: Option<usize>,
    pub cells: Option<Grid>,
    pub notifications: Option<Vec<Notification>>,
    pub total_plants: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
}

impl GardenPatch {
    /// Patch carrying the server-owned fields of a confirmed garden
    pub fn confirmed(server: &Garden) -> Self {
        Self {
            id: server.id,
            name: Some(server.name.clone()),
            total_plants: Some(server.total_plants),
            created_at: server.created_at,
            ..Self::default()
        }
    }

    pub fn resized(size_x: usize, size_y: usize, cells: Grid) -> Self {
        Self {
            size_x: Some(size_x),
            size_y: Some(size_y),
            cells: Some(cells),
            ..Self::default()
        }
    }

    pub fn renamed(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn total_plants(total: u32) -> Self {
        Self {
            total_plants: Some(total),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Size the garden would have after this patch
    pub fn resulting_size(&self, garden: &Garden) -> (usize, usize) {
        (
            self.size_x.unwrap_or(garden.size_x),
            self.size_y.unwrap_or(garden.size_y),
        )
    }

    pub fn apply_to(&self, garden: &mut Garden) {
        if let Some(id) = self.id {
            garden.id = Some(id);
        }
        if let Some(name) = &self.name {
            garden.name = name.clone();
        }
        if let Some(size_x) = self.size_x {
            garden.size_x = size_x;
        }
        if let Some(size_y) = self.size_y {
            garden.size_y = size_y;
        }
        if let Some(cells) = &self.cells {
            garden.cells = cells.clone();
        }
        if let Some(notifications) = &self.notifications {
            garden.notifications = notifications.clone();
        }
        if let Some(total) = self.total_plants {
            garden.total_plants = total;
        }
        if let Some(created_at) = self.created_at {
            garden.created_at = Some(created_at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlantDetail;

    fn planted(row: usize, col: usize) -> Cell {
        Cell {
            id: Some(9),
            plant_detail: PlantDetail { id: 1, name: "Basil".into(), family: None },
            x_coordinate: col,
            y_coordinate: row,
            planted_date: None,
        }
    }

    #[test]
    fn test_placeholder_has_empty_grid() {
        let garden = Garden::placeholder("Herbs", 3, 2);
        assert!(garden.id.is_none());
        assert_eq!(garden.cells.len(), 2);
        assert!(garden.cells.iter().all(|row| row.len() == 3));
        assert!(garden.has_consistent_dimensions());
    }

    #[test]
    fn test_planted_iterates_occupied_cells() {
        let mut garden = Garden::placeholder("Herbs", 2, 2);
        garden.cells[1][0] = Some(planted(1, 0));
        let found: Vec<Coord> = garden.planted().map(|(c, _)| c).collect();
        assert_eq!(found, vec![Coord::new(1, 0)]);
        assert!(garden.cell(Coord::new(1, 0)).is_some());
        assert!(garden.cell(Coord::new(5, 5)).is_none());
    }

    #[test]
    fn test_patch_touches_only_present_fields() {
        let mut original = Garden::placeholder("Herbs", 2, 1);
        original.cells[0][1] = Some(planted(0, 1));
        original.total_plants = 1;

        let mut changed = original.clone();
        GardenPatch::renamed("Veg").apply_to(&mut changed);
        assert_eq!(changed.name, "Veg");
        assert_eq!(changed.cells, original.cells);
        assert_eq!(changed.total_plants, 1);
    }

    #[test]
    fn test_keys_prefer_server_id() {
        let mut garden = Garden::placeholder("Herbs", 1, 1).with_local_id(3);
        assert_eq!(garden.key(), Some(GardenKey::Local(3)));
        assert_eq!(Garden::placeholder("Bare", 1, 1).key(), None);

        garden.id = Some(12);
        assert_eq!(garden.key(), Some(GardenKey::Saved(12)));
        assert!(garden.has_key(GardenKey::Local(3)));

        let gardens = vec![Garden::placeholder("A", 1, 1), garden];
        assert_eq!(position_by_key(&gardens, GardenKey::Saved(12)), Some(1));
        assert_eq!(position_by_key(&gardens, GardenKey::Saved(4)), None);
    }

    #[test]
    fn test_empty_patch() {
        assert!(GardenPatch::default().is_empty());
        assert!(!GardenPatch::renamed("x").is_empty());
    }
}
