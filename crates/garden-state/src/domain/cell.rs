//! Cell (garden log) and embedded plant detail

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::coord::Coord;
use super::entity::Entity;

/// Read-only copy of catalog plant data embedded in a cell
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlantDetail {
    pub id: u32,
    pub name: String,
    pub family: Option<String>,
}

/// One planted instance at a grid position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Server-assigned log id (None while the placement is unconfirmed)
    pub id: Option<u32>,
    pub plant_detail: PlantDetail,
    pub x_coordinate: usize,
    pub y_coordinate: usize,
    pub planted_date: Option<NaiveDate>,
}

impl Cell {
    /// Optimistic cell for a plant that has not been saved yet
    pub fn placeholder(plant: &PlantDetail, coord: Coord, planted_date: NaiveDate) -> Self {
        Self {
            id: None,
            plant_detail: plant.clone(),
            x_coordinate: coord.col,
            y_coordinate: coord.row,
            planted_date: Some(planted_date),
        }
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.y_coordinate, self.x_coordinate)
    }
}

impl Entity for Cell {
    type Id = u32;

    fn id(&self) -> Option<u32> {
        self.id
    }
}

impl Entity for PlantDetail {
    type Id = u32;

    fn id(&self) -> Option<u32> {
        Some(self.id)
    }
}
