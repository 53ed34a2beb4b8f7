//! Raw API Payloads
//!
//! Response shapes as the backend sends them. Every field is optional and
//! several names vary between endpoints (`common_name` vs `name`,
//! `plant_details` vs `plant_detail` vs a nested `plant`). Only `format`
//! reads these types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Coord, PlantDetail};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPlant {
    pub id: Option<u32>,
    pub common_name: Option<String>,
    pub name: Option<String>,
    pub family: Option<String>,
    /// Some endpoints wrap the catalog entry one level deeper
    pub plant_detail: Option<Box<RawPlant>>,
}

impl From<&PlantDetail> for RawPlant {
    fn from(plant: &PlantDetail) -> Self {
        Self {
            id: Some(plant.id),
            common_name: Some(plant.name.clone()),
            family: plant.family.clone(),
            ..Self::default()
        }
    }
}

/// `plant` is either a bare catalog id or an embedded object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPlantRef {
    Id(u32),
    Detail(RawPlant),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGardenLog {
    pub id: Option<u32>,
    pub garden: Option<u32>,
    pub plant: Option<RawPlantRef>,
    pub plant_details: Option<RawPlant>,
    pub plant_detail: Option<RawPlant>,
    pub x_coordinate: Option<usize>,
    pub y_coordinate: Option<usize>,
    pub planted_date: Option<String>,
    pub notes: Option<String>,
    pub health_status: Option<String>,
}

impl RawGardenLog {
    /// Log describing `plant` at `coord`, used for optimistic placement and
    /// for reconciling a server response that omits the plant details
    pub fn for_plant(id: Option<u32>, plant: &PlantDetail, coord: Coord, planted: Option<NaiveDate>) -> Self {
        Self {
            id,
            plant_details: Some(RawPlant::from(plant)),
            x_coordinate: Some(coord.col),
            y_coordinate: Some(coord.row),
            planted_date: planted.map(|d| d.format("%Y-%m-%d").to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawNotification {
    pub id: Option<u32>,
    /// Owning garden id, used by the populate join
    pub garden: Option<u32>,
    pub name: Option<String>,
    pub interval: Option<u32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub subtype: Option<String>,
    pub plant_names: Vec<String>,
    pub plants: Vec<RawPlant>,
    pub next_due: Option<String>,
    #[serde(alias = "next_instance")]
    pub instance_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGarden {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub size_x: Option<usize>,
    pub size_y: Option<usize>,
    pub garden_logs: Vec<RawGardenLog>,
    pub notifications: Vec<RawNotification>,
    pub total_plants: Option<u32>,
    pub created_at: Option<String>,
}
