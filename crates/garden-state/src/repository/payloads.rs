//! Request Bodies
//!
//! JSON bodies sent to the garden backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Coord, PlantDetail};

// ========================
// Garden Bodies
// ========================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGarden {
    pub name: String,
    pub size_x: usize,
    pub size_y: usize,
}

/// `PATCH` body; absent fields are left alone by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_x: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_y: Option<usize>,
}

impl GardenUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn size(size_x: usize, size_y: usize) -> Self {
        Self {
            size_x: Some(size_x),
            size_y: Some(size_y),
            ..Default::default()
        }
    }
}

// ========================
// Garden Log Bodies
// ========================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGardenLog {
    pub garden: u32,
    pub plant: u32,
    pub x_coordinate: usize,
    pub y_coordinate: usize,
    pub planted_date: NaiveDate,
    pub notes: String,
    pub health_status: String,
}

impl NewGardenLog {
    pub fn planting(garden: u32, plant: &PlantDetail, coord: Coord, planted_date: NaiveDate) -> Self {
        Self {
            garden,
            plant: plant.id,
            x_coordinate: coord.col,
            y_coordinate: coord.row,
            planted_date,
            notes: String::new(),
            health_status: "healthy".to_string(),
        }
    }
}

// ========================
// Notification Bodies
// ========================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    pub garden: u32,
    pub name: String,
    pub interval: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub plants: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_skips_absent_fields() {
        let body = serde_json::to_value(GardenUpdate::size(4, 3)).unwrap();
        assert_eq!(body, json!({"size_x": 4, "size_y": 3}));
    }

    #[test]
    fn test_log_body_uses_x_for_column() {
        let plant = PlantDetail { id: 7, name: "Basil".into(), family: None };
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let body = serde_json::to_value(NewGardenLog::planting(2, &plant, Coord::new(1, 3), date)).unwrap();
        assert_eq!(body["plant"], 7);
        assert_eq!(body["x_coordinate"], 3);
        assert_eq!(body["y_coordinate"], 1);
        assert_eq!(body["planted_date"], "2024-04-01");
    }

    #[test]
    fn test_notification_body_type_field() {
        let body = serde_json::to_value(NewNotification {
            garden: 1,
            name: "Feed".into(),
            interval: 14,
            kind: "fertilize".into(),
            subtype: None,
            plants: vec![],
        })
        .unwrap();
        assert_eq!(body["type"], "fertilize");
        assert!(body.get("subtype").is_none());
    }
}
