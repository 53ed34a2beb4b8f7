//! Entity Formatters
//!
//! Pure, total translation from raw API payloads into normalized entities.
//! Missing fields fall back to `None`, empty collections or zero, and
//! unparseable dates become `None`. Nothing here performs I/O or fails.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{empty_grid, Cell, Garden, Notification, PlantDetail};
use crate::geometry::MAX_GRID_SIDE;
use crate::raw::{RawGarden, RawGardenLog, RawNotification, RawPlant, RawPlantRef};

/// Input accepted by [`format_garden`]
///
/// Formatting is idempotent: an already formatted garden passes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GardenSource {
    Formatted(Garden),
    Raw(RawGarden),
}

impl From<RawGarden> for GardenSource {
    fn from(raw: RawGarden) -> Self {
        GardenSource::Raw(raw)
    }
}

impl From<Garden> for GardenSource {
    fn from(garden: Garden) -> Self {
        GardenSource::Formatted(garden)
    }
}

/// Input accepted by [`format_notification`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotificationSource {
    Formatted(Notification),
    Raw(RawNotification),
}

impl From<RawNotification> for NotificationSource {
    fn from(raw: RawNotification) -> Self {
        NotificationSource::Raw(raw)
    }
}

impl From<Notification> for NotificationSource {
    fn from(notification: Notification) -> Self {
        NotificationSource::Formatted(notification)
    }
}

pub fn format_plant_detail(raw: RawPlant) -> PlantDetail {
    let nested = raw.plant_detail.map(|inner| format_plant_detail(*inner));
    let name = raw
        .common_name
        .or(raw.name)
        .or_else(|| nested.as_ref().map(|p| p.name.clone()))
        .unwrap_or_default();
    PlantDetail {
        id: raw.id.or(nested.as_ref().map(|p| p.id)).unwrap_or(0),
        name,
        family: raw.family.or_else(|| nested.and_then(|p| p.family)),
    }
}

pub fn format_garden_log(raw: RawGardenLog) -> Cell {
    let plant = raw
        .plant_details
        .or(raw.plant_detail)
        .or(match raw.plant {
            Some(RawPlantRef::Detail(plant)) => Some(plant),
            Some(RawPlantRef::Id(id)) => Some(RawPlant {
                id: Some(id),
                ..RawPlant::default()
            }),
            None => None,
        })
        .map(format_plant_detail)
        .unwrap_or_default();

    Cell {
        id: raw.id,
        plant_detail: plant,
        x_coordinate: raw.x_coordinate.unwrap_or(0),
        y_coordinate: raw.y_coordinate.unwrap_or(0),
        planted_date: raw.planted_date.as_deref().and_then(parse_date),
    }
}

pub fn format_notification(source: impl Into<NotificationSource>) -> Notification {
    let raw = match source.into() {
        NotificationSource::Formatted(notification) => return notification,
        NotificationSource::Raw(raw) => raw,
    };

    let plant_names = if raw.plant_names.is_empty() {
        raw.plants
            .into_iter()
            .map(format_plant_detail)
            .map(|p| p.name)
            .filter(|name| !name.is_empty())
            .collect()
    } else {
        raw.plant_names
    };

    Notification {
        id: raw.id,
        name: raw.name.unwrap_or_default(),
        interval: raw.interval.unwrap_or(0),
        kind: raw.kind.unwrap_or_default(),
        plant_names,
        subtype: raw.subtype,
        next_due: raw.next_due.as_deref().and_then(parse_date),
        instance_id: raw.instance_id,
        local_id: None,
    }
}

fn bounded_side(garden: Option<u32>, field: &str, side: usize) -> usize {
    if side > MAX_GRID_SIDE {
        log::warn!("garden {:?}: {} {} exceeds {}, clamping", garden, field, side, MAX_GRID_SIDE);
    }
    side.min(MAX_GRID_SIDE)
}

pub fn format_garden(source: impl Into<GardenSource>) -> Garden {
    let raw = match source.into() {
        GardenSource::Formatted(garden) => return garden,
        GardenSource::Raw(raw) => raw,
    };

    let size_x = bounded_side(raw.id, "size_x", raw.size_x.unwrap_or(0));
    let size_y = bounded_side(raw.id, "size_y", raw.size_y.unwrap_or(0));
    let mut cells = empty_grid(size_x, size_y);

    for log in raw.garden_logs {
        let cell = format_garden_log(log);
        let coord = cell.coord();
        if coord.within(size_x, size_y) {
            cells[coord.row][coord.col] = Some(cell);
        } else {
            log::warn!(
                "garden {:?}: dropping log at {} outside {}x{} grid",
                raw.id,
                coord,
                size_x,
                size_y
            );
        }
    }

    Garden {
        id: raw.id,
        name: raw.name.unwrap_or_default(),
        size_x,
        size_y,
        cells,
        notifications: raw.notifications.into_iter().map(format_notification).collect(),
        total_plants: raw.total_plants.unwrap_or(0),
        created_at: raw.created_at.as_deref().and_then(parse_timestamp),
        local_id: None,
    }
}

/// Attach each notification to its garden (`notification.garden == garden.id`)
///
/// Notifications for unknown gardens are dropped with a warning.
pub fn join_notifications(mut gardens: Vec<RawGarden>, notifications: Vec<RawNotification>) -> Vec<RawGarden> {
    for notification in notifications {
        let owner = notification
            .garden
            .and_then(|gid| gardens.iter_mut().find(|g| g.id == Some(gid)));
        match owner {
            Some(garden) => garden.notifications.push(notification),
            None => log::warn!(
                "notification {:?} references unknown garden {:?}",
                notification.id,
                notification.garden
            ),
        }
    }
    gardens
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(value).map(|ts| ts.date_naive()))
}

/// Accepts an RFC 3339 timestamp or a bare date (midnight UTC)
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coord;

    fn oak_log(x: usize, y: usize) -> RawGardenLog {
        RawGardenLog {
            x_coordinate: Some(x),
            y_coordinate: Some(y),
            plant_details: Some(RawPlant {
                id: Some(1),
                common_name: Some("Oak".into()),
                family: Some("Fagaceae".into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn raw_garden(size_x: usize, size_y: usize, logs: Vec<RawGardenLog>) -> RawGarden {
        RawGarden {
            id: Some(1),
            name: Some("Front yard".into()),
            size_x: Some(size_x),
            size_y: Some(size_y),
            garden_logs: logs,
            ..Default::default()
        }
    }

    #[test]
    fn test_overlays_logs_into_null_grid() {
        let garden = format_garden(raw_garden(2, 1, vec![oak_log(0, 0)]));

        let expected = Cell {
            id: None,
            plant_detail: PlantDetail {
                id: 1,
                name: "Oak".into(),
                family: Some("Fagaceae".into()),
            },
            x_coordinate: 0,
            y_coordinate: 0,
            planted_date: None,
        };
        assert_eq!(garden.cells, vec![vec![Some(expected), None]]);
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let once = format_garden(raw_garden(3, 2, vec![oak_log(2, 1)]));
        let twice = format_garden(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_fields_default() {
        let garden = format_garden(RawGarden::default());
        assert_eq!(garden.id, None);
        assert_eq!(garden.name, "");
        assert_eq!((garden.size_x, garden.size_y), (0, 0));
        assert!(garden.cells.is_empty());
        assert_eq!(garden.total_plants, 0);
    }

    #[test]
    fn test_out_of_grid_logs_are_dropped() {
        let garden = format_garden(raw_garden(1, 1, vec![oak_log(4, 0), oak_log(0, 0)]));
        assert!(garden.has_consistent_dimensions());
        assert_eq!(garden.planted().count(), 1);
    }

    #[test]
    fn test_oversized_garden_is_clamped() {
        let garden = format_garden(raw_garden(usize::MAX, 3, vec![oak_log(MAX_GRID_SIDE + 5, 0), oak_log(1, 2)]));
        assert_eq!((garden.size_x, garden.size_y), (MAX_GRID_SIDE, 3));
        assert!(garden.has_consistent_dimensions());
        assert_eq!(garden.planted().count(), 1);
    }

    #[test]
    fn test_plant_name_variants_converge() {
        let by_name = format_plant_detail(RawPlant {
            id: Some(2),
            name: Some("Mint".into()),
            ..Default::default()
        });
        let nested = format_plant_detail(RawPlant {
            plant_detail: Some(Box::new(RawPlant {
                id: Some(2),
                name: Some("Mint".into()),
                ..Default::default()
            })),
            ..Default::default()
        });
        assert_eq!(by_name, nested);
        assert_eq!(by_name.name, "Mint");
    }

    #[test]
    fn test_log_with_bare_plant_id() {
        let cell = format_garden_log(RawGardenLog {
            id: Some(5),
            plant: Some(RawPlantRef::Id(8)),
            x_coordinate: Some(1),
            y_coordinate: Some(2),
            planted_date: Some("2024-04-01".into()),
            ..Default::default()
        });
        assert_eq!(cell.plant_detail.id, 8);
        assert_eq!(cell.coord(), Coord::new(2, 1));
        assert_eq!(cell.planted_date, NaiveDate::from_ymd_opt(2024, 4, 1));
    }

    #[test]
    fn test_notification_names_from_plants() {
        let n = format_notification(RawNotification {
            id: Some(3),
            name: Some("Feed".into()),
            interval: Some(14),
            plants: vec![RawPlant {
                common_name: Some("Tomato".into()),
                ..Default::default()
            }],
            next_due: Some("2024-06-01T08:00:00Z".into()),
            ..Default::default()
        });
        assert_eq!(n.plant_names, vec!["Tomato".to_string()]);
        assert_eq!(n.next_due, NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn test_join_on_garden_id() {
        let gardens = vec![
            RawGarden { id: Some(1), ..Default::default() },
            RawGarden { id: Some(2), ..Default::default() },
        ];
        let notifications = vec![
            RawNotification { id: Some(10), garden: Some(2), ..Default::default() },
            RawNotification { id: Some(11), garden: Some(9), ..Default::default() },
        ];
        let joined = join_notifications(gardens, notifications);
        assert!(joined[0].notifications.is_empty());
        assert_eq!(joined[1].notifications.len(), 1);
        assert_eq!(joined[1].notifications[0].id, Some(10));
    }

    #[test]
    fn test_bad_dates_become_none() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_timestamp(""), None);
        assert!(parse_timestamp("2024-01-02").is_some());
    }
}
