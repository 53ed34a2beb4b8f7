//! Notification Entity
//!
//! Recurring maintenance reminder scoped to one garden.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Option<u32>,
    pub name: String,
    /// Days between occurrences
    pub interval: u32,
    /// Maintenance type, e.g. "water" or "fertilize"
    #[serde(rename = "type")]
    pub kind: String,
    pub plant_names: Vec<String>,
    pub subtype: Option<String>,
    pub next_due: Option<NaiveDate>,
    /// Pending occurrence used by complete/skip
    pub instance_id: Option<u32>,
    /// Client token of an optimistic reminder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<u64>,
}

impl Notification {
    /// Due date after completing the reminder on `today`
    pub fn due_after_completion(&self, today: NaiveDate) -> NaiveDate {
        today + Duration::days(i64::from(self.interval))
    }

    /// Due date after skipping the current occurrence
    pub fn due_after_skip(&self, today: NaiveDate) -> NaiveDate {
        self.next_due.unwrap_or(today) + Duration::days(i64::from(self.interval))
    }
}

impl Entity for Notification {
    type Id = u32;

    fn id(&self) -> Option<u32> {
        self.id
    }
}

/// Merge applied by `UPDATE_NOTIFICATION`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPatch {
    pub name: Option<String>,
    pub interval: Option<u32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub plant_names: Option<Vec<String>>,
    pub subtype: Option<String>,
    pub next_due: Option<NaiveDate>,
    pub instance_id: Option<u32>,
}

impl NotificationPatch {
    pub fn next_due(date: NaiveDate) -> Self {
        Self {
            next_due: Some(date),
            ..Self::default()
        }
    }

    /// Server-owned scheduling fields of a confirmed notification
    pub fn schedule_of(server: &Notification) -> Self {
        Self {
            next_due: server.next_due,
            instance_id: server.instance_id,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(&self, notification: &mut Notification) {
        if let Some(name) = &self.name {
            notification.name = name.clone();
        }
        if let Some(interval) = self.interval {
            notification.interval = interval;
        }
        if let Some(kind) = &self.kind {
            notification.kind = kind.clone();
        }
        if let Some(names) = &self.plant_names {
            notification.plant_names = names.clone();
        }
        if let Some(subtype) = &self.subtype {
            notification.subtype = Some(subtype.clone());
        }
        if let Some(due) = self.next_due {
            notification.next_due = Some(due);
        }
        if let Some(instance) = self.instance_id {
            notification.instance_id = Some(instance);
        }
    }
}
