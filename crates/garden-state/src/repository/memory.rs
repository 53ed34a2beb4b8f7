//! In-Memory Repository
//!
//! Backend stand-in for tests and offline demos. Assigns ids, records every
//! call and can be scripted to fail specific operations.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::error::{RemoteError, RemoteResult};
use crate::format::parse_date;
use crate::raw::{RawGarden, RawGardenLog, RawNotification, RawPlant, RawPlantRef};

use super::payloads::{GardenUpdate, NewGarden, NewGardenLog, NewNotification};
use super::traits::GardenRepository;

/// Repository operation, used for call logs and failure scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListGardens,
    ListNotifications,
    ListPlants,
    CreateGarden,
    UpdateGarden,
    DeleteGarden,
    CreateGardenLog,
    DeleteGardenLog,
    CreateNotification,
    DeleteNotification,
    CompleteInstance,
    SkipInstance,
}

impl Op {
    fn path(&self) -> &'static str {
        match self {
            Op::ListGardens | Op::CreateGarden | Op::UpdateGarden | Op::DeleteGarden => "/gardens/gardens/",
            Op::CreateGardenLog | Op::DeleteGardenLog => "/gardens/garden-logs/",
            Op::ListNotifications | Op::CreateNotification | Op::DeleteNotification => {
                "/notifications/notifications/"
            }
            Op::CompleteInstance | Op::SkipInstance => "/notifications/instances/",
            Op::ListPlants => "/plants/plants/",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FailureScript {
    /// Calls that still succeed before failures begin
    succeed_first: usize,
    /// Failures left; `None` fails forever
    remaining: Option<usize>,
}

#[derive(Debug, Default)]
struct MemoryState {
    gardens: Vec<RawGarden>,
    notifications: Vec<RawNotification>,
    plants: Vec<RawPlant>,
    next_id: u32,
    scripts: HashMap<Op, FailureScript>,
    calls: Vec<Op>,
}

#[derive(Debug)]
pub struct InMemoryGardenRepository {
    state: RefCell<MemoryState>,
    today: NaiveDate,
}

impl Default for InMemoryGardenRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGardenRepository {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(MemoryState {
                next_id: 100,
                ..Default::default()
            }),
            today: Utc::now().date_naive(),
        }
    }

    pub fn with_gardens(self, gardens: Vec<RawGarden>) -> Self {
        self.state.borrow_mut().gardens = gardens;
        self
    }

    pub fn with_notifications(self, notifications: Vec<RawNotification>) -> Self {
        self.state.borrow_mut().notifications = notifications;
        self
    }

    pub fn with_plants(self, plants: Vec<RawPlant>) -> Self {
        self.state.borrow_mut().plants = plants;
        self
    }

    /// Fix the date used to reschedule completed or skipped instances
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Let `op` succeed `n` more times, then fail every call
    pub fn fail_after(&self, op: Op, n: usize) {
        self.state.borrow_mut().scripts.insert(
            op,
            FailureScript {
                succeed_first: n,
                remaining: None,
            },
        );
    }

    /// Fail the next `n` calls of `op`, then succeed again
    pub fn fail_times(&self, op: Op, n: usize) {
        self.state.borrow_mut().scripts.insert(
            op,
            FailureScript {
                succeed_first: 0,
                remaining: Some(n),
            },
        );
    }

    pub fn calls(&self) -> Vec<Op> {
        self.state.borrow().calls.clone()
    }

    pub fn call_count(&self, op: Op) -> usize {
        self.state.borrow().calls.iter().filter(|c| **c == op).count()
    }

    pub fn gardens(&self) -> Vec<RawGarden> {
        self.state.borrow().gardens.clone()
    }

    pub fn notifications(&self) -> Vec<RawNotification> {
        self.state.borrow().notifications.clone()
    }

    /// Record the call and apply any failure script
    fn enter(&self, op: Op) -> RemoteResult<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(op);
        let Some(script) = state.scripts.get_mut(&op) else {
            return Ok(());
        };
        if script.succeed_first > 0 {
            script.succeed_first -= 1;
            return Ok(());
        }
        match script.remaining.as_mut() {
            Some(0) => Ok(()),
            Some(left) => {
                *left -= 1;
                Err(Self::failure(op))
            }
            None => Err(Self::failure(op)),
        }
    }

    fn failure(op: Op) -> RemoteError {
        RemoteError::Status {
            path: op.path().to_string(),
            status: 503,
        }
    }

    fn not_found(op: Op) -> RemoteError {
        RemoteError::Status {
            path: op.path().to_string(),
            status: 404,
        }
    }

    fn next_id(state: &mut MemoryState) -> u32 {
        state.next_id += 1;
        state.next_id
    }

    fn reschedule(&self, op: Op, instance_id: u32, skip: bool) -> RemoteResult<Option<RawNotification>> {
        self.enter(op)?;
        let mut state = self.state.borrow_mut();
        let new_instance = Self::next_id(&mut state);
        let notification = state
            .notifications
            .iter_mut()
            .find(|n| n.instance_id == Some(instance_id))
            .ok_or_else(|| Self::not_found(op))?;
        let interval = chrono::Days::new(u64::from(notification.interval.unwrap_or(0)));
        let from = if skip {
            notification.next_due.as_deref().and_then(parse_date).unwrap_or(self.today)
        } else {
            self.today
        };
        notification.next_due = Some((from + interval).format("%Y-%m-%d").to_string());
        notification.instance_id = Some(new_instance);
        Ok(Some(notification.clone()))
    }
}

#[async_trait(?Send)]
impl GardenRepository for InMemoryGardenRepository {
    async fn list_gardens(&self) -> RemoteResult<Vec<RawGarden>> {
        self.enter(Op::ListGardens)?;
        Ok(self.gardens())
    }

    async fn list_notifications(&self) -> RemoteResult<Vec<RawNotification>> {
        self.enter(Op::ListNotifications)?;
        Ok(self.notifications())
    }

    async fn list_plants(&self) -> RemoteResult<Vec<RawPlant>> {
        self.enter(Op::ListPlants)?;
        Ok(self.state.borrow().plants.clone())
    }

    async fn create_garden(&self, garden: &NewGarden) -> RemoteResult<RawGarden> {
        self.enter(Op::CreateGarden)?;
        let mut state = self.state.borrow_mut();
        let created = RawGarden {
            id: Some(Self::next_id(&mut state)),
            name: Some(garden.name.clone()),
            size_x: Some(garden.size_x),
            size_y: Some(garden.size_y),
            total_plants: Some(0),
            created_at: Some(Utc::now().to_rfc3339()),
            ..Default::default()
        };
        state.gardens.insert(0, created.clone());
        Ok(created)
    }

    async fn update_garden(&self, id: u32, update: &GardenUpdate) -> RemoteResult<RawGarden> {
        self.enter(Op::UpdateGarden)?;
        let mut state = self.state.borrow_mut();
        let garden = state
            .gardens
            .iter_mut()
            .find(|g| g.id == Some(id))
            .ok_or_else(|| Self::not_found(Op::UpdateGarden))?;
        if let Some(name) = &update.name {
            garden.name = Some(name.clone());
        }
        if let Some(size_x) = update.size_x {
            garden.size_x = Some(size_x);
        }
        if let Some(size_y) = update.size_y {
            garden.size_y = Some(size_y);
        }
        Ok(garden.clone())
    }

    async fn delete_garden(&self, id: u32) -> RemoteResult<()> {
        self.enter(Op::DeleteGarden)?;
        let mut state = self.state.borrow_mut();
        let before = state.gardens.len();
        state.gardens.retain(|g| g.id != Some(id));
        if state.gardens.len() == before {
            return Err(Self::not_found(Op::DeleteGarden));
        }
        state.notifications.retain(|n| n.garden != Some(id));
        Ok(())
    }

    async fn create_garden_log(&self, log: &NewGardenLog) -> RemoteResult<RawGardenLog> {
        self.enter(Op::CreateGardenLog)?;
        let mut state = self.state.borrow_mut();
        let id = Self::next_id(&mut state);
        let plant_details = state.plants.iter().find(|p| p.id == Some(log.plant)).cloned();
        let created = RawGardenLog {
            id: Some(id),
            garden: Some(log.garden),
            plant: Some(RawPlantRef::Id(log.plant)),
            plant_details,
            x_coordinate: Some(log.x_coordinate),
            y_coordinate: Some(log.y_coordinate),
            planted_date: Some(log.planted_date.format("%Y-%m-%d").to_string()),
            notes: Some(log.notes.clone()),
            health_status: Some(log.health_status.clone()),
            ..Default::default()
        };
        let garden = state
            .gardens
            .iter_mut()
            .find(|g| g.id == Some(log.garden))
            .ok_or_else(|| Self::not_found(Op::CreateGardenLog))?;
        garden.garden_logs.push(created.clone());
        garden.total_plants = Some(garden.total_plants.unwrap_or(0) + 1);
        Ok(created)
    }

    async fn delete_garden_log(&self, id: u32) -> RemoteResult<()> {
        self.enter(Op::DeleteGardenLog)?;
        let mut state = self.state.borrow_mut();
        let garden = state
            .gardens
            .iter_mut()
            .find(|g| g.garden_logs.iter().any(|l| l.id == Some(id)))
            .ok_or_else(|| Self::not_found(Op::DeleteGardenLog))?;
        garden.garden_logs.retain(|l| l.id != Some(id));
        garden.total_plants = Some(garden.total_plants.unwrap_or(1).saturating_sub(1));
        Ok(())
    }

    async fn create_notification(&self, notification: &NewNotification) -> RemoteResult<RawNotification> {
        self.enter(Op::CreateNotification)?;
        let mut state = self.state.borrow_mut();
        let id = Self::next_id(&mut state);
        let instance_id = Self::next_id(&mut state);
        let plants: Vec<RawPlant> = state
            .plants
            .iter()
            .filter(|p| p.id.is_some_and(|pid| notification.plants.contains(&pid)))
            .cloned()
            .collect();
        let due = self.today + chrono::Days::new(u64::from(notification.interval));
        let created = RawNotification {
            id: Some(id),
            garden: Some(notification.garden),
            name: Some(notification.name.clone()),
            interval: Some(notification.interval),
            kind: Some(notification.kind.clone()),
            subtype: notification.subtype.clone(),
            plants,
            next_due: Some(due.format("%Y-%m-%d").to_string()),
            instance_id: Some(instance_id),
            ..Default::default()
        };
        state.notifications.push(created.clone());
        Ok(created)
    }

    async fn delete_notification(&self, id: u32) -> RemoteResult<()> {
        self.enter(Op::DeleteNotification)?;
        let mut state = self.state.borrow_mut();
        let before = state.notifications.len();
        state.notifications.retain(|n| n.id != Some(id));
        if state.notifications.len() == before {
            return Err(Self::not_found(Op::DeleteNotification));
        }
        Ok(())
    }

    async fn complete_instance(&self, instance_id: u32) -> RemoteResult<Option<RawNotification>> {
        self.reschedule(Op::CompleteInstance, instance_id, false)
    }

    async fn skip_instance(&self, instance_id: u32) -> RemoteResult<Option<RawNotification>> {
        self.reschedule(Op::SkipInstance, instance_id, true)
    }
}
