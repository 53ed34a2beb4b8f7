//! Notification Mutations

use chrono::NaiveDate;

use crate::domain::{position_by_id, position_by_key, Garden, GardenKey, Notification, NotificationPatch};
use crate::error::{MutationError, ReducerError};
use crate::format::format_notification;
use crate::forms::{validate_notification_form, NotificationForm};
use crate::raw::RawNotification;
use crate::reducer::GardenAction;
use crate::repository::GardenRepository;

use super::{Coordinator, Idempotency, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Occurrence {
    Complete,
    Skip,
}

/// Names of planted cells matching `plant_ids`, first occurrence only
fn plant_names(garden: &Garden, plant_ids: &[u32]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (_, cell) in garden.planted() {
        if plant_ids.contains(&cell.plant_detail.id) && !names.contains(&cell.plant_detail.name) {
            names.push(cell.plant_detail.name.clone());
        }
    }
    names
}

/// Swap the placeholder carrying `local_id` for the server entity
fn reconcile_created(key: GardenKey, local_id: u64, server: &Notification, state: &[Garden]) -> Vec<GardenAction> {
    let Some(index) = position_by_key(state, key) else {
        return Vec::new();
    };
    let mut notifications = state[index].notifications.clone();
    match notifications.iter_mut().find(|n| n.local_id == Some(local_id)) {
        Some(slot) => *slot = server.clone(),
        None => notifications.push(server.clone()),
    }
    vec![GardenAction::UpdateNotifications {
        garden_index: index,
        payload: notifications,
    }]
}

fn reconcile_schedule(
    key: GardenKey,
    notification_id: u32,
    raw: &Option<RawNotification>,
    state: &[Garden],
) -> Vec<GardenAction> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let Some(index) = position_by_key(state, key) else {
        return Vec::new();
    };
    let known = position_by_id(&state[index].notifications, notification_id).is_some();
    let patch = NotificationPatch::schedule_of(&format_notification(raw.clone()));
    if !known || patch.is_empty() {
        return Vec::new();
    }
    vec![GardenAction::UpdateNotification {
        garden_index: index,
        notification_id,
        payload: patch,
    }]
}

impl<R: GardenRepository> Coordinator<R> {
    /// Key of the garden at `index` and the position of reminder `id` in it
    fn notification_at(&self, garden: &Garden, index: usize, id: u32) -> Result<(GardenKey, usize), MutationError> {
        let Some(key) = garden.key() else {
            return self.reject(MutationError::Unsaved { garden_index: index });
        };
        match position_by_id(&garden.notifications, id) {
            Some(position) => Ok((key, position)),
            None => self.reject(ReducerError::UnknownNotification {
                garden_index: index,
                notification_id: id,
            }),
        }
    }

    pub async fn create_notification(
        &self,
        index: usize,
        form: &NotificationForm,
    ) -> Result<Notification, MutationError> {
        let garden = self.garden_at(index)?;
        let Some(garden_id) = garden.id else {
            return self.reject(MutationError::Unsaved { garden_index: index });
        };
        let new = match validate_notification_form(form, garden_id) {
            Ok(new) => new,
            Err(e) => return self.reject(e),
        };
        let key = GardenKey::Saved(garden_id);
        let local_id = self.next_local_id();
        let placeholder = Notification {
            id: None,
            local_id: Some(local_id),
            name: new.name.clone(),
            interval: new.interval,
            kind: new.kind.clone(),
            plant_names: plant_names(&garden, &new.plants),
            subtype: new.subtype.clone(),
            next_due: None,
            instance_id: None,
        };

        let repo = self.repo.as_ref();
        let body = &new;
        let raw = self
            .run_optimistic_mutation(
                "create notification",
                Idempotency::SendOnce,
                Snapshot::InsertedNotification { key, local_id },
                vec![GardenAction::AddNotification {
                    garden_index: index,
                    payload: placeholder.into(),
                }],
                move || repo.create_notification(body),
                |raw, state| reconcile_created(key, local_id, &format_notification(raw.clone()), state),
            )
            .await?;
        Ok(format_notification(raw))
    }

    pub async fn delete_notification(&self, index: usize, id: u32) -> Result<(), MutationError> {
        let garden = self.garden_at(index)?;
        let (key, position) = self.notification_at(&garden, index, id)?;

        let repo = self.repo.as_ref();
        self.run_optimistic_mutation(
            "delete notification",
            Idempotency::Idempotent,
            Snapshot::Notification {
                key,
                position,
                notification: garden.notifications[position].clone(),
            },
            vec![GardenAction::RemoveNotification {
                garden_index: index,
                notification_id: id,
            }],
            move || repo.delete_notification(id),
            |_, _| Vec::new(),
        )
        .await
    }

    /// Mark the pending occurrence done; next due becomes `today + interval`
    pub async fn complete_notification(&self, index: usize, id: u32, today: NaiveDate) -> Result<(), MutationError> {
        self.advance(index, id, today, Occurrence::Complete).await
    }

    /// Skip the pending occurrence; next due moves on by one interval
    pub async fn skip_notification(&self, index: usize, id: u32, today: NaiveDate) -> Result<(), MutationError> {
        self.advance(index, id, today, Occurrence::Skip).await
    }

    async fn advance(
        &self,
        index: usize,
        id: u32,
        today: NaiveDate,
        occurrence: Occurrence,
    ) -> Result<(), MutationError> {
        let garden = self.garden_at(index)?;
        let (key, position) = self.notification_at(&garden, index, id)?;
        let notification = &garden.notifications[position];
        let Some(instance_id) = notification.instance_id else {
            return self.reject(MutationError::NoPendingInstance { notification_id: id });
        };
        let (label, due) = match occurrence {
            Occurrence::Complete => ("complete reminder", notification.due_after_completion(today)),
            Occurrence::Skip => ("skip reminder", notification.due_after_skip(today)),
        };

        let repo = self.repo.as_ref();
        self.run_optimistic_mutation(
            label,
            Idempotency::SendOnce,
            Snapshot::Notification {
                key,
                position,
                notification: notification.clone(),
            },
            vec![GardenAction::UpdateNotification {
                garden_index: index,
                notification_id: id,
                payload: NotificationPatch::next_due(due),
            }],
            move || async move {
                match occurrence {
                    Occurrence::Complete => repo.complete_instance(instance_id).await,
                    Occurrence::Skip => repo.skip_instance(instance_id).await,
                }
            },
            |raw, state| reconcile_schedule(key, id, raw, state),
        )
        .await?;
        Ok(())
    }
}
