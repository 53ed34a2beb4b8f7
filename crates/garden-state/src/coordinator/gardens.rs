//! Garden Mutations

use crate::domain::{position_by_key, Garden, GardenKey, GardenPatch};
use crate::error::MutationError;
use crate::format::format_garden;
use crate::forms::{validate_garden_form, validate_garden_name, GardenForm};
use crate::geometry::{resize_grid, Edge, Step};
use crate::reducer::GardenAction;
use crate::repository::{GardenRepository, GardenUpdate};

use super::{Coordinator, Idempotency, Snapshot};

impl<R: GardenRepository> Coordinator<R> {
    fn saved_id(&self, index: usize, garden: &Garden) -> Result<u32, MutationError> {
        match garden.id {
            Some(id) => Ok(id),
            None => self.reject(MutationError::Unsaved { garden_index: index }),
        }
    }

    /// Validate the form, prepend a placeholder and create it remotely
    pub async fn create_garden(&self, form: &GardenForm) -> Result<Garden, MutationError> {
        let existing = self.store.get_state();
        let new = match validate_garden_form(form, &existing, self.config.limits()) {
            Ok(new) => new,
            Err(e) => return self.reject(e),
        };
        let token = self.next_local_id();
        let key = GardenKey::Local(token);
        let placeholder = Garden::placeholder(new.name.clone(), new.size_x, new.size_y).with_local_id(token);

        let repo = self.repo.as_ref();
        let body = &new;
        let raw = self
            .run_optimistic_mutation(
                "create garden",
                Idempotency::SendOnce,
                Snapshot::InsertedGarden { key },
                vec![GardenAction::AddGarden {
                    payload: placeholder.into(),
                    garden_index: None,
                }],
                move || repo.create_garden(body),
                |raw, state| {
                    let server = format_garden(raw.clone());
                    position_by_key(state, key)
                        .map(|index| GardenAction::UpdateGarden {
                            garden_index: index,
                            payload: GardenPatch::confirmed(&server),
                        })
                        .into_iter()
                        .collect()
                },
            )
            .await?;
        Ok(format_garden(raw))
    }

    pub async fn rename_garden(&self, index: usize, name: &str) -> Result<(), MutationError> {
        let garden = self.garden_at(index)?;
        let name = match validate_garden_name(name, &self.store.get_state(), Some(index)) {
            Ok(name) => name,
            Err(e) => return self.reject(e),
        };
        let id = self.saved_id(index, &garden)?;

        let repo = self.repo.as_ref();
        let update = GardenUpdate::name(name.clone());
        let body = &update;
        self.run_optimistic_mutation(
            "rename garden",
            Idempotency::Idempotent,
            Snapshot::Name {
                key: GardenKey::Saved(id),
                name: garden.name,
            },
            vec![GardenAction::UpdateGarden {
                garden_index: index,
                payload: GardenPatch::renamed(name),
            }],
            move || repo.update_garden(id, body),
            |_, _| Vec::new(),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_garden(&self, index: usize) -> Result<(), MutationError> {
        let garden = self.garden_at(index)?;
        let id = self.saved_id(index, &garden)?;

        let repo = self.repo.as_ref();
        self.run_optimistic_mutation(
            "delete garden",
            Idempotency::Idempotent,
            Snapshot::RemovedGarden { index, garden },
            vec![GardenAction::RemoveGarden { garden_index: index }],
            move || repo.delete_garden(id),
            |_, _| Vec::new(),
        )
        .await
    }

    /// Grow or shrink one edge; rejected geometry never reaches the network
    pub async fn resize_garden(&self, index: usize, step: Step, edge: Edge) -> Result<(), MutationError> {
        let garden = self.garden_at(index)?;
        let resized = match resize_grid(&garden, step, edge, self.config.limits()) {
            Ok(resized) => resized,
            Err(rejection) => return self.reject(rejection),
        };
        let id = self.saved_id(index, &garden)?;

        let repo = self.repo.as_ref();
        let update = GardenUpdate::size(resized.size_x, resized.size_y);
        let body = &update;
        self.run_optimistic_mutation(
            "resize garden",
            Idempotency::Idempotent,
            Snapshot::Resize {
                key: GardenKey::Saved(id),
                step,
                edge,
                size_x: resized.size_x,
                size_y: resized.size_y,
            },
            vec![GardenAction::UpdateGarden {
                garden_index: index,
                payload: GardenPatch::resized(resized.size_x, resized.size_y, resized.cells),
            }],
            move || repo.update_garden(id, body),
            |_, _| Vec::new(),
        )
        .await?;
        Ok(())
    }
}
