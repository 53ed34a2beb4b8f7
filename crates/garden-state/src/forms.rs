//! Form Validation
//!
//! Turns raw form input into request payloads. Runs before any dispatch, so
//! a rejected form never touches state.

use crate::domain::Garden;
use crate::error::ValidationError;
use crate::geometry::GridLimits;
use crate::repository::{NewGarden, NewNotification};

/// Garden creation form as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GardenForm {
    pub name: String,
    pub size_x: String,
    pub size_y: String,
}

/// Notification creation form as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationForm {
    pub name: String,
    pub interval: String,
    pub kind: String,
    pub subtype: Option<String>,
    /// Catalog plant ids the reminder applies to
    pub plants: Vec<u32>,
}

/// Trimmed name that no other garden uses
///
/// `except_index` skips the garden being renamed so keeping its own name is
/// not a duplicate. Comparison ignores case.
pub fn validate_garden_name(
    name: &str,
    existing: &[Garden],
    except_index: Option<usize>,
) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let taken = existing
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != except_index)
        .any(|(_, g)| g.name.trim().eq_ignore_ascii_case(name));
    if taken {
        return Err(ValidationError::DuplicateName(name.to_string()));
    }
    Ok(name.to_string())
}

fn parse_dimension(field: &'static str, value: &str, max: usize) -> Result<usize, ValidationError> {
    let parsed: usize = value.trim().parse().map_err(|_| ValidationError::NotANumber {
        field,
        value: value.to_string(),
    })?;
    if parsed < 1 || parsed > max {
        return Err(ValidationError::OutOfRange {
            field,
            value: parsed,
            min: 1,
            max,
        });
    }
    Ok(parsed)
}

pub fn validate_garden_form(
    form: &GardenForm,
    existing: &[Garden],
    limits: GridLimits,
) -> Result<NewGarden, ValidationError> {
    let name = validate_garden_name(&form.name, existing, None)?;
    let size_x = parse_dimension("size_x", &form.size_x, limits.max_size_x)?;
    let size_y = parse_dimension("size_y", &form.size_y, limits.max_size_y)?;
    Ok(NewGarden { name, size_x, size_y })
}

pub fn validate_notification_form(form: &NotificationForm, garden_id: u32) -> Result<NewNotification, ValidationError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let interval: u32 = form.interval.trim().parse().map_err(|_| ValidationError::NotANumber {
        field: "interval",
        value: form.interval.clone(),
    })?;
    if interval == 0 {
        return Err(ValidationError::ZeroInterval);
    }
    Ok(NewNotification {
        garden: garden_id,
        name: name.to_string(),
        interval,
        kind: form.kind.trim().to_string(),
        subtype: form.subtype.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string),
        plants: form.plants.clone(),
    })
}
