//! Selection Sets
//!
//! Transient multi-cell selection for batch placement and removal. Kept in
//! UI state only; a batch operation takes (copies and clears) the selection
//! before its first request so later clicks cannot change the batch.

use std::collections::BTreeSet;

use crate::domain::{position_by_key, Coord, CoordParseError, Garden};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    coords: BTreeSet<Coord>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse legacy `"row-col"` keys
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Result<Self, CoordParseError> {
        keys.into_iter().map(str::parse::<Coord>).collect::<Result<BTreeSet<_>, _>>().map(|coords| Self { coords })
    }

    /// Flip `coord` in or out of the selection; returns whether it is now selected
    pub fn toggle(&mut self, coord: Coord) -> bool {
        if self.coords.remove(&coord) {
            false
        } else {
            self.coords.insert(coord);
            true
        }
    }

    pub fn insert(&mut self, coord: Coord) -> bool {
        self.coords.insert(coord)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.coords.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn clear(&mut self) {
        self.coords.clear();
    }

    /// Row-major order
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords.iter().copied()
    }

    /// Snapshot the selection for a batch and clear the live set
    pub fn take(&mut self) -> Vec<Coord> {
        std::mem::take(&mut self.coords).into_iter().collect()
    }

    pub fn keys(&self) -> Vec<String> {
        self.coords.iter().map(Coord::to_string).collect()
    }
}

impl FromIterator<Coord> for Selection {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        Self {
            coords: iter.into_iter().collect(),
        }
    }
}

/// Where the shown garden is after the collection changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowedGarden {
    /// Same garden, possibly at a new index; the cell selection still applies
    Kept(usize),
    /// The garden is gone; show the one now nearest its old slot and drop the selection
    Lost(usize),
}

impl FollowedGarden {
    pub fn index(&self) -> usize {
        match self {
            FollowedGarden::Kept(index) | FollowedGarden::Lost(index) => *index,
        }
    }
}

/// Track the garden shown at `selected` from `previous` into `current`
pub fn follow_garden(previous: &[Garden], current: &[Garden], selected: usize) -> FollowedGarden {
    let nearest = selected.min(current.len().saturating_sub(1));
    let Some(key) = previous.get(selected).and_then(Garden::key) else {
        return FollowedGarden::Kept(nearest);
    };
    match position_by_key(current, key) {
        Some(index) => FollowedGarden::Kept(index),
        None => FollowedGarden::Lost(nearest),
    }
}
