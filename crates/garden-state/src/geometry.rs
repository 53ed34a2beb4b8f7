//! Grid Geometry Engine
//!
//! Resizes a garden one row or column at a time at a chosen edge and keeps
//! the cell matrix rectangular. A shrink that would delete a planted cell is
//! refused; planted cells are never dropped silently.

use serde::{Deserialize, Serialize};

use crate::domain::{Cell, Coord, Garden, Grid};
use crate::error::GeometryRejection;

/// Default upper bound for either dimension
pub const DEFAULT_MAX_SIZE: usize = 20;

/// Hard bound for either dimension; larger sizes from the server are clamped
pub const MAX_GRID_SIDE: usize = 100;

/// Grid edge a resize acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn axis(&self) -> Axis {
        match self {
            Edge::Left | Edge::Right => Axis::Horizontal,
            Edge::Top | Edge::Bottom => Axis::Vertical,
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Edge::Left => "left",
            Edge::Right => "right",
            Edge::Top => "top",
            Edge::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Horizontal => f.write_str("wide"),
            Axis::Vertical => f.write_str("tall"),
        }
    }
}

/// One-cell change in size: `+1` or `-1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Grow,
    Shrink,
}

impl Step {
    pub fn from_delta(delta: i32) -> Option<Self> {
        match delta {
            1 => Some(Step::Grow),
            -1 => Some(Step::Shrink),
            _ => None,
        }
    }

    pub fn delta(&self) -> i32 {
        match self {
            Step::Grow => 1,
            Step::Shrink => -1,
        }
    }

    /// The step that undoes this one
    pub fn inverse(&self) -> Self {
        match self {
            Step::Grow => Step::Shrink,
            Step::Shrink => Step::Grow,
        }
    }
}

/// Configured maximum garden dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLimits {
    pub max_size_x: usize,
    pub max_size_y: usize,
}

impl Default for GridLimits {
    fn default() -> Self {
        Self {
            max_size_x: DEFAULT_MAX_SIZE,
            max_size_y: DEFAULT_MAX_SIZE,
        }
    }
}

impl GridLimits {
    /// Limits at the hard bound, for undoing a resize that already passed the configured ones
    pub fn hard() -> Self {
        Self {
            max_size_x: MAX_GRID_SIDE,
            max_size_y: MAX_GRID_SIDE,
        }
    }

    fn max_for(&self, axis: Axis) -> usize {
        match axis {
            Axis::Horizontal => self.max_size_x,
            Axis::Vertical => self.max_size_y,
        }
    }
}

/// Number of planted cells along `edge`
pub fn occupied_on_edge(garden: &Garden, edge: Edge) -> usize {
    let cells = &garden.cells;
    match edge {
        Edge::Left => cells.iter().filter(|row| matches!(row.first(), Some(Some(_)))).count(),
        Edge::Right => cells.iter().filter(|row| matches!(row.last(), Some(Some(_)))).count(),
        Edge::Top => cells.first().map_or(0, |row| row.iter().flatten().count()),
        Edge::Bottom => cells.last().map_or(0, |row| row.iter().flatten().count()),
    }
}

/// Grow or shrink `garden` by one cell at `edge`
///
/// Returns a new garden with copied cells; the input is never touched.
/// Coordinates stored in cells are renumbered to their new slots.
pub fn resize_grid(
    garden: &Garden,
    step: Step,
    edge: Edge,
    limits: GridLimits,
) -> Result<Garden, GeometryRejection> {
    let axis = edge.axis();
    let current = match axis {
        Axis::Horizontal => garden.size_x,
        Axis::Vertical => garden.size_y,
    };

    let next = match step {
        Step::Grow => {
            let max = limits.max_for(axis);
            if current + 1 > max {
                return Err(GeometryRejection::TooLarge { axis, max });
            }
            current + 1
        }
        Step::Shrink => {
            if current <= 1 {
                return Err(GeometryRejection::TooSmall { axis });
            }
            let occupied = occupied_on_edge(garden, edge);
            if occupied > 0 {
                return Err(GeometryRejection::Occupied { edge, occupied });
            }
            current - 1
        }
    };

    let mut cells = garden.cells.clone();
    match (step, edge) {
        (Step::Grow, Edge::Left) => cells.iter_mut().for_each(|row| row.insert(0, None)),
        (Step::Grow, Edge::Right) => cells.iter_mut().for_each(|row| row.push(None)),
        (Step::Shrink, Edge::Left) => cells.iter_mut().for_each(|row| {
            row.remove(0);
        }),
        (Step::Shrink, Edge::Right) => cells.iter_mut().for_each(|row| {
            row.pop();
        }),
        (Step::Grow, Edge::Top) => cells.insert(0, vec![None; garden.size_x]),
        (Step::Grow, Edge::Bottom) => cells.push(vec![None; garden.size_x]),
        (Step::Shrink, Edge::Top) => {
            cells.remove(0);
        }
        (Step::Shrink, Edge::Bottom) => {
            cells.pop();
        }
    }
    renumber(&mut cells);

    let mut resized = garden.clone();
    match axis {
        Axis::Horizontal => resized.size_x = next,
        Axis::Vertical => resized.size_y = next,
    }
    resized.cells = cells;
    Ok(resized)
}

fn renumber(cells: &mut Grid) {
    for (r, row) in cells.iter_mut().enumerate() {
        for (c, slot) in row.iter_mut().enumerate() {
            if let Some(cell) = slot {
                cell.x_coordinate = c;
                cell.y_coordinate = r;
            }
        }
    }
}

/// A batch selection split against a garden's bounds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub in_bounds: Vec<Coord>,
    pub out_of_bounds: Vec<Coord>,
}

/// Split `coords` into cells inside and outside `garden`
///
/// Out-of-bounds coordinates are logged and left for the caller to skip,
/// so the rest of the batch still applies.
pub fn partition_selection(garden: &Garden, coords: impl IntoIterator<Item = Coord>) -> Partition {
    let mut partition = Partition::default();
    for coord in coords {
        if garden.contains(coord) {
            partition.in_bounds.push(coord);
        } else {
            log::warn!(
                "skipping {} outside the {}x{} grid of {:?}",
                coord,
                garden.size_x,
                garden.size_y,
                garden.name
            );
            partition.out_of_bounds.push(coord);
        }
    }
    partition
}

/// Copy of `grid` with the given slots replaced
pub fn with_cells(grid: &Grid, changes: impl IntoIterator<Item = (Coord, Option<Cell>)>) -> Grid {
    let mut next = grid.clone();
    for (coord, cell) in changes {
        match next.get_mut(coord.row).and_then(|row| row.get_mut(coord.col)) {
            Some(slot) => *slot = cell,
            None => log::warn!("ignoring change at {} outside the grid", coord),
        }
    }
    next
}

pub fn count_plants(grid: &Grid) -> u32 {
    grid.iter().flatten().flatten().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlantDetail;

    fn cell_at(row: usize, col: usize) -> Cell {
        Cell {
            id: Some((row * 10 + col) as u32),
            plant_detail: PlantDetail { id: 1, name: "Kale".into(), family: None },
            x_coordinate: col,
            y_coordinate: row,
            planted_date: None,
        }
    }

    fn garden_3x3() -> Garden {
        Garden::placeholder("Plot", 3, 3)
    }

    #[test]
    fn test_grow_right_appends_null_column() {
        let garden = garden_3x3();
        let resized = resize_grid(&garden, Step::Grow, Edge::Right, GridLimits::default()).unwrap();
        assert_eq!(resized.size_x, 4);
        assert!(resized.cells.iter().all(|row| row.len() == 4 && row[3].is_none()));
        assert!(resized.has_consistent_dimensions());
    }

    #[test]
    fn test_shrink_left_refuses_occupied_column() {
        let mut garden = garden_3x3();
        garden.cells[1][0] = Some(cell_at(1, 0));
        let before = garden.clone();

        let result = resize_grid(&garden, Step::Shrink, Edge::Left, GridLimits::default());
        assert_eq!(
            result,
            Err(GeometryRejection::Occupied { edge: Edge::Left, occupied: 1 })
        );
        assert_eq!(garden, before);
    }

    #[test]
    fn test_shrink_removes_empty_edge() {
        let mut garden = garden_3x3();
        garden.cells[0][2] = Some(cell_at(0, 2));

        let resized = resize_grid(&garden, Step::Shrink, Edge::Bottom, GridLimits::default()).unwrap();
        assert_eq!(resized.size_y, 2);
        assert_eq!(resized.cells.len(), 2);
        assert!(resized.cell(Coord::new(0, 2)).is_some());
    }

    #[test]
    fn test_grow_top_shifts_cells_down() {
        let mut garden = garden_3x3();
        garden.cells[0][1] = Some(cell_at(0, 1));

        let resized = resize_grid(&garden, Step::Grow, Edge::Top, GridLimits::default()).unwrap();
        assert_eq!(resized.size_y, 4);
        assert!(resized.cells[0].iter().all(Option::is_none));
        let moved = resized.cell(Coord::new(1, 1)).unwrap();
        assert_eq!(moved.coord(), Coord::new(1, 1));
        assert_eq!(count_plants(&resized.cells), 1);
    }

    #[test]
    fn test_shrink_left_renumbers_columns() {
        let mut garden = garden_3x3();
        garden.cells[2][2] = Some(cell_at(2, 2));

        let resized = resize_grid(&garden, Step::Shrink, Edge::Left, GridLimits::default()).unwrap();
        assert_eq!(resized.size_x, 2);
        assert_eq!(resized.cell(Coord::new(2, 1)).map(Cell::coord), Some(Coord::new(2, 1)));
    }

    #[test]
    fn test_limits() {
        let limits = GridLimits { max_size_x: 3, max_size_y: 3 };
        let garden = garden_3x3();
        assert_eq!(
            resize_grid(&garden, Step::Grow, Edge::Left, limits),
            Err(GeometryRejection::TooLarge { axis: Axis::Horizontal, max: 3 })
        );

        let thin = Garden::placeholder("Strip", 1, 3);
        assert_eq!(
            resize_grid(&thin, Step::Shrink, Edge::Right, limits),
            Err(GeometryRejection::TooSmall { axis: Axis::Horizontal })
        );
    }

    #[test]
    fn test_resize_never_drops_plants() {
        let mut garden = garden_3x3();
        garden.cells[0][0] = Some(cell_at(0, 0));
        garden.cells[2][2] = Some(cell_at(2, 2));
        let planted = count_plants(&garden.cells);

        for edge in Edge::ALL {
            for step in [Step::Grow, Step::Shrink] {
                if let Ok(resized) = resize_grid(&garden, step, edge, GridLimits::default()) {
                    assert_eq!(count_plants(&resized.cells), planted, "{step:?} {edge}");
                    assert!(resized.has_consistent_dimensions());
                }
            }
        }
    }

    #[test]
    fn test_partition_skips_out_of_bounds() {
        let garden = Garden::placeholder("Plot", 2, 2);
        let partition = partition_selection(
            &garden,
            [Coord::new(0, 0), Coord::new(2, 0), Coord::new(1, 1), Coord::new(0, 5)],
        );
        assert_eq!(partition.in_bounds, vec![Coord::new(0, 0), Coord::new(1, 1)]);
        assert_eq!(partition.out_of_bounds, vec![Coord::new(2, 0), Coord::new(0, 5)]);
    }

    #[test]
    fn test_with_cells_copies() {
        let garden = Garden::placeholder("Plot", 2, 1);
        let grid = with_cells(&garden.cells, [(Coord::new(0, 1), Some(cell_at(0, 1)))]);
        assert!(garden.cells[0][1].is_none());
        assert!(grid[0][1].is_some());
    }

    #[test]
    fn test_step_from_delta() {
        assert_eq!(Step::from_delta(1), Some(Step::Grow));
        assert_eq!(Step::from_delta(-1), Some(Step::Shrink));
        assert_eq!(Step::from_delta(2), None);
        assert_eq!(Step::Shrink.delta(), -1);
    }
}
