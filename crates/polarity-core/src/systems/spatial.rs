//! Spatial Index System
//!
//! Buckets agents into a uniform grid over ideology × social space so
//! affective repulsion only compares agents in neighboring cells.

use bevy_ecs::prelude::*;
use std::collections::HashMap;

use crate::components::agent::{AgentId, Population};

/// Cells per axis
pub const GRID_CELLS: f64 = 10.0;

/// Ideology range mapped onto the grid's x axis
pub const GRID_IDEOLOGY_MIN: f64 = -1.2;
pub const GRID_IDEOLOGY_MAX: f64 = 1.2;

/// Grid coordinates of a cell
pub type CellKey = (i32, i32);

/// Cell containing the point `(x, y)`.
pub fn cell_of(x: f64, y: f64) -> CellKey {
    let scaled_x = (x - GRID_IDEOLOGY_MIN) / (GRID_IDEOLOGY_MAX - GRID_IDEOLOGY_MIN);
    ((scaled_x * GRID_CELLS).floor() as i32, (y * GRID_CELLS).floor() as i32)
}

/// Resource tracking agents by grid cell
///
/// Neighborhood queries are approximate: they return everything in the 3×3
/// block around a point, which may include agents more than one cell width
/// away and miss true neighbors just outside the block.
#[derive(Resource, Debug, Default)]
pub struct SpatialIndex {
    cells: HashMap<CellKey, Vec<AgentId>>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all cell data (called before rebuilding)
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, id: AgentId, x: f64, y: f64) {
        self.cells.entry(cell_of(x, y)).or_default().push(id);
    }

    /// Replaces the index contents with the current population.
    pub fn rebuild(&mut self, population: &Population) {
        self.clear();
        for agent in population.agents() {
            self.insert(agent.id, agent.x, agent.y);
        }
    }

    /// Agents bucketed in a single cell
    pub fn cell(&self, key: CellKey) -> &[AgentId] {
        self.cells.get(&key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Agents in the cell containing `(x, y)` and its 8 neighbors.
    ///
    /// The agent at `(x, y)` itself is included; callers skip it.
    pub fn neighborhood(&self, x: f64, y: f64) -> impl Iterator<Item = AgentId> + '_ {
        let (bx, by) = cell_of(x, y);
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| (bx + dx, by + dy)))
            .filter_map(move |key| self.cells.get(&key))
            .flat_map(|ids| ids.iter().copied())
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn total(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }
}

/// System to rebuild the spatial index from scratch each step
pub fn rebuild_spatial_index(population: Res<Population>, mut index: ResMut<SpatialIndex>) {
    index.rebuild(&population);
}
