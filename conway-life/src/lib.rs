#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod patterns;

pub use patterns::{Pattern, UnknownPatternError};
pub use world_grid::{ConfigError, Random, World};

use log::{debug, trace};
use world_grid::{GridCell, Loc, Neighborhood, WorldGrid};

pub const DEFAULT_DENSITY: f64 = 0.3;
pub const ALIVE_GLYPH: char = '█';
pub const DEAD_GLYPH: char = ' ';

/// Conway's Game of Life on a grid with closed edges: cells beyond the border count as dead.
#[derive(Debug)]
pub struct ConwayWorld {
    grid: WorldGrid<ConwayGridCell>,
    rand: Random,
    generation: u64,
}

impl ConwayWorld {
    pub fn new(width: u32, height: u32, rand: Random) -> Result<Self, ConfigError> {
        let grid = WorldGrid::new(width, height)?;
        debug!("created {width}x{height} life grid");
        Ok(Self {
            grid,
            rand,
            generation: 0,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_alive(&self, row: u32, col: u32) -> bool {
        self.grid
            .cell(Loc::new(row, col))
            .is_some_and(|cell| cell.alive)
    }

    pub fn live_cell_count(&self) -> usize {
        self.grid.cells_iter().filter(|cell| cell.alive).count()
    }

    /// Makes each cell alive with probability `density`, replacing the whole grid.
    /// Densities outside `[0, 1]` are clamped and NaN counts as zero.
    pub fn randomize(&mut self, density: f64) {
        let density = if density.is_nan() {
            0.0
        } else {
            density.clamp(0.0, 1.0)
        };
        debug!("randomizing life grid with density {density}");
        for cell in self.grid.cells.cells_iter_mut() {
            cell.alive = self.rand.next_bool(density);
        }
    }

    /// Clears the grid, then loads the named pattern. An unknown name leaves the grid
    /// cleared and is reported to the caller.
    pub fn load_pattern(&mut self, name: &str) -> Result<(), UnknownPatternError> {
        self.grid.clear();
        let pattern = name.parse::<Pattern>()?;
        self.load(pattern);
        Ok(())
    }

    pub fn load(&mut self, pattern: Pattern) {
        debug!("loading pattern {pattern}");
        self.grid.clear();
        match pattern.cells() {
            Some(cells) => self.stamp(cells, pattern.origin()),
            None => self.randomize(DEFAULT_DENSITY),
        }
    }

    /// Cells landing outside the grid are dropped.
    fn stamp(&mut self, cells: &[(u32, u32)], origin: Loc) {
        for &(row, col) in cells {
            let loc = Loc::new(origin.row + row, origin.col + col);
            if let Some(cell) = self.grid.cell_mut(loc) {
                cell.alive = true;
            }
        }
    }

    pub fn step(&mut self) {
        self.grid.update();
        self.generation += 1;
        trace!("life generation {}", self.generation);
    }
}

impl World for ConwayWorld {
    fn width(&self) -> u32 {
        self.grid.width()
    }

    fn height(&self) -> u32 {
        self.grid.height()
    }

    fn update(&mut self) {
        self.step();
    }

    fn render(&self) -> impl Iterator<Item = String> + Clone {
        self.grid.render()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ConwayGridCell {
    pub alive: bool,
}

impl ConwayGridCell {
    fn num_live_neighbors(neighborhood: &Neighborhood<ConwayGridCell>) -> usize {
        neighborhood.count_neighbors(|neighbor| neighbor.alive)
    }
}

/// Survival on 2 or 3 live neighbors, birth on exactly 3.
pub fn next_state(alive: bool, live_neighbors: usize) -> bool {
    matches!((alive, live_neighbors), (true, 2) | (_, 3))
}

impl GridCell for ConwayGridCell {
    fn glyph(&self) -> char {
        if self.alive { ALIVE_GLYPH } else { DEAD_GLYPH }
    }

    fn update(&self, neighborhood: &Neighborhood<ConwayGridCell>, next_cell: &mut ConwayGridCell) {
        next_cell.alive = next_state(self.alive, Self::num_live_neighbors(neighborhood));
    }
}
