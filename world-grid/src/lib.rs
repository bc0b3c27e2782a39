#![deny(clippy::all)]
#![forbid(unsafe_code)]

use arrayvec::ArrayVec;
use rand::distr::uniform::{SampleRange, SampleUniform};
use rand::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fmt::Debug;
use std::mem;
use std::ops::{Index, IndexMut};
use thiserror::Error;

pub trait World {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn update(&mut self);

    /// One string per grid row, top to bottom. Cloning the iterator restarts the rendering.
    fn render(&self) -> impl Iterator<Item = String> + Clone;

    fn render_text(&self) -> String {
        join_rows(self.render())
    }
}

pub fn join_rows<I>(rows: I) -> String
where
    I: IntoIterator<Item = String>,
{
    rows.into_iter().collect::<Vec<_>>().join("\n")
}

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("{name} must be {requirement}, got {value}")]
    InvalidParameter {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },
}

impl ConfigError {
    pub fn check_dimensions(width: u32, height: u32) -> Result<(), Self> {
        if width == 0 || height == 0 {
            Err(ConfigError::InvalidDimensions { width, height })
        } else {
            Ok(())
        }
    }
}

#[derive(Clone, Debug)]
pub struct WorldGrid<C>
where
    C: GridCell,
{
    width: u32,
    height: u32,
    pub cells: WorldGridCells<C>,
    next_cells: WorldGridCells<C>,
}

impl<C> WorldGrid<C>
where
    C: Debug + GridCell,
{
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        ConfigError::check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: WorldGridCells::new(width, height),
            next_cells: WorldGridCells::new(width, height),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &C> + Clone {
        self.cells.cells_iter()
    }

    pub fn cell(&self, loc: Loc) -> Option<&C> {
        self.cells.cell(loc)
    }

    pub fn cell_mut(&mut self, loc: Loc) -> Option<&mut C> {
        self.cells.cell_mut(loc)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Computes every next cell from the current cells, then swaps the buffers.
    pub fn update(&mut self) {
        self.next_cells.copy_from(&self.cells);
        self.update_cells();
        mem::swap(&mut self.next_cells, &mut self.cells);
    }

    fn update_cells(&mut self) {
        for row in 0..self.height() {
            for col in 0..self.width() {
                self.update_cell(Loc::new(row, col));
            }
        }
    }

    fn update_cell(&mut self, loc: Loc) {
        let cell = &self.cells[loc];
        let neighborhood = Neighborhood::new(&self.cells, loc);
        let next_cell = &mut self.next_cells[loc];
        cell.update(&neighborhood, next_cell);
    }

    pub fn render(&self) -> impl Iterator<Item = String> + Clone + '_ {
        self.cells
            .rows()
            .map(|row| row.iter().map(GridCell::glyph).collect())
    }
}

#[derive(Clone, Debug)]
pub struct WorldGridCells<C>
where
    C: GridCell,
{
    cells: Vec<C>,
    width: u32,
    height: u32,
}

impl<C> WorldGridCells<C>
where
    C: GridCell,
{
    fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![C::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &C> + Clone {
        self.cells.iter()
    }

    pub fn cells_iter_mut(&mut self) -> impl Iterator<Item = &mut C> {
        self.cells.iter_mut()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[C]> + Clone {
        self.cells.chunks_exact(self.width as usize)
    }

    pub fn cell(&self, loc: Loc) -> Option<&C> {
        loc.grid_index(self.width, self.height)
            .map(|index| &self.cells[index])
    }

    pub fn cell_mut(&mut self, loc: Loc) -> Option<&mut C> {
        loc.grid_index(self.width, self.height)
            .map(|index| &mut self.cells[index])
    }

    pub fn clear(&mut self) {
        self.cells.fill(C::default());
    }

    pub fn copy_from(&mut self, source: &Self) {
        self.cells.copy_from_slice(&source.cells);
    }
}

impl<C> Index<Loc> for WorldGridCells<C>
where
    C: GridCell,
{
    type Output = C;

    fn index(&self, loc: Loc) -> &Self::Output {
        self.cell(loc)
            .unwrap_or_else(|| panic!("Index indices {}, {} out of bounds", loc.row, loc.col))
    }
}

impl<C> IndexMut<Loc> for WorldGridCells<C>
where
    C: GridCell,
{
    fn index_mut(&mut self, loc: Loc) -> &mut Self::Output {
        self.cell_mut(loc)
            .unwrap_or_else(|| panic!("Index_mut indices {}, {} out of bounds", loc.row, loc.col))
    }
}

pub trait GridCell
where
    Self: Copy + Default,
{
    fn glyph(&self) -> char;
    fn update(&self, neighborhood: &Neighborhood<Self>, next_cell: &mut Self);
}

const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The up to eight in-bounds cells around a center cell. Cells past the grid edge are
/// simply absent, so edges behave as permanently dead.
pub struct Neighborhood<'a, C>
where
    C: GridCell,
{
    cells: &'a WorldGridCells<C>,
    neighbor_locs: ArrayVec<Loc, 8>,
}

impl<'a, C> Neighborhood<'a, C>
where
    C: GridCell,
{
    pub fn new(cells: &'a WorldGridCells<C>, center: Loc) -> Self {
        let neighbor_locs = NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(row_offset, col_offset)| {
                center.offset(row_offset, col_offset, cells.width(), cells.height())
            })
            .collect();
        Self {
            cells,
            neighbor_locs,
        }
    }

    pub fn for_neighbor_cells<F>(&self, mut f: F)
    where
        F: FnMut(&C),
    {
        for &loc in &self.neighbor_locs {
            f(&self.cells[loc]);
        }
    }

    pub fn count_neighbors<P>(&self, mut predicate: P) -> usize
    where
        P: FnMut(&C) -> bool,
    {
        let mut result = 0;
        self.for_neighbor_cells(|neighbor| {
            if predicate(neighbor) {
                result += 1;
            }
        });
        result
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Loc {
    pub row: u32,
    pub col: u32,
}

impl Loc {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn grid_index(&self, width: u32, height: u32) -> Option<usize> {
        if self.row < height && self.col < width {
            Some(self.row as usize * width as usize + self.col as usize)
        } else {
            None
        }
    }

    /// The location shifted by the given offsets, if it stays inside a `width` x `height` grid.
    pub fn offset(&self, row_offset: i64, col_offset: i64, width: u32, height: u32) -> Option<Loc> {
        let row = self.row as i64 + row_offset;
        let col = self.col as i64 + col_offset;
        if (0..height as i64).contains(&row) && (0..width as i64).contains(&col) {
            Some(Loc::new(row as u32, col as u32))
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct Random {
    rng: SmallRng,
}

impl Random {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Panics unless `0.0 <= p <= 1.0`.
    pub fn next_bool(&mut self, p: f64) -> bool {
        self.rng.random_bool(p)
    }

    pub fn next_in_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.rng.random_range(range)
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}
