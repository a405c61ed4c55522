use std::fmt;

use super::{Cell, CellType, Move, Pos, NUM_ACTIONS};
use crate::{Error, Result};

/// A fixed-size grid of typed, rewarded cells with deterministic four-neighbour movement
///
/// The shape never changes after construction but every cell's type and reward can be
/// overwritten at any time. Coordinates are `(x, y)` with `x` the column and `y` the row.
#[derive(Clone, Debug, PartialEq)]
pub struct GridWorld {
    width: usize,
    height: usize,
    /// Column-major: `cells[x * height + y]`
    cells: Vec<Cell>,
}

impl GridWorld {
    /// A `width` x `height` grid of open cells with zero reward
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidMap(format!(
                "grid must not be empty, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        })
    }

    /// Build a grid from map rows, where `rows[y][x]` is a `(type_char, reward)` pair
    ///
    /// **Errors** with [`Error::InvalidMap`] if there are no rows, the rows differ in length,
    /// or any cell is malformed.
    pub fn from_rows(rows: &[Vec<(char, f32)>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut world = Self::new(width, height)?;

        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(Error::InvalidMap(format!(
                    "row {y} has {} cells, expected {width}",
                    row.len()
                )));
            }
            for (x, &pair) in row.iter().enumerate() {
                let i = world.offset(x, y);
                world.cells[i] = Cell::try_from(pair)?;
            }
        }

        Ok(world)
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn cell_type(&self, x: i32, y: i32) -> Result<CellType> {
        self.cell(x, y).map(|c| c.kind)
    }

    pub fn reward(&self, x: i32, y: i32) -> Result<f32> {
        self.cell(x, y).map(|c| c.reward)
    }

    pub fn cell(&self, x: i32, y: i32) -> Result<&Cell> {
        let i = self.checked_offset(x, y)?;
        Ok(&self.cells[i])
    }

    pub fn set_type(&mut self, x: i32, y: i32, kind: CellType) -> Result<()> {
        let i = self.checked_offset(x, y)?;
        self.cells[i].kind = kind;
        Ok(())
    }

    pub fn set_reward(&mut self, x: i32, y: i32, reward: f32) -> Result<()> {
        let i = self.checked_offset(x, y)?;
        self.cells[i].reward = reward;
        Ok(())
    }

    /// Out of bounds is never terminal
    pub fn is_terminal(&self, x: i32, y: i32) -> bool {
        self.kind_at(x, y) == Some(CellType::Terminal)
    }

    /// Out of bounds is not a wall, but [`GridWorld::next_state`] still bumps against it
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.kind_at(x, y) == Some(CellType::Wall)
    }

    /// Deterministic transition from `pos` taking `action`
    ///
    /// Moving off the grid or into a wall leaves the position unchanged (a bump).
    pub fn next_state(&self, pos: Pos, action: Move) -> Pos {
        let (nx, ny) = action.apply(pos);
        if !self.is_in_bounds(nx, ny) || self.is_blocked(nx, ny) {
            pos
        } else {
            (nx, ny)
        }
    }

    pub const fn action_count(&self) -> usize {
        NUM_ACTIONS
    }

    /// Displacement of the action with the given table index
    pub fn action_displacement(&self, action: usize) -> Option<(i32, i32)> {
        Move::from_index(action).map(Move::displacement)
    }

    /// Every valid coordinate, column by column
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..w).flat_map(move |x| (0..h).map(move |y| (x, y)))
    }

    /// Number of cells of the given type
    pub fn count(&self, kind: CellType) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }

    fn kind_at(&self, x: i32, y: i32) -> Option<CellType> {
        self.is_in_bounds(x, y)
            .then(|| self.cells[self.offset(x as usize, y as usize)].kind)
    }

    fn checked_offset(&self, x: i32, y: i32) -> Result<usize> {
        if self.is_in_bounds(x, y) {
            Ok(self.offset(x as usize, y as usize))
        } else {
            Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        x * self.height + y
    }
}

/// Renders the map in the text format accepted by [`str::parse`]
impl fmt::Display for GridWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[self.offset(x, y)];
                if x > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}:{}", cell.kind, cell.reward)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
