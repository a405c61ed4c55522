mod cell;
mod grid_world;
mod map;
mod moves;

pub use cell::{Cell, CellType};
pub use grid_world::GridWorld;
pub use map::BuiltinMap;
pub use moves::{Move, NUM_ACTIONS};

/// A coordinate in the grid, `(x, y)`
///
/// Signed so that positions just off the edge can be represented and rejected.
pub type Pos = (i32, i32);
