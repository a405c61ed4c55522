use std::fmt;

use crate::{Error, Result};

/// What occupies a cell of the grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Traversable, clear ground
    #[default]
    Open,
    /// Blocks entry
    Wall,
    /// Ends the episode
    Terminal,
    /// Start marker, moves exactly like [`CellType::Open`]
    Start,
}

impl CellType {
    pub const fn as_char(self) -> char {
        match self {
            CellType::Open => 'C',
            CellType::Wall => 'W',
            CellType::Terminal => 'T',
            CellType::Start => 'S',
        }
    }
}

impl TryFrom<char> for CellType {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        match c {
            'C' => Ok(CellType::Open),
            'W' => Ok(CellType::Wall),
            'T' => Ok(CellType::Terminal),
            'S' => Ok(CellType::Start),
            other => Err(Error::InvalidMap(format!("unknown cell type `{other}`"))),
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A single grid cell
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cell {
    pub kind: CellType,
    pub reward: f32,
}

impl Cell {
    pub const fn new(kind: CellType, reward: f32) -> Self {
        Self { kind, reward }
    }
}

impl TryFrom<(char, f32)> for Cell {
    type Error = Error;

    fn try_from((c, reward): (char, f32)) -> Result<Self> {
        if !reward.is_finite() {
            return Err(Error::InvalidMap(format!("reward `{reward}` is not finite")));
        }
        Ok(Self::new(CellType::try_from(c)?, reward))
    }
}
