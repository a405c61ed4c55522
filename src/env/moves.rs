use strum::{EnumCount, EnumIter, FromRepr, VariantArray};

use super::Pos;

/// The four moves available in every cell
///
/// The discriminant is the action index used by the Q and policy tables, so the order here
/// must never change.
#[derive(EnumIter, EnumCount, VariantArray, FromRepr, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

/// Number of actions, and the length of every Q and policy row
pub const NUM_ACTIONS: usize = Move::COUNT;

impl Move {
    /// `(dx, dy)` with `x` growing to the right and `y` growing downward
    pub const fn displacement(self) -> (i32, i32) {
        match self {
            Move::Up => (0, -1),
            Move::Down => (0, 1),
            Move::Left => (-1, 0),
            Move::Right => (1, 0),
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::from_repr(index)
    }

    /// The position reached from `pos` ignoring walls and bounds
    pub fn apply(self, pos: Pos) -> Pos {
        let (dx, dy) = self.displacement();
        (pos.0 + dx, pos.1 + dy)
    }

    pub const fn arrow(self) -> char {
        match self {
            Move::Up => '^',
            Move::Down => 'v',
            Move::Left => '<',
            Move::Right => '>',
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn index_round_trip() {
        for m in Move::iter() {
            assert_eq!(Move::from_index(m.index()), Some(m), "Index maps back to {m:?}");
        }
        assert_eq!(Move::from_index(NUM_ACTIONS), None, "No fifth move");
    }

    #[test]
    fn displacements_are_unit_neighbours() {
        for m in Move::VARIANTS {
            let (dx, dy) = m.displacement();
            assert_eq!(dx.abs() + dy.abs(), 1, "{m:?} moves exactly one cell");
        }
        assert_eq!(Move::Right.apply((1, 1)), (2, 1));
        assert_eq!(Move::Up.apply((0, 0)), (0, -1), "apply does not clamp");
    }
}
