use std::ops::{Index, IndexMut};

use crate::{
    env::{Move, Pos, NUM_ACTIONS},
    Error, Result,
};

/// One value per action
pub type ActionRow = [f32; NUM_ACTIONS];

/// A dense `width` x `height` table holding one [`ActionRow`] per cell
///
/// Used for both the action values and the policy. Indexing with a [`Pos`] panics when the
/// position is outside the table, like slice indexing; the `row`, `get` and `set` accessors
/// return [`Error::OutOfBounds`] instead.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionTable {
    width: usize,
    height: usize,
    rows: Vec<ActionRow>,
}

impl ActionTable {
    /// A table with every entry set to `value`
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            rows: vec![[value; NUM_ACTIONS]; width * height],
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub fn row(&self, pos: Pos) -> Result<&ActionRow> {
        let i = self.checked_offset(pos)?;
        Ok(&self.rows[i])
    }

    pub fn row_mut(&mut self, pos: Pos) -> Result<&mut ActionRow> {
        let i = self.checked_offset(pos)?;
        Ok(&mut self.rows[i])
    }

    pub fn get(&self, pos: Pos, action: Move) -> Result<f32> {
        self.row(pos).map(|row| row[action.index()])
    }

    pub fn set(&mut self, pos: Pos, action: Move, value: f32) -> Result<()> {
        self.row_mut(pos)?[action.index()] = value;
        Ok(())
    }

    /// Overwrite every action of one cell
    pub fn fill_row(&mut self, pos: Pos, value: f32) -> Result<()> {
        *self.row_mut(pos)? = [value; NUM_ACTIONS];
        Ok(())
    }

    /// Every cell with its row, column by column
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &ActionRow)> {
        let h = self.height;
        self.rows
            .iter()
            .enumerate()
            .map(move |(i, row)| (((i / h) as i32, (i % h) as i32), row))
    }

    fn offset(&self, (x, y): Pos) -> Option<usize> {
        (x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height)
            .then(|| x as usize * self.height + y as usize)
    }

    fn checked_offset(&self, pos: Pos) -> Result<usize> {
        self.offset(pos).ok_or(Error::OutOfBounds {
            x: pos.0,
            y: pos.1,
            width: self.width,
            height: self.height,
        })
    }
}

impl Index<Pos> for ActionTable {
    type Output = ActionRow;

    fn index(&self, pos: Pos) -> &Self::Output {
        match self.offset(pos) {
            Some(i) => &self.rows[i],
            None => panic!(
                "position {pos:?} is outside the {}x{} table",
                self.width, self.height
            ),
        }
    }
}

impl IndexMut<Pos> for ActionTable {
    fn index_mut(&mut self, pos: Pos) -> &mut Self::Output {
        match self.offset(pos) {
            Some(i) => &mut self.rows[i],
            None => panic!(
                "position {pos:?} is outside the {}x{} table",
                self.width, self.height
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexing() {
        let mut table = ActionTable::filled(3, 2, 0.0);
        table[(2, 1)][Move::Left.index()] = 4.0;
        table.set((0, 1), Move::Up, -1.0).unwrap();

        assert_eq!(table.get((2, 1), Move::Left), Ok(4.0));
        assert_eq!(table[(0, 1)], [-1.0, 0.0, 0.0, 0.0]);
        assert_eq!(table.row((1, 1)), Ok(&[0.0; NUM_ACTIONS]));
    }

    #[test]
    fn checked_access_out_of_bounds() {
        let mut table = ActionTable::filled(2, 2, 0.25);
        assert!(matches!(
            table.row((2, 0)),
            Err(Error::OutOfBounds { x: 2, y: 0, .. })
        ));
        assert!(table.get((0, -1), Move::Down).is_err());
        assert!(table.set((-1, 0), Move::Down, 1.0).is_err());
        assert!(table.fill_row((5, 5), 0.0).is_err());
    }

    #[test]
    #[should_panic(expected = "outside the 2x2 table")]
    fn index_out_of_bounds_panics() {
        let table = ActionTable::filled(2, 2, 0.0);
        let _ = table[(0, 2)];
    }

    #[test]
    fn iter_positions() {
        let mut table = ActionTable::filled(2, 3, 0.0);
        table.fill_row((1, 2), 7.0).unwrap();
        let cells: Vec<_> = table.iter().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[5], ((1, 2), &[7.0; NUM_ACTIONS]));
        assert_eq!(cells[1].0, (0, 1), "Column-major order");
    }
}
