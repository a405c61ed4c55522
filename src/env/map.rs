use std::str::FromStr;

use strum::{EnumIter, VariantArray};

use super::{CellType, GridWorld};
use crate::{Error, Result};

/// Parses a text map
///
/// One row per line, cells separated by whitespace. Each cell is a type character optionally
/// followed by `:` and a reward, e.g. `C:-1`, `T:100` or `W`. Blank lines and lines starting
/// with `#` are skipped.
impl FromStr for GridWorld {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.split_whitespace().map(parse_token).collect())
            .collect::<Result<Vec<Vec<_>>>>()?;

        GridWorld::from_rows(&rows)
    }
}

fn parse_token(token: &str) -> Result<(char, f32)> {
    let (tag, reward) = token.split_once(':').unwrap_or((token, "0"));
    let mut chars = tag.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(Error::InvalidMap(format!("malformed cell `{token}`")));
    };
    let reward = reward
        .parse::<f32>()
        .map_err(|_| Error::InvalidMap(format!("malformed reward in cell `{token}`")))?;
    Ok((c, reward))
}

/// Maps bundled with the crate
///
/// Open cells cost `-1` to leave, so the learned values measure distance to the nearest
/// terminal. `!` cells are pits costing `-10`.
#[derive(EnumIter, VariantArray, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinMap {
    Tiny,
    Mini,
    Default,
    Large,
}

const STEP_COST: f32 = -1.0;
const PIT_COST: f32 = -10.0;

impl BuiltinMap {
    fn layout(self) -> &'static str {
        match self {
            BuiltinMap::Tiny => TINY,
            BuiltinMap::Mini => MINI,
            BuiltinMap::Default => DEFAULT,
            BuiltinMap::Large => LARGE,
        }
    }

    pub fn build(self) -> Result<GridWorld> {
        let rows = self
            .layout()
            .lines()
            .map(|line| line.chars().map(legend).collect())
            .collect::<Result<Vec<Vec<_>>>>()?;
        GridWorld::from_rows(&rows)
    }
}

fn legend(c: char) -> Result<(char, f32)> {
    let cell = match c {
        '.' => (CellType::Open, STEP_COST),
        '!' => (CellType::Open, PIT_COST),
        '#' => (CellType::Wall, 0.0),
        'T' => (CellType::Terminal, 0.0),
        'S' => (CellType::Start, STEP_COST),
        other => return Err(Error::InvalidMap(format!("unknown layout symbol `{other}`"))),
    };
    Ok((cell.0.as_char(), cell.1))
}

const TINY: &str = "\
S...
.##.
....
##.T";

const MINI: &str = "\
S.....
.####.
...!#.
###.#.
....#.
T#....";

const DEFAULT: &str = "\
S.........
.###..###.
...#..#...
...#..#...
.#......#.
.#..!!..#.
...#..#...
...#..#...
.###..###.
.........T";

const LARGE: &str = "\
S...................
.##########.#######.
.#........#.#.....#.
.#.######.#.#.###.#.
.#.#....#.#...#...#.
.#.#.##.#.#####.###.
.#.#..#.#.......#...
.#.##.#.#########.#.
.#....#...........#.
.######.#########.#.
........#.......#.#.
.######.#.#####.#.#.
.#....#.#.#...#.#.#.
.#.##.#.#.#.#.#.#.#.
.#.#!.#...#.#...#.#.
.#.####.###.#####.#.
.#......#...#.....#.
.########.###.#####.
..........#........T
!!!!!!!!!.#.........";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_text_map() {
        let world: GridWorld = "
            # two rows
            C:-1 W T:100
            S:-1 C C:-0.5
        "
        .parse()
        .unwrap();

        assert_eq!((world.width(), world.height()), (3, 2));
        assert_eq!(world.cell_type(1, 0), Ok(CellType::Wall));
        assert_eq!(world.reward(2, 0), Ok(100.0));
        assert_eq!(world.cell_type(0, 1), Ok(CellType::Start));
        assert_eq!(world.reward(1, 1), Ok(0.0), "Reward defaults to 0");
        assert_eq!(world.reward(2, 1), Ok(-0.5));
    }

    #[test]
    fn display_parses_back() {
        let world = BuiltinMap::Mini.build().unwrap();
        let reparsed: GridWorld = world.to_string().parse().unwrap();
        assert_eq!(reparsed, world);
    }

    #[test]
    fn malformed_text_maps() {
        assert!("".parse::<GridWorld>().is_err(), "Empty");
        assert!("C C\nC".parse::<GridWorld>().is_err(), "Ragged");
        assert!("C:abc".parse::<GridWorld>().is_err(), "Bad reward");
        assert!("CW:1".parse::<GridWorld>().is_err(), "Two tags in one cell");
        assert!("X:1".parse::<GridWorld>().is_err(), "Unknown tag");
    }

    #[test]
    fn builtin_maps_are_valid() {
        for map in BuiltinMap::VARIANTS {
            let world = map.build().unwrap();
            assert!(world.count(CellType::Terminal) >= 1, "{map:?} has a goal");
            assert!(world.count(CellType::Open) >= 1, "{map:?} has open cells");
            assert!(!world.is_blocked(0, 0), "{map:?} starts on clear ground");
        }
        let large = BuiltinMap::Large.build().unwrap();
        assert_eq!((large.width(), large.height()), (20, 20));
    }
}
