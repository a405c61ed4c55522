use thiserror::Error;

/// Errors returned by grid world and agent operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("Cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    #[error("Invalid map: {0}")]
    InvalidMap(String),

    #[error("Invalid value for `{name}`: {value} is not in the interval [0, 1]")]
    InvalidConfig { name: &'static str, value: f32 },

    #[error("Every cell is terminal, there is no cell to respawn on")]
    NoRespawnCell,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_display() {
        let e = Error::OutOfBounds {
            x: -1,
            y: 0,
            width: 3,
            height: 2,
        };
        assert_eq!(e.to_string(), "Cell (-1, 0) is outside the 3x2 grid");
    }

    #[test]
    fn invalid_config_display() {
        let e = Error::InvalidConfig {
            name: "alpha",
            value: 1.5,
        };
        assert_eq!(
            e.to_string(),
            "Invalid value for `alpha`: 1.5 is not in the interval [0, 1]"
        );
    }

    #[test]
    fn invalid_map_display() {
        let e = Error::InvalidMap("map has no rows".to_string());
        assert!(e.to_string().contains("map has no rows"));
    }
}
