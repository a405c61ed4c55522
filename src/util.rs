/// Checks that a numerical value is in the provided interval `[a,b]` and returns early with
/// [`Error::InvalidConfig`](crate::Error::InvalidConfig) if not
///
/// NaN is never in any interval.
///
/// ### Example
/// ```ignore
/// let alpha = 2.0;
/// ensure_interval!(alpha, 0.0, 1.0);
/// ```
/// This returns `Err(Error::InvalidConfig { name: "alpha", value: 2.0 })`.
macro_rules! ensure_interval {
    ($var:ident, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::Error::InvalidConfig {
                name: stringify!($var),
                value: $var,
            });
        }
    };
}

pub(crate) use ensure_interval;

/// Indices of every maximal element of `values`, compared with exact equality
pub(crate) fn argmax_all(values: &[f32]) -> Vec<usize> {
    let best = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == best)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Result};

    fn check(alpha: f32) -> Result<()> {
        ensure_interval!(alpha, 0.0, 1.0);
        Ok(())
    }

    #[test]
    fn ensure_interval_bounds() {
        assert!(check(0.0).is_ok(), "Lower bound is inclusive");
        assert!(check(1.0).is_ok(), "Upper bound is inclusive");
        assert_eq!(
            check(1.5),
            Err(Error::InvalidConfig {
                name: "alpha",
                value: 1.5
            }),
            "Values above the interval are rejected"
        );
        assert!(check(-0.1).is_err(), "Values below the interval are rejected");
        assert!(check(f32::NAN).is_err(), "NaN is rejected");
    }

    #[test]
    fn argmax_all_ties() {
        assert_eq!(argmax_all(&[0.0, 0.0, 0.0, 0.0]), vec![0, 1, 2, 3]);
        assert_eq!(argmax_all(&[1.0, 3.0, 2.0, 3.0]), vec![1, 3]);
        assert_eq!(argmax_all(&[-5.0, -1.0, -2.0, -3.0]), vec![1]);
    }
}
