use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A 2D scroll offset in content coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset this point by a delta
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Clamp both axes into `[min, max]`
    pub fn clamp(self, min: Point, max: Point) -> Self {
        Self::new(
            self.x.max(min.x).min(max.x),
            self.y.max(min.y).min(max.y),
        )
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Parses `"x,y"` (whitespace and surrounding parentheses allowed)
impl FromStr for Point {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')');
        let mut parts = inner.split(',').map(str::trim);

        let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::InvalidPoint(format!("expected \"x,y\", got \"{}\"", s)));
        };

        let parse = |v: &str| {
            v.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| Error::InvalidPoint(format!("\"{}\" is not a finite number", v)))
        };

        Ok(Self::new(parse(x)?, parse(y)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!("0,500".parse::<Point>().unwrap(), Point::new(0.0, 500.0));
        assert_eq!(" (12.5, -3) ".parse::<Point>().unwrap(), Point::new(12.5, -3.0));
    }

    #[test]
    fn test_parse_point_rejects_garbage() {
        assert!("1".parse::<Point>().is_err());
        assert!("1,2,3".parse::<Point>().is_err());
        assert!("a,b".parse::<Point>().is_err());
        assert!("inf,0".parse::<Point>().is_err());
    }

    #[test]
    fn test_clamp() {
        let p = Point::new(-5.0, 900.0).clamp(Point::ORIGIN, Point::new(100.0, 500.0));
        assert_eq!(p, Point::new(0.0, 500.0));
    }
}
