//! Interpolation between scroll offsets

use crate::geometry::Point;

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Interpolate between two offsets by an eased fraction
///
/// The fraction is clamped to [0, 1] and each axis to its endpoints, so
/// neither an overshooting curve nor rounding moves the offset off the
/// segment.
#[inline]
pub fn lerp_point(from: Point, to: Point, fraction: f64) -> Point {
    let t = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    Point::new(lerp_axis(from.x, to.x, t), lerp_axis(from.y, to.y, t))
}

fn lerp_axis(from: f64, to: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return from;
    }
    if t >= 1.0 {
        return to;
    }
    lerp(from, to, t).clamp(from.min(to), from.max(to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::TimingCurve;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 1.0) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_lerp_point_endpoints() {
        let from = Point::new(10.0, -20.0);
        let to = Point::new(-30.0, 480.0);
        assert_eq!(lerp_point(from, to, 0.0), from);
        assert_eq!(lerp_point(from, to, 1.0), to);
        assert_eq!(lerp_point(from, to, 0.5), Point::new(-10.0, 230.0));
    }

    #[test]
    fn test_lerp_point_clamps_overshoot() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(0.0, 500.0);
        assert_eq!(lerp_point(from, to, 1.3), to);
        assert_eq!(lerp_point(from, to, -0.2), from);
        assert_eq!(lerp_point(from, to, f64::NAN), from);
    }

    #[test]
    fn test_overshooting_curve_stays_on_segment() {
        let curve = TimingCurve::new(0.34, 1.56, 0.64, 1.0);
        let from = Point::new(40.0, 0.0);
        let to = Point::new(0.0, 500.0);

        for i in 0..=50 {
            let p = lerp_point(from, to, curve.evaluate(i as f64 / 50.0));
            assert!((0.0..=40.0).contains(&p.x), "x={} at step {}", p.x, i);
            assert!((0.0..=500.0).contains(&p.y), "y={} at step {}", p.y, i);
        }
    }

    #[test]
    fn test_full_fraction_lands_exactly_on_target() {
        // from + (to - from) * 1.0 rounds one ulp past this target
        let from = Point::new(0.0, 524.5601649158839);
        let to = Point::new(0.0, -995.7878932977786);
        assert_eq!(lerp_point(from, to, 1.0), to);

        let curve = TimingCurve::new(0.34, 1.56, 0.64, 1.0);
        for i in 0..=200 {
            let p = lerp_point(from, to, curve.evaluate(i as f64 / 200.0));
            assert!(p.y >= to.y && p.y <= from.y, "y={} at step {}", p.y, i);
        }
    }
}
