//! Cubic Bézier timing curves
//!
//! A curve is defined by two control points; the endpoints are fixed at
//! (0,0) and (1,1). Evaluating the curve at normalized time `t` finds the
//! curve parameter whose x-coordinate equals `t` and returns the matching
//! y-coordinate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Tolerance on x when solving for the curve parameter
const SOLVE_EPSILON: f64 = 1e-7;
/// Newton-Raphson iterations before falling back to bisection
const NEWTON_ITERATIONS: usize = 8;
/// Upper bound on bisection steps (well past f64 precision on [0,1])
const BISECTION_ITERATIONS: usize = 64;

/// Timing curve with control points `p1 = (x1, y1)` and `p2 = (x2, y2)`
///
/// x values are expected in [0, 1] for the curve to be a function of time.
/// y values are unbounded, which allows overshooting curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingCurve {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Default for TimingCurve {
    fn default() -> Self {
        Self::EASE
    }
}

impl TimingCurve {
    pub const EASE: TimingCurve = TimingCurve::new(0.25, 0.1, 0.25, 1.0);
    pub const LINEAR: TimingCurve = TimingCurve::new(0.0, 0.0, 1.0, 1.0);
    pub const EASE_IN: TimingCurve = TimingCurve::new(0.42, 0.0, 1.0, 1.0);
    pub const EASE_OUT: TimingCurve = TimingCurve::new(0.0, 0.0, 0.58, 1.0);
    pub const EASE_IN_OUT: TimingCurve = TimingCurve::new(0.42, 0.0, 0.58, 1.0);

    /// Named presets, in display order
    pub const PRESETS: [(&'static str, TimingCurve); 5] = [
        ("ease", Self::EASE),
        ("linear", Self::LINEAR),
        ("ease-in", Self::EASE_IN),
        ("ease-out", Self::EASE_OUT),
        ("ease-in-out", Self::EASE_IN_OUT),
    ];

    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Preset name if this curve is one of the named presets
    pub fn name(&self) -> Option<&'static str> {
        Self::PRESETS
            .iter()
            .find(|(_, curve)| curve == self)
            .map(|(name, _)| *name)
    }

    /// Eased progress for normalized time `t`
    ///
    /// `t` is clamped to [0, 1]. The endpoints are returned exactly.
    pub fn evaluate(&self, t: f64) -> f64 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        let x = Polynomial::new(self.x1, self.x2);
        let y = Polynomial::new(self.y1, self.y2);
        y.sample(x.solve(t))
    }
}

/// Power-basis form of one axis of the curve: `((a*s + b)*s + c)*s`
#[derive(Debug, Clone, Copy)]
struct Polynomial {
    a: f64,
    b: f64,
    c: f64,
}

impl Polynomial {
    fn new(p1: f64, p2: f64) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        Self { a, b, c }
    }

    #[inline]
    fn sample(&self, s: f64) -> f64 {
        ((self.a * s + self.b) * s + self.c) * s
    }

    #[inline]
    fn derivative(&self, s: f64) -> f64 {
        (3.0 * self.a * s + 2.0 * self.b) * s + self.c
    }

    /// Find the parameter `s` in [0, 1] with `sample(s) == target`
    fn solve(&self, target: f64) -> f64 {
        let mut s = target;
        for _ in 0..NEWTON_ITERATIONS {
            let err = self.sample(s) - target;
            if err.abs() < SOLVE_EPSILON {
                return s;
            }
            let slope = self.derivative(s);
            if slope.abs() < 1e-6 {
                break;
            }
            s -= err / slope;
            if !(0.0..=1.0).contains(&s) {
                break;
            }
        }

        // Newton failed to converge; bisect
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        s = target;
        for _ in 0..BISECTION_ITERATIONS {
            let x = self.sample(s);
            if (x - target).abs() < SOLVE_EPSILON {
                break;
            }
            if x < target {
                lo = s;
            } else {
                hi = s;
            }
            s = 0.5 * (lo + hi);
        }
        s
    }
}

impl fmt::Display for TimingCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(
                f,
                "cubic-bezier({}, {}, {}, {})",
                self.x1, self.y1, self.x2, self.y2
            ),
        }
    }
}

/// Accepts a preset name, `cubic-bezier(x1, y1, x2, y2)`, or `x1,y1,x2,y2`
impl FromStr for TimingCurve {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");

        match normalized.as_str() {
            "default" | "ease" => return Ok(Self::EASE),
            "linear" => return Ok(Self::LINEAR),
            "ease-in" | "easein" => return Ok(Self::EASE_IN),
            "ease-out" | "easeout" => return Ok(Self::EASE_OUT),
            "ease-in-out" | "easeinout" | "ease-in-ease-out" => return Ok(Self::EASE_IN_OUT),
            _ => {}
        }

        let args = normalized
            .strip_prefix("cubic-bezier")
            .map(|rest| rest.trim().trim_start_matches('(').trim_end_matches(')'))
            .unwrap_or(&normalized);

        let values = args
            .split(',')
            .map(|v| {
                v.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| Error::InvalidCurve(format!("\"{}\" is not a finite number", v.trim())))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [x1, y1, x2, y2] => Ok(Self::new(*x1, *y1, *x2, *y2)),
            _ => Err(Error::InvalidCurve(format!(
                "expected a preset name or four control values, got \"{}\"",
                s.trim()
            ))),
        }
    }
}

impl Serialize for TimingCurve {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

// Accept a string, a `[x1, y1, x2, y2]` array, or a `{ x1, y1, x2, y2 }` table
impl<'de> Deserialize<'de> for TimingCurve {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, SeqAccess, Visitor};

        struct TimingCurveVisitor;

        impl<'de> Visitor<'de> for TimingCurveVisitor {
            type Value = TimingCurve;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(
                    "a curve name, \"cubic-bezier(x1, y1, x2, y2)\", an array of four numbers, or a map with x1, y1, x2, y2",
                )
            }

            fn visit_str<E>(self, value: &str) -> Result<TimingCurve, E>
            where
                E: de::Error,
            {
                value.parse().map_err(de::Error::custom)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<TimingCurve, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut values = [0.0_f64; 4];
                for (i, slot) in values.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::invalid_length(i, &self))?;
                }
                if seq.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(5, &self));
                }
                Ok(TimingCurve::new(values[0], values[1], values[2], values[3]))
            }

            fn visit_map<M>(self, mut map: M) -> Result<TimingCurve, M::Error>
            where
                M: MapAccess<'de>,
            {
                let (mut x1, mut y1, mut x2, mut y2) = (None, None, None, None);

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "x1" => x1 = Some(map.next_value()?),
                        "y1" => y1 = Some(map.next_value()?),
                        "x2" => x2 = Some(map.next_value()?),
                        "y2" => y2 = Some(map.next_value()?),
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                Ok(TimingCurve::new(
                    x1.ok_or_else(|| de::Error::missing_field("x1"))?,
                    y1.ok_or_else(|| de::Error::missing_field("y1"))?,
                    x2.ok_or_else(|| de::Error::missing_field("x2"))?,
                    y2.ok_or_else(|| de::Error::missing_field("y2"))?,
                ))
            }
        }

        deserializer.deserialize_any(TimingCurveVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OVERSHOOT: TimingCurve = TimingCurve::new(0.34, 1.56, 0.64, 1.0);

    #[test]
    fn test_endpoints_are_exact() {
        for (name, curve) in TimingCurve::PRESETS {
            assert_eq!(curve.evaluate(0.0), 0.0, "{} at t=0", name);
            assert_eq!(curve.evaluate(1.0), 1.0, "{} at t=1", name);
        }
        assert_eq!(OVERSHOOT.evaluate(0.0), 0.0);
        assert_eq!(OVERSHOOT.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(TimingCurve::EASE.evaluate(-0.5), 0.0);
        assert_eq!(TimingCurve::EASE.evaluate(1.5), 1.0);
        assert_eq!(TimingCurve::EASE.evaluate(f64::NAN), 0.0);
    }

    #[test]
    fn test_linear_is_identity() {
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            assert!((TimingCurve::LINEAR.evaluate(t) - t).abs() < 1e-6, "t={}", t);
        }
    }

    #[test]
    fn test_ease_known_value() {
        // cubic-bezier(0.25, 0.1, 0.25, 1.0) at x = 0.5
        let y = TimingCurve::EASE.evaluate(0.5);
        assert!((y - 0.8024).abs() < 1e-3, "got {}", y);
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let curve = TimingCurve::EASE_IN_OUT;
        for i in 1..10 {
            let t = i as f64 / 10.0;
            let sum = curve.evaluate(t) + curve.evaluate(1.0 - t);
            assert!((sum - 1.0).abs() < 1e-5, "t={} sum={}", t, sum);
        }
    }

    #[test]
    fn test_presets_are_monotonic() {
        for (name, curve) in TimingCurve::PRESETS {
            let mut prev = 0.0;
            for i in 0..=100 {
                let t = i as f64 / 100.0;
                let v = curve.evaluate(t);
                assert!(v >= prev - 1e-9, "{} not monotonic at t={}", name, t);
                prev = v;
            }
        }
    }

    #[test]
    fn test_overshoot_leaves_unit_range() {
        let peak = (0..=100)
            .map(|i| OVERSHOOT.evaluate(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.05, "peak {}", peak);
    }

    #[test]
    fn test_parse_presets() {
        assert_eq!("ease".parse::<TimingCurve>().unwrap(), TimingCurve::EASE);
        assert_eq!("default".parse::<TimingCurve>().unwrap(), TimingCurve::EASE);
        assert_eq!("Ease_In_Out".parse::<TimingCurve>().unwrap(), TimingCurve::EASE_IN_OUT);
        assert_eq!("linear".parse::<TimingCurve>().unwrap(), TimingCurve::LINEAR);
    }

    #[test]
    fn test_parse_control_points() {
        let curve: TimingCurve = "cubic-bezier(0.34, 1.56, 0.64, 1)".parse().unwrap();
        assert_eq!(curve, OVERSHOOT);
        let curve: TimingCurve = "0.34,1.56,0.64,1".parse().unwrap();
        assert_eq!(curve, OVERSHOOT);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("bouncy".parse::<TimingCurve>().is_err());
        assert!("cubic-bezier(0.1, 0.2, 0.3)".parse::<TimingCurve>().is_err());
        assert!("0.1, x, 0.3, 0.4".parse::<TimingCurve>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        assert_eq!(TimingCurve::EASE_OUT.to_string(), "ease-out");
        let text = OVERSHOOT.to_string();
        assert_eq!(text, "cubic-bezier(0.34, 1.56, 0.64, 1)");
        assert_eq!(text.parse::<TimingCurve>().unwrap(), OVERSHOOT);
    }

    #[test]
    fn test_deserialize_forms() {
        #[derive(Deserialize)]
        struct Doc {
            a: TimingCurve,
            b: TimingCurve,
            c: TimingCurve,
        }

        let doc: Doc = toml::from_str(
            r#"
            a = "ease-in"
            b = [0.34, 1.56, 0.64, 1.0]
            c = { x1 = 0.0, y1 = 0.0, x2 = 0.58, y2 = 1.0 }
            "#,
        )
        .unwrap();

        assert_eq!(doc.a, TimingCurve::EASE_IN);
        assert_eq!(doc.b, OVERSHOOT);
        assert_eq!(doc.c, TimingCurve::EASE_OUT);
    }
}
