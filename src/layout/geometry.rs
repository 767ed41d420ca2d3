use crate::ir::Point;

/// Below this length a vector is treated as having no direction.
pub(super) const DIRECTION_EPSILON: f32 = 1e-4;

pub(super) fn lerp(a: Point, b: Point, t: f32) -> Point {
    (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
}

pub(super) fn distance(a: Point, b: Point) -> f32 {
    (b.0 - a.0).hypot(b.1 - a.1)
}

/// Unit vector from `a` to `b`, or `None` when the points coincide.
pub(super) fn direction(a: Point, b: Point) -> Option<Point> {
    let len = distance(a, b);
    if len < DIRECTION_EPSILON || !len.is_finite() {
        return None;
    }
    Some(((b.0 - a.0) / len, (b.1 - a.1) / len))
}

pub(super) fn quad_point(p0: Point, c: Point, p1: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    (
        mt * mt * p0.0 + 2.0 * mt * t * c.0 + t * t * p1.0,
        mt * mt * p0.1 + 2.0 * mt * t * c.1 + t * t * p1.1,
    )
}

pub(super) fn cubic_point(p0: Point, c1: Point, c2: Point, p1: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    (
        a * p0.0 + b * c1.0 + c * c2.0 + d * p1.0,
        a * p0.1 + b * c1.1 + c * c2.1 + d * p1.1,
    )
}

pub(super) fn cubic_derivative(p0: Point, c1: Point, c2: Point, p1: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    let a = 3.0 * mt * mt;
    let b = 6.0 * mt * t;
    let c = 3.0 * t * t;
    (
        a * (c1.0 - p0.0) + b * (c2.0 - c1.0) + c * (p1.0 - c2.0),
        a * (c1.1 - p0.1) + b * (c2.1 - c1.1) + c * (p1.1 - c2.1),
    )
}

/// Samples `curve` at `samples + 1` evenly spaced parameters and returns the
/// point where the cumulative chord length first reaches `fraction` of the
/// total.
pub(super) fn point_at_length_fraction(
    curve: impl Fn(f32) -> Point,
    samples: usize,
    fraction: f32,
) -> Point {
    let samples = samples.max(2);
    let points: Vec<Point> = (0..=samples)
        .map(|i| curve(i as f32 / samples as f32))
        .collect();
    let total: f32 = points.windows(2).map(|w| distance(w[0], w[1])).sum();
    let target = total * fraction.clamp(0.0, 1.0);
    let mut walked = 0.0;
    for w in points.windows(2) {
        let step = distance(w[0], w[1]);
        if walked + step >= target && step > 0.0 {
            return lerp(w[0], w[1], (target - walked) / step);
        }
        walked += step;
    }
    points[samples]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincident_points_have_no_direction() {
        assert_eq!(direction((3.0, 4.0), (3.0, 4.0)), None);
        assert_eq!(direction((0.0, 0.0), (0.0, 5.0)), Some((0.0, 1.0)));
    }

    #[test]
    fn curve_endpoints_are_exact() {
        let (p0, c1, c2, p1) = ((0.0, 0.0), (50.0, 0.0), (50.0, 100.0), (100.0, 100.0));
        assert_eq!(cubic_point(p0, c1, c2, p1, 0.0), p0);
        assert_eq!(cubic_point(p0, c1, c2, p1, 1.0), p1);
        assert_eq!(quad_point(p0, c1, p1, 0.5), (50.0, 25.0));
        let d = cubic_derivative(p0, c1, c2, p1, 0.5);
        assert!(d.0 > 0.0 && d.1 > 0.0);
    }

    #[test]
    fn arclength_fraction_on_a_line() {
        let p = point_at_length_fraction(|t| lerp((0.0, 0.0), (200.0, 0.0), t), 16, 0.95);
        assert!((p.0 - 190.0).abs() < 1e-3);
        assert_eq!(p.1, 0.0);
    }
}
