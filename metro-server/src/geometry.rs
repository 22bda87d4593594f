//! Planar geometry for station positions.
//!
//! Dataset coordinates are normalized to [0, 1] × [0, 1] and scaled by the
//! map image dimensions. The resulting pixel positions are only a distance
//! proxy for walking estimates, not real geography.

/// A position on the planar (pixel) map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Arithmetic mean of a set of points, or `None` if there are none.
    pub fn centroid<I>(points: I) -> Option<Point>
    where
        I: IntoIterator<Item = Point>,
    {
        let (sum_x, sum_y, count) = points
            .into_iter()
            .fold((0.0, 0.0, 0usize), |(sx, sy, n), p| (sx + p.x, sy + p.y, n + 1));

        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(Point::new(sum_x / n, sum_y / n))
    }
}

/// Scale a normalized `[x, y]` coordinate to pixels.
pub fn scale(coord: [f64; 2], width: f64, height: f64) -> Point {
    Point::new(coord[0] * width, coord[1] * height)
}

/// Euclidean distance between two points.
pub fn distance(p: Point, q: Point) -> f64 {
    (p.x - q.x).hypot(p.y - q.y)
}

/// Walking time in minutes between two points.
///
/// `walk_speed` is in pixels per minute and must be strictly positive;
/// `RouteConfig::validate` guarantees this for configured speeds.
pub fn walk_time(p: Point, q: Point, walk_speed: f64) -> f64 {
    debug_assert!(walk_speed > 0.0, "walk speed must be positive");
    distance(p, q) / walk_speed
}

/// Round a time to 2 decimal places, the precision reported to callers.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_multiplies_by_dimensions() {
        let p = scale([0.5, 0.25], 396.0, 443.0);
        assert_eq!(p, Point::new(198.0, 110.75));
    }

    #[test]
    fn distance_is_euclidean() {
        let p = Point::new(0.0, 0.0);
        let q = Point::new(3.0, 4.0);
        assert_eq!(distance(p, q), 5.0);
        assert_eq!(distance(q, p), 5.0);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn walk_time_divides_by_speed() {
        let p = Point::new(0.0, 0.0);
        let q = Point::new(0.0, 40.0);
        assert_eq!(walk_time(p, q, 20.0), 2.0);
    }

    #[test]
    fn centroid_of_points() {
        let c = Point::centroid([Point::new(0.0, 0.0), Point::new(2.0, 4.0)]).unwrap();
        assert_eq!(c, Point::new(1.0, 2.0));

        let single = Point::centroid([Point::new(7.0, 3.0)]).unwrap();
        assert_eq!(single, Point::new(7.0, 3.0));
    }

    #[test]
    fn centroid_of_nothing() {
        assert!(Point::centroid(std::iter::empty()).is_none());
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.235_000_1), 1.24);
        assert_eq!(round2(3.96), 3.96);
        assert_eq!(round2(4.0), 4.0);
    }
}
