//! Path geometry queries
//!
//! Finds the point of the drawn paths (or the default ramp) nearest to the
//! ball and decides whether the ball is resting on it.

use glam::Vec2;

use super::state::Path;
use crate::consts::{RAMP_EXTENT, RAMP_MARGIN};
use crate::settings::Canvas;
use crate::{angle_of, direction_from_angle};

/// A straight piece of a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Closest point on the closed segment
    ///
    /// Zero-length segments collapse to their single point.
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let ab = self.b - self.a;
        let len_sq = ab.length_squared();
        if len_sq == 0.0 {
            return self.a;
        }
        let t = ((p - self.a).dot(ab) / len_sq).clamp(0.0, 1.0);
        self.a + ab * t
    }

    /// Both ends coincide (a repeated pointer sample)
    #[inline]
    pub fn is_point(&self) -> bool {
        self.a == self.b
    }

    #[inline]
    pub fn distance_to(&self, p: Vec2) -> f32 {
        (p - self.closest_point(p)).length()
    }

    /// Angle from horizontal, measured from `a` towards `b`
    #[inline]
    pub fn angle(&self) -> f32 {
        angle_of(self.b - self.a)
    }

    /// Unit vector from `a` towards `b`
    #[inline]
    pub fn direction(&self) -> Vec2 {
        direction_from_angle(self.angle())
    }
}

/// The built-in incline used when nothing has been drawn
///
/// Starts near the top-left corner and runs down at the slope angle until it
/// meets the floor line at 90% of the canvas height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub start: Vec2,
    pub end: Vec2,
    /// Incline angle in radians
    pub angle: f32,
    /// Height of the floor the incline runs into
    pub floor_y: f32,
}

impl Ramp {
    pub fn new(slope_angle_deg: f32, canvas: Canvas) -> Self {
        let angle = slope_angle_deg.to_radians();
        let start = Vec2::new(canvas.width * RAMP_MARGIN, canvas.height * RAMP_MARGIN);
        let rise = canvas.height * RAMP_EXTENT;
        let floor_y = start.y + rise;
        let length = rise / angle.sin();
        let end = Vec2::new(start.x + length * angle.cos(), floor_y);

        Self {
            start,
            end,
            angle,
            floor_y,
        }
    }

    #[inline]
    pub fn segment(&self) -> Segment {
        Segment::new(self.start, self.end)
    }

    /// Downhill unit vector of the incline
    #[inline]
    pub fn direction(&self) -> Vec2 {
        direction_from_angle(self.angle)
    }
}

/// What the ball can roll on this tick
#[derive(Debug, Clone, Copy)]
pub enum Surface<'a> {
    /// User-drawn polylines
    Paths(&'a [Path]),
    /// Nothing drawn yet: the default incline
    Ramp(Ramp),
}

impl<'a> Surface<'a> {
    /// Drawn paths win; an empty path list falls back to the ramp
    pub fn new(paths: &'a [Path], ramp: Ramp) -> Self {
        if paths.is_empty() {
            Surface::Ramp(ramp)
        } else {
            Surface::Paths(paths)
        }
    }

    /// Where a reset ball is placed
    pub fn start_point(&self) -> Vec2 {
        match self {
            Surface::Ramp(ramp) => ramp.start,
            Surface::Paths(paths) => paths
                .first()
                .and_then(Path::first)
                .unwrap_or(Vec2::ZERO),
        }
    }
}

/// Nearest piece of geometry found by [`classify`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    pub segment: Segment,
    pub point: Vec2,
}

/// Result of a proximity query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    /// Distance to the nearest segment is strictly below the ball radius
    pub on_geometry: bool,
    pub nearest: Option<Nearest>,
    /// Infinite when there is no segment at all
    pub distance: f32,
}

impl Proximity {
    fn none() -> Self {
        Self {
            on_geometry: false,
            nearest: None,
            distance: f32::INFINITY,
        }
    }
}

/// Find the segment nearest to `point` and whether a ball of `radius`
/// centered there touches it
///
/// Ties keep the first segment in path order, except that a zero-length
/// segment gives way to a real one at the same distance: it has no
/// direction of its own.
pub fn classify(point: Vec2, radius: f32, surface: &Surface) -> Proximity {
    let mut best = Proximity::none();

    let mut consider = |segment: Segment| {
        let closest = segment.closest_point(point);
        let distance = (point - closest).length();
        let replaces_point = distance == best.distance
            && !segment.is_point()
            && best.nearest.is_some_and(|n| n.segment.is_point());
        if distance < best.distance || replaces_point {
            best.distance = distance;
            best.nearest = Some(Nearest {
                segment,
                point: closest,
            });
        }
    };

    match surface {
        Surface::Ramp(ramp) => consider(ramp.segment()),
        Surface::Paths(paths) => {
            for path in paths.iter().filter(|p| !p.is_degenerate()) {
                for segment in path.segments() {
                    consider(segment);
                }
            }
        }
    }

    best.on_geometry = best.distance < radius;
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas {
            width: 800.0,
            height: 600.0,
        }
    }

    #[test]
    fn test_closest_point_interior() {
        let seg = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert_eq!(seg.closest_point(Vec2::new(4.0, 3.0)), Vec2::new(4.0, 0.0));
        assert!((seg.distance_to(Vec2::new(4.0, 3.0)) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_closest_point_clamps_to_ends() {
        let seg = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert_eq!(seg.closest_point(Vec2::new(-5.0, 1.0)), Vec2::new(0.0, 0.0));
        assert_eq!(seg.closest_point(Vec2::new(25.0, -1.0)), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_zero_length_segment_uses_its_point() {
        let p = Vec2::new(7.0, 7.0);
        let seg = Segment::new(p, p);
        let closest = seg.closest_point(Vec2::new(10.0, 11.0));
        assert_eq!(closest, p);
        assert!((seg.distance_to(Vec2::new(10.0, 11.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_ramp_geometry_at_thirty_degrees() {
        let ramp = Ramp::new(30.0, canvas());
        assert_eq!(ramp.start, Vec2::new(80.0, 60.0));
        assert!((ramp.floor_y - 540.0).abs() < 1e-3);
        // 480 px of rise at 30° is 960 px of incline
        let expected_end_x = 80.0 + 960.0 * 30f32.to_radians().cos();
        assert!((ramp.end.x - expected_end_x).abs() < 1e-2);
        assert!((ramp.end.y - 540.0).abs() < 1e-3);
        assert!((ramp.segment().angle() - ramp.angle).abs() < 1e-5);
    }

    #[test]
    fn test_empty_paths_fall_back_to_ramp() {
        let ramp = Ramp::new(30.0, canvas());
        let surface = Surface::new(&[], ramp);
        assert!(matches!(surface, Surface::Ramp(_)));
        assert_eq!(surface.start_point(), ramp.start);

        let result = classify(ramp.start, 20.0, &surface);
        assert!(result.on_geometry);
        assert_eq!(result.distance, 0.0);
    }

    #[test]
    fn test_classify_on_and_off_path() {
        let paths = vec![Path::new(vec![Vec2::new(0.0, 100.0), Vec2::new(200.0, 100.0)])];
        let surface = Surface::new(&paths, Ramp::new(30.0, canvas()));

        let near = classify(Vec2::new(50.0, 90.0), 20.0, &surface);
        assert!(near.on_geometry);
        assert_eq!(near.nearest.map(|n| n.point), Some(Vec2::new(50.0, 100.0)));

        // Distance exactly equal to the radius does not count
        let edge = classify(Vec2::new(50.0, 80.0), 20.0, &surface);
        assert!(!edge.on_geometry);
        assert!((edge.distance - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_classify_picks_nearest_across_paths() {
        let paths = vec![
            Path::new(vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)]),
            Path::new(vec![
                Vec2::new(0.0, 50.0),
                Vec2::new(50.0, 50.0),
                Vec2::new(100.0, 60.0),
            ]),
        ];
        let surface = Surface::new(&paths, Ramp::new(30.0, canvas()));
        let result = classify(Vec2::new(20.0, 45.0), 20.0, &surface);
        let nearest = result.nearest.expect("segment");
        assert_eq!(nearest.segment.a, Vec2::new(0.0, 50.0));
        assert!((result.distance - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_ties_keep_first_segment() {
        let paths = vec![
            Path::new(vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)]),
            Path::new(vec![Vec2::new(0.0, 20.0), Vec2::new(100.0, 20.0)]),
        ];
        let surface = Surface::new(&paths, Ramp::new(30.0, canvas()));
        let result = classify(Vec2::new(50.0, 10.0), 20.0, &surface);
        assert_eq!(
            result.nearest.map(|n| n.segment.a),
            Some(Vec2::new(0.0, 0.0))
        );
    }

    #[test]
    fn test_repeated_first_sample_does_not_set_direction() {
        let paths = vec![Path::new(vec![
            Vec2::new(500.0, 300.0),
            Vec2::new(500.0, 300.0),
            Vec2::new(100.0, 300.0),
        ])];
        let surface = Surface::new(&paths, Ramp::new(30.0, canvas()));
        // Behind the first point: both segments clamp to it
        let result = classify(Vec2::new(510.0, 300.0), 20.0, &surface);
        let nearest = result.nearest.expect("segment");
        assert!(!nearest.segment.is_point());
        assert!(nearest.segment.direction().x < -0.99);
    }

    #[test]
    fn test_single_repeated_point_path_still_classifies() {
        let paths = vec![Path::new(vec![Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0)])];
        let surface = Surface::new(&paths, Ramp::new(30.0, canvas()));
        let result = classify(Vec2::new(55.0, 50.0), 20.0, &surface);
        assert!(result.on_geometry);
        assert!(result.nearest.expect("segment").segment.is_point());
    }

    #[test]
    fn test_degenerate_paths_are_ignored() {
        let paths = vec![Path::new(vec![Vec2::new(10.0, 10.0)])];
        let surface = Surface::new(&paths, Ramp::new(30.0, canvas()));
        // A drawn path list suppresses the ramp even if nothing in it is usable
        let result = classify(Vec2::new(10.0, 10.0), 20.0, &surface);
        assert!(!result.on_geometry);
        assert!(result.nearest.is_none());
        assert_eq!(result.distance, f32::INFINITY);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn closest_point_is_on_segment_and_minimal(
                ax in -500.0f32..500.0, ay in -500.0f32..500.0,
                bx in -500.0f32..500.0, by in -500.0f32..500.0,
                px in -800.0f32..800.0, py in -800.0f32..800.0,
            ) {
                let a = Vec2::new(ax, ay);
                let b = Vec2::new(bx, by);
                prop_assume!((b - a).length() > 1.0);

                let seg = Segment::new(a, b);
                let p = Vec2::new(px, py);
                let closest = seg.closest_point(p);

                // Lies on the closed segment
                let along = (closest - a).dot(b - a) / (b - a).length_squared();
                prop_assert!((-1e-4..=1.0 + 1e-4).contains(&along));
                prop_assert!(Segment::new(a, b).distance_to(closest) < 1e-2);

                // Nothing sampled along the segment is closer
                let best = (p - closest).length();
                for i in 0..=200 {
                    let sample = a + (b - a) * (i as f32 / 200.0);
                    prop_assert!(
                        best <= (p - sample).length() + 1e-2,
                        "sample {} beats projection: {} < {}",
                        i, (p - sample).length(), best
                    );
                }
            }
        }
    }
}
