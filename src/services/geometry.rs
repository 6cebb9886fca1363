//! Joint angle geometry

use crate::models::Point;

/// Unsigned angle at `b` formed by `a` and `c`, in degrees within [0, 180].
///
/// Coincident points yield 0 rather than an error.
pub fn angle_between(a: &Point, b: &Point, c: &Point) -> f64 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let angle = radians.to_degrees().abs();

    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_right_angle() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let c = Point::new(1.0, 1.0);
        assert!((angle_between(&a, &b, &c) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_straight_line() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.5, 0.0);
        let c = Point::new(1.0, 0.0);
        assert!((angle_between(&a, &b, &c) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_reflex_angle_is_folded() {
        // Raw atan2 difference is 270 degrees here
        let a = Point::new(1.0, 0.0);
        let b = Point::new(0.0, 0.0);
        let c = Point::new(0.0, -1.0);
        assert!((angle_between(&a, &b, &c) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_coincident_points() {
        let p = Point::new(3.0, 3.0);
        assert_eq!(angle_between(&p, &p, &p), 0.0);
    }

    proptest! {
        #[test]
        fn prop_angle_in_range(
            ax in -1000.0f64..1000.0, ay in -1000.0f64..1000.0,
            bx in -1000.0f64..1000.0, by in -1000.0f64..1000.0,
            cx in -1000.0f64..1000.0, cy in -1000.0f64..1000.0,
        ) {
            let angle = angle_between(&Point::new(ax, ay), &Point::new(bx, by), &Point::new(cx, cy));
            prop_assert!((0.0..=180.0).contains(&angle));
        }

        #[test]
        fn prop_mirror_symmetric(
            dx in 1.0f64..500.0, dy in 1.0f64..500.0,
            bx in -500.0f64..500.0, by in -500.0f64..500.0,
        ) {
            // a and c mirrored about the vertical through b
            let a = Point::new(bx - dx, by + dy);
            let b = Point::new(bx, by);
            let c = Point::new(bx + dx, by + dy);
            let forward = angle_between(&a, &b, &c);
            let backward = angle_between(&c, &b, &a);
            prop_assert!((forward - backward).abs() < 1e-9);
        }
    }
}
