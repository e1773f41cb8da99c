//! Collision detection
//!
//! Coarse axis-aligned box overlap. Positions are top-left corners, sizes are
//! side lengths, all in percentage units.

use glam::Vec2;

/// Check whether box A overlaps box B.
///
/// `tolerance` is subtracted from each box's far edge, so hitboxes are a little
/// smaller than what is drawn. Comparisons are strict: boxes that only touch
/// do not collide.
#[inline]
pub fn overlaps(a: Vec2, size_a: f32, b: Vec2, size_b: f32, tolerance: f32) -> bool {
    a.x < b.x + size_b - tolerance
        && a.x + size_a - tolerance > b.x
        && a.y < b.y + size_b - tolerance
        && a.y + size_a - tolerance > b.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::COLLISION_TOLERANCE;
    use proptest::prelude::*;

    const TOL: f32 = COLLISION_TOLERANCE;

    #[test]
    fn box_overlaps_itself() {
        let p = Vec2::new(40.0, 40.0);
        assert!(overlaps(p, 4.0, p, 4.0, TOL));
    }

    #[test]
    fn touching_within_tolerance_is_not_a_hit() {
        // A's right edge minus tolerance lands exactly on B's left edge
        let a = Vec2::new(10.0, 10.0);
        let b = Vec2::new(13.5, 10.0);
        assert!(!overlaps(a, 4.0, b, 5.0, TOL));
        // Nudge inside
        assert!(overlaps(a, 4.0, Vec2::new(13.4, 10.0), 5.0, TOL));
    }

    #[test]
    fn separated_on_one_axis_misses() {
        let a = Vec2::new(10.0, 10.0);
        let b = Vec2::new(11.0, 30.0);
        assert!(!overlaps(a, 4.0, b, 5.0, TOL));
    }

    #[test]
    fn player_reaches_destination_corner() {
        let destination = Vec2::new(85.0, 15.0);
        assert!(overlaps(Vec2::new(81.6, 13.4), 4.0, destination, 8.0, TOL));
        assert!(!overlaps(Vec2::new(81.5, 13.4), 4.0, destination, 8.0, TOL));
    }

    proptest! {
        #[test]
        fn any_box_overlaps_itself(
            x in 0.0_f32..100.0,
            y in 0.0_f32..100.0,
            size in 0.6_f32..20.0,
        ) {
            let p = Vec2::new(x, y);
            prop_assert!(overlaps(p, size, p, size, TOL));
        }

        #[test]
        fn far_apart_boxes_never_overlap(
            x in 0.0_f32..50.0,
            y in 0.0_f32..50.0,
            size_a in 0.6_f32..10.0,
            size_b in 0.6_f32..10.0,
            gap in 0.01_f32..20.0,
            on_x in any::<bool>(),
        ) {
            let a = Vec2::new(x, y);
            let offset = size_a + size_b + TOL + gap;
            let b = if on_x { Vec2::new(x + offset, y) } else { Vec2::new(x, y + offset) };
            prop_assert!(!overlaps(a, size_a, b, size_b, TOL));
            prop_assert!(!overlaps(b, size_b, a, size_a, TOL));
        }
    }
}
