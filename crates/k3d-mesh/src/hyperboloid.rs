//! Hyperboloids: the surface swept by rotating a line segment around Z.

use crate::mesh::{Doubles, Points};

crate::quadric::quadric! {
    kind: "hyperboloid",
    arrays: {
        /// Per-hyperboloid first endpoint of the swept segment.
        start_points: Points,
        /// Per-hyperboloid second endpoint of the swept segment.
        end_points: Points,
        /// Per-hyperboloid sweep angle, in radians.
        sweep_angles: Doubles,
    },
}
