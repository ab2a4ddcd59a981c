//! Spheres, optionally clipped along Z.

use crate::mesh::Doubles;

crate::quadric::quadric! {
    kind: "sphere",
    arrays: {
        /// Per-sphere radius.
        radii: Doubles,
        /// Per-sphere lower Z clip.
        z_min: Doubles,
        /// Per-sphere upper Z clip.
        z_max: Doubles,
        /// Per-sphere sweep angle, in radians.
        sweep_angles: Doubles,
    },
}
