//! Paraboloids of revolution around the Z axis.

use crate::mesh::Doubles;

crate::quadric::quadric! {
    kind: "paraboloid",
    arrays: {
        /// Per-paraboloid radius at `z_max`.
        radii: Doubles,
        /// Per-paraboloid lower Z clip.
        z_min: Doubles,
        /// Per-paraboloid upper Z clip.
        z_max: Doubles,
        /// Per-paraboloid sweep angle, in radians.
        sweep_angles: Doubles,
    },
}
