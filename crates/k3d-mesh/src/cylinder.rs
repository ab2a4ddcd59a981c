//! Open cylinders around the Z axis.

use crate::mesh::Doubles;

crate::quadric::quadric! {
    kind: "cylinder",
    arrays: {
        /// Per-cylinder radius.
        radii: Doubles,
        /// Per-cylinder lower Z extent.
        z_min: Doubles,
        /// Per-cylinder upper Z extent.
        z_max: Doubles,
        /// Per-cylinder sweep angle, in radians.
        sweep_angles: Doubles,
    },
}
