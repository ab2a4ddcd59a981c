//! Cones with their base in the XY plane and apex on the Z axis.

use crate::mesh::Doubles;

crate::quadric::quadric! {
    kind: "cone",
    arrays: {
        /// Per-cone apex height.
        heights: Doubles,
        /// Per-cone base radius.
        radii: Doubles,
        /// Per-cone sweep angle, in radians.
        sweep_angles: Doubles,
    },
}
