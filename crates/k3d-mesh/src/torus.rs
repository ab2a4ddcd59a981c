//! Tori, parameterized by major and minor radius and by partial sweeps.

use crate::mesh::Doubles;

crate::quadric::quadric! {
    kind: "torus",
    arrays: {
        /// Per-torus distance from the center to the tube center.
        major_radii: Doubles,
        /// Per-torus tube radius.
        minor_radii: Doubles,
        /// Per-torus start angle around the tube, in radians.
        phi_min: Doubles,
        /// Per-torus end angle around the tube, in radians.
        phi_max: Doubles,
        /// Per-torus sweep angle around Z, in radians.
        sweep_angles: Doubles,
    },
}
