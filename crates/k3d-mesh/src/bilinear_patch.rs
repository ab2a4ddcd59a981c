//! Bilinear patches: four corner points each.

crate::patch::patch! { kind: "bilinear_patch", points_per_patch: 4 }
