//! Bicubic Bezier patches: a 4x4 grid of control points each.

crate::patch::patch! { kind: "bicubic_patch", points_per_patch: 16 }
