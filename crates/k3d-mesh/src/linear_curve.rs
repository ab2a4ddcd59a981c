//! Piecewise-linear curves (polylines) through mesh points.

crate::curve::polynomial_curve! { kind: "linear_curve", order: 2 }
