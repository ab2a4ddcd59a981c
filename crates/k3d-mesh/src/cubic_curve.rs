//! Piecewise-cubic Bezier curves through mesh points.

crate::curve::polynomial_curve! { kind: "cubic_curve", order: 4 }
