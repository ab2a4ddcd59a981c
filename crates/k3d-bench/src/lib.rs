//! Benchmark profiles for K-3D mesh data.
//!
//! - [`wide_table`]: a table with one column of every common element type
//! - [`grid_mesh`]: an `n` x `n` quad grid stored as a polyhedron

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use k3d_array::{Table, TypedArray, UintArray};
use k3d_core::{Color, MaterialRef, Point3};
use k3d_mesh::{polyhedron, Mesh};

/// Build a table with `rows` rows of doubles, points, colors, indices, and
/// strings.
pub fn wide_table(rows: usize) -> Table {
    let mut table = Table::new();
    table
        .create::<TypedArray<f64>>("weights")
        .extend((0..rows).map(|i| i as f64));
    table
        .create::<TypedArray<Point3>>("positions")
        .extend((0..rows).map(|i| Point3::new(i as f64, 0.0, -(i as f64))));
    table
        .create::<TypedArray<Color>>("colors")
        .extend((0..rows).map(|i| Color::new(1.0 / (i + 1) as f64, 0.5, 0.25)));
    table
        .create::<UintArray>("indices")
        .extend(0..rows as u64);
    table
        .create::<TypedArray<String>>("names")
        .extend((0..rows).map(|i| format!("row {i}")));
    table
}

/// Build a mesh holding one polyhedron: an `n` x `n` grid of quads over
/// `(n + 1)^2` points in the XZ plane.
pub fn grid_mesh(n: usize) -> Mesh {
    let side = n + 1;
    let vertices: Vec<Point3> = (0..side * side)
        .map(|i| Point3::new((i % side) as f64, 0.0, (i / side) as f64))
        .collect();
    let mut indices = Vec::with_capacity(n * n * 4);
    for row in 0..n {
        for column in 0..n {
            let corner = (row * side + column) as u64;
            let side = side as u64;
            indices.extend([corner, corner + 1, corner + side + 1, corner + side]);
        }
    }
    let mut mesh = Mesh::new();
    polyhedron::create_from_faces(
        &mut mesh,
        &vertices,
        &vec![4_u64; n * n],
        &indices,
        MaterialRef::NONE,
    )
    .expect("grid faces are well-formed");
    mesh
}
