//! Reusable data fixtures.
//!
//! - [`sample_table`]: a three-column table with a known row count.
//! - [`sample_mesh`]: a mesh holding one primitive of several kinds over a
//!   shared set of points.

use k3d_array::{Array, Table, TypedArray, UintArray};
use k3d_core::metadata::{key, value};
use k3d_core::{MaterialRef, Matrix4, Point3};
use k3d_mesh::{disk, linear_curve, particle, polyhedron, Mesh};

/// A table with `rows` rows and three columns:
///
/// - `weights`: `TypedArray<f64>`, the values `0.0, 0.5, 1.0, ...`;
/// - `points`: `UintArray` tagged as point indices, the values `0..rows`;
/// - `names`: `TypedArray<String>`, `"row 0"`, `"row 1"`, ...
pub fn sample_table(rows: usize) -> Table {
    let mut table = Table::new();
    table
        .create::<TypedArray<f64>>("weights")
        .extend((0..rows).map(|i| i as f64 * 0.5));
    let points = table.create::<UintArray>("points");
    points.extend(0..rows as u64);
    points.set_metadata_value(key::DOMAIN, value::POINT_INDICES);
    table
        .create::<TypedArray<String>>("names")
        .extend((0..rows).map(|i| format!("row {i}")));
    table
}

/// The corners of the unit square in the XY plane, counterclockwise.
pub fn unit_square() -> Vec<Point3> {
    vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ]
}

/// A mesh with four primitives, in order: a polyhedron (two triangles
/// over the unit square), a disk, a linear curve, and a particle group.
pub fn sample_mesh() -> Mesh {
    let mut mesh = Mesh::new();
    polyhedron::create_from_faces(
        &mut mesh,
        &unit_square(),
        &[3, 3],
        &[0, 1, 2, 0, 2, 3],
        MaterialRef::NONE,
    )
    .expect("fixture faces are well-formed");

    let disk = disk::create(&mut mesh);
    disk.matrices.push(Matrix4::identity());
    disk.materials.push(MaterialRef::NONE);
    disk.heights.push(0.0);
    disk.radii.push(1.0);
    disk.sweep_angles.push(std::f64::consts::TAU);
    disk.selections.push(0.0);

    let (mut points, primitives) = mesh.split_mut();
    let mut curve = linear_curve::create_in(primitives);
    linear_curve::add_curve(&mut points, &mut curve, &unit_square())
        .expect("fixture curve has enough points");
    let mut particles = particle::create_in(primitives);
    particle::add_particles(&mut points, &mut particles, &unit_square());
    mesh
}
