//! Particles: a group of mesh points rendered as individual points.

use k3d_array::{Array, Table};
use k3d_core::metadata::{key, value};
use k3d_core::{MaterialRef, Point3};

use crate::error::ValidationError;
use crate::mesh::{Indices, Materials, Mesh, MeshPoints};
use crate::primitive::{GenericPrimitive, Primitives};
use crate::validation::*;

/// Kind tag of particle groups.
pub const KIND: &str = "particle";

/// Read-only view of one particle primitive.
#[derive(Clone, Copy, Debug)]
pub struct ConstPrimitive<'a> {
    /// Single material for every particle.
    pub material: &'a Materials,
    /// Per-particle mesh point index.
    pub points: &'a Indices,
    /// Attributes shared by every particle.
    pub constant_attributes: &'a Table,
    /// Per-particle attributes.
    pub vertex_attributes: &'a Table,
}

/// Mutable view of one particle primitive.
#[derive(Debug)]
pub struct Primitive<'a> {
    /// Single material for every particle.
    pub material: &'a mut Materials,
    /// Per-particle mesh point index.
    pub points: &'a mut Indices,
    /// Attributes shared by every particle.
    pub constant_attributes: &'a mut Table,
    /// Per-particle attributes.
    pub vertex_attributes: &'a mut Table,
}

impl Primitive<'_> {
    /// Number of particles.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the group has no particles.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Read-only view of the same storage.
    pub fn as_const(&self) -> ConstPrimitive<'_> {
        ConstPrimitive {
            material: self.material,
            points: self.points,
            constant_attributes: self.constant_attributes,
            vertex_attributes: self.vertex_attributes,
        }
    }
}

impl<'a> ConstPrimitive<'a> {
    /// The structure arrays, by stored name.
    pub fn structure_arrays(&self) -> Vec<(&'static str, &'a dyn Array)> {
        vec![
            ("material", self.material as &'a dyn Array),
            ("points", self.points as &'a dyn Array),
        ]
    }
}

/// Append an empty particle group to `primitives`.
///
/// The constant table gets its single row (no material).
pub fn create_in(primitives: &mut Primitives) -> Primitive<'_> {
    let generic = primitives.create(KIND);
    generic
        .structure
        .create("constant")
        .create::<Materials>("material")
        .push(MaterialRef::NONE);
    generic
        .structure
        .create("vertex")
        .create::<Indices>("points")
        .set_metadata_value(key::DOMAIN, value::POINT_INDICES);
    for name in ["constant", "vertex"] {
        generic.attributes.create(name);
    }
    bind_mut(generic).expect("freshly created particle group is well-formed")
}

/// Validate a generic primitive as a particle group, reporting the first
/// problem found.
pub fn try_validate<'a>(
    mesh: &Mesh,
    primitive: &'a GenericPrimitive,
) -> Result<ConstPrimitive<'a>, ValidationError> {
    require_kind(primitive, KIND)?;
    require_valid_primitive(mesh, primitive)?;

    let constant = require_structure(primitive, "constant")?;
    let vertex = require_structure(primitive, "vertex")?;

    let constant_attributes = require_attributes(primitive, "constant")?;
    let vertex_attributes = require_attributes(primitive, "vertex")?;

    let material = require_array::<Materials>(constant, "constant", "material")?;
    let points = require_array::<Indices>(vertex, "vertex", "points")?;

    require_metadata(points, "points", key::DOMAIN, value::POINT_INDICES)?;
    require_table_row_count(vertex_attributes, "vertex", vertex.row_count())?;

    Ok(ConstPrimitive {
        material,
        points,
        constant_attributes,
        vertex_attributes,
    })
}

fn bind_mut(primitive: &mut GenericPrimitive) -> Option<Primitive<'_>> {
    let GenericPrimitive {
        structure,
        attributes,
        ..
    } = primitive;
    let [constant, vertex] = structure.tables_mut(["constant", "vertex"])?;
    let [constant_attributes, vertex_attributes] =
        attributes.tables_mut(["constant", "vertex"])?;
    Some(Primitive {
        material: constant.writable_as::<Materials>("material")?,
        points: vertex.writable_as::<Indices>("points")?,
        constant_attributes,
        vertex_attributes,
    })
}

crate::kind::primitive_kind!();

/// Add `positions` to the mesh as new unselected points and append one
/// particle for each.
pub fn add_particles(
    points: &mut MeshPoints<'_>,
    primitive: &mut Primitive<'_>,
    positions: &[Point3],
) {
    let first = points.append(positions);
    primitive
        .points
        .extend(first..first + positions.len() as u64);
    let count = primitive.points.len();
    primitive.vertex_attributes.set_row_count(count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use k3d_array::TypedArray;
    use k3d_core::Color;

    fn grid(n: usize) -> Vec<Point3> {
        (0..n * n)
            .map(|i| Point3::new((i % n) as f64, 0.0, (i / n) as f64))
            .collect()
    }

    fn particles(n: usize) -> Mesh {
        let mut mesh = Mesh::new();
        let (mut points, primitives) = mesh.split_mut();
        let mut particles = create_in(primitives);
        add_particles(&mut points, &mut particles, &grid(n));
        mesh
    }

    #[test]
    fn create_has_one_constant_row() {
        let mut mesh = Mesh::new();
        let particles = create(&mut mesh);
        assert_eq!(particles.material.as_slice(), &[MaterialRef::NONE]);
        assert!(particles.is_empty());
    }

    #[test]
    fn add_particles_indexes_new_points() {
        let mut mesh = Mesh::new();
        mesh.add_points(&grid(1));
        let (mut points, primitives) = mesh.split_mut();
        let mut particles = create_in(primitives);
        add_particles(&mut points, &mut particles, &grid(2));
        assert_eq!(particles.points.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(particles.len(), 4);
        assert_eq!(points.count(), 5);
    }

    #[test]
    fn vertex_attributes_follow_particles() {
        let mut mesh = Mesh::new();
        let (mut points, primitives) = mesh.split_mut();
        let mut particles = create_in(primitives);
        particles
            .vertex_attributes
            .create::<TypedArray<Color>>("Cs");
        add_particles(&mut points, &mut particles, &grid(3));
        assert_eq!(particles.vertex_attributes.row_count(), 9);
        assert!(validate(&mesh, mesh.primitives[0].get().unwrap()).is_some());
    }

    #[test]
    fn vertex_attribute_rows_must_match() {
        let mut mesh = particles(2);
        mesh.with_primitives_mut(|mesh, primitives| {
            let particles = validate_pipeline(mesh, &mut primitives[0]).unwrap();
            particles
                .vertex_attributes
                .create::<TypedArray<f64>>("width")
                .extend([0.5; 3]);
        });
        assert!(matches!(
            try_validate(&mesh, mesh.primitives[0].get().unwrap()),
            Err(ValidationError::RowCountMismatch { expected: 4, found: 3, .. })
        ));
    }

    #[test]
    fn points_must_exist() {
        let mut mesh = particles(2);
        mesh.with_primitives_mut(|mesh, primitives| {
            let particles = validate_pipeline(mesh, &mut primitives[0]).unwrap();
            particles.points.push(4);
        });
        assert!(matches!(
            try_validate(&mesh, mesh.primitives[0].get().unwrap()),
            Err(ValidationError::PointIndexOutOfBounds { index: 4, point_count: 4, .. })
        ));
    }

    #[test]
    fn compliance() {
        compliance::run_full_compliance::<Kind>(&particles(3), 0);
    }
}
