//! Polyhedra stored as split-edge (half-edge without twin pointers) lists.
//!
//! Faces own one or more loops (the first is the outer boundary, the rest
//! are holes); each loop is a cycle of edges linked by `clockwise_edges`;
//! each edge starts at one vertex, which names a mesh point. The `vertex`
//! table is co-indexed with the `edge` table.

use std::collections::HashMap;

use k3d_array::{Array, Table, TypedArray};
use k3d_core::metadata::{key, value};
use k3d_core::{MaterialRef, Point3};

use crate::error::{BuildError, ValidationError};
use crate::mesh::{Counts, Indices, Materials, Mesh, MeshPoints, Selection};
use crate::primitive::{GenericPrimitive, Primitives};
use crate::validation::*;

/// Kind tag of polyhedra.
pub const KIND: &str = "polyhedron";

/// Per-shell surface type.
pub type ShellTypes = TypedArray<i32>;

/// Shell type: faces are rendered as polygons.
pub const POLYGONS: i32 = 0;
/// Shell type: faces are the control cage of a Catmull-Clark surface.
pub const CATMULL_CLARK: i32 = 1;

/// Read-only view of one polyhedron primitive.
#[derive(Clone, Copy, Debug)]
pub struct ConstPrimitive<'a> {
    /// Per-shell surface type ([`POLYGONS`] or [`CATMULL_CLARK`]).
    pub shell_types: &'a ShellTypes,
    /// Per-face shell index.
    pub face_shells: &'a Indices,
    /// Per-face index of the first loop.
    pub face_first_loops: &'a Indices,
    /// Per-face loop count (one plus the number of holes).
    pub face_loop_counts: &'a Counts,
    /// Per-face selection weights.
    pub face_selections: &'a Selection,
    /// Per-face materials.
    pub face_materials: &'a Materials,
    /// Per-loop index of the first edge.
    pub loop_first_edges: &'a Indices,
    /// Per-edge index of the next edge in its loop.
    pub clockwise_edges: &'a Indices,
    /// Per-edge selection weights.
    pub edge_selections: &'a Selection,
    /// Per-edge mesh point index of the edge's start vertex.
    pub vertex_points: &'a Indices,
    /// Per-edge-vertex selection weights.
    pub vertex_selections: &'a Selection,
    /// Attributes shared by the whole polyhedron.
    pub constant_attributes: &'a Table,
    /// Per-face attributes.
    pub face_attributes: &'a Table,
    /// Per-edge attributes.
    pub edge_attributes: &'a Table,
    /// Per-edge-vertex (face-varying) attributes.
    pub vertex_attributes: &'a Table,
}

/// Mutable view of one polyhedron primitive.
#[derive(Debug)]
pub struct Primitive<'a> {
    /// Per-shell surface type ([`POLYGONS`] or [`CATMULL_CLARK`]).
    pub shell_types: &'a mut ShellTypes,
    /// Per-face shell index.
    pub face_shells: &'a mut Indices,
    /// Per-face index of the first loop.
    pub face_first_loops: &'a mut Indices,
    /// Per-face loop count (one plus the number of holes).
    pub face_loop_counts: &'a mut Counts,
    /// Per-face selection weights.
    pub face_selections: &'a mut Selection,
    /// Per-face materials.
    pub face_materials: &'a mut Materials,
    /// Per-loop index of the first edge.
    pub loop_first_edges: &'a mut Indices,
    /// Per-edge index of the next edge in its loop.
    pub clockwise_edges: &'a mut Indices,
    /// Per-edge selection weights.
    pub edge_selections: &'a mut Selection,
    /// Per-edge mesh point index of the edge's start vertex.
    pub vertex_points: &'a mut Indices,
    /// Per-edge-vertex selection weights.
    pub vertex_selections: &'a mut Selection,
    /// Attributes shared by the whole polyhedron.
    pub constant_attributes: &'a mut Table,
    /// Per-face attributes.
    pub face_attributes: &'a mut Table,
    /// Per-edge attributes.
    pub edge_attributes: &'a mut Table,
    /// Per-edge-vertex (face-varying) attributes.
    pub vertex_attributes: &'a mut Table,
}

/// Append an empty polyhedron to `primitives`.
pub fn create_in(primitives: &mut Primitives) -> Primitive<'_> {
    let generic = primitives.create(KIND);
    generic.structure.create("shell").create::<ShellTypes>("shell_types");
    let face = generic.structure.create("face");
    face.create::<Indices>("face_shells");
    face.create::<Indices>("face_first_loops");
    face.create::<Counts>("face_loop_counts");
    face.create::<Selection>("face_selections")
        .set_metadata_value(key::ROLE, value::SELECTION);
    face.create::<Materials>("face_materials");
    generic.structure.create("loop").create::<Indices>("loop_first_edges");
    let edge = generic.structure.create("edge");
    edge.create::<Indices>("clockwise_edges");
    edge.create::<Selection>("edge_selections")
        .set_metadata_value(key::ROLE, value::SELECTION);
    let vertex = generic.structure.create("vertex");
    vertex
        .create::<Indices>("vertex_points")
        .set_metadata_value(key::DOMAIN, value::POINT_INDICES);
    vertex
        .create::<Selection>("vertex_selections")
        .set_metadata_value(key::ROLE, value::SELECTION);
    for name in ["constant", "face", "edge", "vertex"] {
        generic.attributes.create(name);
    }
    bind_mut(generic).expect("freshly created polyhedron is well-formed")
}

/// Validate a generic primitive as a polyhedron, reporting the first
/// problem found.
///
/// Beyond the table layout this checks that every face names an existing
/// shell and loop range, that every edge links to an existing edge, and
/// that following `clockwise_edges` from each loop's first edge returns to
/// the start.
pub fn try_validate<'a>(
    mesh: &Mesh,
    primitive: &'a GenericPrimitive,
) -> Result<ConstPrimitive<'a>, ValidationError> {
    require_kind(primitive, KIND)?;
    require_valid_primitive(mesh, primitive)?;

    let shell = require_structure(primitive, "shell")?;
    let face = require_structure(primitive, "face")?;
    let loops = require_structure(primitive, "loop")?;
    let edge = require_structure(primitive, "edge")?;
    let vertex = require_structure(primitive, "vertex")?;

    let constant_attributes = require_attributes(primitive, "constant")?;
    let face_attributes = require_attributes(primitive, "face")?;
    let edge_attributes = require_attributes(primitive, "edge")?;
    let vertex_attributes = require_attributes(primitive, "vertex")?;

    let shell_types = require_array::<ShellTypes>(shell, "shell", "shell_types")?;
    let face_shells = require_array::<Indices>(face, "face", "face_shells")?;
    let face_first_loops = require_array::<Indices>(face, "face", "face_first_loops")?;
    let face_loop_counts = require_array::<Counts>(face, "face", "face_loop_counts")?;
    let face_selections = require_array::<Selection>(face, "face", "face_selections")?;
    let face_materials = require_array::<Materials>(face, "face", "face_materials")?;
    let loop_first_edges = require_array::<Indices>(loops, "loop", "loop_first_edges")?;
    let clockwise_edges = require_array::<Indices>(edge, "edge", "clockwise_edges")?;
    let edge_selections = require_array::<Selection>(edge, "edge", "edge_selections")?;
    let vertex_points = require_array::<Indices>(vertex, "vertex", "vertex_points")?;
    let vertex_selections = require_array::<Selection>(vertex, "vertex", "vertex_selections")?;

    require_metadata(face_selections, "face_selections", key::ROLE, value::SELECTION)?;
    require_metadata(edge_selections, "edge_selections", key::ROLE, value::SELECTION)?;
    require_metadata(vertex_points, "vertex_points", key::DOMAIN, value::POINT_INDICES)?;
    require_metadata(vertex_selections, "vertex_selections", key::ROLE, value::SELECTION)?;

    require_table_row_count(loops, "loop", total(face_loop_counts, "face_loop_counts")?)?;
    require_table_row_count(vertex, "vertex", edge.row_count())?;
    require_table_row_count(face_attributes, "face", face.row_count())?;
    require_table_row_count(edge_attributes, "edge", edge.row_count())?;
    require_table_row_count(vertex_attributes, "vertex", vertex.row_count())?;

    require_indices(face_shells, "face_shells", shell_types.len())?;
    require_face_loops(face_first_loops, face_loop_counts, loops.row_count())?;
    require_indices(clockwise_edges, "clockwise_edges", clockwise_edges.len())?;
    require_closed_loops(loop_first_edges, clockwise_edges)?;

    Ok(ConstPrimitive {
        shell_types,
        face_shells,
        face_first_loops,
        face_loop_counts,
        face_selections,
        face_materials,
        loop_first_edges,
        clockwise_edges,
        edge_selections,
        vertex_points,
        vertex_selections,
        constant_attributes,
        face_attributes,
        edge_attributes,
        vertex_attributes,
    })
}

fn require_face_loops(
    face_first_loops: &Indices,
    face_loop_counts: &Counts,
    loop_count: usize,
) -> Result<(), ValidationError> {
    for (&first, &count) in face_first_loops.iter().zip(face_loop_counts.iter()) {
        let in_bounds = first.checked_add(count).is_some_and(|end| end <= loop_count as u64);
        if first as usize >= loop_count || !in_bounds {
            return Err(ValidationError::IndexOutOfBounds {
                array: "face_first_loops".into(),
                index: first,
                len: loop_count,
            });
        }
    }
    Ok(())
}

fn require_closed_loops(
    loop_first_edges: &Indices,
    clockwise_edges: &Indices,
) -> Result<(), ValidationError> {
    let edge_count = clockwise_edges.len();
    let next = |edge: usize| -> Result<usize, ValidationError> {
        let next = clockwise_edges[edge];
        if next as usize >= edge_count {
            return Err(ValidationError::IndexOutOfBounds {
                array: "clockwise_edges".into(),
                index: next,
                len: edge_count,
            });
        }
        Ok(next as usize)
    };

    for (loop_index, &first_edge) in loop_first_edges.iter().enumerate() {
        if first_edge as usize >= edge_count {
            return Err(ValidationError::IndexOutOfBounds {
                array: "loop_first_edges".into(),
                index: first_edge,
                len: edge_count,
            });
        }
        let first_edge = first_edge as usize;
        let (mut slow, mut fast, mut cycles) = (first_edge, first_edge, 0);
        loop {
            slow = next(slow)?;
            fast = next(next(fast)?)?;
            if slow == fast {
                cycles += 1;
            }
            if cycles > 2 {
                return Err(ValidationError::InfiniteLoop { loop_index });
            }
            if slow == first_edge {
                break;
            }
        }
    }
    Ok(())
}

fn bind_mut(primitive: &mut GenericPrimitive) -> Option<Primitive<'_>> {
    let GenericPrimitive {
        structure,
        attributes,
        ..
    } = primitive;
    let [shell, face, loops, edge, vertex] =
        structure.tables_mut(["shell", "face", "loop", "edge", "vertex"])?;
    let [face_shells, face_first_loops, face_loop_counts, face_selections, face_materials] = face
        .writable_many([
            "face_shells",
            "face_first_loops",
            "face_loop_counts",
            "face_selections",
            "face_materials",
        ])?;
    let [clockwise_edges, edge_selections] =
        edge.writable_many(["clockwise_edges", "edge_selections"])?;
    let [vertex_points, vertex_selections] =
        vertex.writable_many(["vertex_points", "vertex_selections"])?;
    let [constant_attributes, face_attributes, edge_attributes, vertex_attributes] =
        attributes.tables_mut(["constant", "face", "edge", "vertex"])?;
    Some(Primitive {
        shell_types: shell.writable_as::<ShellTypes>("shell_types")?,
        face_shells: face_shells.downcast_mut::<Indices>()?,
        face_first_loops: face_first_loops.downcast_mut::<Indices>()?,
        face_loop_counts: face_loop_counts.downcast_mut::<Counts>()?,
        face_selections: face_selections.downcast_mut::<Selection>()?,
        face_materials: face_materials.downcast_mut::<Materials>()?,
        loop_first_edges: loops.writable_as::<Indices>("loop_first_edges")?,
        clockwise_edges: clockwise_edges.downcast_mut::<Indices>()?,
        edge_selections: edge_selections.downcast_mut::<Selection>()?,
        vertex_points: vertex_points.downcast_mut::<Indices>()?,
        vertex_selections: vertex_selections.downcast_mut::<Selection>()?,
        constant_attributes,
        face_attributes,
        edge_attributes,
        vertex_attributes,
    })
}

crate::kind::primitive_kind!();

/// Build a single-shell polygonal polyhedron from an indexed face list.
///
/// `vertices` are appended to the mesh points; face `f` uses the next
/// `vertex_counts[f]` entries of `vertex_indices`, which index `vertices`.
/// Every face gets `material`. The mesh is unchanged on error.
pub fn create_from_faces<'m>(
    mesh: &'m mut Mesh,
    vertices: &[Point3],
    vertex_counts: &[u64],
    vertex_indices: &[u64],
    material: MaterialRef,
) -> Result<Primitive<'m>, BuildError> {
    if let Some((face, &count)) = vertex_counts.iter().enumerate().find(|(_, &c)| c < 3) {
        return Err(BuildError::TooFewVertices { face, count });
    }
    let expected = vertex_counts
        .iter()
        .try_fold(0_u64, |sum, &count| sum.checked_add(count))
        .and_then(|sum| usize::try_from(sum).ok());
    if expected != Some(vertex_indices.len()) {
        return Err(BuildError::IndexCountMismatch {
            expected: expected.unwrap_or(usize::MAX),
            found: vertex_indices.len(),
        });
    }
    if let Some(&index) = vertex_indices.iter().find(|&&i| i as usize >= vertices.len()) {
        return Err(BuildError::VertexOutOfBounds {
            index,
            len: vertices.len(),
        });
    }

    let (mut points, primitives) = mesh.split_mut();
    let offset = points.append(vertices);
    let mut polyhedron = create_in(primitives);
    polyhedron.shell_types.push(POLYGONS);
    let mut remaining = vertex_indices;
    for &count in vertex_counts {
        let (face, rest) = remaining.split_at(count as usize);
        remaining = rest;
        polyhedron.push_face(0, 1, material);
        polyhedron.push_loop(face.iter().map(|&i| offset + i));
    }
    Ok(polyhedron)
}

impl<'a> Primitive<'a> {
    /// Read-only view of the same storage.
    pub fn as_const(&self) -> ConstPrimitive<'_> {
        ConstPrimitive {
            shell_types: self.shell_types,
            face_shells: self.face_shells,
            face_first_loops: self.face_first_loops,
            face_loop_counts: self.face_loop_counts,
            face_selections: self.face_selections,
            face_materials: self.face_materials,
            loop_first_edges: self.loop_first_edges,
            clockwise_edges: self.clockwise_edges,
            edge_selections: self.edge_selections,
            vertex_points: self.vertex_points,
            vertex_selections: self.vertex_selections,
            constant_attributes: self.constant_attributes,
            face_attributes: self.face_attributes,
            edge_attributes: self.edge_attributes,
            vertex_attributes: self.vertex_attributes,
        }
    }

    fn require_shell(&self, shell: usize) -> Result<(), BuildError> {
        let shell_count = self.shell_types.len();
        if shell < shell_count {
            Ok(())
        } else {
            Err(BuildError::InvalidShell { shell, shell_count })
        }
    }

    fn push_face(&mut self, shell: u64, loop_count: u64, material: MaterialRef) {
        self.face_shells.push(shell);
        self.face_first_loops.push(self.loop_first_edges.len() as u64);
        self.face_loop_counts.push(loop_count);
        self.face_selections.push(0.0);
        self.face_materials.push(material);
    }

    /// Append one closed loop whose edges start at `vertex_points`.
    fn push_loop(&mut self, vertex_points: impl IntoIterator<Item = u64>) {
        let first_edge = self.clockwise_edges.len();
        self.loop_first_edges.push(first_edge as u64);
        for point in vertex_points {
            let edge = self.clockwise_edges.len() as u64;
            self.clockwise_edges.push(edge + 1);
            self.edge_selections.push(0.0);
            self.vertex_points.push(point);
            self.vertex_selections.push(0.0);
        }
        if self.clockwise_edges.len() > first_edge {
            if let Some(last) = self.clockwise_edges.last_mut() {
                *last = first_edge as u64;
            }
        }
    }
}

/// Append an unselected triangle over existing mesh points.
pub fn add_triangle(
    points: &MeshPoints<'_>,
    primitive: &mut Primitive<'_>,
    shell: usize,
    vertices: [u64; 3],
    material: MaterialRef,
) -> Result<(), BuildError> {
    add_polygon(points, primitive, shell, &vertices, material)
}

/// Append an unselected quadrilateral over existing mesh points.
pub fn add_quadrilateral(
    points: &MeshPoints<'_>,
    primitive: &mut Primitive<'_>,
    shell: usize,
    vertices: [u64; 4],
    material: MaterialRef,
) -> Result<(), BuildError> {
    add_polygon(points, primitive, shell, &vertices, material)
}

/// Append an unselected face with optional holes, adding its corners to
/// the mesh as new unselected points. The mesh and the primitive are
/// unchanged on error.
pub fn add_face(
    points: &mut MeshPoints<'_>,
    primitive: &mut Primitive<'_>,
    shell: usize,
    vertices: &[Point3],
    holes: &[Vec<Point3>],
    material: MaterialRef,
) -> Result<(), BuildError> {
    primitive.require_shell(shell)?;
    let face = primitive.face_shells.len();
    let boundaries = || std::iter::once(vertices).chain(holes.iter().map(Vec::as_slice));
    if let Some(boundary) = boundaries().find(|boundary| boundary.len() < 3) {
        return Err(BuildError::TooFewVertices {
            face,
            count: boundary.len() as u64,
        });
    }
    primitive.push_face(shell as u64, 1 + holes.len() as u64, material);
    for boundary in boundaries() {
        let first = points.append(boundary);
        primitive.push_loop(first..first + boundary.len() as u64);
    }
    Ok(())
}

fn add_polygon(
    points: &MeshPoints<'_>,
    primitive: &mut Primitive<'_>,
    shell: usize,
    vertices: &[u64],
    material: MaterialRef,
) -> Result<(), BuildError> {
    primitive.require_shell(shell)?;
    let len = points.count();
    if let Some(&index) = vertices.iter().find(|&&i| i as usize >= len) {
        return Err(BuildError::VertexOutOfBounds { index, len });
    }
    primitive.push_face(shell as u64, 1, material);
    primitive.push_loop(vertices.iter().copied());
    Ok(())
}

/// Topology queries. These assume a validated primitive.
impl<'a> ConstPrimitive<'a> {
    /// The structure arrays, by stored name.
    pub fn structure_arrays(&self) -> Vec<(&'static str, &'a dyn Array)> {
        vec![
            ("shell_types", self.shell_types as &'a dyn Array),
            ("face_shells", self.face_shells as &'a dyn Array),
            ("face_first_loops", self.face_first_loops as &'a dyn Array),
            ("face_loop_counts", self.face_loop_counts as &'a dyn Array),
            ("face_selections", self.face_selections as &'a dyn Array),
            ("face_materials", self.face_materials as &'a dyn Array),
            ("loop_first_edges", self.loop_first_edges as &'a dyn Array),
            ("clockwise_edges", self.clockwise_edges as &'a dyn Array),
            ("edge_selections", self.edge_selections as &'a dyn Array),
            ("vertex_points", self.vertex_points as &'a dyn Array),
            ("vertex_selections", self.vertex_selections as &'a dyn Array),
        ]
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.face_shells.len()
    }

    /// The edges of `loop_index`, in clockwise order.
    pub fn loop_edges(&self, loop_index: usize) -> impl Iterator<Item = usize> + 'a {
        let clockwise_edges = self.clockwise_edges;
        let first_edge = self.loop_first_edges[loop_index] as usize;
        let mut edge = Some(first_edge);
        std::iter::from_fn(move || {
            let current = edge?;
            let next = clockwise_edges[current] as usize;
            edge = (next != first_edge).then_some(next);
            Some(current)
        })
    }

    /// Returns `true` if every face is a triangle without holes.
    pub fn is_triangles(&self) -> bool {
        (0..self.face_count()).all(|face| {
            self.face_loop_counts[face] == 1
                && self.loop_edges(self.face_first_loops[face] as usize).count() == 3
        })
    }

    /// Returns `true` if the first shell is a subdivision surface.
    pub fn is_sds(&self) -> bool {
        self.shell_types.first() == Some(&CATMULL_CLARK)
    }

    /// Returns `true` if every edge has a companion edge running the
    /// opposite way, i.e. the surface has no boundary.
    pub fn is_solid(&self) -> bool {
        self.adjacent_edges().iter().all(Option::is_some)
    }

    /// For each edge, the edge running between the same two points in the
    /// opposite direction, or `None` for boundary edges.
    pub fn adjacent_edges(&self) -> Vec<Option<u64>> {
        let endpoints = |edge: usize| {
            (
                self.vertex_points[edge],
                self.vertex_points[self.clockwise_edges[edge] as usize],
            )
        };
        let by_endpoints: HashMap<(u64, u64), u64> = (0..self.clockwise_edges.len())
            .map(|edge| (endpoints(edge), edge as u64))
            .collect();
        (0..self.clockwise_edges.len())
            .map(|edge| {
                let (from, to) = endpoints(edge);
                by_endpoints.get(&(to, from)).copied()
            })
            .collect()
    }

    /// For each edge, the edge that precedes it in its loop.
    pub fn counterclockwise_edges(&self) -> Vec<u64> {
        let mut counterclockwise = vec![0; self.clockwise_edges.len()];
        for (edge, &next) in self.clockwise_edges.iter().enumerate() {
            counterclockwise[next as usize] = edge as u64;
        }
        counterclockwise
    }

    /// For each edge, the face that owns it.
    pub fn edge_faces(&self) -> Vec<u64> {
        let mut edge_faces = vec![0; self.clockwise_edges.len()];
        for face in 0..self.face_count() {
            let first_loop = self.face_first_loops[face] as usize;
            let loop_count = self.face_loop_counts[face] as usize;
            for loop_index in first_loop..first_loop + loop_count {
                for edge in self.loop_edges(loop_index) {
                    edge_faces[edge] = face as u64;
                }
            }
        }
        edge_faces
    }

    /// For each loop, its number of edges.
    pub fn loop_edge_counts(&self) -> Vec<u64> {
        (0..self.loop_first_edges.len())
            .map(|loop_index| self.loop_edges(loop_index).count() as u64)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;

    fn unit_square() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    /// Two triangles sharing the diagonal 0-2.
    fn split_square() -> Mesh {
        let mut mesh = Mesh::new();
        create_from_faces(
            &mut mesh,
            &unit_square(),
            &[3, 3],
            &[0, 1, 2, 0, 2, 3],
            MaterialRef::NONE,
        )
        .unwrap();
        mesh
    }

    /// A tetrahedron: closed, every edge has a companion.
    fn tetrahedron() -> Mesh {
        let mut mesh = Mesh::new();
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        create_from_faces(
            &mut mesh,
            &vertices,
            &[3, 3, 3, 3],
            &[0, 2, 1, 0, 1, 3, 1, 2, 3, 2, 0, 3],
            MaterialRef::new(1),
        )
        .unwrap();
        mesh
    }

    fn edit(mesh: &mut Mesh, f: impl FnOnce(&mut Primitive<'_>)) {
        mesh.with_primitives_mut(|mesh, primitives| {
            let mut polyhedron = validate_pipeline(mesh, &mut primitives[0]).unwrap();
            f(&mut polyhedron);
        });
    }

    #[test]
    fn create_from_faces_builds_closed_loops() {
        let mesh = split_square();
        let polyhedron = validate(&mesh, mesh.primitives[0].get().unwrap()).unwrap();
        assert_eq!(polyhedron.shell_types.as_slice(), &[POLYGONS]);
        assert_eq!(polyhedron.face_first_loops.as_slice(), &[0, 1]);
        assert_eq!(polyhedron.loop_first_edges.as_slice(), &[0, 3]);
        assert_eq!(polyhedron.clockwise_edges.as_slice(), &[1, 2, 0, 4, 5, 3]);
        assert_eq!(polyhedron.vertex_points.as_slice(), &[0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.point_count(), 4);
        assert!(polyhedron.is_triangles());
        assert!(!polyhedron.is_sds());
    }

    #[test]
    fn create_from_faces_offsets_indices() {
        let mut mesh = Mesh::new();
        mesh.add_points(&[Point3::default(); 2]);
        create_from_faces(&mut mesh, &unit_square(), &[4], &[0, 1, 2, 3], MaterialRef::NONE)
            .unwrap();
        let polyhedron = validate(&mesh, mesh.primitives[0].get().unwrap()).unwrap();
        assert_eq!(polyhedron.vertex_points.as_slice(), &[2, 3, 4, 5]);
        assert!(!polyhedron.is_triangles());
    }

    #[test]
    fn create_from_faces_rejects_bad_input() {
        let mut mesh = Mesh::new();
        let square = unit_square();
        assert_eq!(
            create_from_faces(&mut mesh, &square, &[3, 2], &[0, 1, 2, 0, 1], MaterialRef::NONE)
                .err(),
            Some(BuildError::TooFewVertices { face: 1, count: 2 })
        );
        assert_eq!(
            create_from_faces(&mut mesh, &square, &[3], &[0, 1], MaterialRef::NONE).err(),
            Some(BuildError::IndexCountMismatch { expected: 3, found: 2 })
        );
        assert_eq!(
            create_from_faces(&mut mesh, &square, &[3], &[0, 1, 4], MaterialRef::NONE).err(),
            Some(BuildError::VertexOutOfBounds { index: 4, len: 4 })
        );
        assert!(matches!(
            create_from_faces(&mut mesh, &square, &[u64::MAX, 3], &[0, 1, 2], MaterialRef::NONE),
            Err(BuildError::IndexCountMismatch { found: 3, .. })
        ));
        assert_eq!(mesh.point_count(), 0);
        assert!(mesh.primitives.is_empty());
    }

    #[test]
    fn add_triangle_and_quadrilateral() {
        let mut mesh = Mesh::new();
        mesh.add_points(&unit_square());
        {
            let (points, primitives) = mesh.split_mut();
            let mut polyhedron = create_in(primitives);
            assert_eq!(
                add_triangle(&points, &mut polyhedron, 0, [0, 1, 2], MaterialRef::NONE),
                Err(BuildError::InvalidShell { shell: 0, shell_count: 0 })
            );
            polyhedron.shell_types.push(POLYGONS);
            add_triangle(&points, &mut polyhedron, 0, [0, 1, 2], MaterialRef::NONE).unwrap();
            add_quadrilateral(&points, &mut polyhedron, 0, [0, 1, 2, 3], MaterialRef::NONE)
                .unwrap();
            assert_eq!(polyhedron.clockwise_edges.as_slice(), &[1, 2, 0, 4, 5, 6, 3]);
            assert_eq!(polyhedron.as_const().loop_edge_counts(), vec![3, 4]);
        }
        assert!(validate(&mesh, mesh.primitives[0].get().unwrap()).is_some());
    }

    #[test]
    fn added_faces_must_use_existing_points() {
        let mut mesh = Mesh::new();
        mesh.add_points(&unit_square());
        {
            let (points, primitives) = mesh.split_mut();
            let mut polyhedron = create_in(primitives);
            polyhedron.shell_types.push(POLYGONS);
            assert_eq!(
                add_triangle(&points, &mut polyhedron, 0, [0, 1, 4], MaterialRef::NONE),
                Err(BuildError::VertexOutOfBounds { index: 4, len: 4 })
            );
            assert_eq!(
                add_quadrilateral(&points, &mut polyhedron, 0, [9, 1, 2, 3], MaterialRef::NONE),
                Err(BuildError::VertexOutOfBounds { index: 9, len: 4 })
            );
            assert!(polyhedron.face_shells.is_empty());
            assert!(polyhedron.clockwise_edges.is_empty());
        }
        assert!(validate(&mesh, mesh.primitives[0].get().unwrap()).is_some());
    }

    #[test]
    fn add_face_with_hole() {
        let mut mesh = Mesh::new();
        let (mut points, primitives) = mesh.split_mut();
        let mut polyhedron = create_in(primitives);
        polyhedron.shell_types.push(POLYGONS);
        let hole = vec![
            Point3::new(0.25, 0.25, 0.0),
            Point3::new(0.75, 0.25, 0.0),
            Point3::new(0.5, 0.75, 0.0),
        ];
        add_face(&mut points, &mut polyhedron, 0, &unit_square(), &[hole], MaterialRef::NONE)
            .unwrap();
        assert_eq!(
            add_face(&mut points, &mut polyhedron, 0, &unit_square()[..2], &[], MaterialRef::NONE),
            Err(BuildError::TooFewVertices { face: 1, count: 2 })
        );
        assert_eq!(points.count(), 7);

        let polyhedron = validate(&mesh, mesh.primitives[0].get().unwrap()).unwrap();
        assert_eq!(polyhedron.face_loop_counts.as_slice(), &[2]);
        assert_eq!(polyhedron.loop_first_edges.as_slice(), &[0, 4]);
        assert_eq!(polyhedron.edge_faces(), vec![0; 7]);
        assert!(!polyhedron.is_triangles());
    }

    #[test]
    fn topology_lookups() {
        let mesh = tetrahedron();
        let polyhedron = validate(&mesh, mesh.primitives[0].get().unwrap()).unwrap();
        assert!(polyhedron.is_solid());
        assert_eq!(polyhedron.edge_faces(), vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3]);
        let counterclockwise = polyhedron.counterclockwise_edges();
        for (edge, &next) in polyhedron.clockwise_edges.iter().enumerate() {
            assert_eq!(counterclockwise[next as usize], edge as u64);
        }

        let open = split_square();
        let polyhedron = validate(&open, open.primitives[0].get().unwrap()).unwrap();
        assert!(!polyhedron.is_solid());
        let adjacent = polyhedron.adjacent_edges();
        assert_eq!(adjacent[2], Some(3));
        assert_eq!(adjacent[3], Some(2));
        assert_eq!(adjacent.iter().filter(|e| e.is_none()).count(), 4);
    }

    #[test]
    fn sds_follows_the_first_shell() {
        let mut mesh = split_square();
        edit(&mut mesh, |polyhedron| polyhedron.shell_types[0] = CATMULL_CLARK);
        let polyhedron = validate(&mesh, mesh.primitives[0].get().unwrap()).unwrap();
        assert!(polyhedron.is_sds());
    }

    #[test]
    fn face_shells_must_exist() {
        let mut mesh = split_square();
        edit(&mut mesh, |polyhedron| polyhedron.face_shells[1] = 1);
        assert_eq!(
            try_validate(&mesh, mesh.primitives[0].get().unwrap()).err(),
            Some(ValidationError::IndexOutOfBounds {
                array: "face_shells".into(),
                index: 1,
                len: 1,
            })
        );
    }

    #[test]
    fn out_of_bounds_edges_are_rejected() {
        let mut mesh = split_square();
        edit(&mut mesh, |polyhedron| polyhedron.clockwise_edges[4] = 9);
        assert!(matches!(
            try_validate(&mesh, mesh.primitives[0].get().unwrap()),
            Err(ValidationError::IndexOutOfBounds { index: 9, len: 6, .. })
        ));
    }

    #[test]
    fn edges_outside_every_loop_are_still_bounded() {
        let mut mesh = split_square();
        edit(&mut mesh, |polyhedron| {
            polyhedron.clockwise_edges.push(99);
            polyhedron.edge_selections.push(0.0);
            polyhedron.vertex_points.push(0);
            polyhedron.vertex_selections.push(0.0);
        });
        assert_eq!(
            try_validate(&mesh, mesh.primitives[0].get().unwrap()).err(),
            Some(ValidationError::IndexOutOfBounds {
                array: "clockwise_edges".into(),
                index: 99,
                len: 7,
            })
        );
        assert!(validate(&mesh, mesh.primitives[0].get().unwrap()).is_none());
    }

    #[test]
    fn edges_outside_every_loop_may_close_on_themselves() {
        let mut mesh = split_square();
        edit(&mut mesh, |polyhedron| {
            polyhedron.clockwise_edges.push(6);
            polyhedron.edge_selections.push(0.0);
            polyhedron.vertex_points.push(1);
            polyhedron.vertex_selections.push(0.0);
        });
        let polyhedron = validate(&mesh, mesh.primitives[0].get().unwrap()).unwrap();
        assert_eq!(polyhedron.counterclockwise_edges()[6], 6);
        assert_eq!(polyhedron.adjacent_edges().len(), 7);
    }

    #[test]
    fn overflowing_loop_counts_are_rejected() {
        let mut mesh = split_square();
        edit(&mut mesh, |polyhedron| polyhedron.face_loop_counts[0] = u64::MAX);
        assert_eq!(
            try_validate(&mesh, mesh.primitives[0].get().unwrap()).err(),
            Some(ValidationError::CountOverflow {
                array: "face_loop_counts".into(),
            })
        );
        assert!(validate(&mesh, mesh.primitives[0].get().unwrap()).is_none());
    }

    #[test]
    fn loops_that_never_close_are_rejected() {
        let mut mesh = split_square();
        // 3 -> 4 -> 5 -> 4 -> 5 ... never returns to 3.
        edit(&mut mesh, |polyhedron| polyhedron.clockwise_edges[5] = 4);
        assert_eq!(
            try_validate(&mesh, mesh.primitives[0].get().unwrap()).err(),
            Some(ValidationError::InfiniteLoop { loop_index: 1 })
        );
        assert!(validate(&mesh, mesh.primitives[0].get().unwrap()).is_none());
    }

    #[test]
    fn loop_rows_follow_face_loop_counts() {
        let mut mesh = split_square();
        edit(&mut mesh, |polyhedron| polyhedron.face_loop_counts[1] = 2);
        assert!(matches!(
            try_validate(&mesh, mesh.primitives[0].get().unwrap()),
            Err(ValidationError::RowCountMismatch { expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn compliance() {
        compliance::run_full_compliance::<Kind>(&split_square(), 0);
        compliance::run_full_compliance::<Kind>(&tetrahedron(), 0);
    }
}
