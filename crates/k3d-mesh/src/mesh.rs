//! The generic [`Mesh`]: shared points plus a list of generic primitives.

use std::fmt;
use std::mem;

use k3d_array::{Array, PipelineData, Table, TypedArray, UintArray};
use k3d_core::{Accumulator, Difference, MaterialRef, Matrix4, Point3};

use crate::primitive::Primitives;

/// Per-element flags.
pub type Bools = TypedArray<bool>;
/// Per-element scalars.
pub type Doubles = TypedArray<f64>;
/// Indices into another array (or into the mesh points).
pub type Indices = UintArray;
/// Per-element counts.
pub type Counts = UintArray;
/// Per-curve orders.
pub type Orders = UintArray;
/// Per-element selection weights, `0.0` unselected and `1.0` selected.
pub type Selection = TypedArray<f64>;
/// Per-control-point rational weights.
pub type Weights = TypedArray<f64>;
/// Concatenated knot vectors.
pub type Knots = TypedArray<f64>;
/// Per-element materials.
pub type Materials = TypedArray<MaterialRef>;
/// Per-element transformation matrices.
pub type Matrices = TypedArray<Matrix4>;
/// Point positions.
pub type Points = TypedArray<Point3>;

/// Generic geometry: a point cloud shared by any number of primitives.
///
/// Every member is a copy-on-write handle, so cloning a mesh is cheap and
/// a modifier only pays for the parts it writes.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Point positions.
    pub points: PipelineData<Points>,
    /// Per-point selection weights, co-indexed with `points`.
    pub point_selection: PipelineData<Selection>,
    /// Per-point attributes, co-indexed with `points`.
    pub point_attributes: Table,
    /// Primitives, in order.
    pub primitives: Primitives,
}

impl Mesh {
    /// An empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points, zero if the mesh has none.
    pub fn point_count(&self) -> usize {
        self.points.get().map_or(0, |points| points.len())
    }

    /// Append points (unselected) and return the index of the first one.
    pub fn add_points(&mut self, points: &[Point3]) -> u64 {
        self.split_mut().0.append(points)
    }

    /// Borrow the point data and the primitive list independently.
    pub fn split_mut(&mut self) -> (MeshPoints<'_>, &mut Primitives) {
        let Mesh {
            points,
            point_selection,
            point_attributes,
            primitives,
        } = self;
        (
            MeshPoints {
                points,
                selection: point_selection,
                attributes: point_attributes,
            },
            primitives,
        )
    }

    /// Run `f` with read access to the mesh and write access to its
    /// primitives.
    ///
    /// During the call `mesh.primitives` is empty; it is restored when `f`
    /// returns.
    pub fn with_primitives_mut<R>(&mut self, f: impl FnOnce(&Mesh, &mut Primitives) -> R) -> R {
        let mut primitives = mem::take(&mut self.primitives);
        let result = f(self, &mut primitives);
        self.primitives = primitives;
        result
    }
}

impl Difference for Mesh {
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        self.points.difference(&other.points, result);
        self.point_selection.difference(&other.point_selection, result);
        self.point_attributes.difference(&other.point_attributes, result);
        self.primitives.difference(&other.primitives, result);
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "points ({}): {}", self.point_count(), self.points)?;
        writeln!(f, "point selection: {}", self.point_selection)?;
        writeln!(f, "point attributes: {}", self.point_attributes)?;
        for (index, primitive) in self.primitives.iter().enumerate() {
            writeln!(f, "primitive {index}: {primitive}")?;
        }
        Ok(())
    }
}

/// Mutable access to the point data of a mesh.
///
/// Keeps points, selection, and point attributes the same length.
pub struct MeshPoints<'a> {
    points: &'a mut PipelineData<Points>,
    selection: &'a mut PipelineData<Selection>,
    attributes: &'a mut Table,
}

impl MeshPoints<'_> {
    /// Number of points.
    pub fn count(&self) -> usize {
        self.points.get().map_or(0, |points| points.len())
    }

    /// Append points (unselected) and return the index of the first one.
    ///
    /// Point attributes gain default-valued rows.
    pub fn append(&mut self, new_points: &[Point3]) -> u64 {
        let points = self.points.make_writable();
        let offset = points.len();
        points.extend_from_slice(new_points);
        let count = points.len();
        Array::resize(self.selection.make_writable(), count);
        self.attributes.set_row_count(count);
        offset as u64
    }
}
