//! Non-uniform rational B-spline curves.
//!
//! Each curve has an order, a run of weighted control vertices in the
//! `vertex` table, and a run of `count + order` knots in the `knot` table.

use k3d_array::{Array, Table};
use k3d_core::metadata::{key, value};
use k3d_core::{MaterialRef, Point3};

use crate::error::{BuildError, ValidationError};
use crate::mesh::{Counts, Indices, Knots, Materials, Mesh, MeshPoints, Orders, Selection, Weights};
use crate::primitive::{GenericPrimitive, Primitives};
use crate::validation::*;

/// Kind tag of NURBS curves.
pub const KIND: &str = "nurbs_curve";

/// Parameter attribute rows per curve (one per end).
pub const PARAMETER_ROWS_PER_CURVE: usize = 2;

/// Read-only view of one NURBS curve primitive.
#[derive(Clone, Copy, Debug)]
pub struct ConstPrimitive<'a> {
    /// Single material for every curve.
    pub material: &'a Materials,
    /// Per-curve index of the first vertex.
    pub curve_first_points: &'a Indices,
    /// Per-curve vertex count.
    pub curve_point_counts: &'a Counts,
    /// Per-curve order (degree + 1).
    pub curve_orders: &'a Orders,
    /// Per-curve index of the first knot.
    pub curve_first_knots: &'a Indices,
    /// Per-curve selection weights.
    pub curve_selections: &'a Selection,
    /// Per-vertex mesh point index.
    pub curve_points: &'a Indices,
    /// Per-vertex rational weight.
    pub curve_point_weights: &'a Weights,
    /// Concatenated knot vectors.
    pub curve_knots: &'a Knots,
    /// Attributes shared by every curve.
    pub constant_attributes: &'a Table,
    /// Per-curve attributes.
    pub curve_attributes: &'a Table,
    /// Per-curve-end attributes.
    pub parameter_attributes: &'a Table,
    /// Per-vertex attributes.
    pub vertex_attributes: &'a Table,
}

/// Mutable view of one NURBS curve primitive.
#[derive(Debug)]
pub struct Primitive<'a> {
    /// Single material for every curve.
    pub material: &'a mut Materials,
    /// Per-curve index of the first vertex.
    pub curve_first_points: &'a mut Indices,
    /// Per-curve vertex count.
    pub curve_point_counts: &'a mut Counts,
    /// Per-curve order (degree + 1).
    pub curve_orders: &'a mut Orders,
    /// Per-curve index of the first knot.
    pub curve_first_knots: &'a mut Indices,
    /// Per-curve selection weights.
    pub curve_selections: &'a mut Selection,
    /// Per-vertex mesh point index.
    pub curve_points: &'a mut Indices,
    /// Per-vertex rational weight.
    pub curve_point_weights: &'a mut Weights,
    /// Concatenated knot vectors.
    pub curve_knots: &'a mut Knots,
    /// Attributes shared by every curve.
    pub constant_attributes: &'a mut Table,
    /// Per-curve attributes.
    pub curve_attributes: &'a mut Table,
    /// Per-curve-end attributes.
    pub parameter_attributes: &'a mut Table,
    /// Per-vertex attributes.
    pub vertex_attributes: &'a mut Table,
}

impl Primitive<'_> {
    /// Read-only view of the same storage.
    pub fn as_const(&self) -> ConstPrimitive<'_> {
        ConstPrimitive {
            material: self.material,
            curve_first_points: self.curve_first_points,
            curve_point_counts: self.curve_point_counts,
            curve_orders: self.curve_orders,
            curve_first_knots: self.curve_first_knots,
            curve_selections: self.curve_selections,
            curve_points: self.curve_points,
            curve_point_weights: self.curve_point_weights,
            curve_knots: self.curve_knots,
            constant_attributes: self.constant_attributes,
            curve_attributes: self.curve_attributes,
            parameter_attributes: self.parameter_attributes,
            vertex_attributes: self.vertex_attributes,
        }
    }
}

impl<'a> ConstPrimitive<'a> {
    /// The structure arrays, by stored name.
    pub fn structure_arrays(&self) -> Vec<(&'static str, &'a dyn Array)> {
        vec![
            ("material", self.material as &'a dyn Array),
            ("curve_first_points", self.curve_first_points as &'a dyn Array),
            ("curve_point_counts", self.curve_point_counts as &'a dyn Array),
            ("curve_orders", self.curve_orders as &'a dyn Array),
            ("curve_first_knots", self.curve_first_knots as &'a dyn Array),
            ("curve_selections", self.curve_selections as &'a dyn Array),
            ("curve_points", self.curve_points as &'a dyn Array),
            ("curve_point_weights", self.curve_point_weights as &'a dyn Array),
            ("curve_knots", self.curve_knots as &'a dyn Array),
        ]
    }
}

/// Append an empty NURBS curve primitive to `primitives`.
///
/// The constant table gets its single row (no material).
pub fn create_in(primitives: &mut Primitives) -> Primitive<'_> {
    let generic = primitives.create(KIND);
    generic
        .structure
        .create("constant")
        .create::<Materials>("material")
        .push(MaterialRef::NONE);
    let curve = generic.structure.create("curve");
    curve.create::<Indices>("curve_first_points");
    curve.create::<Counts>("curve_point_counts");
    curve.create::<Orders>("curve_orders");
    curve.create::<Indices>("curve_first_knots");
    curve
        .create::<Selection>("curve_selections")
        .set_metadata_value(key::ROLE, value::SELECTION);
    let vertex = generic.structure.create("vertex");
    vertex
        .create::<Indices>("curve_points")
        .set_metadata_value(key::DOMAIN, value::POINT_INDICES);
    vertex.create::<Weights>("curve_point_weights");
    generic
        .structure
        .create("knot")
        .create::<Knots>("curve_knots")
        .set_metadata_value(key::DOMAIN, value::NURBS_KNOT_VECTOR);
    for name in ["constant", "curve", "parameter", "vertex"] {
        generic.attributes.create(name);
    }
    bind_mut(generic).expect("freshly created nurbs curve is well-formed")
}

/// Validate a generic primitive as NURBS curves, reporting the first
/// problem found.
pub fn try_validate<'a>(
    mesh: &Mesh,
    primitive: &'a GenericPrimitive,
) -> Result<ConstPrimitive<'a>, ValidationError> {
    require_kind(primitive, KIND)?;
    require_valid_primitive(mesh, primitive)?;

    let constant = require_structure(primitive, "constant")?;
    let curve = require_structure(primitive, "curve")?;
    let vertex = require_structure(primitive, "vertex")?;
    let knot = require_structure(primitive, "knot")?;

    let constant_attributes = require_attributes(primitive, "constant")?;
    let curve_attributes = require_attributes(primitive, "curve")?;
    let parameter_attributes = require_attributes(primitive, "parameter")?;
    let vertex_attributes = require_attributes(primitive, "vertex")?;

    let material = require_array::<Materials>(constant, "constant", "material")?;
    let curve_first_points = require_array::<Indices>(curve, "curve", "curve_first_points")?;
    let curve_point_counts = require_array::<Counts>(curve, "curve", "curve_point_counts")?;
    let curve_orders = require_array::<Orders>(curve, "curve", "curve_orders")?;
    let curve_first_knots = require_array::<Indices>(curve, "curve", "curve_first_knots")?;
    let curve_selections = require_array::<Selection>(curve, "curve", "curve_selections")?;
    let curve_points = require_array::<Indices>(vertex, "vertex", "curve_points")?;
    let curve_point_weights = require_array::<Weights>(vertex, "vertex", "curve_point_weights")?;
    let curve_knots = require_array::<Knots>(knot, "knot", "curve_knots")?;

    require_metadata(curve_selections, "curve_selections", key::ROLE, value::SELECTION)?;
    require_metadata(curve_points, "curve_points", key::DOMAIN, value::POINT_INDICES)?;

    let point_total = total(curve_point_counts, "curve_point_counts")?;
    let knot_total = point_total
        .checked_add(total(curve_orders, "curve_orders")?)
        .ok_or_else(|| ValidationError::CountOverflow {
            array: "curve_orders".into(),
        })?;
    require_table_row_count(vertex, "vertex", point_total)?;
    require_table_row_count(knot, "knot", knot_total)?;
    require_table_row_count(curve_attributes, "curve", curve.row_count())?;
    require_table_row_count(
        parameter_attributes,
        "parameter",
        curve.row_count() * PARAMETER_ROWS_PER_CURVE,
    )?;
    require_table_row_count(vertex_attributes, "vertex", vertex.row_count())?;

    Ok(ConstPrimitive {
        material,
        curve_first_points,
        curve_point_counts,
        curve_orders,
        curve_first_knots,
        curve_selections,
        curve_points,
        curve_point_weights,
        curve_knots,
        constant_attributes,
        curve_attributes,
        parameter_attributes,
        vertex_attributes,
    })
}

fn bind_mut(primitive: &mut GenericPrimitive) -> Option<Primitive<'_>> {
    let GenericPrimitive {
        structure,
        attributes,
        ..
    } = primitive;
    let [constant, curve, vertex, knot] =
        structure.tables_mut(["constant", "curve", "vertex", "knot"])?;
    let [curve_first_points, curve_point_counts, curve_orders, curve_first_knots, curve_selections] =
        curve.writable_many([
            "curve_first_points",
            "curve_point_counts",
            "curve_orders",
            "curve_first_knots",
            "curve_selections",
        ])?;
    let [curve_points, curve_point_weights] =
        vertex.writable_many(["curve_points", "curve_point_weights"])?;
    let [constant_attributes, curve_attributes, parameter_attributes, vertex_attributes] =
        attributes.tables_mut(["constant", "curve", "parameter", "vertex"])?;
    Some(Primitive {
        material: constant.writable_as::<Materials>("material")?,
        curve_first_points: curve_first_points.downcast_mut::<Indices>()?,
        curve_point_counts: curve_point_counts.downcast_mut::<Counts>()?,
        curve_orders: curve_orders.downcast_mut::<Orders>()?,
        curve_first_knots: curve_first_knots.downcast_mut::<Indices>()?,
        curve_selections: curve_selections.downcast_mut::<Selection>()?,
        curve_points: curve_points.downcast_mut::<Indices>()?,
        curve_point_weights: curve_point_weights.downcast_mut::<Weights>()?,
        curve_knots: knot.writable_as::<Knots>("curve_knots")?,
        constant_attributes,
        curve_attributes,
        parameter_attributes,
        vertex_attributes,
    })
}

crate::kind::primitive_kind!();

/// Append one curve, adding `control_points` to the mesh as new unselected
/// points.
///
/// `repeat_points` extra vertices reuse the first control points in order,
/// which closes the curve for periodic knot vectors. `weights` has one
/// entry per control point and `knots` has
/// `control_points.len() + repeat_points + order` entries. The mesh and the
/// primitive are unchanged on error.
pub fn add_curve(
    points: &mut MeshPoints<'_>,
    primitive: &mut Primitive<'_>,
    order: u64,
    control_points: &[Point3],
    weights: &[f64],
    knots: &[f64],
    repeat_points: usize,
) -> Result<(), BuildError> {
    let count = control_points.len();
    let vertex_count = count + repeat_points;
    if order < 2 {
        return Err(BuildError::InvalidOrder { order });
    }
    if count == 0 || (vertex_count as u64) < order {
        return Err(BuildError::TooFewControlPoints { order, count });
    }
    if weights.len() != count {
        return Err(BuildError::WeightCountMismatch {
            points: count,
            weights: weights.len(),
        });
    }
    let expected = vertex_count + order as usize;
    if knots.len() != expected {
        return Err(BuildError::KnotCountMismatch {
            expected,
            found: knots.len(),
        });
    }

    let first_point = points.append(control_points);
    let start = primitive.curve_points.len();
    primitive.curve_first_points.push(start as u64);
    primitive.curve_point_counts.push(vertex_count as u64);
    primitive.curve_orders.push(order);
    primitive
        .curve_first_knots
        .push(primitive.curve_knots.len() as u64);
    primitive.curve_selections.push(0.0);

    primitive
        .curve_points
        .extend(first_point..first_point + count as u64);
    primitive.curve_point_weights.extend_from_slice(weights);
    for i in 0..repeat_points {
        let repeat = start + i % count;
        let (point, weight) = (
            primitive.curve_points[repeat],
            primitive.curve_point_weights[repeat],
        );
        primitive.curve_points.push(point);
        primitive.curve_point_weights.push(weight);
    }
    primitive.curve_knots.extend_from_slice(knots);
    Ok(())
}

/// [`add_curve`] with unit weights and an open uniform knot vector.
pub fn add_open_uniform_curve(
    points: &mut MeshPoints<'_>,
    primitive: &mut Primitive<'_>,
    order: u64,
    control_points: &[Point3],
    repeat_points: usize,
) -> Result<(), BuildError> {
    let weights = vec![1.0; control_points.len()];
    let mut knots = Vec::new();
    add_open_uniform_knots(order, (control_points.len() + repeat_points) as u64, &mut knots);
    add_curve(
        points,
        primitive,
        order,
        control_points,
        &weights,
        &knots,
        repeat_points,
    )
}

/// Append an open uniform knot vector for `control_point_count` control
/// points: `order` zeros, the integers `1..=count - order`, and `order`
/// copies of `count - order + 1`.
///
/// Appends nothing if there are fewer control points than `order`.
pub fn add_open_uniform_knots(order: u64, control_point_count: u64, knots: &mut Vec<f64>) {
    if control_point_count < order {
        return;
    }
    let interior = control_point_count - order;
    knots.extend(std::iter::repeat_n(0.0, order as usize));
    knots.extend((1..=interior).map(|i| i as f64));
    knots.extend(std::iter::repeat_n((interior + 1) as f64, order as usize));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;

    fn square() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    fn mesh_with_curve(repeat_points: usize) -> Mesh {
        let mut mesh = Mesh::new();
        let (mut points, primitives) = mesh.split_mut();
        let mut curves = create_in(primitives);
        add_open_uniform_curve(&mut points, &mut curves, 3, &square(), repeat_points).unwrap();
        mesh
    }

    #[test]
    fn open_uniform_knots() {
        let mut knots = Vec::new();
        add_open_uniform_knots(3, 5, &mut knots);
        assert_eq!(knots, vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0, 3.0]);

        let mut knots = Vec::new();
        add_open_uniform_knots(4, 4, &mut knots);
        assert_eq!(knots, vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn open_uniform_knots_for_short_curves_is_empty() {
        let mut knots = vec![7.0];
        add_open_uniform_knots(4, 3, &mut knots);
        assert_eq!(knots, vec![7.0]);
    }

    #[test]
    fn add_curve_fills_every_table() {
        let mesh = mesh_with_curve(0);
        let curves = validate(&mesh, mesh.primitives[0].get().unwrap()).unwrap();
        assert_eq!(curves.curve_orders.as_slice(), &[3]);
        assert_eq!(curves.curve_point_counts.as_slice(), &[4]);
        assert_eq!(curves.curve_points.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(curves.curve_point_weights.as_slice(), &[1.0; 4]);
        assert_eq!(curves.curve_knots.len(), 7);
        assert_eq!(mesh.point_count(), 4);
    }

    #[test]
    fn repeat_points_reuse_control_points() {
        let mesh = mesh_with_curve(2);
        let curves = validate(&mesh, mesh.primitives[0].get().unwrap()).unwrap();
        assert_eq!(curves.curve_points.as_slice(), &[0, 1, 2, 3, 0, 1]);
        assert_eq!(curves.curve_point_counts.as_slice(), &[6]);
        assert_eq!(curves.curve_knots.len(), 9);
        assert_eq!(mesh.point_count(), 4);
    }

    #[test]
    fn add_curve_checks_its_input() {
        let mut mesh = Mesh::new();
        let (mut points, primitives) = mesh.split_mut();
        let mut curves = create_in(primitives);
        let control = square();
        let weights = [1.0; 4];
        let knots = [0.0; 7];

        assert_eq!(
            add_curve(&mut points, &mut curves, 1, &control, &weights, &knots, 0),
            Err(BuildError::InvalidOrder { order: 1 })
        );
        assert_eq!(
            add_curve(&mut points, &mut curves, 5, &control, &weights, &knots, 0),
            Err(BuildError::TooFewControlPoints { order: 5, count: 4 })
        );
        assert_eq!(
            add_curve(&mut points, &mut curves, 3, &control, &weights[..3], &knots, 0),
            Err(BuildError::WeightCountMismatch { points: 4, weights: 3 })
        );
        assert_eq!(
            add_curve(&mut points, &mut curves, 3, &control, &weights, &knots[..6], 0),
            Err(BuildError::KnotCountMismatch { expected: 7, found: 6 })
        );
        assert!(curves.curve_points.is_empty());
        assert_eq!(points.count(), 0);
    }

    #[test]
    fn knot_rows_must_match_counts_and_orders() {
        let mut mesh = mesh_with_curve(0);
        mesh.with_primitives_mut(|mesh, primitives| {
            let curves = validate_pipeline(mesh, &mut primitives[0]).unwrap();
            curves.curve_knots.push(4.0);
        });
        assert!(matches!(
            try_validate(&mesh, mesh.primitives[0].get().unwrap()),
            Err(ValidationError::RowCountMismatch { expected: 7, found: 8, .. })
        ));
    }

    #[test]
    fn overflowing_knot_totals_are_rejected() {
        let mut mesh = mesh_with_curve(0);
        mesh.with_primitives_mut(|mesh, primitives| {
            let curves = validate_pipeline(mesh, &mut primitives[0]).unwrap();
            curves.curve_orders[0] = u64::MAX - 1;
        });
        assert_eq!(
            try_validate(&mesh, mesh.primitives[0].get().unwrap()).err(),
            Some(ValidationError::CountOverflow {
                array: "curve_orders".into(),
            })
        );
    }

    #[test]
    fn compliance() {
        compliance::run_full_compliance::<Kind>(&mesh_with_curve(1), 0);
    }
}
