//! Shared layout of the polynomial curve kinds (`linear_curve` and
//! `cubic_curve`).
//!
//! Curves index the mesh points through a `vertex` table; each row of the
//! `curve` table names a contiguous run of vertices. The `constant` table
//! holds one `periodic` flag and one material for the whole primitive.

/// Parameter attribute rows per curve (one per end).
pub const PARAMETER_ROWS_PER_CURVE: usize = 2;

/// Expands to a complete polynomial curve kind module body.
///
/// `order` is the number of control points a single segment needs, the
/// minimum accepted by `add_curve`.
macro_rules! polynomial_curve {
    (kind: $kind:literal, order: $order:literal $(,)?) => {
        /// Kind tag of this curve type.
        pub const KIND: &str = $kind;

        /// Fewest control points a curve may have.
        pub const MIN_CONTROL_POINTS: usize = $order;

        /// Read-only view of one curve primitive.
        #[derive(Clone, Copy, Debug)]
        pub struct ConstPrimitive<'a> {
            /// Single flag: whether every curve closes on itself.
            pub periodic: &'a $crate::mesh::Bools,
            /// Single material for every curve.
            pub material: &'a $crate::mesh::Materials,
            /// Per-curve index of the first vertex.
            pub curve_first_points: &'a $crate::mesh::Indices,
            /// Per-curve vertex count.
            pub curve_point_counts: &'a $crate::mesh::Counts,
            /// Per-curve selection weights.
            pub curve_selections: &'a $crate::mesh::Selection,
            /// Per-vertex mesh point index.
            pub curve_points: &'a $crate::mesh::Indices,
            /// Attributes shared by every curve.
            pub constant_attributes: &'a ::k3d_array::Table,
            /// Per-curve attributes.
            pub curve_attributes: &'a ::k3d_array::Table,
            /// Per-curve-end attributes.
            pub parameter_attributes: &'a ::k3d_array::Table,
            /// Per-vertex attributes.
            pub vertex_attributes: &'a ::k3d_array::Table,
        }

        /// Mutable view of one curve primitive.
        #[derive(Debug)]
        pub struct Primitive<'a> {
            /// Single flag: whether every curve closes on itself.
            pub periodic: &'a mut $crate::mesh::Bools,
            /// Single material for every curve.
            pub material: &'a mut $crate::mesh::Materials,
            /// Per-curve index of the first vertex.
            pub curve_first_points: &'a mut $crate::mesh::Indices,
            /// Per-curve vertex count.
            pub curve_point_counts: &'a mut $crate::mesh::Counts,
            /// Per-curve selection weights.
            pub curve_selections: &'a mut $crate::mesh::Selection,
            /// Per-vertex mesh point index.
            pub curve_points: &'a mut $crate::mesh::Indices,
            /// Attributes shared by every curve.
            pub constant_attributes: &'a mut ::k3d_array::Table,
            /// Per-curve attributes.
            pub curve_attributes: &'a mut ::k3d_array::Table,
            /// Per-curve-end attributes.
            pub parameter_attributes: &'a mut ::k3d_array::Table,
            /// Per-vertex attributes.
            pub vertex_attributes: &'a mut ::k3d_array::Table,
        }

        impl Primitive<'_> {
            /// Read-only view of the same storage.
            pub fn as_const(&self) -> ConstPrimitive<'_> {
                ConstPrimitive {
                    periodic: self.periodic,
                    material: self.material,
                    curve_first_points: self.curve_first_points,
                    curve_point_counts: self.curve_point_counts,
                    curve_selections: self.curve_selections,
                    curve_points: self.curve_points,
                    constant_attributes: self.constant_attributes,
                    curve_attributes: self.curve_attributes,
                    parameter_attributes: self.parameter_attributes,
                    vertex_attributes: self.vertex_attributes,
                }
            }
        }

        impl<'a> ConstPrimitive<'a> {
            /// The structure arrays, by stored name.
            pub fn structure_arrays(&self) -> Vec<(&'static str, &'a dyn ::k3d_array::Array)> {
                vec![
                    ("periodic", self.periodic as &'a dyn ::k3d_array::Array),
                    ("material", self.material as &'a dyn ::k3d_array::Array),
                    ("curve_first_points", self.curve_first_points as &'a dyn ::k3d_array::Array),
                    ("curve_point_counts", self.curve_point_counts as &'a dyn ::k3d_array::Array),
                    ("curve_selections", self.curve_selections as &'a dyn ::k3d_array::Array),
                    ("curve_points", self.curve_points as &'a dyn ::k3d_array::Array),
                ]
            }
        }

        /// Append an empty primitive of this kind to `primitives`.
        ///
        /// The constant table gets its single row: not periodic, no material.
        pub fn create_in(primitives: &mut $crate::primitive::Primitives) -> Primitive<'_> {
            use ::k3d_array::Array as _;
            use ::k3d_core::metadata::{key, value};

            let generic = primitives.create(KIND);
            let constant = generic.structure.create("constant");
            constant.create::<$crate::mesh::Bools>("periodic").push(false);
            constant
                .create::<$crate::mesh::Materials>("material")
                .push(::k3d_core::MaterialRef::NONE);
            let curve = generic.structure.create("curve");
            curve.create::<$crate::mesh::Indices>("curve_first_points");
            curve.create::<$crate::mesh::Counts>("curve_point_counts");
            curve
                .create::<$crate::mesh::Selection>("curve_selections")
                .set_metadata_value(key::ROLE, value::SELECTION);
            generic
                .structure
                .create("vertex")
                .create::<$crate::mesh::Indices>("curve_points")
                .set_metadata_value(key::DOMAIN, value::POINT_INDICES);
            for name in ["constant", "curve", "parameter", "vertex"] {
                generic.attributes.create(name);
            }
            bind_mut(generic).expect("freshly created curve primitive is well-formed")
        }

        /// Validate a generic primitive as this kind, reporting the first
        /// problem found.
        pub fn try_validate<'a>(
            mesh: &$crate::mesh::Mesh,
            primitive: &'a $crate::primitive::GenericPrimitive,
        ) -> Result<ConstPrimitive<'a>, $crate::error::ValidationError> {
            use $crate::mesh::{Bools, Counts, Indices, Materials, Selection};
            use $crate::validation::*;
            use ::k3d_core::metadata::{key, value};

            require_kind(primitive, KIND)?;
            require_valid_primitive(mesh, primitive)?;

            let constant = require_structure(primitive, "constant")?;
            let curve = require_structure(primitive, "curve")?;
            let vertex = require_structure(primitive, "vertex")?;

            let constant_attributes = require_attributes(primitive, "constant")?;
            let curve_attributes = require_attributes(primitive, "curve")?;
            let parameter_attributes = require_attributes(primitive, "parameter")?;
            let vertex_attributes = require_attributes(primitive, "vertex")?;

            let periodic = require_array::<Bools>(constant, "constant", "periodic")?;
            let material = require_array::<Materials>(constant, "constant", "material")?;
            let curve_first_points = require_array::<Indices>(curve, "curve", "curve_first_points")?;
            let curve_point_counts = require_array::<Counts>(curve, "curve", "curve_point_counts")?;
            let curve_selections = require_array::<Selection>(curve, "curve", "curve_selections")?;
            let curve_points = require_array::<Indices>(vertex, "vertex", "curve_points")?;

            require_metadata(curve_selections, "curve_selections", key::ROLE, value::SELECTION)?;
            require_metadata(curve_points, "curve_points", key::DOMAIN, value::POINT_INDICES)?;

            require_table_row_count(vertex, "vertex", total(curve_point_counts, "curve_point_counts")?)?;
            require_table_row_count(curve_attributes, "curve", curve.row_count())?;
            require_table_row_count(
                parameter_attributes,
                "parameter",
                curve.row_count() * $crate::curve::PARAMETER_ROWS_PER_CURVE,
            )?;
            require_table_row_count(vertex_attributes, "vertex", vertex.row_count())?;

            Ok(ConstPrimitive {
                periodic,
                material,
                curve_first_points,
                curve_point_counts,
                curve_selections,
                curve_points,
                constant_attributes,
                curve_attributes,
                parameter_attributes,
                vertex_attributes,
            })
        }

        fn bind_mut(primitive: &mut $crate::primitive::GenericPrimitive) -> Option<Primitive<'_>> {
            use $crate::mesh::{Bools, Counts, Indices, Materials, Selection};

            let $crate::primitive::GenericPrimitive { structure, attributes, .. } = primitive;
            let [constant, curve, vertex] = structure.tables_mut(["constant", "curve", "vertex"])?;
            let [periodic, material] = constant.writable_many(["periodic", "material"])?;
            let [curve_first_points, curve_point_counts, curve_selections] =
                curve.writable_many(["curve_first_points", "curve_point_counts", "curve_selections"])?;
            let [constant_attributes, curve_attributes, parameter_attributes, vertex_attributes] =
                attributes.tables_mut(["constant", "curve", "parameter", "vertex"])?;
            Some(Primitive {
                periodic: periodic.downcast_mut::<Bools>()?,
                material: material.downcast_mut::<Materials>()?,
                curve_first_points: curve_first_points.downcast_mut::<Indices>()?,
                curve_point_counts: curve_point_counts.downcast_mut::<Counts>()?,
                curve_selections: curve_selections.downcast_mut::<Selection>()?,
                curve_points: vertex.writable_as::<Indices>("curve_points")?,
                constant_attributes,
                curve_attributes,
                parameter_attributes,
                vertex_attributes,
            })
        }

        /// Append one curve through `control_points`, adding them to the
        /// mesh as new unselected points.
        ///
        /// Per-curve and per-vertex attribute tables are not extended.
        pub fn add_curve(
            points: &mut $crate::mesh::MeshPoints<'_>,
            primitive: &mut Primitive<'_>,
            control_points: &[::k3d_core::Point3],
        ) -> Result<(), $crate::error::BuildError> {
            if control_points.len() < MIN_CONTROL_POINTS {
                return Err($crate::error::BuildError::TooFewControlPoints {
                    order: MIN_CONTROL_POINTS as u64,
                    count: control_points.len(),
                });
            }
            let first_point = points.append(control_points);
            primitive
                .curve_first_points
                .push(primitive.curve_points.len() as u64);
            primitive.curve_point_counts.push(control_points.len() as u64);
            primitive.curve_selections.push(0.0);
            primitive
                .curve_points
                .extend(first_point..first_point + control_points.len() as u64);
            Ok(())
        }

        $crate::kind::primitive_kind!();
    };
}

pub(crate) use polynomial_curve;
