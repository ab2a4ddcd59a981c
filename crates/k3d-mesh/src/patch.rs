//! Shared layout of the fixed-size patch kinds (`bilinear_patch` and
//! `bicubic_patch`).
//!
//! Every patch owns a fixed number of consecutive rows in the `vertex`
//! table, so only the per-patch table needs to be stored.

/// Parameter attribute rows per patch (one per corner).
pub const PARAMETER_ROWS_PER_PATCH: usize = 4;

/// Expands to a complete patch kind module body.
macro_rules! patch {
    (kind: $kind:literal, points_per_patch: $n:literal $(,)?) => {
        /// Kind tag of this patch type.
        pub const KIND: &str = $kind;

        /// Control points per patch, in row-major order.
        pub const POINTS_PER_PATCH: usize = $n;

        /// Read-only view of one patch primitive.
        #[derive(Clone, Copy, Debug)]
        pub struct ConstPrimitive<'a> {
            /// Per-patch selection weights.
            pub patch_selections: &'a $crate::mesh::Selection,
            /// Per-patch materials.
            pub patch_materials: &'a $crate::mesh::Materials,
            /// Per-control-point mesh point index.
            pub patch_points: &'a $crate::mesh::Indices,
            /// Attributes shared by every patch.
            pub constant_attributes: &'a ::k3d_array::Table,
            /// Per-patch attributes.
            pub patch_attributes: &'a ::k3d_array::Table,
            /// Per-patch-corner attributes.
            pub parameter_attributes: &'a ::k3d_array::Table,
            /// Per-control-point attributes.
            pub vertex_attributes: &'a ::k3d_array::Table,
        }

        /// Mutable view of one patch primitive.
        #[derive(Debug)]
        pub struct Primitive<'a> {
            /// Per-patch selection weights.
            pub patch_selections: &'a mut $crate::mesh::Selection,
            /// Per-patch materials.
            pub patch_materials: &'a mut $crate::mesh::Materials,
            /// Per-control-point mesh point index.
            pub patch_points: &'a mut $crate::mesh::Indices,
            /// Attributes shared by every patch.
            pub constant_attributes: &'a mut ::k3d_array::Table,
            /// Per-patch attributes.
            pub patch_attributes: &'a mut ::k3d_array::Table,
            /// Per-patch-corner attributes.
            pub parameter_attributes: &'a mut ::k3d_array::Table,
            /// Per-control-point attributes.
            pub vertex_attributes: &'a mut ::k3d_array::Table,
        }

        impl Primitive<'_> {
            /// Read-only view of the same storage.
            pub fn as_const(&self) -> ConstPrimitive<'_> {
                ConstPrimitive {
                    patch_selections: self.patch_selections,
                    patch_materials: self.patch_materials,
                    patch_points: self.patch_points,
                    constant_attributes: self.constant_attributes,
                    patch_attributes: self.patch_attributes,
                    parameter_attributes: self.parameter_attributes,
                    vertex_attributes: self.vertex_attributes,
                }
            }
        }

        impl<'a> ConstPrimitive<'a> {
            /// The structure arrays, by stored name.
            pub fn structure_arrays(&self) -> Vec<(&'static str, &'a dyn ::k3d_array::Array)> {
                vec![
                    ("patch_selections", self.patch_selections as &'a dyn ::k3d_array::Array),
                    ("patch_materials", self.patch_materials as &'a dyn ::k3d_array::Array),
                    ("patch_points", self.patch_points as &'a dyn ::k3d_array::Array),
                ]
            }
        }

        /// Append an empty primitive of this kind to `primitives`.
        pub fn create_in(primitives: &mut $crate::primitive::Primitives) -> Primitive<'_> {
            use ::k3d_array::Array as _;
            use ::k3d_core::metadata::{key, value};

            let generic = primitives.create(KIND);
            let patch = generic.structure.create("patch");
            patch
                .create::<$crate::mesh::Selection>("patch_selections")
                .set_metadata_value(key::ROLE, value::SELECTION);
            patch.create::<$crate::mesh::Materials>("patch_materials");
            generic
                .structure
                .create("vertex")
                .create::<$crate::mesh::Indices>("patch_points")
                .set_metadata_value(key::DOMAIN, value::POINT_INDICES);
            for name in ["constant", "patch", "parameter", "vertex"] {
                generic.attributes.create(name);
            }
            bind_mut(generic).expect("freshly created patch primitive is well-formed")
        }

        /// Validate a generic primitive as this kind, reporting the first
        /// problem found.
        pub fn try_validate<'a>(
            mesh: &$crate::mesh::Mesh,
            primitive: &'a $crate::primitive::GenericPrimitive,
        ) -> Result<ConstPrimitive<'a>, $crate::error::ValidationError> {
            use $crate::mesh::{Indices, Materials, Selection};
            use $crate::validation::*;
            use ::k3d_core::metadata::{key, value};

            require_kind(primitive, KIND)?;
            require_valid_primitive(mesh, primitive)?;

            let patch = require_structure(primitive, "patch")?;
            let vertex = require_structure(primitive, "vertex")?;

            let constant_attributes = require_attributes(primitive, "constant")?;
            let patch_attributes = require_attributes(primitive, "patch")?;
            let parameter_attributes = require_attributes(primitive, "parameter")?;
            let vertex_attributes = require_attributes(primitive, "vertex")?;

            let patch_selections = require_array::<Selection>(patch, "patch", "patch_selections")?;
            let patch_materials = require_array::<Materials>(patch, "patch", "patch_materials")?;
            let patch_points = require_array::<Indices>(vertex, "vertex", "patch_points")?;

            require_metadata(patch_selections, "patch_selections", key::ROLE, value::SELECTION)?;
            require_metadata(patch_points, "patch_points", key::DOMAIN, value::POINT_INDICES)?;

            let patches = patch.row_count();
            require_table_row_count(vertex, "vertex", patches * POINTS_PER_PATCH)?;
            require_table_row_count(patch_attributes, "patch", patches)?;
            require_table_row_count(
                parameter_attributes,
                "parameter",
                patches * $crate::patch::PARAMETER_ROWS_PER_PATCH,
            )?;
            require_table_row_count(vertex_attributes, "vertex", vertex.row_count())?;

            Ok(ConstPrimitive {
                patch_selections,
                patch_materials,
                patch_points,
                constant_attributes,
                patch_attributes,
                parameter_attributes,
                vertex_attributes,
            })
        }

        fn bind_mut(primitive: &mut $crate::primitive::GenericPrimitive) -> Option<Primitive<'_>> {
            let $crate::primitive::GenericPrimitive { structure, attributes, .. } = primitive;
            let [patch, vertex] = structure.tables_mut(["patch", "vertex"])?;
            let [patch_selections, patch_materials] =
                patch.writable_many(["patch_selections", "patch_materials"])?;
            let [constant_attributes, patch_attributes, parameter_attributes, vertex_attributes] =
                attributes.tables_mut(["constant", "patch", "parameter", "vertex"])?;
            Some(Primitive {
                patch_selections: patch_selections.downcast_mut::<$crate::mesh::Selection>()?,
                patch_materials: patch_materials.downcast_mut::<$crate::mesh::Materials>()?,
                patch_points: vertex.writable_as::<$crate::mesh::Indices>("patch_points")?,
                constant_attributes,
                patch_attributes,
                parameter_attributes,
                vertex_attributes,
            })
        }

        /// Append one unselected patch whose control points are added to
        /// the mesh as new unselected points.
        pub fn add_patch(
            points: &mut $crate::mesh::MeshPoints<'_>,
            primitive: &mut Primitive<'_>,
            control_points: &[::k3d_core::Point3],
            material: ::k3d_core::MaterialRef,
        ) -> Result<(), $crate::error::BuildError> {
            if control_points.len() != POINTS_PER_PATCH {
                return Err($crate::error::BuildError::ControlPointCountMismatch {
                    expected: POINTS_PER_PATCH,
                    found: control_points.len(),
                });
            }
            let first = points.append(control_points);
            primitive.patch_selections.push(0.0);
            primitive.patch_materials.push(material);
            primitive
                .patch_points
                .extend(first..first + POINTS_PER_PATCH as u64);
            Ok(())
        }

        $crate::kind::primitive_kind!();
    };
}

pub(crate) use patch;
