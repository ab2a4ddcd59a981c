//! Shared layout of the quadric surfaces.
//!
//! Every quadric kind stores one row per surface in a `surface` structure
//! table (a transformation matrix, a material, the kind's shape
//! parameters, and a selection weight) and carries `constant`, `surface`,
//! and `parameter` attribute tables, with four parameter rows per surface
//! (one per corner of the parameter space).

/// Parameter attribute rows per surface.
pub const PARAMETER_ROWS_PER_SURFACE: usize = 4;

/// Expands to a complete quadric kind module body.
///
/// `arrays` lists the kind's shape parameters, stored in the `surface`
/// table between `materials` and `selections`.
macro_rules! quadric {
    (
        kind: $kind:literal,
        arrays: { $( $(#[$doc:meta])* $field:ident: $ty:ty ),+ $(,)? } $(,)?
    ) => {
        /// Kind tag of this quadric.
        pub const KIND: &str = $kind;

        /// Read-only view of one quadric primitive.
        #[derive(Clone, Copy, Debug)]
        pub struct ConstPrimitive<'a> {
            /// Per-surface object-to-world transformations.
            pub matrices: &'a $crate::mesh::Matrices,
            /// Per-surface materials.
            pub materials: &'a $crate::mesh::Materials,
            $( $(#[$doc])* pub $field: &'a $ty, )+
            /// Per-surface selection weights.
            pub selections: &'a $crate::mesh::Selection,
            /// Attributes shared by the whole primitive.
            pub constant_attributes: &'a ::k3d_array::Table,
            /// Per-surface attributes.
            pub surface_attributes: &'a ::k3d_array::Table,
            /// Per-parameter-corner attributes.
            pub parameter_attributes: &'a ::k3d_array::Table,
        }

        /// Mutable view of one quadric primitive.
        #[derive(Debug)]
        pub struct Primitive<'a> {
            /// Per-surface object-to-world transformations.
            pub matrices: &'a mut $crate::mesh::Matrices,
            /// Per-surface materials.
            pub materials: &'a mut $crate::mesh::Materials,
            $( $(#[$doc])* pub $field: &'a mut $ty, )+
            /// Per-surface selection weights.
            pub selections: &'a mut $crate::mesh::Selection,
            /// Attributes shared by the whole primitive.
            pub constant_attributes: &'a mut ::k3d_array::Table,
            /// Per-surface attributes.
            pub surface_attributes: &'a mut ::k3d_array::Table,
            /// Per-parameter-corner attributes.
            pub parameter_attributes: &'a mut ::k3d_array::Table,
        }

        impl Primitive<'_> {
            /// Number of surfaces.
            pub fn len(&self) -> usize {
                self.matrices.len()
            }

            /// Returns `true` if the primitive has no surfaces.
            pub fn is_empty(&self) -> bool {
                self.matrices.is_empty()
            }

            /// Read-only view of the same storage.
            pub fn as_const(&self) -> ConstPrimitive<'_> {
                ConstPrimitive {
                    matrices: self.matrices,
                    materials: self.materials,
                    $( $field: self.$field, )+
                    selections: self.selections,
                    constant_attributes: self.constant_attributes,
                    surface_attributes: self.surface_attributes,
                    parameter_attributes: self.parameter_attributes,
                }
            }
        }

        impl<'a> ConstPrimitive<'a> {
            /// The `surface` arrays, by stored name.
            pub fn structure_arrays(&self) -> Vec<(&'static str, &'a dyn ::k3d_array::Array)> {
                vec![
                    ("matrices", self.matrices as &'a dyn ::k3d_array::Array),
                    ("materials", self.materials as &'a dyn ::k3d_array::Array),
                    $( (stringify!($field), self.$field as &'a dyn ::k3d_array::Array), )+
                    ("selections", self.selections as &'a dyn ::k3d_array::Array),
                ]
            }
        }

        /// Append an empty primitive of this kind to `primitives`.
        pub fn create_in(primitives: &mut $crate::primitive::Primitives) -> Primitive<'_> {
            use ::k3d_array::Array as _;
            use ::k3d_core::metadata::{key, value};

            let generic = primitives.create(KIND);
            let surface = generic.structure.create("surface");
            surface.create::<$crate::mesh::Matrices>("matrices");
            surface.create::<$crate::mesh::Materials>("materials");
            $( surface.create::<$ty>(stringify!($field)); )+
            surface
                .create::<$crate::mesh::Selection>("selections")
                .set_metadata_value(key::ROLE, value::SELECTION);
            for name in ["constant", "surface", "parameter"] {
                generic.attributes.create(name);
            }
            bind_mut(generic).expect("freshly created quadric is well-formed")
        }

        /// Validate a generic primitive as this kind, reporting the first
        /// problem found.
        pub fn try_validate<'a>(
            mesh: &$crate::mesh::Mesh,
            primitive: &'a $crate::primitive::GenericPrimitive,
        ) -> Result<ConstPrimitive<'a>, $crate::error::ValidationError> {
            use $crate::validation::*;
            use ::k3d_core::metadata::{key, value};

            require_kind(primitive, KIND)?;
            require_valid_primitive(mesh, primitive)?;

            let surface = require_structure(primitive, "surface")?;
            let constant_attributes = require_attributes(primitive, "constant")?;
            let surface_attributes = require_attributes(primitive, "surface")?;
            let parameter_attributes = require_attributes(primitive, "parameter")?;

            let matrices = require_array::<$crate::mesh::Matrices>(surface, "surface", "matrices")?;
            let materials = require_array::<$crate::mesh::Materials>(surface, "surface", "materials")?;
            $( let $field = require_array::<$ty>(surface, "surface", stringify!($field))?; )+
            let selections = require_array::<$crate::mesh::Selection>(surface, "surface", "selections")?;

            require_metadata(selections, "selections", key::ROLE, value::SELECTION)?;
            require_table_row_count(surface_attributes, "surface", surface.row_count())?;
            require_table_row_count(
                parameter_attributes,
                "parameter",
                surface.row_count() * $crate::quadric::PARAMETER_ROWS_PER_SURFACE,
            )?;

            Ok(ConstPrimitive {
                matrices,
                materials,
                $( $field, )+
                selections,
                constant_attributes,
                surface_attributes,
                parameter_attributes,
            })
        }

        fn bind_mut(primitive: &mut $crate::primitive::GenericPrimitive) -> Option<Primitive<'_>> {
            let $crate::primitive::GenericPrimitive { structure, attributes, .. } = primitive;
            let surface = structure.writable("surface")?;
            let [matrices, materials, $( $field, )+ selections] = surface.writable_many([
                "matrices",
                "materials",
                $( stringify!($field), )+
                "selections",
            ])?;
            let [constant_attributes, surface_attributes, parameter_attributes] =
                attributes.tables_mut(["constant", "surface", "parameter"])?;
            Some(Primitive {
                matrices: matrices.downcast_mut::<$crate::mesh::Matrices>()?,
                materials: materials.downcast_mut::<$crate::mesh::Materials>()?,
                $( $field: $field.downcast_mut::<$ty>()?, )+
                selections: selections.downcast_mut::<$crate::mesh::Selection>()?,
                constant_attributes,
                surface_attributes,
                parameter_attributes,
            })
        }

        $crate::kind::primitive_kind!();
    };
}

pub(crate) use quadric;

#[cfg(test)]
mod tests {
    use crate::compliance;
    use crate::mesh::Mesh;
    use crate::{cone, cylinder, disk, hyperboloid, paraboloid, sphere, torus};
    use k3d_core::{MaterialRef, Matrix4, Point3};

    #[test]
    fn every_quadric_round_trips() {
        let mut mesh = Mesh::new();
        {
            let d = disk::create(&mut mesh);
            d.matrices.push(Matrix4::identity());
            d.materials.push(MaterialRef::NONE);
            d.heights.push(0.0);
            d.radii.push(1.0);
            d.sweep_angles.push(std::f64::consts::TAU);
            d.selections.push(0.0);
        }
        torus::create(&mut mesh);
        sphere::create(&mut mesh);
        cylinder::create(&mut mesh);
        cone::create(&mut mesh);
        paraboloid::create(&mut mesh);
        {
            let h = hyperboloid::create(&mut mesh);
            h.matrices.push(Matrix4::identity());
            h.materials.push(MaterialRef::NONE);
            h.start_points.push(Point3::new(1.0, 0.0, -1.0));
            h.end_points.push(Point3::new(0.0, 1.0, 1.0));
            h.sweep_angles.push(std::f64::consts::TAU);
            h.selections.push(1.0);
        }

        compliance::run_full_compliance::<disk::Kind>(&mesh, 0);
        compliance::run_full_compliance::<torus::Kind>(&mesh, 1);
        compliance::run_full_compliance::<sphere::Kind>(&mesh, 2);
        compliance::run_full_compliance::<cylinder::Kind>(&mesh, 3);
        compliance::run_full_compliance::<cone::Kind>(&mesh, 4);
        compliance::run_full_compliance::<paraboloid::Kind>(&mesh, 5);
        compliance::run_full_compliance::<hyperboloid::Kind>(&mesh, 6);
    }

    #[test]
    fn quadrics_reject_each_other() {
        let mut mesh = Mesh::new();
        disk::create(&mut mesh);
        let generic = mesh.primitives[0].get().unwrap();
        assert!(disk::validate(&mesh, generic).is_some());
        assert!(torus::validate(&mesh, generic).is_none());
        assert!(sphere::validate(&mesh, generic).is_none());
        assert!(cone::validate(&mesh, generic).is_none());
    }
}
