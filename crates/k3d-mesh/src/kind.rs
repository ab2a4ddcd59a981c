//! The [`PrimitiveKind`] trait and the entry points shared by every kind.

use k3d_array::Array;

use crate::error::ValidationError;
use crate::mesh::Mesh;
use crate::primitive::GenericPrimitive;

/// A primitive kind: a tag plus the typed views over its storage.
///
/// Every kind module (`disk`, `polyhedron`, ...) exports a `Kind` marker
/// implementing this trait next to its free functions, so generic code such
/// as the test-only compliance helpers can drive any kind.
pub trait PrimitiveKind {
    /// The kind tag stored in [`GenericPrimitive::kind`].
    const KIND: &'static str;

    /// Read-only typed view.
    type Const<'a>;

    /// Mutable typed view.
    type Mut<'a>;

    /// Append an empty, well-formed primitive of this kind to `mesh`.
    fn create(mesh: &mut Mesh) -> Self::Mut<'_>;

    /// Validate `primitive`, reporting why it is not of this kind.
    fn try_validate<'a>(
        mesh: &Mesh,
        primitive: &'a GenericPrimitive,
    ) -> Result<Self::Const<'a>, ValidationError>;

    /// Validate `primitive` and bind a mutable view to it.
    fn validate_mut<'a>(mesh: &Mesh, primitive: &'a mut GenericPrimitive)
        -> Option<Self::Mut<'a>>;

    /// Read-only view of the storage `view` is bound to.
    fn as_const<'v>(view: &'v Self::Mut<'_>) -> Self::Const<'v>;

    /// Every structure array `view` is bound to, by stored name.
    fn structure_arrays<'a>(view: &Self::Const<'a>) -> Vec<(&'static str, &'a dyn Array)>;
}

/// Expands to the `Kind` marker, `create`, `validate`, `validate_mut`, and
/// `validate_pipeline` of a kind module.
///
/// The module must define `KIND`, `ConstPrimitive` (with
/// `structure_arrays`), `Primitive` (with `as_const`), `create_in`,
/// `try_validate`, and `bind_mut`.
macro_rules! primitive_kind {
    () => {
        /// Marker implementing [`PrimitiveKind`](crate::kind::PrimitiveKind)
        /// for this module.
        #[derive(Clone, Copy, Debug, Default)]
        pub struct Kind;

        impl $crate::kind::PrimitiveKind for Kind {
            const KIND: &'static str = KIND;
            type Const<'a> = ConstPrimitive<'a>;
            type Mut<'a> = Primitive<'a>;

            fn create(mesh: &mut $crate::mesh::Mesh) -> Primitive<'_> {
                create(mesh)
            }

            fn try_validate<'a>(
                mesh: &$crate::mesh::Mesh,
                primitive: &'a $crate::primitive::GenericPrimitive,
            ) -> Result<ConstPrimitive<'a>, $crate::error::ValidationError> {
                try_validate(mesh, primitive)
            }

            fn validate_mut<'a>(
                mesh: &$crate::mesh::Mesh,
                primitive: &'a mut $crate::primitive::GenericPrimitive,
            ) -> Option<Primitive<'a>> {
                validate_mut(mesh, primitive)
            }

            fn as_const<'v>(view: &'v Primitive<'_>) -> ConstPrimitive<'v> {
                view.as_const()
            }

            fn structure_arrays<'a>(
                view: &ConstPrimitive<'a>,
            ) -> Vec<(&'static str, &'a dyn ::k3d_array::Array)>
            where
                'a: 'a,
            {
                view.structure_arrays()
            }
        }

        /// Append an empty primitive of this kind to `mesh`.
        pub fn create(mesh: &mut $crate::mesh::Mesh) -> Primitive<'_> {
            create_in(&mut mesh.primitives)
        }

        /// Validate a generic primitive as this kind.
        ///
        /// Returns `None` for primitives of another kind; malformed
        /// primitives of this kind are also logged.
        pub fn validate<'a>(
            mesh: &$crate::mesh::Mesh,
            primitive: &'a $crate::primitive::GenericPrimitive,
        ) -> Option<ConstPrimitive<'a>> {
            $crate::validation::report(KIND, try_validate(mesh, primitive))
        }

        /// Validate a generic primitive as this kind and bind a mutable view.
        pub fn validate_mut<'a>(
            mesh: &$crate::mesh::Mesh,
            primitive: &'a mut $crate::primitive::GenericPrimitive,
        ) -> Option<Primitive<'a>> {
            validate(mesh, primitive)?;
            bind_mut(primitive)
        }

        /// Validate a shared primitive, making it unique only if its kind
        /// tag matches.
        pub fn validate_pipeline<'a>(
            mesh: &$crate::mesh::Mesh,
            primitive: &'a mut ::k3d_array::PipelineData<$crate::primitive::GenericPrimitive>,
        ) -> Option<Primitive<'a>> {
            if primitive.get()?.kind != KIND {
                return None;
            }
            validate_mut(mesh, primitive.writable()?)
        }
    };
}

pub(crate) use primitive_kind;
