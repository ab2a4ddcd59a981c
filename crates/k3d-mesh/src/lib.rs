//! Generic mesh storage and typed primitive views for K-3D.
//!
//! A [`Mesh`] holds shared points plus any number of
//! [`GenericPrimitive`]s. A generic primitive is only a kind tag and two
//! sets of named tables; the per-kind modules give it meaning. Each kind
//! module follows the same pattern:
//!
//! - `create(&mut Mesh)` appends an empty, well-formed primitive and
//!   returns a mutable typed view over it;
//! - `validate(&Mesh, &GenericPrimitive)` checks the kind tag and the
//!   table layout and returns a read-only typed view, or `None`;
//! - `validate_mut` and `validate_pipeline` do the same for writing, the
//!   latter copying a shared primitive only when its kind matches.
//!
//! Typed views borrow the generic storage; they never own or copy it.
//!
//! # Kinds
//!
//! - Quadrics: [`disk`], [`torus`], [`sphere`], [`cylinder`], [`cone`],
//!   [`paraboloid`], [`hyperboloid`]
//! - Curves: [`linear_curve`], [`cubic_curve`], [`nurbs_curve`]
//! - Patches: [`bilinear_patch`], [`bicubic_patch`]
//! - [`polyhedron`], [`particle`], [`blobby`]

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod kind;
pub mod mesh;
pub mod primitive;
pub mod validation;

mod curve;
mod patch;
mod quadric;

pub mod bicubic_patch;
pub mod bilinear_patch;
pub mod blobby;
pub mod cone;
pub mod cubic_curve;
pub mod cylinder;
pub mod disk;
pub mod hyperboloid;
pub mod linear_curve;
pub mod nurbs_curve;
pub mod paraboloid;
pub mod particle;
pub mod polyhedron;
pub mod sphere;
pub mod torus;

#[cfg(test)]
pub(crate) mod compliance;

pub use error::{BuildError, ValidationError};
pub use kind::PrimitiveKind;
pub use mesh::{
    Bools, Counts, Doubles, Indices, Knots, Materials, Matrices, Mesh, MeshPoints, Orders, Points,
    Selection, Weights,
};
pub use primitive::{GenericPrimitive, NamedTables, Primitives};
