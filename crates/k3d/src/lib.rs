//! K-3D mesh data: typed heterogeneous arrays, tables, and mesh primitives
//! for node-based 3D pipelines.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all K-3D sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use k3d::prelude::*;
//! use k3d::mesh::polyhedron;
//!
//! let mut mesh = Mesh::new();
//! let square = [
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! polyhedron::create_from_faces(&mut mesh, &square, &[4], &[0, 1, 2, 3], MaterialRef::NONE)
//!     .unwrap();
//!
//! // A downstream stage shares everything until it writes.
//! let mut edited = mesh.clone();
//! edited.with_primitives_mut(|edited, primitives| {
//!     let face = polyhedron::validate_pipeline(edited, &mut primitives[0]).unwrap();
//!     face.face_selections[0] = 1.0;
//! });
//!
//! let original = polyhedron::validate(&mesh, mesh.primitives[0].get().unwrap()).unwrap();
//! assert_eq!(original.face_selections.as_slice(), &[0.0]);
//! assert!(!k3d::types::difference::test(&mesh, &edited).approximately_equal(&Tolerance::default()));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `k3d-core` | Element types, metadata, the difference protocol |
//! | [`array`] | `k3d-array` | `Array`, typed arrays, tables, `PipelineData` |
//! | [`mesh`] | `k3d-mesh` | `Mesh`, generic primitives, per-kind views |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Element types, metadata keys, and approximate equality (`k3d-core`).
pub use k3d_core as types;

/// Type-erased arrays, tables, and copy-on-write handles (`k3d-array`).
///
/// [`array::Array`] is the common interface; [`array::TypedArray`] and
/// [`array::UintArray`] are the concrete arrays.
pub use k3d_array as array;

/// Generic meshes and typed primitive views (`k3d-mesh`).
///
/// Each primitive kind is a module, e.g. [`mesh::polyhedron`] or
/// [`mesh::nurbs_curve`].
pub use k3d_mesh as mesh;

/// Common imports for typical K-3D usage.
///
/// ```rust
/// use k3d::prelude::*;
/// ```
pub mod prelude {
    // Values and approximate equality
    pub use k3d_core::{
        Accumulator, Color, Difference, Element, ElementType, MaterialRef, Matrix4, Metadata,
        NodeRef, Normal3, Point2, Point3, Point4, Tolerance, Vector3,
    };

    // Arrays and tables
    pub use k3d_array::{Array, ArrayError, PipelineData, Table, TableCopier, TypedArray, UintArray};

    // Meshes
    pub use k3d_mesh::{BuildError, GenericPrimitive, Mesh, PrimitiveKind, ValidationError};
}
