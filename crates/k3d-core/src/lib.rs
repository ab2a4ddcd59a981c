//! Core types and traits for K-3D mesh data.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the workspace: the closed
//! set of storable element types, the approximate-equality
//! ([`difference`]) protocol, and the well-known [`metadata`] keys.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod difference;
pub mod element;
pub mod metadata;
pub mod types;

pub use config::Tolerance;
pub use difference::{Accumulator, Difference};
pub use element::{Element, ElementType};
pub use metadata::Metadata;
pub use types::{
    Color, MaterialRef, Matrix4, NodeRef, Normal3, Point2, Point3, Point4, Texture3, Vector2,
    Vector3,
};
