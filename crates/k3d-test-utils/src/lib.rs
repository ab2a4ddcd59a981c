//! Test fixtures and assertions for K-3D development.
//!
//! [`fixtures`] builds small, fully populated tables and meshes;
//! [`assertions`] turns [`Accumulator`](k3d_core::Accumulator) results into
//! test failures with readable messages.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod assertions;
pub mod fixtures;
