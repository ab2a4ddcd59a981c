//! Type-erased arrays, tables, and copy-on-write pipeline data.
//!
//! # Architecture
//!
//! ```text
//! Table (row semantics: every column has row_count() elements)
//! └── NamedArrays (insertion-ordered name → handle map)
//!     └── PipelineData<dyn Array> (shared until written)
//!         └── dyn Array ── TypedArray<T: Element> | UintArray
//! ```
//!
//! Concrete array types are created either statically (`TypedArray::<f64>::new()`)
//! or from a serialized type string through the [`registry`]. Operations that
//! must preserve the concrete element type through type erasure (cloning,
//! range slicing, row copies) live on the [`Array`] trait; callers recover
//! the concrete type with `downcast_ref`/`downcast_mut`.
//!
//! # Sharing
//!
//! Cloning a [`Table`] or [`NamedArrays`] is cheap: the clone shares every
//! array with the original. The first `writable()` access to a shared array
//! clones that array alone, so readers of the original never observe the
//! write. Use `deep_clone()` when independent storage is needed up front.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod error;
pub mod named_arrays;
pub mod pipeline_data;
pub mod registry;
pub mod table;
pub mod table_copier;
pub mod typed_array;
pub mod uint_array;

pub use array::Array;
pub use error::ArrayError;
pub use named_arrays::NamedArrays;
pub use pipeline_data::{PipelineClone, PipelineData};
pub use registry::create_array;
pub use table::Table;
pub use table_copier::TableCopier;
pub use typed_array::TypedArray;
pub use uint_array::UintArray;
