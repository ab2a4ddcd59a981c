//! The type-erased `Array` trait and `dyn Array` downcast support.

use std::any::Any;
use std::fmt;

use k3d_core::{Accumulator, Difference, ElementType, Metadata};

use crate::error::ArrayError;

/// A type-erased, resizable sequence of a single element type plus
/// free-form metadata.
///
/// Arrays are stored behind `dyn Array` inside tables, so every operation
/// that must preserve the concrete element type (cloning, slicing, row
/// copies) is a method here rather than a free function. Concrete types
/// are [`TypedArray<T>`](crate::TypedArray) and [`UintArray`](crate::UintArray);
/// use [`downcast_ref`](#method.downcast_ref) to recover them.
///
/// # Metadata
///
/// The metadata accessors have shared default implementations built on
/// [`metadata`](Array::metadata) and [`metadata_mut`](Array::metadata_mut).
pub trait Array: Any + Send + Sync + fmt::Debug + 'static {
    /// Tag of the concrete element type.
    fn element_type(&self) -> ElementType;

    /// Stable identifier of the concrete element type, e.g. `k3d::double_t`.
    fn type_string(&self) -> &'static str {
        self.element_type().type_string()
    }

    /// Write the elements, separated by spaces.
    fn print(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// A new, empty array of the same concrete type with the same metadata.
    fn clone_type(&self) -> Box<dyn Array>;

    /// A deep copy with the same length, contents, and metadata.
    fn clone_array(&self) -> Box<dyn Array>;

    /// A deep copy of the half-open element range `begin..end`, with the
    /// same metadata.
    ///
    /// # Errors
    ///
    /// [`ArrayError::InvalidRange`] unless `begin <= end <= len()`.
    fn clone_range(&self, begin: usize, end: usize) -> Result<Box<dyn Array>, ArrayError>;

    /// Grow or shrink to `len` elements; new elements take the default value.
    fn resize(&mut self, len: usize);

    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if the array has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record the difference between this array and `other`.
    ///
    /// If `other` has a different concrete type a failed exact test is
    /// recorded and nothing else is compared. Otherwise metadata equality is
    /// recorded as an exact test, followed by an element-wise range test.
    fn difference(&self, other: &dyn Array, result: &mut Accumulator);

    /// Append a copy of `source[index]`.
    ///
    /// # Errors
    ///
    /// [`ArrayError::TypeMismatch`] if `source` is a different concrete type,
    /// [`ArrayError::IndexOutOfBounds`] if `index` is past its end.
    fn push_from(&mut self, source: &dyn Array, index: usize) -> Result<(), ArrayError>;

    /// Overwrite `self[target_index]` with a copy of `source[source_index]`.
    ///
    /// # Errors
    ///
    /// [`ArrayError::TypeMismatch`] if `source` is a different concrete type,
    /// [`ArrayError::IndexOutOfBounds`] if either index is out of range.
    fn copy_from(
        &mut self,
        target_index: usize,
        source: &dyn Array,
        source_index: usize,
    ) -> Result<(), ArrayError>;

    /// Append the weighted combination of `source[indices[i]] * weights[i]`.
    ///
    /// # Errors
    ///
    /// As [`push_from`](Array::push_from), plus
    /// [`ArrayError::WeightCountMismatch`] if the slices differ in length.
    fn push_weighted(
        &mut self,
        source: &dyn Array,
        indices: &[usize],
        weights: &[f64],
    ) -> Result<(), ArrayError>;

    /// All metadata attached to this array.
    fn metadata(&self) -> &Metadata;

    /// Mutable access to the metadata map.
    fn metadata_mut(&mut self) -> &mut Metadata;

    /// Set (or replace) one metadata value.
    fn set_metadata_value(&mut self, name: &str, value: &str) {
        self.metadata_mut().set(name, value);
    }

    /// Merge every entry of `values` into the metadata, overwriting
    /// duplicates.
    fn set_metadata(&mut self, values: &Metadata) {
        self.metadata_mut().extend(values);
    }

    /// A copy of the complete metadata map.
    fn get_metadata(&self) -> Metadata {
        self.metadata().clone()
    }

    /// Look up one metadata value, returning `""` when absent.
    fn get_metadata_value(&self, name: &str) -> &str {
        self.metadata().value(name)
    }

    /// Remove one metadata value; absent names are ignored.
    fn erase_metadata_value(&mut self, name: &str) {
        self.metadata_mut().erase(name);
    }
}

impl dyn Array {
    /// Attempt to downcast to a concrete array type.
    pub fn downcast_ref<T: Array>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Attempt to mutably downcast to a concrete array type.
    pub fn downcast_mut<T: Array>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }

    /// Returns `true` if the concrete type is `T`.
    pub fn is<T: Array>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    /// Returns `true` if `other` has the same concrete type.
    pub fn same_type(&self, other: &dyn Array) -> bool {
        Any::type_id(self as &dyn Any) == Any::type_id(other as &dyn Any)
    }
}

impl fmt::Display for dyn Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print(f)
    }
}

impl Difference for dyn Array {
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        Array::difference(self, other, result);
    }
}
