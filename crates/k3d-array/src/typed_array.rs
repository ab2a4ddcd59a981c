//! `TypedArray<T>`: the value-backed array over a registered element type.

use std::fmt;
use std::ops::{Deref, DerefMut};

use k3d_core::difference::range_test;
use k3d_core::{Accumulator, Element, ElementType, Metadata};

use crate::array::Array;
use crate::error::ArrayError;

/// A contiguous array of `T` with metadata.
///
/// Dereferences to the backing `Vec<T>`, so element access, `push`,
/// iteration and slicing work as on a vector.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypedArray<T> {
    data: Vec<T>,
    metadata: Metadata,
}

impl<T: Element> TypedArray<T> {
    /// Create an empty array.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// Create an array of `len` default values.
    pub fn with_len(len: usize) -> Self {
        Self {
            data: vec![T::default(); len],
            metadata: Metadata::new(),
        }
    }

    /// Wrap an existing vector.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            data,
            metadata: Metadata::new(),
        }
    }

    /// Builder-style metadata assignment.
    pub fn with_metadata_value(mut self, name: &str, value: &str) -> Self {
        self.metadata.set(name, value);
        self
    }

    /// The backing slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the array, returning the backing vector.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// A new, empty array with the same metadata.
    pub fn clone_type_typed(&self) -> Self {
        Self {
            data: Vec::new(),
            metadata: self.metadata.clone(),
        }
    }

    /// A copy of the half-open element range `begin..end` with the same
    /// metadata.
    pub fn clone_range_typed(&self, begin: usize, end: usize) -> Result<Self, ArrayError> {
        ArrayError::check_range(begin, end, self.data.len())?;
        Ok(Self {
            data: self.data[begin..end].to_vec(),
            metadata: self.metadata.clone(),
        })
    }

    /// Metadata equality as an exact test, then an element-wise range test.
    pub fn difference_typed(&self, other: &Self, result: &mut Accumulator) {
        result.exact(self.metadata == other.metadata);
        range_test(&self.data, &other.data, result);
    }

    /// Append a copy of `source[index]`.
    pub fn push_from_typed(&mut self, source: &Self, index: usize) -> Result<(), ArrayError> {
        ArrayError::check_index(index, source.len())?;
        self.data.push(source.data[index].clone());
        Ok(())
    }

    /// Overwrite `self[target_index]` with `source[source_index]`.
    pub fn copy_from_typed(
        &mut self,
        target_index: usize,
        source: &Self,
        source_index: usize,
    ) -> Result<(), ArrayError> {
        ArrayError::check_index(target_index, self.data.len())?;
        ArrayError::check_index(source_index, source.data.len())?;
        self.data[target_index] = source.data[source_index].clone();
        Ok(())
    }

    /// Append a weighted combination of elements of `source`.
    pub fn push_weighted_typed(
        &mut self,
        source: &Self,
        indices: &[usize],
        weights: &[f64],
    ) -> Result<(), ArrayError> {
        if indices.len() != weights.len() {
            return Err(ArrayError::WeightCountMismatch {
                indices: indices.len(),
                weights: weights.len(),
            });
        }
        let mut values = Vec::with_capacity(indices.len());
        for (&index, &weight) in indices.iter().zip(weights) {
            ArrayError::check_index(index, source.len())?;
            values.push((&source.data[index], weight));
        }
        self.data.push(T::weighted_sum(&values));
        Ok(())
    }

    pub(crate) fn print_elements(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

impl<T> Deref for TypedArray<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        &self.data
    }
}

impl<T> DerefMut for TypedArray<T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.data
    }
}

impl<T: Element> From<Vec<T>> for TypedArray<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T: Element> FromIterator<T> for TypedArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Element> k3d_core::Difference for TypedArray<T> {
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        self.difference_typed(other, result);
    }
}

impl<T: Element> fmt::Display for TypedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print_elements(f)
    }
}

/// Downcast `source` to the concrete type of `this`.
pub(crate) fn same_type<'a, A: Array>(this: &A, source: &'a dyn Array) -> Result<&'a A, ArrayError> {
    source
        .downcast_ref::<A>()
        .ok_or_else(|| ArrayError::TypeMismatch {
            expected: this.type_string().to_owned(),
            found: source.type_string().to_owned(),
        })
}

impl<T: Element> Array for TypedArray<T> {
    fn element_type(&self) -> ElementType {
        T::TYPE
    }

    fn print(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print_elements(f)
    }

    fn clone_type(&self) -> Box<dyn Array> {
        Box::new(self.clone_type_typed())
    }

    fn clone_array(&self) -> Box<dyn Array> {
        Box::new(self.clone())
    }

    fn clone_range(&self, begin: usize, end: usize) -> Result<Box<dyn Array>, ArrayError> {
        Ok(Box::new(self.clone_range_typed(begin, end)?))
    }

    fn resize(&mut self, len: usize) {
        self.data.resize(len, T::default());
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn difference(&self, other: &dyn Array, result: &mut Accumulator) {
        match other.downcast_ref::<Self>() {
            Some(other) => self.difference_typed(other, result),
            None => result.exact(false),
        }
    }

    fn push_from(&mut self, source: &dyn Array, index: usize) -> Result<(), ArrayError> {
        let source = same_type(self, source)?;
        self.push_from_typed(source, index)
    }

    fn copy_from(
        &mut self,
        target_index: usize,
        source: &dyn Array,
        source_index: usize,
    ) -> Result<(), ArrayError> {
        let source = same_type(self, source)?;
        self.copy_from_typed(target_index, source, source_index)
    }

    fn push_weighted(
        &mut self,
        source: &dyn Array,
        indices: &[usize],
        weights: &[f64],
    ) -> Result<(), ArrayError> {
        let source = same_type(self, source)?;
        self.push_weighted_typed(source, indices, weights)
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
