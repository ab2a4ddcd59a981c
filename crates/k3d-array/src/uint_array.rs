//! `UintArray`: the dedicated array type for unsigned indices.

use std::fmt;
use std::ops::{Deref, DerefMut};

use k3d_core::{Accumulator, ElementType, Metadata};

use crate::array::Array;
use crate::error::ArrayError;
use crate::typed_array::{same_type, TypedArray};

/// A contiguous array of unsigned indices (`k3d::uint_t`).
///
/// Stores the same values as `TypedArray<u64>` but is a distinct concrete
/// type, so index arrays never match a general-purpose 64-bit integer array
/// during downcasts or difference tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UintArray {
    storage: TypedArray<u64>,
}

impl UintArray {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing vector.
    pub fn from_vec(data: Vec<u64>) -> Self {
        Self {
            storage: TypedArray::from_vec(data),
        }
    }

    /// Builder-style metadata assignment.
    pub fn with_metadata_value(mut self, name: &str, value: &str) -> Self {
        self.storage.metadata_mut().set(name, value);
        self
    }

    /// The backing slice.
    pub fn as_slice(&self) -> &[u64] {
        self.storage.as_slice()
    }

    /// Iterate the indices as `usize`.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.storage.iter().map(|&i| i as usize)
    }
}

impl Deref for UintArray {
    type Target = Vec<u64>;

    fn deref(&self) -> &Vec<u64> {
        &self.storage
    }
}

impl DerefMut for UintArray {
    fn deref_mut(&mut self) -> &mut Vec<u64> {
        &mut self.storage
    }
}

impl From<Vec<u64>> for UintArray {
    fn from(data: Vec<u64>) -> Self {
        Self::from_vec(data)
    }
}

impl FromIterator<u64> for UintArray {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl fmt::Display for UintArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.storage.print_elements(f)
    }
}

impl k3d_core::Difference for UintArray {
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        self.storage.difference_typed(&other.storage, result);
    }
}

impl Array for UintArray {
    fn element_type(&self) -> ElementType {
        ElementType::Uint
    }

    fn print(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.storage.print_elements(f)
    }

    fn clone_type(&self) -> Box<dyn Array> {
        Box::new(Self {
            storage: self.storage.clone_type_typed(),
        })
    }

    fn clone_array(&self) -> Box<dyn Array> {
        Box::new(self.clone())
    }

    fn clone_range(&self, begin: usize, end: usize) -> Result<Box<dyn Array>, ArrayError> {
        Ok(Box::new(Self {
            storage: self.storage.clone_range_typed(begin, end)?,
        }))
    }

    fn resize(&mut self, len: usize) {
        Array::resize(&mut self.storage, len);
    }

    fn len(&self) -> usize {
        self.storage.as_slice().len()
    }

    fn difference(&self, other: &dyn Array, result: &mut Accumulator) {
        match other.downcast_ref::<Self>() {
            Some(other) => self.storage.difference_typed(&other.storage, result),
            None => result.exact(false),
        }
    }

    fn push_from(&mut self, source: &dyn Array, index: usize) -> Result<(), ArrayError> {
        let source = same_type(self, source)?;
        self.storage.push_from_typed(&source.storage, index)
    }

    fn copy_from(
        &mut self,
        target_index: usize,
        source: &dyn Array,
        source_index: usize,
    ) -> Result<(), ArrayError> {
        let source = same_type(self, source)?;
        self.storage
            .copy_from_typed(target_index, &source.storage, source_index)
    }

    fn push_weighted(
        &mut self,
        source: &dyn Array,
        indices: &[usize],
        weights: &[f64],
    ) -> Result<(), ArrayError> {
        let source = same_type(self, source)?;
        self.storage
            .push_weighted_typed(&source.storage, indices, weights)
    }

    fn metadata(&self) -> &Metadata {
        self.storage.metadata()
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        self.storage.metadata_mut()
    }
}
