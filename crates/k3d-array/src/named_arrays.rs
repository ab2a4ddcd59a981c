//! `NamedArrays`: an insertion-ordered map from name to shared array.

use std::fmt;

use indexmap::IndexMap;
use k3d_core::{Accumulator, Difference};

use crate::array::Array;
use crate::pipeline_data::PipelineData;

/// Maps unique names to arrays of arbitrary element type.
///
/// Entries are [`PipelineData`] handles, so cloning a collection shares the
/// underlying arrays and a later [`writable`](NamedArrays::writable) call
/// copies only the array being written. Iteration follows insertion order,
/// which is also the order used to pair entries in
/// [`difference`](Difference::difference).
///
/// Lookups of absent names return `None`; nothing here panics on a missing
/// name.
#[derive(Clone, Debug, Default)]
pub struct NamedArrays {
    arrays: IndexMap<String, PipelineData<dyn Array>>,
}

impl NamedArrays {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of arrays.
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// Returns `true` if there are no arrays.
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Returns `true` if an array with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.arrays.contains_key(name)
    }

    /// Array names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(String::as_str)
    }

    /// `(name, array)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Array)> {
        self.arrays
            .iter()
            .filter_map(|(name, data)| Some((name.as_str(), data.get()?)))
    }

    /// Read access to one array.
    pub fn lookup(&self, name: &str) -> Option<&dyn Array> {
        self.arrays.get(name)?.get()
    }

    /// Read access to one array of a known concrete type; `None` if absent
    /// or of a different type.
    pub fn lookup_as<T: Array>(&self, name: &str) -> Option<&T> {
        self.lookup(name)?.downcast_ref::<T>()
    }

    /// The shared handle for one array.
    pub fn lookup_shared(&self, name: &str) -> Option<&PipelineData<dyn Array>> {
        self.arrays.get(name)
    }

    /// Write access to one array, cloning it first if it is shared.
    pub fn writable(&mut self, name: &str) -> Option<&mut dyn Array> {
        self.arrays.get_mut(name)?.writable()
    }

    /// Write access to one array of a known concrete type.
    pub fn writable_as<T: Array>(&mut self, name: &str) -> Option<&mut T> {
        self.writable(name)?.downcast_mut::<T>()
    }

    /// Write access to several distinct arrays at once.
    ///
    /// Returns `None` if any name is absent or repeated.
    pub fn writable_many<const N: usize>(
        &mut self,
        names: [&str; N],
    ) -> Option<[&mut dyn Array; N]> {
        let mut slots: [Option<&mut dyn Array>; N] = std::array::from_fn(|_| None);
        for (name, data) in self.arrays.iter_mut() {
            if let Some(i) = names.iter().position(|n| *n == name.as_str()) {
                slots[i] = data.writable();
            }
        }
        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()?
            .try_into()
            .ok()
    }

    /// Insert (or replace) an array. A replaced entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, array: Box<dyn Array>) {
        self.arrays.insert(name.into(), PipelineData::from_box(array));
    }

    /// Insert (or replace) a shared array handle.
    pub fn insert_shared(&mut self, name: impl Into<String>, array: PipelineData<dyn Array>) {
        self.arrays.insert(name.into(), array);
    }

    /// Insert an empty array of type `T` under `name` and return it.
    ///
    /// Any existing array with that name is replaced.
    pub fn create<T: Array + Default>(&mut self, name: impl Into<String>) -> &mut T {
        let data = self.arrays.entry(name.into()).or_default();
        *data = PipelineData::<dyn Array>::from_box(Box::new(T::default()));
        data.writable()
            .and_then(|array| array.downcast_mut::<T>())
            .expect("freshly inserted array has the requested type")
    }

    /// Remove an array, preserving the order of the rest.
    pub fn erase(&mut self, name: &str) -> Option<PipelineData<dyn Array>> {
        self.arrays.shift_remove(name)
    }

    /// Remove every array.
    pub fn clear(&mut self) {
        self.arrays.clear();
    }

    /// Same names, types, and metadata, with every array empty.
    pub fn clone_types(&self) -> Self {
        self.map_arrays(|array| array.clone_type())
    }

    /// A deep copy that shares no storage with `self`.
    pub fn deep_clone(&self) -> Self {
        self.map_arrays(|array| array.clone_array())
    }

    pub(crate) fn map_arrays(&self, mut f: impl FnMut(&dyn Array) -> Box<dyn Array>) -> Self {
        let arrays = self
            .arrays
            .iter()
            .map(|(name, data)| {
                let mapped = match data.get() {
                    Some(array) => PipelineData::from_box(f(array)),
                    None => PipelineData::empty(),
                };
                (name.clone(), mapped)
            })
            .collect();
        Self { arrays }
    }

    pub(crate) fn handles_mut(
        &mut self,
    ) -> impl Iterator<Item = (&str, &mut PipelineData<dyn Array>)> {
        self.arrays
            .iter_mut()
            .map(|(name, data)| (name.as_str(), data))
    }
}

impl Difference for NamedArrays {
    /// Exact test on the array count, then for each pair of entries (by
    /// position) an exact test on the names followed by the array
    /// difference.
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        result.exact(self.arrays.len() == other.arrays.len());
        for ((name_a, a), (name_b, b)) in self.arrays.iter().zip(&other.arrays) {
            result.exact(name_a == name_b);
            a.difference(b, result);
        }
    }
}

impl fmt::Display for NamedArrays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, array) in self.iter() {
            write!(f, "{name} [{}]", array.type_string())?;
            if !array.metadata().is_empty() {
                write!(f, " {}", array.metadata())?;
            }
            writeln!(f, ": {array}")?;
        }
        Ok(())
    }
}
