//! `Table`: named arrays that share one row count.

use std::fmt;
use std::ops::{Deref, DerefMut};

use k3d_core::{Accumulator, Difference};

use crate::array::Array;
use crate::error::ArrayError;
use crate::named_arrays::NamedArrays;

/// A collection of named arrays, all of the same length.
///
/// Each array is a column and each index a row. The co-indexed invariant
/// is established by [`set_row_count`](Table::set_row_count) and by the
/// row-oriented constructors here; code that inserts or resizes individual
/// arrays through the [`NamedArrays`] interface is responsible for keeping
/// it, and [`is_consistent`](Table::is_consistent) reports whether it holds.
#[derive(Clone, Debug, Default)]
pub struct Table {
    columns: NamedArrays,
}

impl Table {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of arrays.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Length of the first array, or zero for a table with no arrays.
    pub fn row_count(&self) -> usize {
        self.columns.iter().next().map_or(0, |(_, array)| array.len())
    }

    /// Resize every array to `count` rows.
    pub fn set_row_count(&mut self, count: usize) {
        for (_, data) in self.columns.handles_mut() {
            if let Some(array) = data.writable() {
                array.resize(count);
            }
        }
    }

    /// Returns `true` if every array has the same length.
    pub fn is_consistent(&self) -> bool {
        let rows = self.row_count();
        self.columns.iter().all(|(_, array)| array.len() == rows)
    }

    /// Same names, types, and metadata, with zero rows.
    pub fn clone_types(&self) -> Self {
        Self {
            columns: self.columns.clone_types(),
        }
    }

    /// A deep copy that shares no storage with `self`.
    pub fn deep_clone(&self) -> Self {
        Self {
            columns: self.columns.deep_clone(),
        }
    }

    /// A deep copy of the half-open row range `begin..end` of every array.
    ///
    /// # Errors
    ///
    /// [`ArrayError::InvalidRange`] if the range is out of bounds for any
    /// array.
    pub fn clone_range(&self, begin: usize, end: usize) -> Result<Self, ArrayError> {
        let mut columns = NamedArrays::new();
        for (name, array) in self.columns.iter() {
            columns.insert(name, array.clone_range(begin, end)?);
        }
        Ok(Self { columns })
    }

    /// An empty table whose schema is shared by every input.
    ///
    /// Only arrays present in all of `tables` with the same type string are
    /// kept. Order and metadata come from the first table; an empty slice
    /// yields an empty table.
    pub fn clone_types_from(tables: &[&Table]) -> Self {
        let Some((first, rest)) = tables.split_first() else {
            return Self::new();
        };
        let mut columns = NamedArrays::new();
        for (name, array) in first.columns.iter() {
            let shared = rest.iter().all(|table| {
                table
                    .lookup(name)
                    .is_some_and(|other| other.type_string() == array.type_string())
            });
            if shared {
                columns.insert(name, array.clone_type());
            } else {
                tracing::debug!(array = name, "dropping array missing from some input tables");
            }
        }
        Self { columns }
    }

    /// The underlying named-array collection.
    pub fn arrays(&self) -> &NamedArrays {
        &self.columns
    }
}

impl Deref for Table {
    type Target = NamedArrays;

    fn deref(&self) -> &NamedArrays {
        &self.columns
    }
}

impl DerefMut for Table {
    fn deref_mut(&mut self) -> &mut NamedArrays {
        &mut self.columns
    }
}

impl From<NamedArrays> for Table {
    fn from(columns: NamedArrays) -> Self {
        Self { columns }
    }
}

impl Difference for Table {
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        self.columns.difference(&other.columns, result);
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "table ({} columns, {} rows)",
            self.column_count(),
            self.row_count()
        )?;
        fmt::Display::fmt(&self.columns, f)
    }
}
