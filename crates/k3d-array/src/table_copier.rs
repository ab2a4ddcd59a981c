//! Row-wise copies between two tables with the same schema.

use crate::array::Array;
use crate::error::ArrayError;
use crate::table::Table;

/// Copies, moves, and interpolates rows from a source table into a target
/// table.
///
/// Every target array is paired with the source array of the same name at
/// construction; pairs are checked for matching concrete types up front so
/// row operations only need to check indices. Row operations validate all
/// indices before touching any array, so a failed call leaves the target
/// unchanged.
pub struct TableCopier<'a> {
    pairs: Vec<(&'a dyn Array, &'a mut dyn Array)>,
    source_rows: usize,
}

impl<'a> TableCopier<'a> {
    /// Pair every array of `target` with its namesake in `source`.
    ///
    /// # Errors
    ///
    /// [`ArrayError::MissingArray`] if `source` lacks an array of `target`,
    /// [`ArrayError::TypeMismatch`] if a pair differs in concrete type.
    pub fn new(source: &'a Table, target: &'a mut Table) -> Result<Self, ArrayError> {
        let mut pairs = Vec::with_capacity(target.column_count());
        for (name, data) in target.handles_mut() {
            let from = source
                .lookup(name)
                .ok_or_else(|| ArrayError::MissingArray {
                    name: name.to_owned(),
                })?;
            let Some(to) = data.writable() else {
                continue;
            };
            if !from.same_type(to) {
                return Err(ArrayError::TypeMismatch {
                    expected: to.type_string().to_owned(),
                    found: from.type_string().to_owned(),
                });
            }
            pairs.push((from, to));
        }
        // Rows every paired source array can supply.
        let source_rows = pairs
            .iter()
            .map(|(from, _)| from.len())
            .min()
            .unwrap_or_else(|| source.row_count());
        Ok(Self { pairs, source_rows })
    }

    /// Append a copy of source row `index` to the target.
    pub fn push_back(&mut self, index: usize) -> Result<(), ArrayError> {
        ArrayError::check_index(index, self.source_rows)?;
        for (from, to) in &mut self.pairs {
            to.push_from(*from, index)?;
        }
        Ok(())
    }

    /// Append copies of several source rows, in order.
    pub fn push_back_rows(&mut self, indices: &[usize]) -> Result<(), ArrayError> {
        for &index in indices {
            ArrayError::check_index(index, self.source_rows)?;
        }
        for &index in indices {
            self.push_back(index)?;
        }
        Ok(())
    }

    /// Overwrite target row `target_index` with source row `source_index`.
    pub fn copy(&mut self, source_index: usize, target_index: usize) -> Result<(), ArrayError> {
        ArrayError::check_index(source_index, self.source_rows)?;
        for (_, to) in &self.pairs {
            ArrayError::check_index(target_index, to.len())?;
        }
        for (from, to) in &mut self.pairs {
            to.copy_from(target_index, *from, source_index)?;
        }
        Ok(())
    }

    /// Append one row computed as the weighted combination of source rows.
    pub fn push_back_weighted(&mut self, indices: &[usize], weights: &[f64]) -> Result<(), ArrayError> {
        if indices.len() != weights.len() {
            return Err(ArrayError::WeightCountMismatch {
                indices: indices.len(),
                weights: weights.len(),
            });
        }
        for &index in indices {
            ArrayError::check_index(index, self.source_rows)?;
        }
        for (from, to) in &mut self.pairs {
            to.push_weighted(*from, indices, weights)?;
        }
        Ok(())
    }
}
