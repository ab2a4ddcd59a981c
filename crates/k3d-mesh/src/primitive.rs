//! Generic primitive storage: a kind tag plus named structure and
//! attribute tables.

use std::fmt;
use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;
use k3d_array::{PipelineData, Table};
use k3d_core::{Accumulator, Difference};

/// An insertion-ordered map from name to [`Table`].
#[derive(Clone, Debug, Default)]
pub struct NamedTables {
    tables: IndexMap<String, Table>,
}

impl NamedTables {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if there are no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// The table called `name`, inserting an empty one if absent.
    pub fn create(&mut self, name: &str) -> &mut Table {
        self.tables.entry(name.to_owned()).or_default()
    }

    /// Read access to one table.
    pub fn lookup(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Write access to one table.
    pub fn writable(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Write access to several distinct tables at once.
    ///
    /// Returns `None` if any name is absent or repeated.
    pub fn tables_mut<const N: usize>(&mut self, names: [&str; N]) -> Option<[&mut Table; N]> {
        let mut slots: [Option<&mut Table>; N] = std::array::from_fn(|_| None);
        for (name, table) in self.tables.iter_mut() {
            if let Some(i) = names.iter().position(|n| *n == name.as_str()) {
                slots[i] = Some(table);
            }
        }
        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()?
            .try_into()
            .ok()
    }

    /// Remove a table, preserving the order of the rest.
    pub fn erase(&mut self, name: &str) -> Option<Table> {
        self.tables.shift_remove(name)
    }

    /// `(name, table)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(name, table)| (name.as_str(), table))
    }

    /// Same table names, with every table reduced to its schema.
    pub fn clone_types(&self) -> Self {
        Self {
            tables: self
                .tables
                .iter()
                .map(|(name, table)| (name.clone(), table.clone_types()))
                .collect(),
        }
    }
}

impl Difference for NamedTables {
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        result.exact(self.tables.len() == other.tables.len());
        for ((name_a, a), (name_b, b)) in self.tables.iter().zip(&other.tables) {
            result.exact(name_a == name_b);
            a.difference(b, result);
        }
    }
}

impl fmt::Display for NamedTables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, table) in self.iter() {
            write!(f, "[{name}] {table}")?;
        }
        Ok(())
    }
}

/// One primitive of a mesh, stored without static typing.
///
/// The per-kind modules (`disk`, `polyhedron`, ...) interpret the tables;
/// this type only carries them.
#[derive(Clone, Debug, Default)]
pub struct GenericPrimitive {
    /// Kind tag, e.g. `"disk"`.
    pub kind: String,
    /// Topology and per-element parameters, one table per element class.
    pub structure: NamedTables,
    /// User-defined attributes, one table per interpolation class.
    pub attributes: NamedTables,
}

impl GenericPrimitive {
    /// An empty primitive of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            structure: NamedTables::new(),
            attributes: NamedTables::new(),
        }
    }
}

impl Difference for GenericPrimitive {
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        result.exact(self.kind == other.kind);
        self.structure.difference(&other.structure, result);
        self.attributes.difference(&other.attributes, result);
    }
}

impl fmt::Display for GenericPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "primitive \"{}\"", self.kind)?;
        writeln!(f, "structure:")?;
        fmt::Display::fmt(&self.structure, f)?;
        writeln!(f, "attributes:")?;
        fmt::Display::fmt(&self.attributes, f)
    }
}

/// The ordered primitive list of a mesh.
///
/// Dereferences to a slice of shared primitive handles.
#[derive(Clone, Debug, Default)]
pub struct Primitives(Vec<PipelineData<GenericPrimitive>>);

impl Primitives {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty primitive of the given kind and return it.
    pub fn create(&mut self, kind: &str) -> &mut GenericPrimitive {
        self.0.push(PipelineData::create(GenericPrimitive::new(kind)));
        let last = self.0.len() - 1;
        self.0[last].make_writable()
    }

    /// Append a shared primitive.
    pub fn push(&mut self, primitive: PipelineData<GenericPrimitive>) {
        self.0.push(primitive);
    }

    /// Remove and return the primitive at `index`.
    pub fn remove(&mut self, index: usize) -> Option<PipelineData<GenericPrimitive>> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    /// Remove every primitive.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl Deref for Primitives {
    type Target = [PipelineData<GenericPrimitive>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Primitives {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Difference for Primitives {
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        k3d_core::difference::range_test(&self.0, &other.0, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k3d_array::{TypedArray, UintArray};
    use k3d_core::difference::test;

    fn sample() -> GenericPrimitive {
        let mut primitive = GenericPrimitive::new("test");
        primitive
            .structure
            .create("curve")
            .create::<UintArray>("first")
            .extend([0, 2]);
        primitive
            .structure
            .create("vertex")
            .create::<TypedArray<f64>>("weights")
            .extend([1.0, 1.0, 1.0]);
        primitive.attributes.create("constant");
        primitive
    }

    #[test]
    fn create_is_get_or_insert() {
        let mut tables = NamedTables::new();
        tables.create("a").create::<UintArray>("x");
        tables.create("a");
        assert_eq!(tables.len(), 1);
        assert_eq!(tables.lookup("a").unwrap().column_count(), 1);
    }

    #[test]
    fn tables_mut_requires_distinct_existing_names() {
        let mut primitive = sample();
        let [curve, vertex] = primitive.structure.tables_mut(["curve", "vertex"]).unwrap();
        curve.set_row_count(4);
        vertex.set_row_count(1);
        assert_eq!(primitive.structure.lookup("curve").unwrap().row_count(), 4);
        assert!(primitive.structure.tables_mut(["curve", "curve"]).is_none());
        assert!(primitive.structure.tables_mut(["knot"]).is_none());
    }

    #[test]
    fn difference_checks_kind_and_tables() {
        let a = sample();
        assert!(test(&a, &a.clone()).is_exact());

        let mut b = a.clone();
        b.kind = "other".into();
        assert!(!test(&a, &b).is_exact());

        let mut c = a.clone();
        c.attributes.erase("constant");
        assert!(!test(&a, &c).is_exact());
    }

    #[test]
    fn primitives_create_and_remove() {
        let mut primitives = Primitives::new();
        primitives.create("disk");
        primitives.create("torus");
        assert_eq!(primitives.len(), 2);
        assert_eq!(primitives[1].get().unwrap().kind, "torus");
        assert_eq!(primitives.remove(0).unwrap().get().unwrap().kind, "disk");
        assert!(primitives.remove(5).is_none());
    }

    #[test]
    fn clone_types_keeps_table_names() {
        let types = sample().structure.clone_types();
        assert_eq!(types.len(), 2);
        assert_eq!(types.lookup("vertex").unwrap().row_count(), 0);
        assert_eq!(types.lookup("vertex").unwrap().column_count(), 1);
    }
}
