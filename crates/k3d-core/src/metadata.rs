//! Free-form name/value annotations attached to arrays.
//!
//! The keys and values in [`key`] and [`value`] are persisted verbatim by
//! document serializers, so their spelling must never change.

use std::collections::BTreeMap;
use std::fmt;

/// Well-known metadata keys.
pub mod key {
    /// Authors of a document or data set.
    pub const AUTHORS: &str = "k3d:authors";
    /// Copyright notice.
    pub const COPYRIGHT: &str = "k3d:copyright";
    /// What the values of an array index into (see [`super::value::POINT_INDICES`]).
    pub const DOMAIN: &str = "k3d:domain";
    /// How an array is meant to be interpreted (see [`super::value::SELECTION`]).
    pub const ROLE: &str = "k3d:role";
    /// Version of the program that produced the data.
    pub const VERSION: &str = "k3d:version";
}

/// Well-known metadata values.
pub mod value {
    /// Domain: the array holds indices into the mesh point list.
    pub const POINT_INDICES: &str = "k3d:point-indices";
    /// Role: the string array holds multi-line text.
    pub const MULTI_LINE_TEXT: &str = "k3d:multi-line-text";
    /// Role: the array holds selection weights.
    pub const SELECTION: &str = "k3d:selection";
    /// Role: the array holds a NURBS knot vector.
    pub const NURBS_KNOT_VECTOR: &str = "k3d:nurbs-knot-vector";
}

/// An unordered string-to-string mapping.
///
/// Iteration is sorted by key so that printed output is deterministic;
/// equality ignores insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) a single value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up a value; `None` if absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Look up a value, returning `""` when absent.
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Remove a value, returning it if it was present.
    pub fn erase(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Merge every entry of `other` into this map, overwriting duplicates.
    pub fn extend(&mut self, other: &Metadata) {
        for (k, v) in other.iter() {
            self.0.insert(k.to_owned(), v.to_owned());
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_strings_are_stable() {
        assert_eq!(key::DOMAIN, "k3d:domain");
        assert_eq!(key::ROLE, "k3d:role");
        assert_eq!(key::AUTHORS, "k3d:authors");
        assert_eq!(key::COPYRIGHT, "k3d:copyright");
        assert_eq!(key::VERSION, "k3d:version");
        assert_eq!(value::POINT_INDICES, "k3d:point-indices");
        assert_eq!(value::SELECTION, "k3d:selection");
        assert_eq!(value::MULTI_LINE_TEXT, "k3d:multi-line-text");
        assert_eq!(value::NURBS_KNOT_VECTOR, "k3d:nurbs-knot-vector");
    }

    #[test]
    fn missing_value_is_empty_string() {
        let m = Metadata::new();
        assert_eq!(m.value("nope"), "");
        assert!(m.get("nope").is_none());
    }

    #[test]
    fn set_get_erase() {
        let mut m = Metadata::new();
        m.set(key::DOMAIN, value::POINT_INDICES);
        assert_eq!(m.len(), 1);
        assert_eq!(m.value(key::DOMAIN), value::POINT_INDICES);
        m.set(key::DOMAIN, "other");
        assert_eq!(m.len(), 1);
        assert_eq!(m.erase(key::DOMAIN).as_deref(), Some("other"));
        assert!(m.is_empty());
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a: Metadata = [("a", "1"), ("b", "2")].into_iter().collect();
        let b: Metadata = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn display_is_sorted() {
        let m: Metadata = [("z", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(m.to_string(), "{a=2, z=1}");
    }
}
