//! Checks shared by every primitive kind.
//!
//! Each per-kind `try_validate` is a sequence of these `require_*` calls;
//! the first failure is returned. [`report`] turns the result into the
//! `Option` returned by the per-kind `validate` functions.

use k3d_array::{Array, Table, UintArray};
use k3d_core::metadata::{key, value};

use crate::error::ValidationError;
use crate::mesh::Mesh;
use crate::primitive::GenericPrimitive;

/// Collapse a validation result, logging failures of a primitive whose
/// kind tag matched.
pub(crate) fn report<T>(kind: &str, result: Result<T, ValidationError>) -> Option<T> {
    match result {
        Ok(primitive) => Some(primitive),
        Err(ValidationError::WrongKind { .. }) => None,
        Err(error) => {
            tracing::warn!(kind, %error, "primitive failed validation");
            None
        }
    }
}

/// The primitive's kind tag must be `kind`.
pub fn require_kind(primitive: &GenericPrimitive, kind: &str) -> Result<(), ValidationError> {
    if primitive.kind == kind {
        Ok(())
    } else {
        Err(ValidationError::WrongKind {
            expected: kind.to_owned(),
            found: primitive.kind.clone(),
        })
    }
}

/// Checks every kind must pass: each table is internally consistent, and
/// every array tagged with the point-indices domain is a [`UintArray`]
/// whose values are valid mesh point indices.
pub fn require_valid_primitive(
    mesh: &Mesh,
    primitive: &GenericPrimitive,
) -> Result<(), ValidationError> {
    let point_count = mesh.point_count();
    for (name, table) in primitive.structure.iter().chain(primitive.attributes.iter()) {
        require_consistent_table(table, name)?;
        for (array_name, array) in table.iter() {
            if array.get_metadata_value(key::DOMAIN) != value::POINT_INDICES {
                continue;
            }
            let indices = downcast::<UintArray>(array, array_name)?;
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= point_count) {
                return Err(ValidationError::PointIndexOutOfBounds {
                    array: array_name.to_owned(),
                    index,
                    point_count,
                });
            }
        }
    }
    Ok(())
}

/// Every array of `table` has the table's row count.
pub fn require_consistent_table(table: &Table, name: &str) -> Result<(), ValidationError> {
    let rows = table.row_count();
    match table.iter().find(|(_, array)| array.len() != rows) {
        Some((array_name, array)) => Err(ValidationError::InconsistentTable {
            table: name.to_owned(),
            array: array_name.to_owned(),
            expected: rows,
            found: array.len(),
        }),
        None => Ok(()),
    }
}

/// The structure table called `name`.
pub fn require_structure<'a>(
    primitive: &'a GenericPrimitive,
    name: &str,
) -> Result<&'a Table, ValidationError> {
    primitive
        .structure
        .lookup(name)
        .ok_or_else(|| ValidationError::MissingStructure {
            table: name.to_owned(),
        })
}

/// The attribute table called `name`.
pub fn require_attributes<'a>(
    primitive: &'a GenericPrimitive,
    name: &str,
) -> Result<&'a Table, ValidationError> {
    primitive
        .attributes
        .lookup(name)
        .ok_or_else(|| ValidationError::MissingAttributes {
            table: name.to_owned(),
        })
}

/// The array `name` of `table`, which must have concrete type `T`.
pub fn require_array<'a, T: Array + Default>(
    table: &'a Table,
    table_name: &str,
    name: &str,
) -> Result<&'a T, ValidationError> {
    let array = table
        .lookup(name)
        .ok_or_else(|| ValidationError::MissingArray {
            table: table_name.to_owned(),
            array: name.to_owned(),
        })?;
    downcast(array, name)
}

/// `array` must carry metadata `key = value`.
pub fn require_metadata(
    array: &dyn Array,
    array_name: &str,
    key: &str,
    value: &str,
) -> Result<(), ValidationError> {
    if array.get_metadata_value(key) == value {
        Ok(())
    } else {
        Err(ValidationError::MissingMetadata {
            array: array_name.to_owned(),
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }
}

/// `table` must have `expected` rows. A table without arrays has no row
/// count of its own and always passes.
pub fn require_table_row_count(
    table: &Table,
    table_name: &str,
    expected: usize,
) -> Result<(), ValidationError> {
    if table.column_count() == 0 || table.row_count() == expected {
        Ok(())
    } else {
        Err(ValidationError::RowCountMismatch {
            table: table_name.to_owned(),
            expected,
            found: table.row_count(),
        })
    }
}

/// Every value of `indices` must be below `len`.
pub fn require_indices(indices: &UintArray, name: &str, len: usize) -> Result<(), ValidationError> {
    match indices.iter().find(|&&i| i as usize >= len) {
        Some(&index) => Err(ValidationError::IndexOutOfBounds {
            array: name.to_owned(),
            index,
            len,
        }),
        None => Ok(()),
    }
}

/// Every run `firsts[i] .. firsts[i] + counts[i]` must lie within `len`
/// rows. Empty runs may start at `len`.
pub fn require_ranges(
    firsts: &UintArray,
    counts: &UintArray,
    name: &str,
    len: usize,
) -> Result<(), ValidationError> {
    for (&first, &count) in firsts.iter().zip(counts.iter()) {
        if !first.checked_add(count).is_some_and(|end| end <= len as u64) {
            return Err(ValidationError::IndexOutOfBounds {
                array: name.to_owned(),
                index: first,
                len,
            });
        }
    }
    Ok(())
}

/// Sum of the count array `name`, as a row count.
pub fn total(counts: &UintArray, name: &str) -> Result<usize, ValidationError> {
    counts
        .iter()
        .try_fold(0_u64, |sum, &count| sum.checked_add(count))
        .and_then(|sum| usize::try_from(sum).ok())
        .ok_or_else(|| ValidationError::CountOverflow {
            array: name.to_owned(),
        })
}

fn downcast<'a, T: Array + Default>(
    array: &'a dyn Array,
    name: &str,
) -> Result<&'a T, ValidationError> {
    array
        .downcast_ref::<T>()
        .ok_or_else(|| ValidationError::WrongArrayType {
            array: name.to_owned(),
            expected: T::default().type_string().to_owned(),
            found: array.type_string().to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Doubles, Indices};
    use k3d_core::Point3;

    fn mesh_with_points(count: usize) -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_points(&vec![Point3::default(); count]);
        mesh
    }

    fn primitive_with_indices(values: Vec<u64>) -> GenericPrimitive {
        let mut primitive = GenericPrimitive::new("test");
        primitive.structure.create("vertex").insert(
            "points",
            Box::new(
                Indices::from_vec(values).with_metadata_value(key::DOMAIN, value::POINT_INDICES),
            ),
        );
        primitive
    }

    #[test]
    fn kind_mismatch_names_both_kinds() {
        let primitive = GenericPrimitive::new("torus");
        assert_eq!(
            require_kind(&primitive, "disk"),
            Err(ValidationError::WrongKind {
                expected: "disk".into(),
                found: "torus".into(),
            })
        );
        assert!(require_kind(&primitive, "torus").is_ok());
    }

    #[test]
    fn point_indices_must_be_in_range() {
        let primitive = primitive_with_indices(vec![0, 1, 2]);
        assert!(require_valid_primitive(&mesh_with_points(3), &primitive).is_ok());
        assert!(matches!(
            require_valid_primitive(&mesh_with_points(2), &primitive),
            Err(ValidationError::PointIndexOutOfBounds { index: 2, point_count: 2, .. })
        ));
    }

    #[test]
    fn point_indices_must_be_uint_arrays() {
        let mut primitive = GenericPrimitive::new("test");
        primitive.structure.create("vertex").insert(
            "points",
            Box::new(
                Doubles::from_vec(vec![0.0])
                    .with_metadata_value(key::DOMAIN, value::POINT_INDICES),
            ),
        );
        assert!(matches!(
            require_valid_primitive(&mesh_with_points(1), &primitive),
            Err(ValidationError::WrongArrayType { .. })
        ));
    }

    #[test]
    fn inconsistent_tables_are_rejected() {
        let mut primitive = GenericPrimitive::new("test");
        let table = primitive.attributes.create("vertex");
        table.create::<Doubles>("a").extend([1.0, 2.0]);
        table.create::<Doubles>("b").push(1.0);
        assert!(matches!(
            require_valid_primitive(&Mesh::new(), &primitive),
            Err(ValidationError::InconsistentTable { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn missing_tables_and_arrays() {
        let primitive = primitive_with_indices(vec![]);
        assert!(matches!(
            require_structure(&primitive, "curve"),
            Err(ValidationError::MissingStructure { .. })
        ));
        assert!(matches!(
            require_attributes(&primitive, "vertex"),
            Err(ValidationError::MissingAttributes { .. })
        ));
        let vertex = require_structure(&primitive, "vertex").unwrap();
        assert!(require_array::<Indices>(vertex, "vertex", "points").is_ok());
        assert!(matches!(
            require_array::<Indices>(vertex, "vertex", "weights"),
            Err(ValidationError::MissingArray { .. })
        ));
        assert_eq!(
            require_array::<Doubles>(vertex, "vertex", "points"),
            Err(ValidationError::WrongArrayType {
                array: "points".into(),
                expected: "k3d::double_t".into(),
                found: "k3d::uint_t".into(),
            })
        );
    }

    #[test]
    fn metadata_requirement() {
        let primitive = primitive_with_indices(vec![]);
        let points = primitive.structure.lookup("vertex").unwrap().lookup("points").unwrap();
        assert!(require_metadata(points, "points", key::DOMAIN, value::POINT_INDICES).is_ok());
        assert!(require_metadata(points, "points", key::ROLE, value::SELECTION).is_err());
    }

    #[test]
    fn row_count_requirement() {
        let mut table = Table::new();
        assert!(require_table_row_count(&table, "parameter", 8).is_ok());
        table.create::<Doubles>("u").extend([0.0; 4]);
        assert!(require_table_row_count(&table, "parameter", 4).is_ok());
        assert_eq!(
            require_table_row_count(&table, "parameter", 8),
            Err(ValidationError::RowCountMismatch {
                table: "parameter".into(),
                expected: 8,
                found: 4,
            })
        );
    }

    #[test]
    fn totals_sum_counts() {
        let counts = Indices::from_vec(vec![3, 4, 0]);
        assert_eq!(total(&counts, "curve_point_counts"), Ok(7));
        assert_eq!(total(&Indices::new(), "curve_point_counts"), Ok(0));
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        let counts = Indices::from_vec(vec![u64::MAX, 5]);
        assert_eq!(
            total(&counts, "curve_point_counts"),
            Err(ValidationError::CountOverflow {
                array: "curve_point_counts".into(),
            })
        );
    }

    #[test]
    fn range_requirement() {
        let firsts = Indices::from_vec(vec![0, 2, 5]);
        let counts = Indices::from_vec(vec![2, 3, 0]);
        assert!(require_ranges(&firsts, &counts, "first_primitives", 5).is_ok());
        assert!(matches!(
            require_ranges(&firsts, &counts, "first_primitives", 4),
            Err(ValidationError::IndexOutOfBounds { index: 2, len: 4, .. })
        ));
        let counts = Indices::from_vec(vec![2, u64::MAX, 0]);
        assert!(require_ranges(&firsts, &counts, "first_primitives", 5).is_err());
    }

    #[test]
    fn index_requirement() {
        let indices = Indices::from_vec(vec![0, 3]);
        assert!(require_indices(&indices, "face_shells", 4).is_ok());
        assert!(matches!(
            require_indices(&indices, "face_shells", 3),
            Err(ValidationError::IndexOutOfBounds { index: 3, len: 3, .. })
        ));
    }
}
