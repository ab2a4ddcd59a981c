//! Primitive kind compliance test helpers.
//!
//! These functions verify that a kind module's `create`, `try_validate`,
//! and `validate_mut` agree with each other, bind the stored arrays
//! rather than copies, and reject malformed storage.
//! Reused across every kind's test module.

use k3d_array::Array;
use k3d_core::difference;

use crate::error::ValidationError;
use crate::kind::PrimitiveKind;
use crate::mesh::Mesh;
use crate::primitive::GenericPrimitive;

fn primitive_at(mesh: &Mesh, index: usize) -> &GenericPrimitive {
    mesh.primitives
        .get(index)
        .and_then(|primitive| primitive.get())
        .unwrap_or_else(|| panic!("mesh has no primitive at index {index}"))
}

/// Assert that primitive `index` of `mesh` validates as `K`, both read-only
/// and mutably.
pub fn assert_validates<K: PrimitiveKind>(mesh: &Mesh, index: usize) {
    let primitive = primitive_at(mesh, index);
    if let Err(error) = K::try_validate(mesh, primitive) {
        panic!("{} primitive {index} failed validation: {error}", K::KIND);
    }
    let mut copy = primitive.clone();
    assert!(
        K::validate_mut(mesh, &mut copy).is_some(),
        "{} primitive {index} validates but does not bind mutably",
        K::KIND
    );
}

/// Assert that a freshly created primitive carries the kind tag and
/// validates.
pub fn assert_create_validates<K: PrimitiveKind>() {
    let mut mesh = Mesh::new();
    let _ = K::create(&mut mesh);
    assert_eq!(mesh.primitives.len(), 1, "create must append one primitive");
    assert_eq!(primitive_at(&mesh, 0).kind, K::KIND);
    assert_validates::<K>(&mesh, 0);
}

fn address(array: &dyn Array) -> *const () {
    std::ptr::from_ref(array).cast::<()>()
}

/// Assert that every array a read-only view binds is the stored array of
/// the same name, and that every stored structure array is bound.
pub fn assert_view_aliases_storage<K: PrimitiveKind>(mesh: &Mesh, index: usize) {
    let primitive = primitive_at(mesh, index);
    let view = K::try_validate(mesh, primitive)
        .unwrap_or_else(|error| panic!("{} primitive {index} failed validation: {error}", K::KIND));
    let bound = K::structure_arrays(&view);
    let stored: usize = primitive.structure.iter().map(|(_, table)| table.column_count()).sum();
    assert_eq!(bound.len(), stored, "{} view skips stored structure arrays", K::KIND);
    for (name, array) in bound {
        let matches = primitive
            .structure
            .iter()
            .filter_map(|(_, table)| table.lookup(name))
            .any(|stored| address(stored) == address(array));
        assert!(matches, "{} view of [{name}] is not the stored array", K::KIND);
    }
}

/// Assert that the view returned by `create` and a later validation are
/// bound to the same arrays.
pub fn assert_create_aliases_storage<K: PrimitiveKind>() {
    let mut mesh = Mesh::new();
    let created: Vec<(&str, *const ())> = {
        let view = K::create(&mut mesh);
        let created = K::structure_arrays(&K::as_const(&view))
            .into_iter()
            .map(|(name, array)| (name, address(array)))
            .collect();
        created
    };
    let primitive = primitive_at(&mesh, 0);
    let validated: Vec<(&str, *const ())> = K::try_validate(&mesh, primitive)
        .map(|view| {
            K::structure_arrays(&view)
                .into_iter()
                .map(|(name, array)| (name, address(array)))
                .collect()
        })
        .unwrap_or_else(|error| panic!("created {} failed validation: {error}", K::KIND));
    assert_eq!(created, validated, "{} create and validate bind different arrays", K::KIND);
    assert_view_aliases_storage::<K>(&mesh, 0);
}

/// Assert that the same storage under another kind tag is rejected with
/// [`ValidationError::WrongKind`].
pub fn assert_rejects_foreign_kind<K: PrimitiveKind>(mesh: &Mesh, index: usize) {
    let mut primitive = primitive_at(mesh, index).clone();
    primitive.kind = format!("not_{}", K::KIND);
    assert!(
        matches!(
            K::try_validate(mesh, &primitive),
            Err(ValidationError::WrongKind { .. })
        ),
        "{} accepted a primitive tagged {:?}",
        K::KIND,
        primitive.kind
    );
    assert!(K::validate_mut(mesh, &mut primitive).is_none());
}

/// Assert that removing any structure or attribute table fails validation.
pub fn assert_rejects_missing_tables<K: PrimitiveKind>(mesh: &Mesh, index: usize) {
    let original = primitive_at(mesh, index);
    for (name, _) in original.structure.iter() {
        let mut primitive = original.clone();
        primitive.structure.erase(name);
        assert!(
            K::try_validate(mesh, &primitive).is_err(),
            "{} accepted a primitive without structure table [{name}]",
            K::KIND
        );
    }
    for (name, _) in original.attributes.iter() {
        let mut primitive = original.clone();
        primitive.attributes.erase(name);
        assert!(
            K::try_validate(mesh, &primitive).is_err(),
            "{} accepted a primitive without attribute table [{name}]",
            K::KIND
        );
    }
}

/// Assert that removing any structure array fails validation.
pub fn assert_rejects_missing_arrays<K: PrimitiveKind>(mesh: &Mesh, index: usize) {
    let original = primitive_at(mesh, index);
    for (table_name, table) in original.structure.iter() {
        for array_name in table.names() {
            let mut primitive = original.clone();
            primitive
                .structure
                .writable(table_name)
                .expect("table was just listed")
                .erase(array_name);
            assert!(
                K::try_validate(mesh, &primitive).is_err(),
                "{} accepted a primitive without array [{array_name}] in [{table_name}]",
                K::KIND
            );
        }
    }
}

/// Assert that lengthening one array of a multi-column structure table is
/// reported as [`ValidationError::InconsistentTable`].
pub fn assert_rejects_mismatched_lengths<K: PrimitiveKind>(mesh: &Mesh, index: usize) {
    let original = primitive_at(mesh, index);
    for (table_name, table) in original.structure.iter() {
        if table.column_count() < 2 {
            continue;
        }
        let Some(first) = table.names().next() else {
            continue;
        };
        let mut primitive = original.clone();
        let array = primitive
            .structure
            .writable(table_name)
            .and_then(|table| table.writable(first))
            .expect("array was just listed");
        let len = array.len();
        Array::resize(array, len + 1);
        assert!(
            matches!(
                K::try_validate(mesh, &primitive),
                Err(ValidationError::InconsistentTable { .. })
            ),
            "{} accepted mismatched lengths in [{table_name}]",
            K::KIND
        );
    }
}

/// Assert that binding a mutable view through a shared handle copies the
/// primitive, leaving the other holder untouched.
pub fn assert_copy_on_write<K: PrimitiveKind>(mesh: &Mesh, index: usize) {
    let mut copy = mesh.clone();
    assert!(copy.primitives[index].ptr_eq(&mesh.primitives[index]));
    copy.with_primitives_mut(|copy, primitives| {
        let primitive = primitives[index].writable().expect("primitive is present");
        assert!(K::validate_mut(copy, primitive).is_some());
    });
    assert!(
        !copy.primitives[index].ptr_eq(&mesh.primitives[index]),
        "{} primitive still shared after a mutable bind",
        K::KIND
    );
    assert!(difference::test(&copy, mesh).is_exact());
}

/// Run all compliance checks against primitive `index` of `mesh`, which
/// must be a populated, valid primitive of kind `K`.
pub fn run_full_compliance<K: PrimitiveKind>(mesh: &Mesh, index: usize) {
    assert_create_validates::<K>();
    assert_create_aliases_storage::<K>();
    assert_validates::<K>(mesh, index);
    assert_view_aliases_storage::<K>(mesh, index);
    assert_rejects_foreign_kind::<K>(mesh, index);
    assert_rejects_missing_tables::<K>(mesh, index);
    assert_rejects_missing_arrays::<K>(mesh, index);
    assert_rejects_mismatched_lengths::<K>(mesh, index);
    assert_copy_on_write::<K>(mesh, index);
}
