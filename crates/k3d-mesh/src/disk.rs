//! Disks: flat circular surfaces in the XY plane, offset along Z.

use crate::mesh::Doubles;

crate::quadric::quadric! {
    kind: "disk",
    arrays: {
        /// Per-disk offset along Z.
        heights: Doubles,
        /// Per-disk radius.
        radii: Doubles,
        /// Per-disk sweep angle, in radians.
        sweep_angles: Doubles,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use k3d_array::Array;
    use k3d_core::{MaterialRef, Matrix4};

    #[test]
    fn view_aliases_generic_storage() {
        let mut mesh = Mesh::new();
        let disk = create(&mut mesh);
        disk.matrices.push(Matrix4::identity());
        disk.materials.push(MaterialRef::NONE);
        disk.heights.push(0.5);
        disk.radii.push(2.0);
        disk.sweep_angles.push(1.0);
        disk.selections.push(0.0);

        let generic = mesh.primitives[0].get().unwrap();
        let view = validate(&mesh, generic).unwrap();
        let stored = generic.structure.lookup("surface").unwrap().lookup("radii").unwrap();
        assert!(std::ptr::eq(
            view.radii as *const Doubles as *const (),
            stored as *const dyn Array as *const ()
        ));
        assert_eq!(view.radii.as_slice(), &[2.0]);
    }

    #[test]
    fn parameter_rows_follow_surfaces() {
        let mut mesh = Mesh::new();
        let disk = create(&mut mesh);
        disk.matrices.push(Matrix4::identity());
        disk.materials.push(MaterialRef::NONE);
        disk.heights.push(0.0);
        disk.radii.push(1.0);
        disk.sweep_angles.push(1.0);
        disk.selections.push(0.0);
        disk.parameter_attributes.create::<Doubles>("u").extend([0.0; 3]);

        let generic = mesh.primitives[0].get().unwrap();
        assert!(matches!(
            try_validate(&mesh, generic),
            Err(crate::ValidationError::RowCountMismatch { expected: 4, found: 3, .. })
        ));
    }
}
