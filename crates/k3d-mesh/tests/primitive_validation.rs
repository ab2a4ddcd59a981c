//! Validation of mixed-kind meshes as a pipeline stage sees them.

use std::io;
use std::sync::{Arc, Mutex};

use k3d_array::Array;
use k3d_core::{difference, Accumulator, Difference, Tolerance};
use k3d_mesh::{
    bicubic_patch, bilinear_patch, blobby, cone, cubic_curve, cylinder, disk, hyperboloid,
    linear_curve, nurbs_curve, paraboloid, particle, polyhedron, sphere, torus, GenericPrimitive,
    Mesh,
};
use k3d_test_utils::assertions::{assert_approximately_equal, assert_exact, assert_not_exact};
use k3d_test_utils::fixtures::sample_mesh;

/// Kinds that accept `primitive`, by tag.
fn accepted_by(mesh: &Mesh, primitive: &GenericPrimitive) -> Vec<&'static str> {
    let mut kinds = Vec::new();
    macro_rules! validate_each {
        ($($kind:ident),+) => {
            $(
                if $kind::validate(mesh, primitive).is_some() {
                    kinds.push($kind::KIND);
                }
            )+
        };
    }
    validate_each!(
        bicubic_patch, bilinear_patch, blobby, cone, cubic_curve, cylinder, disk, hyperboloid,
        linear_curve, nurbs_curve, paraboloid, particle, polyhedron, sphere, torus
    );
    kinds
}

#[test]
fn each_primitive_validates_as_exactly_its_own_kind() {
    let mesh = sample_mesh();
    let expected = ["polyhedron", "disk", "linear_curve", "particle"];
    assert_eq!(mesh.primitives.len(), expected.len());
    for (primitive, kind) in mesh.primitives.iter().zip(expected) {
        let primitive = primitive.get().unwrap();
        assert_eq!(accepted_by(&mesh, primitive), vec![kind]);
    }
}

#[test]
fn created_primitives_of_every_kind_validate() {
    let mut mesh = Mesh::new();
    disk::create(&mut mesh);
    torus::create(&mut mesh);
    sphere::create(&mut mesh);
    cylinder::create(&mut mesh);
    cone::create(&mut mesh);
    paraboloid::create(&mut mesh);
    hyperboloid::create(&mut mesh);
    linear_curve::create(&mut mesh);
    cubic_curve::create(&mut mesh);
    nurbs_curve::create(&mut mesh);
    bilinear_patch::create(&mut mesh);
    bicubic_patch::create(&mut mesh);
    polyhedron::create(&mut mesh);
    particle::create(&mut mesh);
    blobby::create(&mut mesh);
    assert_eq!(mesh.primitives.len(), 15);
    for primitive in mesh.primitives.iter() {
        let primitive = primitive.get().unwrap();
        assert_eq!(accepted_by(&mesh, primitive), vec![primitive.kind.as_str()]);
    }
}

#[test]
fn probing_foreign_kinds_keeps_primitives_shared() {
    let upstream = sample_mesh();
    let mut downstream = upstream.clone();
    downstream.with_primitives_mut(|mesh, primitives| {
        for primitive in primitives.iter_mut() {
            assert!(sphere::validate_pipeline(mesh, primitive).is_none());
        }
    });
    for (a, b) in upstream.primitives.iter().zip(downstream.primitives.iter()) {
        assert!(a.ptr_eq(b));
    }
}

#[test]
fn editing_one_primitive_copies_only_that_primitive() {
    let upstream = sample_mesh();
    let mut downstream = upstream.clone();
    downstream.with_primitives_mut(|mesh, primitives| {
        let disk = disk::validate_pipeline(mesh, &mut primitives[1]).unwrap();
        disk.radii[0] = 2.0;
    });

    for (index, (a, b)) in upstream
        .primitives
        .iter()
        .zip(downstream.primitives.iter())
        .enumerate()
    {
        assert_eq!(a.ptr_eq(b), index != 1, "primitive {index}");
    }
    let upstream_disk = disk::validate(&upstream, upstream.primitives[1].get().unwrap()).unwrap();
    assert_eq!(upstream_disk.radii.as_slice(), &[1.0]);

    let mut result = Accumulator::new();
    upstream.difference(&downstream, &mut result);
    assert_exact(&result);
    assert!(!result.approximately_equal(&Tolerance::default()));
}

#[test]
fn moving_a_point_is_an_approximate_difference() {
    let upstream = sample_mesh();
    let mut downstream = upstream.clone();
    let point = &mut downstream.points.make_writable()[0];
    point.x = f64::from_bits(point.x.to_bits() + 1);

    let result = difference::test(&upstream, &downstream);
    assert_exact(&result);
    assert_eq!(result.max_ulps(), 1.0);
    assert_approximately_equal(&result, &Tolerance::default());
}

#[test]
fn dropping_a_primitive_is_an_exact_difference() {
    let upstream = sample_mesh();
    let mut downstream = upstream.clone();
    downstream.primitives.remove(3);
    assert_not_exact(&difference::test(&upstream, &downstream));
}

#[test]
fn point_indices_are_checked_against_the_mesh() {
    let mut mesh = sample_mesh();
    let count = mesh.point_count();
    mesh.with_primitives_mut(|mesh, primitives| {
        let particles = particle::validate_pipeline(mesh, &mut primitives[3]).unwrap();
        particles.points.push(count as u64);
    });
    assert!(particle::validate(&mesh, mesh.primitives[3].get().unwrap()).is_none());

    Array::resize(mesh.points.make_writable(), count + 1);
    assert!(particle::validate(&mesh, mesh.primitives[3].get().unwrap()).is_some());
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn only_malformed_primitives_of_the_requested_kind_are_logged() {
    let mut mesh = sample_mesh();
    mesh.with_primitives_mut(|mesh, primitives| {
        let disk = disk::validate_pipeline(mesh, &mut primitives[1]).unwrap();
        disk.radii.push(3.0);
    });

    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        for primitive in mesh.primitives.iter() {
            let primitive = primitive.get().unwrap();
            assert!(disk::validate(&mesh, primitive).is_none());
        }
    });

    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert_eq!(output.matches("primitive failed validation").count(), 1);
    assert!(output.contains("disk"));
    assert!(output.contains("radii"));
}
