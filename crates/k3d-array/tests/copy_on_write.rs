//! Copy-on-write isolation between pipeline stages.

use std::thread;

use k3d_array::{PipelineData, Table, TypedArray};
use k3d_test_utils::assertions::assert_exact;
use k3d_test_utils::fixtures::sample_table;

#[test]
fn readers_never_observe_writes() {
    let upstream = sample_table(4);
    let snapshot = upstream.deep_clone();

    let mut downstream = upstream.clone();
    downstream
        .writable_as::<TypedArray<f64>>("weights")
        .unwrap()
        .iter_mut()
        .for_each(|w| *w *= 2.0);
    downstream.set_row_count(6);

    let mut result = k3d_core::Accumulator::new();
    k3d_core::Difference::difference(&upstream, &snapshot, &mut result);
    assert_exact(&result);
    assert_eq!(upstream.row_count(), 4);
    assert_eq!(downstream.row_count(), 6);
}

#[test]
fn untouched_arrays_stay_shared() {
    let upstream = sample_table(3);
    let mut downstream = upstream.clone();
    downstream.writable("weights").unwrap().resize(3);

    let shared = |name: &str| {
        upstream
            .lookup_shared(name)
            .unwrap()
            .ptr_eq(downstream.lookup_shared(name).unwrap())
    };
    assert!(!shared("weights"));
    assert!(shared("points"));
    assert!(shared("names"));
}

#[test]
fn shared_tables_cross_threads() {
    let table = PipelineData::create(sample_table(8));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let mut local = table.clone();
            thread::spawn(move || {
                let table: &mut Table = local.writable().unwrap();
                table.set_row_count(i);
                table.row_count()
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), i);
    }
    assert_eq!(table.get().unwrap().row_count(), 8);
}
