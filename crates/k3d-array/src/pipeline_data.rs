//! Copy-on-write shared ownership for pipeline payloads.
//!
//! A [`PipelineData<T>`] holds zero or one shared instance of `T`. Cloning
//! the handle shares the instance; [`PipelineData::writable`] clones the
//! instance first if anyone else still holds it, so a writer never mutates
//! data visible through another handle.
//!
//! # Sharing states
//!
//! ```text
//! Empty ──create()──▶ Shared(1) ──clone()──▶ Shared(n > 1)
//!                        ▲                        │
//!                        └──────writable()────────┘  (payload cloned)
//! ```
//!
//! The reference count is atomic, so handles may be cloned and dropped on
//! different threads.

use std::fmt;
use std::sync::Arc;

use k3d_core::{Accumulator, Difference};

use crate::array::Array;

/// How a payload is duplicated when a shared instance must be written.
///
/// Value types use [`Clone`]; type-erased arrays use
/// [`Array::clone_array`] so the concrete element type survives.
pub trait PipelineClone {
    /// A fresh, uniquely owned copy of `self`.
    fn pipeline_clone(&self) -> Arc<Self>;
}

impl<T: Clone> PipelineClone for T {
    fn pipeline_clone(&self) -> Arc<Self> {
        Arc::new(self.clone())
    }
}

impl PipelineClone for dyn Array {
    fn pipeline_clone(&self) -> Arc<Self> {
        Arc::from(self.clone_array())
    }
}

/// A copy-on-write handle to an optional shared `T`.
pub struct PipelineData<T: ?Sized> {
    inner: Option<Arc<T>>,
}

impl<T: ?Sized> PipelineData<T> {
    /// An empty handle.
    pub const fn empty() -> Self {
        Self { inner: None }
    }

    /// Wrap an already shared instance.
    pub fn from_arc(inner: Arc<T>) -> Self {
        Self { inner: Some(inner) }
    }

    /// Take ownership of a boxed instance.
    pub fn from_box(inner: Box<T>) -> Self {
        Self {
            inner: Some(Arc::from(inner)),
        }
    }

    /// Read access; `None` if empty.
    pub fn get(&self) -> Option<&T> {
        self.inner.as_deref()
    }

    /// Returns `true` if no instance is held.
    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Drop this handle's reference, leaving it empty.
    pub fn reset(&mut self) {
        self.inner = None;
    }

    /// Number of handles sharing the instance; zero if empty.
    pub fn ref_count(&self) -> usize {
        self.inner.as_ref().map_or(0, Arc::strong_count)
    }

    /// Returns `true` if both handles share the same instance (or are both
    /// empty).
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T> PipelineData<T> {
    /// Take ownership of a new instance.
    pub fn create(value: T) -> Self {
        Self {
            inner: Some(Arc::new(value)),
        }
    }
}

impl<T: ?Sized + PipelineClone> PipelineData<T> {
    /// Mutable access, cloning the instance first if it is shared.
    ///
    /// Returns `None` if the handle is empty.
    pub fn writable(&mut self) -> Option<&mut T> {
        self.inner.as_mut().map(make_unique)
    }
}

impl<T: PipelineClone + Default> PipelineData<T> {
    /// Mutable access, creating a default instance if the handle is empty
    /// and cloning the instance if it is shared.
    pub fn make_writable(&mut self) -> &mut T {
        make_unique(self.inner.get_or_insert_with(|| Arc::new(T::default())))
    }
}

fn make_unique<T: ?Sized + PipelineClone>(arc: &mut Arc<T>) -> &mut T {
    if Arc::get_mut(arc).is_none() {
        tracing::trace!(
            refs = Arc::strong_count(arc),
            "cloning shared pipeline data before write"
        );
        *arc = T::pipeline_clone(arc);
    }
    Arc::get_mut(arc).expect("freshly cloned pipeline data has a single owner")
}

impl<T: ?Sized> Clone for PipelineData<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: ?Sized> Default for PipelineData<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<T> for PipelineData<T> {
    fn from(value: T) -> Self {
        Self::create(value)
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for PipelineData<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(inner) => f
                .debug_struct("PipelineData")
                .field("refs", &Arc::strong_count(inner))
                .field("value", &&**inner)
                .finish(),
            None => f.write_str("PipelineData(empty)"),
        }
    }
}

impl<T: ?Sized + fmt::Display> fmt::Display for PipelineData<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str("(empty)"),
        }
    }
}

impl<T: ?Sized + Difference> Difference for PipelineData<T> {
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        match (self.get(), other.get()) {
            (Some(a), Some(b)) => a.difference(b, result),
            (None, None) => result.exact(true),
            _ => result.exact(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed_array::TypedArray;
    use crate::uint_array::UintArray;

    #[test]
    fn empty_handle() {
        let mut p = PipelineData::<Vec<i32>>::default();
        assert!(p.is_empty());
        assert!(p.get().is_none());
        assert!(p.writable().is_none());
        assert_eq!(p.ref_count(), 0);
    }

    #[test]
    fn make_writable_creates_default() {
        let mut p = PipelineData::<Vec<i32>>::empty();
        p.make_writable().push(3);
        assert_eq!(p.get(), Some(&vec![3]));
    }

    #[test]
    fn clone_shares_until_written() {
        let a = PipelineData::create(vec![1, 2, 3]);
        let mut b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.ref_count(), 2);

        b.writable().unwrap().push(4);
        assert!(!a.ptr_eq(&b));
        assert_eq!(a.get(), Some(&vec![1, 2, 3]));
        assert_eq!(b.get(), Some(&vec![1, 2, 3, 4]));
        assert_eq!(a.ref_count(), 1);
        assert_eq!(b.ref_count(), 1);
    }

    #[test]
    fn unique_handle_writes_in_place() {
        let mut a = PipelineData::create(vec![1]);
        let before = a.get().unwrap() as *const Vec<i32>;
        a.writable().unwrap().push(2);
        let after = a.get().unwrap() as *const Vec<i32>;
        assert_eq!(before, after);
    }

    #[test]
    fn arrays_clone_through_the_virtual_constructor() {
        let a: PipelineData<dyn Array> =
            PipelineData::from_box(Box::new(UintArray::from_vec(vec![1, 2])));
        let mut b = a.clone();
        b.writable()
            .unwrap()
            .downcast_mut::<UintArray>()
            .unwrap()
            .push(3);

        let a = a.get().unwrap().downcast_ref::<UintArray>().unwrap();
        let b = b.get().unwrap().downcast_ref::<UintArray>().unwrap();
        assert_eq!(a.as_slice(), &[1, 2]);
        assert_eq!(b.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn reset_releases_the_share() {
        let a = PipelineData::create(TypedArray::from_vec(vec![1.0_f64]));
        let mut b = a.clone();
        b.reset();
        assert!(b.is_empty());
        assert_eq!(a.ref_count(), 1);
    }

    #[test]
    fn difference_of_handles() {
        let a: PipelineData<dyn Array> = PipelineData::from_box(Box::new(UintArray::from_vec(vec![1])));
        let b = a.clone();
        assert!(k3d_core::difference::test(&a, &b).is_exact());
        let empty = PipelineData::<dyn Array>::empty();
        assert!(!k3d_core::difference::test(&a, &empty).is_exact());
        assert!(k3d_core::difference::test(&empty, &empty).is_exact());
    }

    #[test]
    fn handles_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PipelineData<dyn Array>>();
        assert_send_sync::<PipelineData<TypedArray<f64>>>();
    }
}
