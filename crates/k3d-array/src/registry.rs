//! Process-wide registry of storable element types.
//!
//! Maps each stable type string to its [`ElementType`] tag and to a factory
//! for an empty array of that type. The table is built once, on first use,
//! from the closed set in [`ElementType::ALL`]; adding an element type means
//! adding a variant there and a factory arm in [`empty_array`].

use std::sync::OnceLock;

use indexmap::IndexMap;
use k3d_core::{
    Color, ElementType, MaterialRef, Matrix4, NodeRef, Normal3, Point2, Point3, Point4, Texture3,
    Vector2, Vector3,
};

use crate::array::Array;
use crate::error::ArrayError;
use crate::typed_array::TypedArray;
use crate::uint_array::UintArray;

type Factory = fn() -> Box<dyn Array>;

struct Registry {
    entries: IndexMap<&'static str, (ElementType, Factory)>,
}

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let entries: IndexMap<_, _> = ElementType::ALL
            .into_iter()
            .map(|t| (t.type_string(), (t, factory(t))))
            .collect();
        tracing::debug!(types = entries.len(), "array type registry initialized");
        Registry { entries }
    })
}

fn typed<T: k3d_core::Element>() -> Box<dyn Array> {
    Box::new(TypedArray::<T>::new())
}

fn uint() -> Box<dyn Array> {
    Box::new(UintArray::new())
}

fn factory(element_type: ElementType) -> Factory {
    match element_type {
        ElementType::Bool => typed::<bool>,
        ElementType::Color => typed::<Color>,
        ElementType::Double => typed::<f64>,
        ElementType::Material => typed::<MaterialRef>,
        ElementType::Node => typed::<NodeRef>,
        ElementType::Int8 => typed::<i8>,
        ElementType::Int16 => typed::<i16>,
        ElementType::Int32 => typed::<i32>,
        ElementType::Int64 => typed::<i64>,
        ElementType::Matrix4 => typed::<Matrix4>,
        ElementType::Normal3 => typed::<Normal3>,
        ElementType::Point2 => typed::<Point2>,
        ElementType::Point3 => typed::<Point3>,
        ElementType::Point4 => typed::<Point4>,
        ElementType::String => typed::<String>,
        ElementType::Texture3 => typed::<Texture3>,
        ElementType::Uint8 => typed::<u8>,
        ElementType::Uint16 => typed::<u16>,
        ElementType::Uint32 => typed::<u32>,
        ElementType::Uint64 => typed::<u64>,
        ElementType::Vector2 => typed::<Vector2>,
        ElementType::Vector3 => typed::<Vector3>,
        ElementType::Uint => uint,
    }
}

/// An empty array of the given element type.
pub fn empty_array(element_type: ElementType) -> Box<dyn Array> {
    factory(element_type)()
}

/// An empty array for a serialized type string.
///
/// # Errors
///
/// [`ArrayError::UnregisteredType`] if `type_string` is not registered.
pub fn create_array(type_string: &str) -> Result<Box<dyn Array>, ArrayError> {
    let (_, factory) = registry()
        .entries
        .get(type_string)
        .ok_or_else(|| ArrayError::UnregisteredType {
            type_string: type_string.to_owned(),
        })?;
    Ok(factory())
}

/// Resolve a type string to its tag.
///
/// # Errors
///
/// [`ArrayError::UnregisteredType`] if `type_string` is not registered.
pub fn lookup_type(type_string: &str) -> Result<ElementType, ArrayError> {
    registry()
        .entries
        .get(type_string)
        .map(|(t, _)| *t)
        .ok_or_else(|| ArrayError::UnregisteredType {
            type_string: type_string.to_owned(),
        })
}

/// Every registered type string, in registration order.
pub fn registered_types() -> impl Iterator<Item = &'static str> {
    registry().entries.keys().copied()
}
