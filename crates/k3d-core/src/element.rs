//! The closed set of element types an array can store.

use std::fmt;

use crate::difference::Difference;
use crate::types::{
    Color, MaterialRef, Matrix4, NodeRef, Normal3, Point2, Point3, Point4, Texture3, Vector2,
    Vector3,
};

/// Tag identifying the concrete element type of an array.
///
/// `Uint` is reserved for `UintArray`, the dedicated index array, and is
/// distinct from `Uint64` even though both store 64-bit unsigned values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum ElementType {
    Bool,
    Color,
    Double,
    Material,
    Node,
    Int8,
    Int16,
    Int32,
    Int64,
    Matrix4,
    Normal3,
    Point2,
    Point3,
    Point4,
    String,
    Texture3,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Vector2,
    Vector3,
    Uint,
}

impl ElementType {
    /// Every supported element type, in registry order.
    pub const ALL: [ElementType; 23] = [
        ElementType::Bool,
        ElementType::Color,
        ElementType::Double,
        ElementType::Material,
        ElementType::Node,
        ElementType::Int8,
        ElementType::Int16,
        ElementType::Int32,
        ElementType::Int64,
        ElementType::Matrix4,
        ElementType::Normal3,
        ElementType::Point2,
        ElementType::Point3,
        ElementType::Point4,
        ElementType::String,
        ElementType::Texture3,
        ElementType::Uint8,
        ElementType::Uint16,
        ElementType::Uint32,
        ElementType::Uint64,
        ElementType::Vector2,
        ElementType::Vector3,
        ElementType::Uint,
    ];

    /// The stable, serialized name of this type.
    pub const fn type_string(self) -> &'static str {
        match self {
            ElementType::Bool => "k3d::bool_t",
            ElementType::Color => "k3d::color",
            ElementType::Double => "k3d::double_t",
            ElementType::Material => "k3d::imaterial*",
            ElementType::Node => "k3d::inode*",
            ElementType::Int8 => "k3d::int8_t",
            ElementType::Int16 => "k3d::int16_t",
            ElementType::Int32 => "k3d::int32_t",
            ElementType::Int64 => "k3d::int64_t",
            ElementType::Matrix4 => "k3d::matrix4",
            ElementType::Normal3 => "k3d::normal3",
            ElementType::Point2 => "k3d::point2",
            ElementType::Point3 => "k3d::point3",
            ElementType::Point4 => "k3d::point4",
            ElementType::String => "k3d::string_t",
            ElementType::Texture3 => "k3d::texture3",
            ElementType::Uint8 => "k3d::uint8_t",
            ElementType::Uint16 => "k3d::uint16_t",
            ElementType::Uint32 => "k3d::uint32_t",
            ElementType::Uint64 => "k3d::uint64_t",
            ElementType::Vector2 => "k3d::vector2",
            ElementType::Vector3 => "k3d::vector3",
            ElementType::Uint => "k3d::uint_t",
        }
    }

    /// Parse a serialized type name.
    pub fn from_type_string(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.type_string() == name)
    }

    /// Returns `true` if elements of this type are compared by ULPS
    /// distance rather than exact equality.
    pub const fn is_floating_point(self) -> bool {
        matches!(
            self,
            ElementType::Color
                | ElementType::Double
                | ElementType::Matrix4
                | ElementType::Normal3
                | ElementType::Point2
                | ElementType::Point3
                | ElementType::Point4
                | ElementType::Texture3
                | ElementType::Vector2
                | ElementType::Vector3
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_string())
    }
}

/// A value type that can be stored in a typed array.
pub trait Element:
    Clone + Default + fmt::Debug + fmt::Display + PartialEq + Difference + Send + Sync + 'static
{
    /// The tag identifying this type.
    const TYPE: ElementType;

    /// Combine several values using the given weights.
    ///
    /// Numeric types compute the weighted sum (integers round the result).
    /// Other types return the value carrying the largest weight, or the
    /// default value when `values` is empty.
    fn weighted_sum(values: &[(&Self, f64)]) -> Self;
}

fn heaviest<T: Clone + Default>(values: &[(&T, f64)]) -> T {
    values
        .iter()
        .fold(None::<(&T, f64)>, |best, &(v, w)| match best {
            Some((_, bw)) if bw >= w => best,
            _ => Some((v, w)),
        })
        .map(|(v, _)| v.clone())
        .unwrap_or_default()
}

macro_rules! linear_element {
    ($($t:ty => $tag:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const TYPE: ElementType = ElementType::$tag;

                fn weighted_sum(values: &[(&Self, f64)]) -> Self {
                    values
                        .iter()
                        .fold(<$t>::default(), |acc, &(v, w)| acc + *v * w)
                }
            }
        )*
    };
}

linear_element!(
    f64 => Double,
    Color => Color,
    Matrix4 => Matrix4,
    Normal3 => Normal3,
    Point2 => Point2,
    Point3 => Point3,
    Point4 => Point4,
    Texture3 => Texture3,
    Vector2 => Vector2,
    Vector3 => Vector3,
);

macro_rules! integer_element {
    ($($t:ty => $tag:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const TYPE: ElementType = ElementType::$tag;

                fn weighted_sum(values: &[(&Self, f64)]) -> Self {
                    let sum: f64 = values.iter().map(|&(v, w)| *v as f64 * w).sum();
                    sum.round() as $t
                }
            }
        )*
    };
}

integer_element!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
);

macro_rules! discrete_element {
    ($($t:ty => $tag:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const TYPE: ElementType = ElementType::$tag;

                fn weighted_sum(values: &[(&Self, f64)]) -> Self {
                    heaviest(values)
                }
            }
        )*
    };
}

discrete_element!(
    bool => Bool,
    String => String,
    MaterialRef => Material,
    NodeRef => Node,
);
