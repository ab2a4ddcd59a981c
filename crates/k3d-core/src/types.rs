//! Geometric and reference value types storable in arrays.

use std::fmt;
use std::ops::{Add, Mul};

use crate::difference::{Accumulator, Difference};

macro_rules! float_tuple {
    ($(#[$doc:meta])* $name:ident { $($field:ident),+ }) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq)]
        pub struct $name {
            $(
                #[allow(missing_docs)]
                pub $field: f64,
            )+
        }

        impl $name {
            /// Construct from components.
            pub const fn new($($field: f64),+) -> Self {
                Self { $($field),+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let parts = [$(self.$field),+];
                for (i, v) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{v}")?;
                }
                Ok(())
            }
        }

        impl Difference for $name {
            fn difference(&self, other: &Self, result: &mut Accumulator) {
                $(self.$field.difference(&other.$field, result);)+
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }
    };
}

float_tuple! {
    /// An RGB color.
    Color { red, green, blue }
}

float_tuple! {
    /// A surface normal.
    Normal3 { x, y, z }
}

float_tuple! {
    /// A point in two dimensions.
    Point2 { x, y }
}

float_tuple! {
    /// A point in three dimensions.
    Point3 { x, y, z }
}

float_tuple! {
    /// A point in homogeneous coordinates.
    Point4 { x, y, z, w }
}

float_tuple! {
    /// A three-component texture coordinate.
    Texture3 { s, t, u }
}

float_tuple! {
    /// A direction in two dimensions.
    Vector2 { x, y }
}

float_tuple! {
    /// A direction in three dimensions.
    Vector3 { x, y, z }
}

/// A 4x4 row-major transformation matrix.
///
/// `Default` is the zero matrix; use [`Matrix4::identity`] for transforms.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Matrix4(pub [[f64; 4]; 4]);

impl Matrix4 {
    /// The identity transform.
    pub const fn identity() -> Self {
        Self([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// A pure translation.
    pub const fn translation(x: f64, y: f64, z: f64) -> Self {
        Self([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    fn values(&self) -> impl Iterator<Item = &f64> {
        self.0.iter().flatten()
    }
}

impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.values().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl Difference for Matrix4 {
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        for (a, b) in self.values().zip(other.values()) {
            a.difference(b, result);
        }
    }
}

impl Add for Matrix4 {
    type Output = Self;
    fn add(mut self, rhs: Self) -> Self {
        for (row, rhs_row) in self.0.iter_mut().zip(rhs.0) {
            for (v, r) in row.iter_mut().zip(rhs_row) {
                *v += r;
            }
        }
        self
    }
}

impl Mul<f64> for Matrix4 {
    type Output = Self;
    fn mul(mut self, rhs: f64) -> Self {
        for v in self.0.iter_mut().flatten() {
            *v *= rhs;
        }
        self
    }
}

macro_rules! opaque_ref {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        ///
        /// The wrapped id is owned by the document; `None` is the null reference.
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name(pub Option<u32>);

        impl $name {
            /// The null reference.
            pub const NONE: Self = Self(None);

            /// Refer to the object with the given id.
            pub const fn new(id: u32) -> Self {
                Self(Some(id))
            }

            /// Returns `true` for the null reference.
            pub const fn is_none(&self) -> bool {
                self.0.is_none()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.0 {
                    Some(id) => write!(f, "#{id}"),
                    None => f.write_str("null"),
                }
            }
        }

        impl Difference for $name {
            fn difference(&self, other: &Self, result: &mut Accumulator) {
                result.exact(self == other);
            }
        }
    };
}

opaque_ref! {
    /// A reference to a material node.
    MaterialRef
}

opaque_ref! {
    /// A reference to an arbitrary document node.
    NodeRef
}
