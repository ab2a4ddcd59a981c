//! Approximate-equality measurement.
//!
//! Comparing two data sets never fails: every comparison is recorded into an
//! [`Accumulator`], which keeps two independent measurements:
//!
//! - an **exact** flag, the logical AND of every exact test performed
//!   (type identity, lengths, names, metadata, integer and string values);
//! - **ULPS** statistics, the distances in units-in-the-last-place between
//!   every pair of compared floating-point values.
//!
//! Callers decide what "equal" means by inspecting the accumulator, usually
//! through [`Accumulator::approximately_equal`].

use crate::config::Tolerance;

/// Collects the results of a difference test.
#[derive(Clone, Debug, PartialEq)]
pub struct Accumulator {
    exact: bool,
    exact_count: usize,
    ulps_count: usize,
    ulps_min: f64,
    ulps_max: f64,
    ulps_sum: f64,
}

impl Accumulator {
    /// Create an empty accumulator (exact, with no ULPS samples).
    pub fn new() -> Self {
        Self {
            exact: true,
            exact_count: 0,
            ulps_count: 0,
            ulps_min: 0.0,
            ulps_max: 0.0,
            ulps_sum: 0.0,
        }
    }

    /// Record the outcome of an exact test.
    pub fn exact(&mut self, equal: bool) {
        self.exact_count += 1;
        self.exact &= equal;
    }

    /// Record a floating-point distance measured in ULPS.
    pub fn ulps(&mut self, distance: f64) {
        if self.ulps_count == 0 {
            self.ulps_min = distance;
            self.ulps_max = distance;
        } else {
            self.ulps_min = self.ulps_min.min(distance);
            self.ulps_max = self.ulps_max.max(distance);
        }
        self.ulps_count += 1;
        self.ulps_sum += distance;
    }

    /// Returns `true` if every exact test recorded so far passed.
    pub fn is_exact(&self) -> bool {
        self.exact
    }

    /// Number of exact tests recorded.
    pub fn exact_count(&self) -> usize {
        self.exact_count
    }

    /// Number of ULPS samples recorded.
    pub fn ulps_count(&self) -> usize {
        self.ulps_count
    }

    /// Smallest recorded ULPS distance, or zero with no samples.
    pub fn min_ulps(&self) -> f64 {
        self.ulps_min
    }

    /// Largest recorded ULPS distance, or zero with no samples.
    pub fn max_ulps(&self) -> f64 {
        self.ulps_max
    }

    /// Mean recorded ULPS distance, or zero with no samples.
    pub fn mean_ulps(&self) -> f64 {
        if self.ulps_count == 0 {
            0.0
        } else {
            self.ulps_sum / self.ulps_count as f64
        }
    }

    /// Returns `true` if all exact tests passed and no floating-point pair
    /// exceeded the tolerance.
    pub fn approximately_equal(&self, tolerance: &Tolerance) -> bool {
        self.exact && self.ulps_max <= tolerance.max_ulps
    }

    /// Fold the measurements of another accumulator into this one.
    pub fn merge(&mut self, other: &Accumulator) {
        self.exact_count += other.exact_count;
        self.exact &= other.exact;
        if other.ulps_count > 0 {
            if self.ulps_count == 0 {
                self.ulps_min = other.ulps_min;
                self.ulps_max = other.ulps_max;
            } else {
                self.ulps_min = self.ulps_min.min(other.ulps_min);
                self.ulps_max = self.ulps_max.max(other.ulps_max);
            }
            self.ulps_count += other.ulps_count;
            self.ulps_sum += other.ulps_sum;
        }
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Types that can be compared with approximate-equality semantics.
pub trait Difference {
    /// Record the difference between `self` and `other` into `result`.
    fn difference(&self, other: &Self, result: &mut Accumulator);
}

/// Compare two values, returning a fresh accumulator.
pub fn test<T: Difference + ?Sized>(a: &T, b: &T) -> Accumulator {
    let mut result = Accumulator::new();
    a.difference(b, &mut result);
    result
}

/// Compare two sequences element by element.
///
/// Sequences of different lengths fail the exact test; the common prefix is
/// still compared so the ULPS statistics stay meaningful.
pub fn range_test<T: Difference>(a: &[T], b: &[T], result: &mut Accumulator) {
    result.exact(a.len() == b.len());
    for (x, y) in a.iter().zip(b) {
        x.difference(y, result);
    }
}

/// Distance between two doubles in units-in-the-last-place.
///
/// Equal values (including `+0.0` / `-0.0`) are 0 apart, two NaNs are
/// treated as equal, and a NaN compared with a number is infinitely far.
pub fn ulps_distance(a: f64, b: f64) -> f64 {
    if a == b || (a.is_nan() && b.is_nan()) {
        return 0.0;
    }
    if a.is_nan() || b.is_nan() {
        return f64::INFINITY;
    }
    let a = ordered_bits(a) as i128;
    let b = ordered_bits(b) as i128;
    (a - b).unsigned_abs() as f64
}

/// Maps a double onto a signed integer line that preserves float ordering.
fn ordered_bits(value: f64) -> i64 {
    let bits = value.to_bits() as i64;
    if bits < 0 {
        i64::MIN - bits
    } else {
        bits
    }
}

impl Difference for f64 {
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        result.ulps(ulps_distance(*self, *other));
    }
}

impl Difference for f32 {
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        result.ulps(ulps_distance(f64::from(*self), f64::from(*other)));
    }
}

macro_rules! exact_difference {
    ($($t:ty),* $(,)?) => {
        $(
            impl Difference for $t {
                fn difference(&self, other: &Self, result: &mut Accumulator) {
                    result.exact(self == other);
                }
            }
        )*
    };
}

exact_difference!(bool, i8, i16, i32, i64, u8, u16, u32, u64, usize, String, str);

impl<T: Difference> Difference for [T] {
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        range_test(self, other, result);
    }
}

impl<T: Difference> Difference for Vec<T> {
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        range_test(self, other, result);
    }
}

impl<T: Difference + ?Sized> Difference for Box<T> {
    fn difference(&self, other: &Self, result: &mut Accumulator) {
        (**self).difference(&**other, result);
    }
}
