//! Approximate-equality configuration.

/// Thresholds used to decide whether two data sets are "close enough".
///
/// An [`Accumulator`](crate::Accumulator) only measures differences; the
/// pass/fail decision is made by comparing its statistics against a
/// `Tolerance`. All values are plain data and may be adjusted freely by
/// callers (regression tests commonly loosen `max_ulps` for data that went
/// through a lossy round trip).
#[derive(Clone, Debug, PartialEq)]
pub struct Tolerance {
    /// Largest distance, in units-in-the-last-place, tolerated between
    /// any pair of compared floating-point values.
    ///
    /// Default: 16.
    pub max_ulps: f64,
}

impl Tolerance {
    /// Default ULPS threshold.
    pub const DEFAULT_MAX_ULPS: f64 = 16.0;

    /// Create a tolerance with the default thresholds.
    pub fn new() -> Self {
        Self {
            max_ulps: Self::DEFAULT_MAX_ULPS,
        }
    }

    /// A tolerance that accepts only bit-identical floating-point values.
    pub fn exact() -> Self {
        Self { max_ulps: 0.0 }
    }

    /// Returns a copy of this tolerance with a different ULPS threshold.
    pub fn with_max_ulps(mut self, max_ulps: f64) -> Self {
        self.max_ulps = max_ulps;
        self
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new()
    }
}
