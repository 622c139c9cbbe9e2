//! Physical pixel values used by the strip geometry.
//!
//! Every horizontal quantity the strip computes (item widths, paddings, left
//! edges, scroll distances) is a [`Px`]. Negative values are meaningful: an
//! item scrolled past the left edge of the viewport has a negative left edge.
//!
//! # Example
//!
//! ```
//! use expandable_strip::px::Px;
//!
//! let width = Px::new(600);
//! let half = width / 2;
//! assert_eq!(half, Px::new(300));
//! assert_eq!(Px::round_from_f32(1000.0 * 0.55), Px::new(550));
//! ```

use std::{
    fmt,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
};

/// A physical pixel value.
///
/// The strip works in whole pixels: every fractional result is rounded once,
/// at the point it becomes a [`Px`].
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Px(pub i32);

impl Px {
    /// Zero pixels.
    pub const ZERO: Self = Self(0);

    /// The largest representable pixel value.
    pub const MAX: Self = Self(i32::MAX);

    /// Creates a new `Px` from a raw value. Negative values are allowed.
    pub const fn new(value: i32) -> Self {
        Px(value)
    }

    /// Returns the raw i32 value.
    pub fn raw(self) -> i32 {
        self.0
    }

    /// Converts the pixel value to f32.
    pub fn to_f32(self) -> f32 {
        self.0 as f32
    }

    /// Rounds an f32 to the nearest pixel, half away from zero, saturating
    /// at the i32 bounds. NaN maps to zero.
    ///
    /// ```
    /// use expandable_strip::px::Px;
    ///
    /// assert_eq!(Px::round_from_f32(299.5), Px::new(300));
    /// assert_eq!(Px::round_from_f32(-0.4), Px::ZERO);
    /// assert_eq!(Px::round_from_f32(f32::MAX), Px::MAX);
    /// ```
    pub fn round_from_f32(value: f32) -> Self {
        if value.is_nan() {
            return Px::ZERO;
        }
        let clamped = value.round().clamp(i32::MIN as f32, i32::MAX as f32);
        Px(clamped as i32)
    }

    /// Truncates an f32 toward zero, saturating at the i32 bounds.
    pub fn truncate_from_f32(value: f32) -> Self {
        if value.is_nan() {
            return Px::ZERO;
        }
        let clamped = value.clamp(i32::MIN as f32, i32::MAX as f32);
        Px(clamped as i32)
    }

    /// Returns the absolute value.
    pub fn abs(self) -> Self {
        Px(self.0.saturating_abs())
    }

    /// Saturating addition.
    pub fn saturating_add(self, rhs: Self) -> Self {
        Px(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Px(self.0.saturating_sub(rhs.0))
    }

    /// Multiplies by an item count or a signed position delta, saturating at
    /// the i32 bounds.
    ///
    /// ```
    /// use expandable_strip::px::Px;
    ///
    /// assert_eq!(Px::new(600).times(-2), Px::new(-1200));
    /// assert_eq!(Px::new(i32::MAX).times(2), Px::MAX);
    /// ```
    pub fn times(self, count: i64) -> Self {
        let product = i64::from(self.0).saturating_mul(count);
        Px(product.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
    }
}

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

impl From<i32> for Px {
    fn from(value: i32) -> Self {
        Px(value)
    }
}

impl From<Px> for i32 {
    fn from(value: Px) -> Self {
        value.0
    }
}

impl Add for Px {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Px(self.0 + rhs.0)
    }
}

impl Sub for Px {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Px(self.0 - rhs.0)
    }
}

impl Neg for Px {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Px(-self.0)
    }
}

impl Mul<i32> for Px {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self::Output {
        Px(self.0 * rhs)
    }
}

impl Div<i32> for Px {
    type Output = Self;

    fn div(self, rhs: i32) -> Self::Output {
        Px(self.0 / rhs)
    }
}

impl AddAssign for Px {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Px {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}
