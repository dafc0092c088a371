//! Geometric primitives for visualization.
//!
//! Provides fixed-size numeric vectors and axis-aligned bounding boxes. Every
//! data-to-pixel conversion in the crate goes through [`BBox::to_coords`] or
//! [`remap`], so conversions in both directions share one formula.

use num_traits::{Float, Num};
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub, SubAssign};

/// A fixed-length numeric tuple with element-wise arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<T, const N: usize>(pub [T; N]);

/// Two-dimensional `f32` vector, the workhorse for pixel coordinates.
pub type Vec2 = Vector<f32, 2>;

/// Two-dimensional `f32` bounding box.
pub type BBox2 = BBox<f32, 2>;

impl<T: Copy, const N: usize> Vector<T, N> {
    /// Create a vector from an array.
    #[must_use]
    pub const fn new(values: [T; N]) -> Self {
        Self(values)
    }

    /// Create a vector with every element set to `value`.
    #[must_use]
    pub fn splat(value: T) -> Self {
        Self([value; N])
    }

    /// Borrow the underlying array.
    #[must_use]
    pub const fn as_array(&self) -> &[T; N] {
        &self.0
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.0.iter().copied()
    }

    /// Apply `f` to every element.
    #[must_use]
    pub fn map<F: Fn(T) -> T>(self, f: F) -> Self {
        Self(std::array::from_fn(|i| f(self.0[i])))
    }

    /// Combine two vectors element-wise.
    #[must_use]
    pub fn zip_with<F: Fn(T, T) -> T>(self, other: Self, f: F) -> Self {
        Self(std::array::from_fn(|i| f(self.0[i], other.0[i])))
    }
}

impl Vec2 {
    /// Create a 2D vector.
    #[must_use]
    pub const fn xy(x: f32, y: f32) -> Self {
        Self([x, y])
    }

    /// X component.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.0[0]
    }

    /// Y component.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.0[1]
    }
}

impl<T: Num + Copy, const N: usize> Vector<T, N> {
    /// The zero vector.
    #[must_use]
    pub fn zero() -> Self {
        Self::splat(T::zero())
    }
}

impl<T: PartialOrd + Copy, const N: usize> Vector<T, N> {
    /// Element-wise minimum.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        self.zip_with(other, |a, b| if b < a { b } else { a })
    }

    /// Element-wise maximum.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        self.zip_with(other, |a, b| if b > a { b } else { a })
    }

    /// True when every element is `<=` the matching element of `other`.
    #[must_use]
    pub fn all_le(&self, other: &Self) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b)
    }

    /// True when any element is `<` the matching element of `other`.
    #[must_use]
    pub fn any_lt(&self, other: &Self) -> bool {
        self.0.iter().zip(other.0.iter()).any(|(a, b)| a < b)
    }
}

impl<T: Float, const N: usize> Vector<T, N> {
    /// Dot product.
    #[must_use]
    pub fn dot(&self, other: &Self) -> T {
        self.0.iter().zip(other.0.iter()).fold(T::zero(), |acc, (&a, &b)| acc + a * b)
    }

    /// Euclidean length.
    #[must_use]
    pub fn norm(&self) -> T {
        self.dot(self).sqrt()
    }

    /// Distance to another vector.
    #[must_use]
    pub fn distance(&self, other: &Self) -> T {
        (*self - *other).norm()
    }

    /// Linear interpolation, `t = 0` gives `self`.
    #[must_use]
    pub fn lerp(self, other: Self, t: T) -> Self {
        self.zip_with(other, |a, b| a + (b - a) * t)
    }

    /// Element-wise floor.
    #[must_use]
    pub fn floor(self) -> Self {
        self.map(Float::floor)
    }

    /// Element-wise ceiling.
    #[must_use]
    pub fn ceil(self) -> Self {
        self.map(Float::ceil)
    }

    /// True when every element is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.0[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.0[index]
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T, N> {
    fn from(values: [T; N]) -> Self {
        Self(values)
    }
}

macro_rules! elementwise_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl<T: Num + Copy, const N: usize> $trait for Vector<T, N> {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                self.zip_with(rhs, |a, b| a $op b)
            }
        }

        impl<T: Num + Copy, const N: usize> $assign_trait for Vector<T, N> {
            fn $assign_method(&mut self, rhs: Self) {
                *self = self.zip_with(rhs, |a, b| a $op b);
            }
        }
    };
}

elementwise_op!(Add, add, AddAssign, add_assign, +);
elementwise_op!(Sub, sub, SubAssign, sub_assign, -);

impl<T: Num + Copy, const N: usize> Mul for Vector<T, N> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a * b)
    }
}

impl<T: Num + Copy, const N: usize> Div for Vector<T, N> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a / b)
    }
}

impl<T: Neg<Output = T> + Copy, const N: usize> Neg for Vector<T, N> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|a| -a)
    }
}

macro_rules! scalar_ops {
    ($($t:ty),*) => {$(
        impl<const N: usize> Mul<$t> for Vector<$t, N> {
            type Output = Self;

            fn mul(self, rhs: $t) -> Self {
                self.map(|a| a * rhs)
            }
        }

        impl<const N: usize> Div<$t> for Vector<$t, N> {
            type Output = Self;

            fn div(self, rhs: $t) -> Self {
                self.map(|a| a / rhs)
            }
        }
    )*};
}

scalar_ops!(f32, f64);

/// Linearly remap `value` from the interval `from` onto the interval `to`.
#[must_use]
pub fn remap<T: Float>(value: T, from: (T, T), to: (T, T)) -> T {
    let t = (value - from.0) / (from.1 - from.0);
    to.0 + t * (to.1 - to.0)
}

/// An axis-aligned bounding box.
///
/// The default value is the empty box, whose `bmin` is `+max` and `bmax` is
/// `-max`, so that the union with any real box yields that box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox<T, const N: usize> {
    /// Minimum corner.
    pub bmin: Vector<T, N>,
    /// Maximum corner.
    pub bmax: Vector<T, N>,
}

impl<T: Float, const N: usize> Default for BBox<T, N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Float, const N: usize> BBox<T, N> {
    /// Create a box from two corners.
    #[must_use]
    pub const fn new(bmin: Vector<T, N>, bmax: Vector<T, N>) -> Self {
        Self { bmin, bmax }
    }

    /// The empty box sentinel.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bmin: Vector::splat(T::max_value()),
            bmax: Vector::splat(-T::max_value()),
        }
    }

    /// The unit box `[0, 1]^N`.
    #[must_use]
    pub fn unit() -> Self {
        Self {
            bmin: Vector::splat(T::zero()),
            bmax: Vector::splat(T::one()),
        }
    }

    /// True when any axis has `bmax < bmin + 3·epsilon`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let tol = T::epsilon() * (T::one() + T::one() + T::one());
        (0..N).any(|i| self.bmax[i] < self.bmin[i] + tol)
    }

    /// True when axis `i` still holds the empty sentinel (never accumulated).
    #[must_use]
    pub fn is_unset(&self, i: usize) -> bool {
        self.bmax[i] < self.bmin[i]
    }

    /// Extent along each axis.
    #[must_use]
    pub fn delta(&self) -> Vector<T, N> {
        self.bmax - self.bmin
    }

    /// Centre point.
    #[must_use]
    pub fn centre(&self) -> Vector<T, N> {
        let two = T::one() + T::one();
        self.bmin.zip_with(self.bmax, |a, b| (a + b) / two)
    }

    /// Grow the box to include `point`.
    pub fn extend(&mut self, point: &Vector<T, N>) {
        self.bmin = self.bmin.min(*point);
        self.bmax = self.bmax.max(*point);
    }

    /// Translate the box by `offset`.
    #[must_use]
    pub fn translate(&self, offset: &Vector<T, N>) -> Self {
        Self {
            bmin: self.bmin + *offset,
            bmax: self.bmax + *offset,
        }
    }

    /// Scale the box symmetrically about its centre.
    ///
    /// Axes still holding the empty sentinel are left untouched.
    #[must_use]
    pub fn scaled(&self, factor: T) -> Self {
        let two = T::one() + T::one();
        let mut out = *self;
        for i in 0..N {
            if self.is_unset(i) {
                continue;
            }
            let centre = (self.bmin[i] + self.bmax[i]) / two;
            let half = (self.bmax[i] - self.bmin[i]) * factor / two;
            out.bmin[i] = centre - half;
            out.bmax[i] = centre + half;
        }
        out
    }

    /// True when `point` lies inside the closed box.
    #[must_use]
    pub fn contains(&self, point: &Vector<T, N>) -> bool {
        self.bmin.all_le(point) && point.all_le(&self.bmax)
    }

    /// Remap `point` from this box's frame into `other`'s frame.
    ///
    /// With `flip_y`, axis 1 is inverted so that data-space y (growing upward)
    /// maps onto pixel-space y (growing downward).
    #[must_use]
    pub fn to_coords(&self, point: &Vector<T, N>, other: &Self, flip_y: bool) -> Vector<T, N> {
        Vector(std::array::from_fn(|i| {
            let target = if flip_y && i == 1 {
                (other.bmax[i], other.bmin[i])
            } else {
                (other.bmin[i], other.bmax[i])
            };
            remap(point[i], (self.bmin[i], self.bmax[i]), target)
        }))
    }
}

impl<T: Float, const N: usize> AddAssign for BBox<T, N> {
    fn add_assign(&mut self, rhs: Self) {
        self.bmin = self.bmin.min(rhs.bmin);
        self.bmax = self.bmax.max(rhs.bmax);
    }
}

impl<T: Float, const N: usize> Add for BBox<T, N> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl BBox2 {
    /// Create a 2D box from `(x, y)` corners.
    #[must_use]
    pub const fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(Vec2::xy(x0, y0), Vec2::xy(x1, y1))
    }

    /// Width of the box.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.bmax[0] - self.bmin[0]
    }

    /// Height of the box.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bmax[1] - self.bmin[1]
    }
}
