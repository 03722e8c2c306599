//! Element types and the wider types used for split thresholds and distances.
//!
//! Every element type maps to a pair of associated types, resolved at
//! monomorphization time:
//!
//! | element      | threshold (`Disc`) | squared distance (`Dist`) |
//! |--------------|--------------------|---------------------------|
//! | `f32`        | `f32`              | `f32`                     |
//! | `f64`        | `f64`              | `f64`                     |
//! | `u8`, `i8`   | `f32`              | `u32`                     |
//! | `u16`, `i16` | `f32`              | `u64`                     |
//!
//! Narrow integer types accumulate squared distances exactly in a wider
//! integer type. That is only exact up to [`Scalar::MAX_EXACT_DIM`]
//! dimensions (66 051 for `u8`/`i8`); [`PointSet::new`](crate::PointSet::new)
//! rejects wider point sets.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

mod sealed {
    pub trait Sealed {}
}

/// Type of split thresholds and of the per-axis lower bounds pushed on the
/// search frontier.
pub trait Discriminant:
    Copy
    + Debug
    + PartialOrd
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + 'static
{
    fn zero() -> Self;

    /// Convert a sample count.
    fn from_count(n: usize) -> Self;

    /// Total order, so thresholds and bounds can live in a heap.
    fn cmp_total(&self, other: &Self) -> Ordering;
}

/// Type of squared distances reported to callers.
pub trait Distance: Copy + Debug + PartialOrd + Send + Sync + Add<Output = Self> + 'static {
    fn zero() -> Self;

    fn cmp_total(&self, other: &Self) -> Ordering;
}

/// Element type of an indexed point.
///
/// Sealed: the forest relies on `squared_distance` decomposing additively
/// per axis, which the provided implementations guarantee.
pub trait Scalar: sealed::Sealed + Copy + Debug + PartialOrd + Send + Sync + 'static {
    type Disc: Discriminant;
    type Dist: Distance;

    /// Largest dimension for which `squared_distance` cannot overflow `Dist`.
    const MAX_EXACT_DIM: usize;

    fn to_disc(self) -> Self::Disc;

    /// Squared Euclidean distance between two equal-length vectors.
    fn squared_distance(a: &[Self], b: &[Self]) -> Self::Dist;
}

macro_rules! float_scalar {
    ($($t:ty),*) => {$(
        impl Discriminant for $t {
            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn from_count(n: usize) -> Self {
                n as $t
            }

            #[inline]
            fn cmp_total(&self, other: &Self) -> Ordering {
                self.total_cmp(other)
            }
        }

        impl Distance for $t {
            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn cmp_total(&self, other: &Self) -> Ordering {
                self.total_cmp(other)
            }
        }

        impl sealed::Sealed for $t {}

        impl Scalar for $t {
            type Disc = $t;
            type Dist = $t;

            const MAX_EXACT_DIM: usize = usize::MAX;

            #[inline]
            fn to_disc(self) -> Self::Disc {
                self
            }

            #[inline]
            fn squared_distance(a: &[Self], b: &[Self]) -> Self::Dist {
                a.iter()
                    .zip(b.iter())
                    .map(|(x, y)| {
                        let d = x - y;
                        d * d
                    })
                    .sum()
            }
        }
    )*};
}

float_scalar!(f32, f64);

macro_rules! integer_distance {
    ($($t:ty),*) => {$(
        impl Distance for $t {
            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn cmp_total(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }
        }
    )*};
}

integer_distance!(u32, u64);

// $wide holds the signed difference, $dist the squared magnitude, $max_diff
// the largest per-axis gap.
macro_rules! integer_scalar {
    ($($t:ty => $wide:ty, $dist:ty, $max_diff:expr);* $(;)?) => {$(
        impl sealed::Sealed for $t {}

        impl Scalar for $t {
            type Disc = f32;
            type Dist = $dist;

            const MAX_EXACT_DIM: usize = {
                let dims = <$dist>::MAX / ($max_diff * $max_diff);
                if dims > usize::MAX as $dist {
                    usize::MAX
                } else {
                    dims as usize
                }
            };

            #[inline]
            fn to_disc(self) -> f32 {
                f32::from(self)
            }

            #[inline]
            fn squared_distance(a: &[Self], b: &[Self]) -> $dist {
                a.iter()
                    .zip(b.iter())
                    .map(|(&x, &y)| {
                        let d = <$dist>::from((<$wide>::from(x) - <$wide>::from(y)).unsigned_abs());
                        d * d
                    })
                    .sum()
            }
        }
    )*};
}

integer_scalar! {
    u8 => i32, u32, 255;
    i8 => i32, u32, 255;
    u16 => i64, u64, 65_535;
    i16 => i64, u64, 65_535;
}
