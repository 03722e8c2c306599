//! Borrowed, read-only view over a caller-owned point array.

use crate::error::{KdForestError, Result};
use crate::scalar::Scalar;

/// Dense row-major point set: `len() * dimension()` elements.
///
/// The forest only ever reads through this view; the data stays owned by the
/// caller for the lifetime `'a`.
#[derive(Debug, Clone, Copy)]
pub struct PointSet<'a, T> {
    data: &'a [T],
    dimension: usize,
    len: usize,
}

impl<'a, T: Scalar> PointSet<'a, T> {
    /// Wrap a flat slice of `n * dimension` elements.
    pub fn new(data: &'a [T], dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(KdForestError::InvalidParameter(
                "dimension must be greater than 0".to_string(),
            ));
        }
        if dimension > T::MAX_EXACT_DIM || u32::try_from(dimension).is_err() {
            return Err(KdForestError::InvalidParameter(format!(
                "dimension {dimension} exceeds the supported maximum of {} for this element type",
                T::MAX_EXACT_DIM.min(u32::MAX as usize)
            )));
        }
        if data.is_empty() {
            return Err(KdForestError::EmptyIndex);
        }
        if data.len() % dimension != 0 {
            return Err(KdForestError::InvalidParameter(format!(
                "data length {} is not a multiple of dimension {}",
                data.len(),
                dimension
            )));
        }
        let len = data.len() / dimension;
        if u32::try_from(len).is_err() {
            return Err(KdForestError::InvalidParameter(format!(
                "{len} points exceed the u32 id space"
            )));
        }
        Ok(Self {
            data,
            dimension,
            len,
        })
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Companion to `len` (clippy `len_without_is_empty`).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Coordinates of point `id`.
    #[inline]
    pub fn point(&self, id: u32) -> &'a [T] {
        let start = id as usize * self.dimension;
        &self.data[start..start + self.dimension]
    }

    /// Coordinate `dim` of point `id`.
    #[inline]
    pub fn value(&self, id: u32, dim: usize) -> T {
        self.data[id as usize * self.dimension + dim]
    }
}
