//! Rectangular grid of height samples.

use crate::error::{HeightmapError, HeightmapResult};

/// A row-major grid of finite height samples.
///
/// Sample `(x, y)` lives at `data[y * width + x]`. Values are either
/// normalized to `[0, 1]` or thickness in millimeters, depending on which
/// stage produced the field.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl HeightField {
    /// Create a field from row-major samples.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is below 2, the buffer length is
    /// not `width * height`, or any sample is not finite.
    pub fn new(width: usize, height: usize, data: Vec<f64>) -> HeightmapResult<Self> {
        if width < 2 || height < 2 {
            return Err(HeightmapError::TooSmall { width, height });
        }
        let expected = width * height;
        if data.len() != expected {
            return Err(HeightmapError::LengthMismatch {
                expected,
                got: data.len(),
            });
        }
        if let Some(index) = data.iter().position(|v| !v.is_finite()) {
            return Err(HeightmapError::NonFinite { index });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a field by evaluating `f(x, y)` at every sample.
    ///
    /// # Errors
    ///
    /// Same conditions as [`HeightField::new`].
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> HeightmapResult<Self> {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::new(width, height, data)
    }

    /// Create a field with every sample set to `value`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`HeightField::new`].
    pub fn constant(width: usize, height: usize, value: f64) -> HeightmapResult<Self> {
        Self::new(width, height, vec![value; width * height])
    }

    /// Samples along X.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Samples along Y.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// `(rows, columns)`, i.e. `(height, width)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Sample at `(x, y)`, or `None` out of bounds.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        (x < self.width && y < self.height).then(|| self.data[y * self.width + x])
    }

    /// All samples in row-major order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Consume the field, returning its samples.
    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.data
    }

    /// Smallest sample.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest sample.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Apply `f` to every sample.
    ///
    /// # Errors
    ///
    /// Returns an error if `f` produces a non-finite value.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> HeightmapResult<Self> {
        Self::new(self.width, self.height, self.data.iter().map(|&v| f(v)).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn construction_checks() {
        assert!(matches!(
            HeightField::new(1, 4, vec![0.0; 4]),
            Err(HeightmapError::TooSmall { .. })
        ));
        assert!(matches!(
            HeightField::new(2, 2, vec![0.0; 3]),
            Err(HeightmapError::LengthMismatch { expected: 4, got: 3 })
        ));
        assert!(matches!(
            HeightField::new(2, 2, vec![0.0, f64::NAN, 0.0, 0.0]),
            Err(HeightmapError::NonFinite { index: 1 })
        ));
    }

    #[test]
    fn row_major_indexing() {
        let f = HeightField::from_fn(3, 2, |x, y| (y * 10 + x) as f64).unwrap();
        assert_eq!(f.shape(), (2, 3));
        assert_relative_eq!(f.get(2, 1).unwrap(), 12.0);
        assert_eq!(f.get(3, 0), None);
        assert_relative_eq!(f.min(), 0.0);
        assert_relative_eq!(f.max(), 12.0);
    }

    #[test]
    fn map_rejects_non_finite() {
        let f = HeightField::constant(2, 2, 0.0).unwrap();
        assert!(f.map(|v| 1.0 / v).is_err());
        assert_relative_eq!(f.map(|v| v + 1.0).unwrap().max(), 1.0);
    }
}
