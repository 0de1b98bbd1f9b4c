//! Lens vignetting correction field
//!
//! The vignetting polynomial is stored lowest degree first without its constant term.
//! It is reversed and a constant `1.0` appended, giving
//! `p(r) = 1 + k1·r + k2·r² + …`, and every pixel is corrected by `1 / p(r)` where `r`
//! is the distance to the vignetting center.

use ndarray::Array2;
use tracing::debug;

use crate::radiometry::calibration::CameraCalibration;
use crate::radiometry::common::error::{RadiometryError, Result};

/// Per-pixel vignette correction and the coordinate grids it was computed on.
#[derive(Debug, Clone)]
pub struct VignetteMap {
    /// Multiplicative correction, `None` when the photo carries no vignetting model
    pub correction: Option<Array2<f64>>,
    /// Column index of every pixel
    pub x: Array2<f64>,
    /// Row index of every pixel
    pub y: Array2<f64>,
}

/// Column and row index grids of shape `(height, width)`.
pub fn pixel_mesh(width: usize, height: usize) -> (Array2<f64>, Array2<f64>) {
    let x = Array2::from_shape_fn((height, width), |(_, col)| col as f64);
    let y = Array2::from_shape_fn((height, width), |(row, _)| row as f64);
    (x, y)
}

/// Highest degree first, with the constant term fixed at 1.0.
pub fn augmented_polynomial(polynomial: &[f64]) -> Vec<f64> {
    let mut coeffs: Vec<f64> = polynomial.iter().rev().copied().collect();
    coeffs.push(1.0);
    coeffs
}

/// Horner evaluation, coefficients highest degree first.
#[inline]
pub fn polyval(coeffs: &[f64], r: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, &c| acc * r + c)
}

pub fn vignette_map(calibration: &CameraCalibration) -> Result<VignetteMap> {
    let (x, y) = pixel_mesh(calibration.width, calibration.height);

    let (center, polynomial) = match (
        calibration.vignetting_center,
        calibration.vignetting_polynomial.as_deref(),
    ) {
        (Some(center), Some(polynomial)) if !polynomial.is_empty() => (center, polynomial),
        _ => {
            debug!("No vignetting model, skipping vignette correction");
            return Ok(VignetteMap { correction: None, x, y });
        }
    };

    let coeffs = augmented_polynomial(polynomial);
    debug!(
        center_x = center.x,
        center_y = center.y,
        degree = coeffs.len() - 1,
        "Building vignette correction"
    );

    let mut correction = Array2::<f64>::zeros(calibration.shape());
    for ((row, col), factor) in correction.indexed_iter_mut() {
        let radius = (col as f64 - center.x).hypot(row as f64 - center.y);
        let value = polyval(&coeffs, radius);
        let inverse = 1.0 / value;
        if !(value > 0.0) || !inverse.is_finite() {
            return Err(RadiometryError::DegenerateVignettePolynomial {
                x: col,
                y: row,
                radius,
                value,
            });
        }
        *factor = inverse;
    }

    Ok(VignetteMap {
        correction: Some(correction),
        x,
        y,
    })
}
