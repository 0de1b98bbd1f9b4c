//! DN to radiance conversion
//!
//! Order of the general path matters and is fixed:
//! dark level, vignette, row gradient, negative floor (dark level only),
//! gain × exposure, `a1`, bit depth. Thermal bands skip all of it and are
//! converted from centikelvin to degrees Celsius.

use ndarray::Array2;
use tracing::{debug, instrument};

use crate::radiometry::calibration::{CameraCalibration, RawSample};
use crate::radiometry::common::error::{RadiometryError, Result};
use crate::radiometry::vignette::{VignetteMap, vignette_map};

/// 273.15 K in hundredths of a kelvin
pub const THERMAL_OFFSET: f64 = 27315.0;
pub const THERMAL_SCALE: f64 = 0.01;

#[instrument(level = "debug", skip_all, fields(band = %calibration.band))]
pub fn dn_to_radiance<T: RawSample>(
    calibration: &CameraCalibration,
    raw: &Array2<T>,
) -> Result<Array2<f64>> {
    check_shape(calibration, raw.dim())?;

    if calibration.is_thermal() {
        debug!("Thermal band, converting centikelvin to Celsius");
        return ensure_finite(thermal_to_celsius(raw), "thermal conversion");
    }

    let (a1, a2, a3) = calibration.radiometric_coefficients();
    let dark_level = calibration.dark_level;
    let exposure_time = calibration.effective_exposure_time();
    let gain = calibration.gain;

    // A zero exposure only disables the row gradient; as a gain divisor it is an error
    if let (Some(_), Some(exposure_time)) = (gain, calibration.exposure_time) {
        if !(exposure_time > 0.0) {
            return Err(RadiometryError::InvalidCalibration(format!(
                "exposure time {exposure_time} s cannot scale the gain"
            )));
        }
    }

    let VignetteMap { correction, y, .. } = vignette_map(calibration)?;

    let mut image = raw.mapv(RawSample::to_f64);

    if let Some(dark_level) = dark_level {
        debug!(dark_level, "Subtracting dark level");
        image = subtract_dark_level(image, dark_level);
    }

    if let Some(correction) = &correction {
        debug!("Applying vignette correction");
        image = apply_vignette(image, correction);
    }

    if let (Some(exposure_time), Some(a2), Some(a3)) = (exposure_time, a2, a3) {
        debug!(a2, a3, exposure_time, "Applying row gradient correction");
        image = image * &row_gradient(&y, a2, a3, exposure_time);
    }

    // Noise around the black level can push pixels below zero
    if dark_level.is_some() {
        image = floor_negative(image);
    }

    let divisor = bit_depth_divisor::<T>(calibration.bits_per_sample);

    if let (Some(gain), Some(exposure_time)) = (gain, exposure_time) {
        debug!(gain, exposure_time, "Scaling by gain-exposure product");
        image = apply_gain_exposure(image, gain, exposure_time);
    }

    if let Some(a1) = a1 {
        image = apply_a1(image, a1);
    }

    debug!(divisor, "Normalizing by bit depth");
    image.mapv_inplace(|v| v / divisor);

    ensure_finite(image, "radiance conversion")
}

pub fn thermal_to_celsius<T: RawSample>(raw: &Array2<T>) -> Array2<f64> {
    raw.mapv(|v| (v.to_f64() - THERMAL_OFFSET) * THERMAL_SCALE)
}

pub fn subtract_dark_level(image: Array2<f64>, dark_level: f64) -> Array2<f64> {
    image - dark_level
}

pub fn apply_vignette(image: Array2<f64>, correction: &Array2<f64>) -> Array2<f64> {
    image * correction
}

/// `1 / (1 + a2·y/t − a3·y)` for every pixel of the row index grid `y`.
pub fn row_gradient(y: &Array2<f64>, a2: f64, a3: f64, exposure_time: f64) -> Array2<f64> {
    y.mapv(|row| 1.0 / (1.0 + a2 * row / exposure_time - a3 * row))
}

pub fn floor_negative(image: Array2<f64>) -> Array2<f64> {
    image.mapv_into(|v| if v < 0.0 { 0.0 } else { v })
}

/// `2^bits` when the sensor bit depth is known, else the range of the storage type.
pub fn bit_depth_divisor<T: RawSample>(bits_per_sample: Option<u32>) -> f64 {
    match bits_per_sample {
        Some(bits) => 2f64.powi(bits as i32),
        None => T::RANGE,
    }
}

pub fn apply_gain_exposure(image: Array2<f64>, gain: f64, exposure_time: f64) -> Array2<f64> {
    image / (gain * exposure_time)
}

pub fn apply_a1(image: Array2<f64>, a1: f64) -> Array2<f64> {
    image * a1
}

pub(crate) fn check_shape(calibration: &CameraCalibration, actual: (usize, usize)) -> Result<()> {
    let expected = calibration.shape();
    if actual != expected {
        return Err(RadiometryError::ShapeMismatch { expected, actual });
    }
    Ok(())
}

pub(crate) fn ensure_finite(image: Array2<f64>, stage: &'static str) -> Result<Array2<f64>> {
    let count = image.iter().filter(|v| !v.is_finite()).count();
    if count > 0 {
        return Err(RadiometryError::NonFiniteOutput { stage, count });
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radiometry::calibration::VignettingCenter;
    use approx::assert_relative_eq;
    use ndarray::array;

    const EPS: f64 = 1e-12;

    fn full_calibration() -> CameraCalibration {
        CameraCalibration::builder("Green", 3, 3)
            .radiometric_coefficients(2.0, 0.01, 0.005)
            .dark_level(100.0)
            .exposure_time(0.5)
            .gain(4.0)
            .bits_per_sample(12)
            .vignetting(VignettingCenter { x: 1.0, y: 1.0 }, vec![0.1])
            .build()
    }

    fn raw() -> Array2<u16> {
        array![[1100, 1200, 1300], [1400, 1500, 1600], [1700, 1800, 1900]]
    }

    fn expected_full(dn: f64, row: f64, col: f64) -> f64 {
        let radius = (col - 1.0_f64).hypot(row - 1.0);
        let vignette = 1.0 / (0.1 * radius + 1.0);
        let gradient = 1.0 / (1.0 + 0.01 * row / 0.5 - 0.005 * row);
        let corrected = ((dn - 100.0) * vignette * gradient).max(0.0);
        corrected / (4.0 * 0.5) * 2.0 / 4096.0
    }

    #[test]
    fn test_full_conversion() {
        let radiance = dn_to_radiance(&full_calibration(), &raw()).unwrap();

        for ((row, col), &value) in radiance.indexed_iter() {
            let dn = raw()[[row, col]] as f64;
            assert_relative_eq!(value, expected_full(dn, row as f64, col as f64), epsilon = EPS);
        }
    }

    #[test]
    fn test_dark_frame_is_zero() {
        let calibration = CameraCalibration::builder("Blue", 4, 2)
            .dark_level(4096.0)
            .bits_per_sample(16)
            .build();
        let raw = Array2::<u16>::from_elem((2, 4), 4096);

        let radiance = dn_to_radiance(&calibration, &raw).unwrap();
        assert!(radiance.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_thermal_conversion() {
        let calibration = CameraCalibration::builder("LWIR", 2, 1)
            .radiometric_coefficients(2.0, 0.1, 0.1)
            .dark_level(50.0)
            .gain(3.0)
            .exposure_time(0.01)
            .bits_per_sample(14)
            .build();
        let raw = array![[27315u16, 30315]];

        let celsius = dn_to_radiance(&calibration, &raw).unwrap();
        assert_eq!(celsius[[0, 0]], 0.0);
        assert_eq!(celsius[[0, 1]], (30315.0 - 27315.0) * 0.01);
    }

    #[test]
    fn test_row_gradient_identity_at_first_row() {
        let (_, y) = crate::radiometry::vignette::pixel_mesh(2, 5);
        let gradient = row_gradient(&y, 0.02, 0.01, 0.25);

        assert_eq!(gradient[[0, 0]], 1.0);
        assert_eq!(gradient[[0, 1]], 1.0);
        for row in 1..5 {
            assert!(gradient[[row, 0]] < gradient[[row - 1, 0]]);
            assert_eq!(gradient[[row, 0]], gradient[[row, 1]]);
        }
    }

    #[test]
    fn test_corrections_compose_independently() {
        let full = dn_to_radiance(&full_calibration(), &raw()).unwrap();

        // no gain: only the gain-exposure term disappears
        let mut calibration = full_calibration();
        calibration.gain = None;
        let without_gain = dn_to_radiance(&calibration, &raw()).unwrap();
        for (a, b) in full.iter().zip(without_gain.iter()) {
            assert_relative_eq!(b / 2.0, *a, epsilon = EPS);
        }

        // no a1: only the coefficient scale disappears
        let mut calibration = full_calibration();
        calibration.a1 = None;
        let without_a1 = dn_to_radiance(&calibration, &raw()).unwrap();
        for (a, b) in full.iter().zip(without_a1.iter()) {
            assert_relative_eq!(b * 2.0, *a, epsilon = EPS);
        }

        // no vignetting: the remaining terms still apply
        let mut calibration = full_calibration();
        calibration.vignetting_polynomial = None;
        let without_vignette = dn_to_radiance(&calibration, &raw()).unwrap();
        for ((row, col), &value) in without_vignette.indexed_iter() {
            let radius = (col as f64 - 1.0).hypot(row as f64 - 1.0);
            let vignette = 1.0 / (0.1 * radius + 1.0);
            assert_relative_eq!(value * vignette, full[[row, col]], epsilon = EPS);
        }

        // no dark level: the other terms still apply to the full DN
        let mut calibration = full_calibration();
        calibration.dark_level = None;
        let without_dark = dn_to_radiance(&calibration, &raw()).unwrap();
        for ((row, col), &value) in without_dark.indexed_iter() {
            let dn = raw()[[row, col]] as f64;
            let expected = expected_full(dn + 100.0, row as f64, col as f64);
            assert_relative_eq!(value, expected, epsilon = EPS);
        }
    }

    #[test]
    fn test_row_gradient_needs_exposure() {
        let mut calibration = full_calibration();
        calibration.exposure_time = None;
        calibration.vignetting_polynomial = None;
        let radiance = dn_to_radiance(&calibration, &raw()).unwrap();

        // no gradient and no gain-exposure scaling
        assert_relative_eq!(radiance[[2, 0]], (1700.0 - 100.0) * 2.0 / 4096.0, epsilon = EPS);
    }

    #[test]
    fn test_negative_floor_only_with_dark_level() {
        let raw = array![[10u8, 10], [10, 10], [10, 10]];

        // a3 = 0.75 turns the row gradient negative from row 2 on
        let without_dark = CameraCalibration::builder("Red", 2, 3)
            .radiometric_coefficients(1.0, 0.0, 0.75)
            .exposure_time(1.0)
            .build();
        let radiance = dn_to_radiance(&without_dark, &raw).unwrap();
        assert_relative_eq!(radiance[[2, 0]], 10.0 * (1.0 / (1.0 - 0.75 * 2.0)) / 255.0, epsilon = EPS);
        assert!(radiance[[2, 0]] < 0.0);

        let mut with_dark = without_dark.clone();
        with_dark.dark_level = Some(0.0);
        let radiance = dn_to_radiance(&with_dark, &raw).unwrap();
        assert_eq!(radiance[[2, 0]], 0.0);
        assert!(radiance.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_bit_depth_fallback() {
        assert_eq!(bit_depth_divisor::<u16>(Some(12)), 4096.0);
        assert_eq!(bit_depth_divisor::<u16>(None), 65535.0);
        assert_eq!(bit_depth_divisor::<u8>(None), 255.0);

        let calibration = CameraCalibration::builder("Nir", 1, 1).build();
        let radiance = dn_to_radiance(&calibration, &array![[65535u16]]).unwrap();
        assert_eq!(radiance[[0, 0]], 1.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let calibration = CameraCalibration::builder("Red", 4, 4).build();
        let result = dn_to_radiance(&calibration, &Array2::<u16>::zeros((4, 3)));

        assert!(matches!(
            result,
            Err(RadiometryError::ShapeMismatch { expected: (4, 4), actual: (4, 3) })
        ));
    }

    #[test]
    fn test_zero_exposure_with_gain_is_rejected() {
        for exposure_time in [0.0, -0.01] {
            let calibration = CameraCalibration::builder("Red", 2, 1)
                .gain(2.0)
                .exposure_time(exposure_time)
                .bits_per_sample(16)
                .build();
            let result = dn_to_radiance(&calibration, &array![[100u16, 200]]);

            assert!(matches!(result, Err(RadiometryError::InvalidCalibration(_))));
        }
    }

    #[test]
    fn test_zero_exposure_skips_row_gradient() {
        let calibration = CameraCalibration::builder("Red", 1, 3)
            .radiometric_coefficients(1.0, 0.5, 0.1)
            .exposure_time(0.0)
            .bits_per_sample(8)
            .build();
        let radiance = dn_to_radiance(&calibration, &array![[128u8], [128], [128]]).unwrap();

        assert!(radiance.iter().all(|&v| v == 0.5));
    }

    #[test]
    fn test_zero_gain_is_reported() {
        let calibration = CameraCalibration::builder("Red", 2, 1)
            .gain(0.0)
            .exposure_time(0.01)
            .build();
        let result = dn_to_radiance(&calibration, &array![[5u16, 0]]);

        assert!(matches!(result, Err(RadiometryError::NonFiniteOutput { count: 2, .. })));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let raw = raw();
        let before = raw.clone();
        dn_to_radiance(&full_calibration(), &raw).unwrap();
        assert_eq!(raw, before);
    }
}
