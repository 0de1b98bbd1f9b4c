//! DN to reflectance conversion

use ndarray::Array2;
use tracing::{debug, instrument};

use crate::radiometry::calibration::{CameraCalibration, RawSample};
use crate::radiometry::common::error::Result;
use crate::radiometry::irradiance::{SunGeometry, compute_irradiance_scale_factor};
use crate::radiometry::radiance::{dn_to_radiance, ensure_finite};

/// Estimate irradiance from the sun sensor unless the caller opts out
pub const DEFAULT_USE_SUN_SENSOR: bool = true;

/// Radiance scaled by the irradiance factor. Thermal bands stay in degrees Celsius.
#[instrument(level = "debug", skip_all, fields(band = %calibration.band, use_sun_sensor = use_sun_sensor))]
pub fn dn_to_reflectance<T: RawSample, G: SunGeometry + ?Sized>(
    calibration: &CameraCalibration,
    raw: &Array2<T>,
    use_sun_sensor: bool,
    geometry: &G,
) -> Result<Array2<f64>> {
    let radiance = dn_to_radiance(calibration, raw)?;
    let scale = compute_irradiance_scale_factor(calibration, use_sun_sensor, geometry)?;
    debug!(scale, "Applying irradiance scale factor");
    ensure_finite(radiance * scale, "reflectance conversion")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radiometry::calibration::VignettingCenter;
    use crate::radiometry::irradiance::UnavailableSunGeometry;
    use approx::assert_relative_eq;
    use ndarray::array;
    use std::f64::consts::PI;

    fn calibration() -> CameraCalibration {
        CameraCalibration::builder("RedEdge", 3, 2)
            .radiometric_coefficients(1.5, 0.001, 0.0005)
            .dark_level(64.0)
            .exposure_time(0.002)
            .gain(1.0)
            .bits_per_sample(16)
            .vignetting(VignettingCenter { x: 1.0, y: 0.5 }, vec![1e-3, -2e-5])
            .build()
    }

    #[test]
    fn test_reflectance_round_trips_to_radiance() {
        let raw = array![[1000u16, 2000, 3000], [4000, 5000, 60]];
        let mut calibration = calibration();
        calibration.irradiance = Some(0.75);

        let radiance = dn_to_radiance(&calibration, &raw).unwrap();
        let reflectance = dn_to_reflectance(&calibration, &raw, true, &UnavailableSunGeometry).unwrap();

        for (&rad, &refl) in radiance.iter().zip(reflectance.iter()) {
            assert_eq!(refl, rad * (PI / 0.75));
            assert_relative_eq!(refl * 0.75 / PI, rad, epsilon = 1e-12);
        }
        // dark pixel floored
        assert_eq!(reflectance[[1, 2]], 0.0);
    }

    #[test]
    fn test_no_irradiance_source_keeps_radiance() {
        let raw = array![[1000u16, 2000, 3000], [4000, 5000, 6000]];
        let radiance = dn_to_radiance(&calibration(), &raw).unwrap();
        let reflectance = dn_to_reflectance(&calibration(), &raw, false, &UnavailableSunGeometry).unwrap();
        assert_eq!(radiance, reflectance);
    }

    #[test]
    fn test_thermal_reflectance_is_celsius() {
        let calibration = CameraCalibration::builder("LWIR", 2, 1).irradiance(2.0).build();
        let reflectance = dn_to_reflectance(&calibration, &array![[29315u16, 27315]], true, &UnavailableSunGeometry).unwrap();
        assert_eq!(reflectance, array![[(29315.0 - 27315.0) * 0.01, 0.0]]);
    }
}
