//! Radiance to reflectance scale factor
//!
//! The factor is `π / E` for the horizontal irradiance `E`, taken from the photo
//! metadata when measured, or estimated from the sun sensor reading and the sun
//! position. Thermal bands and photos without any irradiance source get 1.0.

mod sun_geometry;

use std::f64::consts::PI;

use tracing::{debug, warn};

use crate::radiometry::calibration::CameraCalibration;
use crate::radiometry::common::error::{RadiometryError, Result};

pub use sun_geometry::{FixedSunGeometry, SensorPose, SunAngle, SunGeometry, UnavailableSunGeometry};

/// Assumed ratio of direct to diffuse irradiance
pub const DIRECT_TO_DIFFUSE_RATIO: f64 = 6.0;

/// Sun sensor normal, pointing down in the north-east-down frame
pub const SENSOR_ORIENTATION: [f64; 3] = [0.0, 0.0, -1.0];

pub fn compute_irradiance_scale_factor<G: SunGeometry + ?Sized>(
    calibration: &CameraCalibration,
    use_sun_sensor: bool,
    geometry: &G,
) -> Result<f64> {
    if calibration.is_thermal() {
        return Ok(1.0);
    }

    if let Some(irradiance) = calibration.irradiance {
        debug!(irradiance, "Using measured horizontal irradiance");
        return scale_from_horizontal(irradiance);
    }

    if use_sun_sensor {
        if let Some(irradiance) = estimate_horizontal_irradiance(calibration, geometry)? {
            debug!(irradiance, "Estimated horizontal irradiance from sun sensor");
            return scale_from_horizontal(irradiance);
        }
    }

    Ok(1.0)
}

/// Horizontal irradiance from the sun sensor reading, `None` when the photo lacks
/// the reading, the location or the capture time.
pub fn estimate_horizontal_irradiance<G: SunGeometry + ?Sized>(
    calibration: &CameraCalibration,
    geometry: &G,
) -> Result<Option<f64>> {
    let (Some(spectral_irradiance), Some(location), Some(capture_time)) = (
        calibration.sun_sensor,
        calibration.location,
        calibration.capture_time,
    ) else {
        warn!(
            band = %calibration.band,
            has_sun_sensor = calibration.sun_sensor.is_some(),
            has_location = calibration.location.is_some(),
            has_capture_time = calibration.capture_time.is_some(),
            "Cannot estimate irradiance, leaving values in radiance units"
        );
        return Ok(None);
    };

    // Sensor attitude is not tracked per photo yet
    let angle = geometry.sun_angle(location, SensorPose::default(), capture_time, SENSOR_ORIENTATION)?;

    if !(angle.solar_elevation > 0.0) {
        return Err(RadiometryError::SolarElevationBelowHorizon(angle.solar_elevation));
    }

    let angular_correction = geometry.fresnel(angle.sun_sensor_angle);

    let percent_diffuse = 1.0 / DIRECT_TO_DIFFUSE_RATIO;
    let sensor_irradiance = spectral_irradiance / angular_correction;

    // direct irradiance in the plane normal to the sun
    let untilted_direct = sensor_irradiance / (percent_diffuse + angle.sun_sensor_angle.cos());
    let direct_irradiance = untilted_direct;
    let scattered_irradiance = untilted_direct * percent_diffuse;

    Ok(Some(direct_irradiance * angle.solar_elevation.sin() + scattered_irradiance))
}

fn scale_from_horizontal(irradiance: f64) -> Result<f64> {
    if !(irradiance > 0.0) || !irradiance.is_finite() {
        return Err(RadiometryError::InvalidIrradiance(irradiance));
    }
    Ok(PI / irradiance)
}
