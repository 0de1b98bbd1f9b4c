//! Sun geometry capability used by the irradiance estimate

use chrono::{DateTime, Utc};

use crate::radiometry::calibration::GeoLocation;
use crate::radiometry::common::error::{RadiometryError, Result};

/// Attitude of the sun sensor, radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorPose {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// Sun position relative to the sensor. All angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunAngle {
    /// Unit vector to the sun, north-east-down
    pub sun_vector: [f64; 3],
    /// Unit vector of the sensor normal, north-east-down
    pub sensor_vector: [f64; 3],
    pub sun_sensor_angle: f64,
    pub solar_elevation: f64,
    pub solar_azimuth: f64,
}

/// Solar position model and sun-sensor angular response.
pub trait SunGeometry {
    fn sun_angle(
        &self,
        location: GeoLocation,
        pose: SensorPose,
        capture_time: DateTime<Utc>,
        orientation: [f64; 3],
    ) -> Result<SunAngle>;

    /// Angular (Fresnel) transmission correction of the sensor diffuser
    fn fresnel(&self, angle: f64) -> f64;
}

/// Geometry for builds without a solar position model. Every estimate fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSunGeometry;

impl SunGeometry for UnavailableSunGeometry {
    fn sun_angle(
        &self,
        _location: GeoLocation,
        _pose: SensorPose,
        _capture_time: DateTime<Utc>,
        _orientation: [f64; 3],
    ) -> Result<SunAngle> {
        Err(RadiometryError::SunGeometryUnavailable(
            "no solar position model configured".to_string(),
        ))
    }

    fn fresnel(&self, _angle: f64) -> f64 {
        1.0
    }
}

/// Precomputed geometry, e.g. from an external ephemeris run for the whole flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSunGeometry {
    pub angle: SunAngle,
    pub fresnel: f64,
}

impl SunGeometry for FixedSunGeometry {
    fn sun_angle(
        &self,
        _location: GeoLocation,
        _pose: SensorPose,
        _capture_time: DateTime<Utc>,
        _orientation: [f64; 3],
    ) -> Result<SunAngle> {
        Ok(self.angle)
    }

    fn fresnel(&self, _angle: f64) -> f64 {
        self.fresnel
    }
}
