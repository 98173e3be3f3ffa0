//! Coordinate types shared across the engine.

use crate::EphemerisError;

/// Geographic coordinate, validated on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    latitude_deg: f64,
    longitude_deg: f64,
}

impl GeoCoordinate {
    /// Latitude must lie in [-90, 90], longitude in [-180, 180].
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Result<Self, EphemerisError> {
        if !latitude_deg.is_finite() || !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(EphemerisError::InvalidCoordinate(
                "latitude must be in [-90, 90]",
            ));
        }
        if !longitude_deg.is_finite() || !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(EphemerisError::InvalidCoordinate(
                "longitude must be in [-180, 180]",
            ));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
        })
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }
}

/// Geocentric ecliptic position of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticCoord {
    /// Ecliptic longitude in degrees, [0, 360).
    pub lon_deg: f64,
    /// Ecliptic latitude in degrees.
    pub lat_deg: f64,
    /// Distance from Earth's centre in kilometres.
    pub distance_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_coordinates() {
        assert!(GeoCoordinate::new(0.0, 0.0).is_ok());
        assert!(GeoCoordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(GeoCoordinate::new(91.0, 0.0).is_err());
        assert!(GeoCoordinate::new(0.0, -181.0).is_err());
        assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
    }
}
