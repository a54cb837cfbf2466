use serde::Serialize;

/// LOFAR core position, as used by the LOFAR source visibility calculator.
pub const LOFAR_CORE_LATITUDE_DEG: f64 = 52.915129;
pub const LOFAR_CORE_LONGITUDE_DEG: f64 = 6.869882;
pub const LOFAR_CORE_ALTITUDE_M: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Site {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            latitude_deg: LOFAR_CORE_LATITUDE_DEG,
            longitude_deg: LOFAR_CORE_LONGITUDE_DEG,
            altitude_m: LOFAR_CORE_ALTITUDE_M,
        }
    }
}

impl Site {
    /// Parse a `"lat, lon"` pair in degrees. Returns `None` for anything
    /// that is not two numbers inside the valid ranges.
    pub fn from_coordinates(coordinates: &str, altitude_m: Option<f64>) -> Option<Self> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return None;
        }
        let lat: f64 = parts[0].parse().ok()?;
        let lon: f64 = parts[1].parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=360.0).contains(&lon) {
            return None;
        }
        Some(Self {
            latitude_deg: lat,
            longitude_deg: lon,
            altitude_m: altitude_m.unwrap_or(0.0),
        })
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }
}
