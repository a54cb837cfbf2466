//! Sky geometry used to pick calibrators: sexagesimal coordinates, the
//! observing site and elevation angles at a given instant.

mod coords;
mod horizon;
mod site;

pub use coords::{format_dec, format_ra, parse_dec, parse_ra, CoordinateError, SkyCoord};
pub use horizon::Horizon;
pub use site::Site;

use chrono::NaiveDateTime;

/// The astronomy capabilities the schedule generator depends on. Anything
/// able to read sexagesimal strings and compute an elevation for a site can
/// stand in for [`Horizon`].
pub trait Astrometry {
    /// Parse a right ascension (hours) and declination (degrees) pair.
    fn parse_coordinate(&self, ra: &str, dec: &str) -> Result<SkyCoord, CoordinateError>;

    /// Elevation above the horizon, in degrees, of a J2000 coordinate.
    fn elevation_of(&self, coord: &SkyCoord, time: NaiveDateTime, site: &Site) -> f64;
}
