use chrono::NaiveDateTime;
use hifitime::{Duration, Epoch};
use marlu::{constants::DAYSEC, precession::precess_time, RADec};

use super::{parse_dec, parse_ra, Astrometry, CoordinateError, Site, SkyCoord};

const UNIX_EPOCH_MJD: f64 = 40_587.0;

/// Atmosphere assumed for refraction, matching the usual observatory
/// defaults of 1010 mbar at 15 degrees C.
const PRESSURE_MBAR: f64 = 1010.0;
const TEMPERATURE_C: f64 = 15.0;

/// Sky positions through `marlu`: J2000 coordinates are compared against
/// the site's zenith precessed to J2000, then refracted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Horizon;

impl Astrometry for Horizon {
    fn parse_coordinate(&self, ra: &str, dec: &str) -> Result<SkyCoord, CoordinateError> {
        Ok(SkyCoord::new(parse_ra(ra)?, parse_dec(dec)?))
    }

    fn elevation_of(&self, coord: &SkyCoord, time: NaiveDateTime, site: &Site) -> f64 {
        apparent_elevation(geometric_elevation(coord, time, site))
    }
}

/// A UTC timestamp as a `hifitime` epoch.
pub fn epoch_of(time: NaiveDateTime) -> Epoch {
    let utc = time.and_utc();
    let seconds = utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9;
    Epoch::from_mjd_utc(UNIX_EPOCH_MJD + seconds / DAYSEC)
}

/// Elevation in degrees of a J2000 position, without refraction.
pub fn geometric_elevation(coord: &SkyCoord, time: NaiveDateTime, site: &Site) -> f64 {
    let radec = RADec::from_degrees(coord.ra_deg, coord.dec_deg);
    let precession = precess_time(
        site.lon_rad(),
        site.lat_rad(),
        radec,
        epoch_of(time),
        Duration::from_seconds(0.0),
    );
    let azel = radec
        .to_hadec(precession.lmst_j2000)
        .to_azel(precession.array_latitude_j2000);
    log::trace!(
        "LMST {:.4} deg, az {:.4} deg, el {:.4} deg",
        precession.lmst.to_degrees(),
        azel.az.to_degrees(),
        azel.el.to_degrees()
    );
    azel.el.to_degrees()
}

/// Apparent elevation after atmospheric refraction (Saemundsson), scaled
/// for pressure and temperature. Sources well below the horizon are left
/// alone.
pub fn apparent_elevation(geometric_deg: f64) -> f64 {
    if geometric_deg < -1.0 {
        return geometric_deg;
    }
    let refraction_arcmin =
        1.02 / (geometric_deg + 10.3 / (geometric_deg + 5.11)).to_radians().tan();
    let scale = (PRESSURE_MBAR / 1010.0) * (283.0 / (273.0 + TEMPERATURE_C));
    geometric_deg + refraction_arcmin * scale / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn coord(ra: &str, dec: &str) -> SkyCoord {
        Horizon.parse_coordinate(ra, dec).unwrap()
    }

    #[test]
    fn epoch_matches_known_mjd() {
        assert_abs_diff_eq!(
            epoch_of(at(1970, 1, 1, 0, 0, 0)).to_mjd_utc_days(),
            40_587.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            epoch_of(at(2000, 1, 1, 12, 0, 0)).to_mjd_utc_days(),
            51_544.5,
            epsilon = 1e-9
        );
    }

    // Reference elevations at the LOFAR core, 2024-03-01 20:00:00 UTC, from
    // IAU 1976 precession and IAU 2006 sidereal time.
    #[test]
    fn calibrator_elevations_at_lofar() {
        let time = at(2024, 3, 1, 20, 0, 0);
        let site = Site::default();

        for (ra, dec, expected) in [
            ("08:13:36.0", "48:13:03", 78.308),
            ("14:11:20.5", "52:12:10", 31.793),
            ("18:29:31.8", "48:44:46", 11.994),
        ] {
            assert_abs_diff_eq!(
                geometric_elevation(&coord(ra, dec), time, &site),
                expected,
                epsilon = 0.1
            );
        }

        assert_abs_diff_eq!(
            Horizon.elevation_of(&coord("18:29:31.8", "48:44:46"), time, &site),
            12.069,
            epsilon = 0.1
        );
    }

    #[test]
    fn celestial_pole_sits_at_latitude() {
        // At J2000 only nutation separates the pole from the site latitude.
        let site = Site::default();
        let el = geometric_elevation(&SkyCoord::new(0.0, 90.0), at(2000, 1, 1, 12, 0, 0), &site);
        assert_abs_diff_eq!(el, site.latitude_deg, epsilon = 0.01);
    }

    #[test]
    fn refraction_lifts_low_sources() {
        assert_abs_diff_eq!(apparent_elevation(0.0), 0.4746, epsilon = 1e-3);
        assert_abs_diff_eq!(apparent_elevation(30.0), 30.0286, epsilon = 1e-3);
        assert_abs_diff_eq!(apparent_elevation(90.0), 90.0, epsilon = 1e-4);
        assert_eq!(apparent_elevation(-20.0), -20.0);
    }

    #[test]
    fn horizon_parses_and_computes() {
        let horizon = Horizon;
        let parsed = horizon.parse_coordinate("10:00:00", "+20:00:00").unwrap();
        assert_eq!(parsed, SkyCoord::new(150.0, 20.0));
        assert!(horizon.parse_coordinate("10:00:00", "nope").is_err());

        let el = horizon.elevation_of(&parsed, at(2024, 3, 1, 22, 0, 0), &Site::default());
        assert!((-90.0..=90.0).contains(&el));
    }
}
