use chrono::NaiveDateTime;

use super::catalog::{self, Calibrator};
use super::{ImagingError, ObservationRequest};
use crate::sky::{Astrometry, Site};

/// Pick the calibrator whose elevation at `time` is closest to that of the
/// first target, among those above the request's minimum elevation. Ties go
/// to the earlier catalog entry.
pub fn select_calibrator<A: Astrometry + ?Sized>(
    request: &ObservationRequest,
    time: NaiveDateTime,
    site: &Site,
    sky: &A,
) -> Result<&'static Calibrator, ImagingError> {
    let no_calibrator = || ImagingError::NoCalibratorAvailable {
        min_elevation: request.min_calibrator_elevation,
        time: time.to_string(),
    };
    let target = request.targets.first().ok_or_else(no_calibrator)?;
    let target_el = sky.elevation_of(&target.coord, time, site);
    log::debug!("{} is at {:.2} deg elevation at {}", target.label, target_el, time);

    let mut best: Option<(&'static Calibrator, f64)> = None;
    for cal in catalog::selectable() {
        let coord = match sky.parse_coordinate(cal.ra, cal.dec) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Skipping calibrator {}: {}", cal.name, e);
                continue;
            }
        };
        let el = sky.elevation_of(&coord, time, site);
        log::debug!("Calibrator {} at {:.2} deg elevation", cal.name, el);
        if el <= request.min_calibrator_elevation {
            continue;
        }

        let distance = (el - target_el).abs();
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((cal, distance));
        }
    }

    let (cal, distance) = best.ok_or_else(no_calibrator)?;
    log::info!(
        "Selected calibrator {} ({:.2} deg from {} in elevation)",
        cal.name,
        distance,
        target.label
    );
    Ok(cal)
}
