use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("malformed sexagesimal value '{0}'")]
    Malformed(String),
    #[error("right ascension '{0}' is outside 0h..24h")]
    RaOutOfRange(String),
    #[error("declination '{0}' is outside -90..+90 degrees")]
    DecOutOfRange(String),
}

/// A J2000 equatorial position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkyCoord {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

impl SkyCoord {
    pub fn new(ra_deg: f64, dec_deg: f64) -> Self {
        Self { ra_deg, dec_deg }
    }
}

// Output precision of formatted seconds, in units per second.
const SUBSECOND_UNITS: i64 = 10_000;

/// Parse a right ascension given in hours (`10:00:00`, `10 00 00`,
/// `10h00m00s` or `10.0`) into degrees.
pub fn parse_ra(s: &str) -> Result<f64, CoordinateError> {
    let (negative, hours) =
        parse_sexagesimal(s).ok_or_else(|| CoordinateError::Malformed(s.to_string()))?;
    if negative || !(0.0..24.0).contains(&hours) {
        return Err(CoordinateError::RaOutOfRange(s.to_string()));
    }
    Ok(hours * 15.0)
}

/// Parse a declination given in degrees (`+20:00:00`, `-0 30 00`,
/// `20d00m00s` or `20.0`).
pub fn parse_dec(s: &str) -> Result<f64, CoordinateError> {
    let (negative, degrees) =
        parse_sexagesimal(s).ok_or_else(|| CoordinateError::Malformed(s.to_string()))?;
    if degrees > 90.0 {
        return Err(CoordinateError::DecOutOfRange(s.to_string()));
    }
    Ok(if negative { -degrees } else { degrees })
}

/// Returns the sign separately so that `-00:30:00` keeps its sign.
fn parse_sexagesimal(s: &str) -> Option<(bool, f64)> {
    let s = s.trim();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let normalised: String = rest
        .chars()
        .map(|c| match c {
            ':' | 'h' | 'd' | 'm' | 's' | '°' | '\'' | '"' => ' ',
            other => other,
        })
        .collect();
    let parts = normalised
        .split_whitespace()
        .map(|p| p.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0))
        .collect::<Option<Vec<_>>>()?;

    let value = match parts.as_slice() {
        [whole] => *whole,
        [whole, minutes] if *minutes < 60.0 => whole + minutes / 60.0,
        [whole, minutes, seconds] if *minutes < 60.0 && *seconds < 60.0 => {
            whole + minutes / 60.0 + seconds / 3600.0
        }
        _ => return None,
    };
    Some((negative, value))
}

/// Format degrees of right ascension as `hh:mm:ss.ssss`.
pub fn format_ra(ra_deg: f64) -> String {
    let day = 24 * 3600 * SUBSECOND_UNITS;
    let units = ((ra_deg / 15.0) * 3600.0 * SUBSECOND_UNITS as f64).round() as i64;
    let (h, m, s, frac) = split_units(units.rem_euclid(day));
    format!("{:02}:{:02}:{:02}.{:04}", h, m, s, frac)
}

/// Format degrees of declination as `+dd:mm:ss.ssss`.
pub fn format_dec(dec_deg: f64) -> String {
    let sign = if dec_deg < 0.0 { '-' } else { '+' };
    let units = (dec_deg.abs() * 3600.0 * SUBSECOND_UNITS as f64).round() as i64;
    let (d, m, s, frac) = split_units(units);
    format!("{}{:02}:{:02}:{:02}.{:04}", sign, d, m, s, frac)
}

fn split_units(units: i64) -> (i64, i64, i64, i64) {
    let frac = units % SUBSECOND_UNITS;
    let total_seconds = units / SUBSECOND_UNITS;
    (
        total_seconds / 3600,
        (total_seconds / 60) % 60,
        total_seconds % 60,
        frac,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn parses_colon_separated() {
        assert_abs_diff_eq!(parse_ra("10:00:00").unwrap(), 150.0);
        assert_abs_diff_eq!(parse_dec("+20:00:00").unwrap(), 20.0);
        assert_abs_diff_eq!(
            parse_ra("14:11:20.5").unwrap(),
            (14.0 + 11.0 / 60.0 + 20.5 / 3600.0) * 15.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn negative_zero_degrees_keeps_sign() {
        assert_abs_diff_eq!(parse_dec("-00:30:00").unwrap(), -0.5);
        assert_abs_diff_eq!(parse_dec("-0 30 0").unwrap(), -0.5);
    }

    #[test]
    fn parses_unit_letters_and_decimals() {
        assert_abs_diff_eq!(parse_ra("10h30m00s").unwrap(), 157.5);
        assert_abs_diff_eq!(parse_dec("52d12m").unwrap(), 52.2, epsilon = 1e-12);
        assert_abs_diff_eq!(parse_ra("10.5").unwrap(), 157.5);
        assert_abs_diff_eq!(parse_dec(" 33.5 ").unwrap(), 33.5);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            parse_ra("24:00:00"),
            Err(CoordinateError::RaOutOfRange("24:00:00".into()))
        );
        assert_eq!(
            parse_ra("-01:00:00"),
            Err(CoordinateError::RaOutOfRange("-01:00:00".into()))
        );
        assert_eq!(
            parse_dec("+91:00:00"),
            Err(CoordinateError::DecOutOfRange("+91:00:00".into()))
        );
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "abc", "12:61:00", "12:00:60", "1:2:3:4", "12:-5:00"] {
            assert_eq!(
                parse_ra(bad),
                Err(CoordinateError::Malformed(bad.into())),
                "{bad}"
            );
        }
    }

    #[test]
    fn formats_sexagesimal() {
        assert_eq!(format_ra(157.5), "10:30:00.0000");
        assert_eq!(format_ra(0.0), "00:00:00.0000");
        assert_eq!(format_dec(25.0), "+25:00:00.0000");
        assert_eq!(format_dec(-0.5), "-00:30:00.0000");
        assert_eq!(format_dec(52.202777777777), "+52:12:10.0000");
    }

    #[test]
    fn formatting_carries_rounded_seconds() {
        assert_eq!(format_ra(359.999_999_99), "00:00:00.0000");
        assert_eq!(format_dec(19.999_999_999), "+20:00:00.0000");
    }
}
