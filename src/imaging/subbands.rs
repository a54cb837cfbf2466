use serde::Serialize;
use strum_macros::{Display, EnumIter};

use super::ImagingError;

/// Receiver band selected by the instrument filter. Each band has a fixed
/// usable subband window and station clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize)]
pub enum Band {
    #[strum(serialize = "30-90 MHz")]
    Lba30To90,
    #[strum(serialize = "170-230 MHz")]
    Hba170To230,
    #[strum(serialize = "HBA default")]
    HbaDefault,
}

impl Band {
    pub fn from_filter(filter: &str) -> Self {
        match filter {
            "30-90 MHz" => Band::Lba30To90,
            "170-230 MHz" => Band::Hba170To230,
            _ => Band::HbaDefault,
        }
    }

    /// Inclusive range of valid subband indices.
    pub fn subband_bounds(&self) -> (i64, i64) {
        match self {
            Band::Lba30To90 => (154, 461),
            Band::Hba170To230 => (64, 448),
            Band::HbaDefault => (51, 461),
        }
    }

    pub fn clock(&self) -> &'static str {
        match self {
            Band::Hba170To230 => "160 MHz",
            Band::Lba30To90 | Band::HbaDefault => "200 MHz",
        }
    }
}

/// The instrument filter as typed, plus the band it maps to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyMode {
    pub filter: String,
    pub band: Band,
}

impl FrequencyMode {
    pub fn new(filter: &str) -> Self {
        Self {
            filter: filter.to_string(),
            band: Band::from_filter(filter),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubbandSpec {
    /// The list as typed; written verbatim to `Global_Subbands`.
    pub raw: String,
    pub count: usize,
}

impl SubbandSpec {
    /// Parse a list such as `"77..456"` or `"100,120,150..200"`.
    pub fn parse(raw: &str, mode: &FrequencyMode) -> Result<Self, ImagingError> {
        let (min, max) = mode.band.subband_bounds();
        let out_of_bounds = |value| ImagingError::OutOfBoundsSubBand {
            value,
            min,
            max,
            mode: mode.filter.clone(),
        };

        let mut count = 0;
        for token in raw.split(',') {
            match token.split_once("..") {
                None => {
                    let value = parse_index(token)?;
                    if value < min || value > max {
                        return Err(out_of_bounds(value));
                    }
                    count += 1;
                }
                Some((start, end)) => {
                    let start = parse_index(start)
                        .map_err(|_| ImagingError::InvalidSubBand(token.to_string()))?;
                    let end = parse_index(end)
                        .map_err(|_| ImagingError::InvalidSubBand(token.to_string()))?;
                    if start > end {
                        return Err(ImagingError::InvalidSubBandOrder { start, end });
                    }
                    if start < min {
                        return Err(out_of_bounds(start));
                    }
                    if end > max {
                        return Err(out_of_bounds(end));
                    }
                    count += (end - start + 1) as usize;
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            count,
        })
    }

    /// Number of correlator tasks: two subbands per task.
    pub fn nr_tasks(&self) -> usize {
        self.count / 2
    }
}

fn parse_index(token: &str) -> Result<i64, ImagingError> {
    token
        .trim()
        .parse()
        .map_err(|_| ImagingError::InvalidSubBand(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn parse(raw: &str, filter: &str) -> Result<SubbandSpec, ImagingError> {
        SubbandSpec::parse(raw, &FrequencyMode::new(filter))
    }

    #[test]
    fn band_table() {
        assert_eq!(Band::from_filter("30-90 MHz"), Band::Lba30To90);
        assert_eq!(Band::from_filter("170-230 MHz"), Band::Hba170To230);
        assert_eq!(Band::from_filter("110-190 MHz"), Band::HbaDefault);
        assert_eq!(Band::from_filter(""), Band::HbaDefault);

        assert_eq!(Band::Hba170To230.clock(), "160 MHz");
        assert_eq!(Band::Lba30To90.clock(), "200 MHz");
        assert_eq!(Band::HbaDefault.clock(), "200 MHz");
    }

    #[test]
    fn counts_singles_and_ranges() {
        assert_eq!(parse("100", "110-190 MHz").unwrap().count, 1);
        assert_eq!(parse("100,101,300", "110-190 MHz").unwrap().count, 3);
        assert_eq!(parse("77..456", "110-190 MHz").unwrap().count, 380);
        assert_eq!(parse("100..109,200,300..300", "110-190 MHz").unwrap().count, 12);
    }

    #[test]
    fn keeps_raw_text() {
        let spec = parse("100..109, 200", "110-190 MHz").unwrap();
        assert_eq!(spec.raw, "100..109, 200");
        assert_eq!(spec.count, 11);
    }

    #[test]
    fn boundaries_are_inclusive_for_every_band() {
        for band in Band::iter() {
            let filter = match band {
                Band::Lba30To90 => "30-90 MHz",
                Band::Hba170To230 => "170-230 MHz",
                Band::HbaDefault => "110-190 MHz",
            };
            let (min, max) = band.subband_bounds();

            assert!(parse(&min.to_string(), filter).is_ok());
            assert!(parse(&max.to_string(), filter).is_ok());
            assert_eq!(
                parse(&format!("{min}..{max}"), filter).unwrap().count,
                (max - min + 1) as usize
            );

            for value in [min - 1, max + 1] {
                assert!(matches!(
                    parse(&value.to_string(), filter),
                    Err(ImagingError::OutOfBoundsSubBand { value: v, .. }) if v == value
                ));
            }
            assert!(matches!(
                parse(&format!("{}..{}", min - 1, max), filter),
                Err(ImagingError::OutOfBoundsSubBand { .. })
            ));
            assert!(matches!(
                parse(&format!("{}..{}", min, max + 1), filter),
                Err(ImagingError::OutOfBoundsSubBand { .. })
            ));
        }
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse("abc", "110-190 MHz"),
            Err(ImagingError::InvalidSubBand("abc".into()))
        );
        assert_eq!(
            parse("", "110-190 MHz"),
            Err(ImagingError::InvalidSubBand("".into()))
        );
        assert_eq!(
            parse("100,,200", "110-190 MHz"),
            Err(ImagingError::InvalidSubBand("".into()))
        );
        assert_eq!(
            parse("100..x", "110-190 MHz"),
            Err(ImagingError::InvalidSubBand("100..x".into()))
        );
        assert_eq!(
            parse("100..200..300", "110-190 MHz"),
            Err(ImagingError::InvalidSubBand("100..200..300".into()))
        );
    }

    #[test]
    fn reversed_range() {
        assert_eq!(
            parse("300..200", "110-190 MHz"),
            Err(ImagingError::InvalidSubBandOrder {
                start: 300,
                end: 200
            })
        );
    }

    #[test]
    fn nr_tasks_rounds_down() {
        assert_eq!(parse("100", "110-190 MHz").unwrap().nr_tasks(), 0);
        assert_eq!(parse("100..102", "110-190 MHz").unwrap().nr_tasks(), 1);
        assert_eq!(parse("77..456", "110-190 MHz").unwrap().nr_tasks(), 190);
        assert_eq!(parse("77..457", "110-190 MHz").unwrap().nr_tasks(), 190);
    }
}
