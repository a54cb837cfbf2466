use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::{MAX_BEAMLETS, MAX_FOLDER_NAME_LEN};
use super::pointing::{parse_pointings, Target};
use super::subbands::{FrequencyMode, SubbandSpec};
use super::utils::deserialize_field;
use super::ImagingError;
use crate::sky::Astrometry;

/// The imaging form as typed by the user. Every field is kept as text so
/// that validation, not deserialization, decides what is wrong with it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RawRequest {
    #[serde(deserialize_with = "deserialize_field")]
    pub project_name: String,
    #[serde(deserialize_with = "deserialize_field")]
    pub main_folder_name: String,
    /// `YYYY-MM-DD-hh-mm-ss`, UTC.
    #[schema(example = "2024-03-01-20-00-00")]
    #[serde(deserialize_with = "deserialize_field")]
    pub start_time: String,
    /// Minimum calibrator elevation in degrees.
    #[schema(example = "30")]
    #[serde(deserialize_with = "deserialize_field")]
    pub min_calibrator_elevation: String,
    /// `<frequency>,<time>` averaging factors.
    #[schema(example = "4,1")]
    #[serde(deserialize_with = "deserialize_field")]
    pub averaging: String,
    #[schema(example = "110-190 MHz")]
    #[serde(deserialize_with = "deserialize_field")]
    pub frequency_mode: String,
    #[schema(example = "77..456")]
    #[serde(deserialize_with = "deserialize_field")]
    pub subbands: String,
    /// One `label,ra,dec[,demix[,demix]]` per line.
    #[schema(example = "Lockman,10:47:00,+58:05:00,CasA")]
    #[serde(deserialize_with = "deserialize_field")]
    pub pointings: String,
    #[schema(example = "8")]
    #[serde(deserialize_with = "deserialize_field")]
    pub duration_hours: String,
    /// Close the run with a second calibrator scan.
    pub trailing_calibrator: bool,
}

/// Frequency and time averaging factors for the preprocessing pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Averaging {
    pub raw: String,
    pub frequency: f64,
    pub time: f64,
}

impl Averaging {
    pub fn parse(raw: &str) -> Result<Self, ImagingError> {
        let invalid = || ImagingError::InvalidAverage(raw.to_string());
        let (frequency, time) = raw.split_once(',').ok_or_else(invalid)?;
        if time.contains(',') {
            return Err(invalid());
        }
        Ok(Self {
            raw: raw.to_string(),
            frequency: parse_finite(frequency).ok_or_else(invalid)?,
            time: parse_finite(time).ok_or_else(invalid)?,
        })
    }

    /// The leading `<frequency>;<time>` fields of a `Demix=` line.
    pub fn demix_fields(&self) -> String {
        self.raw.replace(',', ";")
    }
}

/// A fully validated imaging request. Built once, never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRequest {
    pub project_name: String,
    pub main_folder_name: String,
    pub start_time: NaiveDateTime,
    pub min_calibrator_elevation: f64,
    pub averaging: Averaging,
    pub frequency_mode: FrequencyMode,
    pub subbands: SubbandSpec,
    pub targets: Vec<Target>,
    pub duration_hours: f64,
    /// `duration_hours` to the microsecond.
    #[serde(skip)]
    pub target_duration: Duration,
    pub trailing_calibrator: bool,
}

impl ObservationRequest {
    /// Validate every field in form order, stopping at the first error.
    pub fn from_raw<A: Astrometry + ?Sized>(
        raw: &RawRequest,
        sky: &A,
    ) -> Result<Self, ImagingError> {
        let main_folder_name = validate_folder_name(&raw.main_folder_name)?;
        let start_time = parse_start_time(&raw.start_time)?;

        let min_calibrator_elevation = parse_finite(&raw.min_calibrator_elevation)
            .filter(|el| (0.0..=90.0).contains(el))
            .ok_or_else(|| ImagingError::InvalidElevation(raw.min_calibrator_elevation.clone()))?;

        let averaging = Averaging::parse(&raw.averaging)?;

        let frequency_mode = FrequencyMode::new(&raw.frequency_mode);
        let subbands = SubbandSpec::parse(&raw.subbands, &frequency_mode)?;

        let targets = parse_pointings(&raw.pointings, sky)?;
        if targets.len() * subbands.count > MAX_BEAMLETS {
            return Err(ImagingError::TooManyBeamlets {
                beams: targets.len(),
                subbands: subbands.count,
            });
        }

        let invalid_duration = || ImagingError::InvalidDuration(raw.duration_hours.clone());
        let duration_hours = parse_finite(&raw.duration_hours)
            .filter(|hours| *hours >= 0.0)
            .ok_or_else(invalid_duration)?;
        let target_duration = duration_from_hours(duration_hours)
            .filter(|d| start_time.checked_add_signed(*d).is_some())
            .ok_or_else(invalid_duration)?;

        Ok(Self {
            project_name: raw.project_name.clone(),
            main_folder_name,
            start_time,
            min_calibrator_elevation,
            averaging,
            frequency_mode,
            subbands,
            targets,
            duration_hours,
            target_duration,
            trailing_calibrator: raw.trailing_calibrator,
        })
    }

    pub fn n_beams(&self) -> usize {
        self.targets.len()
    }

    pub fn n_beamlets(&self) -> usize {
        self.n_beams() * self.subbands.count
    }

    /// Whole seconds of the target scan as written to `targetDuration_s`.
    pub fn target_duration_s(&self) -> i64 {
        (self.duration_hours * 3600.0) as i64
    }
}

fn validate_folder_name(name: &str) -> Result<String, ImagingError> {
    if name.chars().count() > MAX_FOLDER_NAME_LEN {
        return Err(ImagingError::TooLongFolderName(name.to_string()));
    }
    if name.is_empty() {
        return Err(ImagingError::InvalidMainFolderName);
    }
    Ok(name.to_string())
}

/// Parse `YYYY-MM-DD-hh-mm-ss`.
pub fn parse_start_time(s: &str) -> Result<NaiveDateTime, ImagingError> {
    let invalid = || ImagingError::InvalidDateTime(s.to_string());
    let fields = s
        .split('-')
        .map(|f| f.trim().parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()
        .ok_or_else(invalid)?;
    let [year, month, day, hour, minute, second] = fields.as_slice() else {
        return Err(invalid());
    };

    let year = i32::try_from(*year).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, *month, *day)
        .and_then(|date| date.and_hms_opt(*hour, *minute, *second))
        .ok_or_else(invalid)
}

/// `None` when the duration does not fit in a `Duration`.
fn duration_from_hours(hours: f64) -> Option<Duration> {
    let micros = (hours * 3_600_000_000.0).round();
    if micros >= i64::MAX as f64 {
        return None;
    }
    Some(Duration::microseconds(micros as i64))
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
