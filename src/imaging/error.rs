use strum_macros::IntoStaticStr;
use thiserror::Error;

use crate::sky::CoordinateError;

pub const MAX_FOLDER_NAME_LEN: usize = 20;
pub const MAX_BEAMLETS: usize = 488;
pub const MAX_DEMIX_SOURCES: usize = 2;

/// Everything that can be wrong with an imaging request. Validation stops
/// at the first problem, so a request only ever reports one of these.
#[derive(Debug, Clone, PartialEq, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ImagingError {
    #[error("main folder name must not be empty")]
    InvalidMainFolderName,
    #[error("main folder name '{0}' is longer than {max} characters", max = MAX_FOLDER_NAME_LEN)]
    TooLongFolderName(String),
    #[error("start time '{0}' is not a valid YYYY-MM-DD-hh-mm-ss timestamp")]
    InvalidDateTime(String),
    #[error("calibrator elevation '{0}' must be a number of degrees between 0 and 90")]
    InvalidElevation(String),
    #[error("averaging factors '{0}' must be two numbers: '<frequency>,<time>'")]
    InvalidAverage(String),
    #[error("subband '{0}' is not an integer or an 'a..b' range")]
    InvalidSubBand(String),
    #[error("subband {value} is outside {min}..{max} for the {mode} filter")]
    OutOfBoundsSubBand {
        value: i64,
        min: i64,
        max: i64,
        mode: String,
    },
    #[error("subband range {start}..{end} is reversed")]
    InvalidSubBandOrder { start: i64, end: i64 },
    #[error("pointing line {line} '{text}' needs at least 'label,ra,dec'")]
    InvalidPointing { line: usize, text: String },
    #[error("pointing '{label}' has a bad coordinate: {source}")]
    InvalidCoordinate {
        label: String,
        source: CoordinateError,
    },
    #[error(
        "{beams} beams x {subbands} subbands needs more than {max} beamlets",
        max = MAX_BEAMLETS
    )]
    TooManyBeamlets { beams: usize, subbands: usize },
    #[error("observation duration '{0}' must be a non-negative number of hours")]
    InvalidDuration(String),
    #[error(
        "pointing '{label}' lists {count} demix sources, at most {max} are allowed",
        max = MAX_DEMIX_SOURCES
    )]
    TooManyATeam { label: String, count: usize },
    #[error("pointing '{label}' has unknown demix source '{source_name}', expected one of CasA, CygA, TauA, VirA")]
    InvalidATeam { label: String, source_name: String },
    #[error("no calibrator is above {min_elevation} degrees elevation at {time}")]
    NoCalibratorAvailable { min_elevation: f64, time: String },
}

impl ImagingError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}
