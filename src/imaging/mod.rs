pub mod catalog;
mod error;
mod pointing;
mod request;
mod selector;
mod subbands;
mod utils;

pub use catalog::Calibrator;
pub use error::ImagingError;
pub use pointing::Target;
pub use request::{parse_start_time, ObservationRequest, RawRequest};
pub use selector::select_calibrator;

#[cfg(test)]
pub(crate) use selector::tests::FixedSky;

/// A complete, valid form used across the test suites.
#[cfg(test)]
pub(crate) fn sample_raw_request() -> RawRequest {
    RawRequest {
        project_name: "LC20_001".into(),
        main_folder_name: "imaging-run".into(),
        start_time: "2024-03-01-20-00-00".into(),
        min_calibrator_elevation: "30".into(),
        averaging: "4,1".into(),
        frequency_mode: "110-190 MHz".into(),
        subbands: "100..219".into(),
        pointings: "A,10:00:00,+20:00:00,\nB,11:00:00,+30:00:00,".into(),
        duration_hours: "2.5".into(),
        trailing_calibrator: false,
    }
}
