mod writer;

pub use writer::{format_start_time, tile_beam, ScheduleWriter};

use std::io::Write;

use chrono::{Duration, NaiveDateTime};
use thiserror::Error;

use crate::imaging::{select_calibrator, Calibrator, ImagingError, ObservationRequest};
use crate::sky::{Astrometry, Site};

/// Length of a calibrator scan.
pub const CALIBRATOR_SCAN_S: i64 = 600;
/// Gap left after every block for the stations to slew.
pub const SLEW: Duration = Duration::minutes(1);

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Imaging(#[from] ImagingError),
    #[error("failed to write schedule: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockKind {
    Calibrator(&'static Calibrator),
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedBlock {
    pub kind: BlockKind,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Every block of a run with its time slot, decided before anything is
/// written.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulePlan {
    pub blocks: Vec<PlannedBlock>,
}

impl SchedulePlan {
    pub fn calibrators(&self) -> impl Iterator<Item = &'static Calibrator> + '_ {
        self.blocks.iter().filter_map(|b| match b.kind {
            BlockKind::Calibrator(cal) => Some(cal),
            BlockKind::Target => None,
        })
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.blocks.last().map(|b| b.end)
    }
}

/// `None` when the block would end past the last representable date.
pub fn calibrator_block_end(start: NaiveDateTime) -> Option<NaiveDateTime> {
    start
        .checked_add_signed(Duration::seconds(CALIBRATOR_SCAN_S))?
        .checked_add_signed(SLEW)
}

pub fn target_block_end(
    request: &ObservationRequest,
    start: NaiveDateTime,
) -> Option<NaiveDateTime> {
    start
        .checked_add_signed(request.target_duration)?
        .checked_add_signed(SLEW)
}

/// Lay out the calibrator scan, the target scan and, when requested, a
/// closing calibrator scan. Calibrators are chosen for the time their own
/// block starts.
pub fn plan<A: Astrometry + ?Sized>(
    request: &ObservationRequest,
    site: &Site,
    sky: &A,
) -> Result<SchedulePlan, ImagingError> {
    let too_long = || ImagingError::InvalidDuration(request.duration_hours.to_string());
    let start = request.start_time;
    let calibrator = select_calibrator(request, start, site, sky)?;
    let target_start = calibrator_block_end(start)
        .ok_or_else(|| ImagingError::InvalidDateTime(start.to_string()))?;
    let target_end = target_block_end(request, target_start).ok_or_else(too_long)?;

    let mut blocks = vec![
        PlannedBlock {
            kind: BlockKind::Calibrator(calibrator),
            start,
            end: target_start,
        },
        PlannedBlock {
            kind: BlockKind::Target,
            start: target_start,
            end: target_end,
        },
    ];

    if request.trailing_calibrator {
        let closing = select_calibrator(request, target_end, site, sky)?;
        blocks.push(PlannedBlock {
            kind: BlockKind::Calibrator(closing),
            start: target_end,
            end: calibrator_block_end(target_end).ok_or_else(too_long)?,
        });
    }

    Ok(SchedulePlan { blocks })
}

/// Plan the run and write it to `out`. Nothing is written unless planning
/// succeeds.
pub fn generate<A: Astrometry + ?Sized, W: Write>(
    request: &ObservationRequest,
    site: &Site,
    sky: &A,
    out: W,
) -> Result<SchedulePlan, GenerateError> {
    let plan = plan(request, site, sky)?;
    log::info!(
        "Writing {} blocks for {} ({} beams, {} subbands)",
        plan.blocks.len(),
        request.main_folder_name,
        request.n_beams(),
        request.subbands.count
    );

    let mut writer = ScheduleWriter::new(request, out);
    writer.write_header()?;
    for block in &plan.blocks {
        match block.kind {
            BlockKind::Calibrator(cal) => writer.write_calibrator(block.start, cal)?,
            BlockKind::Target => writer.write_target(block.start)?,
        }
    }
    writer.into_inner().flush()?;

    Ok(plan)
}
