use std::io::{self, Write};

use chrono::{NaiveDateTime, Timelike};

use super::CALIBRATOR_SCAN_S;
use crate::imaging::{Calibrator, ObservationRequest, Target};
use crate::sky::{format_dec, format_ra, SkyCoord};

/// Writes the header and observation blocks of one imaging run.
pub struct ScheduleWriter<'a, W: Write> {
    request: &'a ObservationRequest,
    out: W,
}

impl<'a, W: Write> ScheduleWriter<'a, W> {
    pub fn new(request: &'a ObservationRequest, out: W) -> Self {
        Self { request, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "projectName={}", self.request.project_name)?;
        writeln!(self.out, "mainFolderName={}", self.request.main_folder_name)?;
        writeln!(
            self.out,
            "mainFolderDescription=Preprocessing:HBA Dual Inner, {}, 8bits, 48MHz@144MHz, 1s, 64ch/sb",
            self.request.frequency_mode.filter
        )?;
        writeln!(self.out)
    }

    pub fn write_calibrator(
        &mut self,
        start: NaiveDateTime,
        calibrator: &Calibrator,
    ) -> io::Result<()> {
        self.write_block_start(calibrator.name, start, CALIBRATOR_SCAN_S)?;
        writeln!(
            self.out,
            "{};{};;;;;T;{}",
            calibrator.pointing(),
            calibrator.name,
            CALIBRATOR_SCAN_S
        )?;
        writeln!(self.out, "Demix=4;1;64;10;;;F")?;
        writeln!(self.out)
    }

    /// Write the target scan, one beam per pointing plus the tile beam when
    /// there is more than one.
    pub fn write_target(&mut self, start: NaiveDateTime) -> io::Result<()> {
        let request = self.request;
        let duration_s = request.target_duration_s();
        let package_name = match request.targets.as_slice() {
            [first, second, ..] => format!("{}-{}", first.label, second.label),
            [only] => only.label.clone(),
            [] => String::new(),
        };

        self.write_block_start(&package_name, start, duration_s)?;

        if request.n_beams() > 1 {
            if let Some(reference) = tile_beam(&request.targets) {
                writeln!(
                    self.out,
                    "{};{};REF;256;1;;;F;{}",
                    format_ra(reference.ra_deg),
                    format_dec(reference.dec_deg),
                    duration_s
                )?;
            }
        }

        for target in &request.targets {
            writeln!(
                self.out,
                "{};{};{};;;;;T;{}",
                target.ra, target.dec, target.label, duration_s
            )?;
            writeln!(
                self.out,
                "Demix={};64;10;;{};F",
                request.averaging.demix_fields(),
                target.demix_list()
            )?;
        }
        writeln!(self.out)
    }

    fn write_block_start(
        &mut self,
        package_name: &str,
        start: NaiveDateTime,
        duration_s: i64,
    ) -> io::Result<()> {
        let request = self.request;
        let mode = &request.frequency_mode;

        writeln!(self.out, "BLOCK")?;
        writeln!(self.out)?;
        writeln!(self.out, "packageName={}", package_name)?;
        writeln!(self.out, "startTimeUTC={}", format_start_time(start))?;
        writeln!(self.out, "targetDuration_s={}", duration_s)?;
        writeln!(self.out, "clock={}", mode.band.clock())?;
        writeln!(self.out, "instrumentFilter={}", mode.filter)?;
        writeln!(self.out, "nr_tasks={}", request.subbands.nr_tasks())?;
        self.write_common(&mode.filter)?;
        writeln!(
            self.out,
            "Global_Subbands={};{}",
            request.subbands.raw, request.subbands.count
        )?;
        writeln!(self.out, "targetBeams=")
    }

    fn write_common(&mut self, filter: &str) -> io::Result<()> {
        for line in [
            "split_targets=F",
            "calibration=none",
            "processing=Preprocessing",
            "imagingPipeline=none",
            "cluster=CEP4",
            "repeat=1",
            "nr_cores_per_task=2",
        ] {
            writeln!(self.out, "{}", line)?;
        }
        writeln!(
            self.out,
            "packageDescription=HBA Dual Inner, {}, 8bits, 48MHz@144MHz, 1s, 64ch/sb",
            filter
        )?;
        for line in [
            "antennaMode=HBA Dual Inner",
            "numberOfBitsPerSample=8",
            "integrationTime=1.0",
            "channelsPerSubband=64",
            "stationList=all",
            "tbbPiggybackAllowed=T",
            "aartfaacPiggybackAllowed=T",
            "correlatedData=T",
            "coherentStokesData=F",
            "incoherentStokesData=F",
            "flysEye=F",
            "coherentDedisperseChannels=False",
            "flaggingStrategy=HBAdefault",
            "timeStep1=60",
            "timeStep2=60",
        ] {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }
}

/// `YYYY-MM-DD hh:mm:ss`, with microseconds only when there are any.
pub fn format_start_time(time: NaiveDateTime) -> String {
    if time.nanosecond() / 1_000 == 0 {
        time.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        time.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

/// Reference pointing for the station tile beam: the flat mean of the
/// target positions. Right ascensions are unwrapped around the first
/// target so that fields straddling 0h average sensibly; no correction is
/// made near the poles.
pub fn tile_beam(targets: &[Target]) -> Option<SkyCoord> {
    let reference = targets.first()?.coord.ra_deg;
    let n = targets.len() as f64;

    let (ra_sum, dec_sum) = targets.iter().fold((0.0, 0.0), |(ra, dec), t| {
        let offset = (t.coord.ra_deg - reference + 180.0).rem_euclid(360.0) - 180.0;
        (ra + reference + offset, dec + t.coord.dec_deg)
    });

    Some(SkyCoord::new((ra_sum / n).rem_euclid(360.0), dec_sum / n))
}
