use std::str::FromStr;

use serde::Serialize;
use strum_macros::{Display, EnumString};

use super::error::MAX_DEMIX_SOURCES;
use super::ImagingError;
use crate::sky::{Astrometry, SkyCoord};

/// Bright sources that can be demixed out of a target beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
pub enum ATeam {
    CasA,
    CygA,
    TauA,
    VirA,
}

/// One user beam.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    pub label: String,
    /// Right ascension as typed, written verbatim to the beam line.
    pub ra: String,
    /// Declination as typed, written verbatim to the beam line.
    pub dec: String,
    pub coord: SkyCoord,
    pub demix: Vec<ATeam>,
}

impl Target {
    /// Demix sources as they appear in the `Demix=` line.
    pub fn demix_list(&self) -> String {
        self.demix
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Parse the pointing text box: one `label,ra,dec[,demix[,demix]]` per line.
/// Blank lines are skipped.
pub fn parse_pointings<A: Astrometry + ?Sized>(
    text: &str,
    sky: &A,
) -> Result<Vec<Target>, ImagingError> {
    let mut targets = Vec::new();

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        let [label, ra, dec, demix @ ..] = fields.as_slice() else {
            return Err(ImagingError::InvalidPointing {
                line: i + 1,
                text: line.to_string(),
            });
        };

        let coord = sky
            .parse_coordinate(ra, dec)
            .map_err(|source| ImagingError::InvalidCoordinate {
                label: label.to_string(),
                source,
            })?;

        targets.push(Target {
            label: label.to_string(),
            ra: ra.to_string(),
            dec: dec.to_string(),
            coord,
            demix: parse_demix(label, demix)?,
        });
    }

    if targets.is_empty() {
        return Err(ImagingError::InvalidPointing {
            line: 1,
            text: text.to_string(),
        });
    }

    Ok(targets)
}

fn parse_demix(label: &str, fields: &[&str]) -> Result<Vec<ATeam>, ImagingError> {
    let names: Vec<&str> = fields.iter().copied().filter(|f| !f.is_empty()).collect();
    if names.len() > MAX_DEMIX_SOURCES {
        return Err(ImagingError::TooManyATeam {
            label: label.to_string(),
            count: names.len(),
        });
    }

    names
        .into_iter()
        .map(|name| {
            ATeam::from_str(name).map_err(|_| ImagingError::InvalidATeam {
                label: label.to_string(),
                source_name: name.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sky::Horizon;
    use indoc::indoc;

    #[test]
    fn parses_two_beams() {
        let targets = parse_pointings("A,10:00:00,+20:00:00,\nB,11:00:00,+30:00:00,", &Horizon)
            .unwrap();

        let labels: Vec<_> = targets.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["A", "B"]);
        assert_eq!(targets[0].ra, "10:00:00");
        assert_eq!(targets[1].dec, "+30:00:00");
        assert_eq!(targets[1].coord, SkyCoord::new(165.0, 30.0));
        assert!(targets.iter().all(|t| t.demix.is_empty()));
    }

    #[test]
    fn parses_demix_sources() {
        let text = indoc! {"
            3C196-field,08:13:36.0,+48:13:03,CasA,CygA

            Lockman,10:47:00,+58:05:00,VirA
            Plain,12:00:00,+10:00:00
        "};
        let targets = parse_pointings(text, &Horizon).unwrap();

        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].demix, [ATeam::CasA, ATeam::CygA]);
        assert_eq!(targets[0].demix_list(), "CasA,CygA");
        assert_eq!(targets[1].demix, [ATeam::VirA]);
        assert_eq!(targets[1].demix_list(), "VirA");
        assert_eq!(targets[2].demix_list(), "");
    }

    #[test]
    fn labels_are_not_trimmed() {
        let targets = parse_pointings(" A ,10:00:00,+20:00:00", &Horizon).unwrap();
        assert_eq!(targets[0].label, " A ");
    }

    #[test]
    fn too_few_fields() {
        assert_eq!(
            parse_pointings("A,10:00:00,+20:00:00\nB,11:00:00", &Horizon),
            Err(ImagingError::InvalidPointing {
                line: 2,
                text: "B,11:00:00".into()
            })
        );
    }

    #[test]
    fn empty_text_has_no_pointings() {
        assert!(matches!(
            parse_pointings("\n  \n", &Horizon),
            Err(ImagingError::InvalidPointing { .. })
        ));
    }

    #[test]
    fn bad_coordinate() {
        assert!(matches!(
            parse_pointings("A,25:00:00,+20:00:00", &Horizon),
            Err(ImagingError::InvalidCoordinate { label, .. }) if label == "A"
        ));
    }

    #[test]
    fn three_demix_sources_are_too_many() {
        assert_eq!(
            parse_pointings("A,10:00:00,+20:00:00,CasA,CygA,TauA", &Horizon),
            Err(ImagingError::TooManyATeam {
                label: "A".into(),
                count: 3
            })
        );
    }

    #[test]
    fn unknown_demix_source() {
        assert_eq!(
            parse_pointings("A,10:00:00,+20:00:00,Mars", &Horizon),
            Err(ImagingError::InvalidATeam {
                label: "A".into(),
                source_name: "Mars".into()
            })
        );
    }

    #[test]
    fn single_demix_source_renders_bare() {
        let targets = parse_pointings("A,10:00:00,+20:00:00,CasA", &Horizon).unwrap();
        assert_eq!(targets[0].demix_list(), "CasA");
    }
}
