use serde::Serialize;

/// A standard flux-density calibrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Calibrator {
    pub name: &'static str,
    pub ra: &'static str,
    pub dec: &'static str,
    /// Whether the selector may pick this source.
    pub selectable: bool,
}

impl Calibrator {
    /// The `ra;dec` pair used in beam lines.
    pub fn pointing(&self) -> String {
        format!("{};{}", self.ra, self.dec)
    }
}

const fn calibrator(
    name: &'static str,
    ra: &'static str,
    dec: &'static str,
    selectable: bool,
) -> Calibrator {
    Calibrator {
        name,
        ra,
        dec,
        selectable,
    }
}

pub static CALIBRATORS: [Calibrator; 7] = [
    calibrator("3C295", "14:11:20.5", "52:12:10", true),
    calibrator("3C196", "08:13:36.0", "48:13:03", true),
    calibrator("3C48", "01:37:41.3", "33:09:35", true),
    calibrator("3C147", "05:42:36.1", "49:51:07", true),
    calibrator("3C380", "18:29:31.8", "48:44:46", true),
    calibrator("3C286", "13:31:08.3", "30:30:33", false),
    calibrator("CTD93", "16:09:13.3", "26:41:29", false),
];

/// Calibrators the selector chooses from, in catalog order.
pub fn selectable() -> impl Iterator<Item = &'static Calibrator> {
    CALIBRATORS.iter().filter(|c| c.selectable)
}
