//! Milky Way E(B-V) options.
//!
//! A caller may carry an E(B-V) read from a file (simulation library or data
//! header) and choose, per run, to keep it, replace it with the SFD98 map
//! value, or rescale the map value to the Schlafly & Finkbeiner (2011)
//! calibration.
use std::fmt;

use crate::mwdust_errors::MwDustError;

/// Source of the Milky Way E(B-V).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MwebvOption {
    Off,
    File,
    Sfd98,
    Sch11Ps2013,
}

/// Schlafly & Finkbeiner (2011) rescaling of SFD98.
const SCH11_SCALE: f64 = 0.86;

impl MwebvOption {
    pub fn from_code(code: i32) -> Result<Self, MwDustError> {
        match code {
            0 => Ok(MwebvOption::Off),
            1 => Ok(MwebvOption::File),
            2 => Ok(MwebvOption::Sfd98),
            3 => Ok(MwebvOption::Sch11Ps2013),
            _ => Err(MwDustError::InvalidMwebvOption(code)),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            MwebvOption::Off => 0,
            MwebvOption::File => 1,
            MwebvOption::Sfd98 => 2,
            MwebvOption::Sch11Ps2013 => 3,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MwebvOption::Off => "No Extinction",
            MwebvOption::File => "FILE value (SIMLIB or data header)",
            MwebvOption::Sfd98 => "SFD98",
            MwebvOption::Sch11Ps2013 => "Schlafly11+PS2013: 0.86*MWEBV(SFD98)",
        }
    }

    /// True when the option needs the SFD98 map value.
    pub fn uses_map(self) -> bool {
        matches!(self, MwebvOption::Sfd98 | MwebvOption::Sch11Ps2013)
    }
}

impl TryFrom<i32> for MwebvOption {
    type Error = MwDustError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        MwebvOption::from_code(code)
    }
}

impl fmt::Display for MwebvOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// E(B-V) and its uncertainty according to `option`.
///
/// Arguments
/// -----------------
/// * `option`: Source of the value.
/// * `file_ebv`, `file_err`: Value and error read from the file.
/// * `sfd98`: Lookup of the SFD98 E(B-V), only called when the option needs it.
///
/// Return
/// ----------
/// * `(ebv, ebv_err)`:
///   - `Off`: `(0, 0)`
///   - `File`: `(file_ebv, file_err)`
///   - `Sfd98`: `(sfd, sfd/6)`
///   - `Sch11Ps2013`: `(0.86·sfd, 0.05·0.86·sfd)`
/// * Any error of the map lookup.
pub fn modify_mwebv<F>(
    option: MwebvOption,
    file_ebv: f64,
    file_err: f64,
    sfd98: F,
) -> Result<(f64, f64), MwDustError>
where
    F: FnOnce() -> Result<f64, MwDustError>,
{
    match option {
        MwebvOption::Off => Ok((0.0, 0.0)),
        MwebvOption::File => Ok((file_ebv, file_err)),
        MwebvOption::Sfd98 => {
            let sfd = sfd98()?;
            Ok((sfd, sfd / 6.0))
        }
        MwebvOption::Sch11Ps2013 => {
            let ebv = SCH11_SCALE * sfd98()?;
            Ok((ebv, 0.05 * ebv))
        }
    }
}
