//! Crate-wide error type.
//!
//! Every failure that aborts a lookup or a law evaluation is a variant of
//! [`MwDustError`]. The `Display` of each fatal variant is a two-line
//! diagnostic: the first line says what went wrong, the second what would
//! have been valid. Truncated data files are **not** errors; they surface as
//! a shortfall count in [`crate::fits::ReadOutcome`].
//!
//! Call-site information is carried explicitly with [`CallSite`] and attached
//! through [`MwDustError::Context`], see [`ResultExt::with_call_site`].

use std::fmt;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::extinction::ColorLaw;

/// Ordered list of function names leading to a failure, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSite(Vec<String>);

impl CallSite {
    pub fn new(origin: impl Into<String>) -> Self {
        CallSite(vec![origin.into()])
    }

    /// Return a new call site with `function` appended.
    pub fn push(&self, function: &str) -> Self {
        let mut frames = self.0.clone();
        frames.push(function.to_string());
        CallSite(frames)
    }

    pub fn frames(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<unknown>");
        }
        write!(f, "{}", self.0.join("->"))
    }
}

#[derive(Error, Debug)]
pub enum MwDustError {
    #[error("Invalid color law selector {0}\nValid selectors: 0, 89, 94, -99, 99, 203, 204, 208, 214, 216, -219, 219, 223, 225")]
    InvalidLawSelector(i32),

    #[error("Invalid E(B-V) option {0}\nValid options: 0 (off), 1 (file), 2 (SFD98), 3 (Sch11+PS2013)")]
    InvalidMwebvOption(i32),

    #[error("Missing parameter {name} for {law}\n{law} requires {required}")]
    MissingLawParameter {
        law: ColorLaw,
        name: &'static str,
        required: &'static str,
    },

    #[error("Invalid {name}={value} for {law}\n{law} only valid for {min} <= {name} <= {max}")]
    LawParameterOutOfRange {
        law: ColorLaw,
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Requested WAVE={wave:.3} Angstroms for {law}\n{law} only valid in [{min:.1}, {max:.1}] Angstroms")]
    WavelengthOutOfRange {
        law: ColorLaw,
        wave: f64,
        min: f64,
        max: f64,
    },

    #[error("Requested RV={requested:.2} for {law}\n{law} only valid for RV={required:.2}")]
    FixedRvMismatch {
        law: ColorLaw,
        requested: f64,
        required: f64,
    },

    #[error("Spline interpolation out of bounds at x={x:.3}\nLimits are [{min:.3}, {max:.3}]")]
    SplineOutOfBounds { x: f64, min: f64, max: f64 },

    #[error("Invalid spline knots: {0}\nKnots must be strictly increasing with one value per knot")]
    InvalidSpline(String),

    #[error("Unable to open dust map file {path}\n{source}")]
    MapFileOpen {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("Unable to perform file operation\n{0}")]
    IoError(#[from] std::io::Error),

    #[error("Error during the nom parsing\n{0}")]
    NomParsingError(String),

    #[error("Header has no END card\nA FITS header must be terminated by an END card within the file")]
    MissingEndCard,

    #[error("Invalid BITPIX={0}\nSupported BITPIX are 8, 16, 32, 64, -32, -64")]
    InvalidBitpix(i64),

    #[error("Missing header card {0}\nThe card is required to interpret the image")]
    MissingCard(String),

    #[error("Invalid value for card {label}: '{value}'\nExpected a numeric value in columns 11-30")]
    InvalidCardValue { label: String, value: String },

    #[error("Pixel {coord:?} outside the image axes {axes:?}\nCoordinates must satisfy 0 <= c < NAXISn")]
    PixelOutOfBounds { coord: Vec<usize>, axes: Vec<usize> },

    #[error("Data has {found} elements but the header declares {expected}\nNAXISn cards must match the data buffer")]
    DataSizeMismatch { expected: usize, found: usize },

    #[error("Unsupported projection CTYPE1='{ctype1}' CTYPE2='{ctype2}'\nSupported projections are LAMBERT--X/Y and GLON-ZEA/GLAT-ZEA")]
    UnsupportedProjection { ctype1: String, ctype2: String },

    #[error("Unsupported ZEA pole with CRVAL2={crval2}\nOnly polar projections (|CRVAL2| > 89.9999) are supported")]
    UnsupportedPole { crval2: f64 },

    #[error("Singular CD matrix (determinant 0)\nThe linear pixel transform must be invertible")]
    SingularCdMatrix,

    #[error("Global dust root directory already set to {0}\nThe root directory may only be configured once per process")]
    ConfigAlreadySet(Utf8PathBuf),

    #[error("Non UTF-8 path: {0}\nDust map paths must be valid UTF-8")]
    Utf8PathError(String),

    #[error("Invalid dust configuration: {0}\nExpected a JSON object with root, map, interp, noloop, verbose")]
    InvalidConfig(String),

    #[error("{call_site}: {source}")]
    Context {
        call_site: CallSite,
        source: Box<MwDustError>,
    },
}

impl MwDustError {
    /// Two-line diagnostic suitable for the fatal abort message.
    ///
    /// Context wrappers contribute their call site to the first line.
    pub fn diagnostic(&self) -> (String, String) {
        let (site, inner) = self.unwrap_context();
        let text = inner.to_string();
        let mut lines = text.splitn(2, '\n');
        let first = lines.next().unwrap_or_default().to_string();
        let second = lines.next().unwrap_or_default().to_string();
        match site {
            Some(site) => (format!("{site}: {first}"), second),
            None => (first, second),
        }
    }

    /// The innermost error, stripped of every context wrapper.
    pub fn root(&self) -> &MwDustError {
        self.unwrap_context().1
    }

    fn unwrap_context(&self) -> (Option<&CallSite>, &MwDustError) {
        let mut site = None;
        let mut current = self;
        while let MwDustError::Context { call_site, source } = current {
            if site.is_none() {
                site = Some(call_site);
            }
            current = source;
        }
        (site, current)
    }
}

impl From<serde_json::Error> for MwDustError {
    fn from(err: serde_json::Error) -> Self {
        MwDustError::InvalidConfig(err.to_string())
    }
}

impl<'a> From<nom::Err<nom::error::Error<&'a [u8]>>> for MwDustError {
    fn from(err: nom::Err<nom::error::Error<&'a [u8]>>) -> Self {
        MwDustError::NomParsingError(format!("{:?}", err.map_input(|i| i.len())))
    }
}

impl<'a> From<nom::Err<nom::error::Error<&'a str>>> for MwDustError {
    fn from(err: nom::Err<nom::error::Error<&'a str>>) -> Self {
        MwDustError::NomParsingError(format!("{:?}", err.map_input(|i| i.to_string())))
    }
}

/// Attach a [`CallSite`] to the error branch of a result.
pub trait ResultExt<T> {
    fn with_call_site(self, call_site: &CallSite) -> Result<T, MwDustError>;
}

impl<T> ResultExt<T> for Result<T, MwDustError> {
    fn with_call_site(self, call_site: &CallSite) -> Result<T, MwDustError> {
        self.map_err(|err| match err {
            // keep the outermost site only
            ctx @ MwDustError::Context { .. } => ctx,
            other => MwDustError::Context {
                call_site: call_site.clone(),
                source: Box::new(other),
            },
        })
    }
}

/// Log the two-line diagnostic of a fatal error and terminate the process.
pub fn abort_with_diagnostic(err: &MwDustError) -> ! {
    let (first, second) = err.diagnostic();
    log::error!("FATAL ERROR ABORT");
    log::error!("{first}");
    log::error!("{second}");
    eprintln!("\n FATAL ERROR ABORT");
    eprintln!("   {first}");
    eprintln!("   {second}");
    std::process::exit(1);
}

impl PartialEq for MwDustError {
    fn eq(&self, other: &Self) -> bool {
        use MwDustError::*;
        match (self, other) {
            (InvalidLawSelector(a), InvalidLawSelector(b)) => a == b,
            (InvalidMwebvOption(a), InvalidMwebvOption(b)) => a == b,
            (
                MissingLawParameter { law: a, name: n1, .. },
                MissingLawParameter { law: b, name: n2, .. },
            ) => a == b && n1 == n2,
            (
                LawParameterOutOfRange { law: a, name: n1, value: v1, .. },
                LawParameterOutOfRange { law: b, name: n2, value: v2, .. },
            ) => a == b && n1 == n2 && v1 == v2,
            (
                WavelengthOutOfRange { law: a, wave: w1, .. },
                WavelengthOutOfRange { law: b, wave: w2, .. },
            ) => a == b && w1 == w2,
            (
                FixedRvMismatch { law: a, requested: r1, .. },
                FixedRvMismatch { law: b, requested: r2, .. },
            ) => a == b && r1 == r2,
            (SplineOutOfBounds { x: a, .. }, SplineOutOfBounds { x: b, .. }) => a == b,
            (InvalidSpline(a), InvalidSpline(b)) => a == b,
            // I/O errors are not comparable: equal if same variant
            (MapFileOpen { path: a, .. }, MapFileOpen { path: b, .. }) => a == b,
            (IoError(_), IoError(_)) => true,
            (NomParsingError(a), NomParsingError(b)) => a == b,
            (MissingEndCard, MissingEndCard) => true,
            (InvalidBitpix(a), InvalidBitpix(b)) => a == b,
            (MissingCard(a), MissingCard(b)) => a == b,
            (InvalidCardValue { label: a, .. }, InvalidCardValue { label: b, .. }) => a == b,
            (
                PixelOutOfBounds { coord: c1, axes: a1 },
                PixelOutOfBounds { coord: c2, axes: a2 },
            ) => c1 == c2 && a1 == a2,
            (
                DataSizeMismatch { expected: e1, found: f1 },
                DataSizeMismatch { expected: e2, found: f2 },
            ) => e1 == e2 && f1 == f2,
            (
                UnsupportedProjection { ctype1: a1, ctype2: a2 },
                UnsupportedProjection { ctype1: b1, ctype2: b2 },
            ) => a1 == b1 && a2 == b2,
            (UnsupportedPole { crval2: a }, UnsupportedPole { crval2: b }) => a == b,
            (SingularCdMatrix, SingularCdMatrix) => true,
            (ConfigAlreadySet(a), ConfigAlreadySet(b)) => a == b,
            (Utf8PathError(a), Utf8PathError(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,
            (
                Context { call_site: s1, source: e1 },
                Context { call_site: s2, source: e2 },
            ) => s1 == s2 && e1 == e2,
            _ => false,
        }
    }
}
