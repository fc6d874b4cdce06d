//! Read values from the SFD dust maps at galactic (or equatorial) positions.
//!
//! ```text
//! dust_getval 12 34.5 --interp
//! dust_getval --map T --ipath /data/MWDUST --interp --infile points.in --outfile points.out
//! dust_getval --radec 150.1 2.2
//! ```
use std::fs;
use std::io::{self, BufWriter, ErrorKind, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;

use mwdust::config::DustConfig;
use mwdust::constants::Degree;
use mwdust::dust_map::{DustMap, MapKind};
use mwdust::galdust::GalDust;
use mwdust::mwdust_errors::{abort_with_diagnostic, MwDustError};

#[derive(Parser, Debug)]
#[command(author, version, about = "Read values from the SFD dust maps")]
struct Args {
    /// Galactic longitude in degrees (RA with --radec)
    #[arg(allow_negative_numbers = true)]
    lon: Option<Degree>,

    /// Galactic latitude in degrees (DEC with --radec)
    #[arg(allow_negative_numbers = true)]
    lat: Option<Degree>,

    /// Map to read: Ebv, I100, X, T or mask
    #[arg(long)]
    map: Option<MapKind>,

    /// Directory of the map files
    #[arg(long)]
    ipath: Option<Utf8PathBuf>,

    /// Interpolate from the 4 nearest pixels (ignored for the mask)
    #[arg(long, default_value_t = false)]
    interp: bool,

    /// Read one sub-image per hemisphere instead of one read per point
    #[arg(long, default_value_t = false)]
    noloop: bool,

    /// Log pixel coordinates and map values of every point
    #[arg(long, default_value_t = false)]
    verbose: bool,

    /// Positions are equatorial (RA, DEC); print E(B-V) and the u g r i z extinctions
    #[arg(long, default_value_t = false)]
    radec: bool,

    /// JSON configuration, overridden by the options above
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Read positions from this file, two columns per line
    #[arg(long)]
    infile: Option<Utf8PathBuf>,

    /// Write results to this file instead of the standard output
    #[arg(long)]
    outfile: Option<Utf8PathBuf>,
}

impl Args {
    fn dust_config(&self) -> Result<DustConfig, MwDustError> {
        let mut config = match &self.config {
            Some(path) => DustConfig::from_json_file(path)?,
            None => DustConfig {
                interp: false,
                ..Default::default()
            },
        };
        if let Some(map) = self.map {
            config.map = map;
        }
        if let Some(root) = &self.ipath {
            config.root = Some(root.clone());
        }
        config.interp |= self.interp;
        config.noloop |= self.noloop;
        config.verbose |= self.verbose;
        Ok(config)
    }

    fn positions(&self) -> Result<Vec<(Degree, Degree)>, MwDustError> {
        match (&self.infile, self.lon, self.lat) {
            (Some(path), _, _) => read_positions(path),
            (None, Some(lon), Some(lat)) => Ok(vec![(lon, lat)]),
            _ => Err(io::Error::new(
                ErrorKind::InvalidInput,
                "either a longitude and a latitude or --infile must be given",
            )
            .into()),
        }
    }
}

/// Two numbers per line; blank lines and lines starting with `#` are skipped.
fn read_positions(path: &Utf8Path) -> Result<Vec<(Degree, Degree)>, MwDustError> {
    let text = fs::read_to_string(path)?;
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(n, line)| {
            let mut fields = line.split_whitespace().map(str::parse::<Degree>);
            match (fields.next(), fields.next()) {
                (Some(Ok(lon)), Some(Ok(lat))) => Ok((lon, lat)),
                _ => Err(io::Error::new(
                    ErrorKind::InvalidData,
                    format!("{path}:{}: expected two numbers, found '{line}'", n + 1),
                )
                .into()),
            }
        })
        .collect()
}

fn run(args: &Args) -> Result<(), MwDustError> {
    let config = args.dust_config()?;
    let positions = args.positions()?;
    log::debug!("{} positions, {config:?}", positions.len());

    let mut out: Box<dyn Write> = match &args.outfile {
        Some(path) => Box::new(BufWriter::new(fs::File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    if args.radec {
        let dust = GalDust::new(&config)?;
        let outcome = dust.lookup_extinctions(&positions)?;
        for (&(ra, dec), ext) in positions.iter().zip(&outcome.values) {
            let [u, g, r, i, z] = ext.bands;
            writeln!(
                out,
                "{ra:10.5} {dec:10.5} {:9.5} {u:8.4} {g:8.4} {r:8.4} {i:8.4} {z:8.4}",
                ext.ebv
            )?;
        }
        report_shortfall(outcome.shortfall);
    } else {
        let map = DustMap::new(&config)?;
        let outcome = map.values(&positions)?;
        for (&(l, b), value) in positions.iter().zip(&outcome.values) {
            writeln!(out, "{l:8.3} {b:7.3} {value:12.5}")?;
        }
        report_shortfall(outcome.shortfall);
    }
    out.flush()?;
    Ok(())
}

fn report_shortfall(shortfall: usize) {
    if shortfall > 0 {
        log::warn!("{shortfall} map pixels could not be read and were set to 0");
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(err) = run(&args) {
        abort_with_diagnostic(&err);
    }
}
