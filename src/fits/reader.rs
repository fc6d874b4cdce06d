//! Reading headers and data from image files.
//!
//! [`FitsFile::open`] reads only the header and remembers where the data
//! start. Point and sub-image reads then open the file again, seek directly to
//! the requested elements and close it before returning, so no handle outlives
//! a call and the whole data block is never loaded.
use std::{
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
};

use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;

use crate::constants::{BLOCK_LEN, CARD_LEN};
use crate::fits::bitpix::{apply_scaling, Bitpix, ImageData};
use crate::fits::card::Card;
use crate::fits::header::FitsHeader;
use crate::fits::ReadOutcome;
use crate::mwdust_errors::MwDustError;

/// Open a file for reading, mapping failures to [`MwDustError::MapFileOpen`].
pub(crate) fn open_reader(path: &Utf8Path) -> Result<BufReader<File>, MwDustError> {
    let file = File::open(path).map_err(|source| MwDustError::MapFileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("opened {path}");
    Ok(BufReader::new(file))
}

/// Read up to `n` bytes; fewer are returned only at end of file.
fn read_up_to<R: Read>(reader: &mut R, n: usize) -> Result<Vec<u8>, MwDustError> {
    let mut buf = Vec::with_capacity(n);
    reader.by_ref().take(n as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

/// Parse the header at the current position of `reader`.
///
/// Blank cards are skipped, reading stops at `END` and the rest of that block
/// is skipped. Cards with a blank label are purged and the required axis
/// cards are added when missing.
///
/// Return
/// ----------
/// * The parsed header and the byte offset where the data start.
fn parse_header<R: Read>(reader: &mut R) -> Result<(FitsHeader, u64), MwDustError> {
    let mut cards = Vec::new();
    let mut consumed = 0usize;
    let mut raw = [0u8; CARD_LEN];
    loop {
        match reader.read_exact(&mut raw) {
            Ok(()) => consumed += CARD_LEN,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(MwDustError::MissingEndCard)
            }
            Err(e) => return Err(e.into()),
        }
        let card = Card::from_raw(&raw);
        if card.is_end() {
            break;
        }
        if !card.is_blank() {
            cards.push(card);
        }
    }
    cards.push(Card::end());

    let data_offset = consumed.div_ceil(BLOCK_LEN) * BLOCK_LEN;
    let mut header = FitsHeader::from_cards(cards);
    header.purge_blank_cards();
    header.add_required_cards();
    Ok((header, data_offset as u64))
}

/// An image file whose header has been read.
///
/// See also
/// ------------
/// * [`FitsFile::read_point`] – One element by pixel coordinate.
/// * [`FitsFile::read_subimage`] – An axis-aligned box.
/// * [`read_fits`] – Header and the whole data block at once.
#[derive(Debug, Clone)]
pub struct FitsFile {
    path: Utf8PathBuf,
    header: FitsHeader,
    data_offset: u64,
}

impl FitsFile {
    /// Read only the header of `path`.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: Location of the image file.
    ///
    /// Return
    /// ----------
    /// * The opened file description, or [`MwDustError::MapFileOpen`] if the
    ///   file cannot be opened, or [`MwDustError::MissingEndCard`] if the
    ///   header is not terminated.
    pub fn open(path: &Utf8Path) -> Result<Self, MwDustError> {
        let mut reader = open_reader(path)?;
        let (header, data_offset) = parse_header(&mut reader)?;
        log::debug!(
            "{path}: {} header cards, data at byte {data_offset}",
            header.card_count()
        );
        Ok(FitsFile {
            path: path.to_path_buf(),
            header,
            data_offset,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn header(&self) -> &FitsHeader {
        &self.header
    }

    /// Axis sizes, fastest-varying first.
    pub fn axes(&self) -> Vec<usize> {
        self.header.axes()
    }

    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    fn check_inside(&self, coord: &[usize], axes: &[usize]) -> Result<(), MwDustError> {
        if coord.len() != axes.len() || coord.iter().zip(axes).any(|(c, n)| c >= n) {
            return Err(MwDustError::PixelOutOfBounds {
                coord: coord.to_vec(),
                axes: axes.to_vec(),
            });
        }
        Ok(())
    }

    /// Read the element at pixel `loc` (zero-indexed, one entry per axis).
    ///
    /// The value is scaled by `BSCALE`/`BZERO` for integer element types.
    ///
    /// Return
    /// ----------
    /// * The value and a shortfall of 1 (value 0) if the file ends before the element.
    pub fn read_point(&self, loc: &[usize]) -> Result<ReadOutcome<f32>, MwDustError> {
        let axes = self.axes();
        self.check_inside(loc, &axes)?;
        let bitpix = self.header.bitpix()?;
        let (bscale, bzero) = self.header.scaling();

        let mut stride = 1usize;
        let mut iloc = 0usize;
        for (&l, &n) in loc.iter().zip(&axes) {
            iloc += l * stride;
            stride *= n;
        }

        let mut reader = open_reader(&self.path)?;
        reader.seek(SeekFrom::Start(
            self.data_offset + (iloc * bitpix.size()) as u64,
        ))?;
        let bytes = read_up_to(&mut reader, bitpix.size())?;
        let data = ImageData::decode(bitpix, &bytes)?;

        match data.scaled(0, bscale, bzero) {
            Some(v) => Ok(ReadOutcome::new(v as f32, 0)),
            None => {
                log::warn!("{}: point {loc:?} beyond end of file", self.path);
                Ok(ReadOutcome::new(0.0, 1))
            }
        }
    }

    /// Read the box `start..=end` (inclusive on every axis).
    ///
    /// The result is dense with axis 0 varying fastest. Only the rows inside
    /// the box are read: the reader seeks from one row to the next. Elements
    /// beyond the end of the file are zero-filled and counted in the shortfall.
    ///
    /// Arguments
    /// -----------------
    /// * `start`: First pixel of the box on each axis.
    /// * `end`: Last pixel of the box on each axis.
    pub fn read_subimage(
        &self,
        start: &[usize],
        end: &[usize],
    ) -> Result<ReadOutcome<Vec<f32>>, MwDustError> {
        let axes = self.axes();
        if axes.is_empty() {
            return Ok(ReadOutcome::new(Vec::new(), 0));
        }
        self.check_inside(start, &axes)?;
        self.check_inside(end, &axes)?;
        if start.iter().zip(end).any(|(s, e)| s > e) {
            return Err(MwDustError::PixelOutOfBounds {
                coord: end.to_vec(),
                axes,
            });
        }

        let bitpix = self.header.bitpix()?;
        let (bscale, bzero) = self.header.scaling();
        let size = bitpix.size();

        let strides: Vec<usize> = axes
            .iter()
            .scan(1usize, |acc, &n| {
                let s = *acc;
                *acc *= n;
                Some(s)
            })
            .collect();
        let row_len = end[0] - start[0] + 1;
        let expected: usize = start.iter().zip(end).map(|(s, e)| e - s + 1).product();

        let rows: Vec<Vec<usize>> = if axes.len() == 1 {
            vec![vec![]]
        } else {
            // axis 1 must vary fastest among the row indices
            (1..axes.len())
                .rev()
                .map(|a| start[a]..=end[a])
                .multi_cartesian_product()
                .map(|mut idx| {
                    idx.reverse();
                    idx
                })
                .collect()
        };

        let mut reader = open_reader(&self.path)?;
        let mut values = Vec::with_capacity(expected);
        let mut nread = 0usize;
        for row in rows {
            let offset: usize = start[0]
                + row
                    .iter()
                    .zip(&strides[1..])
                    .map(|(i, s)| i * s)
                    .sum::<usize>();
            reader.seek(SeekFrom::Start(self.data_offset + (offset * size) as u64))?;
            let bytes = read_up_to(&mut reader, row_len * size)?;
            let data = ImageData::decode(bitpix, &bytes)?;
            nread += data.len();
            values.extend(data.to_f32_vec(bscale, bzero));
            values.resize(values.len() + row_len - data.len(), 0.0);
        }

        let shortfall = expected - nread;
        if shortfall > 0 {
            log::warn!(
                "{}: sub-image {start:?}..{end:?} short by {shortfall} elements",
                self.path
            );
        }
        Ok(ReadOutcome::new(values, shortfall))
    }
}

/// Header plus the complete data block, in its on-disk element type.
#[derive(Debug, Clone, PartialEq)]
pub struct FitsImage {
    pub header: FitsHeader,
    pub data: ImageData,
}

impl FitsImage {
    /// Pair a header with data, setting `BITPIX` to the data's element type.
    ///
    /// Return
    /// ----------
    /// * [`MwDustError::DataSizeMismatch`] if the axis cards disagree with the data length.
    pub fn new(mut header: FitsHeader, data: ImageData) -> Result<Self, MwDustError> {
        header.add_required_cards();
        let expected = header.element_count();
        if expected != data.len() {
            return Err(MwDustError::DataSizeMismatch {
                expected,
                found: data.len(),
            });
        }
        header.change_card_int("BITPIX", data.bitpix().code());
        Ok(FitsImage { header, data })
    }

    /// Physical value of element `i`.
    pub fn value(&self, i: usize) -> Option<f64> {
        let (bscale, bzero) = self.header.scaling();
        self.data.scaled(i, bscale, bzero)
    }

    /// `true` if element `i` equals the `BLANK` value, compared before scaling.
    pub fn is_blank(&self, i: usize) -> bool {
        match (self.header.blank_value(), self.data.raw(i)) {
            (Some(blank), Some(raw)) => raw == blank,
            _ => false,
        }
    }

    /// Convert the data to physical 32-bit floats.
    pub fn to_f32(&mut self) {
        if self.data.bitpix() == Bitpix::F32 {
            return;
        }
        let (bscale, bzero) = self.header.scaling();
        let converted = ImageData::F32(self.data.to_f32_vec(bscale, bzero));
        self.replace_data(converted, bscale, bzero);
    }

    /// Convert the data to physical values rounded to 16-bit integers.
    pub fn to_i16(&mut self) {
        if self.data.bitpix() == Bitpix::I16 {
            return;
        }
        let (bscale, bzero) = self.header.scaling();
        let converted = ImageData::I16(self.data.to_i16_vec(bscale, bzero));
        self.replace_data(converted, bscale, bzero);
    }

    fn replace_data(&mut self, converted: ImageData, bscale: f64, bzero: f64) {
        let old = self.data.bitpix();
        self.data = converted;
        self.header
            .change_card_int("BITPIX", self.data.bitpix().code());
        self.header.delete_card("BSCALE");
        self.header.delete_card("BZERO");
        if let Some(blank) = self.header.blank_value() {
            let rescaled = apply_scaling(old, blank, bscale, bzero);
            self.header.change_card_real("BLANK", rescaled);
        }
    }
}

/// Read the header and every data element of `path`.
///
/// Return
/// ----------
/// * The image in its stored element type and the number of declared
///   elements missing from the file.
pub fn read_fits(path: &Utf8Path) -> Result<ReadOutcome<FitsImage>, MwDustError> {
    let mut reader = open_reader(path)?;
    let (header, data_offset) = parse_header(&mut reader)?;
    let bitpix = header.bitpix()?;
    let expected = header.element_count();

    reader.seek(SeekFrom::Start(data_offset))?;
    let bytes = read_up_to(&mut reader, expected * bitpix.size())?;
    let data = ImageData::decode(bitpix, &bytes)?;
    let shortfall = expected - data.len();
    if shortfall > 0 {
        log::warn!("{path}: data short by {shortfall} elements");
    }
    Ok(ReadOutcome::new(FitsImage { header, data }, shortfall))
}
