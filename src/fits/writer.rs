//! Writing header and data blocks.
use std::{
    fs::File,
    io::{BufWriter, Write},
};

use camino::Utf8Path;

use crate::constants::BLOCK_LEN;
use crate::fits::card::Card;
use crate::fits::reader::FitsImage;
use crate::mwdust_errors::MwDustError;

/// Write `image` to `path`.
///
/// The header cards are written first (an `END` card is appended if the
/// header has none), blank padded to a multiple of 2880 bytes, then the data
/// in big-endian order, zero padded to a multiple of 2880 bytes.
///
/// Arguments
/// -----------------
/// * `path`: Destination file, created or truncated.
/// * `image`: Header and data to store.
///
/// Return
/// ----------
/// * The number of bytes written.
pub fn write_fits(path: &Utf8Path, image: &FitsImage) -> Result<usize, MwDustError> {
    let mut header = image.header.clone();
    if header.find_card("END").is_none() {
        header.add_card(Card::end());
    }
    let expected = header.element_count();
    if expected != image.data.len() {
        return Err(MwDustError::DataSizeMismatch {
            expected,
            found: image.data.len(),
        });
    }

    let mut out = BufWriter::new(File::create(path)?);
    let head = header.to_bytes();
    out.write_all(&head)?;

    let mut data = image.data.to_be_bytes();
    let padded = data.len().div_ceil(BLOCK_LEN) * BLOCK_LEN;
    data.resize(padded, 0);
    out.write_all(&data)?;
    out.flush()?;

    log::debug!(
        "wrote {path}: {} header bytes, {} data bytes",
        head.len(),
        data.len()
    );
    Ok(head.len() + data.len())
}
