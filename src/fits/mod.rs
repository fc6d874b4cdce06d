//! # Fixed-block binary image store
//!
//! Reader and writer for the 2880-byte block image format the dust maps are
//! distributed in: a header of 80-byte cards terminated by `END`, followed by
//! big-endian data, both padded to a whole number of blocks.
//!
//! ## Layout
//!
//! * [`card`] – one 80-byte card and its value decoders,
//! * [`header`] – the ordered card list with label lookup and edits,
//! * [`bitpix`] – element types and big-endian codecs,
//! * [`reader`] – header-only open, point and sub-image reads, full reads,
//! * [`writer`] – header + data serialization.
//!
//! ## Truncated files
//!
//! A data read that hits the end of the file is **not** an error: the missing
//! elements are zero-filled and their number is reported in
//! [`ReadOutcome::shortfall`].
pub mod bitpix;
pub mod card;
pub mod header;
pub mod reader;
pub mod writer;

pub use bitpix::{Bitpix, ImageData};
pub use card::Card;
pub use header::FitsHeader;
pub use reader::{read_fits, FitsFile, FitsImage};
pub use writer::write_fits;

/// Result of a data read together with the number of elements that could
/// not be read because the file ended early.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOutcome<T> {
    pub values: T,
    pub shortfall: usize,
}

impl<T> ReadOutcome<T> {
    pub fn new(values: T, shortfall: usize) -> Self {
        ReadOutcome { values, shortfall }
    }

    pub fn is_complete(&self) -> bool {
        self.shortfall == 0
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ReadOutcome<U> {
        ReadOutcome {
            values: f(self.values),
            shortfall: self.shortfall,
        }
    }
}
