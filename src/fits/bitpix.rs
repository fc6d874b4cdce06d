//! Element types and big-endian data codecs.
//!
//! Stored data are always big-endian. Decoding goes through nom's `be_*`
//! number parsers and encoding through `to_be_bytes`, so the host byte
//! order never matters.
use nom::{
    multi::many0,
    number::complete::{be_f32, be_f64, be_i16, be_i32, be_i64, be_u8},
};

use crate::mwdust_errors::MwDustError;

/// Element type code of the image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bitpix {
    U8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl Bitpix {
    pub fn from_code(code: i64) -> Result<Self, MwDustError> {
        match code {
            8 => Ok(Bitpix::U8),
            16 => Ok(Bitpix::I16),
            32 => Ok(Bitpix::I32),
            64 => Ok(Bitpix::I64),
            -32 => Ok(Bitpix::F32),
            -64 => Ok(Bitpix::F64),
            other => Err(MwDustError::InvalidBitpix(other)),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Bitpix::U8 => 8,
            Bitpix::I16 => 16,
            Bitpix::I32 => 32,
            Bitpix::I64 => 64,
            Bitpix::F32 => -32,
            Bitpix::F64 => -64,
        }
    }

    /// Bytes per element.
    pub fn size(self) -> usize {
        (self.code().unsigned_abs() / 8) as usize
    }

    /// Scale and offset only apply to integer types.
    pub fn is_integer(self) -> bool {
        self.code() > 0
    }
}

/// Typed data buffer, stored in its on-disk element type (unscaled).
#[derive(Debug, Clone, PartialEq)]
pub enum ImageData {
    U8(Vec<u8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl ImageData {
    /// Decode as many whole big-endian elements as `bytes` holds.
    pub fn decode(bitpix: Bitpix, bytes: &[u8]) -> Result<Self, MwDustError> {
        type E<'a> = nom::error::Error<&'a [u8]>;
        let data = match bitpix {
            Bitpix::U8 => ImageData::U8(many0(be_u8::<_, E<'_>>)(bytes)?.1),
            Bitpix::I16 => ImageData::I16(many0(be_i16::<_, E<'_>>)(bytes)?.1),
            Bitpix::I32 => ImageData::I32(many0(be_i32::<_, E<'_>>)(bytes)?.1),
            Bitpix::I64 => ImageData::I64(many0(be_i64::<_, E<'_>>)(bytes)?.1),
            Bitpix::F32 => ImageData::F32(many0(be_f32::<_, E<'_>>)(bytes)?.1),
            Bitpix::F64 => ImageData::F64(many0(be_f64::<_, E<'_>>)(bytes)?.1),
        };
        Ok(data)
    }

    pub fn bitpix(&self) -> Bitpix {
        match self {
            ImageData::U8(_) => Bitpix::U8,
            ImageData::I16(_) => Bitpix::I16,
            ImageData::I32(_) => Bitpix::I32,
            ImageData::I64(_) => Bitpix::I64,
            ImageData::F32(_) => Bitpix::F32,
            ImageData::F64(_) => Bitpix::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ImageData::U8(v) => v.len(),
            ImageData::I16(v) => v.len(),
            ImageData::I32(v) => v.len(),
            ImageData::I64(v) => v.len(),
            ImageData::F32(v) => v.len(),
            ImageData::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unscaled value of element `i`.
    pub fn raw(&self, i: usize) -> Option<f64> {
        match self {
            ImageData::U8(v) => v.get(i).map(|&x| x as f64),
            ImageData::I16(v) => v.get(i).map(|&x| x as f64),
            ImageData::I32(v) => v.get(i).map(|&x| x as f64),
            ImageData::I64(v) => v.get(i).map(|&x| x as f64),
            ImageData::F32(v) => v.get(i).map(|&x| x as f64),
            ImageData::F64(v) => v.get(i).copied(),
        }
    }

    /// Physical value of element `i`: `raw·bscale + bzero` for integer types.
    pub fn scaled(&self, i: usize, bscale: f64, bzero: f64) -> Option<f64> {
        let raw = self.raw(i)?;
        Some(apply_scaling(self.bitpix(), raw, bscale, bzero))
    }

    /// Every element as a physical `f32`.
    pub fn to_f32_vec(&self, bscale: f64, bzero: f64) -> Vec<f32> {
        (0..self.len())
            .filter_map(|i| self.scaled(i, bscale, bzero))
            .map(|v| v as f32)
            .collect()
    }

    /// Every element as a physical value rounded half away from zero to `i16`.
    pub fn to_i16_vec(&self, bscale: f64, bzero: f64) -> Vec<i16> {
        (0..self.len())
            .filter_map(|i| self.scaled(i, bscale, bzero))
            .map(|v| v.round() as i16)
            .collect()
    }

    /// Big-endian bytes, without block padding.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        fn flat<T, const N: usize>(v: &[T], f: impl Fn(&T) -> [u8; N]) -> Vec<u8> {
            v.iter().flat_map(f).collect()
        }
        match self {
            ImageData::U8(v) => v.clone(),
            ImageData::I16(v) => flat(v, |x| x.to_be_bytes()),
            ImageData::I32(v) => flat(v, |x| x.to_be_bytes()),
            ImageData::I64(v) => flat(v, |x| x.to_be_bytes()),
            ImageData::F32(v) => flat(v, |x| x.to_be_bytes()),
            ImageData::F64(v) => flat(v, |x| x.to_be_bytes()),
        }
    }
}

/// Apply `BSCALE`/`BZERO` to a raw value; float types are returned unchanged.
#[inline]
pub fn apply_scaling(bitpix: Bitpix, raw: f64, bscale: f64, bzero: f64) -> f64 {
    if bitpix.is_integer() {
        raw * bscale + bzero
    } else {
        raw
    }
}
