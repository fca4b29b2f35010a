//! Algorithm registry: the compression and encryption identifiers carried in
//! the envelope header, plus the built-in compressor implementations.
//!
//! # Identity rules
//! Algorithm ids are written into the envelope header (`compression=` and
//! `encryption=` fields) and are frozen: `none`/`zlib` for compression,
//! `none`/`aes256` for encryption.  A reader that encounters any other id
//! MUST fail immediately, before transforming a single byte.  There is no
//! fallback and no negotiation.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde::Serialize;

use crate::error::{Error, Result};

// ── Compression ids ──────────────────────────────────────────────────────────

/// Compression algorithm applied to the dictionary blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
    Zlib,
}

impl Compression {
    /// The frozen id written into the envelope header.
    pub fn name(self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Zlib => "zlib",
        }
    }

    /// Resolve a header id.  Case-insensitive: files written by older
    /// implementations carry a capitalized `None`.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(Compression::None),
            "zlib" => Some(Compression::Zlib),
            _      => None,
        }
    }
}

// ── Encryption ids ───────────────────────────────────────────────────────────

/// Encryption algorithm applied to the dictionary blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encryption {
    None,
    Aes256,
}

impl Encryption {
    /// The frozen id written into the envelope header.
    pub fn name(self) -> &'static str {
        match self {
            Encryption::None   => "none",
            Encryption::Aes256 => "aes256",
        }
    }

    /// Resolve a header id (case-insensitive, see [`Compression::from_name`]).
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none"   => Some(Encryption::None),
            "aes256" => Some(Encryption::Aes256),
            _        => None,
        }
    }
}

// ── Compressor trait ─────────────────────────────────────────────────────────

pub trait Compressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

pub struct NoneCompressor;
impl Compressor for NoneCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> { Ok(data.to_vec()) }
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> { Ok(data.to_vec()) }
}

pub struct ZlibCompressor;
impl Compressor for ZlibCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        ZlibDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(|_| Error::DecompressionFailed)?;
        Ok(out)
    }
}

/// Resolve a [`Compression`] id to a built-in compressor.
pub fn get_compressor(id: Compression) -> Box<dyn Compressor> {
    match id {
        Compression::None => Box::new(NoneCompressor),
        Compression::Zlib => Box::new(ZlibCompressor),
    }
}
