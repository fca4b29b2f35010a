//! Envelope header ser/de and whole-file encoding.
//!
//! Decoded, the file text is:
//!
//! ```text
//! name=<name>
//! author=<author>
//! version=<dotted integers>
//! separator=<one char>
//! compression=<id>
//! encryption=<id>
//!
//! +|+DICTIONARY+|+
//! <transformed dictionary blob>
//! ```
//!
//! The whole text is base64-encoded before the file write, so the file on
//! disk holds one top-level printable block.  Decoding scans header lines by
//! recognized `field=` prefixes and tolerates unknown or blank lines; a
//! missing sentinel or required field is a hard [`Error::MalformedEnvelope`].

use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;

use crate::codec::{Compression, Encryption};
use crate::error::{Error, Result};

/// Marker line separating the header fields from the dictionary blob.
pub const SENTINEL: &str = "+|+DICTIONARY+|+";

/// Field separator used when the caller does not pick one.
pub const DEFAULT_SEPARATOR: char = '|';

// ── Metadata ─────────────────────────────────────────────────────────────────

/// The envelope header record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub name:        String,
    pub author:      String,
    pub version:     String,
    pub separator:   char,
    pub compression: Compression,
    pub encryption:  Encryption,
}

impl Metadata {
    /// Fail-fast validation gate, called before any encode/decode proceeds.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Validation("name must not be empty".into()));
        }
        for (field, text) in [("name", &self.name), ("author", &self.author)] {
            if text.contains('\n') || text.contains('\r') {
                return Err(Error::Validation(format!("{field} must not contain newlines")));
            }
        }
        let version_ok = !self.version.is_empty()
            && self.version.split('.').all(|part| part.parse::<u32>().is_ok());
        if !version_ok {
            return Err(Error::Validation(format!(
                "version must be a dotted integer sequence, got {:?}",
                self.version,
            )));
        }
        if matches!(self.separator, '\n' | '\r') {
            return Err(Error::Validation("separator must not be a newline".into()));
        }
        Ok(())
    }

    /// The `version` field parsed into its integer components.
    pub fn version_numbers(&self) -> Vec<u32> {
        self.version.split('.').filter_map(|part| part.parse().ok()).collect()
    }
}

// ── Envelope ─────────────────────────────────────────────────────────────────

/// Header fields plus the fully transformed dictionary blob line.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub metadata: Metadata,
    pub blob:     String,
}

impl Envelope {
    /// Render the envelope text and base64-encode it for the file.
    pub fn encode(&self) -> Result<String> {
        self.metadata.validate()?;
        let text = format!(
            "name={}\nauthor={}\nversion={}\nseparator={}\ncompression={}\nencryption={}\n\n{SENTINEL}\n{}\n",
            self.metadata.name,
            self.metadata.author,
            self.metadata.version,
            self.metadata.separator,
            self.metadata.compression.name(),
            self.metadata.encryption.name(),
            self.blob,
        );
        Ok(general_purpose::STANDARD.encode(text))
    }

    /// Decode a file body back into header fields and the blob line.
    pub fn decode(file_text: &str) -> Result<Self> {
        let raw = general_purpose::STANDARD
            .decode(file_text.trim().as_bytes())
            .map_err(|_| Error::MalformedEnvelope("file is not valid base64".into()))?;
        let text = String::from_utf8(raw)
            .map_err(|_| Error::MalformedEnvelope("envelope text is not valid UTF-8".into()))?;

        let mut name = None;
        let mut author = None;
        let mut version = None;
        let mut separator = None;
        let mut compression = None;
        let mut encryption = None;
        let mut blob = None;

        let mut lines = text.lines();
        while let Some(line) = lines.next() {
            if let Some(v) = line.strip_prefix("name=") {
                name = Some(v.to_string());
            } else if let Some(v) = line.strip_prefix("author=") {
                author = Some(v.to_string());
            } else if let Some(v) = line.strip_prefix("version=") {
                version = Some(v.to_string());
            } else if let Some(v) = line.strip_prefix("separator=") {
                separator = Some(v.to_string());
            } else if let Some(v) = line.strip_prefix("compression=") {
                compression = Some(v.to_string());
            } else if let Some(v) = line.strip_prefix("encryption=") {
                encryption = Some(v.to_string());
            } else if line == SENTINEL {
                blob = Some(lines.next().unwrap_or("").trim().to_string());
                break;
            }
            // Unknown and blank lines are tolerated.
        }

        let blob = blob.ok_or_else(|| {
            Error::MalformedEnvelope("missing dictionary sentinel".into())
        })?;

        let name = require(name, "name")?;
        let author = require(author, "author")?;
        let version = require(version, "version")?;
        let separator_text = require(separator, "separator")?;
        let compression_text = require(compression, "compression")?;
        let encryption_text = require(encryption, "encryption")?;

        let mut chars = separator_text.chars();
        let separator = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(Error::MalformedEnvelope(format!(
                    "separator must be a single character, got {separator_text:?}",
                )))
            }
        };

        let compression = Compression::from_name(&compression_text).ok_or(
            Error::UnsupportedAlgorithm { kind: "compression", name: compression_text },
        )?;
        let encryption = Encryption::from_name(&encryption_text).ok_or(
            Error::UnsupportedAlgorithm { kind: "encryption", name: encryption_text },
        )?;

        let metadata = Metadata { name, author, version, separator, compression, encryption };
        metadata.validate()?;
        Ok(Envelope { metadata, blob })
    }
}

fn require(field: Option<String>, name: &str) -> Result<String> {
    field.ok_or_else(|| Error::MalformedEnvelope(format!("missing required field: {name}")))
}
