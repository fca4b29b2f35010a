//! The four-stage dictionary blob transform.
//!
//! Encode order (fixed; decode mirrors it in reverse):
//!
//! ```text
//! dict text → base64 → encrypt → compress → base64 → blob line
//! ```
//!
//! The first base64 pass guarantees the cipher only ever sees printable
//! text; the last one makes the result embeddable as a single envelope
//! line.  Stage selection is driven entirely by the [`Metadata`] algorithm
//! ids, and a stage set to `none` is skipped cleanly.

use base64::{engine::general_purpose, Engine as _};
use log::trace;

use crate::codec::{get_compressor, Encryption};
use crate::crypto;
use crate::envelope::Metadata;
use crate::error::{Error, Result};

/// Run the dictionary text forward through the pipeline.
pub fn encode(dict_text: &str, metadata: &Metadata, password: Option<&str>) -> Result<String> {
    trace!(
        "encoding dictionary blob ({} bytes, compression={}, encryption={})",
        dict_text.len(),
        metadata.compression.name(),
        metadata.encryption.name(),
    );

    let staged = general_purpose::STANDARD.encode(dict_text);

    let staged = match metadata.encryption {
        Encryption::None => staged,
        Encryption::Aes256 => {
            let password = password.ok_or(Error::MissingPassword)?;
            crypto::encrypt(&crypto::derive_key(password), &staged)
        }
    };

    let compressed = get_compressor(metadata.compression).compress(staged.as_bytes())?;
    Ok(general_purpose::STANDARD.encode(compressed))
}

/// Run a blob line backward through the pipeline, yielding dictionary text.
pub fn decode(blob: &str, metadata: &Metadata, password: Option<&str>) -> Result<String> {
    if blob.is_empty() {
        // An empty blob is a valid rendering of the empty dictionary.
        return Ok(String::new());
    }
    trace!(
        "decoding dictionary blob ({} chars, compression={}, encryption={})",
        blob.len(),
        metadata.compression.name(),
        metadata.encryption.name(),
    );

    let compressed = general_purpose::STANDARD
        .decode(blob)
        .map_err(|_| Error::MalformedEnvelope("dictionary blob is not valid base64".into()))?;

    let staged = get_compressor(metadata.compression).decompress(&compressed)?;

    let staged = match metadata.encryption {
        Encryption::None => String::from_utf8(staged)
            .map_err(|_| Error::Parse("dictionary blob is not valid UTF-8".into()))?,
        Encryption::Aes256 => {
            let password = password.ok_or(Error::MissingPassword)?;
            let text = std::str::from_utf8(&staged).map_err(|_| Error::DecryptionFailed)?;
            crypto::decrypt(&crypto::derive_key(password), text)?
        }
    };

    let plain = general_purpose::STANDARD
        .decode(staged.trim())
        .map_err(|_| Error::Parse("dictionary text is not valid base64".into()))?;
    String::from_utf8(plain).map_err(|_| Error::Parse("dictionary text is not valid UTF-8".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Compression;

    fn metadata(compression: Compression, encryption: Encryption) -> Metadata {
        Metadata {
            name:        "test".into(),
            author:      "".into(),
            version:     "2.0.0".into(),
            separator:   '|',
            compression,
            encryption,
        }
    }

    const DICT_TEXT: &str = "host|str|localhost\nport|int|8080\n";

    #[test]
    fn roundtrip_every_stage_combination() {
        let combos = [
            (Compression::None, Encryption::None, None),
            (Compression::None, Encryption::Aes256, Some("secret")),
            (Compression::Zlib, Encryption::None, None),
            (Compression::Zlib, Encryption::Aes256, Some("secret")),
        ];
        for (compression, encryption, password) in combos {
            let md = metadata(compression, encryption);
            let blob = encode(DICT_TEXT, &md, password).unwrap();
            assert_eq!(decode(&blob, &md, password).unwrap(), DICT_TEXT);
        }
    }

    #[test]
    fn empty_text_roundtrips() {
        let md = metadata(Compression::Zlib, Encryption::Aes256);
        let blob = encode("", &md, Some("pw")).unwrap();
        assert_eq!(decode(&blob, &md, Some("pw")).unwrap(), "");
    }

    #[test]
    fn empty_blob_short_circuits() {
        let md = metadata(Compression::Zlib, Encryption::Aes256);
        assert_eq!(decode("", &md, None).unwrap(), "");
    }

    #[test]
    fn missing_password_fails_before_any_transform() {
        let md = metadata(Compression::None, Encryption::Aes256);
        assert!(matches!(encode(DICT_TEXT, &md, None), Err(Error::MissingPassword)));

        let blob = encode(DICT_TEXT, &md, Some("pw")).unwrap();
        assert!(matches!(decode(&blob, &md, None), Err(Error::MissingPassword)));
    }

    #[test]
    fn corrupt_compressed_stream_is_detected() {
        let md = metadata(Compression::Zlib, Encryption::None);
        let blob = encode(DICT_TEXT, &md, None).unwrap();
        let mut bytes = general_purpose::STANDARD.decode(&blob).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;
        let tampered = general_purpose::STANDARD.encode(bytes);
        assert!(matches!(
            decode(&tampered, &md, None),
            Err(Error::DecompressionFailed)
        ));
    }

    #[test]
    fn wrong_password_is_decryption_failed() {
        let md = metadata(Compression::Zlib, Encryption::Aes256);
        let blob = encode(DICT_TEXT, &md, Some("right")).unwrap();
        assert!(matches!(
            decode(&blob, &md, Some("wrong")),
            Err(Error::DecryptionFailed)
        ));
    }
}
