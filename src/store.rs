//! High-level [`ConfigStore`] API — the primary embedding surface.
//!
//! ```no_run
//! use confbox::store::{ConfigStore, NewOptions};
//! use confbox::{Compression, Encryption, Value};
//!
//! let mut store = ConfigStore::with_password("app.conf", "secret");
//! store.create(NewOptions {
//!     name: "app".into(),
//!     compression: Compression::Zlib,
//!     encryption: Encryption::Aes256,
//!     ..NewOptions::default()
//! })?;
//! store.add("retries", Value::Int(3))?;
//! store.save()?;
//!
//! let mut store = ConfigStore::with_password("app.conf", "secret");
//! store.load(true)?;
//! assert_eq!(store.get("retries")?, &Value::Int(3));
//! # Ok::<(), confbox::Error>(())
//! ```
//!
//! The store owns one metadata record and one in-memory dictionary per open
//! file.  Mutations (`add`/`update`/`remove`/`import`) never touch the file;
//! only `create`/`save` write and only `load` reads.  The design assumes a
//! single owning process per file path — two concurrent writers race
//! last-writer-wins with no detection, which is a caller responsibility.

use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

use crate::codec::{Compression, Encryption};
use crate::dictionary::{self, Dictionary};
use crate::envelope::{Envelope, Metadata, DEFAULT_SEPARATOR};
use crate::error::{Error, Result};
use crate::pipeline;
use crate::value::Value;

/// Format version stamped into newly created files.
pub const FORMAT_VERSION: &str = "2.0.0";

// ── NewOptions ───────────────────────────────────────────────────────────────

/// Configuration for [`ConfigStore::create`].
#[derive(Debug, Clone)]
pub struct NewOptions {
    pub name:        String,
    pub author:      String,
    pub separator:   char,
    pub compression: Compression,
    pub encryption:  Encryption,
}

impl Default for NewOptions {
    fn default() -> Self {
        Self {
            name:        String::new(),
            author:      String::new(),
            separator:   DEFAULT_SEPARATOR,
            compression: Compression::None,
            encryption:  Encryption::None,
        }
    }
}

// ── StoreInfo ────────────────────────────────────────────────────────────────

/// Metadata summary returned by [`ConfigStore::info`].
#[derive(Debug, Clone, Serialize)]
pub struct StoreInfo {
    pub name:              String,
    pub author:            String,
    pub version:           Vec<u32>,
    pub separator:         char,
    pub compression:       Compression,
    pub encryption:        Encryption,
    pub dictionary_loaded: bool,
}

// ── ConfigStore ──────────────────────────────────────────────────────────────

pub struct ConfigStore {
    path:       PathBuf,
    password:   Option<String>,
    metadata:   Option<Metadata>,
    dictionary: Option<Dictionary>,
}

impl ConfigStore {
    // ── Constructors ─────────────────────────────────────────────────────────

    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path:       path.as_ref().to_owned(),
            password:   None,
            metadata:   None,
            dictionary: None,
        }
    }

    pub fn with_password<P: AsRef<Path>>(path: P, password: &str) -> Self {
        Self { password: Some(password.to_owned()), ..Self::new(path) }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Create a new configuration file at the store's path.
    ///
    /// Fails with [`Error::AlreadyExists`] if a file is already present.
    /// On success the store holds validated metadata and an empty
    /// dictionary, and the file has been written once.
    pub fn create(&mut self, opts: NewOptions) -> Result<()> {
        if self.path.exists() {
            return Err(Error::AlreadyExists(self.path.clone()));
        }
        let metadata = Metadata {
            name:        opts.name,
            author:      opts.author,
            version:     FORMAT_VERSION.to_string(),
            separator:   opts.separator,
            compression: opts.compression,
            encryption:  opts.encryption,
        };
        metadata.validate()?;
        self.metadata = Some(metadata);
        self.dictionary = Some(Dictionary::new());
        self.save()
    }

    /// Read the file and decode the envelope.
    ///
    /// Metadata is always populated; the dictionary is decoded through the
    /// full pipeline only when `load_dictionary` is true.
    pub fn load(&mut self, load_dictionary: bool) -> Result<()> {
        let file_text = std::fs::read_to_string(&self.path)?;
        let envelope = Envelope::decode(&file_text)?;
        debug!(
            "loaded envelope {:?} (compression={}, encryption={}, load_dictionary={})",
            envelope.metadata.name,
            envelope.metadata.compression.name(),
            envelope.metadata.encryption.name(),
            load_dictionary,
        );

        let dictionary = if load_dictionary {
            let text = pipeline::decode(&envelope.blob, &envelope.metadata, self.password.as_deref())?;
            Some(dictionary::parse(&text, envelope.metadata.separator)?)
        } else {
            None
        };

        self.metadata = Some(envelope.metadata);
        self.dictionary = dictionary;
        Ok(())
    }

    /// Re-validate metadata, run the dictionary through the full pipeline,
    /// and write the file in one pass.
    pub fn save(&mut self) -> Result<()> {
        let metadata = self.metadata.as_ref().ok_or(Error::NotLoaded)?;
        let dict = self.dictionary.as_ref().ok_or(Error::NotLoaded)?;
        metadata.validate()?;

        let text = dictionary::serialize(dict, metadata.separator);
        let blob = pipeline::encode(&text, metadata, self.password.as_deref())?;
        let envelope = Envelope { metadata: metadata.clone(), blob };
        std::fs::write(&self.path, envelope.encode()?)?;
        debug!("saved {} entr(ies) to {:?}", dict.len(), self.path);
        Ok(())
    }

    // ── Dictionary access ────────────────────────────────────────────────────

    pub fn get(&self, key: &str) -> Result<&Value> {
        let dict = self.dictionary.as_ref().ok_or(Error::NotLoaded)?;
        dict.get(key).ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    /// Add a new entry.  The key must be unused and both key and value must
    /// pass the separator-safety checks before anything is mutated.
    pub fn add(&mut self, key: &str, value: Value) -> Result<()> {
        let sep = self.metadata.as_ref().ok_or(Error::NotLoaded)?.separator;
        let dict = self.dictionary.as_mut().ok_or(Error::NotLoaded)?;
        if dict.contains_key(key) {
            return Err(Error::KeyAlreadyExists(key.to_string()));
        }
        dictionary::check_entry(key, &value, sep)?;
        dict.insert(key.to_string(), value);
        Ok(())
    }

    /// Replace the value of an existing entry.
    ///
    /// The entry's type is pinned at `add` time: the new value must carry
    /// the same type tag (and element kind for arrays).  Array updates keep
    /// the element separator the entry was created with.
    pub fn update(&mut self, key: &str, value: Value) -> Result<()> {
        let sep = self.metadata.as_ref().ok_or(Error::NotLoaded)?.separator;
        let dict = self.dictionary.as_mut().ok_or(Error::NotLoaded)?;
        let current = dict.get(key).ok_or_else(|| Error::KeyNotFound(key.to_string()))?;

        let value = match (current, value) {
            (Value::Array(old), Value::Array(mut new)) => {
                if new.kind != old.kind {
                    return Err(Error::TypeMismatch {
                        expected: old.kind.tag(),
                        found:    new.kind.tag().to_string(),
                    });
                }
                new.separator = old.separator.clone();
                Value::Array(new)
            }
            (old, new) if old.tag() == new.tag() => new,
            (old, new) => {
                return Err(Error::TypeMismatch {
                    expected: old.tag(),
                    found:    new.tag().to_string(),
                })
            }
        };

        dictionary::check_entry(key, &value, sep)?;
        dict.insert(key.to_string(), value);
        Ok(())
    }

    /// Remove an entry, returning its value.
    pub fn remove(&mut self, key: &str) -> Result<Value> {
        let dict = self.dictionary.as_mut().ok_or(Error::NotLoaded)?;
        dict.remove(key).ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    // ── Bulk access ──────────────────────────────────────────────────────────

    /// Clone out the metadata and the full dictionary.
    pub fn export(&self) -> Result<(Metadata, Dictionary)> {
        let metadata = self.metadata.as_ref().ok_or(Error::NotLoaded)?;
        let dict = self.dictionary.as_ref().ok_or(Error::NotLoaded)?;
        Ok((metadata.clone(), dict.clone()))
    }

    /// Validate every entry against the active separator, then replace the
    /// dictionary wholesale.
    pub fn import(&mut self, dictionary: Dictionary) -> Result<()> {
        let sep = self.metadata.as_ref().ok_or(Error::NotLoaded)?.separator;
        for (key, value) in &dictionary {
            crate::dictionary::check_entry(key, value, sep)?;
        }
        self.dictionary = Some(dictionary);
        Ok(())
    }

    // ── Metadata ─────────────────────────────────────────────────────────────

    pub fn info(&self) -> Result<StoreInfo> {
        let metadata = self.metadata.as_ref().ok_or(Error::NotLoaded)?;
        Ok(StoreInfo {
            name:              metadata.name.clone(),
            author:            metadata.author.clone(),
            version:           metadata.version_numbers(),
            separator:         metadata.separator,
            compression:       metadata.compression,
            encryption:        metadata.encryption,
            dictionary_loaded: self.dictionary.is_some(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
