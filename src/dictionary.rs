//! Dictionary codec: the separator-delimited line grammar.
//!
//! One record per newline-terminated line (`SEP` is the single separator
//! character from the envelope header):
//!
//! ```text
//! <key>SEP<tag>SEP<payload>                                   scalar, 3 fields
//! <key>SEParrSEP<elem_tag>SEP<elem_sep>SEP<v1><elem_sep><v2>  array,  5 fields
//! ```
//!
//! Parsing is strict: a wrong field count, unknown tag, duplicate key, or
//! failed value coercion aborts the whole parse; a partial dictionary is
//! never returned.  The one deliberate exception is a fully empty blob,
//! which short-circuits to the empty dictionary.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::value::{ArrayValue, Element, ElementKind, Value};

/// The in-memory dictionary.  A `BTreeMap` keeps serialization order stable
/// within a process run without the format having to promise any order.
pub type Dictionary = BTreeMap<String, Value>;

// ── Serialization ────────────────────────────────────────────────────────────

/// Render the dictionary as the delimited text blob.
pub fn serialize(dict: &Dictionary, sep: char) -> String {
    let mut out = String::new();
    for (key, value) in dict {
        match value {
            Value::Array(arr) => {
                out.push_str(&format!(
                    "{key}{sep}arr{sep}{}{sep}{}{sep}{}\n",
                    arr.kind.tag(),
                    arr.separator,
                    arr.payload(),
                ));
            }
            scalar => {
                out.push_str(&format!(
                    "{key}{sep}{}{sep}{}\n",
                    scalar.tag(),
                    scalar.scalar_payload().unwrap_or_default(),
                ));
            }
        }
    }
    out
}

// ── Parsing ──────────────────────────────────────────────────────────────────

/// Parse a text blob back into a dictionary.
pub fn parse(text: &str, sep: char) -> Result<Dictionary> {
    let mut dict = Dictionary::new();
    if text.trim().is_empty() {
        return Ok(dict);
    }

    for line in text.lines() {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(sep).collect();
        if fields.len() < 2 {
            return Err(Error::Parse(format!("record has no type tag: {line:?}")));
        }
        let key = fields[0];
        if key.is_empty() {
            return Err(Error::Parse(format!("record has an empty key: {line:?}")));
        }

        let value = match fields[1] {
            "arr" => {
                if fields.len() != 5 {
                    return Err(Error::Parse(format!(
                        "array record must have 5 fields, found {}: {line:?}",
                        fields.len(),
                    )));
                }
                let kind = ElementKind::from_tag(fields[2])?;
                let elem_sep = fields[3];
                if elem_sep.is_empty() {
                    return Err(Error::Parse(format!(
                        "array record has an empty element separator: {line:?}",
                    )));
                }
                Value::Array(ArrayValue::decode_payload(kind, elem_sep, fields[4])?)
            }
            tag => {
                if fields.len() != 3 {
                    return Err(Error::Parse(format!(
                        "scalar record must have 3 fields, found {}: {line:?}",
                        fields.len(),
                    )));
                }
                // from_tag can never see "arr" here; the arm above owns it.
                let kind = ElementKind::from_tag(tag)?;
                Element::decode(kind, fields[2])?.into_value()
            }
        };

        if dict.insert(key.to_string(), value).is_some() {
            return Err(Error::Parse(format!("duplicate key: {key:?}")));
        }
    }
    Ok(dict)
}

// ── Producer-side validation ─────────────────────────────────────────────────

/// Reject an entry that would corrupt the line grammar, before any mutation.
///
/// Keys, serialized scalar payloads, and array separators must not contain
/// the field separator or newlines; serialized array elements must not
/// contain their own separator either.  Binary payloads are exempt: they
/// are already base64-encoded when they reach a line.
pub fn check_entry(key: &str, value: &Value, sep: char) -> Result<()> {
    if key.is_empty() {
        return Err(Error::Validation("key must not be empty".into()));
    }
    check_text("key", key, sep)?;

    match value {
        Value::Bin(_) => {}
        Value::Array(arr) => {
            if arr.separator.is_empty() {
                return Err(Error::Validation("array separator must not be empty".into()));
            }
            check_text("array separator", &arr.separator, sep)?;
            // A lone empty string element would serialize to the same payload
            // as the empty array and decode as the latter.
            if arr.elements.len() == 1
                && matches!(&arr.elements[0], Element::Str(s) if s.is_empty())
            {
                return Err(Error::Validation(
                    "a single empty string element is indistinguishable from an empty array".into(),
                ));
            }
            for elem in &arr.elements {
                if elem.kind() != arr.kind {
                    return Err(Error::TypeMismatch {
                        expected: arr.kind.tag(),
                        found:    elem.kind().tag().to_string(),
                    });
                }
                if matches!(elem, Element::Bin(_)) {
                    continue;
                }
                let encoded = elem.encode();
                check_text("array element", &encoded, sep)?;
                if encoded.contains(&arr.separator) {
                    return Err(Error::Validation(format!(
                        "array element {encoded:?} must not contain the array separator {:?}",
                        arr.separator,
                    )));
                }
            }
        }
        scalar => {
            let payload = scalar.scalar_payload().unwrap_or_default();
            check_text("value", &payload, sep)?;
        }
    }
    Ok(())
}

fn check_text(what: &str, text: &str, sep: char) -> Result<()> {
    if text.contains(sep) {
        return Err(Error::Validation(format!(
            "{what} {text:?} must not contain the separator {sep:?}",
        )));
    }
    if text.contains('\n') || text.contains('\r') {
        return Err(Error::Validation(format!("{what} {text:?} must not contain newlines")));
    }
    Ok(())
}
