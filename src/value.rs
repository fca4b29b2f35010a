//! Typed value model for dictionary entries.
//!
//! # Wire tags
//! Every entry carries a type tag on disk: `str`, `int`, `float`, `bool`,
//! `bin`, or `arr`.  Array entries additionally carry an element tag (any
//! tag except `arr`; nesting is rejected) and an element separator.
//!
//! Scalar payload encoding:
//!   - booleans are stored as the single digit `1` or `0`;
//!   - binary values are base64-encoded so they can never collide with the
//!     field separator;
//!   - integers and floats use their standard decimal rendering.

use base64::{engine::general_purpose, Engine as _};

use crate::error::{Error, Result};

// ── Element kinds ────────────────────────────────────────────────────────────

/// Type of the elements inside an array entry.
///
/// Arrays of arrays are not representable: the `arr` tag is rejected in
/// element-kind position with [`Error::UnsupportedNesting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Str,
    Int,
    Float,
    Bool,
    Bin,
}

impl ElementKind {
    /// The wire tag written into array header fields.
    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Str   => "str",
            ElementKind::Int   => "int",
            ElementKind::Float => "float",
            ElementKind::Bool  => "bool",
            ElementKind::Bin   => "bin",
        }
    }

    /// Parse a wire tag found in element-kind position.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "str"   => Ok(ElementKind::Str),
            "int"   => Ok(ElementKind::Int),
            "float" => Ok(ElementKind::Float),
            "bool"  => Ok(ElementKind::Bool),
            "bin"   => Ok(ElementKind::Bin),
            "arr"   => Err(Error::UnsupportedNesting),
            other   => Err(Error::UnsupportedType(other.to_string())),
        }
    }
}

// ── Elements ─────────────────────────────────────────────────────────────────

/// A single array element.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Bin(Vec<u8>),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Str(_)   => ElementKind::Str,
            Element::Int(_)   => ElementKind::Int,
            Element::Float(_) => ElementKind::Float,
            Element::Bool(_)  => ElementKind::Bool,
            Element::Bin(_)   => ElementKind::Bin,
        }
    }

    /// Wire text for this element.
    pub fn encode(&self) -> String {
        match self {
            Element::Str(s)   => s.clone(),
            Element::Int(i)   => i.to_string(),
            Element::Float(f) => f.to_string(),
            Element::Bool(b)  => if *b { "1" } else { "0" }.to_string(),
            Element::Bin(b)   => general_purpose::STANDARD.encode(b),
        }
    }

    /// Decode wire text under a known element kind.
    pub fn decode(kind: ElementKind, text: &str) -> Result<Self> {
        match kind {
            ElementKind::Str => Ok(Element::Str(text.to_string())),
            ElementKind::Int => text
                .parse::<i64>()
                .map(Element::Int)
                .map_err(|_| Error::TypeMismatch { expected: "int", found: text.to_string() }),
            ElementKind::Float => text
                .parse::<f64>()
                .map(Element::Float)
                .map_err(|_| Error::TypeMismatch { expected: "float", found: text.to_string() }),
            ElementKind::Bool => match text {
                "1"   => Ok(Element::Bool(true)),
                "0"   => Ok(Element::Bool(false)),
                other => Err(Error::InvalidBooleanState(other.to_string())),
            },
            ElementKind::Bin => general_purpose::STANDARD
                .decode(text)
                .map(Element::Bin)
                .map_err(|_| Error::TypeMismatch { expected: "bin", found: text.to_string() }),
        }
    }

    /// Promote an element to a scalar [`Value`] of the same kind.
    pub fn into_value(self) -> Value {
        match self {
            Element::Str(s)   => Value::Str(s),
            Element::Int(i)   => Value::Int(i),
            Element::Float(f) => Value::Float(f),
            Element::Bool(b)  => Value::Bool(b),
            Element::Bin(b)   => Value::Bin(b),
        }
    }
}

// ── Arrays ───────────────────────────────────────────────────────────────────

/// An ordered, homogeneous sequence of elements with its own separator.
///
/// The element separator is stored in the entry's header fields on disk, so
/// two arrays in the same file may use different separators.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    pub kind:      ElementKind,
    pub separator: String,
    pub elements:  Vec<Element>,
}

impl ArrayValue {
    /// Join the elements into the wire payload.  An empty array produces an
    /// empty payload.
    pub fn payload(&self) -> String {
        self.elements
            .iter()
            .map(Element::encode)
            .collect::<Vec<_>>()
            .join(&self.separator)
    }

    /// Split a wire payload back into elements.
    ///
    /// An empty payload decodes as the empty array.  A single empty `str`
    /// element is therefore indistinguishable from an empty array on the
    /// wire and decodes as the latter.
    pub fn decode_payload(kind: ElementKind, separator: &str, payload: &str) -> Result<Self> {
        let elements = if payload.is_empty() {
            Vec::new()
        } else {
            payload
                .split(separator)
                .map(|text| Element::decode(kind, text))
                .collect::<Result<Vec<_>>>()?
        };
        Ok(ArrayValue {
            kind,
            separator: separator.to_string(),
            elements,
        })
    }
}

// ── Values ───────────────────────────────────────────────────────────────────

/// A typed dictionary entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Bin(Vec<u8>),
    Array(ArrayValue),
}

impl Value {
    /// The wire tag written into the entry's type field.
    pub fn tag(&self) -> &'static str {
        match self {
            Value::Str(_)   => "str",
            Value::Int(_)   => "int",
            Value::Float(_) => "float",
            Value::Bool(_)  => "bool",
            Value::Bin(_)   => "bin",
            Value::Array(_) => "arr",
        }
    }

    /// Wire payload for scalar variants; `None` for arrays, which render
    /// through [`ArrayValue::payload`] instead.
    pub fn scalar_payload(&self) -> Option<String> {
        match self {
            Value::Str(s)   => Some(s.clone()),
            Value::Int(i)   => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Bool(b)  => Some(if *b { "1" } else { "0" }.to_string()),
            Value::Bin(b)   => Some(general_purpose::STANDARD.encode(b)),
            Value::Array(_) => None,
        }
    }
}
