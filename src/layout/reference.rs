//! Typed references used inside constraint slots
//!
//! On the wire a reference is the legacy `{id, attr}` object (or a bare
//! number) whose meaning depends on which fields are null. [`classify`]
//! turns that shape into a [`Reference`] once, at ingestion, so nothing past
//! deserialization ever inspects `id == null` again.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ReferenceError;
use super::types::{Attribute, Constant, Element};

/// Ingestion shape of a reference: a bare number or an `{id, attr}` object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawReference {
    Number(f64),
    Object {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        attr: Option<RawAttr>,
    },
}

/// The `attr` field of a wire reference, which doubles as a literal slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAttr {
    Number(f64),
    Name(String),
}

/// A specific attribute of a specific element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawReference", into = "RawReference")]
pub struct AttributeRef {
    pub id: String,
    pub attr: Attribute,
}

impl AttributeRef {
    pub fn new(id: impl Into<String>, attr: Attribute) -> Self {
        Self {
            id: id.into(),
            attr,
        }
    }
}

impl fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.id, self.attr)
    }
}

/// What a constraint slot points at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReference", into = "RawReference")]
pub enum Reference {
    Literal(f64),
    Constant(String),
    Attribute(AttributeRef),
}

/// Identity of a reference, ignoring literal values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKey<'a> {
    Literal,
    Constant(&'a str),
    Attribute(&'a str, Attribute),
}

impl Reference {
    pub fn literal(value: f64) -> Self {
        Self::Literal(value)
    }

    pub fn constant(id: impl Into<String>) -> Self {
        Self::Constant(id.into())
    }

    pub fn attribute(id: impl Into<String>, attr: Attribute) -> Self {
        Self::Attribute(AttributeRef::new(id, attr))
    }

    pub fn as_literal(&self) -> Option<f64> {
        match self {
            Self::Literal(v) => Some(*v),
            _ => None,
        }
    }

    /// True when this is exactly the literal `value`
    pub fn is_literal(&self, value: f64) -> bool {
        self.as_literal() == Some(value)
    }

    pub fn as_attribute(&self) -> Option<&AttributeRef> {
        match self {
            Self::Attribute(r) => Some(r),
            _ => None,
        }
    }

    pub fn key(&self) -> ReferenceKey<'_> {
        match self {
            Self::Literal(_) => ReferenceKey::Literal,
            Self::Constant(id) => ReferenceKey::Constant(id),
            Self::Attribute(r) => ReferenceKey::Attribute(&r.id, r.attr),
        }
    }

    /// True when the referenced element or constant is not known to `lookup`
    pub fn is_dangling(&self, lookup: &dyn NameLookup) -> bool {
        match self {
            Self::Literal(_) => false,
            Self::Constant(id) => lookup.constant_value(id).is_none(),
            Self::Attribute(r) => lookup.element_name(&r.id).is_none(),
        }
    }
}

impl From<AttributeRef> for Reference {
    fn from(r: AttributeRef) -> Self {
        Self::Attribute(r)
    }
}

impl From<f64> for Reference {
    fn from(value: f64) -> Self {
        Self::Literal(value)
    }
}

/// Normalize a wire reference into the tagged form
///
/// | `id`  | `attr`      | result                 |
/// |-------|-------------|------------------------|
/// | null  | number `n`  | `Literal(n)`           |
/// | null  | null        | `Literal(0)`           |
/// | set   | null        | `Constant(id)`         |
/// | set   | name        | `Attribute(id, name)`  |
pub fn classify(raw: RawReference) -> Result<Reference, ReferenceError> {
    match raw {
        RawReference::Number(n) => Ok(Reference::Literal(n)),
        RawReference::Object { id: None, attr: None } => Ok(Reference::Literal(0.0)),
        RawReference::Object {
            id: None,
            attr: Some(RawAttr::Number(n)),
        } => Ok(Reference::Literal(n)),
        RawReference::Object {
            id: None,
            attr: Some(RawAttr::Name(name)),
        } => name
            .trim()
            .parse::<f64>()
            .map(Reference::Literal)
            .map_err(|_| ReferenceError::OrphanAttribute { attr: name }),
        RawReference::Object {
            id: Some(id),
            attr: None,
        } => Ok(Reference::Constant(id)),
        RawReference::Object {
            id: Some(id),
            attr: Some(RawAttr::Name(name)),
        } => match Attribute::parse(&name) {
            Some(attr) => Ok(Reference::attribute(id, attr)),
            None => Err(ReferenceError::unknown_attribute(name)),
        },
        RawReference::Object {
            id: Some(_),
            attr: Some(RawAttr::Number(n)),
        } => Err(ReferenceError::unknown_attribute(format_number(n))),
    }
}

impl TryFrom<RawReference> for Reference {
    type Error = ReferenceError;

    fn try_from(raw: RawReference) -> Result<Self, Self::Error> {
        classify(raw)
    }
}

impl From<Reference> for RawReference {
    fn from(reference: Reference) -> Self {
        match reference {
            Reference::Literal(n) => RawReference::Object {
                id: None,
                attr: Some(RawAttr::Number(n)),
            },
            Reference::Constant(id) => RawReference::Object {
                id: Some(id),
                attr: None,
            },
            Reference::Attribute(r) => r.into(),
        }
    }
}

impl TryFrom<RawReference> for AttributeRef {
    type Error = ReferenceError;

    fn try_from(raw: RawReference) -> Result<Self, Self::Error> {
        match classify(raw)? {
            Reference::Attribute(r) => Ok(r),
            other => Err(ReferenceError::NotAnAttribute {
                found: describe(&other, &NoLookup),
            }),
        }
    }
}

impl From<AttributeRef> for RawReference {
    fn from(r: AttributeRef) -> Self {
        RawReference::Object {
            id: Some(r.id),
            attr: Some(RawAttr::Name(r.attr.as_str().to_string())),
        }
    }
}

/// Name and value lookups used when rendering references
pub trait NameLookup {
    /// Display name of an element, or `None` if it does not exist
    fn element_name(&self, id: &str) -> Option<&str>;

    /// Value of a constant, or `None` if it does not exist
    fn constant_value(&self, id: &str) -> Option<f64>;
}

/// Lookup that knows nothing; every reference renders by raw id
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl NameLookup for NoLookup {
    fn element_name(&self, _id: &str) -> Option<&str> {
        None
    }

    fn constant_value(&self, _id: &str) -> Option<f64> {
        None
    }
}

/// Lookup over borrowed element and constant lists
#[derive(Debug, Clone, Copy)]
pub struct ModelLookup<'a> {
    pub elements: &'a [Element],
    pub constants: &'a [Constant],
}

impl<'a> ModelLookup<'a> {
    pub fn new(elements: &'a [Element], constants: &'a [Constant]) -> Self {
        Self {
            elements,
            constants,
        }
    }
}

impl NameLookup for ModelLookup<'_> {
    fn element_name(&self, id: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.display_name())
    }

    fn constant_value(&self, id: &str) -> Option<f64> {
        self.constants.iter().find(|c| c.id == id).map(|c| c.value)
    }
}

/// Format a number the way the rest of the UI shows it (`1`, `0.5`, `-2.25`)
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

/// Human-readable label for a reference
///
/// A dangling element reference falls back to the raw id instead of failing.
pub fn describe(reference: &Reference, lookup: &dyn NameLookup) -> String {
    match reference {
        Reference::Literal(v) => format_number(*v),
        Reference::Constant(id) => id.clone(),
        Reference::Attribute(r) => {
            let name = lookup.element_name(&r.id).unwrap_or(&r.id);
            format!("{}.{}", name, r.attr)
        }
    }
}
