//! Core types for the layout model
//!
//! Geometry held here is always in image units (inches, origin bottom-left,
//! y increasing upward). Screen-space values only exist transiently, see
//! [`crate::layout::transform`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of plot element placed on the page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    Axis,
    Title,
    Legend,
    Text,
    /// Any kind this crate has no special knowledge of
    Other(String),
}

impl ElementKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Axis => "axis",
            Self::Title => "title",
            Self::Legend => "legend",
            Self::Text => "text",
            Self::Other(name) => name,
        }
    }

    /// Kinds the local resolver knows how to create
    pub fn creatable() -> &'static [ElementKind] {
        &[Self::Axis, Self::Title, Self::Legend, Self::Text]
    }
}

impl From<String> for ElementKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "axis" => Self::Axis,
            "title" => Self::Title,
            "legend" => Self::Legend,
            "text" => Self::Text,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ElementKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An axis-aligned rectangle in image units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ImageRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A labeled plot element on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Element {
    pub fn new(id: impl Into<String>, kind: ElementKind, rect: ImageRect) -> Self {
        Self {
            id: id.into(),
            kind,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn rect(&self) -> ImageRect {
        ImageRect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, rect: ImageRect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Name shown to the user: the display text, or the id when there is none
    pub fn display_name(&self) -> &str {
        match self.text.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => &self.id,
        }
    }
}

/// A named numeric value that constraints can reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub id: String,
    pub value: f64,
}

impl Constant {
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

/// The four stored geometry fields of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseAttribute {
    X,
    Y,
    Width,
    Height,
}

impl BaseAttribute {
    pub fn as_attribute(self) -> Attribute {
        match self {
            Self::X => Attribute::X,
            Self::Y => Attribute::Y,
            Self::Width => Attribute::Width,
            Self::Height => Attribute::Height,
        }
    }
}

/// An element attribute a constraint can target or read
///
/// `x`, `y`, `width` and `height` are stored directly. The remaining
/// attributes are derived from them:
///
/// | attribute  | value              | assigning moves |
/// |------------|--------------------|-----------------|
/// | `left`     | `x`                | `x`             |
/// | `bottom`   | `y`                | `y`             |
/// | `right`    | `x + width`        | `x`             |
/// | `top`      | `y + height`       | `y`             |
/// | `center_x` | `x + width / 2`    | `x`             |
/// | `center_y` | `y + height / 2`   | `y`             |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    X,
    Y,
    Width,
    Height,
    Left,
    Bottom,
    Right,
    Top,
    CenterX,
    CenterY,
}

impl Attribute {
    pub const ALL: [Attribute; 10] = [
        Self::X,
        Self::Y,
        Self::Width,
        Self::Height,
        Self::Left,
        Self::Bottom,
        Self::Right,
        Self::Top,
        Self::CenterX,
        Self::CenterY,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Left => "left",
            Self::Bottom => "bottom",
            Self::Right => "right",
            Self::Top => "top",
            Self::CenterX => "center_x",
            Self::CenterY => "center_y",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.as_str() == name)
    }

    pub fn value(self, element: &Element) -> f64 {
        match self {
            Self::X | Self::Left => element.x,
            Self::Y | Self::Bottom => element.y,
            Self::Width => element.width,
            Self::Height => element.height,
            Self::Right => element.x + element.width,
            Self::Top => element.y + element.height,
            Self::CenterX => element.x + element.width / 2.0,
            Self::CenterY => element.y + element.height / 2.0,
        }
    }

    /// Write `value` through this attribute, moving the base position for
    /// derived attributes and leaving the size alone.
    pub fn assign(self, element: &mut Element, value: f64) {
        match self {
            Self::X | Self::Left => element.x = value,
            Self::Y | Self::Bottom => element.y = value,
            Self::Width => element.width = value,
            Self::Height => element.height = value,
            Self::Right => element.x = value - element.width,
            Self::Top => element.y = value - element.height,
            Self::CenterX => element.x = value - element.width / 2.0,
            Self::CenterY => element.y = value - element.height / 2.0,
        }
    }

    /// Base attribute modified by [`Attribute::assign`]
    pub fn writes(self) -> BaseAttribute {
        match self {
            Self::X | Self::Left | Self::Right | Self::CenterX => BaseAttribute::X,
            Self::Y | Self::Bottom | Self::Top | Self::CenterY => BaseAttribute::Y,
            Self::Width => BaseAttribute::Width,
            Self::Height => BaseAttribute::Height,
        }
    }

    /// Base attributes read by [`Attribute::value`]
    pub fn reads(self) -> &'static [BaseAttribute] {
        match self {
            Self::X | Self::Left => &[BaseAttribute::X],
            Self::Y | Self::Bottom => &[BaseAttribute::Y],
            Self::Width => &[BaseAttribute::Width],
            Self::Height => &[BaseAttribute::Height],
            Self::Right | Self::CenterX => &[BaseAttribute::X, BaseAttribute::Width],
            Self::Top | Self::CenterY => &[BaseAttribute::Y, BaseAttribute::Height],
        }
    }

    /// Base attributes [`Attribute::assign`] needs to already be final
    pub fn assign_reads(self) -> &'static [BaseAttribute] {
        match self {
            Self::Right | Self::CenterX => &[BaseAttribute::Width],
            Self::Top | Self::CenterY => &[BaseAttribute::Height],
            _ => &[],
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canvas metrics the coordinate transform is derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Visible canvas width in screen pixels
    pub width: f64,
    /// Visible canvas height in screen pixels
    pub height: f64,
    /// Pixels per image unit
    #[serde(default = "Viewport::default_scale")]
    pub scale: f64,
    #[serde(rename = "figureWidth", default = "Viewport::default_figure_width")]
    pub figure_width: f64,
    #[serde(rename = "figureHeight", default = "Viewport::default_figure_height")]
    pub figure_height: f64,
}

impl Viewport {
    fn default_scale() -> f64 {
        200.0
    }

    fn default_figure_width() -> f64 {
        7.0
    }

    fn default_figure_height() -> f64 {
        5.0
    }

    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_figure_size(mut self, width: f64, height: f64) -> Self {
        self.figure_width = width;
        self.figure_height = height;
        self
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 1000.0,
            scale: Self::default_scale(),
            figure_width: Self::default_figure_width(),
            figure_height: Self::default_figure_height(),
        }
    }
}
