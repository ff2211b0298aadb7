//! Mapping between image space and screen space.
//!
//! ## Coordinate Systems
//!
//! - **Image space** is the persisted, canonical system: inches, origin at the
//!   bottom-left of the page, y increasing upward.
//! - **Screen space** is the interactive canvas: pixels, origin at the
//!   top-left, y increasing downward.
//!
//! The page origin sits at `(offset_x, canvas_height - offset_y)` on screen.
//! A rectangle's screen top edge corresponds to its image top edge
//! (`y + height`), which is why the height shows up in the y conversion:
//!
//! ```text
//! image_x = (screen_x - offset_x) / scale
//! image_y = (H - offset_y - screen_y - screen_h) / scale
//! screen_x = image_x * scale + offset_x
//! screen_y = H - offset_y - (image_y + image_h) * scale
//! ```
//!
//! ## Border
//!
//! Boxes are drawn with a [`BORDER_WIDTH`] pixel border on every side.
//! [`ScreenRect`] always measures the full element box, border included, so
//! the transform never touches the border. Only [`VisualBox`], the content
//! box a renderer sizes, removes it.

use serde::{Deserialize, Serialize};

use super::error::LayoutError;
use super::types::{Attribute, ImageRect, Viewport};

/// Width in pixels of the decorative border drawn around each box
pub const BORDER_WIDTH: f64 = 2.0;

/// A rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A point in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The content box of a rendered element: position plus size without border
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualBox {
    pub left: f64,
    pub top: f64,
    pub content_width: f64,
    pub content_height: f64,
}

impl VisualBox {
    pub fn from_screen(rect: ScreenRect) -> Self {
        Self {
            left: rect.x,
            top: rect.y,
            content_width: rect.width - 2.0 * BORDER_WIDTH,
            content_height: rect.height - 2.0 * BORDER_WIDTH,
        }
    }

    pub fn to_screen(self) -> ScreenRect {
        ScreenRect {
            x: self.left,
            y: self.top,
            width: self.content_width + 2.0 * BORDER_WIDTH,
            height: self.content_height + 2.0 * BORDER_WIDTH,
        }
    }
}

/// Bidirectional image/screen mapping for one canvas state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    /// Pixels per image unit
    pub scale: f64,
    /// Screen x of the image origin
    pub offset_x: f64,
    /// Distance in pixels from the canvas bottom to the image origin
    pub offset_y: f64,
    /// Current pixel height of the canvas
    pub canvas_height: f64,
    figure_width: f64,
    figure_height: f64,
}

impl CoordinateTransform {
    /// Create a transform, rejecting scales that would make it non-invertible
    pub fn new(
        scale: f64,
        offset_x: f64,
        offset_y: f64,
        canvas_height: f64,
    ) -> Result<Self, LayoutError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(LayoutError::InvalidScale { scale });
        }
        Ok(Self {
            scale,
            offset_x,
            offset_y,
            canvas_height,
            figure_width: 0.0,
            figure_height: 0.0,
        })
    }

    /// Transform for a viewport; the page origin is inset by half an image
    /// unit on both axes.
    pub fn from_viewport(viewport: &Viewport) -> Result<Self, LayoutError> {
        let mut transform = Self::new(
            viewport.scale,
            viewport.scale / 2.0,
            viewport.scale / 2.0,
            viewport.height,
        )?;
        transform.figure_width = viewport.figure_width;
        transform.figure_height = viewport.figure_height;
        Ok(transform)
    }

    pub fn to_image(&self, screen: ScreenRect) -> ImageRect {
        ImageRect {
            x: (screen.x - self.offset_x) / self.scale,
            y: (self.canvas_height - self.offset_y - screen.y - screen.height) / self.scale,
            width: screen.width / self.scale,
            height: screen.height / self.scale,
        }
    }

    pub fn to_screen(&self, image: ImageRect) -> ScreenRect {
        ScreenRect {
            x: image.x * self.scale + self.offset_x,
            y: self.canvas_height - self.offset_y - (image.y + image.height) * self.scale,
            width: image.width * self.scale,
            height: image.height * self.scale,
        }
    }

    /// Outline of the page in screen space
    pub fn figure_rect(&self) -> ScreenRect {
        self.to_screen(ImageRect::new(
            0.0,
            0.0,
            self.figure_width,
            self.figure_height,
        ))
    }

    /// Point on a box where arrows touching `attr` start or end.
    pub fn attribute_anchor(&self, image: ImageRect, attr: Attribute) -> ScreenPoint {
        let r = self.to_screen(image);
        let (mid_x, mid_y) = (r.x + r.width / 2.0, r.y + r.height / 2.0);
        match attr {
            Attribute::X | Attribute::Left => ScreenPoint::new(r.x, mid_y),
            Attribute::Y | Attribute::Bottom => ScreenPoint::new(mid_x, r.y + r.height),
            Attribute::Width | Attribute::Right => ScreenPoint::new(r.x + r.width, mid_y),
            Attribute::Height | Attribute::Top => ScreenPoint::new(mid_x, r.y),
            Attribute::CenterX | Attribute::CenterY => ScreenPoint::new(mid_x, mid_y),
        }
    }
}
