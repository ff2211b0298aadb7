//! Layout model: elements, references, constraints and their evaluation
//!
//! Geometry is stored in image units. [`transform`] maps it to the screen,
//! [`constraint`] describes how attributes relate, [`solver`] applies the
//! relations and [`editor`] authors them one at a time.

pub mod constraint;
pub mod editor;
pub mod error;
pub mod reference;
pub mod solver;
pub mod transform;
pub mod types;

pub use constraint::{constraints_equal, find_cycle, BaseVariable, Constraint, Slot};
pub use editor::{ConstraintEditor, EditorState};
pub use error::{LayoutError, ReferenceError};
pub use reference::{classify, describe, AttributeRef, ModelLookup, NameLookup, NoLookup, Reference};
pub use solver::evaluate;
pub use transform::{CoordinateTransform, ScreenPoint, ScreenRect, VisualBox, BORDER_WIDTH};
pub use types::*;
