//! Plot Designer - constraint-based layout of plot elements on a page
//!
//! Elements (axes, titles, legends, text boxes) live in image space, inches
//! from the bottom-left of the figure. Their attributes are related by
//! linear constraints of the form
//! `target = add_after + multiply × (source + add_before)` and a resolver
//! turns the constraints into final geometry.
//!
//! # Example
//!
//! ```rust
//! use plot_designer::{constrain, resolve, Action};
//!
//! let design = r#"{"elements": [
//!     {"id": "axis-0", "type": "axis", "x": 0.5, "y": 0.5, "width": 2, "height": 1}
//! ]}"#;
//!
//! let payload = constrain(design, "axis-0.height = 0.5 * axis-0.width").unwrap();
//! let json = serde_json::to_string(&payload).unwrap();
//! let resolved = resolve(&json, Action::Resync).unwrap();
//! assert_eq!(resolved.elements[0].height, 1.0);
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod parser;
pub mod selection;
pub mod session;
pub mod sync;

pub use config::{ConfigError, DesignerConfig};
pub use error::ParseError;
pub use layout::{Constraint, LayoutError, Reference};
pub use parser::parse_constraint;
pub use session::Session;
pub use sync::{Action, LayoutPayload, LayoutResponse, SyncError, TransferError};

use thiserror::Error;

use sync::transfer::read_design;
use sync::{LayoutRequest, LocalResolver};

/// Errors that can occur in the one-shot design pipeline
#[derive(Debug, Error)]
pub enum DesignError {
    /// Input is neither a JSON payload nor a valid blob
    #[error("invalid design: {0}")]
    Input(#[from] TransferError),

    /// Error while parsing a textual constraint
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error while editing the layout model
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Error from the resolver
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),
}

impl From<Vec<ParseError>> for DesignError {
    fn from(errors: Vec<ParseError>) -> Self {
        DesignError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Resolve a design (JSON or base64 blob) with the in-process resolver
pub fn resolve(input: &str, action: Action) -> Result<LayoutResponse, DesignError> {
    let payload = read_design(input)?;
    let response = LocalResolver.resolve_now(&LayoutRequest::new(payload, action))?;
    Ok(response)
}

/// Add a textual constraint to a design, replacing any constraint on the same target
pub fn constrain(input: &str, expr: &str) -> Result<LayoutPayload, DesignError> {
    let constraint = parse_constraint(expr)?;
    let mut session = Session::from_payload(read_design(input)?);
    session.add_constraint(constraint)?;
    Ok(session.build_payload())
}
