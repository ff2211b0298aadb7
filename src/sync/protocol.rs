//! Request and response bodies exchanged with the resolver
//!
//! ```json
//! {
//!   "elements": [...], "constraints": [...], "constants": [...],
//!   "viewport": {"width": 1600, "height": 1000, ...},
//!   "action": "add", "new_type": "axis"
//! }
//! ```
//!
//! Action fields sit next to the payload on the top level of the request.

use serde::{Deserialize, Deserializer, Serialize};

use crate::layout::{Constant, Constraint, Element, Viewport};

/// Everything the client knows, with geometry in image units
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutPayload {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default, deserialize_with = "complete_constants")]
    pub constants: Vec<Constant>,
    #[serde(default)]
    pub viewport: Viewport,
}

/// Mutation the resolver performs before solving
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Action {
    /// No mutation, just solve
    #[default]
    Resync,
    /// Create an element of this kind, or a constant when `new_type` is `"constant"`
    Add { new_type: String },
    Delete { element_id: String },
    /// Rename and/or revalue constant `id`
    UpdateConstant { id: String, constant: Constant },
}

impl Action {
    pub fn add(new_type: impl Into<String>) -> Self {
        Self::Add {
            new_type: new_type.into(),
        }
    }

    pub fn delete(element_id: impl Into<String>) -> Self {
        Self::Delete {
            element_id: element_id.into(),
        }
    }

    pub fn update_constant(id: impl Into<String>, constant: Constant) -> Self {
        Self::UpdateConstant {
            id: id.into(),
            constant,
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::Resync => None,
            Self::Add { .. } => Some("add"),
            Self::Delete { .. } => Some("delete"),
            Self::UpdateConstant { .. } => Some("update_constant"),
        }
    }
}

/// Payload plus the action to perform
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "WireRequest", into = "WireRequest")]
pub struct LayoutRequest {
    pub payload: LayoutPayload,
    pub action: Action,
}

impl LayoutRequest {
    pub fn new(payload: LayoutPayload, action: Action) -> Self {
        Self { payload, action }
    }

    pub fn resync(payload: LayoutPayload) -> Self {
        Self::new(payload, Action::Resync)
    }
}

/// Authoritative state returned by the resolver
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default, deserialize_with = "complete_constants")]
    pub constants: Vec<Constant>,
}

/// Body of a non-success resolver response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Deserialize)]
struct PartialConstant {
    id: Option<String>,
    value: Option<f64>,
}

/// Constants without an id or value are dropped on ingestion
fn complete_constants<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Constant>, D::Error> {
    let partial = Option::<Vec<PartialConstant>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(partial
        .into_iter()
        .filter_map(|c| Some(Constant::new(c.id?, c.value?)))
        .collect())
}

#[derive(Serialize, Deserialize)]
struct WireRequest {
    #[serde(flatten)]
    payload: LayoutPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    new_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    element_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    constant: Option<Constant>,
}

impl TryFrom<WireRequest> for LayoutRequest {
    type Error = String;

    fn try_from(wire: WireRequest) -> Result<Self, Self::Error> {
        let missing = |field: &str| format!("action '{}' requires '{}'", wire.action.as_deref().unwrap_or_default(), field);
        let action = match wire.action.as_deref() {
            None => Action::Resync,
            Some("add") => Action::Add {
                new_type: wire.new_type.clone().ok_or_else(|| missing("new_type"))?,
            },
            Some("delete") => Action::Delete {
                element_id: wire.element_id.clone().ok_or_else(|| missing("element_id"))?,
            },
            Some("update_constant") => Action::UpdateConstant {
                id: wire.id.clone().ok_or_else(|| missing("id"))?,
                constant: wire.constant.clone().ok_or_else(|| missing("constant"))?,
            },
            // unrecognized actions degrade to a plain resync
            Some(_) => Action::Resync,
        };
        Ok(Self {
            payload: wire.payload,
            action,
        })
    }
}

impl From<LayoutRequest> for WireRequest {
    fn from(request: LayoutRequest) -> Self {
        let mut wire = WireRequest {
            payload: request.payload,
            action: request.action.name().map(str::to_string),
            new_type: None,
            element_id: None,
            id: None,
            constant: None,
        };
        match request.action {
            Action::Resync => {}
            Action::Add { new_type } => wire.new_type = Some(new_type),
            Action::Delete { element_id } => wire.element_id = Some(element_id),
            Action::UpdateConstant { id, constant } => {
                wire.id = Some(id);
                wire.constant = Some(constant);
            }
        }
        wire
    }
}
