//! Resolvers: where a layout request gets solved
//!
//! [`HttpResolver`] talks to the layout service over HTTP. [`LocalResolver`]
//! does the same work in process and is a pure function of its input.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, warn};

use super::protocol::{Action, ErrorBody, LayoutRequest, LayoutResponse};
use super::SyncError;
use crate::layout::{evaluate, Constant, Constraint, Element, ElementKind, ImageRect};

#[async_trait]
pub trait Resolver: Send + Sync {
    /// Solve `request` and return the authoritative layout
    async fn resolve(&self, request: &LayoutRequest) -> Result<LayoutResponse, SyncError>;
}

// ============================================================================
// HTTP
// ============================================================================

/// Resolver reached by a JSON POST
#[derive(Debug, Clone)]
pub struct HttpResolver {
    client: Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl HttpResolver {
    pub const DEFAULT_ENDPOINT: &'static str = "http://127.0.0.1:8080/api/update_layout";

    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for HttpResolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl Resolver for HttpResolver {
    async fn resolve(&self, request: &LayoutRequest) -> Result<LayoutResponse, SyncError> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        debug!(endpoint = %self.endpoint, action = ?request.action.name(), "posting layout");
        let response = builder
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(SyncError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<LayoutResponse>()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))
    }
}

// ============================================================================
// In process
// ============================================================================

/// Resolver running the layout service's semantics locally
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalResolver;

impl LocalResolver {
    pub fn new() -> Self {
        Self
    }

    /// Apply the action, evaluate the constraints and return the result
    pub fn resolve_now(&self, request: &LayoutRequest) -> Result<LayoutResponse, SyncError> {
        let mut elements = request.payload.elements.clone();
        let mut constants = request.payload.constants.clone();
        let mut constraints = request.payload.constraints.clone();

        apply_action(&request.action, &mut elements, &mut constants, &mut constraints)?;

        let elements = evaluate(&elements, &constraints, &constants)
            .map_err(|e| SyncError::Rejected(e.to_string()))?;

        Ok(LayoutResponse {
            elements,
            constraints,
            constants,
        })
    }
}

#[async_trait]
impl Resolver for LocalResolver {
    async fn resolve(&self, request: &LayoutRequest) -> Result<LayoutResponse, SyncError> {
        self.resolve_now(request)
    }
}

fn apply_action(
    action: &Action,
    elements: &mut Vec<Element>,
    constants: &mut Vec<Constant>,
    constraints: &mut [Constraint],
) -> Result<(), SyncError> {
    match action {
        Action::Resync => {}
        Action::Add { new_type } if new_type == "constant" => {
            let id = unique_id("constant", elements, constants);
            debug!(%id, "adding constant");
            constants.push(Constant::new(id, 0.0));
        }
        Action::Add { new_type } => {
            let kind = ElementKind::from(new_type.as_str());
            if !ElementKind::creatable().contains(&kind) {
                return Err(SyncError::Rejected(format!(
                    "cannot add element of type '{}'",
                    new_type
                )));
            }
            let id = unique_id(&format!("{}-", kind), elements, constants);
            let offset = 0.1 * elements.len() as f64;
            debug!(%id, "adding element");
            elements.push(
                Element::new(id.clone(), kind, ImageRect::new(offset, offset, 1.0, 1.0)).with_text(id),
            );
        }
        Action::Delete { element_id } => {
            let before = elements.len();
            elements.retain(|e| &e.id != element_id);
            if elements.len() == before {
                debug!(%element_id, "delete of unknown element ignored");
            }
        }
        Action::UpdateConstant { id, constant } => {
            update_constant(id, constant, constants, constraints);
        }
    }
    Ok(())
}

fn update_constant(id: &str, update: &Constant, constants: &mut [Constant], constraints: &mut [Constraint]) {
    if update.id != id && constants.iter().any(|c| c.id == update.id) {
        warn!(from = id, to = %update.id, "constant id already taken, update refused");
        return;
    }
    let Some(existing) = constants.iter_mut().find(|c| c.id == id) else {
        debug!(id, "update of unknown constant ignored");
        return;
    };
    existing.id = update.id.clone();
    existing.value = update.value;

    if update.id != id {
        let renamed = constraints
            .iter_mut()
            .map(|c| c.rename_constant(id, &update.id))
            .filter(|&changed| changed)
            .count();
        debug!(from = id, to = %update.id, renamed, "constant renamed");
    }
}

/// Lowest `<prefix><n>` not used by any element or constant
fn unique_id(prefix: &str, elements: &[Element], constants: &[Constant]) -> String {
    let taken: HashSet<&str> = elements
        .iter()
        .map(|e| e.id.as_str())
        .chain(constants.iter().map(|c| c.id.as_str()))
        .collect();
    let mut n = 0usize;
    loop {
        let candidate = format!("{}{}", prefix, n);
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}
