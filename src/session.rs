//! Editing session: the in-memory store every view reads from
//!
//! A [`Session`] owns the elements, constraints and constants of one
//! layout together with the viewport, the current selection, the pick
//! mailbox and the constraint editor. Geometry is kept in image units;
//! screen rectangles are derived through [`Session::transform`] on demand.
//!
//! The resolver is authoritative. Local edits are applied right away and
//! then replaced by whatever the next accepted response says.

use tracing::{debug, info, warn};

use crate::layout::{
    describe, evaluate, Attribute, AttributeRef, Constant, Constraint, ConstraintEditor,
    CoordinateTransform, Element, ImageRect, LayoutError, NameLookup, Reference, ScreenPoint,
    ScreenRect, Slot, Viewport, VisualBox,
};
use crate::selection::{Pick, PickMailbox};
use crate::sync::cache::{CacheError, LocalCache};
use crate::sync::transfer::{self, TransferError};
use crate::sync::{Action, LayoutPayload, LayoutRequest, LayoutResponse, Resolver, SyncError};

/// A request ready to send, tagged with its sequence number
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSync {
    pub seq: u64,
    pub request: LayoutRequest,
}

/// Outcome of feeding a response back into the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    Applied,
    /// A newer response was already applied; this one was dropped
    Stale,
}

/// Screen-space arrow from an operand attribute to the attribute it constrains
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintArrow {
    /// Index into [`Session::constraints`]
    pub constraint: usize,
    pub slot: Slot,
    pub from: ScreenPoint,
    pub to: ScreenPoint,
}

#[derive(Debug, Default)]
pub struct Session {
    elements: Vec<Element>,
    constraints: Vec<Constraint>,
    constants: Vec<Constant>,
    viewport: Viewport,
    selected: Option<String>,
    mailbox: PickMailbox,
    editor: ConstraintEditor,
    next_seq: u64,
    applied_seq: u64,
    cache: Option<LocalCache>,
}

impl Session {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Session seeded from a payload, viewport included
    pub fn from_payload(payload: LayoutPayload) -> Self {
        let mut session = Self::new(payload.viewport);
        session.elements = payload.elements;
        session.constraints = payload.constraints;
        session.constants = payload.constants;
        session
    }

    pub fn with_cache(mut self, cache: LocalCache) -> Self {
        self.cache = Some(cache);
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    pub fn constant(&self, id: &str) -> Option<&Constant> {
        self.constants.iter().find(|c| c.id == id)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn cache(&self) -> Option<&LocalCache> {
        self.cache.as_ref()
    }

    pub fn cache_mut(&mut self) -> Option<&mut LocalCache> {
        self.cache.as_mut()
    }

    pub fn transform(&self) -> Result<CoordinateTransform, LayoutError> {
        CoordinateTransform::from_viewport(&self.viewport)
    }

    fn element_mut(&mut self, id: &str) -> Result<&mut Element, LayoutError> {
        self.elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| LayoutError::undefined(id))
    }

    fn require_element(&self, id: &str) -> Result<&Element, LayoutError> {
        self.element(id).ok_or_else(|| LayoutError::undefined(id))
    }

    // ------------------------------------------------------------------
    // Geometry and canvas
    // ------------------------------------------------------------------

    /// Move or resize an element from a screen rectangle
    pub fn drag_element(&mut self, id: &str, rect: ScreenRect) -> Result<(), LayoutError> {
        let image = self.transform()?.to_image(rect);
        self.element_mut(id)?.set_rect(image);
        Ok(())
    }

    pub fn set_geometry(&mut self, id: &str, rect: ImageRect) -> Result<(), LayoutError> {
        self.element_mut(id)?.set_rect(rect);
        Ok(())
    }

    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> Result<(), LayoutError> {
        self.element_mut(id)?.text = Some(text.into());
        Ok(())
    }

    pub fn screen_rect(&self, id: &str) -> Result<ScreenRect, LayoutError> {
        let element = self.require_element(id)?;
        Ok(self.transform()?.to_screen(element.rect()))
    }

    pub fn visual_box(&self, id: &str) -> Result<VisualBox, LayoutError> {
        self.screen_rect(id).map(VisualBox::from_screen)
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<(), LayoutError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(LayoutError::InvalidScale { scale });
        }
        self.viewport.scale = scale;
        Ok(())
    }

    pub fn resize_canvas(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn set_figure_size(&mut self, width: f64, height: f64) {
        self.viewport.figure_width = width;
        self.viewport.figure_height = height;
    }

    // ------------------------------------------------------------------
    // Constants and constraints
    // ------------------------------------------------------------------

    pub fn upsert_constant(&mut self, id: &str, value: f64) {
        match self.constants.iter_mut().find(|c| c.id == id) {
            Some(constant) => constant.value = value,
            None => self.constants.push(Constant::new(id, value)),
        }
    }

    /// Rename a constant and every reference to it
    ///
    /// Refused (returns false) when `old` does not exist or `new` names
    /// another constant.
    pub fn rename_constant(&mut self, old: &str, new: &str) -> bool {
        if old != new && self.constant(new).is_some() {
            warn!(from = old, to = new, "constant id already taken, rename refused");
            return false;
        }
        let Some(constant) = self.constants.iter_mut().find(|c| c.id == old) else {
            return false;
        };
        constant.id = new.to_string();
        for constraint in &mut self.constraints {
            constraint.rename_constant(old, new);
        }
        true
    }

    /// Remove a constant; constraints referencing it are kept and dangle
    pub fn remove_constant(&mut self, id: &str) -> bool {
        let before = self.constants.len();
        self.constants.retain(|c| c.id != id);
        self.constants.len() != before
    }

    /// Remove the first constraint identical to `constraint`
    pub fn remove_constraint(&mut self, constraint: &Constraint) -> bool {
        match self.constraints.iter().position(|c| c.same_as(constraint)) {
            Some(i) => {
                self.constraints.remove(i);
                true
            }
            None => false,
        }
    }

    /// Add a constraint, replacing any other constraint on the same target
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<Constraint, LayoutError> {
        let mut editor = ConstraintEditor::new();
        editor.open_existing(&constraint);
        editor.apply(&mut self.constraints)
    }

    /// Pin an attribute to its current value
    pub fn lock_attribute(&mut self, id: &str, attr: Attribute) -> Result<Constraint, LayoutError> {
        let value = attr.value(self.require_element(id)?);
        self.add_constraint(Constraint::lock(AttributeRef::new(id, attr), value))
    }

    // ------------------------------------------------------------------
    // Constraint editing
    // ------------------------------------------------------------------

    pub fn editor(&self) -> &ConstraintEditor {
        &self.editor
    }

    pub fn edit_constraint(&mut self, target: AttributeRef) {
        self.editor.open(target, &self.constraints);
    }

    pub fn edit_existing(&mut self, constraint: &Constraint) {
        self.editor.open_existing(constraint);
    }

    pub fn set_draft_slot(&mut self, slot: Slot, reference: Reference) -> Result<(), LayoutError> {
        self.editor.set_slot(slot, reference)
    }

    /// Let the next click fill `slot` of the open draft
    pub fn pick_for_slot(&mut self, slot: Slot, attr: Attribute) -> Result<(), LayoutError> {
        self.editor.pick_slot(&mut self.mailbox, slot, attr)
    }

    pub fn apply_edit(&mut self) -> Result<Constraint, LayoutError> {
        self.editor.apply(&mut self.constraints)
    }

    pub fn cancel_edit(&mut self) -> bool {
        self.editor.cancel()
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_string);
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn mailbox(&mut self) -> &mut PickMailbox {
        &mut self.mailbox
    }

    /// Canvas click: answers a pending pick, otherwise selects the element.
    /// Returns whether a pick consumed the click.
    pub fn click_element(&mut self, id: &str) -> bool {
        if self.mailbox.submit_pick(Pick::Element(id.to_string())) {
            return true;
        }
        self.select(Some(id));
        false
    }

    /// Constant list click: answers a pending pick, otherwise does nothing
    pub fn click_constant(&mut self, id: &str) -> bool {
        self.mailbox.submit_pick(Pick::Constant(id.to_string()))
    }

    pub fn cancel_pick(&mut self) -> bool {
        self.mailbox.cancel_pick()
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn constraint_descriptions(&self) -> Vec<String> {
        self.constraints.iter().map(|c| c.describe(self)).collect()
    }

    pub fn constant_descriptions(&self) -> Vec<String> {
        self.constants
            .iter()
            .map(|c| format!("{} = {}", c.id, describe(&Reference::Literal(c.value), self)))
            .collect()
    }

    /// One arrow per element operand whose both ends exist
    pub fn constraint_arrows(&self) -> Result<Vec<ConstraintArrow>, LayoutError> {
        let transform = self.transform()?;
        let mut arrows = Vec::new();
        for (index, constraint) in self.constraints.iter().enumerate() {
            let Some(target) = self.element(&constraint.target.id) else {
                continue;
            };
            let to = transform.attribute_anchor(target.rect(), constraint.target.attr);
            for (slot, reference) in constraint.operands() {
                let Some(operand) = reference.as_attribute() else {
                    continue;
                };
                let Some(source) = self.element(&operand.id) else {
                    continue;
                };
                arrows.push(ConstraintArrow {
                    constraint: index,
                    slot,
                    from: transform.attribute_anchor(source.rect(), operand.attr),
                    to,
                });
            }
        }
        Ok(arrows)
    }

    /// Local evaluation of the current constraints; nothing is stored
    pub fn preview(&self) -> Result<Vec<Element>, LayoutError> {
        evaluate(&self.elements, &self.constraints, &self.constants)
    }

    // ------------------------------------------------------------------
    // Sync
    // ------------------------------------------------------------------

    pub fn build_payload(&self) -> LayoutPayload {
        LayoutPayload {
            elements: self.elements.clone(),
            constraints: self.constraints.clone(),
            constants: self.constants.clone(),
            viewport: self.viewport,
        }
    }

    /// Snapshot the session into a numbered request
    pub fn prepare(&mut self, action: Action) -> PendingSync {
        self.next_seq += 1;
        debug!(seq = self.next_seq, action = ?action.name(), "sync prepared");
        PendingSync {
            seq: self.next_seq,
            request: LayoutRequest::new(self.build_payload(), action),
        }
    }

    /// Replace local state with a response unless a newer one was applied
    pub fn reconcile(&mut self, seq: u64, response: LayoutResponse) -> Reconciled {
        if seq <= self.applied_seq {
            debug!(seq, applied = self.applied_seq, "stale response dropped");
            return Reconciled::Stale;
        }
        self.applied_seq = seq;
        self.elements = response.elements;
        self.constraints = response.constraints;
        self.constants = response.constants;

        if let Some(selected) = self.selected.as_deref() {
            if self.element(selected).is_none() {
                self.selected = None;
            }
        }

        self.autosave();
        debug!(seq, elements = self.elements.len(), "response applied");
        Reconciled::Applied
    }

    /// Round trip through `resolver`; on failure local state is untouched
    pub async fn submit<R>(&mut self, resolver: &R, action: Action) -> Result<Reconciled, SyncError>
    where
        R: Resolver + ?Sized,
    {
        let pending = self.prepare(action);
        match resolver.resolve(&pending.request).await {
            Ok(response) => Ok(self.reconcile(pending.seq, response)),
            Err(e) => {
                warn!(seq = pending.seq, error = %e, "layout sync failed");
                Err(e)
            }
        }
    }

    fn autosave(&self) {
        let Some(cache) = self.cache.as_ref().filter(|c| c.autosave_enabled()) else {
            return;
        };
        if let Err(e) = cache.store(&self.build_payload()) {
            warn!(error = %e, "could not write layout cache");
        }
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Seed the model from the cache without contacting a resolver
    ///
    /// The viewport belongs to the current canvas and is kept.
    pub fn restore_from_cache(&mut self) -> Result<bool, CacheError> {
        let Some(cache) = self.cache.as_ref() else {
            return Ok(false);
        };
        let Some(payload) = cache.load()? else {
            return Ok(false);
        };
        info!(elements = payload.elements.len(), "restored layout from cache");
        self.replace_model(payload);
        Ok(true)
    }

    pub fn export(&self) -> Result<String, TransferError> {
        transfer::encode(&self.build_payload())
    }

    /// Load a base64 blob; on error the session is left as it was
    ///
    /// The figure size travels with the design; canvas pixels and scale
    /// stay as they are.
    pub fn import(&mut self, blob: &str) -> Result<(), TransferError> {
        let payload = transfer::decode(blob)?;
        self.viewport.figure_width = payload.viewport.figure_width;
        self.viewport.figure_height = payload.viewport.figure_height;
        self.replace_model(payload);
        Ok(())
    }

    fn replace_model(&mut self, payload: LayoutPayload) {
        self.elements = payload.elements;
        self.constraints = payload.constraints;
        self.constants = payload.constants;
        self.selected = None;
    }
}

impl NameLookup for Session {
    fn element_name(&self, id: &str) -> Option<&str> {
        self.element(id).map(Element::display_name)
    }

    fn constant_value(&self, id: &str) -> Option<f64> {
        self.constant(id).map(|c| c.value)
    }
}
