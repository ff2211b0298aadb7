//! Authoring state for a single constraint
//!
//! ```text
//! Idle ──open──▶ Editing ──apply──▶ Applied
//!                   │
//!                   └──cancel──▶ Cancelled
//! ```
//!
//! Applying keeps at most one constraint per stored variable in the list,
//! so `a.x` and its alias `a.left` never both have one.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use super::constraint::{find_cycle, BaseVariable, Constraint, Slot};
use super::error::LayoutError;
use super::reference::{AttributeRef, Reference};
use super::types::Attribute;
use crate::selection::{Pick, PickMailbox};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    Editing,
    Applied,
    Cancelled,
}

#[derive(Debug)]
struct Draft {
    constraint: Constraint,
    /// Constraint the draft was opened from, matched by identity on apply
    original: Option<Constraint>,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct ConstraintEditor {
    state: EditorState,
    draft: Rc<RefCell<Option<Draft>>>,
    generation: u64,
}

impl ConstraintEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state == EditorState::Editing
    }

    /// Edit the constraint on `target`, or a fresh `target = 0` template
    ///
    /// A constraint on an alias of the same stored variable (`left` for
    /// `x`, `top` for `y`) pre-fills the draft and is replaced on apply.
    pub fn open(&mut self, target: AttributeRef, constraints: &[Constraint]) {
        let writes = BaseVariable::new(target.id.clone(), target.attr.writes());
        let existing = constraints
            .iter()
            .find(|c| c.target == target)
            .or_else(|| constraints.iter().find(|c| c.writes() == writes));
        match existing {
            Some(existing) => {
                let mut draft = existing.clone();
                draft.target = target;
                self.start(draft, Some(existing.clone()));
            }
            None => self.start(Constraint::new(target, None), None),
        }
    }

    /// Edit a specific constraint from the list
    pub fn open_existing(&mut self, constraint: &Constraint) {
        self.start(constraint.clone(), Some(constraint.clone()));
    }

    fn start(&mut self, constraint: Constraint, original: Option<Constraint>) {
        self.generation += 1;
        debug!(target_attr = %constraint.target, "editing constraint");
        *self.draft.borrow_mut() = Some(Draft {
            constraint,
            original,
            generation: self.generation,
        });
        self.state = EditorState::Editing;
    }

    /// Current draft, if a constraint is open
    pub fn draft(&self) -> Option<Constraint> {
        self.draft.borrow().as_ref().map(|d| d.constraint.clone())
    }

    pub fn set_slot(&mut self, slot: Slot, reference: Reference) -> Result<(), LayoutError> {
        let mut draft = self.draft.borrow_mut();
        let draft = draft.as_mut().ok_or(LayoutError::NotEditing)?;
        draft.constraint.set_slot(slot, reference);
        Ok(())
    }

    /// Fill `slot` from the next pick
    ///
    /// An element pick becomes `element.attr`, a constant pick the constant
    /// itself. A cancelled pick, or one arriving after the draft was closed
    /// or replaced, changes nothing.
    pub fn pick_slot(
        &mut self,
        mailbox: &mut PickMailbox,
        slot: Slot,
        attr: Attribute,
    ) -> Result<(), LayoutError> {
        if !self.is_editing() {
            return Err(LayoutError::NotEditing);
        }
        let draft: Weak<RefCell<Option<Draft>>> = Rc::downgrade(&self.draft);
        let generation = self.generation;

        mailbox.begin_pick(move |pick| {
            let Some(draft) = draft.upgrade() else {
                return;
            };
            let mut draft = draft.borrow_mut();
            let Some(draft) = draft.as_mut().filter(|d| d.generation == generation) else {
                debug!("pick arrived for a closed draft");
                return;
            };
            match pick {
                Pick::Element(id) => draft.constraint.set_slot(slot, Reference::attribute(id, attr)),
                Pick::Constant(id) => draft.constraint.set_slot(slot, Reference::constant(id)),
                Pick::Cancelled => {}
            }
        });
        Ok(())
    }

    /// Write the draft into `constraints`
    ///
    /// The draft takes the place of the constraint it was opened from, or
    /// of the first constraint writing the same variable, or is appended.
    /// Other constraints writing that variable are removed. A draft that reads its
    /// own target or closes a cycle is refused and stays open.
    pub fn apply(&mut self, constraints: &mut Vec<Constraint>) -> Result<Constraint, LayoutError> {
        let mut guard = self.draft.borrow_mut();
        let draft = guard.as_ref().ok_or(LayoutError::NotEditing)?;
        let applied = draft.constraint.clone();
        let writes = applied.writes();

        let position = draft
            .original
            .as_ref()
            .and_then(|original| constraints.iter().position(|c| c.same_as(original)))
            .or_else(|| constraints.iter().position(|c| c.writes() == writes));

        let mut next = Vec::with_capacity(constraints.len() + 1);
        for (i, c) in constraints.iter().enumerate() {
            if Some(i) == position {
                next.push(applied.clone());
            } else if c.writes() == writes {
                warn!(target_attr = %c.target, variable = %writes, "dropping duplicate constraint on variable");
            } else {
                next.push(c.clone());
            }
        }
        if position.is_none() {
            next.push(applied.clone());
        }

        if let Some(cycle) = find_cycle(std::slice::from_ref(&applied)) {
            return Err(LayoutError::circular(cycle));
        }
        // an existing loop elsewhere is not this draft's fault
        if find_cycle(constraints).is_none() {
            if let Some(cycle) = find_cycle(&next) {
                return Err(LayoutError::circular(cycle));
            }
        }

        *constraints = next;
        *guard = None;
        drop(guard);
        self.state = EditorState::Applied;
        debug!(constraint = %applied, "constraint applied");
        Ok(applied)
    }

    /// Discard the draft; returns whether anything was open
    pub fn cancel(&mut self) -> bool {
        if self.draft.borrow_mut().take().is_some() {
            self.state = EditorState::Cancelled;
            true
        } else {
            false
        }
    }
}
