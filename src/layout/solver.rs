//! Constraint evaluation for layout computation
//!
//! Constraints are applied in dependency order over the stored element
//! variables (`x`, `y`, `width`, `height`). A derived target such as
//! `right` moves `x` and needs the final `width` first, so both show up in
//! the ordering. Constraints whose inputs form a loop are reported as a
//! [`LayoutError::CircularConstraint`] instead of being iterated.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use super::constraint::{evaluation_order, BaseVariable, Constraint, Slot};
use super::error::LayoutError;
use super::reference::Reference;
use super::types::{Constant, Element};

// ============================================================================
// Operand lookup
// ============================================================================

/// Read-only view of element and constant values during evaluation
struct Values<'a> {
    elements: &'a [Element],
    index: HashMap<&'a str, usize>,
    constants: HashMap<&'a str, f64>,
}

impl<'a> Values<'a> {
    fn new(elements: &'a [Element], constants: &'a [Constant]) -> Self {
        Self {
            elements,
            index: elements
                .iter()
                .enumerate()
                .map(|(i, e)| (e.id.as_str(), i))
                .collect(),
            constants: constants.iter().map(|c| (c.id.as_str(), c.value)).collect(),
        }
    }

    /// Value of a slot; empty or dangling slots contribute their neutral default
    fn resolve(&self, slot: Slot, reference: Option<&Reference>) -> f64 {
        match reference {
            None => slot.default_value(),
            Some(Reference::Literal(v)) => *v,
            Some(Reference::Constant(id)) => match self.constants.get(id.as_str()) {
                Some(v) => *v,
                None => {
                    debug!(constant = %id, slot = slot.as_str(), "dangling constant reference");
                    slot.default_value()
                }
            },
            Some(Reference::Attribute(r)) => match self.index.get(r.id.as_str()) {
                Some(&i) => r.attr.value(&self.elements[i]),
                None => {
                    debug!(element = %r.id, slot = slot.as_str(), "dangling element reference");
                    slot.default_value()
                }
            },
        }
    }
}

/// `add_after + multiply × (source + add_before)` against the current values
fn compute(constraint: &Constraint, values: &Values<'_>) -> f64 {
    let source = values.resolve(Slot::Source, constraint.source.as_ref());
    let multiply = values.resolve(Slot::Multiply, Some(&constraint.multiply));
    let add_before = values.resolve(Slot::AddBefore, Some(&constraint.add_before));
    let add_after = values.resolve(Slot::AddAfter, Some(&constraint.add_after));
    add_after + multiply * (source + add_before)
}

// ============================================================================
// Evaluation
// ============================================================================

/// Constraints that take part in evaluation
///
/// A constraint whose target element is gone stays in the model but is not
/// applied. When several constraints write the same stored variable only the
/// last one in list order is kept.
pub fn active_constraints<'a>(elements: &[Element], constraints: &'a [Constraint]) -> Vec<&'a Constraint> {
    let known: HashSet<&str> = elements.iter().map(|e| e.id.as_str()).collect();
    let mut seen: HashSet<BaseVariable> = HashSet::new();
    let mut active: Vec<&Constraint> = constraints
        .iter()
        .rev()
        .filter(|c| known.contains(c.target.id.as_str()))
        .filter(|c| seen.insert(c.writes()))
        .collect();
    active.reverse();
    active
}

/// Apply every active constraint and return the updated elements
///
/// Elements not touched by any constraint keep their geometry. The input
/// slices are left unchanged; on error nothing is applied.
pub fn evaluate(
    elements: &[Element],
    constraints: &[Constraint],
    constants: &[Constant],
) -> Result<Vec<Element>, LayoutError> {
    let active: Vec<Constraint> = active_constraints(elements, constraints)
        .into_iter()
        .cloned()
        .collect();
    let order = evaluation_order(&active)?;

    let mut solved = elements.to_vec();
    for i in order {
        let constraint = &active[i];
        let value = compute(constraint, &Values::new(&solved, constants));
        trace!(target_attr = %constraint.target, value, "applying constraint");

        if let Some(element) = solved.iter_mut().find(|e| e.id == constraint.target.id) {
            constraint.target.attr.assign(element, value);
        }
    }

    debug!(
        elements = solved.len(),
        applied = active.len(),
        skipped = constraints.len() - active.len(),
        "evaluated constraints"
    );
    Ok(solved)
}

// ============================================================================
// Unit tests
// ============================================================================
