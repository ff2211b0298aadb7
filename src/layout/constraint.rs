//! Linear constraints between element attributes
//!
//! Every constraint has the fixed form
//!
//! ```text
//! target = add_after + multiply × (source + add_before)
//! ```
//!
//! where `target` is an element attribute and every other slot is a
//! [`Reference`]. References never nest, so a constraint can always be
//! inspected on its own without following chains.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use super::error::LayoutError;
use super::reference::{
    describe, AttributeRef, NameLookup, NoLookup, RawReference, Reference, ReferenceKey,
};
use super::types::{Attribute, BaseAttribute};

/// One of the editable operand slots of a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Source,
    Multiply,
    AddBefore,
    AddAfter,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Self::Source, Self::Multiply, Self::AddBefore, Self::AddAfter];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Multiply => "multiply",
            Self::AddBefore => "add_before",
            Self::AddAfter => "add_after",
        }
    }

    /// Value the slot contributes when empty or dangling
    pub fn default_value(self) -> f64 {
        match self {
            Self::Multiply => 1.0,
            _ => 0.0,
        }
    }
}

/// A stored geometry field of one element
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BaseVariable {
    pub id: String,
    pub base: BaseAttribute,
}

impl BaseVariable {
    pub fn new(id: impl Into<String>, base: BaseAttribute) -> Self {
        Self {
            id: id.into(),
            base,
        }
    }
}

impl fmt::Display for BaseVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.id, self.base.as_attribute())
    }
}

/// `target = add_after + multiply × (source + add_before)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireConstraint", into = "WireConstraint")]
pub struct Constraint {
    pub target: AttributeRef,
    pub source: Option<Reference>,
    pub multiply: Reference,
    pub add_before: Reference,
    pub add_after: Reference,
}

impl Constraint {
    /// `target = source`, with no source meaning `target = 0`
    pub fn new(target: AttributeRef, source: Option<Reference>) -> Self {
        Self {
            target,
            source,
            multiply: Reference::Literal(1.0),
            add_before: Reference::Literal(0.0),
            add_after: Reference::Literal(0.0),
        }
    }

    /// `target = source`
    pub fn identity(target: AttributeRef, source: AttributeRef) -> Self {
        Self::new(target, Some(source.into()))
    }

    /// Pin an attribute to its current value
    pub fn lock(target: AttributeRef, value: f64) -> Self {
        Self::new(target, None).with_add_before(Reference::Literal(value))
    }

    /// `id.height = ratio × id.width`
    pub fn aspect(id: impl Into<String>, ratio: f64) -> Self {
        let id = id.into();
        Self::new(
            AttributeRef::new(id.clone(), Attribute::Height),
            Some(Reference::attribute(id, Attribute::Width)),
        )
        .with_multiply(Reference::Literal(ratio))
    }

    pub fn with_multiply(mut self, multiply: Reference) -> Self {
        self.multiply = multiply;
        self
    }

    pub fn with_add_before(mut self, add_before: Reference) -> Self {
        self.add_before = add_before;
        self
    }

    pub fn with_add_after(mut self, add_after: Reference) -> Self {
        self.add_after = add_after;
        self
    }

    pub fn slot(&self, slot: Slot) -> Option<&Reference> {
        match slot {
            Slot::Source => self.source.as_ref(),
            Slot::Multiply => Some(&self.multiply),
            Slot::AddBefore => Some(&self.add_before),
            Slot::AddAfter => Some(&self.add_after),
        }
    }

    pub fn set_slot(&mut self, slot: Slot, reference: Reference) {
        match slot {
            Slot::Source => self.source = Some(reference),
            Slot::Multiply => self.multiply = reference,
            Slot::AddBefore => self.add_before = reference,
            Slot::AddAfter => self.add_after = reference,
        }
    }

    /// Operand slots paired with their references, skipping an absent source
    pub fn operands(&self) -> impl Iterator<Item = (Slot, &Reference)> {
        Slot::ALL
            .into_iter()
            .filter_map(move |slot| self.slot(slot).map(|r| (slot, r)))
    }

    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.operands().map(|(_, r)| r)
    }

    /// Identity check used for list diffing: compares what each slot
    /// references, never the values of literals.
    pub fn same_as(&self, other: &Constraint) -> bool {
        self.target == other.target && Slot::ALL.into_iter().all(|slot| self.key(slot) == other.key(slot))
    }

    fn key(&self, slot: Slot) -> ReferenceKey<'_> {
        self.slot(slot)
            .map(Reference::key)
            .unwrap_or(ReferenceKey::Literal)
    }

    /// True when the target or any operand references element `id`
    pub fn mentions_element(&self, id: &str) -> bool {
        self.target.id == id
            || self
                .references()
                .any(|r| r.as_attribute().is_some_and(|a| a.id == id))
    }

    /// Point references to constant `old` at `new`; returns whether anything changed
    pub fn rename_constant(&mut self, old: &str, new: &str) -> bool {
        let mut changed = false;
        for slot in Slot::ALL {
            let matches = matches!(self.slot(slot), Some(Reference::Constant(id)) if id == old);
            if matches {
                self.set_slot(slot, Reference::constant(new));
                changed = true;
            }
        }
        changed
    }

    /// The stored variable assigning the target modifies
    pub fn writes(&self) -> BaseVariable {
        BaseVariable::new(self.target.id.clone(), self.target.attr.writes())
    }

    /// Stored variables that must be final before this constraint is applied
    pub fn dependencies(&self) -> BTreeSet<BaseVariable> {
        let mut deps = BTreeSet::new();
        for (_, reference) in self.operands() {
            if let Reference::Attribute(r) = reference {
                for base in r.attr.reads() {
                    deps.insert(BaseVariable::new(r.id.clone(), *base));
                }
            }
        }
        for base in self.target.attr.assign_reads() {
            deps.insert(BaseVariable::new(self.target.id.clone(), *base));
        }
        deps
    }

    /// Render as `target ← expr`
    ///
    /// Zero and unit terms are left out for readability; this never changes
    /// how the constraint evaluates.
    pub fn describe(&self, lookup: &dyn NameLookup) -> String {
        let target = describe(&Reference::Attribute(self.target.clone()), lookup);

        let source = self
            .source
            .as_ref()
            .filter(|s| !s.is_literal(0.0))
            .map(|s| describe(s, lookup));
        let add_before = Some(&self.add_before)
            .filter(|r| !r.is_literal(0.0))
            .map(|r| describe(r, lookup));

        let mut expr = match (source, add_before) {
            (Some(source), Some(before)) => format!("({} + {})", source, before),
            (Some(source), None) => source,
            (None, Some(before)) => before,
            (None, None) => String::new(),
        };

        // a factor on an empty term is a product of zero
        if !self.multiply.is_literal(1.0) && !expr.is_empty() {
            expr = format!("{} × {}", describe(&self.multiply, lookup), expr);
        }

        if !self.add_after.is_literal(0.0) {
            let after = describe(&self.add_after, lookup);
            expr = if expr.is_empty() {
                after
            } else {
                format!("{} + {}", after, expr)
            };
        }

        if expr.is_empty() {
            expr.push('0');
        }

        format!("{} ← {}", target, expr)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(&NoLookup))
    }
}

/// Identity comparison of two constraints, see [`Constraint::same_as`]
pub fn constraints_equal(a: &Constraint, b: &Constraint) -> bool {
    a.same_as(b)
}

/// Order in which constraints can be applied so every input is final
/// before it is read.
///
/// Constraints are taken in rounds; within a round list order is kept, so
/// when two constraints write the same variable the later one wins.
pub fn evaluation_order(constraints: &[Constraint]) -> Result<Vec<usize>, LayoutError> {
    let deps: Vec<BTreeSet<BaseVariable>> = constraints.iter().map(|c| c.dependencies()).collect();
    let mut pending: Vec<usize> = (0..constraints.len()).collect();
    let mut order = Vec::with_capacity(constraints.len());

    while !pending.is_empty() {
        let written: HashSet<BaseVariable> = pending.iter().map(|&i| constraints[i].writes()).collect();
        let (ready, blocked): (Vec<usize>, Vec<usize>) = pending
            .iter()
            .partition(|&&i| deps[i].iter().all(|d| !written.contains(d)));

        if ready.is_empty() {
            return Err(LayoutError::circular(trace_cycle(constraints, &deps, &blocked)));
        }
        order.extend(ready);
        pending = blocked;
    }

    Ok(order)
}

/// Cycle among `constraints`, as the chain of variables it passes through
pub fn find_cycle(constraints: &[Constraint]) -> Option<Vec<String>> {
    match evaluation_order(constraints) {
        Err(LayoutError::CircularConstraint { cycle }) => Some(cycle),
        _ => None,
    }
}

/// Walk from a blocked constraint through pending writers until a variable
/// repeats. Every blocked constraint waits on another blocked one, so the
/// walk always closes.
fn trace_cycle(
    constraints: &[Constraint],
    deps: &[BTreeSet<BaseVariable>],
    blocked: &[usize],
) -> Vec<String> {
    let writer_of = |var: &BaseVariable| {
        blocked
            .iter()
            .copied()
            .find(|&i| &constraints[i].writes() == var)
    };

    let mut path: Vec<BaseVariable> = Vec::new();
    let mut current = blocked[0];
    loop {
        let var = constraints[current].writes();
        if let Some(start) = path.iter().position(|v| v == &var) {
            let mut cycle: Vec<String> = path[start..].iter().map(|v| v.to_string()).collect();
            cycle.push(var.to_string());
            return cycle;
        }
        path.push(var);

        let next = deps[current].iter().find_map(|d| writer_of(d));
        match next {
            Some(i) => current = i,
            None => return path.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Wire shape: every slot optional, source written as `{id: null, attr: null}` when absent
#[derive(Serialize, Deserialize)]
struct WireConstraint {
    target: AttributeRef,
    #[serde(default, serialize_with = "serialize_source")]
    source: Option<Reference>,
    #[serde(default)]
    multiply: Option<Reference>,
    #[serde(default)]
    add_before: Option<Reference>,
    #[serde(default)]
    add_after: Option<Reference>,
}

fn serialize_source<S: Serializer>(source: &Option<Reference>, serializer: S) -> Result<S::Ok, S::Error> {
    match source {
        Some(reference) => reference.serialize(serializer),
        None => RawReference::Object { id: None, attr: None }.serialize(serializer),
    }
}

impl From<WireConstraint> for Constraint {
    fn from(wire: WireConstraint) -> Self {
        Self {
            target: wire.target,
            source: wire.source.filter(|s| !s.is_literal(0.0)),
            multiply: wire.multiply.unwrap_or(Reference::Literal(1.0)),
            add_before: wire.add_before.unwrap_or(Reference::Literal(0.0)),
            add_after: wire.add_after.unwrap_or(Reference::Literal(0.0)),
        }
    }
}

impl From<Constraint> for WireConstraint {
    fn from(c: Constraint) -> Self {
        Self {
            target: c.target,
            source: c.source,
            multiply: Some(c.multiply),
            add_before: Some(c.add_before),
            add_after: Some(c.add_after),
        }
    }
}
