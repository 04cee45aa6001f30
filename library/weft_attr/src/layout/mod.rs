//! Slot layout for sequence attributes.
//!
//! A sequence assigns every child to a tuple slot (or drops it) once, when
//! it is built. At parse time each child's attribute is placed into its
//! slot with a fixed operation, and the slots collapse into the sequence's
//! attribute when the sequence succeeds.

use crate::{combine, Attribute, Combined, Shape};

/// How a sequence groups its children's attributes into slots.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Grouping {
    /// Adjacent children merge by the pairwise composition rule.
    #[default]
    Default,
    /// All children share one slot (`merge[...]`).
    Merge,
    /// Every child gets its own slot (`separate[...]`).
    Separate,
}

/// How a child's attribute enters its slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaceOp {
    /// Replace the slot value.
    Assign,
    /// Append one element to a container slot.
    Push,
    /// Append the contents of an optional element, if present.
    PushOptional,
    /// Append every element of a container of the slot's type.
    Extend,
    /// Append the contents of an optional container, if present.
    ExtendOptional,
}

/// Where a child's attribute goes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The child produces nothing.
    Drop,
    Slot { index: usize, op: PlaceOp },
}

/// Slots and placements computed for one sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeqLayout {
    slots: Vec<Shape>,
    placements: Vec<Placement>,
}

impl SeqLayout {
    /// Compute the layout for children of the given shapes.
    ///
    /// # Panics
    ///
    /// Panics with `Grouping::Merge` if two children cannot share a slot.
    #[track_caller]
    pub fn new(children: &[Shape], grouping: Grouping) -> Self {
        let mut slots: Vec<Shape> = Vec::new();
        let mut owners: Vec<Option<usize>> = Vec::with_capacity(children.len());

        for child in children {
            if child.is_none() {
                owners.push(None);
                continue;
            }
            let merged = match (grouping, slots.last()) {
                (Grouping::Separate, _) | (_, None) => None,
                (Grouping::Default, Some(last)) => match combine(last, child) {
                    Combined::Merge(shape) => Some(shape),
                    Combined::Separate => None,
                },
                (Grouping::Merge, Some(last)) => Some(merge_forced(last, child)),
            };
            let index = match merged {
                Some(shape) if !slots.is_empty() => {
                    let last = slots.len() - 1;
                    slots[last] = shape;
                    last
                }
                _ => {
                    slots.push(child.clone());
                    slots.len() - 1
                }
            };
            owners.push(Some(index));
        }

        let placements = children
            .iter()
            .zip(&owners)
            .map(|(child, owner)| match owner {
                None => Placement::Drop,
                Some(index) => Placement::Slot {
                    index: *index,
                    op: place_op(&slots[*index], child),
                },
            })
            .collect();

        SeqLayout { slots, placements }
    }

    /// The shape of the whole sequence's attribute.
    pub fn shape(&self) -> Shape {
        match self.slots.as_slice() {
            [] => Shape::None,
            [single] => single.clone(),
            slots => Shape::Tuple(slots.to_vec()),
        }
    }

    /// Slot shapes, in order.
    pub fn slots(&self) -> &[Shape] {
        &self.slots
    }

    /// Placement of child `index`.
    pub fn placement(&self, index: usize) -> Placement {
        self.placements.get(index).copied().unwrap_or(Placement::Drop)
    }

    /// Fresh slot values for one parse attempt.
    pub fn begin(&self) -> Vec<Attribute> {
        self.slots.iter().map(Shape::default_value).collect()
    }

    /// Place child `child`'s attribute into `slots`.
    ///
    /// A `none` attribute (from a child that ran without generating
    /// attributes) is ignored.
    pub fn place(&self, slots: &mut [Attribute], child: usize, attr: Attribute) {
        if attr.is_none() {
            return;
        }
        let Placement::Slot { index, op } = self.placement(child) else {
            return;
        };
        let Some(slot) = slots.get_mut(index) else {
            return;
        };
        apply(slot, op, attr);
    }

    /// Collapse the slots into the sequence's attribute.
    pub fn finish(&self, mut slots: Vec<Attribute>) -> Attribute {
        match slots.len() {
            0 => Attribute::None,
            1 => slots.pop().unwrap_or_default(),
            _ => Attribute::Tuple(slots),
        }
    }
}

#[track_caller]
fn merge_forced(last: &Shape, child: &Shape) -> Shape {
    if last == child && !last.is_container() {
        return last.clone();
    }
    match combine(last, child) {
        Combined::Merge(shape) => shape,
        Combined::Separate => panic!(
            "merge[] cannot combine a {last} attribute with a {child} attribute into one slot"
        ),
    }
}

fn place_op(slot: &Shape, child: &Shape) -> PlaceOp {
    if !slot.is_container() {
        return PlaceOp::Assign;
    }
    if slot == child {
        return PlaceOp::Extend;
    }
    match (slot.element(), child) {
        (Some(element), _) if element == *child => PlaceOp::Push,
        (Some(element), Shape::Optional(inner)) if **inner == element => PlaceOp::PushOptional,
        (_, Shape::Optional(inner)) if **inner == *slot => PlaceOp::ExtendOptional,
        _ => PlaceOp::Assign,
    }
}

fn apply(slot: &mut Attribute, op: PlaceOp, attr: Attribute) {
    match op {
        PlaceOp::Assign => *slot = attr,
        PlaceOp::Push => push(slot, attr),
        PlaceOp::Extend => extend(slot, attr),
        PlaceOp::PushOptional | PlaceOp::ExtendOptional => match attr {
            Attribute::Optional(Some(value)) if op == PlaceOp::PushOptional => push(slot, *value),
            Attribute::Optional(Some(value)) => extend(slot, *value),
            Attribute::Optional(None) => {}
            other => push(slot, other),
        },
    }
}

fn push(slot: &mut Attribute, attr: Attribute) {
    match (slot, attr) {
        (Attribute::String(s), Attribute::Char(c)) => s.push(c),
        (Attribute::String(s), Attribute::Optional(Some(value))) => {
            if let Attribute::Char(c) = *value {
                s.push(c);
            }
        }
        (Attribute::String(_), Attribute::Optional(None)) => {}
        (Attribute::Seq(items), attr) => items.push(attr),
        (slot, attr) => *slot = attr,
    }
}

fn extend(slot: &mut Attribute, attr: Attribute) {
    match (slot, attr) {
        (Attribute::String(s), Attribute::String(more)) => s.push_str(&more),
        (Attribute::Seq(items), Attribute::Seq(more)) => items.extend(more),
        (slot, attr) => push(slot, attr),
    }
}
