//! Weft Attr - what parsers produce.
//!
//! Every parser has a static [`Shape`] describing the value it produces on
//! success, and at runtime produces an [`Attribute`] of that shape. Shapes
//! are computed once, when a parser is built, by the composition algebra in
//! [`shape`] and [`layout`]:
//!
//! - `none` is the identity: it vanishes next to anything else
//! - two adjacent characters grow into a string
//! - a container absorbs an adjacent element of its own type
//! - everything else gets its own tuple slot, and a single surviving slot
//!   collapses to its own shape
//!
//! [`Attribute`] values convert to and from plain Rust values through `From`
//! and `TryFrom`.

mod attribute;
pub mod layout;
pub mod shape;

pub use attribute::{Attribute, AttributeError};
pub use layout::{Grouping, PlaceOp, Placement, SeqLayout};
pub use shape::{combine, Combined, Shape};
