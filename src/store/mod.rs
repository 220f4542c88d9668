//! Store composition.
//!
//! `compose` aggregates independently authored state-factories into one
//! `{ state, actions }` store over a single shared reactive record,
//! synchronously when every factory settles, through one concurrent
//! resolution pass otherwise. `select` narrows a composed store for one
//! consumer; `FieldAccessor` is the single-field action pair.

mod accessor;
mod compose;
mod select;

pub use accessor::FieldAccessor;
pub use compose::{compose, Actions, Composition, Factories, FactoryContext, Store};
pub use select::Selection;
