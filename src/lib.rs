//! # Depot
//!
//! Composable building blocks for mutating a shared, observable
//! in-memory data store through named actions.
//!
//! Depot provides three tightly coupled pieces:
//!
//! ## Collections (CRUD actions over an observable sequence)
//!
//! [`Collection`] wraps any [`ObservableList`] and layers full CRUD
//! semantics on top: uniqueness-checked insertion, ordered insertion,
//! partial update and positional or identity-based removal. Items pass
//! through an item factory before storage, and every mutation carries a
//! `"<name> - <operation>"` label for tracing.
//!
//! ## Deep async resolution
//!
//! [`Resolve`] and [`Resolvable`] walk arbitrarily nested container
//! shapes and await every pending value found inside them concurrently,
//! preserving container kind, order and key identity.
//!
//! ## Store composition
//!
//! [`compose`] invokes named state-factories against one shared
//! reactive record and aggregates their results into a unified
//! `{ state, actions }` store - synchronously when every factory
//! settles, as a pending composition otherwise.

pub mod collection;
pub mod observe;
pub mod resolve;
pub mod store;
pub mod value;

// Re-export main types for convenience
pub use collection::{
    AddOptions, Added, Collection, Items, Key, Keyed, Merge, Target, Unique, Updated, Upserted,
};
pub use observe::{ObservableList, ObservableRecord, TrackedList, TrackedRecord};
pub use resolve::{Handle, Pending, Resolvable, Resolve, ResolveError, Settled};
pub use store::{
    compose, Actions, Composition, Factories, FactoryContext, FieldAccessor, Selection, Store,
};
pub use value::Value;
