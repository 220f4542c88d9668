//! Deep asynchronous resolution.
//!
//! Given any value, resolution returns that value with every nested
//! pending computation awaited and replaced by its settlement -
//! container kind, order and key identity preserved, all pending leaves
//! awaited concurrently. Two layers:
//!
//! - the [`Resolve`] trait, capability dispatch over typed containers
//! - the [`Resolvable`] tree, the dynamic heterogeneous shape the store
//!   composer works with

mod resolve;
mod tree;

pub use resolve::{Pending, Resolve, ResolveError, Settled};
pub use tree::{Handle, Resolvable};
