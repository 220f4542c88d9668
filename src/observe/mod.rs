//! The observable substrate boundary.
//!
//! The engine and composer depend only on the capability traits here:
//! - `ObservableList<T>` - a mutable ordered sequence with labeled,
//!   observable mutations
//! - `ObservableRecord` - a mutable keyed record with labeled,
//!   observable mutations and a field-merge primitive
//!
//! `TrackedList` and `TrackedRecord` are minimal reference
//! implementations; any conforming substrate can be supplied instead.

mod list;
mod record;

pub use list::{ObservableList, TrackedList};
pub use record::{ObservableRecord, TrackedRecord};
