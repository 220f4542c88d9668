//! Collection mutation engine.
//!
//! `Collection` layers CRUD semantics - uniqueness, ordered insertion,
//! partial update, positional or identity-based removal - on top of any
//! [`ObservableList`](crate::ObservableList). Items are anything that
//! can hand out an identity key ([`Keyed`]) and answer whether it can
//! absorb a partial update ([`Merge`]).

mod collection;
mod keyed;

pub use collection::{
    AddOptions, Added, Collection, Items, Target, Unique, Updated, Upserted,
};
pub use keyed::{Key, Keyed, Merge};
