use crate::collection::Key;
use crate::resolve::resolve::{Pending, Resolve, ResolveError};
use crate::value::Value;
use futures::future::{self, try_join_all, BoxFuture, FutureExt};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// An opaque, shareable action payload.
///
/// Factories use handles to expose whatever they built - a collection
/// engine, a closure set, a caller struct - as a leaf of the action
/// map. Handles resolve as-is and compare by pointer.
#[derive(Clone)]
pub struct Handle(Arc<dyn Any + Send + Sync>);

impl Handle {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handle(..)")
    }
}

/// A heterogeneous tree whose leaves may still be pending.
///
/// This is the shape factories hand to the store composer: any nesting
/// of sequences, key-ordered maps, set-like containers and keyed
/// records, with plain values, opaque handles or pending computations
/// at the leaves. Resolution awaits every pending leaf concurrently and
/// rebuilds the same container kinds around the settlements.
pub enum Resolvable {
    Null,
    Leaf(Value),
    Handle(Handle),
    Pending(Pending<Resolvable>),
    List(Vec<Resolvable>),
    /// Key-ordered associative container; iteration order is insertion
    /// order.
    Map(IndexMap<Key, Resolvable>),
    /// Set-like container: members that settle to equal values collapse
    /// to one, first occurrence wins.
    Set(Vec<Resolvable>),
    /// Plain string-keyed record.
    Record(IndexMap<String, Resolvable>),
}

impl Resolvable {
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<Resolvable, ResolveError>> + Send + 'static,
    {
        Resolvable::Pending(Pending::new(future))
    }

    pub fn handle<T: Any + Send + Sync>(value: T) -> Self {
        Resolvable::Handle(Handle::new(value))
    }

    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Resolvable)>,
    {
        Resolvable::Record(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Read a field of a record-shaped node.
    pub fn field(&self, name: &str) -> Option<&Resolvable> {
        match self {
            Resolvable::Record(fields) => fields.get(name),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Resolvable::Leaf(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<&Handle> {
        match self {
            Resolvable::Handle(handle) => Some(handle),
            _ => None,
        }
    }

    /// Downcast a handle-shaped node in one step.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.as_handle().and_then(Handle::downcast)
    }
}

impl From<Value> for Resolvable {
    fn from(value: Value) -> Self {
        Resolvable::Leaf(value)
    }
}

impl From<Handle> for Resolvable {
    fn from(handle: Handle) -> Self {
        Resolvable::Handle(handle)
    }
}

impl From<Vec<Resolvable>> for Resolvable {
    fn from(items: Vec<Resolvable>) -> Self {
        Resolvable::List(items)
    }
}

/// Structural equality over settled nodes; a pending node equals
/// nothing, handles compare by pointer.
impl PartialEq for Resolvable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Resolvable::Null, Resolvable::Null) => true,
            (Resolvable::Leaf(a), Resolvable::Leaf(b)) => a == b,
            (Resolvable::Handle(a), Resolvable::Handle(b)) => a.ptr_eq(b),
            (Resolvable::List(a), Resolvable::List(b)) => a == b,
            (Resolvable::Set(a), Resolvable::Set(b)) => a == b,
            (Resolvable::Map(a), Resolvable::Map(b)) => a == b,
            (Resolvable::Record(a), Resolvable::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Resolvable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolvable::Null => f.write_str("Null"),
            Resolvable::Leaf(value) => f.debug_tuple("Leaf").field(value).finish(),
            Resolvable::Handle(handle) => handle.fmt(f),
            Resolvable::Pending(_) => f.write_str("Pending(..)"),
            Resolvable::List(items) => f.debug_tuple("List").field(items).finish(),
            Resolvable::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Resolvable::Set(members) => f.debug_tuple("Set").field(members).finish(),
            Resolvable::Record(fields) => f.debug_tuple("Record").field(fields).finish(),
        }
    }
}

impl Resolve for Resolvable {
    type Output = Resolvable;

    fn is_settled(&self) -> bool {
        match self {
            Resolvable::Pending(_) => false,
            Resolvable::List(items) | Resolvable::Set(items) => {
                items.iter().all(Resolve::is_settled)
            }
            Resolvable::Map(entries) => entries.values().all(Resolve::is_settled),
            Resolvable::Record(fields) => fields.values().all(Resolve::is_settled),
            _ => true,
        }
    }

    fn resolve(self) -> BoxFuture<'static, Result<Self::Output, ResolveError>> {
        match self {
            settled @ (Resolvable::Null | Resolvable::Leaf(_) | Resolvable::Handle(_)) => {
                future::ready(Ok(settled)).boxed()
            }
            Resolvable::Pending(pending) => pending.resolve(),
            Resolvable::List(items) => async move {
                let resolved = try_join_all(items.into_iter().map(Resolve::resolve)).await?;
                Ok(Resolvable::List(resolved))
            }
            .boxed(),
            Resolvable::Map(entries) => {
                let (keys, values): (Vec<Key>, Vec<Resolvable>) = entries.into_iter().unzip();
                async move {
                    let resolved = try_join_all(values.into_iter().map(Resolve::resolve)).await?;
                    Ok(Resolvable::Map(keys.into_iter().zip(resolved).collect()))
                }
                .boxed()
            }
            Resolvable::Record(fields) => {
                let (keys, values): (Vec<String>, Vec<Resolvable>) = fields.into_iter().unzip();
                async move {
                    let resolved = try_join_all(values.into_iter().map(Resolve::resolve)).await?;
                    Ok(Resolvable::Record(keys.into_iter().zip(resolved).collect()))
                }
                .boxed()
            }
            Resolvable::Set(members) => async move {
                let resolved = try_join_all(members.into_iter().map(Resolve::resolve)).await?;
                let mut unique: Vec<Resolvable> = Vec::new();
                for member in resolved {
                    if !unique.contains(&member) {
                        unique.push(member);
                    }
                }
                Ok(Resolvable::Set(unique))
            }
            .boxed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn settled_trees_pass_through_unchanged() {
        let tree = Resolvable::record([
            ("numbers", Resolvable::List(vec![Value::Int(1).into(), Value::Int(2).into()])),
            ("nothing", Resolvable::Null),
        ]);
        assert!(tree.is_settled());

        let expected = Resolvable::record([
            ("numbers", Resolvable::List(vec![Value::Int(1).into(), Value::Int(2).into()])),
            ("nothing", Resolvable::Null),
        ]);
        let resolved = tree.resolve().now_or_never().unwrap().unwrap();
        assert_eq!(resolved, expected);
    }

    #[test]
    fn nested_pending_leaves_all_settle() {
        let doubly_pending = Resolvable::pending(async {
            Ok(Resolvable::pending(async { Ok(Value::from("deep").into()) }))
        });
        let tree = Resolvable::record([
            (
                "list",
                Resolvable::List(vec![
                    Resolvable::pending(async { Ok(Value::Int(1).into()) }),
                    Value::Int(2).into(),
                ]),
            ),
            ("nested", Resolvable::record([("inner", doubly_pending)])),
        ]);
        assert!(!tree.is_settled());

        let resolved = block_on(tree.resolve()).unwrap();
        assert!(resolved.is_settled());
        assert_eq!(
            resolved,
            Resolvable::record([
                (
                    "list",
                    Resolvable::List(vec![Value::Int(1).into(), Value::Int(2).into()]),
                ),
                (
                    "nested",
                    Resolvable::record([("inner", Value::from("deep").into())]),
                ),
            ])
        );
    }

    #[test]
    fn maps_keep_arbitrary_keys_in_insertion_order() {
        let mut entries: IndexMap<Key, Resolvable> = IndexMap::new();
        entries.insert(Key::Int(9), Resolvable::pending(async { Ok(Value::from("nine").into()) }));
        entries.insert(Key::from("a"), Value::from("letter").into());

        let resolved = block_on(Resolvable::Map(entries).resolve()).unwrap();
        let Resolvable::Map(resolved) = resolved else {
            panic!("container kind must be preserved");
        };
        let keys: Vec<&Key> = resolved.keys().collect();
        assert_eq!(keys, vec![&Key::Int(9), &Key::from("a")]);
    }

    #[test]
    fn set_members_collapse_when_they_settle_equal() {
        let set = Resolvable::Set(vec![
            Resolvable::pending(async { Ok(Value::from("same").into()) }),
            Value::from("same").into(),
            Value::from("other").into(),
        ]);

        let resolved = block_on(set.resolve()).unwrap();
        let Resolvable::Set(members) = resolved else {
            panic!("container kind must be preserved");
        };
        assert_eq!(members.len(), 2);
        assert_eq!(members[0], Value::from("same").into());
    }

    #[test]
    fn handles_survive_resolution_and_downcast() {
        struct Counter(i64);

        let tree = Resolvable::record([("counter", Resolvable::handle(Counter(3)))]);
        let resolved = block_on(tree.resolve()).unwrap();

        let counter: &Counter = resolved.field("counter").unwrap().downcast().unwrap();
        assert_eq!(counter.0, 3);
    }

    #[test]
    fn a_rejected_leaf_fails_the_tree() {
        let tree = Resolvable::List(vec![
            Resolvable::pending(async { Ok(Value::Int(1).into()) }),
            Resolvable::Pending(Pending::rejected(ResolveError::rejected("offline"))),
        ]);
        assert_eq!(
            block_on(tree.resolve()),
            Err(ResolveError::rejected("offline"))
        );
    }
}
