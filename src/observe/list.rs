use crate::collection::Merge;
use std::sync::{Arc, RwLock};

type ListSubscriber<T> = Box<dyn Fn(&str, &[T]) + Send + Sync>;

/// The ordered, observable container a collection engine mutates.
///
/// Implementations are cheap-clone shared handles with interior
/// mutability; the engine never owns the backing storage, it holds one
/// handle while the caller keeps another. Every mutation carries a
/// human-readable action label for tracing by the substrate. Labels
/// have no functional effect.
pub trait ObservableList<T: Clone> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Positional read; out of range is plain absence.
    fn get(&self, index: usize) -> Option<T>;

    /// A point-in-time copy of the whole sequence.
    fn snapshot(&self) -> Vec<T>;

    fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.snapshot().into_iter().find(|item| predicate(item))
    }

    fn find_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(&T) -> bool,
    {
        self.snapshot().iter().position(|item| predicate(item))
    }

    fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.find_index(|element| element == item)
    }

    /// The current sequence followed by `items`, without mutating
    /// anything.
    fn concat(&self, items: Vec<T>) -> Vec<T> {
        let mut all = self.snapshot();
        all.extend(items);
        all
    }

    /// Atomically swap the entire sequence.
    fn replace(&self, action: &str, items: Vec<T>);

    fn push(&self, action: &str, item: T);

    fn unshift(&self, action: &str, item: T);

    /// Remove `remove` elements at `index` and insert `insert` there.
    /// Returns the removed elements. Out-of-range arguments are clamped.
    fn splice(&self, action: &str, index: usize, remove: usize, insert: Vec<T>) -> Vec<T>;

    fn clear(&self, action: &str);

    /// Field-merge `patch` onto the element at `index` in place.
    ///
    /// Returns the merged element, or `None` when there is no element
    /// there or the element does not support merging.
    fn merge_at(&self, action: &str, index: usize, patch: &T) -> Option<T>
    where
        T: Merge;
}

/// Reference `ObservableList` backed by a shared `Vec`.
///
/// Subscribers are called after every mutation with the action label
/// and a snapshot of the new sequence.
pub struct TrackedList<T> {
    items: Arc<RwLock<Vec<T>>>,
    subscribers: Arc<RwLock<Vec<ListSubscriber<T>>>>,
}

impl<T: Clone> TrackedList<T> {
    pub fn new(initial: Vec<T>) -> Self {
        Self {
            items: Arc::new(RwLock::new(initial)),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Subscribe to mutations.
    ///
    /// The callback receives the action label and the sequence as it
    /// stands after the mutation.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&str, &[T]) + Send + Sync + 'static,
    {
        self.subscribers.write().unwrap().push(Box::new(callback));
    }

    fn notify(&self, action: &str) {
        let items = self.items.read().unwrap();
        tracing::trace!(target: "depot::observe", action, len = items.len());
        let subscribers = self.subscribers.read().unwrap();
        for subscriber in subscribers.iter() {
            subscriber(action, &items);
        }
    }
}

impl<T> Default for TrackedList<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<T> Clone for TrackedList<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T: Clone> ObservableList<T> for TrackedList<T> {
    fn len(&self) -> usize {
        self.items.read().unwrap().len()
    }

    fn get(&self, index: usize) -> Option<T> {
        self.items.read().unwrap().get(index).cloned()
    }

    fn snapshot(&self) -> Vec<T> {
        self.items.read().unwrap().clone()
    }

    fn replace(&self, action: &str, items: Vec<T>) {
        *self.items.write().unwrap() = items;
        self.notify(action);
    }

    fn push(&self, action: &str, item: T) {
        self.items.write().unwrap().push(item);
        self.notify(action);
    }

    fn unshift(&self, action: &str, item: T) {
        self.items.write().unwrap().insert(0, item);
        self.notify(action);
    }

    fn splice(&self, action: &str, index: usize, remove: usize, insert: Vec<T>) -> Vec<T> {
        let removed = {
            let mut items = self.items.write().unwrap();
            let start = index.min(items.len());
            let end = (start + remove).min(items.len());
            items.splice(start..end, insert).collect()
        };
        self.notify(action);
        removed
    }

    fn clear(&self, action: &str) {
        self.items.write().unwrap().clear();
        self.notify(action);
    }

    fn merge_at(&self, action: &str, index: usize, patch: &T) -> Option<T>
    where
        T: Merge,
    {
        let merged = {
            let mut items = self.items.write().unwrap();
            let entry = items.get_mut(index)?;
            if !entry.is_mergeable() {
                return None;
            }
            entry.merge(patch);
            entry.clone()
        };
        self.notify(action);
        Some(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn splice_clamps_out_of_range() {
        let list = TrackedList::new(vec![1i64, 2, 3]);
        let removed = list.splice("test", 5, 1, Vec::new());
        assert!(removed.is_empty());
        assert_eq!(list.len(), 3);

        let removed = list.splice("test", 2, 10, Vec::new());
        assert_eq!(removed, vec![3]);
        assert_eq!(list.snapshot(), vec![1, 2]);
    }

    #[test]
    fn subscribers_see_label_and_snapshot() {
        let list = TrackedList::new(Vec::<i64>::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        list.subscribe(move |action, items| {
            assert_eq!(action, "Numbers - Add item");
            assert_eq!(items.len(), 1);
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        list.push("Numbers - Add item", 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn merge_at_refuses_non_records() {
        let list = TrackedList::new(vec![Value::from("plain")]);
        let patch = Value::record([("x", Value::Int(1))]);
        assert!(list.merge_at("test", 0, &patch).is_none());
        assert!(list.merge_at("test", 9, &patch).is_none());
    }

    #[test]
    fn merge_at_overlays_records() {
        let stored = Value::record([("id", Value::from("1")), ("name", Value::from("a"))]);
        let list = TrackedList::new(vec![stored]);

        let merged = list
            .merge_at("test", 0, &Value::record([("name", Value::from("b"))]))
            .unwrap();

        assert_eq!(merged.get("name"), Some(&Value::from("b")));
        assert_eq!(merged.get("id"), Some(&Value::from("1")));
        assert_eq!(list.get(0), Some(merged));
    }

    #[test]
    fn clones_share_storage() {
        let list = TrackedList::new(vec![1i64]);
        let other = list.clone();
        other.push("test", 2);
        assert_eq!(list.snapshot(), vec![1, 2]);
    }
}
