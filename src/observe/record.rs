use crate::collection::Merge;
use crate::value::Value;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};

type RecordSubscriber = Box<dyn Fn(&str, &IndexMap<String, Value>) + Send + Sync>;

/// The shared, keyed, observable record a store composition mutates.
///
/// The composer creates one record per composition and hands cloned
/// handles to every factory; all reactive field updates flow through
/// this trait. Like [`ObservableList`](crate::ObservableList), mutations
/// carry an action label for tracing.
pub trait ObservableRecord: Clone {
    fn get(&self, field: &str) -> Option<Value>;

    fn set(&self, action: &str, field: &str, value: Value);

    /// Overlay the fields of a record-shaped `partial` onto the record.
    /// Anything else is ignored.
    fn merge(&self, action: &str, partial: Value);

    /// Overlay `partial` onto the record stored under `field`.
    ///
    /// Returns `false` when the field is absent or its value does not
    /// support merging; the record is left untouched in that case.
    fn merge_field(&self, action: &str, field: &str, partial: &Value) -> bool;

    /// A point-in-time copy of the record as a [`Value::Record`].
    fn snapshot(&self) -> Value;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reference `ObservableRecord` backed by a shared insertion-ordered map.
pub struct TrackedRecord {
    fields: Arc<RwLock<IndexMap<String, Value>>>,
    subscribers: Arc<RwLock<Vec<RecordSubscriber>>>,
}

impl TrackedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to mutations.
    ///
    /// The callback receives the action label and the fields as they
    /// stand after the mutation.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&str, &IndexMap<String, Value>) + Send + Sync + 'static,
    {
        self.subscribers.write().unwrap().push(Box::new(callback));
    }

    fn notify(&self, action: &str) {
        let fields = self.fields.read().unwrap();
        tracing::trace!(target: "depot::observe", action, fields = fields.len());
        let subscribers = self.subscribers.read().unwrap();
        for subscriber in subscribers.iter() {
            subscriber(action, &fields);
        }
    }
}

impl Default for TrackedRecord {
    fn default() -> Self {
        Self {
            fields: Arc::new(RwLock::new(IndexMap::new())),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Clone for TrackedRecord {
    fn clone(&self) -> Self {
        Self {
            fields: Arc::clone(&self.fields),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl ObservableRecord for TrackedRecord {
    fn get(&self, field: &str) -> Option<Value> {
        self.fields.read().unwrap().get(field).cloned()
    }

    fn set(&self, action: &str, field: &str, value: Value) {
        self.fields.write().unwrap().insert(field.to_string(), value);
        self.notify(action);
    }

    fn merge(&self, action: &str, partial: Value) {
        let Value::Record(partial_fields) = partial else {
            return;
        };
        {
            let mut fields = self.fields.write().unwrap();
            for (field, value) in partial_fields {
                fields.insert(field, value);
            }
        }
        self.notify(action);
    }

    fn merge_field(&self, action: &str, field: &str, partial: &Value) -> bool {
        let merged = {
            let mut fields = self.fields.write().unwrap();
            match fields.get_mut(field) {
                Some(value) if value.is_mergeable() => {
                    value.merge(partial);
                    true
                }
                _ => false,
            }
        };
        if merged {
            self.notify(action);
        }
        merged
    }

    fn snapshot(&self) -> Value {
        Value::Record(self.fields.read().unwrap().clone())
    }

    fn len(&self) -> usize {
        self.fields.read().unwrap().len()
    }
}
