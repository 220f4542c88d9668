use crate::observe::ObservableRecord;
use crate::value::Value;

/// Set/extend action pair for one field of a shared record.
///
/// The store-side convenience for fields that do not need a whole
/// collection: `set` overwrites the field, `reset` restores the
/// configured initial, `extend` overlays a partial record onto the
/// field's current value. Mutations are labeled `"<field> - <operation>"`
/// like collection actions are.
pub struct FieldAccessor<R> {
    record: R,
    field: String,
    initial: Value,
}

impl<R: ObservableRecord> FieldAccessor<R> {
    pub fn new(record: R, field: impl Into<String>) -> Self {
        Self {
            record,
            field: field.into(),
            initial: Value::Null,
        }
    }

    pub fn with_initial(mut self, initial: Value) -> Self {
        self.initial = initial;
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn get(&self) -> Option<Value> {
        self.record.get(&self.field)
    }

    pub fn set(&self, value: Value) {
        self.record
            .set(&self.action_name("Set value"), &self.field, value);
    }

    /// Put the configured initial value back.
    pub fn reset(&self) {
        self.set(self.initial.clone());
    }

    /// Overlay a partial record onto the field's current value.
    ///
    /// Returns `false` when the field is absent or not record-shaped;
    /// the record is left untouched in that case.
    pub fn extend(&self, partial: &Value) -> bool {
        self.record
            .merge_field(&self.action_name("Extend value"), &self.field, partial)
    }

    fn action_name(&self, operation: &str) -> String {
        format!("{} - {}", self.field, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::TrackedRecord;
    use std::sync::{Arc, Mutex};

    #[test]
    fn set_and_reset_round_trip() {
        let record = TrackedRecord::new();
        let filter = FieldAccessor::new(record.clone(), "filter").with_initial(Value::from("all"));

        assert_eq!(filter.get(), None);
        filter.reset();
        assert_eq!(record.get("filter"), Some(Value::from("all")));

        filter.set(Value::from("active"));
        assert_eq!(record.get("filter"), Some(Value::from("active")));

        filter.reset();
        assert_eq!(record.get("filter"), Some(Value::from("all")));
    }

    #[test]
    fn extend_overlays_record_fields() {
        let record = TrackedRecord::new();
        let session = FieldAccessor::new(record.clone(), "session");

        session.set(Value::record([("user", Value::from("ada"))]));
        assert!(session.extend(&Value::record([("token", Value::from("t-1"))])));

        let stored = record.get("session").unwrap();
        assert_eq!(stored.get("user"), Some(&Value::from("ada")));
        assert_eq!(stored.get("token"), Some(&Value::from("t-1")));
    }

    #[test]
    fn extend_refuses_non_record_fields() {
        let record = TrackedRecord::new();
        let count = FieldAccessor::new(record.clone(), "count");

        count.set(Value::Int(1));
        assert!(!count.extend(&Value::record([("x", Value::Int(2))])));
        assert_eq!(record.get("count"), Some(Value::Int(1)));
    }

    #[test]
    fn mutations_carry_the_field_action_label() {
        let record = TrackedRecord::new();
        let labels = Arc::new(Mutex::new(Vec::new()));
        let labels_clone = labels.clone();
        record.subscribe(move |action, _fields| {
            labels_clone.lock().unwrap().push(action.to_string());
        });

        let filter = FieldAccessor::new(record, "filter");
        filter.set(Value::from("all"));
        filter.extend(&Value::record([("x", Value::Int(2))]));

        let seen = labels.lock().unwrap().clone();
        assert_eq!(seen, vec!["filter - Set value"]);
    }
}
