use indexmap::IndexMap;

/// A dynamically shaped value.
///
/// Records keep field insertion order, so two records with the same
/// fields in a different order are still equal but iterate differently.
/// No schema is imposed anywhere: a collection item, a record field or
/// an initial-data payload can be any shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Record(IndexMap<String, Value>),
}

impl Value {
    /// Build a record from `(field, value)` pairs, keeping their order.
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Record(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    /// Read a field of a record-shaped value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields.get(field),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Overlay the fields of a record-shaped `patch` onto this record.
    ///
    /// Only fields present on the patch are overwritten; everything else
    /// is kept. Does nothing unless both sides are records.
    pub fn overlay(&mut self, patch: &Value) {
        if let (Value::Record(fields), Value::Record(patch_fields)) = (self, patch) {
            for (field, value) in patch_fields {
                fields.insert(field.clone(), value.clone());
            }
        }
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Int(number)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Value::Int(number as i64)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Float(number)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Str(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Str(text)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_field_order() {
        let record = Value::record([("b", Value::Int(1)), ("a", Value::Int(2))]);
        let fields = record.as_record().unwrap();
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn overlay_merges_only_patch_fields() {
        let mut record = Value::record([
            ("id", Value::from("1")),
            ("name", Value::from("first")),
            ("done", Value::from(false)),
        ]);
        let patch = Value::record([("done", Value::from(true))]);

        record.overlay(&patch);

        assert_eq!(record.get("name"), Some(&Value::from("first")));
        assert_eq!(record.get("done"), Some(&Value::from(true)));
    }

    #[test]
    fn overlay_ignores_non_records() {
        let mut value = Value::from("plain");
        value.overlay(&Value::record([("x", Value::Int(1))]));
        assert_eq!(value, Value::from("plain"));
    }
}
