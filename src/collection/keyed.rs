use crate::value::Value;
use std::fmt;

/// An extracted identity value.
///
/// Keys are the scalar currency of every uniqueness and lookup check in
/// a collection. They hash and compare structurally, so a key read from
/// a stored record matches the same key passed in raw.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bool(flag) => write!(f, "{flag}"),
            Key::Int(number) => write!(f, "{number}"),
            Key::Str(text) => write!(f, "{text}"),
        }
    }
}

impl From<bool> for Key {
    fn from(flag: bool) -> Self {
        Key::Bool(flag)
    }
}

impl From<i64> for Key {
    fn from(number: i64) -> Self {
        Key::Int(number)
    }
}

impl From<&str> for Key {
    fn from(text: &str) -> Self {
        Key::Str(text.to_string())
    }
}

impl From<String> for Key {
    fn from(text: String) -> Self {
        Key::Str(text)
    }
}

/// Uniform key extraction over record-shaped and raw values.
///
/// Record-shaped values yield the scalar stored under the named field;
/// anything else yields itself. `None` means the value carries no
/// usable key under that name and will never match a lookup.
pub trait Keyed {
    fn extract_key(&self, key: &str) -> Option<Key>;
}

impl Keyed for Value {
    fn extract_key(&self, key: &str) -> Option<Key> {
        match self {
            Value::Record(fields) => fields.get(key).and_then(scalar_key),
            other => scalar_key(other),
        }
    }
}

fn scalar_key(value: &Value) -> Option<Key> {
    match value {
        Value::Bool(flag) => Some(Key::Bool(*flag)),
        Value::Int(number) => Some(Key::Int(*number)),
        Value::Str(text) => Some(Key::Str(text.clone())),
        _ => None,
    }
}

/// Field-merge capability.
///
/// `update_item` asks the stored entry whether it can absorb a partial
/// update in place; values that cannot are replaced wholesale through
/// the item factory instead.
pub trait Merge {
    fn is_mergeable(&self) -> bool {
        false
    }

    /// Overlay the fields present on `patch` onto `self`.
    fn merge(&mut self, patch: &Self) {
        let _ = patch;
    }
}

impl Merge for Value {
    fn is_mergeable(&self) -> bool {
        self.is_record()
    }

    fn merge(&mut self, patch: &Self) {
        self.overlay(patch);
    }
}

macro_rules! impl_plain_item {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Keyed for $ty {
                fn extract_key(&self, _key: &str) -> Option<Key> {
                    Some(Key::$variant(self.clone().into()))
                }
            }

            impl Merge for $ty {}
        )*
    };
}

impl_plain_item! {
    bool => Bool,
    i64 => Int,
    String => Str,
}
