//! Keys, values and the records built from them
use std::fmt;
use std::sync::Arc;

/// A field name.
///
/// Symbolic keys are the default form of header names. Textual keys are used
/// when the caller asks for strings as keys. Both forms are cheap to clone, so
/// every record of a run shares the header's allocations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Symbol(Arc<str>),
    Text(Arc<str>),
}

impl Key {
    pub fn symbol(name: &str) -> Key {
        Key::Symbol(Arc::from(name))
    }

    pub fn text(name: &str) -> Key {
        Key::Text(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        match *self {
            Key::Symbol(ref s) | Key::Text(ref s) => s,
        }
    }

    pub fn is_symbol(&self) -> bool {
        match *self {
            Key::Symbol(_) => true,
            Key::Text(_) => false,
        }
    }

    /// A key of the same kind with a different name.
    pub fn renamed(&self, name: &str) -> Key {
        match *self {
            Key::Symbol(_) => Key::symbol(name),
            Key::Text(_) => Key::text(name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value of a field once it has been decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Str(String),
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Value::Str(ref s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        *self == Value::Null
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Float(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Value::Null => Ok(()),
            Value::Str(ref s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
        }
    }
}

/// Transforms the value of one field. Registered per key in the options.
pub trait ValueConverter {
    fn convert(&self, value: Value) -> Value;
}

impl<F> ValueConverter for F
where
    F: Fn(Value) -> Value,
{
    fn convert(&self, value: Value) -> Value {
        self(value)
    }
}

/// A mapping from field name to value that keeps the order of the header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(Key, Value)>,
}

impl Record {
    pub fn new() -> Record {
        Record { fields: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Record {
        Record {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Inserts or replaces a field. A replaced field keeps its position.
    pub fn insert(&mut self, key: Key, value: Value) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Looks a field up by name, whatever the kind of its key.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Keeps only the fields for which `f` returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Key, &Value) -> bool,
    {
        self.fields.retain(|(k, v)| f(k, v));
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = (&Key, &mut Value)> {
        self.fields.iter_mut().map(|(k, v)| (&*k, v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.fields.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.fields.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl IntoIterator for Record {
    type Item = (Key, Value);

    type IntoIter = std::vec::IntoIter<(Key, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
