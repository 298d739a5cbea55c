//! Bindable values, the `Compilable` subquery boundary, and the Expression
//! wrapper marker.

use crate::dialect::Dialect;
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// A `{sql, bindings, dialect}` prepared query triple, returned from a
/// [`Compilable`] compilation and also the public result of the top-level
/// `.to_sql(dialect, true, ..)` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    pub sql: String,
    pub bindings: Vec<Value>,
    pub dialect: Dialect,
}

/// The crate-boundary trait a subquery builder implements so that
/// `fluentsql-core` can compile and splice it without depending on the
/// concrete `Select` type defined in the `fluentsql` crate.
pub trait Compilable: Send + Sync {
    fn compile_prepared(&self, dialect: Dialect) -> Result<Prepared>;
    fn compile_raw(&self, dialect: Dialect) -> Result<String>;
}

impl fmt::Debug for dyn Compilable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<subquery>")
    }
}

/// A bindable value. Arrays/objects are rejected at format time, not
/// representable here except through `.in_list`'s expansion into one
/// `Value` per element.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Subquery(Arc<dyn Compilable>),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::Float(v) => write!(f, "Float({v})"),
            Value::Text(s) => write!(f, "Text({s:?})"),
            Value::Subquery(_) => write!(f, "Subquery(<..>)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            // Subqueries never compare equal; they're identity, not data.
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}
impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}
impl From<Arc<dyn Compilable>> for Value {
    fn from(sub: Arc<dyn Compilable>) -> Self {
        Value::Subquery(sub)
    }
}

/// Marker meaning "render this payload literally, do not bind it". Its text
/// is validated by the Injection Validator at construction time, so by the
/// time an `Expression` reaches a clause builder it is known-safe.
#[derive(Debug, Clone)]
pub struct Expression(pub(crate) String);

impl Expression {
    /// Validates `text` and wraps it. Fails with
    /// [`crate::error::FluentSqlError::UnsafeValue`] if the Injection
    /// Validator rejects it.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        crate::validator::injection::validate(&text)?;
        Ok(Expression(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
