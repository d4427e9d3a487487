//! Driver argument model and the named-to-positional adapter.

use crate::error::Error;

/// A positional driver argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

/// A statement argument as handed to the modern driver surface: a value plus
/// its one-based position and, for drivers that support it, a parameter name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    /// Parameter name; `None` (or empty) for positional arguments.
    pub name: Option<String>,
    /// One-based position of the argument within the statement.
    pub ordinal: usize,
    /// The argument itself.
    pub value: Value,
}

impl NamedValue {
    /// A positional argument.
    pub fn positional(ordinal: usize, value: Value) -> Self {
        NamedValue {
            name: None,
            ordinal,
            value,
        }
    }

    /// An argument addressed by name.
    pub fn named(name: impl Into<String>, ordinal: usize, value: Value) -> Self {
        NamedValue {
            name: Some(name.into()),
            ordinal,
            value,
        }
    }
}

/// Convert arguments from the named form to the legacy positional form.
///
/// Any element carrying a non-empty name fails the whole call with
/// [`Error::Unsupported`]; nothing is partially converted. Order is
/// preserved, one output value per input element.
pub fn named_to_positional(args: &[NamedValue]) -> Result<Vec<Value>, Error> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        if arg.name.as_deref().is_some_and(|name| !name.is_empty()) {
            return Err(Error::Unsupported);
        }
        values.push(arg.value.clone());
    }
    Ok(values)
}
