// ============================================================================
// Numeric Parameter Interface
// Defines the contract for externally configured values SimTime can consume
// ============================================================================

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type tag of a parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamKind {
    Bool,
    Int,
    Double,
    String,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Bool => "bool",
            ParamKind::Int => "int",
            ParamKind::Double => "double",
            ParamKind::String => "string",
        };
        f.write_str(name)
    }
}

/// A parameter whose numeric content can be turned into simulation time.
///
/// `SimTime` dispatches on [`kind`](NumericParam::kind): `Int` goes through
/// [`int_value`](NumericParam::int_value), `Double` through
/// [`double_value`](NumericParam::double_value), anything else is a type
/// mismatch.
pub trait NumericParam {
    /// The type tag of the current value
    fn kind(&self) -> ParamKind;

    /// The value if it is an integer
    fn int_value(&self) -> Option<i64>;

    /// The value if it is a real number
    fn double_value(&self) -> Option<f64>;

    /// Fully qualified name used in error messages
    fn full_name(&self) -> String;
}

/// Value held by a [`Param`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Bool(_) => ParamKind::Bool,
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Double(_) => ParamKind::Double,
            ParamValue::String(_) => ParamKind::String,
        }
    }
}

/// A named parameter value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Param {
    name: String,
    value: ParamValue,
}

impl Param {
    pub fn new(name: impl Into<String>, value: ParamValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &ParamValue {
        &self.value
    }
}

impl NumericParam for Param {
    fn kind(&self) -> ParamKind {
        self.value.kind()
    }

    fn int_value(&self) -> Option<i64> {
        match self.value {
            ParamValue::Int(v) => Some(v),
            _ => None,
        }
    }

    fn double_value(&self) -> Option<f64> {
        match self.value {
            ParamValue::Double(v) => Some(v),
            _ => None,
        }
    }

    fn full_name(&self) -> String {
        self.name.clone()
    }
}
