use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::TryFrom;
use std::fmt;

/// Possible values that can be stored in a fact tuple
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FactValue {
    /// String value
    String(String),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// Array of `FactValues`
    Array(Vec<FactValue>),
    /// Object/map of string keys to `FactValues`
    Object(HashMap<String, FactValue>),
    /// Null value
    Null,
}

// -------------------------------------------------------------------------------------------------
// Conversions between internal `FactValue` and `serde_json::Value`.
// These let a host-binding layer move tuples in and out of the store without
// hand-written mapping code. The implementation purposefully keeps the mapping
// logic close to the data type it concerns.
// -------------------------------------------------------------------------------------------------

impl From<FactValue> for serde_json::Value {
    fn from(value: FactValue) -> Self {
        match value {
            FactValue::String(s) => Self::String(s),
            FactValue::Integer(i) => Self::Number(serde_json::Number::from(i)),
            FactValue::Float(f) => serde_json::Number::from_f64(f).map_or(Self::Null, Self::Number),
            FactValue::Boolean(b) => Self::Bool(b),
            FactValue::Array(arr) => {
                let vec: Vec<Self> = arr.into_iter().map(std::convert::Into::into).collect();
                Self::Array(vec)
            }
            FactValue::Object(map) => {
                let json_map = map
                    .into_iter()
                    .map(|(k, v)| (k, v.into()))
                    .collect::<serde_json::Map<String, Self>>();
                Self::Object(json_map)
            }
            FactValue::Null => Self::Null,
        }
    }
}

impl From<&FactValue> for serde_json::Value {
    fn from(value: &FactValue) -> Self {
        match value {
            FactValue::String(s) => Self::String(s.clone()),
            FactValue::Integer(i) => Self::Number(serde_json::Number::from(*i)),
            FactValue::Float(f) => {
                serde_json::Number::from_f64(*f).map_or(Self::Null, Self::Number)
            }
            FactValue::Boolean(b) => Self::Bool(*b),
            FactValue::Array(arr) => {
                let vec: Vec<Self> = arr.iter().map(std::convert::Into::into).collect();
                Self::Array(vec)
            }
            FactValue::Object(map) => {
                let json_map = map
                    .iter()
                    .map(|(k, v)| (k.clone(), v.into()))
                    .collect::<serde_json::Map<String, Self>>();
                Self::Object(json_map)
            }
            FactValue::Null => Self::Null,
        }
    }
}

impl TryFrom<&serde_json::Value> for FactValue {
    type Error = anyhow::Error;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Self::Float(f)
                } else {
                    return Err(anyhow!("Unsupported number value: {}", n));
                }
            }
            serde_json::Value::Bool(b) => Self::Boolean(*b),
            serde_json::Value::Array(arr) => {
                let inner = arr.iter().map(Self::try_from).collect::<Result<Vec<_>, _>>()?;
                Self::Array(inner)
            }
            serde_json::Value::Object(map) => {
                let mut inner = HashMap::new();
                for (k, v) in map {
                    inner.insert(k.clone(), Self::try_from(v)?);
                }
                Self::Object(inner)
            }
            serde_json::Value::Null => Self::Null,
        })
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FactValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FactValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl std::hash::Hash for FactValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Self::String(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            Self::Integer(i) => {
                1u8.hash(state);
                i.hash(state);
            }
            Self::Float(f) => {
                2u8.hash(state);
                f.to_bits().hash(state); // Use bits representation for consistent hashing
            }
            Self::Boolean(b) => {
                3u8.hash(state);
                b.hash(state);
            }
            Self::Array(arr) => {
                4u8.hash(state);
                arr.hash(state);
            }
            Self::Object(obj) => {
                5u8.hash(state);
                // Sort keys for consistent hashing
                let mut sorted_pairs: Vec<_> = obj.iter().collect();
                sorted_pairs.sort_by_key(|(k, _)| *k);
                for (key, value) in sorted_pairs {
                    key.hash(state);
                    value.hash(state);
                }
            }
            Self::Null => {
                6u8.hash(state);
            }
        }
    }
}

impl Eq for FactValue {}

impl PartialOrd for FactValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        use FactValue::{Boolean, Float, Integer, Null, String};
        match (self, other) {
            (String(a), String(b)) => a.partial_cmp(b),
            (Integer(a), Integer(b)) => a.partial_cmp(b),
            (Float(a), Float(b)) => a.partial_cmp(b),
            (Boolean(a), Boolean(b)) => a.partial_cmp(b),
            (Null, Null) => Some(std::cmp::Ordering::Equal),
            // Cross-type comparisons: convert to same type if possible
            #[allow(clippy::cast_precision_loss)]
            (Integer(a), Float(b)) => (*a as f64).partial_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Float(a), Integer(b)) => a.partial_cmp(&(*b as f64)),
            // For incompatible types, no ordering
            _ => None,
        }
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(fl) => write!(f, "{fl}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Array(arr) => {
                write!(f, "[")?;
                for (i, item) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Object(obj) => {
                write!(f, "{{")?;
                let mut first = true;
                for (key, value) in obj {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                    first = false;
                }
                write!(f, "}}")
            }
            Self::Null => write!(f, "null"),
        }
    }
}

impl FactValue {
    /// Get the type name as a string
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Null => "null",
        }
    }

    /// Try to convert to an integer
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Boolean(b) => Some(i64::from(*b)),
            Self::String(s) => s.parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Try to convert to a float
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            Self::String(s) => s.parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Try to convert to a string
    #[must_use]
    pub fn as_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Create null value
    #[must_use]
    pub const fn null() -> Self {
        Self::Null
    }
}
