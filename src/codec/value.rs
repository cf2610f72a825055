//! Decoded value tree

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Which composite a closing marker terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closer {
    /// `$`, closes `A`
    Array,
    /// `@`, closes `a`
    PairArray,
    /// `{`, closes `o`
    Object,
}

impl fmt::Display for Closer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Closer::Array => "array",
            Closer::PairArray => "pair-array",
            Closer::Object => "object",
        })
    }
}

/// One node of a decoded record.
///
/// Composites own their children; a tree is built once, depth first, and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unit,
    Boolean(bool),
    Int32(i32),
    UInt64(u64),
    Utf8String(String),
    /// String-keyed pairs in encounter order; duplicates are kept.
    Object(Vec<(String, Value)>),
    Array(Vec<Value>),
    PairArray(Vec<(Value, Value)>),
    /// End-of-composite marker. Consumed by the decoder, never part of a
    /// tree handed to callers.
    Sentinel(Closer),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload widened to `i128`, for either integer variant.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::Int32(v) => Some(i128::from(*v)),
            Value::UInt64(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    /// First value stored under `key`, if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Unit | Value::Sentinel(_) => serializer.serialize_unit(),
            Value::Boolean(v) => serializer.serialize_bool(*v),
            Value::Int32(v) => serializer.serialize_i32(*v),
            Value::UInt64(v) => serializer.serialize_u64(*v),
            Value::Utf8String(v) => serializer.serialize_str(v),
            Value::Object(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::PairArray(pairs) => {
                let mut seq = serializer.serialize_seq(Some(pairs.len()))?;
                for (first, second) in pairs {
                    seq.serialize_element(&(first, second))?;
                }
                seq.end()
            }
        }
    }
}
