// Copyright (c) 2024 Mike Tsao

use core::fmt;
use serde::{Deserialize, Serialize};

/// A parameter value as the console reports it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScpValue {
    #[allow(missing_docs)]
    Int(i64),
    #[allow(missing_docs)]
    Text(String),
}
impl ScpValue {
    /// Interprets a raw wire token, preferring a number when it parses as one.
    pub fn from_token(token: &str) -> Self {
        token
            .parse::<i64>()
            .map(Self::Int)
            .unwrap_or_else(|_| Self::Text(token.to_string()))
    }

    #[allow(missing_docs)]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ScpValue::Int(i) => Some(*i),
            ScpValue::Text(t) => t.parse().ok(),
        }
    }

    /// Whether this cached value equals what a feedback expects. Booleans
    /// compare as `1`/`0`.
    pub fn matches(&self, expected: &OptionValue) -> bool {
        match expected {
            OptionValue::Bool(b) => self.as_int() == Some(i64::from(*b)),
            OptionValue::Number(n) => self.as_int() == Some(*n),
            OptionValue::Text(t) => match self {
                ScpValue::Text(s) => s == t,
                ScpValue::Int(i) => t.parse::<i64>().ok() == Some(*i),
            },
        }
    }
}
impl Default for ScpValue {
    fn default() -> Self {
        Self::Int(0)
    }
}
impl fmt::Display for ScpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScpValue::Int(i) => write!(f, "{i}"),
            ScpValue::Text(t) => f.write_str(t),
        }
    }
}
impl From<i64> for ScpValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}
impl From<&str> for ScpValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A value that the host supplies for one option of an action or feedback.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    #[allow(missing_docs)]
    Bool(bool),
    #[allow(missing_docs)]
    Number(i64),
    #[allow(missing_docs)]
    Text(String),
}
impl OptionValue {
    /// The numeric reading of this value, if it has one.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            OptionValue::Bool(b) => Some(i64::from(*b)),
            OptionValue::Number(n) => Some(*n),
            OptionValue::Text(t) => t.trim().parse().ok(),
        }
    }
}
impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}
impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
impl From<ScpValue> for OptionValue {
    fn from(value: ScpValue) -> Self {
        match value {
            ScpValue::Int(i) => Self::Number(i),
            ScpValue::Text(t) => Self::Text(t),
        }
    }
}
