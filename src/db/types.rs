use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Supported column data types
///
/// Spelled `int`, `str` and `bool` in column specs and in the persisted
/// catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "int")]
    Integer,
    #[serde(rename = "str")]
    Text,
    #[serde(rename = "bool")]
    Boolean,
}

impl DataType {
    /// Parses a type name as written in a `name:type` column spec
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Self::Integer),
            "str" => Some(Self::Text),
            "bool" => Some(Self::Boolean),
            _ => None,
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Integer => write!(f, "int"),
            DataType::Text => write!(f, "str"),
            DataType::Boolean => write!(f, "bool"),
        }
    }
}

/// Runtime value stored in one row cell
///
/// Untagged so a row serializes field-for-field (`{"ID": 1, "name": "Alice"}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Text(String),
}

impl Value {
    /// Casts raw text into a typed value according to the declared column type.
    ///
    /// Text values lose exactly one pair of surrounding double quotes if
    /// present; unquoted text is trimmed instead. Quoted text keeps its inner
    /// whitespace.
    pub fn cast(raw: &str, datatype: DataType) -> Result<Self> {
        match datatype {
            DataType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| Error::TypeCast {
                    value: raw.to_string(),
                    datatype,
                }),
            DataType::Boolean => match raw.trim().to_lowercase().as_str() {
                "true" | "1" => Ok(Value::Boolean(true)),
                "false" | "0" => Ok(Value::Boolean(false)),
                _ => Err(Error::TypeCast {
                    value: raw.to_string(),
                    datatype,
                }),
            },
            DataType::Text => match unquote(raw) {
                Some(inner) => Ok(Value::Text(inner.to_string())),
                None => Ok(Value::Text(raw.trim().to_string())),
            },
        }
    }

    /// Returns the data type of the value
    pub fn datatype(&self) -> DataType {
        match self {
            Self::Boolean(_) => DataType::Boolean,
            Self::Integer(_) => DataType::Integer,
            Self::Text(_) => DataType::Text,
        }
    }
}

/// Strips one pair of surrounding double quotes, if both are present
fn unquote(raw: &str) -> Option<&str> {
    raw.strip_prefix('"').and_then(|s| s.strip_suffix('"'))
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

/// A row maps column names to typed values; every row carries an "ID" key
pub type Row = std::collections::BTreeMap<String, Value>;

#[cfg(test)]
mod tests {
    use super::{DataType, Value};
    use crate::error::Error;

    #[test]
    fn test_cast_integer() {
        assert_eq!(Value::cast("30", DataType::Integer), Ok(Value::Integer(30)));
        assert_eq!(
            Value::cast("-7", DataType::Integer),
            Ok(Value::Integer(-7))
        );
        assert_eq!(
            Value::cast(" 42 ", DataType::Integer),
            Ok(Value::Integer(42))
        );

        for bad in ["abc", "3.5", "", "30x"] {
            assert_eq!(
                Value::cast(bad, DataType::Integer),
                Err(Error::TypeCast {
                    value: bad.to_string(),
                    datatype: DataType::Integer
                })
            );
        }
    }

    #[test]
    fn test_cast_boolean() {
        for raw in ["true", "TRUE", "True", "1"] {
            assert_eq!(
                Value::cast(raw, DataType::Boolean),
                Ok(Value::Boolean(true))
            );
        }
        for raw in ["false", "FALSE", "0"] {
            assert_eq!(
                Value::cast(raw, DataType::Boolean),
                Ok(Value::Boolean(false))
            );
        }
        assert!(Value::cast("yes", DataType::Boolean).is_err());
        assert!(Value::cast("", DataType::Boolean).is_err());
    }

    #[test]
    fn test_cast_text_strips_one_quote_pair() {
        assert_eq!(
            Value::cast("\"Alice\"", DataType::Text),
            Ok(Value::Text("Alice".to_string()))
        );
        // Inner whitespace survives when the value was quoted
        assert_eq!(
            Value::cast("\" a \"", DataType::Text),
            Ok(Value::Text(" a ".to_string()))
        );
        // Only one pair is removed
        assert_eq!(
            Value::cast("\"\"x\"\"", DataType::Text),
            Ok(Value::Text("\"x\"".to_string()))
        );
    }

    #[test]
    fn test_cast_text_trims_when_unquoted() {
        assert_eq!(
            Value::cast("  Alice  ", DataType::Text),
            Ok(Value::Text("Alice".to_string()))
        );
        // A lone quote character is not a quoted value
        assert_eq!(
            Value::cast("\"", DataType::Text),
            Ok(Value::Text("\"".to_string()))
        );
    }

    #[test]
    fn test_display_is_the_comparison_form() {
        assert_eq!(Value::Integer(30).to_string(), "30");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Text("Alice".into()).to_string(), "Alice");
    }
}
