use crate::numeric::{parse_float, parse_integer};
use std::fmt;

/// What kind of value a prompt collects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputKind {
    /// Text, passed through verbatim.
    #[default]
    Text,
    /// A number parsed from the leading numeric characters.
    Number {
        /// Accept one decimal point and return [`Value::Float`].
        float: bool,
        /// Read a leading `-` as a sign. When `false` it is discarded.
        negatives: bool,
    },
}

impl InputKind {
    /// Non-negative integers.
    pub const INTEGER: InputKind = InputKind::Number {
        float: false,
        negatives: false,
    };

    /// Whether this kind produces numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, InputKind::Number { .. })
    }

    /// Convert one raw line. Malformed numbers degrade to their numeric
    /// prefix, or zero.
    pub fn convert(&self, raw: &str) -> Value {
        match *self {
            InputKind::Text => Value::Text(raw.to_string()),
            InputKind::Number {
                float: true,
                negatives,
            } => Value::Float(parse_float(raw, negatives)),
            InputKind::Number {
                float: false,
                negatives,
            } => Value::Integer(parse_integer(raw, negatives)),
        }
    }

    /// The value produced when input ends before a line is entered.
    pub fn empty_value(&self) -> Value {
        self.convert("")
    }
}

/// A value collected from the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text input.
    Text(String),
    /// Integer input.
    Integer(i64),
    /// Fractional input.
    Float(f64),
}

impl Value {
    /// The text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The integer, if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The value as a float; integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Integer(n) => Some(*n as f64),
            Value::Text(_) => None,
        }
    }

    /// Consume into the text, if this is a text value.
    pub fn into_text(self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_by_kind() {
        assert_eq!(InputKind::Text.convert(" hi "), Value::from(" hi "));
        assert_eq!(InputKind::INTEGER.convert("-12x"), Value::Integer(12));
        let signed = InputKind::Number {
            float: false,
            negatives: true,
        };
        assert_eq!(signed.convert("-12x"), Value::Integer(-12));
        let float = InputKind::Number {
            float: true,
            negatives: true,
        };
        assert_eq!(float.convert("-1.5m"), Value::Float(-1.5));
    }

    #[test]
    fn empty_values() {
        assert_eq!(InputKind::Text.empty_value(), Value::from(""));
        assert_eq!(InputKind::INTEGER.empty_value(), Value::Integer(0));
        let float = InputKind::Number {
            float: true,
            negatives: false,
        };
        assert_eq!(float.empty_value(), Value::Float(0.0));
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::Integer(3).as_float(), Some(3.0));
        assert_eq!(Value::from("x").as_integer(), None);
        assert_eq!(Value::from("x").into_text().as_deref(), Some("x"));
        assert_eq!(Value::Float(0.5).to_string(), "0.5");
    }
}
