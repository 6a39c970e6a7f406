use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Literal as it appears in property lists, assignments and predicates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Value {
    /// Bare word, e.g. `replicationLevel` or `val1`
    Identifier(String),
    /// Single-quoted string
    Text(String),
    Integer(i64),
    /// Decimal keeps its written scale so `3.0` renders back as `3.0`
    Decimal(Decimal),
    Boolean(bool),
    /// `{key: value, ...}`, e.g. a replication strategy. Keys keep their quotes when quoted.
    Map(Vec<(String, Value)>),
}

impl Value {
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Decimal(_))
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Literal form accepted by the native engine: bare words become quoted strings.
    #[must_use]
    pub fn to_cql(&self) -> String {
        match self {
            Self::Identifier(s) | Self::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Map(entries) => {
                let entries: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| {
                        let key = if key.starts_with('\'') {
                            key.clone()
                        } else {
                            Self::Text(key.clone()).to_cql()
                        };
                        format!("{key}: {}", value.to_cql())
                    })
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(s) => write!(f, "{s}"),
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
