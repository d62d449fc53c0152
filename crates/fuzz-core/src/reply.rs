//! Value model for store replies.
//!
//! Client implementations return replies in whatever native shape they
//! prefer. `Reply` is the closed set of shapes the harness reasons about; the
//! [`normalize`](crate::normalize) pass maps it onto its canonical subset
//! before results are written out.

use serde::de::{Error as DeError, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Key of a [`Reply::Mapping`] entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    /// Integer key
    Integer(i64),
    /// Text key
    Text(String),
}

impl MapKey {
    /// Text form of the key, as used in diff paths and serialized output.
    pub fn to_text(&self) -> String {
        match self {
            Self::Integer(i) => i.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MapKey {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for MapKey {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// A reply value.
///
/// Mapping entries keep their insertion order; two mappings with the same
/// entries in a different order are different replies.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Reply {
    /// Absent value
    #[default]
    Null,

    /// Boolean reply
    Bool(bool),

    /// Integer reply
    Integer(i64),

    /// Floating point reply
    Float(f64),

    /// Text reply
    Text(String),

    /// Ordered sequence of replies
    Sequence(Vec<Reply>),

    /// Keyed mapping of replies
    Mapping(Vec<(MapKey, Reply)>),
}

impl Reply {
    /// Create a text reply.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Build a mapping from text-keyed entries.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Reply)>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (MapKey::Text(k.into()), v))
                .collect(),
        )
    }

    /// Check if this reply is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this reply as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a mapping entry by its text form.
    pub fn get(&self, key: &str) -> Option<&Reply> {
        match self {
            Self::Mapping(entries) => entries
                .iter()
                .find(|(k, _)| k.to_text() == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Short name of the variant, used in diff messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }
}

impl From<bool> for Reply {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Reply {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Reply {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Reply {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Reply {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Reply>> From<Vec<T>> for Reply {
    fn from(value: Vec<T>) -> Self {
        Self::Sequence(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Reply>> From<Option<T>> for Reply {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// Hand-written serde so that mappings keep their entry order and integers stay
// distinct from floats when reading JSON back.

impl Serialize for Reply {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(&key.to_text(), value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Reply {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ReplyVisitor;

        impl<'de> Visitor<'de> for ReplyVisitor {
            type Value = Reply;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a reply value")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(Reply::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(Reply::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Reply::deserialize(deserializer)
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(Reply::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(Reply::Integer(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                // Beyond i64 the value can only be carried as a float
                Ok(i64::try_from(value).map_or(Reply::Float(value as f64), Reply::Integer))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(Reply::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(Reply::Text(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                Ok(Reply::Text(value))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element::<Reply>()? {
                    items.push(item);
                }
                Ok(Reply::Sequence(items))
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(key) = map.next_key::<String>()? {
                    let value = map.next_value::<Reply>()?;
                    entries.push((MapKey::Text(key), value));
                }
                Ok(Reply::Mapping(entries))
            }
        }

        deserializer.deserialize_any(ReplyVisitor)
    }
}
