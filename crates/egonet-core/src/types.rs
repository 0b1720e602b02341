use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type PersonId = u64;
pub type ContextId = u32;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    #[default]
    Unspecified,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Unspecified => "unspecified",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "female" | "f" => Ok(Gender::Female),
            "male" | "m" => Ok(Gender::Male),
            "" | "unspecified" | "no response" => Ok(Gender::Unspecified),
            other => Err(format!("unrecognized gender: {}", other)),
        }
    }
}

/// A coded attribute cell. Numeric codes and free text are both allowed;
/// absence is modelled with `Option<AttributeValue>` at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Int(i64),
    Text(String),
}

impl AttributeValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            AttributeValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s.as_str()),
            AttributeValue::Int(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<Gender> for AttributeValue {
    fn from(g: Gender) -> Self {
        AttributeValue::Text(g.to_string())
    }
}

/// Lookup key accepted by every name/id resolving operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PersonRef {
    Id(PersonId),
    Name(String),
}

impl fmt::Display for PersonRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonRef::Id(id) => write!(f, "{}", id),
            PersonRef::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<PersonId> for PersonRef {
    fn from(id: PersonId) -> Self {
        PersonRef::Id(id)
    }
}

impl From<&str> for PersonRef {
    fn from(name: &str) -> Self {
        PersonRef::Name(name.to_string())
    }
}

impl From<String> for PersonRef {
    fn from(name: String) -> Self {
        PersonRef::Name(name)
    }
}
