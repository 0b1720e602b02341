use crate::{ContextId, EgoNetError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextCategory {
    School,
    Work,
    Residence,
    Lived,
    Family,
    Other,
}

impl fmt::Display for ContextCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContextCategory::School => "school",
            ContextCategory::Work => "work",
            ContextCategory::Residence => "residence",
            ContextCategory::Lived => "lived",
            ContextCategory::Family => "family",
            ContextCategory::Other => "other",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ContextCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "school" => Ok(ContextCategory::School),
            "work" => Ok(ContextCategory::Work),
            "residence" => Ok(ContextCategory::Residence),
            "lived" => Ok(ContextCategory::Lived),
            "family" => Ok(ContextCategory::Family),
            "other" | "custom" => Ok(ContextCategory::Other),
            other => Err(format!("unknown context category: {}", other)),
        }
    }
}

/// A social setting alters can be "known from".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub id: ContextId,
    pub label: String,
    pub category: ContextCategory,
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            ContextCategory::Family | ContextCategory::Other => write!(f, "{}", self.label),
            category => write!(f, "{} ({})", self.label, category),
        }
    }
}

/// Id 0 and the -1 clustering selector are never handed out; ids start at 1
/// and are not reused after [`retire`](Self::retire).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextRegistry {
    contexts: BTreeMap<ContextId, Context>,
    next_id: ContextId,
    fallback: Option<ContextId>,
}

impl Default for ContextRegistry {
    fn default() -> Self {
        Self {
            contexts: BTreeMap::new(),
            next_id: 1,
            fallback: None,
        }
    }
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, label: impl Into<String>, category: ContextCategory) -> ContextId {
        let id = self.next_id;
        self.next_id += 1;
        self.contexts.insert(
            id,
            Context {
                id,
                label: label.into(),
                category,
            },
        );
        id
    }

    /// Registers the catch-all bucket under the current maximum id. A
    /// previous fallback keeps its id but loses the fallback role.
    pub fn register_fallback(&mut self, label: impl Into<String>) -> ContextId {
        let label = label.into();
        let category = if label.eq_ignore_ascii_case("family") {
            ContextCategory::Family
        } else {
            ContextCategory::Other
        };
        let id = self.register(label, category);
        self.fallback = Some(id);
        id
    }

    pub fn fallback(&self) -> Option<&Context> {
        self.fallback.and_then(|id| self.contexts.get(&id))
    }

    pub fn retire(&mut self, id: ContextId) -> Result<Context> {
        let context = self
            .contexts
            .remove(&id)
            .ok_or(EgoNetError::UnknownContext(id))?;
        if self.fallback == Some(id) {
            self.fallback = None;
        }
        Ok(context)
    }

    pub fn get(&self, id: ContextId) -> Result<&Context> {
        self.contexts.get(&id).ok_or(EgoNetError::UnknownContext(id))
    }

    pub fn contains(&self, id: ContextId) -> bool {
        self.contexts.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Context> {
        self.contexts.values()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
