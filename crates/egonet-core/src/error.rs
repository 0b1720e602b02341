use crate::types::{ContextId, PersonId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EgoNetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Node not in graph: {0}")]
    UnknownNode(String),

    #[error("Person not in roster: {0}")]
    UnknownPerson(String),

    #[error("Person already in roster: {0}")]
    DuplicatePerson(PersonId),

    #[error("Unknown context: {0}")]
    UnknownContext(ContextId),

    #[error("Cannot sample {requested} people from a roster of {current}")]
    InvalidSize { requested: usize, current: usize },

    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),

    #[error("Tie strength must lie in [0, 1], got {0}")]
    InvalidTieStrength(f64),

    #[error("Eigenvector centrality did not converge within {iterations} iterations")]
    Convergence { iterations: usize },

    #[error("No strong ties defined; mark strong ties before testing triadic closure")]
    EmptyStrongTieSet,

    #[error("Roster has no ego")]
    MissingEgo,

    #[error("Graph is disconnected: {0}")]
    Disconnected(String),
}

impl EgoNetError {
    pub fn unknown_node(id: PersonId) -> Self {
        EgoNetError::UnknownNode(id.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EgoNetError>;
