use thiserror::Error;

use crate::model::NodeId;

#[derive(Error, Debug)]
pub enum MapcfgError {
    #[error("Node not found: {id} (in {container})")]
    NotFound { id: NodeId, container: String },

    #[error("Cannot place group '{node}' inside '{target}': it is the group itself or one of its descendants")]
    Cycle { node: NodeId, target: NodeId },

    #[error("Zone '{zone}' does not accept {what}")]
    RejectedByZone { zone: String, what: String },

    #[error("Duplicate id '{0}': ids must be unique within a zone")]
    DuplicateId(NodeId),

    #[error("Unknown zone: {0}")]
    UnknownZone(String),

    #[error("Document changed since it was loaded (loaded revision {expected}, stored revision {found})")]
    RevisionConflict { expected: u64, found: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl MapcfgError {
    pub fn not_found(id: &NodeId, container: impl Into<String>) -> Self {
        MapcfgError::NotFound {
            id: id.clone(),
            container: container.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapcfgError>;
