use crate::document::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("node {node} is not part of this document")]
    NodeNotInDocument { node: NodeId },
    #[error("cannot resolve `{length}` without {missing}")]
    MissingContext {
        length: String,
        missing: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Non-fatal conditions found while loading or measuring a document.
///
/// These never abort a query; the affected element contributes no extent and the
/// diagnostic is reported next to the result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Diagnostic {
    /// A reference chain re-entered an element that is already being measured.
    CyclicReference { id: String },
    /// A `use`, marker or filter reference names an identifier that is not in the index.
    DanglingReference { from: String, target: String },
    /// Two elements share an identifier; the first one in document order is indexed.
    DuplicateId { id: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::CyclicReference { id } => write!(f, "circular reference to #{id}"),
            Diagnostic::DanglingReference { from, target } => {
                write!(f, "{from} references nonexistent #{target}")
            }
            Diagnostic::DuplicateId { id } => write!(f, "duplicate id #{id}"),
        }
    }
}
