//! Tree error types.

use thiserror::Error;

/// Errors that can occur while defining kinds, accessing groups or visiting.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A kind declared an invalid group name. No kind is produced.
    #[error("Invalid group declaration on kind {kind}: {reason}")]
    GroupDeclaration {
        /// Name of the kind being defined.
        kind: String,
        /// What was wrong with the declaration.
        reason: String,
    },

    /// An attribute was read that is neither declared nor set.
    #[error("{name} attribute could not be found on {receiver}")]
    AttributeNotFound {
        /// Requested attribute name.
        name: String,
        /// Display form of the node that was asked.
        receiver: String,
    },

    /// A value of the wrong shape was assigned to a typed attribute.
    #[error("{name} expects {expected}, got {found}")]
    TypeMismatch {
        /// Attribute name.
        name: String,
        /// Shape the attribute accepts.
        expected: &'static str,
        /// Shape of the rejected value.
        found: String,
    },

    /// No handler resolved for a visited node.
    #[error("visitor {visitor} missing {specific} and {generic} handlers for node kind {kind}")]
    DispatchNotFound {
        /// Name of the visitor class.
        visitor: String,
        /// Kind-specific handler name that was looked up.
        specific: String,
        /// Generic handler name that was looked up.
        generic: String,
        /// Kind of the node being visited.
        kind: String,
    },

    /// A numeric reduction does not fit in an `i64`.
    #[error("numeric sum overflows i64 at {value}")]
    Overflow {
        /// The value that could not be added.
        value: String,
    },

    /// Visit output could not be converted to a JSON value.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl TreeError {
    /// Creates a group declaration error.
    pub fn group_declaration(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::GroupDeclaration {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    /// Creates an attribute-not-found error.
    pub fn attribute_not_found(name: impl Into<String>, receiver: impl ToString) -> Self {
        Self::AttributeNotFound {
            name: name.into(),
            receiver: receiver.to_string(),
        }
    }

    /// Creates an overflow error.
    pub fn overflow(value: impl ToString) -> Self {
        Self::Overflow {
            value: value.to_string(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(
        name: impl Into<String>,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected,
            found: found.into(),
        }
    }
}
