use std::fmt::Debug;

use thiserror::Error;

use crate::RawCapability;

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// Interprets raw capabilities for one kind of resource.
///
/// A semantics decides which raw capabilities it understands and whether one of its capabilities
/// may be delegated as another.
pub trait CapabilitySemantics {
    /// The parsed capability.
    type Capability: Clone + Debug;

    /// Parses a raw capability. The error names the first field that is invalid.
    fn try_parse(&self, raw: &RawCapability) -> Result<Self::Capability, CapabilityParseError>;

    /// Checks whether `child` is a valid delegation of `parent` and returns the capability that is
    /// granted.
    fn try_delegate(
        &self,
        parent: &Self::Capability,
        child: &Self::Capability,
    ) -> Result<Self::Capability, DelegationError<Self::Capability>>;
}

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A raw capability that a semantics does not understand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CapabilityParseError {
    /// What is wrong with the capability.
    pub message: String,

    /// The capability that failed to parse.
    pub capability: RawCapability,
}

/// Why a capability cannot be delegated from a parent capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelegationError<A> {
    /// The capabilities are about different things.
    #[error("Capabilities are unrelated.")]
    Unrelated {
        /// The parent capability.
        parent: A,

        /// The child capability.
        child: A,
    },

    /// The child asks for more than the parent grants.
    #[error("{reason}")]
    Escalation {
        /// What is escalated.
        reason: String,

        /// The parent capability.
        parent: A,

        /// The child capability.
        child: A,
    },
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl CapabilityParseError {
    /// Creates a parse error for `capability`.
    pub fn new(message: impl Into<String>, capability: &RawCapability) -> Self {
        Self {
            message: message.into(),
            capability: capability.clone(),
        }
    }
}

impl<A> DelegationError<A> {
    /// Returns the parent capability.
    pub fn parent(&self) -> &A {
        match self {
            DelegationError::Unrelated { parent, .. } => parent,
            DelegationError::Escalation { parent, .. } => parent,
        }
    }

    /// Returns the child capability.
    pub fn child(&self) -> &A {
        match self {
            DelegationError::Unrelated { child, .. } => child,
            DelegationError::Escalation { child, .. } => child,
        }
    }
}
