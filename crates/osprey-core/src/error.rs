//! Error types for class registration and override resolution.
//!
//! ## Error Hierarchy
//!
//! ```text
//! OspreyError (top-level wrapper)
//! ├── RegistrationError - invalid or duplicate class declarations
//! ├── ResolutionError   - per-class override resolution and scope queries
//! └── CompilationError  - pass-level failures (ordering, lookups, wrapped resolution errors)
//! ```
//!
//! Each phase-specific type can be handled on its own, or converted to
//! [`OspreyError`] with `?`.

use std::sync::Arc;

use thiserror::Error;

use crate::Member;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while registering class declarations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// A class with this name is already registered.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A referenced class is not registered.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// Two declared members share name, kind and parameter types.
    #[error("class '{class}' declares '{member}' more than once")]
    DuplicateMember {
        /// The declaring class.
        class: String,
        /// The repeated member.
        member: String,
    },

    /// A declared member names a different owning class.
    #[error("class '{class}' lists member '{member}' owned by another class")]
    ForeignMember {
        /// The declaring class.
        class: String,
        /// The misplaced member.
        member: String,
    },

    /// The declaration is invalid.
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),
}

// ============================================================================
// Resolution Errors
// ============================================================================

/// Errors raised while resolving one class's effective member set, or while
/// querying a synthesized member scope.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionError {
    /// A supertype's own effective member set is missing or failed.
    #[error("class '{class}' cannot be resolved: supertype '{supertype}' is unresolved")]
    UnresolvedSupertype {
        /// The class being resolved.
        class: String,
        /// The supertype whose member set is unavailable.
        supertype: String,
    },

    /// Two inherited members share a name, are not overridden by the class,
    /// and cannot be reconciled.
    ///
    /// `first` is always inherited. `second` is inherited too, except when
    /// it is a declared member of the class that clashes with `first`
    /// without overriding it.
    #[error("class '{class}' inherits conflicting members '{first}' and '{second}'")]
    OverrideConflict {
        /// The class being resolved.
        class: String,
        /// The shared member name.
        name: String,
        /// First contributing member.
        first: Arc<Member>,
        /// Second contributing member.
        second: Arc<Member>,
    },

    /// The query is not supported by a synthesized member scope.
    #[error("{operation} is not implemented for the synthetic scope of '{scope}'")]
    UnsupportedOperation {
        /// The rejected query.
        operation: &'static str,
        /// The class whose scope was queried.
        scope: String,
    },
}

impl ResolutionError {
    /// Name of the class this error was raised for.
    pub fn class_name(&self) -> &str {
        match self {
            ResolutionError::UnresolvedSupertype { class, .. } => class,
            ResolutionError::OverrideConflict { class, .. } => class,
            ResolutionError::UnsupportedOperation { scope, .. } => scope,
        }
    }

    /// Check if this is an override conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ResolutionError::OverrideConflict { .. })
    }
}

// ============================================================================
// Compilation Errors
// ============================================================================

/// Errors reported by compiler passes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// The supertype graph contains a cycle through this class.
    #[error("circular inheritance for '{name}'")]
    CircularInheritance {
        /// A class on the cycle.
        name: String,
    },

    /// A class scheduled for resolution is not registered.
    #[error("unknown type '{name}'")]
    UnknownType {
        /// The missing class.
        name: String,
    },

    /// Override resolution failed for a class.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Storing a pass result in the registry failed.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Unified error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OspreyError {
    /// A registration error.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// A resolution error.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A compilation error.
    #[error(transparent)]
    Compilation(#[from] CompilationError),
}

impl OspreyError {
    /// Check if this is a registration error.
    pub fn is_registration(&self) -> bool {
        matches!(self, OspreyError::Registration(_))
    }

    /// Check if this is a resolution error.
    pub fn is_resolution(&self) -> bool {
        matches!(self, OspreyError::Resolution(_))
    }

    /// Check if this is a compilation error.
    pub fn is_compilation(&self) -> bool {
        matches!(self, OspreyError::Compilation(_))
    }
}
