//! Osprey Compiler
//!
//! Class-completion passes for the osprey lowering pipeline.
//!
//! ## Architecture
//!
//! - **Registration** (in `osprey-registry`): collect every class declaration
//! - **Completion**: resolve each class's effective member set, supertypes
//!   before subtypes, synthesizing fake overrides for inherited members
//!
//! ## Modules
//!
//! - [`passes`]: the completion pass and the override-resolution stages it runs

pub mod passes;

pub use passes::{
    ClassCompletionPass, CompletionConfig, CompletionOutput, GroupOutcome, NameGroup,
    OverrideChecker, OverrideResolver, SignatureChecker, aggregate_supertype_members,
    collect_supertypes, partition_by_name,
};

// Re-export CompilationError from core for convenience
pub use osprey_core::CompilationError;
